//! Renders [`PostSource`]s into complete HTML documents and writes them to
//! disk.

use crate::date::{self, DEFAULT_DATE_FORMAT};
use crate::markdown::MarkdownRenderer;
use crate::parser::FrontMatterParser;
use crate::post::{PostRecord, PostSource};
use std::path::{Path, PathBuf};
use tracing::{debug, debug_span, warn};

/// Responsible for turning a post's raw contents into an HTML page and a
/// [`PostRecord`].
pub struct Renderer<F, M> {
    /// Splits metadata from the markdown body.
    pub front_matter: F,

    /// Converts the markdown body into an HTML fragment.
    pub markdown: M,

    /// The strftime pattern for the date shown under the post title.
    pub date_format: String,
}

impl<F: FrontMatterParser, M: MarkdownRenderer> Renderer<F, M> {
    pub fn new(front_matter: F, markdown: M) -> Self {
        Renderer {
            front_matter,
            markdown,
            date_format: DEFAULT_DATE_FORMAT.to_owned(),
        }
    }

    /// Sets the strftime pattern for the date header. A malformed pattern
    /// renders with [`DEFAULT_DATE_FORMAT`] instead.
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    /// Renders `source` to a complete HTML document. Missing metadata
    /// degrades the page (blank title or date) rather than failing.
    pub fn render_post(&self, source: &PostSource) -> (String, PostRecord) {
        let _span = debug_span!("post", slug = %source.slug).entered();

        let split = self.front_matter.parse(&source.content);
        let front_matter = split.front_matter;
        if front_matter.title.is_none() {
            warn!("post has no title");
        }
        if front_matter.date.is_none() {
            warn!("post has no date");
        }

        let content = self.markdown.render(split.body);
        let document = render_document(
            front_matter.title.as_deref().unwrap_or_default(),
            &date::display_date(front_matter.date.as_ref(), &self.date_format),
            &content,
        );

        let record = PostRecord {
            title: front_matter.title,
            date: front_matter.date,
            slug: source.slug.clone(),
        };
        (document, record)
    }

    /// Renders `source` and writes it to `{posts_directory}/{slug}.html`,
    /// replacing any existing file.
    pub fn write_post(&self, source: &PostSource, posts_directory: &Path) -> Result<PostRecord> {
        let (document, record) = self.render_post(source);
        let path = source.output_path(posts_directory);
        std::fs::write(&path, document).map_err(|err| Error { path: path.clone(), err })?;
        debug!(path = %path.display(), "wrote post");
        Ok(record)
    }
}

// Title and date are interpolated as-is, without HTML escaping.
fn render_document(title: &str, date: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <link rel="stylesheet" href="/styles.css">
</head>
<body>
    <header>
        <h1>{title}</h1>
        <div class="post-date">{date}</div>
    </header>
    <main class="post-content">
        {content}
    </main>
    <footer>
        <p><a href="/">← Back to all posts</a></p>
    </footer>
</body>
</html>"#
    )
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Returned when a rendered page can't be written to disk.
#[derive(Debug, thiserror::Error)]
#[error("writing post page `{}`", .path.display())]
pub struct Error {
    pub path: PathBuf,

    #[source]
    pub err: std::io::Error,
}
