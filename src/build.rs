//! Exports the [`build_site`] function which stitches together the steps of
//! building the output site: preparing the output directory
//! ([`crate::prepare`]), finding the post sources ([`crate::parser`]),
//! rendering each post ([`crate::write`]), and writing the post index
//! ([`crate::index`]).

use crate::config::Config;
use crate::index::{self, sort_records, write_index, INDEX_FILE};
use crate::markdown::CommonMark;
use crate::parser::{self, source_files, YamlFrontMatter};
use crate::post::{PostRecord, PostSource};
use crate::prepare::{self, prepare_output};
use crate::write::{self, Renderer};
use tracing::info;

/// Builds the site described by `config` and returns the index records in
/// the order they were written.
///
/// Every run is a full rebuild that overwrites earlier output. The first
/// fatal error aborts the build, possibly leaving the output directory partly
/// written.
pub fn build_site(config: &Config) -> Result<Vec<PostRecord>> {
    info!(
        source = %config.posts_source_directory.display(),
        output = %config.output_directory.display(),
        "building site"
    );

    prepare_output(
        &config.root_directory,
        &config.output_directory,
        &config.posts_output_directory,
        &config.static_files,
    )?;

    let files = source_files(&config.posts_source_directory)?;
    let renderer = Renderer::new(YamlFrontMatter, CommonMark::default())
        .with_date_format(&config.date_format);

    // Slugs are unique: they are file names in one directory less `.md`.
    let mut records = Vec::with_capacity(files.len());
    for file in &files {
        let source = PostSource::read(file).map_err(|err| parser::Error::ReadPost {
            path: file.path.clone(),
            err,
        })?;
        records.push(renderer.write_post(&source, &config.posts_output_directory)?);
    }

    let records = sort_records(records);
    write_index(&config.posts_output_directory.join(INDEX_FILE), &records)?;

    info!(posts = records.len(), "built site");
    Ok(records)
}

/// The result of building a site.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the output directory can't be prepared.
    #[error(transparent)]
    Prepare(#[from] prepare::Error),

    /// Returned when post sources can't be found or read.
    #[error(transparent)]
    Parse(#[from] parser::Error),

    /// Returned when a rendered post can't be written.
    #[error(transparent)]
    Write(#[from] write::Error),

    /// Returned when the post index can't be written.
    #[error(transparent)]
    Index(#[from] index::Error),
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::{json, Value};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    // A project with the static assets in place and an empty posts directory.
    fn project() -> TempDir {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("styles.css"), "body { margin: 0 }").unwrap();
        fs::write(root.path().join("index.html"), "<!DOCTYPE html><title>Blog</title>").unwrap();
        fs::create_dir(root.path().join("posts")).unwrap();
        root
    }

    fn post(root: &Path, file_name: &str, contents: &str) {
        fs::write(root.join("posts").join(file_name), contents).unwrap();
    }

    fn read_index(config: &Config) -> Value {
        let text =
            fs::read_to_string(config.posts_output_directory.join(INDEX_FILE)).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_build_hello() -> Result<()> {
        let root = project();
        post(
            root.path(),
            "hello.md",
            "---\ntitle: \"Hello\"\ndate: \"2024-01-01\"\n---\n# Hi\n",
        );
        let config = Config::new(root.path());

        let records = build_site(&config)?;
        assert_eq!(records.len(), 1);

        let page =
            fs::read_to_string(config.posts_output_directory.join("hello.html")).unwrap();
        assert!(page.contains("<title>Hello</title>"));
        assert!(page.contains("<div class=\"post-date\">1/1/2024</div>"));
        assert!(page.contains("<h1>Hi</h1>"));

        assert_eq!(
            read_index(&config),
            json!([{"title": "Hello", "date": "2024-01-01", "slug": "hello"}])
        );
        assert_eq!(
            fs::read_to_string(config.output_directory.join("styles.css")).unwrap(),
            "body { margin: 0 }"
        );
        assert!(config.output_directory.join("index.html").is_file());
        Ok(())
    }

    #[test]
    fn test_build_orders_newest_first() -> Result<()> {
        let root = project();
        post(root.path(), "january.md", "---\ntitle: January\ndate: 2024-01-01\n---\n");
        post(root.path(), "february.md", "---\ntitle: February\ndate: 2024-02-01\n---\n");
        let config = Config::new(root.path());

        build_site(&config)?;

        let index = read_index(&config);
        assert_eq!(index[0]["slug"], "february");
        assert_eq!(index[1]["slug"], "january");
        Ok(())
    }

    #[test]
    fn test_build_equal_dates_keep_processing_order() -> Result<()> {
        let root = project();
        for name in ["c", "a", "b"] {
            post(
                root.path(),
                &format!("{}.md", name),
                "---\ntitle: Same day\ndate: 2024-05-05\n---\n",
            );
        }
        let config = Config::new(root.path());

        let records = build_site(&config)?;
        let slugs: Vec<&str> = records.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b", "c"]);
        Ok(())
    }

    #[test]
    fn test_build_one_page_per_markdown_file() -> Result<()> {
        let root = project();
        post(root.path(), "one.md", "---\ntitle: One\ndate: 2024-01-01\n---\n");
        post(root.path(), "two.md", "---\ntitle: Two\ndate: 2024-01-02\n---\n");
        post(root.path(), "notes.txt", "not a post");
        post(root.path(), "UPPER.MD", "not a post either");
        let config = Config::new(root.path());

        build_site(&config)?;

        let mut pages: Vec<String> = fs::read_dir(&config.posts_output_directory)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        pages.sort();
        assert_eq!(pages, vec!["index.json", "one.html", "two.html"]);
        assert_eq!(read_index(&config).as_array().map(Vec::len), Some(2));
        Ok(())
    }

    #[test]
    fn test_build_missing_date_still_renders() -> Result<()> {
        let root = project();
        post(root.path(), "undated.md", "---\ntitle: Undated\n---\nNo date here.\n");
        post(root.path(), "dated.md", "---\ntitle: Dated\ndate: 2024-01-01\n---\n");
        let config = Config::new(root.path());

        build_site(&config)?;

        let page =
            fs::read_to_string(config.posts_output_directory.join("undated.html")).unwrap();
        assert!(page.contains("<div class=\"post-date\"></div>"));
        assert!(page.contains("<p>No date here.</p>"));
        assert_eq!(
            read_index(&config),
            json!([
                {"title": "Dated", "date": "2024-01-01", "slug": "dated"},
                {"title": "Undated", "slug": "undated"}
            ])
        );
        Ok(())
    }

    #[test]
    fn test_build_twice_is_idempotent() -> Result<()> {
        let root = project();
        post(root.path(), "a.md", "---\ntitle: A\ndate: 2024-01-01\n---\n# A\n");
        post(root.path(), "b.md", "---\ntitle: B\ndate: 2023-06-01\n---\n*b*\n");
        let config = Config::new(root.path());

        build_site(&config)?;
        let snapshot = |name: &str| fs::read(config.posts_output_directory.join(name)).unwrap();
        let first = (snapshot("a.html"), snapshot("b.html"), snapshot(INDEX_FILE));

        build_site(&config)?;
        let second = (snapshot("a.html"), snapshot("b.html"), snapshot(INDEX_FILE));

        assert_eq!(first, second);
        assert_eq!(read_index(&config).as_array().map(Vec::len), Some(2));
        Ok(())
    }

    #[test]
    fn test_build_empty_blog() -> Result<()> {
        let root = project();
        let config = Config::new(root.path());
        assert!(build_site(&config)?.is_empty());
        assert_eq!(read_index(&config), json!([]));
        Ok(())
    }

    #[test]
    fn test_build_missing_static_file() {
        let root = project();
        fs::remove_file(root.path().join("styles.css")).unwrap();
        let config = Config::new(root.path());
        assert!(matches!(
            build_site(&config),
            Err(Error::Prepare(prepare::Error::MissingAsset(_)))
        ));
    }

    #[test]
    fn test_build_missing_posts_directory() {
        let root = project();
        fs::remove_dir(root.path().join("posts")).unwrap();
        let config = Config::new(root.path());
        assert!(matches!(
            build_site(&config),
            Err(Error::Parse(parser::Error::ReadDirectory { .. }))
        ));
    }

    #[test]
    fn test_build_into_custom_output() -> Result<()> {
        let root = project();
        post(root.path(), "p.md", "---\ntitle: P\ndate: 2024-01-01\n---\n");
        let out = TempDir::new().unwrap();
        let config = Config::new(root.path()).with_output_directory(out.path().join("site"));

        build_site(&config)?;

        assert!(out.path().join("site").join("posts").join("p.html").is_file());
        assert!(out.path().join("site").join("styles.css").is_file());
        assert!(!root.path().join("dist").exists());
        Ok(())
    }
}
