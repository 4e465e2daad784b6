use pulldown_cmark::{html, Options, Parser};

/// Converts a markdown body into an HTML fragment.
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// A CommonMark renderer backed by [`pulldown_cmark`] with the GitHub
/// flavoured extensions most blogs expect (tables, strikethrough and task
/// lists).
#[derive(Clone, Copy, Debug)]
pub struct CommonMark {
    options: Options,
}

impl Default for CommonMark {
    fn default() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        CommonMark { options }
    }
}

impl CommonMark {
    /// A renderer with exactly `options` enabled.
    pub fn with_options(options: Options) -> Self {
        CommonMark { options }
    }
}

impl MarkdownRenderer for CommonMark {
    fn render(&self, markdown: &str) -> String {
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, Parser::new_ext(markdown, self.options));
        out
    }
}
