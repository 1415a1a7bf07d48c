use pulldown_cmark::Event;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::TextMergeStream;
use pulldown_cmark::html;
use serde::Deserialize;
use serde::Serialize;
use tracing::trace;

use crate::autolink::Autolinker;
use crate::flatten::Flattener;
use crate::policy::sanitize_html;

/// Parser behavior for a [`MarkdownRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    /// Render a single newline inside a paragraph as `<br>` instead of a
    /// space, the way chat users expect.
    pub breaks: bool,

    /// Enable GitHub-flavored extensions: tables, `~~strikethrough~~`, task
    /// lists and bare-URL autolinks. Tables render as one paragraph per row
    /// and task-list checkboxes are stripped; only their text remains.
    pub gfm: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            breaks: true,
            gfm: true,
        }
    }
}

impl RenderOptions {
    fn parser_options(self) -> Options {
        let mut options = Options::empty();
        if self.gfm {
            options.insert(Options::ENABLE_TABLES);
            options.insert(Options::ENABLE_STRIKETHROUGH);
            options.insert(Options::ENABLE_TASKLISTS);
        }
        options
    }
}

/// Turns untrusted chat markdown into an HTML fragment that only contains
/// allow-listed markup.
///
/// Rendering is total: malformed markdown degrades to escaped text and
/// disallowed markup is stripped, so there is no error path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn render(&self, content: &str) -> String {
        let html = self.markdown_to_html(content);
        let sanitized = sanitize_html(&html);
        trace!(
            input_bytes = content.len(),
            html_bytes = html.len(),
            output_bytes = sanitized.len(),
            "rendered markdown"
        );
        sanitized
    }

    /// Unsanitized parser output. Never hand this to a caller.
    fn markdown_to_html(self, content: &str) -> String {
        let breaks = self.options.breaks;
        let events = TextMergeStream::new(Parser::new_ext(
            content,
            self.options.parser_options(),
        ))
        .map(move |event| match event {
            Event::SoftBreak if breaks => Event::HardBreak,
            other => other,
        });

        let mut out = String::with_capacity(content.len() + content.len() / 2);
        if self.options.gfm {
            html::push_html(&mut out, Flattener::new(Autolinker::new(events)));
        } else {
            html::push_html(&mut out, Flattener::new(events));
        }
        out
    }
}

/// Renders `content` with the default options (`breaks` and `gfm` on).
pub fn render(content: &str) -> String {
    MarkdownRenderer::default().render(content)
}

pub fn render_with_options(content: &str, options: RenderOptions) -> String {
    MarkdownRenderer::new(options).render(content)
}
