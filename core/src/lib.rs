//! Markdown rendering for chat messages.
//!
//! Untrusted markdown is parsed with pulldown-cmark, bare URLs are
//! autolinked, and the resulting HTML is cleaned against a fixed allow-list
//! so it can be inserted into a page without further escaping.

mod autolink;
pub mod config;
pub mod error;
mod flatten;
pub mod message;
pub mod policy;
pub mod render;

pub use config::Config;
pub use config::ConfigOverrides;
pub use error::ConfigError;
pub use message::ChatMessage;
pub use message::RenderedMessage;
pub use message::render_message;
pub use policy::sanitize_html;
pub use render::MarkdownRenderer;
pub use render::RenderOptions;
pub use render::render;
pub use render::render_with_options;
