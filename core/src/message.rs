//! Rendering for chat message objects.

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::render::MarkdownRenderer;
use crate::render::RenderOptions;

/// The part of a chat message the renderer cares about. Other fields of the
/// incoming object are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Raw, untrusted markdown authored by the user.
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Sanitized HTML fragment, safe to insert as-is.
    pub html: String,
}

impl MarkdownRenderer {
    pub fn render_message(&self, message: &ChatMessage) -> RenderedMessage {
        debug!(
            id = message.id.as_deref().unwrap_or("<none>"),
            content_bytes = message.content.len(),
            "rendering chat message"
        );
        RenderedMessage {
            id: message.id.clone(),
            html: self.render(&message.content),
        }
    }
}

pub fn render_message(message: &ChatMessage, options: RenderOptions) -> RenderedMessage {
    MarkdownRenderer::new(options).render_message(message)
}
