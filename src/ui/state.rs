use chrono::{DateTime, Local};

use crate::common::{ChatMessage, ConversationContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// A single rendered message row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub direction: Direction,
    pub text: String,
    pub timestamp: Option<String>,
}

/// UI-side state of one chat window.
pub struct ChatSession {
    context: ConversationContext,
    pub bubbles: Vec<Bubble>,
    pub input_text: String,
    /// Length of the message list behind `bubbles`; a cheap dirty check.
    last_render_count: usize,
    last_rendered_at: Option<DateTime<Local>>,
    scroll_to_bottom: bool,
}

impl ChatSession {
    pub fn new(context: ConversationContext) -> Self {
        Self {
            context,
            bubbles: Vec::new(),
            input_text: String::new(),
            last_render_count: 0,
            last_rendered_at: None,
            scroll_to_bottom: false,
        }
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn last_render_count(&self) -> usize {
        self.last_render_count
    }

    pub fn last_rendered_at(&self) -> Option<DateTime<Local>> {
        self.last_rendered_at
    }

    /// Rebuilds the bubbles when the fetched count differs from the last render.
    ///
    /// Edits that keep the count unchanged are not picked up. Returns whether a
    /// render happened.
    pub fn apply_fetch(&mut self, messages: Vec<ChatMessage>) -> bool {
        if messages.len() == self.last_render_count {
            return false;
        }

        self.last_render_count = messages.len();
        self.bubbles = messages
            .into_iter()
            .map(|message| {
                let direction = if self.context.is_outgoing(&message) {
                    Direction::Outgoing
                } else {
                    Direction::Incoming
                };
                Bubble {
                    direction,
                    text: message.content,
                    timestamp: message.timestamp,
                }
            })
            .collect();
        self.last_rendered_at = Some(Local::now());
        self.scroll_to_bottom = true;

        log::debug!("Rendered {} bubbles", self.last_render_count);
        true
    }

    /// Trimmed input ready to send, or `None` when there is nothing to send.
    ///
    /// The input itself is only cleared once the send completes.
    pub fn take_outgoing(&self) -> Option<String> {
        let content = self.input_text.trim();
        if content.is_empty() {
            None
        } else {
            Some(content.to_string())
        }
    }

    pub fn message_sent(&mut self) {
        self.input_text.clear();
    }

    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_bottom)
    }
}
