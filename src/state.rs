// src/state.rs
use std::fmt;

use uuid::Uuid;

use crate::services::render::RenderToken;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Normal,
    Error,
    Loading,
}

#[derive(Clone, Debug)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: Sender,
    pub kind: MessageKind,
    pub text: String,
    pub body: Vec<RenderToken>,
}

impl ChatMessage {
    pub fn new(sender: Sender, kind: MessageKind, text: impl Into<String>) -> Self {
        let text = text.into();
        let body = vec![RenderToken::Text(text.clone())];
        Self { id: MessageId::new(), sender, kind, text, body }
    }

    pub fn with_body(mut self, body: Vec<RenderToken>) -> Self {
        self.body = body;
        self
    }

    pub fn images(&self) -> impl Iterator<Item = &str> {
        self.body.iter().filter_map(|token| match token {
            RenderToken::Image(url) => Some(url.as_str()),
            RenderToken::Text(_) => None,
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Input,
    MessageList,
}

/// The visible widget: message list, input field and scroll anchor.
///
/// Owned by exactly one controller; nothing looks it up ambiently.
#[derive(Clone, Debug)]
pub struct ChatView {
    messages: Vec<ChatMessage>,
    input: String,
    focus: Focus,
    input_enabled: bool,
    // rows above the bottom; 0 means anchored to the newest message
    scroll_back: usize,
    // furthest scroll_back that still shows content, from the last draw
    max_scroll_back: usize,
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            focus: Focus::Input,
            input_enabled: true,
            scroll_back: 0,
            max_scroll_back: 0,
        }
    }

    // Append a message and re-anchor the list to the bottom.
    pub fn push(&mut self, message: ChatMessage) -> MessageId {
        let id = message.id;
        self.messages.push(message);
        self.scroll_to_bottom();
        id
    }

    /// Remove a message by id
    pub fn remove(&mut self, id: MessageId) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        before != self.messages.len()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn loading_count(&self) -> usize {
        self.messages.iter().filter(|m| m.kind == MessageKind::Loading).count()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::MessageList,
            Focus::MessageList => Focus::Input,
        };
    }

    pub fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }

    pub fn is_at_bottom(&self) -> bool {
        self.scroll_back == 0
    }

    /// Record the drawn pane size so scrolling stops at the oldest line.
    pub fn set_viewport(&mut self, total_lines: usize, height: usize) {
        self.max_scroll_back = total_lines.saturating_sub(height);
        self.scroll_back = self.scroll_back.min(self.max_scroll_back);
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll_back = self.scroll_back.saturating_add(rows).min(self.max_scroll_back);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(rows);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_back = 0;
    }
}
