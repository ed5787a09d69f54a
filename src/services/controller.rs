// src/services/controller.rs
use tracing::{debug, info, warn};

use crate::config::WidgetConfig;
use crate::error::TransportError;
use crate::message::ChatResponse;
use crate::services::render::{ImageLinkDetector, PlainText, TextTransform};
use crate::services::transport::Transport;
use crate::state::{ChatMessage, ChatView, Focus, MessageId, MessageKind, Sender};

const SCROLL_STEP: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sending { placeholder: MessageId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Succeeded,
    Failed,
}

/// A request that has been shown on screen but not yet sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    pub placeholder: MessageId,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submit {
    /// Nothing to send after trimming.
    Empty,
    /// A request is already in flight; the trigger is disabled.
    Busy,
    Started(PendingRequest),
    /// The event was not a send action.
    Ignored,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Char(char),
    Backspace,
    /// Enter pressed; only sends while the input field has focus.
    Enter,
    FormSubmit,
    QuickReply(usize),
    ToggleFocus,
    ScrollUp,
    ScrollDown,
}

#[derive(Debug)]
pub struct ChatController<T> {
    transport: T,
    view: ChatView,
    config: WidgetConfig,
    transform: Box<dyn TextTransform>,
    phase: Phase,
}

impl<T: Transport> ChatController<T> {
    pub fn new(transport: T, config: WidgetConfig) -> Self {
        let transform: Box<dyn TextTransform> = if config.detect_images {
            Box::new(ImageLinkDetector)
        } else {
            Box::new(PlainText)
        };
        Self {
            transport,
            view: ChatView::new(),
            config,
            transform,
            phase: Phase::Idle,
        }
    }

    pub fn with_transform(mut self, transform: impl TextTransform + 'static) -> Self {
        self.transform = Box::new(transform);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn view(&self) -> &ChatView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ChatView {
        &mut self.view
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Put the user's message and a loading placeholder on screen.
    ///
    /// Nothing changes when the trimmed text is empty or a request is
    /// already in flight.
    pub fn begin_submit(&mut self, raw: &str) -> Submit {
        self.start(raw, true)
    }

    // `from_input` is false for quick replies, which leave any draft alone.
    fn start(&mut self, raw: &str, from_input: bool) -> Submit {
        let text = raw.trim();
        if text.is_empty() {
            return Submit::Empty;
        }
        if let Phase::Sending { placeholder } = self.phase {
            debug!(%placeholder, "submit ignored while a request is in flight");
            return Submit::Busy;
        }

        self.view.push(ChatMessage::new(Sender::User, MessageKind::Normal, text));
        if from_input {
            self.view.clear_input();
        }
        let placeholder = self.view.push(ChatMessage::new(
            Sender::Bot,
            MessageKind::Loading,
            self.config.loading_text.clone(),
        ));
        self.view.set_input_enabled(false);
        self.phase = Phase::Sending { placeholder };

        Submit::Started(PendingRequest { placeholder, text: text.to_string() })
    }

    /// Replace the placeholder with the reply or an error message.
    ///
    /// Returns `None` when `placeholder` does not belong to the request in flight.
    pub fn complete(
        &mut self,
        placeholder: MessageId,
        result: Result<ChatResponse, TransportError>,
    ) -> Option<Completion> {
        if self.phase != (Phase::Sending { placeholder }) {
            warn!(%placeholder, "dropping result for a request that is not in flight");
            return None;
        }

        self.view.remove(placeholder);
        self.phase = Phase::Idle;
        self.view.set_input_enabled(true);

        match result {
            Ok(reply) => {
                let text = reply.reply_or(&self.config.fallback_reply).to_string();
                let body = self.transform.tokens(&text);
                self.view.push(ChatMessage::new(Sender::Bot, MessageKind::Normal, text).with_body(body));
                info!("chat reply displayed");
                Some(Completion::Succeeded)
            }
            Err(err) => {
                warn!(error = %err, "chat request failed");
                let text = format!("{}{err}", self.config.error_prefix);
                self.view.push(ChatMessage::new(Sender::Bot, MessageKind::Error, text));
                Some(Completion::Failed)
            }
        }
    }

    /// Submit, send and complete in one go.
    pub async fn submit(&mut self, raw: &str) -> Option<Completion> {
        match self.begin_submit(raw) {
            Submit::Started(pending) => self.send_pending(pending).await,
            _ => None,
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Submit {
        match event {
            InputEvent::Char(_) | InputEvent::Backspace if !self.view.is_input_enabled() => {
                Submit::Ignored
            }
            InputEvent::Char(c) => {
                self.view.insert_char(c);
                Submit::Ignored
            }
            InputEvent::Backspace => {
                self.view.backspace();
                Submit::Ignored
            }
            InputEvent::Enter if self.view.focus() != Focus::Input => Submit::Ignored,
            InputEvent::Enter | InputEvent::FormSubmit => {
                let text = self.view.input().to_string();
                self.begin_submit(&text)
            }
            InputEvent::QuickReply(index) => match self.config.quick_replies.get(index) {
                Some(reply) => {
                    let reply = reply.clone();
                    self.start(&reply, false)
                }
                None => Submit::Ignored,
            },
            InputEvent::ToggleFocus => {
                self.view.toggle_focus();
                Submit::Ignored
            }
            InputEvent::ScrollUp => {
                self.view.scroll_up(SCROLL_STEP);
                Submit::Ignored
            }
            InputEvent::ScrollDown => {
                self.view.scroll_down(SCROLL_STEP);
                Submit::Ignored
            }
        }
    }

    /// Handle an input event and, if it started a request, see it through.
    pub async fn dispatch(&mut self, event: InputEvent) -> Option<Completion> {
        match self.handle_input(event) {
            Submit::Started(pending) => self.send_pending(pending).await,
            _ => None,
        }
    }

    async fn send_pending(&mut self, pending: PendingRequest) -> Option<Completion> {
        let result = self.transport.send(&pending.text).await;
        self.complete(pending.placeholder, result)
    }
}
