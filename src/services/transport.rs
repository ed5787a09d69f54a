// src/services/transport.rs
use std::future::Future;

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::message::{ChatRequest, ChatResponse, ErrorBody};

/// Where the widget sends every message.
pub const CHAT_ENDPOINT: &str = "http://127.0.0.1:8000/chat";

/// One request, one reply. No retry, no timeout, no cancellation.
pub trait Transport: Clone + Send + Sync + 'static {
    fn send(&self, text: &str) -> impl Future<Output = Result<ChatResponse, TransportError>> + Send;
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::with_endpoint(CHAT_ENDPOINT)
    }

    /// Point at another `/chat` URL; used against local stub servers.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    async fn send(&self, text: &str) -> Result<ChatResponse, TransportError> {
        debug!(endpoint = %self.endpoint, len = text.len(), "posting chat message");

        // .json() also sets Content-Type: application/json
        let res = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest::new(text))
            .send()
            .await?;

        let status = res.status();
        let body = res.bytes().await?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail);
            warn!(status = status.as_u16(), ?detail, "chat endpoint returned an error status");
            return Err(TransportError::Status { status: status.as_u16(), detail });
        }

        let reply: ChatResponse = serde_json::from_slice(&body)?;
        debug!(has_reply = reply.response.is_some(), "chat reply received");
        Ok(reply)
    }
}
