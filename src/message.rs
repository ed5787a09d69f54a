// src/message.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
}

impl ChatResponse {
    pub fn reply(text: impl Into<String>) -> Self {
        Self { response: Some(text.into()) }
    }

    /// The reply text, or `fallback` when the server sent nothing usable.
    pub fn reply_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.response.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => fallback,
        }
    }
}

/// Body a failing server sends next to a non-2xx status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_null_response_fall_back() {
        let empty: ChatResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.reply_or("fallback"), "fallback");

        let null: ChatResponse = serde_json::from_str(r#"{"response": null}"#).unwrap();
        assert_eq!(null.reply_or("fallback"), "fallback");

        let blank: ChatResponse = serde_json::from_str(r#"{"response": ""}"#).unwrap();
        assert_eq!(blank.reply_or("fallback"), "fallback");
    }

    #[test]
    fn request_serializes_as_message_object() {
        let body = serde_json::to_string(&ChatRequest::new("Hello")).unwrap();
        assert_eq!(body, r#"{"message":"Hello"}"#);
    }
}
