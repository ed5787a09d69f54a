// src/error.rs
use thiserror::Error;

/// Everything that can go wrong between pressing send and having a reply.
///
/// The widget never distinguishes these for recovery: every variant ends up
/// as a single error bubble. The variants only shape the description.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server responded with {status}{}", detail_suffix(.detail.as_deref()))]
    Status { status: u16, detail: Option<String> },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

fn detail_suffix(detail: Option<&str>) -> String {
    match detail {
        Some(d) if !d.is_empty() => format!(": {d}"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_includes_server_detail() {
        let err = TransportError::Status { status: 500, detail: Some("store offline".into()) };
        assert_eq!(err.to_string(), "server responded with 500: store offline");

        let bare = TransportError::Status { status: 404, detail: None };
        assert_eq!(bare.to_string(), "server responded with 404");

        let blank = TransportError::Status { status: 502, detail: Some(String::new()) };
        assert_eq!(blank.to_string(), "server responded with 502");
    }
}
