// src/config.rs

/// Cosmetic options that distinguish one widget variant from another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetConfig {
    pub user_label: String,
    pub bot_label: String,
    pub loading_text: String,
    /// Shown when the server answers without a `response` field.
    pub fallback_reply: String,
    pub error_prefix: String,
    pub detect_images: bool,
    pub quick_replies: Vec<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            user_label: "You".to_string(),
            bot_label: "Bot".to_string(),
            loading_text: "Thinking...".to_string(),
            fallback_reply: "No response from server".to_string(),
            error_prefix: "Error: ".to_string(),
            detect_images: true,
            quick_replies: vec![
                "Which products are in stock?".to_string(),
                "Show me the latest orders".to_string(),
            ],
        }
    }
}

impl WidgetConfig {
    /// The bare variant: no images, no quick replies.
    pub fn minimal() -> Self {
        Self {
            detect_images: false,
            quick_replies: Vec::new(),
            ..Self::default()
        }
    }

    pub fn with_fallback_reply(mut self, text: impl Into<String>) -> Self {
        self.fallback_reply = text.into();
        self
    }

    pub fn with_error_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.error_prefix = prefix.into();
        self
    }

    pub fn with_loading_text(mut self, text: impl Into<String>) -> Self {
        self.loading_text = text.into();
        self
    }

    pub fn with_image_detection(mut self, enabled: bool) -> Self {
        self.detect_images = enabled;
        self
    }

    pub fn with_quick_replies<I, S>(mut self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.quick_replies = replies.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_override_single_options() {
        let config = WidgetConfig::minimal()
            .with_error_prefix("Oops: ")
            .with_loading_text("...")
            .with_image_detection(true)
            .with_quick_replies(["Orders"]);

        assert_eq!(config.error_prefix, "Oops: ");
        assert_eq!(config.loading_text, "...");
        assert!(config.detect_images);
        assert_eq!(config.quick_replies, vec!["Orders".to_string()]);
        assert_eq!(config.fallback_reply, WidgetConfig::default().fallback_reply);
    }
}
