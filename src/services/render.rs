// src/services/render.rs
use std::fmt::Debug;
use std::sync::LazyLock;

use regex::Regex;

static IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://\S+\.(jpg|jpeg|png|gif)").expect("image url pattern is valid")
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderToken {
    Text(String),
    Image(String),
}

/// Turns reply text into the ordered tokens the view draws.
pub trait TextTransform: Debug + Send + Sync {
    fn tokens(&self, text: &str) -> Vec<RenderToken>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PlainText;

impl TextTransform for PlainText {
    fn tokens(&self, text: &str) -> Vec<RenderToken> {
        vec![RenderToken::Text(text.to_string())]
    }
}

/// Keeps the text as-is and adds the first image link found as an inline image.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageLinkDetector;

impl ImageLinkDetector {
    pub fn first_image(text: &str) -> Option<&str> {
        IMAGE_URL.find(text).map(|m| m.as_str())
    }
}

impl TextTransform for ImageLinkDetector {
    fn tokens(&self, text: &str) -> Vec<RenderToken> {
        let mut tokens = vec![RenderToken::Text(text.to_string())];
        if let Some(url) = Self::first_image(text) {
            tokens.push(RenderToken::Image(url.to_string()));
        }
        tokens
    }
}
