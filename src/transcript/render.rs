use crate::types::Sender;
use once_cell::sync::Lazy;
use regex::Regex;

/// Label shown before every bot message.
pub const BOT_LABEL: &str = "Parley AI:";

pub const GREETING: &str = "Hello! I'm Parley AI, your AI assistant. I can help you with text conversations and generate images. How can I assist you today?";

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("URL pattern is valid"));

/// Display shape of a message body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderedContent {
    PlainText(String),
    /// `text` is the content with the image URL cut out.
    TextWithImage { text: String, url: String },
}

impl RenderedContent {
    pub fn text(&self) -> &str {
        match self {
            RenderedContent::PlainText(text) => text,
            RenderedContent::TextWithImage { text, .. } => text,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            RenderedContent::PlainText(_) => None,
            RenderedContent::TextWithImage { url, .. } => Some(url),
        }
    }
}

/// Decide how a message body is displayed.
///
/// Only bot replies are scanned. The first `http(s)://` run of non-whitespace
/// becomes the image source whatever it points at; later URLs stay in the text.
pub fn classify_content(sender: Sender, content: &str) -> RenderedContent {
    if sender == Sender::Bot
        && let Some(found) = URL_PATTERN.find(content)
    {
        let mut text = String::with_capacity(content.len());
        text.push_str(&content[..found.start()]);
        text.push_str(&content[found.end()..]);
        return RenderedContent::TextWithImage {
            text,
            url: found.as_str().to_string(),
        };
    }
    RenderedContent::PlainText(content.to_string())
}
