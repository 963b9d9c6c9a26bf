use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};

/// Millisecond-precision UTC timestamps, e.g. `2024-05-01T09:30:00.123Z`.
const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

/// A single transcript entry. Fields are fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    sender: Sender,
    content: String,
    timestamp: String,
}

impl Message {
    /// Create a message stamped with the current time.
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self::with_timestamp(sender, content, now_timestamp())
    }

    pub fn with_timestamp(
        sender: Sender,
        content: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

pub fn now_timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_default()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Text,
    Image,
}

impl Mode {
    pub fn input_placeholder(self) -> &'static str {
        match self {
            Mode::Text => {
                "Type your message here... (For images, start with 'generate image' or 'create image')"
            }
            Mode::Image => "Describe the image you want to generate...",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Label for the toggle button: it names the mode a click switches to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            ThemeMode::Light => "🌙 Dark Mode",
            ThemeMode::Dark => "☀️ Light Mode",
        }
    }
}
