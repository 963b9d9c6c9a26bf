//! Input routing: decides whether a submission is a chat turn or an image prompt.

use crate::types::Mode;

/// Prefixes that turn a text-mode message into an image request, checked in order.
const IMAGE_PREFIXES: [&str; 2] = ["generate image", "create image"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Chat { text: String },
    Image { prompt: String },
}

impl Request {
    pub fn is_image(&self) -> bool {
        matches!(self, Request::Image { .. })
    }
}

/// Trim raw input; `None` when nothing is left to send.
pub fn normalize_input(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Classify already-normalized input.
pub fn route(input: &str, mode: Mode) -> Request {
    if mode == Mode::Image {
        return Request::Image {
            prompt: input.to_string(),
        };
    }

    for prefix in IMAGE_PREFIXES {
        if let Some(rest) = strip_prefix_ignore_case(input, prefix) {
            return Request::Image {
                prompt: rest.trim().to_string(),
            };
        }
    }

    Request::Chat {
        text: input.to_string(),
    }
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&input[prefix.len()..])
    } else {
        None
    }
}
