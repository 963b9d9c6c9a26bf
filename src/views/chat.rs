use crate::config::ApiConfig;
use crate::controller::TranscriptController;
use crate::gateway::{Gateway, HttpGateway};
use crate::storage::{PlatformStorage, platform_storage};
use crate::transcript::{
    BOT_LABEL, RenderedContent, RenderedMessage, RenderedTranscript, TranscriptEntry,
};
use crate::types::{Mode, Sender};
use dioxus::events::Key;
use dioxus::prelude::*;
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

const SCROLL_TO_BOTTOM_JS: &str = r#"
const list = document.getElementById('chatMessages');
if (list) { list.scrollTop = list.scrollHeight; }
"#;

type AppController = TranscriptController<PlatformStorage, RenderedTranscript>;

fn build_controller() -> AppController {
    let api = ApiConfig::detect();
    TranscriptController::new(
        platform_storage(),
        RenderedTranscript::new(),
        Arc::new(HttpGateway::new(api.base_url)),
    )
}

fn format_message_timestamp(timestamp: &str) -> Option<String> {
    let mut datetime = OffsetDateTime::parse(timestamp, &Rfc3339).ok()?;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

fn mode_button_class(active: bool) -> &'static str {
    if active { "mode-btn active" } else { "mode-btn" }
}

#[component]
pub fn ChatView() -> Element {
    let mut controller = use_signal(build_controller);
    let mut input = use_signal(String::new);

    // reading the entry count subscribes the effect, so it reruns on every
    // change to the list; the scroll script returns nothing worth awaiting
    use_effect(move || {
        if controller.read().view().len() > 0 {
            document::eval(SCROLL_TO_BOTTOM_JS);
        }
    });

    let mut send_message = move |text: String| {
        let submission = match controller.with_mut(|c| c.begin_submission(&text)) {
            Ok(submission) => submission,
            Err(_) => return,
        };
        input.set(String::new());

        let gateway = controller.read().gateway();
        spawn(async move {
            let result = gateway.dispatch(submission.request()).await;
            controller.with_mut(|c| c.finish_submission(submission, result));
        });
    };

    let current_mode = controller.read().mode();
    let entries = controller.read().view().entries().to_vec();
    let text_mode_class = mode_button_class(current_mode == Mode::Text);
    let image_mode_class = mode_button_class(current_mode == Mode::Image);

    rsx! {
        div { class: "main-container",
            div { class: "chat-toolbar",
                div { class: "mode-buttons",
                    button {
                        id: "textMode",
                        class: "{text_mode_class}",
                        r#type: "button",
                        onclick: move |_| controller.with_mut(|c| c.set_mode(Mode::Text)),
                        "💬 Text"
                    }
                    button {
                        id: "imageMode",
                        class: "{image_mode_class}",
                        r#type: "button",
                        onclick: move |_| controller.with_mut(|c| c.set_mode(Mode::Image)),
                        "🎨 Image"
                    }
                }
                button {
                    id: "clearChat",
                    class: "btn btn-ghost",
                    r#type: "button",
                    onclick: move |_| controller.with_mut(|c| c.clear()),
                    "Clear Chat"
                }
            }

            div { id: "chatMessages", class: "chat-messages",
                for entry in entries.iter() {
                    EntryRow { key: "{entry.key()}", entry: entry.clone() }
                }
            }

            form { class: "composer",
                div { class: "composer-inner",
                    textarea {
                        id: "messageInput",
                        rows: "1",
                        placeholder: "{current_mode.input_placeholder()}",
                        value: "{input}",
                        oninput: move |ev| input.set(ev.value()),
                        onkeydown: move |ev| {
                            if ev.key() == Key::Enter && !ev.modifiers().shift() {
                                ev.prevent_default();
                                send_message(input());
                            }
                        },
                        autofocus: true,
                    }
                    button {
                        id: "sendButton",
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: input().trim().is_empty(),
                        onclick: move |_| send_message(input()),
                        "Send"
                    }
                }
            }
        }
    }
}

#[component]
fn EntryRow(entry: TranscriptEntry) -> Element {
    match entry {
        TranscriptEntry::Message(message) => rsx! { MessageBubble { message } },
        TranscriptEntry::Typing(_) => rsx! { TypingIndicator {} },
    }
}

#[component]
fn MessageBubble(message: RenderedMessage) -> Element {
    let is_bot = message.sender == Sender::Bot;
    let row_class = format!("message {}-message", message.sender.as_str());
    let timestamp = format_message_timestamp(&message.timestamp);
    let body = match &message.content {
        RenderedContent::PlainText(text) => rsx! {
            span { class: "message-text", "{text}" }
        },
        RenderedContent::TextWithImage { text, url } => rsx! {
            span { class: "message-text", "{text}" }
            img { class: "message-image", src: "{url}", alt: "Generated image" }
        },
    };

    rsx! {
        div { class: "{row_class}",
            div { class: "message-content",
                if is_bot {
                    strong { class: "bot-label", "{BOT_LABEL} " }
                }
                {body}
            }
            if let Some(ts) = timestamp {
                div { class: "message-meta",
                    span { class: "message-timestamp", "{ts}" }
                }
            }
        }
    }
}

#[component]
fn TypingIndicator() -> Element {
    rsx! {
        div { class: "message bot-message",
            div { class: "typing-indicator",
                strong { class: "bot-label", "{BOT_LABEL}" }
                div { class: "typing-dots",
                    span {}
                    span {}
                    span {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_stored_timestamps_as_clock_time() {
        let formatted = format_message_timestamp("2024-05-01T09:30:00.123Z").unwrap();
        assert!(formatted.ends_with("AM") || formatted.ends_with("PM"));
        assert_eq!(formatted.len(), "09:30 AM".len());
    }

    #[test]
    fn unparseable_timestamps_are_skipped() {
        assert_eq!(format_message_timestamp("yesterday"), None);
    }
}
