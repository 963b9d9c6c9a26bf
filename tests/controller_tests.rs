//! Integration tests for the transcript controller
//!
//! Runs full submissions against in-memory storage and a scripted gateway.

use async_trait::async_trait;
use parley::controller::{SubmitError, SubmitOutcome, TranscriptController};
use parley::gateway::{FALLBACK_MESSAGE, Gateway, GatewayError, GatewayResult};
use parley::router::Request;
use parley::storage::{MemoryStorage, SlotStorage};
use parley::transcript::{
    GREETING, RenderedContent, RenderedTranscript, TRANSCRIPT_SLOT, TranscriptEntry,
    TranscriptStore,
};
use parley::types::{Message, Mode, Sender};
use std::sync::{Arc, Mutex};

struct ScriptedGateway {
    reply: GatewayResult<String>,
    calls: Mutex<Vec<Request>>,
}

impl ScriptedGateway {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err(GatewayError::new("503 Service Unavailable")),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Request> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn chat(&self, text: &str) -> GatewayResult<String> {
        self.calls.lock().unwrap().push(Request::Chat {
            text: text.to_string(),
        });
        self.reply.clone()
    }

    async fn generate_image(&self, prompt: &str) -> GatewayResult<String> {
        self.calls.lock().unwrap().push(Request::Image {
            prompt: prompt.to_string(),
        });
        self.reply.clone()
    }
}

type TestController = TranscriptController<MemoryStorage, RenderedTranscript>;

fn controller_with(storage: &MemoryStorage, gateway: &Arc<ScriptedGateway>) -> TestController {
    TranscriptController::new(
        storage.clone(),
        RenderedTranscript::new(),
        Arc::clone(gateway) as Arc<dyn Gateway>,
    )
}

fn stored_messages(storage: &MemoryStorage) -> Option<Vec<Message>> {
    storage
        .get(TRANSCRIPT_SLOT)
        .unwrap()
        .map(|raw| serde_json::from_str(&raw).expect("stored transcript should parse"))
}

fn contents(messages: &[Message]) -> Vec<(Sender, &str)> {
    messages
        .iter()
        .map(|msg| (msg.sender(), msg.content()))
        .collect()
}

mod startup_tests {
    use super::*;

    #[test]
    fn test_fresh_start_seeds_greeting() {
        let storage = MemoryStorage::new();
        let controller = controller_with(&storage, &ScriptedGateway::replying("unused"));

        assert_eq!(contents(controller.messages()), vec![(Sender::Bot, GREETING)]);
        assert_eq!(controller.view().len(), 1);
        assert_eq!(controller.mode(), Mode::Text);
        // greeting alone is not written
        assert!(!storage.contains(TRANSCRIPT_SLOT));
    }

    #[test]
    fn test_malformed_stored_transcript_falls_back_to_greeting() {
        let mut storage = MemoryStorage::new();
        storage.set(TRANSCRIPT_SLOT, "{not json").unwrap();

        let controller = controller_with(&storage, &ScriptedGateway::replying("unused"));

        assert_eq!(contents(controller.messages()), vec![(Sender::Bot, GREETING)]);
        assert_eq!(controller.view().len(), 1);
    }

    #[tokio::test]
    async fn test_reload_restores_identical_transcript() {
        let storage = MemoryStorage::new();
        let gateway = ScriptedGateway::replying("Hi there!");

        let mut first = controller_with(&storage, &gateway);
        first.submit("hello").await.unwrap();
        first.submit("how are you?").await.unwrap();
        let before = first.messages().to_vec();

        let second = controller_with(&storage, &gateway);

        assert_eq!(second.messages(), before.as_slice());
        let rendered: Vec<(Sender, String)> = second
            .view()
            .messages()
            .map(|msg| (msg.sender, msg.content.text().to_string()))
            .collect();
        let expected: Vec<(Sender, String)> = before
            .iter()
            .map(|msg| (msg.sender(), msg.content().to_string()))
            .collect();
        assert_eq!(rendered, expected);
    }
}

mod submission_tests {
    use super::*;

    #[tokio::test]
    async fn test_chat_success_appends_user_then_bot() {
        let storage = MemoryStorage::new();
        let gateway = ScriptedGateway::replying("Hello! How can I help?");
        let mut controller = controller_with(&storage, &gateway);

        let outcome = controller.submit("  hello  ").await;

        assert_eq!(outcome, Ok(SubmitOutcome::Replied));
        assert_eq!(
            gateway.calls(),
            vec![Request::Chat {
                text: "hello".to_string()
            }]
        );
        assert_eq!(
            contents(controller.messages()),
            vec![
                (Sender::Bot, GREETING),
                (Sender::User, "hello"),
                (Sender::Bot, "Hello! How can I help?"),
            ]
        );
        assert_eq!(controller.view().typing_count(), 0);
        assert!(controller.is_idle());
        assert_eq!(
            stored_messages(&storage).as_deref(),
            Some(controller.messages())
        );
    }

    #[tokio::test]
    async fn test_failure_appends_fallback_message() {
        let storage = MemoryStorage::new();
        let gateway = ScriptedGateway::failing();
        let mut controller = controller_with(&storage, &gateway);

        let outcome = controller.submit("hello").await;

        assert_eq!(outcome, Ok(SubmitOutcome::Failed));
        let last = controller.messages().last().unwrap();
        assert_eq!(last.sender(), Sender::Bot);
        assert_eq!(last.content(), FALLBACK_MESSAGE);
        assert_eq!(controller.messages().len(), 3);
        assert_eq!(controller.view().typing_count(), 0);
        assert_eq!(stored_messages(&storage).map(|m| m.len()), Some(3));
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let storage = MemoryStorage::new();
        let gateway = ScriptedGateway::replying("unused");
        let mut controller = controller_with(&storage, &gateway);

        for raw in ["", "   ", "\n\t "] {
            assert_eq!(controller.submit(raw).await, Err(SubmitError::EmptyInput));
        }

        assert!(gateway.calls().is_empty());
        assert_eq!(controller.messages().len(), 1);
        assert_eq!(controller.view().len(), 1);
        assert!(!storage.contains(TRANSCRIPT_SLOT));
    }

    #[tokio::test]
    async fn test_image_prefix_routes_to_image_endpoint() {
        let storage = MemoryStorage::new();
        let gateway = ScriptedGateway::replying("Here: https://x.test/a.png done");
        let mut controller = controller_with(&storage, &gateway);

        controller.submit("Generate Image cat").await.unwrap();

        assert_eq!(
            gateway.calls(),
            vec![Request::Image {
                prompt: "cat".to_string()
            }]
        );
        // the echo keeps what the user typed
        assert_eq!(controller.messages()[1].content(), "Generate Image cat");

        let last = controller.view().messages().last().unwrap();
        assert_eq!(
            last.content,
            RenderedContent::TextWithImage {
                text: "Here:  done".to_string(),
                url: "https://x.test/a.png".to_string(),
            }
        );
        // the stored content is untouched by rendering
        assert_eq!(
            controller.messages()[2].content(),
            "Here: https://x.test/a.png done"
        );
    }

    #[tokio::test]
    async fn test_image_mode_sends_input_verbatim() {
        let storage = MemoryStorage::new();
        let gateway = ScriptedGateway::replying("ok");
        let mut controller = controller_with(&storage, &gateway);

        controller.set_mode(Mode::Image);
        controller.submit("hello").await.unwrap();
        controller.set_mode(Mode::Text);
        controller.submit("hello").await.unwrap();

        assert_eq!(
            gateway.calls(),
            vec![
                Request::Image {
                    prompt: "hello".to_string()
                },
                Request::Chat {
                    text: "hello".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_echo_and_placeholder_precede_reply() {
        let storage = MemoryStorage::new();
        let mut controller = controller_with(&storage, &ScriptedGateway::replying("unused"));

        let submission = controller.begin_submission("hello").unwrap();

        let entries = controller.view().entries();
        assert!(matches!(entries.last(), Some(TranscriptEntry::Typing(id)) if *id == submission.id()));
        assert_eq!(controller.messages().last().unwrap().content(), "hello");
        assert_eq!(controller.in_flight(), 1);
        // nothing is written before the reply
        assert!(!storage.contains(TRANSCRIPT_SLOT));

        controller.finish_submission(submission, Ok("hi".to_string()));
        assert_eq!(controller.view().typing_count(), 0);
        assert!(controller.is_idle());
        assert_eq!(
            stored_messages(&storage).as_deref(),
            Some(controller.messages())
        );
    }

    #[test]
    fn test_reload_mid_request_keeps_last_complete_exchange() {
        let storage = MemoryStorage::new();
        let gateway = ScriptedGateway::replying("unused");
        let mut controller = controller_with(&storage, &gateway);

        let first = controller.begin_submission("first").unwrap();
        controller.finish_submission(first, Ok("answer".to_string()));
        let settled = controller.messages().to_vec();

        let _pending = controller.begin_submission("hello").unwrap();
        drop(controller);

        let reloaded = controller_with(&storage, &gateway);
        assert_eq!(reloaded.messages(), settled.as_slice());
        assert_eq!(
            contents(reloaded.messages()),
            vec![
                (Sender::Bot, GREETING),
                (Sender::User, "first"),
                (Sender::Bot, "answer"),
            ]
        );
    }

    #[test]
    fn test_reload_before_first_reply_starts_fresh() {
        let storage = MemoryStorage::new();
        let gateway = ScriptedGateway::replying("unused");
        let mut controller = controller_with(&storage, &gateway);

        let _pending = controller.begin_submission("hello").unwrap();
        drop(controller);

        let reloaded = controller_with(&storage, &gateway);
        assert_eq!(contents(reloaded.messages()), vec![(Sender::Bot, GREETING)]);
    }

    #[test]
    fn test_overlapping_submissions_render_first_to_resolve() {
        let storage = MemoryStorage::new();
        let mut controller = controller_with(&storage, &ScriptedGateway::replying("unused"));

        let first = controller.begin_submission("first").unwrap();
        let second = controller.begin_submission("second").unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(controller.view().typing_count(), 2);

        controller.finish_submission(second, Ok("reply to second".to_string()));
        assert_eq!(controller.view().typing_count(), 1);
        controller.finish_submission(first, Err(GatewayError::new("timeout")));

        assert_eq!(
            contents(controller.messages()),
            vec![
                (Sender::Bot, GREETING),
                (Sender::User, "first"),
                (Sender::User, "second"),
                (Sender::Bot, "reply to second"),
                (Sender::Bot, FALLBACK_MESSAGE),
            ]
        );
        assert_eq!(controller.view().typing_count(), 0);
        assert_eq!(
            stored_messages(&storage).as_deref(),
            Some(controller.messages())
        );
    }
}

mod clear_tests {
    use super::*;

    #[tokio::test]
    async fn test_clear_leaves_only_greeting_and_empties_storage() {
        let storage = MemoryStorage::new();
        let gateway = ScriptedGateway::replying("sure");
        let mut controller = controller_with(&storage, &gateway);
        controller.submit("one").await.unwrap();
        controller.submit("two").await.unwrap();
        assert!(storage.contains(TRANSCRIPT_SLOT));

        controller.clear();

        assert_eq!(contents(controller.messages()), vec![(Sender::Bot, GREETING)]);
        assert_eq!(controller.view().len(), 1);
        assert!(!storage.contains(TRANSCRIPT_SLOT));

        // a reload after clearing starts fresh
        let reloaded = controller_with(&storage, &gateway);
        assert_eq!(contents(reloaded.messages()), vec![(Sender::Bot, GREETING)]);
    }

    #[test]
    fn test_clear_during_dispatch_drops_placeholder() {
        let storage = MemoryStorage::new();
        let mut controller = controller_with(&storage, &ScriptedGateway::replying("unused"));

        let pending = controller.begin_submission("hello").unwrap();
        controller.clear();
        assert_eq!(controller.view().typing_count(), 0);

        controller.finish_submission(pending, Ok("late reply".to_string()));
        assert_eq!(
            contents(controller.messages()),
            vec![(Sender::Bot, GREETING), (Sender::Bot, "late reply")]
        );
    }
}

mod store_tests {
    use super::*;

    #[test]
    fn test_persist_then_load_round_trip() {
        let storage = MemoryStorage::new();
        let mut view = RenderedTranscript::new();
        let mut store = TranscriptStore::new(storage.clone());
        store.append(Sender::User, "ping", &mut view);
        store.append(Sender::Bot, "pong https://x.test/p.png", &mut view);
        store.persist().unwrap();

        let mut fresh_view = RenderedTranscript::new();
        let mut fresh = TranscriptStore::new(storage.clone());
        assert!(fresh.load(&mut fresh_view).unwrap());

        assert_eq!(fresh.messages(), store.messages());
        assert_eq!(fresh_view.entries(), view.entries());
    }

    #[test]
    fn test_append_does_not_write() {
        let storage = MemoryStorage::new();
        let mut store = TranscriptStore::new(storage.clone());
        store.append(Sender::User, "draft", &mut RenderedTranscript::new());

        assert_eq!(store.len(), 1);
        assert!(!storage.contains(TRANSCRIPT_SLOT));
    }

    #[test]
    fn test_load_without_stored_copy_leaves_transcript_empty() {
        let mut view = RenderedTranscript::new();
        let mut store = TranscriptStore::new(MemoryStorage::new());

        assert!(!store.load(&mut view).unwrap());
        assert!(store.is_empty());
        assert!(view.is_empty());
    }

    #[test]
    fn test_slots_are_independent() {
        let storage = MemoryStorage::new();
        let mut view = RenderedTranscript::new();
        let mut work = TranscriptStore::with_slot(storage.clone(), "work");
        work.append(Sender::User, "only here", &mut view);
        work.persist().unwrap();

        let mut other = TranscriptStore::with_slot(storage.clone(), "home");
        assert!(!other.load(&mut RenderedTranscript::new()).unwrap());
        assert!(storage.contains("work"));
    }
}
