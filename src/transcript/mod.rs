//! Append-only transcript mirrored to a durable slot.

mod render;
mod view;

pub use render::{BOT_LABEL, GREETING, RenderedContent, classify_content};
pub use view::{RenderedMessage, RenderedTranscript, TranscriptEntry, TranscriptView};

use crate::storage::{SlotStorage, StorageError};
use crate::types::{Message, Sender};

/// Slot holding the JSON array of messages.
pub const TRANSCRIPT_SLOT: &str = "parley_chat_history";

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("stored transcript is malformed: {0}")]
    MalformedStoredTranscript(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct TranscriptStore<S> {
    storage: S,
    slot: String,
    messages: Vec<Message>,
}

impl<S: SlotStorage> TranscriptStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_slot(storage, TRANSCRIPT_SLOT)
    }

    pub fn with_slot(storage: S, slot: impl Into<String>) -> Self {
        Self {
            storage,
            slot: slot.into(),
            messages: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Append a freshly stamped message and render it. Nothing is written;
    /// callers [`persist`](Self::persist) once the exchange is complete.
    pub fn append(
        &mut self,
        sender: Sender,
        content: impl Into<String>,
        view: &mut impl TranscriptView,
    ) -> &Message {
        let message = Message::new(sender, content);
        view.render(&message);
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Add the greeting.
    pub fn seed(&mut self, sender: Sender, content: impl Into<String>, view: &mut impl TranscriptView) {
        self.append(sender, content, view);
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Overwrite the slot with the full transcript.
    pub fn persist(&mut self) -> Result<(), TranscriptError> {
        let serialized = serde_json::to_string(&self.messages)
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        self.storage.set(&self.slot, &serialized)?;
        Ok(())
    }

    /// Restore from the slot and re-render every message in order.
    ///
    /// Returns `Ok(false)` when nothing was stored. On a malformed copy the
    /// in-memory transcript is left empty.
    pub fn load(&mut self, view: &mut impl TranscriptView) -> Result<bool, TranscriptError> {
        let Some(raw) = self.storage.get(&self.slot)? else {
            return Ok(false);
        };

        let messages: Vec<Message> = serde_json::from_str(&raw)?;
        for message in &messages {
            view.render(message);
        }
        self.messages = messages;
        Ok(true)
    }

    /// Drop every message and delete the slot.
    pub fn clear(&mut self, view: &mut impl TranscriptView) -> Result<(), TranscriptError> {
        self.messages.clear();
        view.reset();
        self.storage.remove(&self.slot)?;
        Ok(())
    }
}
