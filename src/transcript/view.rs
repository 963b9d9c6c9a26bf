use super::render::{RenderedContent, classify_content};
use crate::types::{Message, Sender};

/// Sink the transcript renders into.
pub trait TranscriptView {
    /// Show one message after everything already shown.
    fn render(&mut self, message: &Message);

    /// Remove every rendered message and placeholder.
    fn reset(&mut self);

    fn show_typing(&mut self, placeholder: u64);

    /// No-op when the placeholder is already gone.
    fn remove_typing(&mut self, placeholder: u64);
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedMessage {
    pub seq: u64,
    pub sender: Sender,
    pub content: RenderedContent,
    pub timestamp: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TranscriptEntry {
    Message(RenderedMessage),
    Typing(u64),
}

impl TranscriptEntry {
    /// Stable key for list diffing.
    pub fn key(&self) -> String {
        match self {
            TranscriptEntry::Message(msg) => format!("m{}", msg.seq),
            TranscriptEntry::Typing(id) => format!("t{}", id),
        }
    }
}

/// The message container as plain data: what the UI draws, in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderedTranscript {
    entries: Vec<TranscriptEntry>,
    next_seq: u64,
}

impl RenderedTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn messages(&self) -> impl Iterator<Item = &RenderedMessage> {
        self.entries.iter().filter_map(|entry| match entry {
            TranscriptEntry::Message(msg) => Some(msg),
            TranscriptEntry::Typing(_) => None,
        })
    }

    pub fn typing_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, TranscriptEntry::Typing(_)))
            .count()
    }
}

impl TranscriptView for RenderedTranscript {
    fn render(&mut self, message: &Message) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(TranscriptEntry::Message(RenderedMessage {
            seq,
            sender: message.sender(),
            content: classify_content(message.sender(), message.content()),
            timestamp: message.timestamp().to_string(),
        }));
    }

    fn reset(&mut self) {
        self.entries.clear();
    }

    fn show_typing(&mut self, placeholder: u64) {
        self.entries.push(TranscriptEntry::Typing(placeholder));
    }

    fn remove_typing(&mut self, placeholder: u64) {
        self.entries
            .retain(|entry| !matches!(entry, TranscriptEntry::Typing(id) if *id == placeholder));
    }
}
