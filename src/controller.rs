//! The transcript controller: one instance per app, owning mode and transcript.
//!
//! A submission moves `Idle → Routing → Dispatching → Rendering → Idle`.
//! [`TranscriptController::begin_submission`] covers the first half (routing,
//! optimistic echo, typing placeholder) and hands back a [`Submission`];
//! [`TranscriptController::finish_submission`] takes the gateway result and
//! covers the rest. Splitting lets a UI release the controller while the
//! request is in flight. [`TranscriptController::submit`] runs both halves.

use crate::gateway::{FALLBACK_MESSAGE, Gateway, GatewayResult};
use crate::router::{Request, normalize_input, route};
use crate::storage::SlotStorage;
use crate::transcript::{GREETING, TranscriptError, TranscriptStore, TranscriptView};
use crate::types::{Message, Mode, Sender};
use std::sync::Arc;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("nothing to send")]
    EmptyInput,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Replied,
    /// The gateway failed and the fallback message was shown.
    Failed,
}

/// An in-flight submission, between echo and reply.
#[derive(Debug)]
#[must_use = "a submission must be finished or its placeholder stays on screen"]
pub struct Submission {
    id: u64,
    request: Request,
}

impl Submission {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn request(&self) -> &Request {
        &self.request
    }
}

pub struct TranscriptController<S, V> {
    store: TranscriptStore<S>,
    view: V,
    gateway: Arc<dyn Gateway>,
    mode: Mode,
    next_submission: u64,
    in_flight: usize,
}

impl<S: SlotStorage, V: TranscriptView> TranscriptController<S, V> {
    /// Build the controller and restore the stored transcript, or greet when
    /// there is none.
    pub fn new(storage: S, view: V, gateway: Arc<dyn Gateway>) -> Self {
        let mut controller = Self {
            store: TranscriptStore::new(storage),
            view,
            gateway,
            mode: Mode::default(),
            next_submission: 1,
            in_flight: 0,
        };
        controller.restore();
        controller
    }

    fn restore(&mut self) {
        match self.store.load(&mut self.view) {
            Ok(true) => {
                tracing::info!(messages = self.store.len(), "restored transcript");
                return;
            }
            Ok(false) => {}
            Err(TranscriptError::MalformedStoredTranscript(err)) => {
                tracing::warn!("ignoring malformed stored transcript: {}", err);
            }
            Err(err) => {
                tracing::error!("failed to read stored transcript: {}", err);
            }
        }
        self.store.seed(Sender::Bot, GREETING, &mut self.view);
    }

    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn storage(&self) -> &S {
        self.store.storage()
    }

    pub fn gateway(&self) -> Arc<dyn Gateway> {
        Arc::clone(&self.gateway)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        tracing::debug!(?mode, "mode changed");
        self.mode = mode;
    }

    /// Number of submissions still waiting for the gateway.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    /// Route the input, echo it and show a typing placeholder.
    ///
    /// Blank input is rejected with nothing appended. The echo is not written
    /// to storage until [`finish_submission`](Self::finish_submission).
    pub fn begin_submission(&mut self, raw: &str) -> Result<Submission, SubmitError> {
        let input = normalize_input(raw).ok_or(SubmitError::EmptyInput)?;

        let submission = Submission {
            id: self.next_submission,
            request: route(input, self.mode),
        };
        self.next_submission += 1;
        tracing::debug!(id = submission.id, image = submission.request.is_image(), "routed input");

        self.store.append(Sender::User, input, &mut self.view);
        self.view.show_typing(submission.id);
        self.in_flight += 1;
        Ok(submission)
    }

    /// Replace the placeholder with the reply, or with the fallback message on
    /// failure.
    pub fn finish_submission(
        &mut self,
        submission: Submission,
        result: GatewayResult<String>,
    ) -> SubmitOutcome {
        self.view.remove_typing(submission.id);
        self.in_flight = self.in_flight.saturating_sub(1);

        let outcome = match result {
            Ok(reply) => {
                self.store.append(Sender::Bot, reply, &mut self.view);
                SubmitOutcome::Replied
            }
            Err(err) => {
                tracing::warn!(id = submission.id, "gateway call failed: {}", err);
                self.store.append(Sender::Bot, FALLBACK_MESSAGE, &mut self.view);
                SubmitOutcome::Failed
            }
        };

        // written only once the reply is in, so a stored transcript never ends
        // on an unanswered user message
        if let Err(err) = self.store.persist() {
            tracing::error!(slot = %self.store.slot(), "failed to persist transcript: {}", err);
        }
        outcome
    }

    /// Run one submission to completion.
    pub async fn submit(&mut self, raw: &str) -> Result<SubmitOutcome, SubmitError> {
        let submission = self.begin_submission(raw)?;
        let gateway = self.gateway();
        let result = gateway.dispatch(submission.request()).await;
        Ok(self.finish_submission(submission, result))
    }

    /// Wipe the transcript and its stored copy, then greet again.
    pub fn clear(&mut self) {
        if let Err(err) = self.store.clear(&mut self.view) {
            tracing::error!("failed to clear stored transcript: {}", err);
        }
        self.store.seed(Sender::Bot, GREETING, &mut self.view);
        tracing::info!("transcript cleared");
    }
}
