//! Pending gate outcomes.
//!
//! A [`GateRequest`] is the caller's side of an unlock or verification that
//! may need user input. It resolves once, through an `async_channel`, when a
//! dialog or lock screen callback fires; nothing polls.

use async_channel::{Receiver, Sender, TryRecvError};

enum RequestState {
    Ready(bool),
    Pending(Receiver<bool>),
}

/// Outcome of `request_unlock`, `verify_action`, and the prompt flows.
///
/// A request whose resolving side is dropped without answering (the dialog
/// went away) resolves `false`.
#[must_use = "a gate request does nothing unless its outcome is awaited or checked"]
pub struct GateRequest {
    state: RequestState,
}

/// Resolving side of a [`GateRequest`]. Clones share one outcome; the first
/// resolution wins.
#[derive(Clone)]
pub(crate) struct GateResolver {
    tx: Sender<bool>,
}

impl GateResolver {
    pub(crate) fn resolve(&self, outcome: bool) {
        // Full means an earlier clone already answered; Closed means nobody is waiting.
        let _ = self.tx.try_send(outcome);
    }
}

impl GateRequest {
    pub(crate) fn ready(outcome: bool) -> Self {
        Self {
            state: RequestState::Ready(outcome),
        }
    }

    pub(crate) fn pending() -> (GateResolver, Self) {
        let (tx, rx) = async_channel::bounded(1);
        (
            GateResolver { tx },
            Self {
                state: RequestState::Pending(rx),
            },
        )
    }

    /// Non-blocking check. `None` while still waiting on the user.
    pub fn try_outcome(&mut self) -> Option<bool> {
        let outcome = match &self.state {
            RequestState::Ready(outcome) => return Some(*outcome),
            RequestState::Pending(rx) => match rx.try_recv() {
                Ok(outcome) => outcome,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Closed) => false,
            },
        };
        self.state = RequestState::Ready(outcome);
        Some(outcome)
    }

    pub fn is_pending(&mut self) -> bool {
        self.try_outcome().is_none()
    }

    /// Wait for the outcome without blocking the executor.
    pub async fn outcome(self) -> bool {
        match self.state {
            RequestState::Ready(outcome) => outcome,
            RequestState::Pending(rx) => rx.recv().await.unwrap_or(false),
        }
    }

    /// Block the current thread until the outcome arrives. For hosts without
    /// an async executor; never call it on the thread that delivers input.
    pub fn outcome_blocking(self) -> bool {
        match self.state {
            RequestState::Ready(outcome) => outcome,
            RequestState::Pending(rx) => rx.recv_blocking().unwrap_or(false),
        }
    }
}

impl std::fmt::Debug for GateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.state {
            RequestState::Ready(outcome) => f.debug_tuple("GateRequest::Ready").field(outcome).finish(),
            RequestState::Pending(_) => f.write_str("GateRequest::Pending"),
        }
    }
}
