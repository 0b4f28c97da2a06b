//! Reconciliation state machine for one load.

use protocol::RequestId;
use tokio::sync::watch;

use crate::error::FetchError;

/// Everything a successful load produces.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome<T> {
    pub data: T,
    /// Human-readable message from the phase-one envelope.
    pub message: String,
    pub request_id: RequestId,
}

/// `Idle → Loading → Ready | Failed`.
///
/// `Ready` and `Failed` are terminal until a fresh load starts the cell
/// over at `Loading`. Replaces the five parallel setter callbacks of the
/// original contract with one sum type.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState<T> {
    #[default]
    Idle,
    Loading,
    Ready(FetchOutcome<T>),
    Failed(FetchError),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FetchState::Ready(_) | FetchState::Failed(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Ready(outcome) => Some(&outcome.data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Single-writer cell publishing a [`FetchState`] over a watch channel.
///
/// Transition rules are enforced here: `start` never interrupts an
/// in-flight load, and a terminal value can only be written from
/// `Loading`, so a payload is published at most once per load.
#[derive(Debug)]
pub struct StateCell<T> {
    tx: watch::Sender<FetchState<T>>,
}

impl<T> StateCell<T> {
    pub fn channel() -> (Self, watch::Receiver<FetchState<T>>) {
        let (tx, rx) = watch::channel(FetchState::Idle);
        (Self { tx }, rx)
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.tx.subscribe()
    }

    /// `Idle | Ready | Failed → Loading`. Returns false from `Loading`.
    pub fn start(&self) -> bool {
        self.tx.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }
            *state = FetchState::Loading;
            true
        })
    }

    /// `Loading → Ready`. Ignored from any other state.
    pub fn ready(&self, outcome: FetchOutcome<T>) -> bool {
        self.tx.send_if_modified(|state| {
            if !state.is_loading() {
                return false;
            }
            *state = FetchState::Ready(outcome);
            true
        })
    }

    /// `Loading → Failed`. Ignored from any other state.
    pub fn fail(&self, error: FetchError) -> bool {
        self.tx.send_if_modified(|state| {
            if !state.is_loading() {
                return false;
            }
            *state = FetchState::Failed(error);
            true
        })
    }
}
