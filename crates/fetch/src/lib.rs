//! Two-phase data loading.
//!
//! A phase-one HTTP call returns a correlation id; a phase-two stream
//! subscription opened with that id delivers the payload. This crate
//! provides:
//! - the transport primitive (`Transport`, `HttpTransport`)
//! - the subscription channel (`StreamChannel`, `WsChannel`)
//! - the reconciliation state machine (`FetchState`, published over a
//!   watch channel)
//! - the orchestrator tying them together (`Loader`)
//!
//! In-memory implementations of both traits back the tests and any
//! offline caller.

pub mod channel;
pub mod descriptor;
pub mod error;
pub mod loader;
pub mod state;
pub mod transport;

pub use channel::*;
pub use descriptor::*;
pub use error::*;
pub use loader::*;
pub use state::*;
pub use transport::*;

use std::future::Future;
use std::pin::Pin;

/// Boxed future used by the object-safe traits in this crate.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
