//! Two-phase fetch orchestrator.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use protocol::StreamPayload;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::channel::{StreamChannel, Subscription};
use crate::descriptor::RequestDescriptor;
use crate::error::{FetchError, StreamError};
use crate::state::{FetchOutcome, FetchState, StateCell};
use crate::transport::Transport;

/// Identifies one `load()` invocation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadId(pub u64);

/// Runs the two-phase exchange:
///
/// 1. phase-one request through the transport, yielding a correlation id
/// 2. subscription opened with that id, query echoed, first payload taken
/// 3. result published as [`FetchState`]
///
/// Every `load()` owns a private state channel, so concurrent loads never
/// interfere. The loader also republishes to a shared `latest` channel,
/// keyed by generation: once a newer load starts, anything the older one
/// produces is discarded from the shared view.
pub struct Loader<T> {
    transport: Arc<dyn Transport>,
    channel: Arc<dyn StreamChannel>,
    next_id: AtomicU64,
    newest: Arc<AtomicU64>,
    latest: watch::Sender<FetchState<T>>,
}

impl<T> Loader<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn new(transport: Arc<dyn Transport>, channel: Arc<dyn StreamChannel>) -> Self {
        let (latest, _) = watch::channel(FetchState::Idle);
        Self {
            transport,
            channel,
            next_id: AtomicU64::new(0),
            newest: Arc::new(AtomicU64::new(0)),
            latest,
        }
    }

    /// Shared view of the newest load's state.
    pub fn latest(&self) -> watch::Receiver<FetchState<T>> {
        self.latest.subscribe()
    }

    /// Start a load. Returns immediately; the exchange runs on its own
    /// task and reports through the handle.
    pub fn load(&self, descriptor: RequestDescriptor) -> LoadHandle<T> {
        let id = LoadId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.newest.store(id.0, Ordering::Relaxed);

        let (cell, rx) = StateCell::channel();
        cell.start();
        self.latest.send_replace(FetchState::Loading);

        let publisher = Publisher {
            cell,
            latest: self.latest.clone(),
            newest: Arc::clone(&self.newest),
            id,
        };
        let transport = Arc::clone(&self.transport);
        let channel = Arc::clone(&self.channel);

        let task = tokio::spawn(async move {
            run_load(transport, channel, descriptor, publisher).await;
        });

        LoadHandle { id, rx, task }
    }
}

/// Publishes to the per-load cell always, and to the shared view only
/// while this load is still the newest generation.
struct Publisher<T> {
    cell: StateCell<T>,
    latest: watch::Sender<FetchState<T>>,
    newest: Arc<AtomicU64>,
    id: LoadId,
}

impl<T: Clone> Publisher<T> {
    fn is_newest(&self) -> bool {
        self.newest.load(Ordering::Relaxed) == self.id.0
    }

    fn ready(&self, outcome: FetchOutcome<T>) {
        if self.is_newest() {
            self.latest.send_replace(FetchState::Ready(outcome.clone()));
        } else {
            debug!("load {} superseded, result discarded", self.id.0);
        }
        self.cell.ready(outcome);
    }

    fn fail(&self, error: FetchError) {
        warn!("load {} failed: {error}", self.id.0);
        if self.is_newest() {
            self.latest.send_replace(FetchState::Failed(error.clone()));
        }
        self.cell.fail(error);
    }
}

async fn run_load<T>(
    transport: Arc<dyn Transport>,
    channel: Arc<dyn StreamChannel>,
    descriptor: RequestDescriptor,
    publisher: Publisher<T>,
) where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let query = descriptor.query_json();

    // Phase one. On failure the subscription is never opened.
    let envelope = match transport.request(descriptor).await {
        Ok(envelope) => envelope,
        Err(e) => {
            publisher.fail(FetchError::Transport(e));
            return;
        }
    };
    let request_id = envelope.request_id.clone();

    // Phase two, scoped to the correlation id from phase one.
    let mut sub: Box<dyn Subscription> = match channel.open(request_id.clone()).await {
        Ok(sub) => sub,
        Err(e) => {
            publisher.fail(FetchError::Stream(e));
            return;
        }
    };

    if let Err(e) = sub.send(query).await {
        sub.close().await;
        publisher.fail(FetchError::Stream(e));
        return;
    }

    let result = match sub.next().await {
        Ok(Some(StreamPayload::Data { data })) => serde_json::from_value::<T>(data)
            .map_err(|e| StreamError::Malformed(e.to_string())),
        Ok(Some(StreamPayload::Error { error })) => Err(StreamError::Remote(error)),
        Ok(None) => Err(StreamError::Closed),
        Err(e) => Err(e),
    };
    sub.close().await;

    match result {
        Ok(data) => publisher.ready(FetchOutcome {
            data,
            message: envelope.message,
            request_id,
        }),
        Err(e) => publisher.fail(FetchError::Stream(e)),
    }
}

/// Handle to one in-flight (or finished) load.
#[derive(Debug)]
pub struct LoadHandle<T> {
    id: LoadId,
    rx: watch::Receiver<FetchState<T>>,
    task: JoinHandle<()>,
}

impl<T: Clone> LoadHandle<T> {
    pub fn id(&self) -> LoadId {
        self.id
    }

    /// Current state snapshot.
    pub fn state(&self) -> FetchState<T> {
        self.rx.borrow().clone()
    }

    /// Watch this load's private state channel.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.rx.clone()
    }

    /// Wait until the load reaches `Ready` or `Failed`.
    ///
    /// A cancelled load never reaches a terminal state; this returns the
    /// last published state (`Loading`) once the task is gone.
    pub async fn terminal(mut self) -> FetchState<T> {
        if let Ok(state) = self.rx.wait_for(|state| state.is_terminal()).await {
            return state.clone();
        }
        self.rx.borrow().clone()
    }

    /// Stop the exchange; no further state is published for this load.
    ///
    /// Dropping a handle does NOT cancel: detached loads keep running so
    /// the shared `latest` view still resolves.
    pub fn cancel(&self) {
        self.task.abort();
    }
}
