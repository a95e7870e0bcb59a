//! Scripted connector and callback recorder for state machine tests.

use super::{
    ConnectionState, Connector, FrameStream, RealtimeClient, RealtimeClientBuilder,
    RealtimeClientOptions, TransportKind,
};
use crate::types::{EventEnvelope, RealtimeError, Result};
use futures::channel::mpsc;
use futures::future::BoxFuture;
use futures::stream::StreamExt;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

type FrameSender = mpsc::UnboundedSender<Result<String>>;

/// What the next attempt on a transport does
#[derive(Debug, Clone, Copy)]
pub enum Script {
    Fail,
    Hang,
    Open,
    OpenAfter(Duration),
}

#[derive(Default)]
pub struct MockConnector {
    scripts: Mutex<HashMap<TransportKind, VecDeque<Script>>>,
    attempts: Mutex<Vec<(TransportKind, Url)>>,
    opened: Arc<Mutex<Vec<(TransportKind, FrameSender)>>>,
}

impl MockConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues attempt outcomes; once exhausted attempts fail
    pub fn script(&self, kind: TransportKind, steps: impl IntoIterator<Item = Script>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .extend(steps);
    }

    pub fn attempts(&self, kind: TransportKind) -> usize {
        self.urls(kind).len()
    }

    pub fn urls(&self, kind: TransportKind) -> Vec<Url> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, url)| url.clone())
            .collect()
    }

    fn latest(&self, kind: TransportKind) -> Option<FrameSender> {
        self.opened
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(k, _)| *k == kind)
            .map(|(_, tx)| tx.clone())
    }

    /// Sends a frame on the most recently opened transport of this kind
    pub fn send(&self, kind: TransportKind, text: &str) -> bool {
        self.latest(kind)
            .is_some_and(|tx| tx.unbounded_send(Ok(text.to_string())).is_ok())
    }

    pub fn fail(&self, kind: TransportKind) -> bool {
        self.latest(kind).is_some_and(|tx| {
            tx.unbounded_send(Err(RealtimeError::Connection("reset by peer".to_string())))
                .is_ok()
        })
    }

    /// Ends the most recently opened transport of this kind from the server side
    pub fn close(&self, kind: TransportKind) {
        let mut opened = self.opened.lock().unwrap();
        if let Some(pos) = opened.iter().rposition(|(k, _)| *k == kind) {
            opened.remove(pos);
        }
    }

    /// Whether the client dropped the most recently opened transport of this kind
    pub fn is_closed_by_client(&self, kind: TransportKind) -> bool {
        self.latest(kind).is_some_and(|tx| tx.is_closed())
    }
}

impl Connector for MockConnector {
    fn open(&self, kind: TransportKind, url: Url) -> BoxFuture<'static, Result<FrameStream>> {
        self.attempts.lock().unwrap().push((kind, url));
        let script = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&kind)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Script::Fail);
        let opened = Arc::clone(&self.opened);

        let open = move || -> Result<FrameStream> {
            let (tx, rx) = mpsc::unbounded();
            opened.lock().unwrap().push((kind, tx));
            Ok(rx.boxed())
        };

        Box::pin(async move {
            match script {
                Script::Fail => Err(RealtimeError::Connection(format!("{} refused", kind))),
                Script::Hang => std::future::pending().await,
                Script::Open => open(),
                Script::OpenAfter(delay) => {
                    tokio::time::sleep(delay).await;
                    open()
                }
            }
        })
    }
}

/// Records every callback invocation
#[derive(Clone, Default)]
pub struct Recorder {
    statuses: Arc<Mutex<Vec<ConnectionState>>>,
    events: Arc<Mutex<Vec<EventEnvelope>>>,
    delays: Arc<Mutex<Vec<u64>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wires the callbacks into `options` and builds a client on `connector`
    pub fn client(
        &self,
        options: RealtimeClientOptions,
        connector: Arc<MockConnector>,
    ) -> RealtimeClient {
        let statuses = Arc::clone(&self.statuses);
        let events = Arc::clone(&self.events);
        let delays = Arc::clone(&self.delays);

        RealtimeClientBuilder::new(RealtimeClientOptions {
            on_status: Some(Arc::new(move |s| statuses.lock().unwrap().push(s))),
            on_event: Some(Arc::new(move |e| events.lock().unwrap().push(e))),
            on_backoff: Some(Arc::new(move |d: Duration| {
                delays.lock().unwrap().push(d.as_millis() as u64)
            })),
            ..options
        })
        .connector(connector)
        .build()
    }

    pub fn statuses(&self) -> Vec<ConnectionState> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<EventEnvelope> {
        self.events.lock().unwrap().clone()
    }

    pub fn delays(&self) -> Vec<u64> {
        self.delays.lock().unwrap().clone()
    }
}
