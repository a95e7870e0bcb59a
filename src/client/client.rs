use super::builder::ClientConfig;
use super::{
    ClientState, ConnectionState, Connector, FrameStream, RealtimeClientBuilder,
    RealtimeClientOptions, TransportKind,
};
use crate::infrastructure::{BackoffTimer, Endpoints, with_token};
use crate::types::{RealtimeError, Result};
use futures::future::BoxFuture;
use futures::stream::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// A single logical event feed from the backend.
///
/// `RealtimeClient` prefers a WebSocket and falls back to server-sent events
/// when the socket does not open in time. Lost connections are retried with
/// exponential backoff until [`stop()`](Self::stop) is called. Only events
/// whose topic is in the configured set reach `on_event`.
///
/// Callbacks run on the client's background task and must not block.
///
/// # Example
///
/// ```no_run
/// use pos_realtime::{RealtimeClient, RealtimeClientOptions, Topic};
/// use std::sync::Arc;
///
/// # async fn example() {
/// let client = RealtimeClient::new(RealtimeClientOptions {
///     api_base_url: Some("https://api.example.com/api".to_string()),
///     topics: vec![Topic::Inventory],
///     on_event: Some(Arc::new(|event| println!("{:?}", event))),
///     on_status: Some(Arc::new(|state| println!("realtime: {}", state))),
///     ..Default::default()
/// });
///
/// client.start().await;
/// // ...
/// client.stop().await;
/// # }
/// ```
#[derive(Clone)]
pub struct RealtimeClient {
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) connector: Arc<dyn Connector>,

    // Consolidated mutable state
    pub(crate) state: Arc<RwLock<ClientState>>,
}

impl RealtimeClient {
    /// Creates a client using the network connector.
    ///
    /// Endpoints are resolved here, once. Nothing connects until
    /// [`start()`](Self::start).
    pub fn new(options: RealtimeClientOptions) -> Self {
        RealtimeClientBuilder::new(options).build()
    }

    pub fn builder(options: RealtimeClientOptions) -> RealtimeClientBuilder {
        RealtimeClientBuilder::new(options)
    }

    /// Starts the connection loop in the background.
    ///
    /// Calling this while already running does nothing. After
    /// [`stop()`](Self::stop) it begins a fresh run.
    pub async fn start(&self) {
        let mut state = self.state.write().await;
        if !state.stopped && state.task_manager.is_running() {
            tracing::debug!("Realtime client already running, ignoring start");
            return;
        }

        let generation = state.begin_run();
        let client = self.clone();
        state
            .task_manager
            .spawn("realtime-supervisor", client.run(generation));
        tracing::info!("Realtime client started");
    }

    /// Stops the client and closes any open transport.
    ///
    /// Once this returns no callback is invoked again, even for frames or
    /// timers already in flight. The current state becomes `Disconnected`
    /// without a status callback.
    pub async fn stop(&self) {
        let mut state = self.state.write().await;
        if state.stopped {
            return;
        }
        state.end_run();
        tracing::info!("Realtime client stopped");
    }

    /// Last reported state, `None` before the first start
    pub async fn state(&self) -> Option<ConnectionState> {
        self.state.read().await.connection
    }

    /// Whether the socket or the fallback stream is open
    pub async fn is_connected(&self) -> bool {
        self.state().await.is_some_and(|s| s.is_connected())
    }

    /// Endpoints resolved at construction (without token)
    pub fn endpoints(&self) -> &Endpoints {
        &self.config.endpoints
    }

    /// Supervisor: one connection cycle after another, separated by backoff
    async fn run(self, generation: u64) {
        let mut backoff = BackoffTimer::new(self.config.max_backoff_ms);

        loop {
            if !self.report(generation, ConnectionState::Connecting).await {
                return;
            }

            self.run_cycle(generation, &mut backoff).await;

            if !self.report(generation, ConnectionState::Reconnecting).await {
                return;
            }

            let delay = backoff.next_delay();
            if !self.notify_backoff(generation, delay).await {
                return;
            }
            tracing::info!("Reconnecting in {}ms", delay.as_millis());
            tokio::time::sleep(delay).await;
        }
    }

    /// Runs one connection cycle; returns when the open transport is lost or
    /// every attempt failed.
    ///
    /// The socket is tried first. The stream is tried once per cycle, when
    /// the grace period passes without an open socket or the socket attempt
    /// fails. A socket that opens later replaces the stream.
    async fn run_cycle(&self, generation: u64, backoff: &mut BackoffTimer) {
        let mut socket_attempt = Some(self.attempt(TransportKind::Socket));
        let mut stream_attempt = None;
        let mut stream_tried = false;
        let mut socket: Option<FrameStream> = None;
        let mut stream: Option<FrameStream> = None;

        let grace = tokio::time::sleep(self.config.fallback_grace);
        tokio::pin!(grace);
        let mut grace_armed = true;

        loop {
            tokio::select! {
                result = poll_attempt(&mut socket_attempt), if socket_attempt.is_some() => {
                    socket_attempt = None;
                    match result {
                        Ok(frames) => {
                            grace_armed = false;
                            if stream_attempt.take().is_some() {
                                tracing::debug!("Socket open, cancelling fallback stream attempt");
                            }
                            if stream.take().is_some() {
                                tracing::info!("Socket open, closing fallback stream");
                            }
                            socket = Some(frames);
                            backoff.reset();
                            tracing::info!("Connected via socket to {}", self.config.endpoints.socket);
                            if !self.report(generation, ConnectionState::ConnectedSocket).await {
                                return;
                            }
                        }
                        Err(e) => {
                            tracing::warn!("Socket connection failed: {}", e);
                            if !stream_tried {
                                grace_armed = false;
                                stream_tried = true;
                                stream_attempt = Some(self.attempt(TransportKind::Stream));
                            }
                        }
                    }
                }
                _ = &mut grace, if grace_armed => {
                    grace_armed = false;
                    if socket.is_none() && !stream_tried {
                        tracing::info!(
                            "Socket not open after {}ms, trying fallback stream",
                            self.config.fallback_grace.as_millis()
                        );
                        stream_tried = true;
                        stream_attempt = Some(self.attempt(TransportKind::Stream));
                    }
                }
                result = poll_attempt(&mut stream_attempt), if stream_attempt.is_some() => {
                    stream_attempt = None;
                    match result {
                        Ok(frames) => {
                            stream = Some(frames);
                            backoff.reset();
                            tracing::info!("Connected via fallback stream to {}", self.config.endpoints.stream);
                            if !self.report(generation, ConnectionState::ConnectedStream).await {
                                return;
                            }
                        }
                        Err(e) => tracing::warn!("Fallback stream connection failed: {}", e),
                    }
                }
                frame = next_frame(&mut socket), if socket.is_some() => match frame {
                    Some(Ok(text)) => self.dispatch(generation, &text).await,
                    Some(Err(e)) => {
                        tracing::warn!("Socket read error: {}", e);
                        return;
                    }
                    None => {
                        tracing::warn!("Socket closed");
                        return;
                    }
                },
                frame = next_frame(&mut stream), if stream.is_some() => match frame {
                    Some(Ok(text)) => self.dispatch(generation, &text).await,
                    Some(Err(e)) => {
                        tracing::warn!("Fallback stream read error: {}", e);
                        return;
                    }
                    None => {
                        tracing::warn!("Fallback stream closed");
                        return;
                    }
                },
                else => {
                    tracing::debug!("Every connection attempt in this cycle failed");
                    return;
                }
            }
        }
    }

    /// Opens one transport, token attached, bounded by the connect timeout
    fn attempt(&self, kind: TransportKind) -> BoxFuture<'static, Result<FrameStream>> {
        let endpoint = match kind {
            TransportKind::Socket => &self.config.endpoints.socket,
            TransportKind::Stream => &self.config.endpoints.stream,
        };
        let timeout = self.config.connect_timeout;
        let opening = with_token(endpoint, self.config.get_token.as_ref())
            .map(|url| self.connector.open(kind, url));

        Box::pin(async move {
            match tokio::time::timeout(timeout, opening?).await {
                Ok(result) => result,
                Err(_) => Err(RealtimeError::Timeout),
            }
        })
    }

    /// Records and reports a state change; false once this run is over
    async fn report(&self, generation: u64, new_state: ConnectionState) -> bool {
        let mut state = self.state.write().await;
        if !state.is_current(generation) {
            return false;
        }
        state.connection = Some(new_state);

        // Callbacks run under the read lock so `stop` waits for them
        let _state = state.downgrade();
        tracing::debug!("Connection state: {}", new_state);
        if let Some(on_status) = &self.config.on_status {
            on_status(new_state);
        }
        true
    }

    async fn notify_backoff(&self, generation: u64, delay: Duration) -> bool {
        let state = self.state.read().await;
        if !state.is_current(generation) {
            return false;
        }
        if let Some(on_backoff) = &self.config.on_backoff {
            on_backoff(delay);
        }
        true
    }

    async fn dispatch(&self, generation: u64, text: &str) {
        let state = self.state.read().await;
        if state.is_current(generation) {
            self.config.router.route(text);
        }
    }
}

async fn poll_attempt(
    slot: &mut Option<BoxFuture<'static, Result<FrameStream>>>,
) -> Result<FrameStream> {
    match slot {
        Some(opening) => opening.await,
        None => std::future::pending().await,
    }
}

async fn next_frame(slot: &mut Option<FrameStream>) -> Option<Result<String>> {
    match slot {
        Some(frames) => frames.next().await,
        None => std::future::pending().await,
    }
}
