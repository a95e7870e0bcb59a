// Infrastructure module - Transports, endpoints and background services
pub mod endpoints;
pub mod http;
pub mod task_manager;
pub mod timer;

pub use endpoints::{Endpoints, TokenProvider, with_token, ws_to_http_endpoint};
pub use http::{EventStreamFactory, SseDecoder};
pub use task_manager::TaskManager;
pub use timer::BackoffTimer;
