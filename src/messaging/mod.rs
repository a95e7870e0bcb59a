// Messaging module - Topics, filtering and event delivery
pub mod event;
pub mod router;

pub use event::Topic;
pub use router::{EventCallback, EventRouter, TopicFilter};
