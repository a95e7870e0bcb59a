use super::Topic;
use crate::types::Result;
use crate::types::message::EventEnvelope;
use std::collections::HashSet;
use std::sync::Arc;

/// Callback invoked with every accepted event
pub type EventCallback = Arc<dyn Fn(EventEnvelope) + Send + Sync + 'static>;

/// Set of accepted topics; an empty set accepts everything.
#[derive(Debug, Clone, Default)]
pub struct TopicFilter {
    topics: HashSet<Topic>,
}

impl TopicFilter {
    pub fn new(topics: impl IntoIterator<Item = Topic>) -> Self {
        Self {
            topics: topics.into_iter().collect(),
        }
    }

    pub fn accepts(&self, envelope: &EventEnvelope) -> bool {
        self.topics.is_empty() || self.topics.contains(&envelope.resolved_topic())
    }
}

/// Turns raw frames from either transport into delivered events
pub struct EventRouter {
    filter: TopicFilter,
    on_event: Option<EventCallback>,
}

impl EventRouter {
    pub fn new(filter: TopicFilter, on_event: Option<EventCallback>) -> Self {
        Self { filter, on_event }
    }

    /// Parses a frame into an envelope
    pub fn parse(text: &str) -> Result<EventEnvelope> {
        Ok(serde_json::from_str(text)?)
    }

    /// Routes a raw frame to the event callback.
    /// Returns true if an event was delivered
    pub fn route(&self, text: &str) -> bool {
        let envelope = match Self::parse(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::trace!("Dropping malformed frame: {} - Raw: {}", e, text);
                return false;
            }
        };

        if !self.filter.accepts(&envelope) {
            tracing::trace!(
                "Filtered out event type={} topic={}",
                envelope.r#type,
                envelope.resolved_topic()
            );
            return false;
        }

        tracing::debug!(
            "Delivering event type={} topic={}",
            envelope.r#type,
            envelope.resolved_topic()
        );
        if let Some(callback) = &self.on_event {
            callback(envelope);
        }
        true
    }
}
