use serde::{Deserialize, Serialize};

use crate::Topic;

/// One realtime message as sent by the backend on either transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventEnvelope {
    #[serde(rename = "type", default)]
    pub r#type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Topic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl EventEnvelope {
    pub fn new(r#type: impl Into<String>) -> Self {
        Self {
            r#type: r#type.into(),
            topic: None,
            category: None,
            data: None,
        }
    }

    pub fn with_topic(mut self, topic: impl Into<Topic>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<Topic>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Topic used for filtering: `topic`, else `category`, else `system`.
    pub fn resolved_topic(&self) -> Topic {
        self.topic
            .as_ref()
            .or(self.category.as_ref())
            .cloned()
            .unwrap_or(Topic::System)
    }
}
