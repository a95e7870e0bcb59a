use crate::types::constants::topics;
use serde::{Deserialize, Serialize};

/// Coarse event category used for client-side filtering.
///
/// Serialized as its plain string, so unknown names round-trip through
/// [`Topic::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Topic {
    /// Sales and checkout activity
    Sales,

    /// Stock levels and product changes
    Inventory,

    /// Backend housekeeping, and any event without a topic
    System,

    /// Warranty claims and repairs
    Warranty,

    /// Any other backend-defined topic
    Custom(String),
}

impl Topic {
    /// Parse a string into a Topic
    pub fn from_str(s: &str) -> Self {
        match s {
            topics::SALES => Self::Sales,
            topics::INVENTORY => Self::Inventory,
            topics::SYSTEM => Self::System,
            topics::WARRANTY => Self::Warranty,
            _ => Self::Custom(s.to_string()),
        }
    }

    /// Convert topic to string representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sales => topics::SALES,
            Self::Inventory => topics::INVENTORY,
            Self::System => topics::SYSTEM,
            Self::Warranty => topics::WARRANTY,
            Self::Custom(s) => s,
        }
    }
}

impl From<&str> for Topic {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for Topic {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        match topic {
            Topic::Custom(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
