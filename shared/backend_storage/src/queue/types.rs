use serde::{Deserialize, Serialize};

/// Topic (queue name) for single-object deletions
pub const DELETE_SINGLE_TOPIC: &str = "delete-single-faceclaim";

/// Topic (queue name) for whole-character deletions
pub const DELETE_GROUP_TOPIC: &str = "delete-faceclaim-group";

/// Deferred deletion request published for an out-of-process consumer
///
/// The `action` tag doubles as the topic name the intent is published to.
/// Consumers must treat intents idempotently: delivery is at-least-once and
/// single/group intents for the same character carry no relative ordering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action")]
pub enum DeleteIntent {
    /// Delete one stored object
    #[serde(rename = "delete-single-faceclaim")]
    Single {
        /// Bucket holding the object
        bucket: String,
        /// Character that owns the object
        charid: String,
        /// Full object key, `{charid}/{file}`
        key: String,
    },
    /// Delete every object stored under a character's prefix
    #[serde(rename = "delete-faceclaim-group")]
    Group {
        /// Bucket holding the objects
        bucket: String,
        /// Character whose objects are deleted
        charid: String,
    },
}

impl DeleteIntent {
    /// Topic this intent is published to
    #[must_use]
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::Single { .. } => DELETE_SINGLE_TOPIC,
            Self::Group { .. } => DELETE_GROUP_TOPIC,
        }
    }

    /// Bucket the intent targets
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::Single { bucket, .. } | Self::Group { bucket, .. } => bucket,
        }
    }

    /// Character the intent targets
    #[must_use]
    pub fn charid(&self) -> &str {
        match self {
            Self::Single { charid, .. } | Self::Group { charid, .. } => charid,
        }
    }
}
