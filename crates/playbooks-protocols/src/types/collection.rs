//! Collection and topic types exposed to the host thread system.
//!
//! A collection groups topics and their threads. Playbooks owns a single
//! collection type, the run, and two topic types inside it: the status
//! update thread and the checklist task thread.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CollectionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionType {
    Run,
}

impl CollectionType {
    pub const ALL: [CollectionType; 1] = [CollectionType::Run];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionType::Run => "run",
        }
    }
}

impl fmt::Display for CollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionType {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "run" => Ok(CollectionType::Run),
            other => Err(CollectionError::UnregisteredCollection(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicType {
    /// Thread below a status update post.
    Status,
    /// Thread below a checklist item.
    Task,
}

impl TopicType {
    pub const ALL: [TopicType; 2] = [TopicType::Status, TopicType::Task];

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicType::Status => "status",
            TopicType::Task => "task",
        }
    }

    /// Collection every topic of this type belongs to.
    pub fn collection(&self) -> CollectionType {
        match self {
            TopicType::Status | TopicType::Task => CollectionType::Run,
        }
    }
}

impl fmt::Display for TopicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TopicType {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status" => Ok(TopicType::Status),
            "task" => Ok(TopicType::Task),
            other => Err(CollectionError::UnregisteredTopic(other.to_string())),
        }
    }
}

/// Metadata of one collection, recomputed on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMetadata {
    pub id: String,
    pub collection_type: String,
    pub team_id: String,
    pub name: String,
    pub relative_url: String,
}

/// Metadata of one topic, recomputed on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMetadata {
    pub id: String,
    pub topic_type: String,
    pub collection_type: String,
    pub team_id: String,
    pub collection_id: String,
}
