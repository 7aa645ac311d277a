//! Domain entities as far as the kernel needs to see them.

use serde::{Deserialize, Serialize};

/// An executing playbook instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybookRun {
    pub id: String,
    pub name: String,
    pub team_id: String,
    pub channel_id: String,
    pub playbook_id: String,
    pub owner_user_id: String,
    #[serde(default)]
    pub participant_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playbook {
    pub id: String,
    pub title: String,
    pub team_id: String,
    pub public: bool,
}

/// Lightweight projection of a run used for collection metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub id: String,
    pub name: String,
    pub team_id: String,
}

/// A thread root inside a run: a status update post or a checklist item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecord {
    pub id: String,
    pub run_id: String,
    pub team_id: String,
}

/// A host permission evaluated against a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub id: String,
}

impl Permission {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub last_daily_todo_dm_at: i64,
}

/// Automation configured on a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelAction {
    pub id: String,
    pub channel_id: String,
    pub action_type: String,
    pub trigger_type: String,
    pub enabled: bool,
    pub payload: serde_json::Value,
}

/// A sidebar category grouping playbooks and runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub team_id: String,
    pub user_id: String,
    pub collapsed: bool,
}

/// Relative URL of a run's details page.
pub fn run_details_relative_url(run_id: &str) -> String {
    format!("/playbooks/runs/{}", run_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_details_relative_url() {
        assert_eq!(run_details_relative_url("abc"), "/playbooks/runs/abc");
    }

    #[test]
    fn test_run_deserialize_without_participants() {
        let run: PlaybookRun = serde_json::from_str(
            r#"{"id":"r","name":"n","team_id":"t","channel_id":"c","playbook_id":"p","owner_user_id":"u"}"#,
        )
        .unwrap();
        assert!(run.participant_ids.is_empty());
    }
}
