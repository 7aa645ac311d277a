//! Domain service contracts.

use async_trait::async_trait;

use crate::error::{CommandError, ServiceError, StoreError};
use crate::types::{
    Category, ChannelAction, CommandArgs, Permission, Playbook, PlaybookRun, PluginContext, Post,
    RunMetadata, TopicRecord,
};

/// Posts messages as the product bot.
#[async_trait]
pub trait Poster: Send + Sync {
    async fn post_message(&self, channel_id: &str, message: &str) -> Result<String, ServiceError>;
    async fn dm(&self, user_id: &str, message: &str) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait PlaybookService: Send + Sync {
    async fn get(&self, id: &str) -> Result<Playbook, StoreError>;
}

#[async_trait]
pub trait ChannelActionService: Send + Sync {
    async fn get_channel_actions(&self, channel_id: &str) -> Result<Vec<ChannelAction>, StoreError>;
    /// `actor_id` is set only when someone other than the user added them.
    async fn user_has_joined_channel(&self, user_id: &str, channel_id: &str, actor_id: Option<&str>);
    async fn message_has_been_posted(&self, post: &Post);
    async fn ignore_keywords_thread(&self, post_id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait CategoryService: Send + Sync {
    async fn get_categories(&self, team_id: &str, user_id: &str) -> Result<Vec<Category>, StoreError>;
}

pub trait LicenseChecker: Send + Sync {
    fn playbook_allowed(&self, private: bool) -> bool;
    fn retrospective_allowed(&self) -> bool;
    fn timeline_allowed(&self) -> bool;
    fn stats_allowed(&self) -> bool;
}

/// Run lookups and run-level side effects.
#[async_trait]
pub trait PlaybookRunService: Send + Sync {
    async fn get_playbook_run(&self, run_id: &str) -> Result<PlaybookRun, StoreError>;
    async fn get_playbook_run_ids_for_user(&self, user_id: &str) -> Result<Vec<String>, StoreError>;
    async fn get_followers(&self, run_id: &str) -> Result<Vec<String>, StoreError>;
    async fn get_run_metadata_by_ids(&self, run_ids: &[String]) -> Result<Vec<RunMetadata>, StoreError>;
    async fn get_status_metadata_by_ids(&self, ids: &[String]) -> Result<Vec<TopicRecord>, StoreError>;
    async fn get_task_metadata_by_ids(&self, ids: &[String]) -> Result<Vec<TopicRecord>, StoreError>;
    /// Fired by the job-once scheduler when a status update reminder is due.
    async fn handle_reminder(&self, key: &str, props: serde_json::Value);
    async fn message_has_been_posted(&self, post: &Post);
}

/// Product-level access control.
#[async_trait]
pub trait PermissionsService: Send + Sync {
    async fn has_permissions_to_run(&self, user_id: &str, run: &PlaybookRun, permission: &Permission) -> bool;
    async fn run_view(&self, user_id: &str, run_id: &str) -> Result<(), ServiceError>;
    async fn playbook_view(&self, user_id: &str, playbook_id: &str) -> Result<(), ServiceError>;
}

/// Parses and runs `/playbook` commands.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, ctx: &PluginContext, args: &CommandArgs) -> Result<(), CommandError>;
}

/// Resolves GraphQL-style API queries.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(
        &self,
        user_id: &str,
        request: serde_json::Value,
    ) -> Result<serde_json::Value, ServiceError>;
}
