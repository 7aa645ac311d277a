//! Persistence layer contracts.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::{ServiceError, StoreError};
use crate::types::{Category, ChannelAction, Playbook, UserInfo};

/// The SQL store shared by every table-specific store.
#[async_trait]
pub trait SqlStore: Send + Sync {
    /// Bring the schema up to date. Must be idempotent.
    async fn run_migrations(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait PlaybookStore: Send + Sync {
    async fn get_playbook(&self, id: &str) -> Result<Playbook, StoreError>;
    async fn get_playbooks_active_total(&self) -> Result<i64, StoreError>;
}

#[async_trait]
pub trait PlaybookRunStore: Send + Sync {
    async fn get_runs_active_total(&self) -> Result<i64, StoreError>;
    async fn get_overdue_update_runs_total(&self) -> Result<i64, StoreError>;
    async fn get_overdue_retro_runs_total(&self) -> Result<i64, StoreError>;
    async fn get_followers_active_total(&self) -> Result<i64, StoreError>;
    async fn get_participants_active_total(&self) -> Result<i64, StoreError>;
}

#[async_trait]
pub trait StatsStore: Send + Sync {
    async fn total_in_progress_runs(&self, team_id: Option<&str>) -> Result<i64, StoreError>;
    async fn total_active_participants(&self, team_id: Option<&str>) -> Result<i64, StoreError>;
}

#[async_trait]
pub trait UserInfoStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<UserInfo, StoreError>;
    async fn upsert(&self, info: UserInfo) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ChannelActionStore: Send + Sync {
    async fn get_channel_actions(&self, channel_id: &str) -> Result<Vec<ChannelAction>, StoreError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn get_categories(&self, team_id: &str, user_id: &str) -> Result<Vec<Category>, StoreError>;
}

/// Callback fired for a due one-shot job: `(job key, job props)`.
pub type ReminderCallback =
    Arc<dyn Fn(String, serde_json::Value) -> BoxFuture<'static, ()> + Send + Sync>;

/// Cluster-aware scheduler of one-shot jobs (per-run reminders).
#[async_trait]
pub trait JobOnceScheduler: Send + Sync {
    fn set_callback(&self, callback: ReminderCallback) -> Result<(), ServiceError>;
    async fn start(&self) -> Result<(), ServiceError>;
}
