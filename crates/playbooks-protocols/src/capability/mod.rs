//! Services the host supplies to the product.
//!
//! Each trait is a narrow capability. The kernel binds one implementation per
//! capability at construction and never reassigns it.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;

use crate::error::ServiceError;
use crate::hooks::ProductHooks;
use crate::types::{
    Bot, Channel, CloudLimits, CommandDefinition, FileInfo, HostConfig, KvSetOptions, License,
    LogLevel, Post, Preference, Session, Team, User,
};

#[async_trait]
pub trait TeamService: Send + Sync {
    async fn get_team(&self, team_id: &str) -> Result<Team, ServiceError>;
    async fn is_member(&self, team_id: &str, user_id: &str) -> Result<bool, ServiceError>;
}

#[async_trait]
pub trait ChannelService: Send + Sync {
    async fn get_channel(&self, channel_id: &str) -> Result<Channel, ServiceError>;
    async fn add_member(&self, channel_id: &str, user_id: &str) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, user_id: &str) -> Result<User, ServiceError>;
    async fn get_user_by_username(&self, username: &str) -> Result<User, ServiceError>;
}

#[async_trait]
pub trait PostService: Send + Sync {
    async fn create_post(&self, post: Post) -> Result<Post, ServiceError>;
    async fn update_post(&self, post: Post) -> Result<Post, ServiceError>;
}

/// Host permission checks (optional capability).
#[async_trait]
pub trait PermissionService: Send + Sync {
    async fn has_permission_to(&self, user_id: &str, permission_id: &str) -> bool;
    async fn has_permission_to_team(&self, user_id: &str, team_id: &str, permission_id: &str) -> bool;
    async fn has_permission_to_channel(
        &self,
        user_id: &str,
        channel_id: &str,
        permission_id: &str,
    ) -> bool;
}

#[async_trait]
pub trait BotService: Send + Sync {
    /// Look up a bot by username. `Ok(None)` when no such bot exists.
    async fn get_bot(&self, username: &str) -> Result<Option<Bot>, ServiceError>;
    async fn create_bot(&self, bot: Bot) -> Result<Bot, ServiceError>;
}

#[async_trait]
pub trait ClusterService: Send + Sync {
    async fn publish_event(&self, event_id: &str, payload: Vec<u8>) -> Result<(), ServiceError>;
}

pub trait ConfigService: Send + Sync {
    fn config(&self) -> HostConfig;
    fn save_plugin_config(&self, product_id: &str, value: serde_json::Value) -> Result<(), ServiceError>;
}

pub trait LogService: Send + Sync {
    fn log(&self, level: LogLevel, message: &str, fields: &[(String, String)]);
}

pub trait LicenseService: Send + Sync {
    fn license(&self) -> Option<License>;
}

#[async_trait]
pub trait FilestoreService: Send + Sync {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, ServiceError>;
}

#[async_trait]
pub trait FileInfoStoreService: Send + Sync {
    async fn get_file_info(&self, file_id: &str) -> Result<FileInfo, ServiceError>;
}

pub trait RouterService: Send + Sync {
    fn register_router(&self, product_id: &str, router: Router);
}

#[async_trait]
pub trait CloudService: Send + Sync {
    async fn get_cloud_limits(&self) -> Result<CloudLimits, ServiceError>;
}

#[async_trait]
pub trait KvStoreService: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ServiceError>;
    /// Write `value` (`None` deletes). Returns whether the write happened.
    async fn set_with_options(
        &self,
        key: &str,
        value: Option<Vec<u8>>,
        options: KvSetOptions,
    ) -> Result<bool, ServiceError>;
    async fn delete(&self, key: &str) -> Result<(), ServiceError>;
}

/// Access to the host database the product's store layer is built on.
pub trait StoreService: Send + Sync {
    fn driver_name(&self) -> String;
    fn data_source(&self) -> String;
}

pub trait SystemService: Send + Sync {
    fn diagnostic_id(&self) -> String;
    fn server_version(&self) -> String;
}

#[async_trait]
pub trait PreferencesService: Send + Sync {
    async fn get_preferences_for_user(&self, user_id: &str) -> Result<Vec<Preference>, ServiceError>;
}

#[async_trait]
pub trait SessionService: Send + Sync {
    async fn get_session(&self, token: &str) -> Result<Session, ServiceError>;
}

pub trait FrontendService: Send + Sync {
    fn publish_websocket_event(&self, event: &str, payload: serde_json::Value, user_id: Option<&str>);
}

#[async_trait]
pub trait CommandService: Send + Sync {
    async fn register_command(
        &self,
        product_id: &str,
        command: CommandDefinition,
    ) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait ThreadsService: Send + Sync {
    async fn register_collection_and_topic(
        &self,
        collection_type: &str,
        topic_type: &str,
    ) -> Result<(), ServiceError>;
}

/// Registration point for product hook callbacks (optional capability).
pub trait HooksService: Send + Sync {
    fn register_hooks(&self, product_id: &str, hooks: Arc<dyn ProductHooks>) -> Result<(), ServiceError>;
}
