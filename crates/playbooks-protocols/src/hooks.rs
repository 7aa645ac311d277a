//! Hook callbacks the host invokes on a started product.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};

use crate::error::{AppError, CollectionError};
use crate::types::{
    ChannelMember, CollectionMetadata, CommandArgs, CommandResponse, Permission, PluginContext,
    Post, TopicMetadata, User,
};

/// Callbacks driven by the host, possibly from many request threads at once.
#[async_trait]
pub trait ProductHooks: Send + Sync {
    /// Route an HTTP request to the product's API.
    async fn serve_http(&self, ctx: &PluginContext, request: Request<Body>) -> Response<Body>;

    async fn on_configuration_change(&self) -> Result<(), AppError>;

    /// Execute a command previously registered with the host.
    async fn execute_command(
        &self,
        ctx: &PluginContext,
        args: &CommandArgs,
    ) -> Result<CommandResponse, AppError>;

    async fn user_has_joined_channel(
        &self,
        ctx: &PluginContext,
        member: &ChannelMember,
        actor: Option<&User>,
    );

    async fn message_has_been_posted(&self, ctx: &PluginContext, post: &Post);

    async fn user_has_permission_to_collection(
        &self,
        ctx: &PluginContext,
        user_id: &str,
        collection_type: &str,
        collection_id: &str,
        permission: &Permission,
    ) -> Result<bool, CollectionError>;

    async fn get_all_collection_ids_for_user(
        &self,
        ctx: &PluginContext,
        user_id: &str,
        collection_type: &str,
    ) -> Result<Vec<String>, CollectionError>;

    async fn get_all_user_ids_for_collection(
        &self,
        ctx: &PluginContext,
        collection_type: &str,
        collection_id: &str,
    ) -> Result<Vec<String>, CollectionError>;

    async fn get_collection_metadata_by_ids(
        &self,
        ctx: &PluginContext,
        collection_type: &str,
        collection_ids: &[String],
    ) -> Result<HashMap<String, CollectionMetadata>, CollectionError>;

    async fn get_topic_metadata_by_ids(
        &self,
        ctx: &PluginContext,
        topic_type: &str,
        topic_ids: &[String],
    ) -> Result<HashMap<String, TopicMetadata>, CollectionError>;
}
