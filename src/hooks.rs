//! Host callbacks of a started product.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use tower::ServiceExt;
use tracing::{debug, error};

use playbooks_config::ConfigService;
use playbooks_core::CollectionBridge;
use playbooks_protocols::domain::{ChannelActionService, CommandExecutor, PlaybookRunService};
use playbooks_protocols::error::{AppError, CollectionError};
use playbooks_protocols::hooks::ProductHooks;
use playbooks_protocols::types::{
    ChannelMember, CollectionMetadata, CommandArgs, CommandResponse, Permission, PluginContext,
    Post, TopicMetadata, User,
};

#[cfg(test)]
#[path = "hooks_tests.rs"]
mod tests;

pub struct PlaybooksHooks {
    router: Router,
    config: Arc<ConfigService>,
    commands: Arc<dyn CommandExecutor>,
    channel_actions: Arc<dyn ChannelActionService>,
    runs: Arc<dyn PlaybookRunService>,
    bridge: CollectionBridge,
}

impl PlaybooksHooks {
    pub fn new(
        router: Router,
        config: Arc<ConfigService>,
        commands: Arc<dyn CommandExecutor>,
        channel_actions: Arc<dyn ChannelActionService>,
        runs: Arc<dyn PlaybookRunService>,
        bridge: CollectionBridge,
    ) -> Self {
        Self {
            router,
            config,
            commands,
            channel_actions,
            runs,
            bridge,
        }
    }
}

/// The actor is only reported when someone else added the member.
fn actor_id<'a>(member: &ChannelMember, actor: Option<&'a User>) -> Option<&'a str> {
    actor
        .filter(|actor| actor.id != member.user_id)
        .map(|actor| actor.id.as_str())
}

#[async_trait]
impl ProductHooks for PlaybooksHooks {
    async fn serve_http(&self, _ctx: &PluginContext, request: Request<Body>) -> Response<Body> {
        match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }

    async fn on_configuration_change(&self) -> Result<(), AppError> {
        self.config.on_configuration_change().map_err(|e| {
            AppError::internal(
                "Playbooks.OnConfigurationChange",
                "app.configuration.change.error",
                e.to_string(),
            )
        })
    }

    async fn execute_command(
        &self,
        ctx: &PluginContext,
        args: &CommandArgs,
    ) -> Result<CommandResponse, AppError> {
        if let Err(e) = self.commands.execute(ctx, args).await {
            error!(command = %args.command, error = %e, "command failed");
            return Err(AppError::internal(
                "Playbooks.ExecuteCommand",
                "app.command.execute.error",
                e.to_string(),
            ));
        }
        Ok(CommandResponse::default())
    }

    async fn user_has_joined_channel(
        &self,
        _ctx: &PluginContext,
        member: &ChannelMember,
        actor: Option<&User>,
    ) {
        self.channel_actions
            .user_has_joined_channel(&member.user_id, &member.channel_id, actor_id(member, actor))
            .await;
    }

    async fn message_has_been_posted(&self, _ctx: &PluginContext, post: &Post) {
        self.channel_actions.message_has_been_posted(post).await;
        self.runs.message_has_been_posted(post).await;
    }

    async fn user_has_permission_to_collection(
        &self,
        _ctx: &PluginContext,
        user_id: &str,
        collection_type: &str,
        collection_id: &str,
        permission: &Permission,
    ) -> Result<bool, CollectionError> {
        self.bridge
            .user_has_permission_to_collection(user_id, collection_type, collection_id, permission)
            .await
    }

    async fn get_all_collection_ids_for_user(
        &self,
        _ctx: &PluginContext,
        user_id: &str,
        collection_type: &str,
    ) -> Result<Vec<String>, CollectionError> {
        self.bridge.collection_ids_for_user(user_id, collection_type).await
    }

    async fn get_all_user_ids_for_collection(
        &self,
        _ctx: &PluginContext,
        collection_type: &str,
        collection_id: &str,
    ) -> Result<Vec<String>, CollectionError> {
        self.bridge
            .user_ids_for_collection(collection_type, collection_id)
            .await
    }

    async fn get_collection_metadata_by_ids(
        &self,
        _ctx: &PluginContext,
        collection_type: &str,
        collection_ids: &[String],
    ) -> Result<HashMap<String, CollectionMetadata>, CollectionError> {
        self.bridge
            .collection_metadata(collection_type, collection_ids)
            .await
    }

    async fn get_topic_metadata_by_ids(
        &self,
        _ctx: &PluginContext,
        topic_type: &str,
        topic_ids: &[String],
    ) -> Result<HashMap<String, TopicMetadata>, CollectionError> {
        let metadata = self.bridge.topic_metadata(topic_type, topic_ids).await?;
        debug!(topic_type, found = metadata.len(), "topic metadata");
        Ok(metadata)
    }
}
