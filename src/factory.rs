//! Construction of the domain collaborators.
//!
//! The kernel does not implement stores, run rules or analytics transport.
//! A [`ServiceFactory`] builds them; the kernel calls it in dependency order
//! and hands each constructor the collaborators it depends on.

use std::sync::Arc;

use async_trait::async_trait;

use playbooks_config::{ConfigService, TelemetryCredentials};
use playbooks_core::Capabilities;
use playbooks_protocols::domain::{
    CategoryService, CategoryStore, ChannelActionService, ChannelActionStore, CommandExecutor,
    JobOnceScheduler, LicenseChecker, PermissionsService, PlaybookRunService, PlaybookRunStore,
    PlaybookService, PlaybookStore, Poster, QueryExecutor, SqlStore, StatsStore, TelemetryClient,
    UserInfoStore,
};
use playbooks_protocols::error::{StoreError, TelemetryError};

/// What the analytics client reports about this installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryIdentity {
    pub diagnostic_id: String,
    pub build_hash: String,
    pub server_version: String,
}

/// Everything a constructor may need besides its direct dependencies.
#[derive(Clone)]
pub struct ServiceContext {
    pub product_id: String,
    pub capabilities: Capabilities,
    pub config: Arc<ConfigService>,
    pub telemetry: Arc<dyn TelemetryClient>,
    pub scheduler: Arc<dyn JobOnceScheduler>,
}

/// The store layer.
#[derive(Clone)]
pub struct Stores {
    pub sql: Arc<dyn SqlStore>,
    pub runs: Arc<dyn PlaybookRunStore>,
    pub playbooks: Arc<dyn PlaybookStore>,
    pub stats: Arc<dyn StatsStore>,
    pub user_info: Arc<dyn UserInfoStore>,
    pub channel_actions: Arc<dyn ChannelActionStore>,
    pub categories: Arc<dyn CategoryStore>,
}

/// Dependencies of the run service, which depends on everything built
/// before it.
#[derive(Clone)]
pub struct RunServiceDeps {
    pub store: Arc<dyn PlaybookRunStore>,
    pub bot: Arc<dyn Poster>,
    pub playbooks: Arc<dyn PlaybookService>,
    pub channel_actions: Arc<dyn ChannelActionService>,
    pub license: Arc<dyn LicenseChecker>,
}

/// Domain services, fully wired.
#[derive(Clone)]
pub struct DomainServices {
    pub bot: Arc<dyn Poster>,
    pub playbooks: Arc<dyn PlaybookService>,
    pub channel_actions: Arc<dyn ChannelActionService>,
    pub categories: Arc<dyn CategoryService>,
    pub license: Arc<dyn LicenseChecker>,
    pub runs: Arc<dyn PlaybookRunService>,
    pub permissions: Arc<dyn PermissionsService>,
}

#[async_trait]
pub trait ServiceFactory: Send + Sync {
    /// Analytics client for the configured credentials.
    fn telemetry(
        &self,
        credentials: TelemetryCredentials,
        identity: TelemetryIdentity,
    ) -> Result<Arc<dyn TelemetryClient>, TelemetryError>;

    /// Cluster-aware one-shot job scheduler.
    fn job_scheduler(&self, capabilities: &Capabilities) -> Arc<dyn JobOnceScheduler>;

    async fn stores(&self, ctx: &ServiceContext) -> Result<Stores, StoreError>;

    fn bot(&self, ctx: &ServiceContext) -> Arc<dyn Poster>;

    fn playbook_service(
        &self,
        ctx: &ServiceContext,
        store: Arc<dyn PlaybookStore>,
        bot: Arc<dyn Poster>,
    ) -> Arc<dyn PlaybookService>;

    fn channel_action_service(
        &self,
        ctx: &ServiceContext,
        store: Arc<dyn ChannelActionStore>,
        playbooks: Arc<dyn PlaybookService>,
        bot: Arc<dyn Poster>,
    ) -> Arc<dyn ChannelActionService>;

    fn category_service(
        &self,
        ctx: &ServiceContext,
        store: Arc<dyn CategoryStore>,
    ) -> Arc<dyn CategoryService>;

    fn license_checker(&self, ctx: &ServiceContext) -> Arc<dyn LicenseChecker>;

    fn run_service(&self, ctx: &ServiceContext, deps: RunServiceDeps) -> Arc<dyn PlaybookRunService>;

    fn permissions_service(
        &self,
        ctx: &ServiceContext,
        playbooks: Arc<dyn PlaybookService>,
        runs: Arc<dyn PlaybookRunService>,
        license: Arc<dyn LicenseChecker>,
    ) -> Arc<dyn PermissionsService>;

    fn query_executor(
        &self,
        ctx: &ServiceContext,
        services: &DomainServices,
        stores: &Stores,
    ) -> Arc<dyn QueryExecutor>;

    fn command_executor(
        &self,
        ctx: &ServiceContext,
        services: &DomainServices,
        stores: &Stores,
    ) -> Arc<dyn CommandExecutor>;
}
