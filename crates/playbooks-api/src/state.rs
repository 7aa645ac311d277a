//! Shared handler state.

use std::sync::Arc;

use playbooks_config::ConfigService;
use playbooks_protocols::domain::{
    CategoryService, ChannelActionService, LicenseChecker, PermissionsService, PlaybookRunService,
    PlaybookService, QueryExecutor, StatsStore, TelemetryClient, UserInfoStore,
};

/// Collaborators the HTTP handlers delegate to.
#[derive(Clone)]
pub struct ApiState {
    pub queries: Arc<dyn QueryExecutor>,
    pub playbooks: Arc<dyn PlaybookService>,
    pub runs: Arc<dyn PlaybookRunService>,
    pub permissions: Arc<dyn PermissionsService>,
    pub stats: Arc<dyn StatsStore>,
    pub license: Arc<dyn LicenseChecker>,
    pub channel_actions: Arc<dyn ChannelActionService>,
    pub categories: Arc<dyn CategoryService>,
    pub user_info: Arc<dyn UserInfoStore>,
    pub telemetry: Arc<dyn TelemetryClient>,
    pub config: Arc<ConfigService>,
}
