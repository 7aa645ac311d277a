//! In-memory host used by tests.
//!
//! [`FakeHost`] implements every capability trait and records what the
//! kernel registers with it. [`FakeStore`], [`FakeRuns`], [`FakePermissions`]
//! and [`FakeDomain`] stand in for domain collaborators. Failure switches
//! let tests drive error paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use parking_lot::Mutex;
use tokio::time::Instant;

use playbooks_protocols::capability::{
    BotService, ChannelService, CloudService, ClusterService, CommandService, ConfigService,
    FileInfoStoreService, FilestoreService, FrontendService, HooksService, KvStoreService,
    LicenseService, LogService, PermissionService, PostService, PreferencesService, RouterService,
    SessionService, StoreService, SystemService, TeamService, ThreadsService, UserService,
};
use playbooks_protocols::domain::{
    CategoryService, CategoryStore, ChannelActionService, ChannelActionStore, CommandExecutor,
    JobOnceScheduler, LicenseChecker, PermissionsService, PlaybookRunService, PlaybookRunStore,
    PlaybookService, PlaybookStore, Poster, QueryExecutor, ReminderCallback, SqlStore, StatsStore,
    TelemetryClient, UserInfoStore,
};
use playbooks_protocols::error::{CommandError, ServiceError, StoreError, TelemetryError};
use playbooks_protocols::hooks::ProductHooks;
use playbooks_protocols::types::{
    Bot, Category, Channel, ChannelAction, CloudLimits, CommandArgs, CommandDefinition, FileInfo,
    HostConfig, KvSetOptions, License, LogLevel, Permission, Playbook, PlaybookRun, PluginContext,
    Post, Preference, RunMetadata, Session, Team, TopicRecord, User, UserInfo,
};

use crate::capability::{ServiceKey, ServiceMap};

#[derive(Default)]
pub struct FakeHost {
    pub config: Mutex<HostConfig>,
    pub fail_config_save: AtomicBool,
    pub config_saves: AtomicUsize,

    kv: Mutex<KvEntries>,
    /// Number of upcoming `set_with_options` calls that fail.
    pub kv_set_failures: AtomicUsize,

    pub bots: Mutex<HashMap<String, Bot>>,
    pub bot_creates: AtomicUsize,
    pub fail_bot: AtomicBool,

    pub commands: Mutex<Vec<CommandDefinition>>,
    pub fail_command: AtomicBool,

    pub topics: Mutex<Vec<(String, String)>>,
    pub fail_threads: AtomicBool,

    pub routers: Mutex<Vec<(String, Router)>>,

    pub hooks: Mutex<Vec<(String, Arc<dyn ProductHooks>)>>,
    pub fail_hooks: AtomicBool,

    pub logs: Mutex<Vec<(LogLevel, String)>>,
    pub websocket_events: Mutex<Vec<String>>,
    pub license: Mutex<Option<License>>,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_metrics_enabled(&self, enabled: bool) {
        self.config.lock().metrics_settings.enable = Some(enabled);
    }

    pub fn set_diagnostics_enabled(&self, enabled: bool) {
        self.config.lock().log_settings.enable_diagnostics = Some(enabled);
    }

    /// Service map with every capability, required and optional.
    pub fn service_map(self: &Arc<Self>) -> ServiceMap {
        let mut map = ServiceMap::new();
        map.insert(ServiceKey::Team, self.clone() as Arc<dyn TeamService>)
            .insert(ServiceKey::Channel, self.clone() as Arc<dyn ChannelService>)
            .insert(ServiceKey::User, self.clone() as Arc<dyn UserService>)
            .insert(ServiceKey::Post, self.clone() as Arc<dyn PostService>)
            .insert(ServiceKey::Permissions, self.clone() as Arc<dyn PermissionService>)
            .insert(ServiceKey::Bot, self.clone() as Arc<dyn BotService>)
            .insert(ServiceKey::Cluster, self.clone() as Arc<dyn ClusterService>)
            .insert(ServiceKey::Config, self.clone() as Arc<dyn ConfigService>)
            .insert(ServiceKey::Log, self.clone() as Arc<dyn LogService>)
            .insert(ServiceKey::License, self.clone() as Arc<dyn LicenseService>)
            .insert(ServiceKey::Filestore, self.clone() as Arc<dyn FilestoreService>)
            .insert(ServiceKey::FileInfoStore, self.clone() as Arc<dyn FileInfoStoreService>)
            .insert(ServiceKey::Router, self.clone() as Arc<dyn RouterService>)
            .insert(ServiceKey::Cloud, self.clone() as Arc<dyn CloudService>)
            .insert(ServiceKey::KvStore, self.clone() as Arc<dyn KvStoreService>)
            .insert(ServiceKey::Store, self.clone() as Arc<dyn StoreService>)
            .insert(ServiceKey::System, self.clone() as Arc<dyn SystemService>)
            .insert(ServiceKey::Preferences, self.clone() as Arc<dyn PreferencesService>)
            .insert(ServiceKey::Hooks, self.clone() as Arc<dyn HooksService>)
            .insert(ServiceKey::Session, self.clone() as Arc<dyn SessionService>)
            .insert(ServiceKey::Frontend, self.clone() as Arc<dyn FrontendService>)
            .insert(ServiceKey::Command, self.clone() as Arc<dyn CommandService>)
            .insert(ServiceKey::Threads, self.clone() as Arc<dyn ThreadsService>);
        map
    }

    pub fn kv_contains(&self, key: &str) -> bool {
        self.live_value(key).is_some()
    }

    fn live_value(&self, key: &str) -> Option<Vec<u8>> {
        live_entry(&mut self.kv.lock(), key)
    }
}

type KvEntries = HashMap<String, (Vec<u8>, Option<Instant>)>;

fn live_entry(kv: &mut KvEntries, key: &str) -> Option<Vec<u8>> {
    let expired = matches!(kv.get(key), Some((_, Some(deadline))) if *deadline <= Instant::now());
    if expired {
        kv.remove(key);
        return None;
    }
    kv.get(key).map(|(value, _)| value.clone())
}

fn failure(flag: &AtomicBool, what: &str) -> Result<(), ServiceError> {
    if flag.load(Ordering::SeqCst) {
        return Err(ServiceError::Unavailable(what.to_string()));
    }
    Ok(())
}

#[async_trait]
impl TeamService for FakeHost {
    async fn get_team(&self, team_id: &str) -> Result<Team, ServiceError> {
        Ok(Team {
            id: team_id.to_string(),
            ..Team::default()
        })
    }

    async fn is_member(&self, _team_id: &str, _user_id: &str) -> Result<bool, ServiceError> {
        Ok(true)
    }
}

#[async_trait]
impl ChannelService for FakeHost {
    async fn get_channel(&self, channel_id: &str) -> Result<Channel, ServiceError> {
        Ok(Channel {
            id: channel_id.to_string(),
            ..Channel::default()
        })
    }

    async fn add_member(&self, _channel_id: &str, _user_id: &str) -> Result<(), ServiceError> {
        Ok(())
    }
}

#[async_trait]
impl UserService for FakeHost {
    async fn get_user(&self, user_id: &str) -> Result<User, ServiceError> {
        Ok(User {
            id: user_id.to_string(),
            username: user_id.to_string(),
        })
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, ServiceError> {
        Err(ServiceError::NotFound(username.to_string()))
    }
}

#[async_trait]
impl PostService for FakeHost {
    async fn create_post(&self, post: Post) -> Result<Post, ServiceError> {
        Ok(post)
    }

    async fn update_post(&self, post: Post) -> Result<Post, ServiceError> {
        Ok(post)
    }
}

#[async_trait]
impl PermissionService for FakeHost {
    async fn has_permission_to(&self, _user_id: &str, _permission_id: &str) -> bool {
        true
    }

    async fn has_permission_to_team(&self, _user_id: &str, _team_id: &str, _permission_id: &str) -> bool {
        true
    }

    async fn has_permission_to_channel(
        &self,
        _user_id: &str,
        _channel_id: &str,
        _permission_id: &str,
    ) -> bool {
        true
    }
}

#[async_trait]
impl BotService for FakeHost {
    async fn get_bot(&self, username: &str) -> Result<Option<Bot>, ServiceError> {
        failure(&self.fail_bot, "bots")?;
        Ok(self.bots.lock().get(username).cloned())
    }

    async fn create_bot(&self, mut bot: Bot) -> Result<Bot, ServiceError> {
        failure(&self.fail_bot, "bots")?;
        let n = self.bot_creates.fetch_add(1, Ordering::SeqCst);
        bot.user_id = format!("bot-user-{}", n + 1);
        self.bots.lock().insert(bot.username.clone(), bot.clone());
        Ok(bot)
    }
}

#[async_trait]
impl ClusterService for FakeHost {
    async fn publish_event(&self, _event_id: &str, _payload: Vec<u8>) -> Result<(), ServiceError> {
        Ok(())
    }
}

impl ConfigService for FakeHost {
    fn config(&self) -> HostConfig {
        self.config.lock().clone()
    }

    fn save_plugin_config(&self, product_id: &str, value: serde_json::Value) -> Result<(), ServiceError> {
        failure(&self.fail_config_save, "config")?;
        self.config_saves.fetch_add(1, Ordering::SeqCst);
        self.config
            .lock()
            .plugin_settings
            .insert(product_id.to_string(), value);
        Ok(())
    }
}

impl LogService for FakeHost {
    fn log(&self, level: LogLevel, message: &str, _fields: &[(String, String)]) {
        self.logs.lock().push((level, message.to_string()));
    }
}

impl LicenseService for FakeHost {
    fn license(&self) -> Option<License> {
        self.license.lock().clone()
    }
}

#[async_trait]
impl FilestoreService for FakeHost {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, ServiceError> {
        Err(ServiceError::NotFound(path.to_string()))
    }
}

#[async_trait]
impl FileInfoStoreService for FakeHost {
    async fn get_file_info(&self, file_id: &str) -> Result<FileInfo, ServiceError> {
        Err(ServiceError::NotFound(file_id.to_string()))
    }
}

impl RouterService for FakeHost {
    fn register_router(&self, product_id: &str, router: Router) {
        self.routers.lock().push((product_id.to_string(), router));
    }
}

#[async_trait]
impl CloudService for FakeHost {
    async fn get_cloud_limits(&self) -> Result<CloudLimits, ServiceError> {
        Ok(CloudLimits::default())
    }
}

#[async_trait]
impl KvStoreService for FakeHost {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ServiceError> {
        Ok(self.live_value(key))
    }

    async fn set_with_options(
        &self,
        key: &str,
        value: Option<Vec<u8>>,
        options: KvSetOptions,
    ) -> Result<bool, ServiceError> {
        let pending = self.kv_set_failures.load(Ordering::SeqCst);
        if pending > 0 {
            self.kv_set_failures.store(pending - 1, Ordering::SeqCst);
            return Err(ServiceError::Unavailable("kv set".to_string()));
        }

        let mut kv = self.kv.lock();
        if options.atomic && live_entry(&mut kv, key) != options.old_value {
            return Ok(false);
        }
        match value {
            Some(value) => {
                let deadline = options.expire_in.map(|ttl| Instant::now() + ttl);
                kv.insert(key.to_string(), (value, deadline));
            }
            None => {
                kv.remove(key);
            }
        }
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<(), ServiceError> {
        self.kv.lock().remove(key);
        Ok(())
    }
}

impl StoreService for FakeHost {
    fn driver_name(&self) -> String {
        "postgres".to_string()
    }

    fn data_source(&self) -> String {
        "postgres://localhost/playbooks_test".to_string()
    }
}

impl SystemService for FakeHost {
    fn diagnostic_id(&self) -> String {
        "diagnostic-id".to_string()
    }

    fn server_version(&self) -> String {
        "9.0.0".to_string()
    }
}

#[async_trait]
impl PreferencesService for FakeHost {
    async fn get_preferences_for_user(&self, _user_id: &str) -> Result<Vec<Preference>, ServiceError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl SessionService for FakeHost {
    async fn get_session(&self, token: &str) -> Result<Session, ServiceError> {
        Err(ServiceError::NotFound(token.to_string()))
    }
}

impl FrontendService for FakeHost {
    fn publish_websocket_event(&self, event: &str, _payload: serde_json::Value, _user_id: Option<&str>) {
        self.websocket_events.lock().push(event.to_string());
    }
}

#[async_trait]
impl CommandService for FakeHost {
    async fn register_command(
        &self,
        _product_id: &str,
        command: CommandDefinition,
    ) -> Result<(), ServiceError> {
        failure(&self.fail_command, "commands")?;
        self.commands.lock().push(command);
        Ok(())
    }
}

#[async_trait]
impl ThreadsService for FakeHost {
    async fn register_collection_and_topic(
        &self,
        collection_type: &str,
        topic_type: &str,
    ) -> Result<(), ServiceError> {
        failure(&self.fail_threads, "threads")?;
        self.topics
            .lock()
            .push((collection_type.to_string(), topic_type.to_string()));
        Ok(())
    }
}

impl HooksService for FakeHost {
    fn register_hooks(&self, product_id: &str, hooks: Arc<dyn ProductHooks>) -> Result<(), ServiceError> {
        failure(&self.fail_hooks, "hooks")?;
        self.hooks.lock().push((product_id.to_string(), hooks));
        Ok(())
    }
}

/// SQL store stand-in. The migration body runs once; later calls find the
/// schema current. Also answers the metric count queries.
#[derive(Default)]
pub struct FakeStore {
    pub applied: AtomicBool,
    pub migration_bodies: AtomicUsize,
    pub running: AtomicUsize,
    pub max_running: AtomicUsize,
    pub fail_migrations: AtomicBool,
    /// Metric name → count; a missing entry makes that query fail.
    pub totals: Mutex<HashMap<&'static str, i64>>,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_total(&self, query: &'static str, value: i64) {
        self.totals.lock().insert(query, value);
    }

    fn total(&self, query: &'static str) -> Result<i64, StoreError> {
        self.totals
            .lock()
            .get(query)
            .copied()
            .ok_or_else(|| StoreError::Query(format!("{query} unavailable")))
    }
}

#[async_trait]
impl SqlStore for FakeStore {
    async fn run_migrations(&self) -> Result<(), StoreError> {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;

        let result = if self.fail_migrations.load(Ordering::SeqCst) {
            Err(StoreError::Migration("v0.42 failed".to_string()))
        } else {
            if !self.applied.swap(true, Ordering::SeqCst) {
                self.migration_bodies.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        };

        self.running.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[async_trait]
impl PlaybookStore for FakeStore {
    async fn get_playbook(&self, id: &str) -> Result<Playbook, StoreError> {
        Err(StoreError::NotFound(id.to_string()))
    }

    async fn get_playbooks_active_total(&self) -> Result<i64, StoreError> {
        self.total("playbooks_active")
    }
}

#[async_trait]
impl PlaybookRunStore for FakeStore {
    async fn get_runs_active_total(&self) -> Result<i64, StoreError> {
        self.total("runs_active")
    }

    async fn get_overdue_update_runs_total(&self) -> Result<i64, StoreError> {
        self.total("reminders_outstanding")
    }

    async fn get_overdue_retro_runs_total(&self) -> Result<i64, StoreError> {
        self.total("retros_outstanding")
    }

    async fn get_followers_active_total(&self) -> Result<i64, StoreError> {
        self.total("followers_active")
    }

    async fn get_participants_active_total(&self) -> Result<i64, StoreError> {
        self.total("participants_active")
    }
}

/// Run service over an in-memory run table.
#[derive(Default)]
pub struct FakeRuns {
    pub runs: Mutex<HashMap<String, PlaybookRun>>,
    pub followers: Mutex<HashMap<String, Vec<String>>>,
    pub status_topics: Mutex<Vec<TopicRecord>>,
    pub task_topics: Mutex<Vec<TopicRecord>>,
    /// Lookups performed, e.g. `"status"` or `"task"`.
    pub lookups: Mutex<Vec<&'static str>>,
    pub reminders: Mutex<Vec<String>>,
    pub posts_seen: AtomicUsize,
    pub fail_queries: AtomicBool,
}

impl FakeRuns {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_run(&self, run: PlaybookRun, followers: &[&str]) {
        self.followers.lock().insert(
            run.id.clone(),
            followers.iter().map(|f| f.to_string()).collect(),
        );
        self.runs.lock().insert(run.id.clone(), run);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("database is down".to_string()));
        }
        Ok(())
    }

    fn topics(&self, table: &Mutex<Vec<TopicRecord>>, ids: &[String]) -> Vec<TopicRecord> {
        table
            .lock()
            .iter()
            .filter(|t| ids.contains(&t.id))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PlaybookRunService for FakeRuns {
    async fn get_playbook_run(&self, run_id: &str) -> Result<PlaybookRun, StoreError> {
        self.check()?;
        self.runs
            .lock()
            .get(run_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(run_id.to_string()))
    }

    async fn get_playbook_run_ids_for_user(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        self.check()?;
        let followers = self.followers.lock();
        let mut ids: Vec<String> = self
            .runs
            .lock()
            .values()
            .filter(|run| {
                run.participant_ids.iter().any(|p| p == user_id)
                    || followers
                        .get(&run.id)
                        .is_some_and(|f| f.iter().any(|p| p == user_id))
            })
            .map(|run| run.id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn get_followers(&self, run_id: &str) -> Result<Vec<String>, StoreError> {
        self.check()?;
        Ok(self.followers.lock().get(run_id).cloned().unwrap_or_default())
    }

    async fn get_run_metadata_by_ids(&self, run_ids: &[String]) -> Result<Vec<RunMetadata>, StoreError> {
        self.check()?;
        Ok(self
            .runs
            .lock()
            .values()
            .filter(|run| run_ids.contains(&run.id))
            .map(|run| RunMetadata {
                id: run.id.clone(),
                name: run.name.clone(),
                team_id: run.team_id.clone(),
            })
            .collect())
    }

    async fn get_status_metadata_by_ids(&self, ids: &[String]) -> Result<Vec<TopicRecord>, StoreError> {
        self.check()?;
        self.lookups.lock().push("status");
        Ok(self.topics(&self.status_topics, ids))
    }

    async fn get_task_metadata_by_ids(&self, ids: &[String]) -> Result<Vec<TopicRecord>, StoreError> {
        self.check()?;
        self.lookups.lock().push("task");
        Ok(self.topics(&self.task_topics, ids))
    }

    async fn handle_reminder(&self, key: &str, _props: serde_json::Value) {
        self.reminders.lock().push(key.to_string());
    }

    async fn message_has_been_posted(&self, _post: &Post) {
        self.posts_seen.fetch_add(1, Ordering::SeqCst);
    }
}

/// Grants or denies every run permission check.
pub struct FakePermissions {
    pub allow: AtomicBool,
    pub checks: AtomicUsize,
}

impl FakePermissions {
    pub fn new(allow: bool) -> Arc<Self> {
        Arc::new(Self {
            allow: AtomicBool::new(allow),
            checks: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PermissionsService for FakePermissions {
    async fn has_permissions_to_run(&self, _user_id: &str, _run: &PlaybookRun, _permission: &Permission) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst);
        self.allow.load(Ordering::SeqCst)
    }

    async fn run_view(&self, user_id: &str, _run_id: &str) -> Result<(), ServiceError> {
        if self.allow.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(user_id.to_string()))
        }
    }

    async fn playbook_view(&self, user_id: &str, _playbook_id: &str) -> Result<(), ServiceError> {
        if self.allow.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(user_id.to_string()))
        }
    }
}

/// Every remaining domain collaborator in one recording fake.
#[derive(Default)]
pub struct FakeDomain {
    pub playbooks: Mutex<HashMap<String, Playbook>>,
    pub channel_actions: Mutex<Vec<ChannelAction>>,
    pub categories: Mutex<Vec<Category>>,
    pub user_infos: Mutex<HashMap<String, UserInfo>>,
    pub in_progress_runs: AtomicUsize,
    pub stats_licensed: AtomicBool,

    pub joined: Mutex<Vec<(String, String, Option<String>)>>,
    pub posts_seen: AtomicUsize,
    pub ignored_threads: Mutex<Vec<String>>,

    pub telemetry_enabled: AtomicBool,
    pub tracked: Mutex<Vec<String>>,
    pub direct_messages: Mutex<Vec<(String, String)>>,

    pub scheduler_callback: Mutex<Option<ReminderCallback>>,
    pub scheduler_started: AtomicBool,
    pub fail_scheduler: AtomicBool,

    pub commands_run: Mutex<Vec<String>>,
    pub fail_commands: AtomicBool,
}

impl FakeDomain {
    pub fn new() -> Arc<Self> {
        let domain = Self::default();
        domain.stats_licensed.store(true, Ordering::SeqCst);
        Arc::new(domain)
    }
}

#[async_trait]
impl PlaybookService for FakeDomain {
    async fn get(&self, id: &str) -> Result<Playbook, StoreError> {
        self.playbooks
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl StatsStore for FakeDomain {
    async fn total_in_progress_runs(&self, _team_id: Option<&str>) -> Result<i64, StoreError> {
        Ok(self.in_progress_runs.load(Ordering::SeqCst) as i64)
    }

    async fn total_active_participants(&self, _team_id: Option<&str>) -> Result<i64, StoreError> {
        Ok(0)
    }
}

impl LicenseChecker for FakeDomain {
    fn playbook_allowed(&self, _private: bool) -> bool {
        true
    }

    fn retrospective_allowed(&self) -> bool {
        true
    }

    fn timeline_allowed(&self) -> bool {
        true
    }

    fn stats_allowed(&self) -> bool {
        self.stats_licensed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelActionService for FakeDomain {
    async fn get_channel_actions(&self, channel_id: &str) -> Result<Vec<ChannelAction>, StoreError> {
        Ok(self
            .channel_actions
            .lock()
            .iter()
            .filter(|a| a.channel_id == channel_id)
            .cloned()
            .collect())
    }

    async fn user_has_joined_channel(&self, user_id: &str, channel_id: &str, actor_id: Option<&str>) {
        self.joined.lock().push((
            user_id.to_string(),
            channel_id.to_string(),
            actor_id.map(str::to_string),
        ));
    }

    async fn message_has_been_posted(&self, _post: &Post) {
        self.posts_seen.fetch_add(1, Ordering::SeqCst);
    }

    async fn ignore_keywords_thread(&self, post_id: &str) -> Result<(), StoreError> {
        self.ignored_threads.lock().push(post_id.to_string());
        Ok(())
    }
}

#[async_trait]
impl CategoryService for FakeDomain {
    async fn get_categories(&self, team_id: &str, user_id: &str) -> Result<Vec<Category>, StoreError> {
        Ok(self
            .categories
            .lock()
            .iter()
            .filter(|c| c.team_id == team_id && c.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserInfoStore for FakeDomain {
    async fn get(&self, user_id: &str) -> Result<UserInfo, StoreError> {
        self.user_infos
            .lock()
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))
    }

    async fn upsert(&self, info: UserInfo) -> Result<(), StoreError> {
        self.user_infos.lock().insert(info.id.clone(), info);
        Ok(())
    }
}

impl TelemetryClient for FakeDomain {
    fn track(&self, event: &str, _properties: serde_json::Value) {
        self.tracked.lock().push(event.to_string());
    }

    fn enable(&self) -> Result<(), TelemetryError> {
        self.telemetry_enabled.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn disable(&self) -> Result<(), TelemetryError> {
        self.telemetry_enabled.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl Poster for FakeDomain {
    async fn post_message(&self, channel_id: &str, message: &str) -> Result<String, ServiceError> {
        self.direct_messages
            .lock()
            .push((channel_id.to_string(), message.to_string()));
        Ok(format!("post-{}", self.direct_messages.lock().len()))
    }

    async fn dm(&self, user_id: &str, message: &str) -> Result<(), ServiceError> {
        self.direct_messages
            .lock()
            .push((user_id.to_string(), message.to_string()));
        Ok(())
    }
}

#[async_trait]
impl QueryExecutor for FakeDomain {
    async fn execute(
        &self,
        user_id: &str,
        request: serde_json::Value,
    ) -> Result<serde_json::Value, ServiceError> {
        Ok(serde_json::json!({ "data": { "user_id": user_id, "echo": request } }))
    }
}

#[async_trait]
impl JobOnceScheduler for FakeDomain {
    fn set_callback(&self, callback: ReminderCallback) -> Result<(), ServiceError> {
        *self.scheduler_callback.lock() = Some(callback);
        Ok(())
    }

    async fn start(&self) -> Result<(), ServiceError> {
        failure(&self.fail_scheduler, "job scheduler")?;
        self.scheduler_started.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl CommandExecutor for FakeDomain {
    async fn execute(&self, _ctx: &PluginContext, args: &CommandArgs) -> Result<(), CommandError> {
        if self.fail_commands.load(Ordering::SeqCst) {
            return Err(CommandError::Failed(args.command.clone()));
        }
        self.commands_run.lock().push(args.command.clone());
        Ok(())
    }
}

#[async_trait]
impl ChannelActionStore for FakeDomain {
    async fn get_channel_actions(&self, channel_id: &str) -> Result<Vec<ChannelAction>, StoreError> {
        ChannelActionService::get_channel_actions(self, channel_id).await
    }
}

#[async_trait]
impl CategoryStore for FakeDomain {
    async fn get_categories(&self, team_id: &str, user_id: &str) -> Result<Vec<Category>, StoreError> {
        CategoryService::get_categories(self, team_id, user_id).await
    }
}
