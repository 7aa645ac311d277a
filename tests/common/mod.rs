//! Shared fixtures for the product integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use playbooks::{
    DomainServices, KernelConfig, RunServiceDeps, ServiceContext, ServiceFactory, Stores,
    TelemetryIdentity,
};
use playbooks_config::TelemetryCredentials;
use playbooks_core::testing::{FakeDomain, FakeHost, FakePermissions, FakeRuns, FakeStore};
use playbooks_core::Capabilities;
use playbooks_protocols::domain::{
    CategoryService, CategoryStore, ChannelActionService, ChannelActionStore, CommandExecutor,
    JobOnceScheduler, LicenseChecker, PermissionsService, PlaybookRunService, PlaybookService,
    PlaybookStore, Poster, QueryExecutor, TelemetryClient,
};
use playbooks_protocols::error::{StoreError, TelemetryError};

/// Factory handing out the shared fakes and recording the construction order.
pub struct RecordingFactory {
    pub store: Arc<FakeStore>,
    pub runs: Arc<FakeRuns>,
    pub domain: Arc<FakeDomain>,
    pub permissions: Arc<FakePermissions>,
    pub calls: Mutex<Vec<&'static str>>,
    pub identity: Mutex<Option<TelemetryIdentity>>,
    pub fail_stores: AtomicBool,
    pub fail_telemetry: AtomicBool,
}

impl RecordingFactory {
    pub fn new() -> Arc<Self> {
        Self::with_store(FakeStore::new())
    }

    pub fn with_store(store: Arc<FakeStore>) -> Arc<Self> {
        Arc::new(Self {
            store,
            runs: FakeRuns::new(),
            domain: FakeDomain::new(),
            permissions: FakePermissions::new(true),
            calls: Mutex::new(Vec::new()),
            identity: Mutex::new(None),
            fail_stores: AtomicBool::new(false),
            fail_telemetry: AtomicBool::new(false),
        })
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl ServiceFactory for RecordingFactory {
    fn telemetry(
        &self,
        _credentials: TelemetryCredentials,
        identity: TelemetryIdentity,
    ) -> Result<Arc<dyn TelemetryClient>, TelemetryError> {
        self.record("telemetry");
        if self.fail_telemetry.load(Ordering::SeqCst) {
            return Err(TelemetryError::InvalidCredentials("write key".to_string()));
        }
        *self.identity.lock() = Some(identity);
        Ok(self.domain.clone())
    }

    fn job_scheduler(&self, _capabilities: &Capabilities) -> Arc<dyn JobOnceScheduler> {
        self.record("job_scheduler");
        self.domain.clone()
    }

    async fn stores(&self, _ctx: &ServiceContext) -> Result<Stores, StoreError> {
        self.record("stores");
        if self.fail_stores.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("no database".to_string()));
        }
        Ok(Stores {
            sql: self.store.clone(),
            runs: self.store.clone(),
            playbooks: self.store.clone(),
            stats: self.domain.clone(),
            user_info: self.domain.clone(),
            channel_actions: self.domain.clone(),
            categories: self.domain.clone(),
        })
    }

    fn bot(&self, _ctx: &ServiceContext) -> Arc<dyn Poster> {
        self.record("bot");
        self.domain.clone()
    }

    fn playbook_service(
        &self,
        _ctx: &ServiceContext,
        _store: Arc<dyn PlaybookStore>,
        _bot: Arc<dyn Poster>,
    ) -> Arc<dyn PlaybookService> {
        self.record("playbook_service");
        self.domain.clone()
    }

    fn channel_action_service(
        &self,
        _ctx: &ServiceContext,
        _store: Arc<dyn ChannelActionStore>,
        _playbooks: Arc<dyn PlaybookService>,
        _bot: Arc<dyn Poster>,
    ) -> Arc<dyn ChannelActionService> {
        self.record("channel_action_service");
        self.domain.clone()
    }

    fn category_service(
        &self,
        _ctx: &ServiceContext,
        _store: Arc<dyn CategoryStore>,
    ) -> Arc<dyn CategoryService> {
        self.record("category_service");
        self.domain.clone()
    }

    fn license_checker(&self, _ctx: &ServiceContext) -> Arc<dyn LicenseChecker> {
        self.record("license_checker");
        self.domain.clone()
    }

    fn run_service(&self, _ctx: &ServiceContext, _deps: RunServiceDeps) -> Arc<dyn PlaybookRunService> {
        self.record("run_service");
        self.runs.clone()
    }

    fn permissions_service(
        &self,
        _ctx: &ServiceContext,
        _playbooks: Arc<dyn PlaybookService>,
        _runs: Arc<dyn PlaybookRunService>,
        _license: Arc<dyn LicenseChecker>,
    ) -> Arc<dyn PermissionsService> {
        self.record("permissions_service");
        self.permissions.clone()
    }

    fn query_executor(
        &self,
        _ctx: &ServiceContext,
        _services: &DomainServices,
        _stores: &Stores,
    ) -> Arc<dyn QueryExecutor> {
        self.record("query_executor");
        self.domain.clone()
    }

    fn command_executor(
        &self,
        _ctx: &ServiceContext,
        _services: &DomainServices,
        _stores: &Stores,
    ) -> Arc<dyn CommandExecutor> {
        self.record("command_executor");
        self.domain.clone()
    }
}

/// Kernel settings with the metrics server on an ephemeral local port.
pub fn kernel_config() -> KernelConfig {
    let mut kernel = KernelConfig::default();
    kernel.metrics.address = "127.0.0.1:0".to_string();
    kernel
}

pub fn seed_totals(store: &FakeStore) {
    for (query, value) in [
        ("playbooks_active", 4),
        ("runs_active", 9),
        ("reminders_outstanding", 2),
        ("retros_outstanding", 1),
        ("followers_active", 11),
        ("participants_active", 23),
    ] {
        store.set_total(query, value);
    }
}

pub fn host() -> Arc<FakeHost> {
    FakeHost::new()
}
