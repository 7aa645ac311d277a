//! The product lifecycle.
//!
//! [`PlaybooksProduct::initialize`] binds the host capabilities, builds every
//! collaborator, migrates the store and registers with the host.
//! [`start`](PlaybooksProduct::start) registers hooks and the router and
//! turns metrics on when the host enables them.
//! [`stop`](PlaybooksProduct::stop) tears the metrics down again.

use std::sync::Arc;

use axum::Router;
use futures::FutureExt;
use parking_lot::Mutex;
use tracing::{error, info, warn};

use playbooks_api::{create_router, ApiState};
use playbooks_config::{installation_id, ConfigService, KernelConfig};
use playbooks_core::{
    register_descriptors, Capabilities, ClusterMutex, CollectionBridge, KernelState, Lifecycle,
    MigrationGate, RecurringTask, RecurringTasks, ServiceMap,
};
use playbooks_monitor::{
    store_sources, with_error_counter, InstanceInfo, MetricsServer, MetricsUpdater,
    PlaybooksMetrics,
};
use playbooks_protocols::capability::BotService;
use playbooks_protocols::domain::{CommandExecutor, TelemetryClient};
use playbooks_protocols::types::Bot;

use crate::commands::command_definition;
use crate::error::ProductError;
use crate::factory::{
    DomainServices, RunServiceDeps, ServiceContext, ServiceFactory, Stores, TelemetryIdentity,
};
use crate::hooks::PlaybooksHooks;
use crate::logging::init_host_logging;
use crate::telemetry::{toggle_telemetry, NoopTelemetry};

#[cfg(test)]
#[path = "product_tests.rs"]
mod tests;

/// Name of the recurring gauge refresh task.
pub const METRICS_UPDATER_TASK: &str = "metricsUpdater";

/// Metrics machinery that only exists while started with metrics enabled.
struct RunningMetrics {
    metrics: Arc<PlaybooksMetrics>,
    server: Option<MetricsServer>,
    updater: RecurringTask,
}

pub struct PlaybooksProduct {
    kernel: KernelConfig,
    lifecycle: Lifecycle,
    capabilities: Capabilities,
    config: Arc<ConfigService>,
    stores: Stores,
    services: DomainServices,
    commands: Arc<dyn CommandExecutor>,
    router: Router,
    tasks: RecurringTasks,
    running: Mutex<Option<RunningMetrics>>,
    /// Held for the whole of `start` and `stop`.
    transitions: tokio::sync::Mutex<()>,
}

impl RunningMetrics {
    async fn shut_down(self) {
        if let Some(server) = self.server {
            if let Err(e) = server.shutdown().await {
                warn!(error = %e, "error shutting down metrics server");
            }
        }
        self.updater.cancel();
    }
}

impl PlaybooksProduct {
    /// Build a ready product from the host's service map.
    ///
    /// Fails without side effects on the kernel when any required capability
    /// is missing or mistyped. Any error up to and including migration is
    /// fatal. Collection registration failures are logged only.
    pub async fn initialize(
        services: ServiceMap,
        kernel: KernelConfig,
        factory: Arc<dyn ServiceFactory>,
    ) -> Result<Self, ProductError> {
        kernel.validate()?;
        let lifecycle = Lifecycle::new();
        let capabilities = Capabilities::bind(services)?;
        lifecycle.advance(KernelState::Bound)?;

        let product_id = kernel.product.id.clone();
        let config = Arc::new(ConfigService::new(product_id.clone(), capabilities.config.clone())?);
        init_host_logging(
            capabilities.log.clone(),
            &product_id,
            &config.configuration().admin_log_level,
        );

        let bot_user_id = ensure_bot(capabilities.bot.as_ref(), &kernel).await?;
        config.update_configuration(|c| {
            c.bot_user_id = bot_user_id;
            c.admin_log_level = "debug".to_string();
        })?;

        let telemetry = build_telemetry(factory.as_ref(), &capabilities, &kernel)?;
        toggle_telemetry(telemetry.as_ref(), &config.host_config());
        {
            let telemetry = telemetry.clone();
            let config_ref = Arc::downgrade(&config);
            config.register_config_change_listener(move || {
                if let Some(config) = config_ref.upgrade() {
                    toggle_telemetry(telemetry.as_ref(), &config.host_config());
                }
            });
        }

        let ctx = ServiceContext {
            product_id: product_id.clone(),
            capabilities: capabilities.clone(),
            config: config.clone(),
            telemetry: telemetry.clone(),
            scheduler: factory.job_scheduler(&capabilities),
        };

        let stores = factory.stores(&ctx).await?;
        let bot = factory.bot(&ctx);
        let playbooks = factory.playbook_service(&ctx, stores.playbooks.clone(), bot.clone());
        let channel_actions = factory.channel_action_service(
            &ctx,
            stores.channel_actions.clone(),
            playbooks.clone(),
            bot.clone(),
        );
        let categories = factory.category_service(&ctx, stores.categories.clone());
        let license = factory.license_checker(&ctx);
        let runs = factory.run_service(
            &ctx,
            RunServiceDeps {
                store: stores.runs.clone(),
                bot: bot.clone(),
                playbooks: playbooks.clone(),
                channel_actions: channel_actions.clone(),
                license: license.clone(),
            },
        );

        let reminder_runs = runs.clone();
        let callback = Arc::new(move |key: String, props: serde_json::Value| {
            let runs = reminder_runs.clone();
            async move { runs.handle_reminder(&key, props).await }.boxed()
        });
        if let Err(e) = ctx.scheduler.set_callback(callback) {
            error!(error = %e, "job scheduler could not add the reminder callback");
        }
        if let Err(e) = ctx.scheduler.start().await {
            error!(error = %e, "job scheduler could not start");
        }
        lifecycle.advance(KernelState::MigrationPending)?;

        // Migrations schedule jobs, so they run after the scheduler has started.
        let mutex = ClusterMutex::new(
            capabilities.kv_store.clone(),
            &kernel.cluster.migration_mutex,
        )?;
        MigrationGate::new(mutex).run(stores.sql.as_ref()).await?;

        let permissions =
            factory.permissions_service(&ctx, playbooks.clone(), runs.clone(), license.clone());
        let services = DomainServices {
            bot,
            playbooks,
            channel_actions,
            categories,
            license,
            runs,
            permissions,
        };

        register_descriptors(capabilities.threads.as_ref()).await;

        let state = ApiState {
            queries: factory.query_executor(&ctx, &services, &stores),
            playbooks: services.playbooks.clone(),
            runs: services.runs.clone(),
            permissions: services.permissions.clone(),
            stats: stores.stats.clone(),
            license: services.license.clone(),
            channel_actions: services.channel_actions.clone(),
            categories: services.categories.clone(),
            user_info: stores.user_info.clone(),
            telemetry,
            config: config.clone(),
        };
        let router = create_router(Arc::new(state));
        let commands = factory.command_executor(&ctx, &services, &stores);

        let testing = config.host_config().testing_enabled();
        capabilities
            .command
            .register_command(&product_id, command_definition(testing))
            .await
            .map_err(ProductError::Command)?;

        lifecycle.advance(KernelState::Ready)?;
        info!(product = %product_id, "playbooks initialized");

        Ok(Self {
            kernel,
            lifecycle,
            capabilities,
            config,
            stores,
            services,
            commands,
            router,
            tasks: RecurringTasks::new(),
            running: Mutex::new(None),
            transitions: tokio::sync::Mutex::new(()),
        })
    }

    pub fn state(&self) -> KernelState {
        self.lifecycle.state()
    }

    pub fn config(&self) -> &Arc<ConfigService> {
        &self.config
    }

    /// Metrics of a started product with metrics enabled.
    pub fn metrics(&self) -> Option<Arc<PlaybooksMetrics>> {
        self.running.lock().as_ref().map(|r| r.metrics.clone())
    }

    pub fn metrics_server_addr(&self) -> Option<std::net::SocketAddr> {
        self.running
            .lock()
            .as_ref()
            .and_then(|r| r.server.as_ref().map(MetricsServer::local_addr))
    }

    /// Start metrics when enabled, register hooks and register the router.
    ///
    /// A product starts once. A failed start leaves it stopped with nothing
    /// registered and no metrics running. Runs exclusively of [`stop`](Self::stop).
    pub async fn start(&self) -> Result<(), ProductError> {
        let _transitions = self.transitions.lock().await;
        self.lifecycle
            .transition(KernelState::Ready, KernelState::Started)?;

        if let Err(e) = self.start_inner().await {
            if let Err(transition) = self
                .lifecycle
                .transition(KernelState::Started, KernelState::Stopped)
            {
                warn!(error = %transition, "failed start could not mark the product stopped");
            }
            return Err(e);
        }
        info!(product = %self.kernel.product.id, "playbooks started");
        Ok(())
    }

    async fn start_inner(&self) -> Result<(), ProductError> {
        let product_id = &self.kernel.product.id;

        let metrics = if self.config.host_config().metrics_enabled() {
            Some(Arc::new(
                PlaybooksMetrics::new(InstanceInfo {
                    version: self.kernel.product.build_hash.clone(),
                    installation_id: installation_id(),
                })
                .await,
            ))
        } else {
            None
        };

        let router = match &metrics {
            Some(metrics) => with_error_counter(self.router.clone(), metrics.clone()),
            None => self.router.clone(),
        };

        let running = match metrics {
            Some(metrics) => Some(self.start_metrics(metrics).await?),
            None => None,
        };

        let hooks = Arc::new(PlaybooksHooks::new(
            router.clone(),
            self.config.clone(),
            self.commands.clone(),
            self.services.channel_actions.clone(),
            self.services.runs.clone(),
            CollectionBridge::new(self.services.runs.clone(), self.services.permissions.clone()),
        ));
        let registered = self
            .capabilities
            .hooks()
            .map_err(ProductError::from)
            .and_then(|host| host.register_hooks(product_id, hooks).map_err(ProductError::Hooks));
        if let Err(e) = registered {
            if let Some(running) = running {
                running.shut_down().await;
            }
            return Err(e);
        }

        *self.running.lock() = running;
        self.capabilities.router.register_router(product_id, router);
        Ok(())
    }

    async fn start_metrics(
        &self,
        metrics: Arc<PlaybooksMetrics>,
    ) -> Result<RunningMetrics, ProductError> {
        let address = &self.kernel.metrics.address;
        info!(port = %address, "starting playbooks metrics server");
        let server = match MetricsServer::start(address, &metrics).await {
            Ok(server) => Some(server),
            Err(e) => {
                error!(error = %e, "metrics server could not be started");
                None
            }
        };

        let updater = Arc::new(MetricsUpdater::new(
            metrics.clone(),
            store_sources(self.stores.playbooks.clone(), self.stores.runs.clone()),
        ));
        let scheduled = self.tasks.schedule(
            METRICS_UPDATER_TASK,
            self.kernel.metrics.refresh_interval(),
            move || {
                let updater = updater.clone();
                async move {
                    updater.refresh().await;
                }
            },
        );
        let task = match scheduled {
            Ok(task) => task,
            Err(e) => {
                if let Some(server) = server {
                    if let Err(e) = server.shutdown().await {
                        warn!(error = %e, "error shutting down metrics server");
                    }
                }
                return Err(e.into());
            }
        };

        Ok(RunningMetrics {
            metrics,
            server,
            updater: task,
        })
    }

    /// Shut the metrics server down and cancel the gauge refresh.
    ///
    /// Does nothing unless started. Shutdown errors are logged; stop always
    /// succeeds. Waits for an in-flight [`start`](Self::start) to finish.
    pub async fn stop(&self) -> Result<(), ProductError> {
        let _transitions = self.transitions.lock().await;
        if self
            .lifecycle
            .transition(KernelState::Started, KernelState::Stopped)
            .is_err()
        {
            return Ok(());
        }

        let running = self.running.lock().take();
        if let Some(running) = running {
            running.shut_down().await;
        }
        info!(product = %self.kernel.product.id, "playbooks stopped");
        Ok(())
    }
}

async fn ensure_bot(bots: &dyn BotService, kernel: &KernelConfig) -> Result<String, ProductError> {
    if let Some(bot) = bots
        .get_bot(&kernel.bot.username)
        .await
        .map_err(ProductError::Bot)?
    {
        return Ok(bot.user_id);
    }

    let bot = bots
        .create_bot(Bot {
            user_id: String::new(),
            username: kernel.bot.username.clone(),
            display_name: kernel.bot.display_name.clone(),
            description: kernel.bot.description.clone(),
            owner_id: kernel.bot.owner_id.clone(),
        })
        .await
        .map_err(ProductError::Bot)?;
    info!(bot_user_id = %bot.user_id, "bot created");
    Ok(bot.user_id)
}

fn build_telemetry(
    factory: &dyn ServiceFactory,
    capabilities: &Capabilities,
    kernel: &KernelConfig,
) -> Result<Arc<dyn TelemetryClient>, ProductError> {
    let Some(credentials) = kernel.telemetry.credentials() else {
        warn!("telemetry credentials are not set, disabling analytics");
        return Ok(Arc::new(NoopTelemetry));
    };
    let identity = TelemetryIdentity {
        diagnostic_id: capabilities.system.diagnostic_id(),
        build_hash: kernel.product.build_hash.clone(),
        server_version: capabilities.system.server_version(),
    };
    Ok(factory.telemetry(credentials, identity)?)
}
