//! Bridge from `tracing` to the host log.
//!
//! Product code logs with the usual `tracing` macros. [`HostLogLayer`]
//! forwards each event to the host [`LogService`] with its structured fields
//! and a `product` field.

use std::fmt;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{debug, Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use playbooks_protocols::capability::LogService;
use playbooks_protocols::types::LogLevel;

pub struct HostLogLayer {
    log: Arc<dyn LogService>,
    product: String,
}

impl HostLogLayer {
    pub fn new(log: Arc<dyn LogService>, product: impl Into<String>) -> Self {
        Self {
            log,
            product: product.into(),
        }
    }
}

impl<S: Subscriber> Layer<S> for HostLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        visitor
            .fields
            .push(("product".to_string(), self.product.clone()));

        self.log
            .log(log_level(event.metadata().level()), &visitor.message, &visitor.fields);
    }
}

fn log_level(level: &Level) -> LogLevel {
    match *level {
        Level::TRACE => LogLevel::Trace,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Info,
        Level::WARN => LogLevel::Warn,
        Level::ERROR => LogLevel::Error,
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push((field.name().to_string(), format!("{value:?}")));
        }
    }
}

/// Filter for `level`, e.g. the product's admin log level. Falls back to
/// `info` when `level` does not parse.
pub fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the host log bridge as the global subscriber.
///
/// Returns `false` when another global subscriber is already installed.
pub fn init_host_logging(log: Arc<dyn LogService>, product: &str, level: &str) -> bool {
    let installed = tracing_subscriber::registry()
        .with(HostLogLayer::new(log, product).with_filter(level_filter(level)))
        .try_init()
        .is_ok();
    if !installed {
        debug!("global subscriber already set, host log bridge not installed");
    }
    installed
}
