//! Service keys and the host-supplied service map.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Names one capability the host can supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceKey {
    Team,
    Channel,
    User,
    Post,
    Permissions,
    Bot,
    Cluster,
    Config,
    Log,
    License,
    Filestore,
    FileInfoStore,
    Router,
    Cloud,
    KvStore,
    Store,
    System,
    Preferences,
    Hooks,
    Session,
    Frontend,
    Command,
    Threads,
}

impl ServiceKey {
    /// Capabilities the product declares as dependencies.
    pub const REQUIRED: [ServiceKey; 21] = [
        ServiceKey::Team,
        ServiceKey::Channel,
        ServiceKey::User,
        ServiceKey::Post,
        ServiceKey::Bot,
        ServiceKey::Cluster,
        ServiceKey::Config,
        ServiceKey::Log,
        ServiceKey::License,
        ServiceKey::Filestore,
        ServiceKey::FileInfoStore,
        ServiceKey::Router,
        ServiceKey::Cloud,
        ServiceKey::KvStore,
        ServiceKey::Store,
        ServiceKey::System,
        ServiceKey::Preferences,
        ServiceKey::Session,
        ServiceKey::Frontend,
        ServiceKey::Command,
        ServiceKey::Threads,
    ];

    /// Capabilities bound when present but not declared.
    pub const OPTIONAL: [ServiceKey; 2] = [ServiceKey::Permissions, ServiceKey::Hooks];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKey::Team => "team",
            ServiceKey::Channel => "channel",
            ServiceKey::User => "user",
            ServiceKey::Post => "post",
            ServiceKey::Permissions => "permissions",
            ServiceKey::Bot => "bot",
            ServiceKey::Cluster => "cluster",
            ServiceKey::Config => "config",
            ServiceKey::Log => "log",
            ServiceKey::License => "license",
            ServiceKey::Filestore => "filestore",
            ServiceKey::FileInfoStore => "fileinfostore",
            ServiceKey::Router => "router",
            ServiceKey::Cloud => "cloud",
            ServiceKey::KvStore => "kvstore",
            ServiceKey::Store => "storeservice",
            ServiceKey::System => "systemservice",
            ServiceKey::Preferences => "preferencesservice",
            ServiceKey::Hooks => "hooksservice",
            ServiceKey::Session => "sessionservice",
            ServiceKey::Frontend => "frontendservice",
            ServiceKey::Command => "commandservice",
            ServiceKey::Threads => "threadsservice",
        }
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a capability could not be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsatisfiedReason {
    /// The host did not supply the key.
    Missing,
    /// The supplied value does not implement the expected capability.
    Mismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsatisfied {
    pub key: ServiceKey,
    pub reason: UnsatisfiedReason,
}

impl fmt::Display for Unsatisfied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            UnsatisfiedReason::Missing => write!(f, "missing service key '{}'", self.key),
            UnsatisfiedReason::Mismatch => {
                write!(f, "invalid service key '{}': type assertion failed", self.key)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("capability mismatch: {}", join(.0))]
    Unsatisfied(Vec<Unsatisfied>),

    #[error("capability '{0}' was not supplied by the host")]
    Unbound(ServiceKey),
}

impl CapabilityError {
    /// Keys named by this error.
    pub fn keys(&self) -> Vec<ServiceKey> {
        match self {
            CapabilityError::Unsatisfied(list) => list.iter().map(|u| u.key).collect(),
            CapabilityError::Unbound(key) => vec![*key],
        }
    }
}

fn join(list: &[Unsatisfied]) -> String {
    list.iter()
        .map(|u| u.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Type-erased services keyed by [`ServiceKey`], as handed over by the host.
///
/// Values must be the capability trait object itself, e.g.
/// `Arc<dyn TeamService>`; a concrete `Arc<MyTeams>` fails the shape check.
#[derive(Default)]
pub struct ServiceMap {
    entries: HashMap<ServiceKey, Box<dyn Any + Send + Sync>>,
}

impl ServiceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a shared service under `key`, replacing any previous value.
    pub fn insert<T>(&mut self, key: ServiceKey, service: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.entries.insert(key, Box::new(service));
        self
    }

    /// Insert an arbitrary value under `key`.
    pub fn insert_any(&mut self, key: ServiceKey, value: Box<dyn Any + Send + Sync>) -> &mut Self {
        self.entries.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: ServiceKey) -> bool {
        self.entries.remove(&key).is_some()
    }

    pub fn contains(&self, key: ServiceKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for ServiceMap {
    type Item = (ServiceKey, Box<dyn Any + Send + Sync>);
    type IntoIter = std::collections::hash_map::IntoIter<ServiceKey, Box<dyn Any + Send + Sync>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_and_optional_are_disjoint() {
        for key in ServiceKey::OPTIONAL {
            assert!(!key.is_required());
        }
        assert_eq!(ServiceKey::REQUIRED.len() + ServiceKey::OPTIONAL.len(), 23);
    }

    #[test]
    fn test_unsatisfied_display() {
        let missing = Unsatisfied {
            key: ServiceKey::Team,
            reason: UnsatisfiedReason::Missing,
        };
        assert_eq!(missing.to_string(), "missing service key 'team'");

        let mismatch = Unsatisfied {
            key: ServiceKey::KvStore,
            reason: UnsatisfiedReason::Mismatch,
        };
        assert!(mismatch.to_string().contains("kvstore"));
    }

    #[test]
    fn test_error_lists_every_key() {
        let err = CapabilityError::Unsatisfied(vec![
            Unsatisfied {
                key: ServiceKey::Team,
                reason: UnsatisfiedReason::Missing,
            },
            Unsatisfied {
                key: ServiceKey::Log,
                reason: UnsatisfiedReason::Mismatch,
            },
        ]);
        let display = err.to_string();
        assert!(display.starts_with("capability mismatch"));
        assert!(display.contains("'team'"));
        assert!(display.contains("'log'"));
        assert_eq!(err.keys(), vec![ServiceKey::Team, ServiceKey::Log]);
    }

    #[test]
    fn test_service_map_insert_remove() {
        let mut map = ServiceMap::new();
        map.insert(ServiceKey::Team, Arc::new(5u32));
        assert!(map.contains(ServiceKey::Team));
        assert_eq!(map.len(), 1);
        assert!(map.remove(ServiceKey::Team));
        assert!(map.is_empty());
    }
}
