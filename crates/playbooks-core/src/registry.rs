//! Capability registry.
//!
//! Binds host-supplied services to statically typed handles. Binding is
//! all-or-nothing: [`CapabilitiesBuilder::build`] either returns a complete
//! [`Capabilities`] or an error listing every unsatisfied key.

use std::any::Any;
use std::sync::Arc;

use tracing::debug;

use playbooks_protocols::capability::{
    BotService, ChannelService, CloudService, ClusterService, CommandService, ConfigService,
    FileInfoStoreService, FilestoreService, FrontendService, HooksService, KvStoreService,
    LicenseService, LogService, PermissionService, PostService, PreferencesService, RouterService,
    SessionService, StoreService, SystemService, TeamService, ThreadsService, UserService,
};

use crate::capability::{CapabilityError, ServiceKey, ServiceMap, Unsatisfied, UnsatisfiedReason};

macro_rules! define_capabilities {
    (
        required { $( $rfield:ident : $rkey:ident => $rtrait:ident ),* $(,)? }
        optional { $( $ofield:ident : $okey:ident => $otrait:ident ),* $(,)? }
    ) => {
        /// Every capability the kernel runs with. Immutable once built.
        #[derive(Clone)]
        pub struct Capabilities {
            $( pub $rfield: Arc<dyn $rtrait>, )*
            $( $ofield: Option<Arc<dyn $otrait>>, )*
        }

        impl Capabilities {
            $(
                /// Optional capability; unbound means the host omitted it.
                pub fn $ofield(&self) -> Result<&Arc<dyn $otrait>, CapabilityError> {
                    self.$ofield
                        .as_ref()
                        .ok_or(CapabilityError::Unbound(ServiceKey::$okey))
                }
            )*
        }

        /// Collects capabilities, then validates them in one step.
        #[derive(Default)]
        pub struct CapabilitiesBuilder {
            $( $rfield: Option<Arc<dyn $rtrait>>, )*
            $( $ofield: Option<Arc<dyn $otrait>>, )*
            mismatched: Vec<ServiceKey>,
        }

        impl CapabilitiesBuilder {
            $(
                pub fn $rfield(mut self, service: Arc<dyn $rtrait>) -> Self {
                    self.$rfield = Some(service);
                    self
                }
            )*
            $(
                pub fn $ofield(mut self, service: Arc<dyn $otrait>) -> Self {
                    self.$ofield = Some(service);
                    self
                }
            )*

            fn bind_entry(&mut self, key: ServiceKey, service: Box<dyn Any + Send + Sync>) {
                match key {
                    $(
                        ServiceKey::$rkey => match service.downcast::<Arc<dyn $rtrait>>() {
                            Ok(bound) => self.$rfield = Some(*bound),
                            Err(_) => self.mismatched.push(key),
                        },
                    )*
                    $(
                        ServiceKey::$okey => match service.downcast::<Arc<dyn $otrait>>() {
                            Ok(bound) => self.$ofield = Some(*bound),
                            Err(_) => self.mismatched.push(key),
                        },
                    )*
                }
            }

            fn missing(&self) -> Vec<ServiceKey> {
                let mut missing = Vec::new();
                $(
                    if self.$rfield.is_none() && !self.mismatched.contains(&ServiceKey::$rkey) {
                        missing.push(ServiceKey::$rkey);
                    }
                )*
                missing
            }

            /// Validate and produce the bound capabilities.
            pub fn build(self) -> Result<Capabilities, CapabilityError> {
                let mut unsatisfied: Vec<Unsatisfied> = self
                    .mismatched
                    .iter()
                    .map(|key| Unsatisfied { key: *key, reason: UnsatisfiedReason::Mismatch })
                    .chain(self.missing().into_iter().map(|key| Unsatisfied {
                        key,
                        reason: UnsatisfiedReason::Missing,
                    }))
                    .collect();

                if !unsatisfied.is_empty() {
                    unsatisfied.sort_by_key(|u| u.key);
                    return Err(CapabilityError::Unsatisfied(unsatisfied));
                }

                Ok(Capabilities {
                    $(
                        $rfield: self
                            .$rfield
                            .ok_or(CapabilityError::Unbound(ServiceKey::$rkey))?,
                    )*
                    $( $ofield: self.$ofield, )*
                })
            }
        }
    };
}

define_capabilities! {
    required {
        team: Team => TeamService,
        channel: Channel => ChannelService,
        user: User => UserService,
        post: Post => PostService,
        bot: Bot => BotService,
        cluster: Cluster => ClusterService,
        config: Config => ConfigService,
        log: Log => LogService,
        license: License => LicenseService,
        filestore: Filestore => FilestoreService,
        file_info_store: FileInfoStore => FileInfoStoreService,
        router: Router => RouterService,
        cloud: Cloud => CloudService,
        kv_store: KvStore => KvStoreService,
        store: Store => StoreService,
        system: System => SystemService,
        preferences: Preferences => PreferencesService,
        session: Session => SessionService,
        frontend: Frontend => FrontendService,
        command: Command => CommandService,
        threads: Threads => ThreadsService,
    }
    optional {
        permissions: Permissions => PermissionService,
        hooks: Hooks => HooksService,
    }
}

impl CapabilitiesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a type-erased service map, checking each value's shape.
    ///
    /// Shape mismatches are recorded and reported by [`build`](Self::build)
    /// together with missing keys.
    pub fn from_services(services: ServiceMap) -> Self {
        let mut builder = Self::default();
        for (key, service) in services {
            builder.bind_entry(key, service);
        }
        builder
    }
}

impl Capabilities {
    /// Bind a host service map in one step.
    pub fn bind(services: ServiceMap) -> Result<Self, CapabilityError> {
        let supplied = services.len();
        let capabilities = CapabilitiesBuilder::from_services(services).build()?;
        debug!(supplied, "capabilities bound");
        Ok(capabilities)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
