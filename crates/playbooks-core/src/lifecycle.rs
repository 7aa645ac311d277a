//! Kernel lifecycle state.
//!
//! States only move forward:
//! `Unbound -> Bound -> MigrationPending -> Ready -> Started -> Stopped`.
//! `Ready -> Stopped` is also allowed so a kernel that never started can be
//! torn down.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use thiserror::Error;
use tracing::debug;

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;

/// Kernel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum KernelState {
    /// Created, capabilities not bound yet.
    Unbound = 0,
    /// Capabilities bound, domain services under construction.
    Bound = 1,
    /// Waiting on the migration gate.
    MigrationPending = 2,
    /// Initialized, not started.
    Ready = 3,
    /// Hooks registered and background tasks running.
    Started = 4,
    /// Terminal.
    Stopped = 5,
}

impl From<u8> for KernelState {
    fn from(v: u8) -> Self {
        match v {
            0 => KernelState::Unbound,
            1 => KernelState::Bound,
            2 => KernelState::MigrationPending,
            3 => KernelState::Ready,
            4 => KernelState::Started,
            _ => KernelState::Stopped,
        }
    }
}

impl fmt::Display for KernelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KernelState::Unbound => "unbound",
            KernelState::Bound => "bound",
            KernelState::MigrationPending => "migration-pending",
            KernelState::Ready => "ready",
            KernelState::Started => "started",
            KernelState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

impl KernelState {
    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: KernelState) -> bool {
        use KernelState::*;
        matches!(
            (self, next),
            (Unbound, Bound)
                | (Bound, MigrationPending)
                | (MigrationPending, Ready)
                | (Ready, Started)
                | (Ready, Stopped)
                | (Started, Stopped)
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("invalid lifecycle transition from {from} to {to}")]
    InvalidTransition { from: KernelState, to: KernelState },
}

/// Atomic holder of the kernel state.
pub struct Lifecycle {
    state: AtomicU8,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(KernelState::Unbound as u8),
        }
    }

    pub fn state(&self) -> KernelState {
        KernelState::from(self.state.load(Ordering::SeqCst))
    }

    /// Move from `from` to `to`, failing if the current state is not `from`
    /// or the move is not a forward transition.
    pub fn transition(&self, from: KernelState, to: KernelState) -> Result<(), LifecycleError> {
        if !from.can_transition_to(to) {
            return Err(LifecycleError::InvalidTransition { from, to });
        }
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|current| LifecycleError::InvalidTransition {
                from: KernelState::from(current),
                to,
            })?;
        debug!(%from, %to, "kernel state changed");
        Ok(())
    }

    /// Move to `to` from whichever state legally precedes it.
    ///
    /// Returns the state that was left.
    pub fn advance(&self, to: KernelState) -> Result<KernelState, LifecycleError> {
        let from = self.state();
        self.transition(from, to)?;
        Ok(from)
    }

    pub fn is_started(&self) -> bool {
        self.state() == KernelState::Started
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
