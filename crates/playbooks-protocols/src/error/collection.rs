//! Errors returned by collection/topic queries.

use thiserror::Error;

use super::StoreError;

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("collection {0} is not registered by playbooks")]
    UnregisteredCollection(String),

    #[error("topic type {0} is not registered by playbooks")]
    UnregisteredTopic(String),

    #[error("no run with id - {id}")]
    RunNotFound {
        id: String,
        #[source]
        source: StoreError,
    },

    #[error("{context}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
    },
}

impl CollectionError {
    /// Wrap a store failure with the identifiers that were being resolved.
    pub fn store(context: impl Into<String>, source: StoreError) -> Self {
        CollectionError::Store {
            context: context.into(),
            source,
        }
    }

    /// Whether the caller asked for a collection or topic type this product does not own.
    pub fn is_unregistered(&self) -> bool {
        matches!(
            self,
            CollectionError::UnregisteredCollection(_) | CollectionError::UnregisteredTopic(_)
        )
    }
}
