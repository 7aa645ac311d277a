//! Collection/topic bridge.
//!
//! Maps runs onto the host's generic collection model. The run is the only
//! collection type; status updates and checklist tasks are its topic types.
//! Every query is recomputed from the run service, nothing is cached.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use playbooks_protocols::capability::ThreadsService;
use playbooks_protocols::domain::{PermissionsService, PlaybookRunService};
use playbooks_protocols::error::CollectionError;
use playbooks_protocols::types::{
    run_details_relative_url, CollectionMetadata, CollectionType, Permission, TopicMetadata,
    TopicType,
};

#[cfg(test)]
#[path = "collection_tests.rs"]
mod tests;

/// Every (collection, topic) pair registered with the host.
pub fn descriptors() -> Vec<(CollectionType, TopicType)> {
    TopicType::ALL
        .iter()
        .map(|topic| (topic.collection(), *topic))
        .collect()
}

/// Register every descriptor with the host thread system.
///
/// Failures are logged and skipped. Returns how many pairs were registered.
pub async fn register_descriptors(threads: &dyn ThreadsService) -> usize {
    let mut registered = 0;
    for (collection_type, topic_type) in descriptors() {
        match threads
            .register_collection_and_topic(collection_type.as_str(), topic_type.as_str())
            .await
        {
            Ok(()) => registered += 1,
            Err(e) => warn!(
                %collection_type,
                %topic_type,
                error = %e,
                "failed to register collection and topic"
            ),
        }
    }
    registered
}

pub struct CollectionBridge {
    runs: Arc<dyn PlaybookRunService>,
    permissions: Arc<dyn PermissionsService>,
}

impl CollectionBridge {
    pub fn new(runs: Arc<dyn PlaybookRunService>, permissions: Arc<dyn PermissionsService>) -> Self {
        Self { runs, permissions }
    }

    pub async fn user_has_permission_to_collection(
        &self,
        user_id: &str,
        collection_type: &str,
        collection_id: &str,
        permission: &Permission,
    ) -> Result<bool, CollectionError> {
        match collection_type.parse::<CollectionType>()? {
            CollectionType::Run => {
                let run = self.runs.get_playbook_run(collection_id).await.map_err(|source| {
                    CollectionError::RunNotFound {
                        id: collection_id.to_string(),
                        source,
                    }
                })?;
                Ok(self
                    .permissions
                    .has_permissions_to_run(user_id, &run, permission)
                    .await)
            }
        }
    }

    pub async fn collection_ids_for_user(
        &self,
        user_id: &str,
        collection_type: &str,
    ) -> Result<Vec<String>, CollectionError> {
        match collection_type.parse::<CollectionType>()? {
            CollectionType::Run => self
                .runs
                .get_playbook_run_ids_for_user(user_id)
                .await
                .map_err(|e| CollectionError::store(format!("can't get runs for user - {user_id}"), e)),
        }
    }

    /// Participants and followers of a collection, without duplicates.
    pub async fn user_ids_for_collection(
        &self,
        collection_type: &str,
        collection_id: &str,
    ) -> Result<Vec<String>, CollectionError> {
        match collection_type.parse::<CollectionType>()? {
            CollectionType::Run => {
                let run = self.runs.get_playbook_run(collection_id).await.map_err(|source| {
                    CollectionError::RunNotFound {
                        id: collection_id.to_string(),
                        source,
                    }
                })?;
                let followers = self.runs.get_followers(collection_id).await.map_err(|e| {
                    CollectionError::store(format!("can't get followers for run - {collection_id}"), e)
                })?;
                Ok(merge_unique(run.participant_ids, followers))
            }
        }
    }

    pub async fn collection_metadata(
        &self,
        collection_type: &str,
        collection_ids: &[String],
    ) -> Result<HashMap<String, CollectionMetadata>, CollectionError> {
        let collection_type: CollectionType = collection_type.parse()?;
        let runs = match collection_type {
            CollectionType::Run => self
                .runs
                .get_run_metadata_by_ids(collection_ids)
                .await
                .map_err(|e| CollectionError::store("can't get playbook run metadata by ids", e))?,
        };

        let metadata: HashMap<_, _> = runs
            .into_iter()
            .map(|run| {
                let metadata = CollectionMetadata {
                    relative_url: run_details_relative_url(&run.id),
                    id: run.id.clone(),
                    collection_type: collection_type.to_string(),
                    team_id: run.team_id,
                    name: run.name,
                };
                (run.id, metadata)
            })
            .collect();
        debug!(%collection_type, requested = collection_ids.len(), found = metadata.len(), "collection metadata");
        Ok(metadata)
    }

    /// Status and task topics resolve through distinct run service lookups.
    pub async fn topic_metadata(
        &self,
        topic_type: &str,
        topic_ids: &[String],
    ) -> Result<HashMap<String, TopicMetadata>, CollectionError> {
        let topic_type: TopicType = topic_type.parse()?;
        let topics = match topic_type {
            TopicType::Status => self.runs.get_status_metadata_by_ids(topic_ids).await,
            TopicType::Task => self.runs.get_task_metadata_by_ids(topic_ids).await,
        }
        .map_err(|e| CollectionError::store(format!("can't get metadata by {topic_type} topic ids"), e))?;

        Ok(topics
            .into_iter()
            .map(|topic| {
                let metadata = TopicMetadata {
                    id: topic.id.clone(),
                    topic_type: topic_type.to_string(),
                    collection_type: topic_type.collection().to_string(),
                    team_id: topic.team_id,
                    collection_id: topic.run_id,
                };
                (topic.id, metadata)
            })
            .collect())
    }
}

fn merge_unique(first: Vec<String>, second: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(first.len() + second.len());
    first
        .into_iter()
        .chain(second)
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
