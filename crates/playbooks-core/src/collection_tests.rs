use super::*;
use std::sync::atomic::Ordering;

use playbooks_protocols::types::{PlaybookRun, TopicRecord};

use crate::testing::{FakeHost, FakePermissions, FakeRuns};

fn run(id: &str, participants: &[&str]) -> PlaybookRun {
    PlaybookRun {
        id: id.to_string(),
        name: format!("Run {id}"),
        team_id: "team-1".to_string(),
        participant_ids: participants.iter().map(|p| p.to_string()).collect(),
        ..PlaybookRun::default()
    }
}

fn topic(id: &str, run_id: &str) -> TopicRecord {
    TopicRecord {
        id: id.to_string(),
        run_id: run_id.to_string(),
        team_id: "team-1".to_string(),
    }
}

fn bridge(runs: &Arc<FakeRuns>, permissions: &Arc<FakePermissions>) -> CollectionBridge {
    CollectionBridge::new(runs.clone(), permissions.clone())
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_descriptors() {
    assert_eq!(
        descriptors(),
        vec![
            (CollectionType::Run, TopicType::Status),
            (CollectionType::Run, TopicType::Task),
        ]
    );
}

#[tokio::test]
async fn test_register_descriptors() {
    let host = FakeHost::new();
    assert_eq!(register_descriptors(host.as_ref()).await, 2);
    assert_eq!(
        *host.topics.lock(),
        vec![
            ("run".to_string(), "status".to_string()),
            ("run".to_string(), "task".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_register_descriptors_failure_is_not_fatal() {
    let host = FakeHost::new();
    host.fail_threads.store(true, Ordering::SeqCst);
    assert_eq!(register_descriptors(host.as_ref()).await, 0);
}

#[tokio::test]
async fn test_every_query_rejects_other_collection_types() {
    let runs = FakeRuns::new();
    runs.add_run(run("r1", &["a"]), &[]);
    let permissions = FakePermissions::new(true);
    let bridge = bridge(&runs, &permissions);
    let permission = Permission::new("read_post");

    let err = bridge
        .user_has_permission_to_collection("a", "channel", "r1", &permission)
        .await
        .unwrap_err();
    assert!(matches!(err, CollectionError::UnregisteredCollection(ref t) if t == "channel"));

    let err = bridge.collection_ids_for_user("a", "board").await.unwrap_err();
    assert!(err.is_unregistered());

    let err = bridge.user_ids_for_collection("Run", "r1").await.unwrap_err();
    assert!(err.is_unregistered());

    let err = bridge.collection_metadata("", &ids(&["r1"])).await.unwrap_err();
    assert!(err.is_unregistered());

    assert_eq!(permissions.checks.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_permission_check_delegates() {
    let runs = FakeRuns::new();
    runs.add_run(run("r1", &["a"]), &[]);
    let permissions = FakePermissions::new(true);
    let bridge = bridge(&runs, &permissions);
    let permission = Permission::new("read_post");

    assert!(bridge
        .user_has_permission_to_collection("a", "run", "r1", &permission)
        .await
        .unwrap());

    permissions.allow.store(false, Ordering::SeqCst);
    assert!(!bridge
        .user_has_permission_to_collection("a", "run", "r1", &permission)
        .await
        .unwrap());
    assert_eq!(permissions.checks.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_permission_check_unknown_run() {
    let runs = FakeRuns::new();
    let permissions = FakePermissions::new(true);
    let bridge = bridge(&runs, &permissions);

    let err = bridge
        .user_has_permission_to_collection("a", "run", "missing", &Permission::new("read_post"))
        .await
        .unwrap_err();
    match err {
        CollectionError::RunNotFound { id, source } => {
            assert_eq!(id, "missing");
            assert!(source.is_not_found());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_collection_ids_for_user() {
    let runs = FakeRuns::new();
    runs.add_run(run("r1", &["a"]), &[]);
    runs.add_run(run("r2", &["b"]), &["a"]);
    runs.add_run(run("r3", &["c"]), &[]);
    let bridge = bridge(&runs, &FakePermissions::new(true));

    assert_eq!(bridge.collection_ids_for_user("a", "run").await.unwrap(), ids(&["r1", "r2"]));
}

#[tokio::test]
async fn test_user_ids_are_union_of_participants_and_followers() {
    let runs = FakeRuns::new();
    runs.add_run(run("r1", &["a", "b"]), &["b", "c"]);
    let bridge = bridge(&runs, &FakePermissions::new(true));

    let mut users = bridge.user_ids_for_collection("run", "r1").await.unwrap();
    users.sort();
    assert_eq!(users, ids(&["a", "b", "c"]));
}

#[tokio::test]
async fn test_store_failure_carries_context() {
    let runs = FakeRuns::new();
    runs.fail_queries.store(true, Ordering::SeqCst);
    let bridge = bridge(&runs, &FakePermissions::new(true));

    let err = bridge.collection_ids_for_user("u9", "run").await.unwrap_err();
    assert!(matches!(err, CollectionError::Store { .. }));
    assert!(err.to_string().contains("u9"));

    let err = bridge.topic_metadata("task", &ids(&["t1"])).await.unwrap_err();
    assert!(err.to_string().contains("task"));
}

#[tokio::test]
async fn test_collection_metadata() {
    let runs = FakeRuns::new();
    runs.add_run(run("r1", &[]), &[]);
    runs.add_run(run("r2", &[]), &[]);
    let bridge = bridge(&runs, &FakePermissions::new(true));

    let metadata = bridge
        .collection_metadata("run", &ids(&["r1", "unknown"]))
        .await
        .unwrap();
    assert_eq!(metadata.len(), 1);
    assert_eq!(
        metadata["r1"],
        CollectionMetadata {
            id: "r1".to_string(),
            collection_type: "run".to_string(),
            team_id: "team-1".to_string(),
            name: "Run r1".to_string(),
            relative_url: "/playbooks/runs/r1".to_string(),
        }
    );
}

#[tokio::test]
async fn test_topic_types_use_distinct_lookups() {
    let runs = FakeRuns::new();
    runs.status_topics.lock().push(topic("s1", "r1"));
    runs.task_topics.lock().push(topic("t1", "r2"));
    let bridge = bridge(&runs, &FakePermissions::new(true));

    let status = bridge
        .topic_metadata("status", &ids(&["s1", "t1"]))
        .await
        .unwrap();
    assert_eq!(status.len(), 1);
    assert_eq!(status["s1"].topic_type, "status");
    assert_eq!(status["s1"].collection_type, "run");
    assert_eq!(status["s1"].collection_id, "r1");

    let tasks = bridge
        .topic_metadata("task", &ids(&["s1", "t1"]))
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks["t1"].topic_type, "task");
    assert_eq!(tasks["t1"].collection_id, "r2");

    assert_eq!(*runs.lookups.lock(), vec!["status", "task"]);
}

#[tokio::test]
async fn test_unknown_topic_type() {
    let runs = FakeRuns::new();
    runs.status_topics.lock().push(topic("s1", "r1"));
    let bridge = bridge(&runs, &FakePermissions::new(true));

    let err = bridge.topic_metadata("checklist", &ids(&["s1"])).await.unwrap_err();
    assert!(matches!(err, CollectionError::UnregisteredTopic(ref t) if t == "checklist"));
    assert!(runs.lookups.lock().is_empty());
}

#[test]
fn test_merge_unique_keeps_first_seen_order() {
    assert_eq!(
        merge_unique(ids(&["a", "b"]), ids(&["b", "c", "a"])),
        ids(&["a", "b", "c"])
    );
}
