use super::*;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use playbooks_config::ConfigService;
use playbooks_core::testing::{FakeDomain, FakeHost, FakePermissions, FakeRuns};
use playbooks_protocols::types::{Category, ChannelAction, Playbook, PlaybookRun, UserInfo};

use crate::error::ErrorResponse;
use crate::http::handlers::{Settings, Stats};
use crate::http::USER_ID_HEADER;

struct Fixture {
    host: Arc<FakeHost>,
    domain: Arc<FakeDomain>,
    runs: Arc<FakeRuns>,
    permissions: Arc<FakePermissions>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            host: FakeHost::new(),
            domain: FakeDomain::new(),
            runs: FakeRuns::new(),
            permissions: FakePermissions::new(true),
        }
    }

    fn router(&self) -> Router {
        let config = ConfigService::new("playbooks", self.host.clone()).unwrap();
        let state = ApiState {
            queries: self.domain.clone(),
            playbooks: self.domain.clone(),
            runs: self.runs.clone(),
            permissions: self.permissions.clone(),
            stats: self.domain.clone(),
            license: self.domain.clone(),
            channel_actions: self.domain.clone(),
            categories: self.domain.clone(),
            user_info: self.domain.clone(),
            telemetry: self.domain.clone(),
            config: Arc::new(config),
        };
        create_router(Arc::new(state))
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(USER_ID_HEADER, "user-1")
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(USER_ID_HEADER, "user-1")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_missing_user_header_is_unauthorized() {
    let fixture = Fixture::new();
    let request = Request::builder()
        .uri("/api/v0/settings")
        .body(Body::empty())
        .unwrap();

    let response = fixture.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = json(response).await;
    assert_eq!(body.code, "UNAUTHORIZED");
}

#[tokio::test]
async fn test_graphql_query() {
    let fixture = Fixture::new();
    let response = fixture
        .router()
        .oneshot(post_json("/api/v0/query", serde_json::json!({"query": "{ runs }"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = json(response).await;
    assert_eq!(body["data"]["user_id"], "user-1");
    assert_eq!(body["data"]["echo"]["query"], "{ runs }");
}

#[tokio::test]
async fn test_get_playbook() {
    let fixture = Fixture::new();
    fixture.domain.playbooks.lock().insert(
        "pb-1".to_string(),
        Playbook {
            id: "pb-1".to_string(),
            title: "Incident".to_string(),
            team_id: "team-1".to_string(),
            public: true,
        },
    );

    let response = fixture.router().oneshot(get("/api/v0/playbooks/pb-1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let playbook: Playbook = json(response).await;
    assert_eq!(playbook.title, "Incident");

    let response = fixture.router().oneshot(get("/api/v0/playbooks/pb-2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_run_checks_permission() {
    let fixture = Fixture::new();
    fixture.runs.add_run(
        PlaybookRun {
            id: "run-1".to_string(),
            name: "Outage".to_string(),
            ..Default::default()
        },
        &["user-2"],
    );

    let response = fixture.router().oneshot(get("/api/v0/runs/run-1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let run: PlaybookRun = json(response).await;
    assert_eq!(run.name, "Outage");

    let response = fixture
        .router()
        .oneshot(get("/api/v0/runs/run-1/followers"))
        .await
        .unwrap();
    let followers: Vec<String> = json(response).await;
    assert_eq!(followers, vec!["user-2".to_string()]);

    fixture.permissions.allow.store(false, std::sync::atomic::Ordering::SeqCst);
    let response = fixture.router().oneshot(get("/api/v0/runs/run-1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_stats_requires_license() {
    let fixture = Fixture::new();
    fixture.domain.in_progress_runs.store(3, std::sync::atomic::Ordering::SeqCst);

    let response = fixture
        .router()
        .oneshot(get("/api/v0/stats?team_id=team-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats: Stats = json(response).await;
    assert_eq!(stats.total_in_progress_runs, 3);

    fixture
        .domain
        .stats_licensed
        .store(false, std::sync::atomic::Ordering::SeqCst);
    let response = fixture.router().oneshot(get("/api/v0/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bot_connect_creates_user_info_once() {
    let fixture = Fixture::new();

    let response = fixture
        .router()
        .oneshot(post_json("/api/v0/bot/connect", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created: UserInfo = json(response).await;
    assert_eq!(created.id, "user-1");
    assert!(created.last_daily_todo_dm_at > 0);

    let response = fixture
        .router()
        .oneshot(post_json("/api/v0/bot/connect", serde_json::json!({})))
        .await
        .unwrap();
    let again: UserInfo = json(response).await;
    assert_eq!(again, created);
    assert_eq!(fixture.domain.user_infos.lock().len(), 1);
}

#[tokio::test]
async fn test_track_event() {
    let fixture = Fixture::new();
    let response = fixture
        .router()
        .oneshot(post_json(
            "/api/v0/telemetry",
            serde_json::json!({"event": "frontend_run_viewed", "properties": {"run_id": "r"}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(*fixture.domain.tracked.lock(), vec!["frontend_run_viewed".to_string()]);

    let response = fixture
        .router()
        .oneshot(post_json("/api/v0/telemetry", serde_json::json!({"event": ""})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ignore_keywords_thread() {
    let fixture = Fixture::new();
    let response = fixture
        .router()
        .oneshot(post_json(
            "/api/v0/signal/keywords/ignore-thread",
            serde_json::json!({"post_id": "post-7"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(*fixture.domain.ignored_threads.lock(), vec!["post-7".to_string()]);
}

#[tokio::test]
async fn test_settings_reflect_configuration() {
    let fixture = Fixture::new();
    fixture.host.config.lock().plugin_settings.insert(
        "playbooks".to_string(),
        serde_json::json!({"bot_user_id": "bot-9", "enable_experimental_features": true}),
    );

    let response = fixture.router().oneshot(get("/api/v0/settings")).await.unwrap();
    let settings: Settings = json(response).await;
    assert_eq!(
        settings,
        Settings {
            bot_user_id: "bot-9".to_string(),
            enable_experimental_features: true,
        }
    );
}

#[tokio::test]
async fn test_channel_actions_filtered_by_channel() {
    let fixture = Fixture::new();
    fixture.domain.channel_actions.lock().extend([
        ChannelAction {
            id: "a1".to_string(),
            channel_id: "chan-1".to_string(),
            ..Default::default()
        },
        ChannelAction {
            id: "a2".to_string(),
            channel_id: "chan-2".to_string(),
            ..Default::default()
        },
    ]);

    let response = fixture
        .router()
        .oneshot(get("/api/v0/actions/channels/chan-1"))
        .await
        .unwrap();
    let actions: Vec<ChannelAction> = json(response).await;
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].id, "a1");
}

#[tokio::test]
async fn test_my_categories() {
    let fixture = Fixture::new();
    fixture.domain.categories.lock().push(Category {
        id: "cat-1".to_string(),
        name: "Favorites".to_string(),
        team_id: "team-1".to_string(),
        user_id: "user-1".to_string(),
        collapsed: false,
    });

    let response = fixture
        .router()
        .oneshot(get("/api/v0/my_categories?team_id=team-1"))
        .await
        .unwrap();
    let categories: Vec<Category> = json(response).await;
    assert_eq!(categories.len(), 1);

    let response = fixture
        .router()
        .oneshot(get("/api/v0/my_categories"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
