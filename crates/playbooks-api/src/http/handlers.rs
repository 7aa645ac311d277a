//! Request handlers.
//!
//! Each handler authenticates through [`UserId`], checks access where the
//! resource is user-scoped and delegates to one collaborator.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use playbooks_protocols::types::{Category, ChannelAction, Playbook, PlaybookRun, UserInfo};

use crate::error::ApiError;
use crate::http::extract::UserId;
use crate::state::ApiState;

#[derive(Debug, Deserialize)]
pub struct TeamQuery {
    pub team_id: Option<String>,
}

/// Totals shown on the stats page.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub total_in_progress_runs: i64,
    pub total_active_participants: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub event: String,
    #[serde(default)]
    pub properties: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct IgnoreThreadRequest {
    pub post_id: String,
}

/// Product settings visible to clients.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub bot_user_id: String,
    pub enable_experimental_features: bool,
}

pub async fn graphql(
    State(state): State<Arc<ApiState>>,
    UserId(user_id): UserId,
    Json(request): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let response = state.queries.execute(&user_id, request).await?;
    Ok(Json(response))
}

pub async fn get_playbook(
    State(state): State<Arc<ApiState>>,
    UserId(user_id): UserId,
    Path(id): Path<String>,
) -> Result<Json<Playbook>, ApiError> {
    state.permissions.playbook_view(&user_id, &id).await?;
    Ok(Json(state.playbooks.get(&id).await?))
}

pub async fn get_run(
    State(state): State<Arc<ApiState>>,
    UserId(user_id): UserId,
    Path(id): Path<String>,
) -> Result<Json<PlaybookRun>, ApiError> {
    state.permissions.run_view(&user_id, &id).await?;
    Ok(Json(state.runs.get_playbook_run(&id).await?))
}

pub async fn get_run_followers(
    State(state): State<Arc<ApiState>>,
    UserId(user_id): UserId,
    Path(id): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    state.permissions.run_view(&user_id, &id).await?;
    Ok(Json(state.runs.get_followers(&id).await?))
}

pub async fn get_stats(
    State(state): State<Arc<ApiState>>,
    UserId(_user_id): UserId,
    Query(query): Query<TeamQuery>,
) -> Result<Json<Stats>, ApiError> {
    if !state.license.stats_allowed() {
        return Err(ApiError::Forbidden("stats require a license".to_string()));
    }
    let team_id = query.team_id.as_deref().filter(|t| !t.is_empty());

    Ok(Json(Stats {
        total_in_progress_runs: state.stats.total_in_progress_runs(team_id).await?,
        total_active_participants: state.stats.total_active_participants(team_id).await?,
    }))
}

/// Record that the user's client connected. The first connection creates the
/// user's info record.
pub async fn bot_connect(
    State(state): State<Arc<ApiState>>,
    UserId(user_id): UserId,
) -> Result<Json<UserInfo>, ApiError> {
    match state.user_info.get(&user_id).await {
        Ok(info) => Ok(Json(info)),
        Err(e) if e.is_not_found() => {
            let info = UserInfo {
                id: user_id,
                last_daily_todo_dm_at: now_millis(),
            };
            state.user_info.upsert(info.clone()).await?;
            debug!(user_id = %info.id, "user info created");
            Ok(Json(info))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn track_event(
    State(state): State<Arc<ApiState>>,
    UserId(user_id): UserId,
    Json(event): Json<TelemetryEvent>,
) -> Result<StatusCode, ApiError> {
    if event.event.is_empty() {
        return Err(ApiError::BadRequest("event must not be empty".to_string()));
    }
    let mut properties = match event.properties {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    properties.insert("user_actual_id".to_string(), user_id.into());
    state.telemetry.track(&event.event, properties.into());
    Ok(StatusCode::NO_CONTENT)
}

pub async fn ignore_keywords_thread(
    State(state): State<Arc<ApiState>>,
    UserId(_user_id): UserId,
    Json(request): Json<IgnoreThreadRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .channel_actions
        .ignore_keywords_thread(&request.post_id)
        .await?;
    Ok(StatusCode::OK)
}

pub async fn get_settings(
    State(state): State<Arc<ApiState>>,
    UserId(_user_id): UserId,
) -> Json<Settings> {
    let configuration = state.config.configuration();
    Json(Settings {
        bot_user_id: configuration.bot_user_id,
        enable_experimental_features: configuration.enable_experimental_features,
    })
}

pub async fn get_channel_actions(
    State(state): State<Arc<ApiState>>,
    UserId(_user_id): UserId,
    Path(channel_id): Path<String>,
) -> Result<Json<Vec<ChannelAction>>, ApiError> {
    Ok(Json(
        state.channel_actions.get_channel_actions(&channel_id).await?,
    ))
}

pub async fn get_my_categories(
    State(state): State<Arc<ApiState>>,
    UserId(user_id): UserId,
    Query(query): Query<TeamQuery>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let team_id = query
        .team_id
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("team_id is required".to_string()))?;
    Ok(Json(
        state.categories.get_categories(&team_id, &user_id).await?,
    ))
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
