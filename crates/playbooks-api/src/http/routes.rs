//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::http::handlers;
use crate::state::ApiState;

/// Create the product router.
///
/// ## Route Structure
///
/// ```text
/// /api/v0
///   POST   /query                         - GraphQL-style query
///   GET    /playbooks/{id}                - Get playbook
///   GET    /runs/{id}                     - Get run
///   GET    /runs/{id}/followers           - List run followers
///   GET    /stats?team_id=                - Run and participant totals (licensed)
///   POST   /bot/connect                   - Record a client connection for the bot digest
///   POST   /telemetry                     - Track a client-side event
///   POST   /signal/keywords/ignore-thread - Stop keyword suggestions in a thread
///   GET    /settings                      - Client-visible product settings
///   GET    /actions/channels/{id}         - Channel actions of a channel
///   GET    /my_categories?team_id=        - Sidebar categories of the caller
/// ```
///
/// Every route requires the `Mattermost-User-ID` header.
pub fn create_router(state: Arc<ApiState>) -> Router {
    let graphql = Router::new()
        .route("/query", post(handlers::graphql))
        .with_state(state.clone());

    let playbooks = Router::new()
        .route("/{id}", get(handlers::get_playbook))
        .with_state(state.clone());

    let runs = Router::new()
        .route("/{id}", get(handlers::get_run))
        .route("/{id}/followers", get(handlers::get_run_followers))
        .with_state(state.clone());

    let stats = Router::new()
        .route("/stats", get(handlers::get_stats))
        .with_state(state.clone());

    let bot = Router::new()
        .route("/connect", post(handlers::bot_connect))
        .with_state(state.clone());

    let telemetry = Router::new()
        .route("/telemetry", post(handlers::track_event))
        .with_state(state.clone());

    let signal = Router::new()
        .route("/keywords/ignore-thread", post(handlers::ignore_keywords_thread))
        .with_state(state.clone());

    let settings = Router::new()
        .route("/settings", get(handlers::get_settings))
        .with_state(state.clone());

    let actions = Router::new()
        .route("/channels/{id}", get(handlers::get_channel_actions))
        .with_state(state.clone());

    let categories = Router::new()
        .route("/my_categories", get(handlers::get_my_categories))
        .with_state(state);

    let api = Router::new()
        .merge(graphql)
        .nest("/playbooks", playbooks)
        .nest("/runs", runs)
        .merge(stats)
        .nest("/bot", bot)
        .merge(telemetry)
        .nest("/signal", signal)
        .merge(settings)
        .nest("/actions", actions)
        .merge(categories);

    Router::new().nest("/api/v0", api)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
