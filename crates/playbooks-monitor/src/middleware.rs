//! API error counting.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;

use crate::playbooks::PlaybooksMetrics;

/// Count every response outside 2xx. A handler that sets no status
/// responds 200 and is not counted.
pub async fn count_errors(
    State(metrics): State<Arc<PlaybooksMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !response.status().is_success() {
        metrics.increment_errors_count(1).await;
    }
    response
}

/// Wrap every route of `router` with [`count_errors`].
pub fn with_error_counter(router: Router, metrics: Arc<PlaybooksMetrics>) -> Router {
    router.layer(middleware::from_fn_with_state(metrics, count_errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use tower::ServiceExt;

    use crate::playbooks::InstanceInfo;

    async fn call(router: &Router, uri: &str) -> StatusCode {
        router
            .clone()
            .oneshot(axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    async fn app() -> (Router, Arc<PlaybooksMetrics>) {
        let metrics = Arc::new(PlaybooksMetrics::new(InstanceInfo::default()).await);
        let router = Router::new()
            .route("/implicit", get(|| async {}))
            .route("/created", get(|| async { StatusCode::CREATED }))
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
            .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/moved", get(|| async { StatusCode::MOVED_PERMANENTLY }));
        (with_error_counter(router, metrics.clone()), metrics)
    }

    #[tokio::test]
    async fn test_implicit_status_is_not_an_error() {
        let (router, metrics) = app().await;
        assert_eq!(call(&router, "/implicit").await, StatusCode::OK);
        assert_eq!(metrics.errors_count().await, 0);
    }

    #[tokio::test]
    async fn test_2xx_not_counted() {
        let (router, metrics) = app().await;
        assert_eq!(call(&router, "/created").await, StatusCode::CREATED);
        assert_eq!(metrics.errors_count().await, 0);
    }

    #[tokio::test]
    async fn test_404_counted_once() {
        let (router, metrics) = app().await;
        assert_eq!(call(&router, "/missing").await, StatusCode::NOT_FOUND);
        assert_eq!(metrics.errors_count().await, 1);
    }

    #[tokio::test]
    async fn test_other_non_2xx_counted() {
        let (router, metrics) = app().await;
        call(&router, "/broken").await;
        call(&router, "/moved").await;
        assert_eq!(metrics.errors_count().await, 2);
    }
}
