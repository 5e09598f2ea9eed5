use crate::eligibility::{
    self, Eligibility,
    models::{HealthResponse, RootResponse},
};
use axum::{Json, Router, extract::State, routing::get};
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Creates a [`TraceLayer`] that emits request spans at INFO level.
///
/// `TraceLayer::new_for_http()` defaults to DEBUG, which the default `info`
/// filter drops.
pub fn trace_layer() -> TraceLayer<
    tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>,
    DefaultMakeSpan,
    DefaultOnRequest,
    DefaultOnResponse,
> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { success: true })
}

/// Root of the tree the served proofs lead to.
pub async fn root_handler(State(eligibility): State<Arc<Eligibility>>) -> Json<RootResponse> {
    Json(RootResponse {
        root: eligibility.root(),
        leaves: eligibility.allowlist().len(),
    })
}

pub fn app(state: Arc<Eligibility>) -> Router {
    Router::new()
        .merge(eligibility::routes())
        .route("/root", get(root_handler))
        .route("/health", get(health))
        .layer(trace_layer())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{allowlist::Allowlist, merkle};

    #[tokio::test]
    async fn test_health() {
        let Json(response) = health().await;
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_root_handler() {
        let allowlist = Allowlist::bundled().unwrap();
        let leaves: Vec<_> = allowlist
            .iter()
            .map(|entry| merkle::leaf(entry.account, entry.amount))
            .collect();
        let expected = merkle::MerkleTree::new(leaves).unwrap().root();

        let Json(response) =
            root_handler(State(Arc::new(Eligibility::new(allowlist).unwrap()))).await;
        assert_eq!(response.root, expected);
        assert_eq!(response.leaves, 2);
    }
}
