use crate::resolver::Outcome;
use crate::server::error::{ApiError, ApiResult};
use crate::server::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info};

/// GET /api/download?url=...
///
/// Repeated `url` parameters are allowed; the first non-blank one is used.
pub async fn download(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let pairs = match query {
        Ok(Query(pairs)) => pairs,
        Err(rejection) => {
            debug!("Unreadable query string: {}", rejection);
            Vec::new()
        }
    };
    let url = first_url(pairs).ok_or(ApiError::MissingUrl)?;

    match state.chain.resolve_video(&url).await {
        Outcome::Success(result) => {
            info!("Resolved {} via {}", url, result.method);
            Ok(Json(json!({ "success": true, "data": result })))
        }
        Outcome::Failure(reason) => Err(ApiError::NotFound(reason)),
    }
}

fn first_url(pairs: Vec<(String, String)>) -> Option<String> {
    pairs
        .into_iter()
        .filter(|(key, _)| key == "url")
        .map(|(_, value)| value.trim().to_string())
        .find(|value| !value.is_empty())
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "resolvers": state.chain.resolver_ids(),
    }))
}
