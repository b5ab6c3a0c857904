// Movie proxy handler
use axum::{
    extract::{RawQuery, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::proxy::error::ProxyError;
use crate::proxy::route::MovieQuery;
use crate::proxy::server::AppState;

const CACHE_POLICY: &str = "public, max-age=300";

/// Resolve the query to one upstream resource, attach the key, and relay
/// the upstream body untouched.
pub async fn handle_movies(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, ProxyError> {
    let Some(api_key) = state.config.api_key() else {
        tracing::error!("Rejecting request: TMDB API key is not configured");
        return Err(ProxyError::MissingApiKey);
    };

    let query = MovieQuery::from_raw_query(raw_query.as_deref());
    let target = query.upstream_target();
    let request_id = uuid::Uuid::new_v4().simple().to_string();

    tracing::info!(
        request_id = %request_id,
        kind = query.kind(),
        "Forwarding to upstream {}",
        target
    );

    match state.upstream.fetch(&target, api_key).await {
        Ok(body) => {
            tracing::debug!(request_id = %request_id, bytes = body.len(), "Upstream OK");
            Ok((
                [
                    (header::CONTENT_TYPE, "application/json"),
                    (header::CACHE_CONTROL, CACHE_POLICY),
                ],
                body,
            )
                .into_response())
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                status = %e.status(),
                "Upstream request failed: {:?}",
                e
            );
            Err(e)
        }
    }
}
