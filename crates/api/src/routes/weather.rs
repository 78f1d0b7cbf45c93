//! Weather Routes

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics::{counter, histogram};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::error::ApiError;
use crate::telemetry::{LOOKUPS_TOTAL, LOOKUP_DURATION};
use crate::AppState;

/// Query parameters for the city lookup
#[derive(Debug, Deserialize)]
pub struct CityQuery {
    /// City name, matched exactly against the stored key
    pub name: String,
}

/// Look up the weather for one city.
///
/// Responds with the record as JSON, or an empty `200` body when the city is
/// unknown.
pub async fn get_city(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CityQuery>,
) -> Result<Response, ApiError> {
    let started = Instant::now();
    let result = state.store.get(&params.name).await;
    histogram!(LOOKUP_DURATION).record(started.elapsed().as_secs_f64());

    match result {
        Ok(Some(record)) => {
            counter!(LOOKUPS_TOTAL, "result" => "hit").increment(1);
            Ok(Json(record).into_response())
        }
        Ok(None) => {
            counter!(LOOKUPS_TOTAL, "result" => "miss").increment(1);
            debug!("No weather record for {:?}", params.name);
            Ok(StatusCode::OK.into_response())
        }
        Err(e) => {
            counter!(LOOKUPS_TOTAL, "result" => "error").increment(1);
            Err(e.into())
        }
    }
}
