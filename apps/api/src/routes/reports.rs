use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use snack_workflow::workflow::parse_cache_scope;

use super::DateRangeQuery;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Evicted {
    pub evicted: u64,
}

/// `DELETE /reports/cache?start=&end=`: one range, or every report when
/// both bounds are absent.
pub async fn evict(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Evicted>, ApiError> {
    let scope = parse_cache_scope(range.start.as_deref(), range.end.as_deref())?;
    let evicted = state.workflow.evict_reports(scope).await?;
    Ok(Json(Evicted { evicted }))
}
