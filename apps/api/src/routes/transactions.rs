//! Purchases and the sales report.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use snack_core::{SalesReport, Transaction};
use snack_workflow::PurchaseRequest;

use super::DateRangeQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// `POST /transactions`: runs the purchase saga, 201 with the ledger record.
pub async fn purchase(
    State(state): State<AppState>,
    payload: Result<Json<PurchaseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let Json(request) = payload?;
    let transaction = state.workflow.purchase(request).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// `GET /transactions?start=&end=`: cached sales report; `end` defaults to today.
pub async fn report(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<SalesReport>, ApiError> {
    let start = range.start.unwrap_or_default();
    let report = state.workflow.get_report(&start, range.end.as_deref()).await?;
    Ok(Json(report))
}
