use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use snack_workflow::{RedeemRequest, Redemption};

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /redemptions`: trades points for one unit of a product.
pub async fn redeem(
    State(state): State<AppState>,
    payload: Result<Json<RedeemRequest>, JsonRejection>,
) -> Result<Json<Redemption>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(state.workflow.redeem(request).await?))
}
