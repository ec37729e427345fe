use axum::extract::State;
use axum::Json;

use snack_core::Customer;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /customers`: every customer, highest balance first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(state.customers.list_customers().await?))
}
