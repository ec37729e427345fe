//! Product endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use snack_core::validation::parse_date;
use snack_core::{Money, NewProduct, Product, ProductSize};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of `POST /products`.
///
/// The manufacturing date stays a string here so a malformed date is a
/// validation error (400) rather than a decode failure.
#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub flavor: String,
    pub size: ProductSize,
    pub price: Money,
    pub quantity: i64,
    pub manufacturing_date: String,
}

impl CreateProduct {
    fn into_new_product(self) -> Result<NewProduct, ApiError> {
        Ok(NewProduct {
            manufacturing_date: parse_date("manufacturing_date", &self.manufacturing_date)?,
            name: self.name,
            product_type: self.product_type,
            flavor: self.flavor,
            size: self.size,
            price: self.price,
            quantity: self.quantity,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub date: Option<String>,
}

/// `POST /products`: 201 with the stored product.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(body) = payload?;
    let product = state.catalog.add_product(body.into_new_product()?).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /products?date=YYYY-MM-DD`
pub async fn by_date(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let date = query.date.unwrap_or_default();
    Ok(Json(state.catalog.products_by_date(&date).await?))
}
