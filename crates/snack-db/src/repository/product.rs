//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Point lookup and lookup by manufacturing date
//! - Insert
//! - Guarded stock delta

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::debug;

use snack_core::{Money, NewProduct, Product, ProductSize};
use snack_workflow::{CatalogStore, StoreResult};

use crate::error::{DbError, DbResult};

const PRODUCT_COLUMNS: &str = r#"
    id, name, type AS product_type, flavor, size,
    price_cents, quantity, manufacturing_date
"#;

/// Row shape of the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    product_type: String,
    flavor: String,
    size: String,
    price_cents: i64,
    quantity: i64,
    manufacturing_date: NaiveDate,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            product_type: row.product_type,
            flavor: row.flavor,
            size: ProductSize::from(row.size),
            price: Money::from_cents(row.price_cents),
            quantity: row.quantity,
            manufacturing_date: row.manufacturing_date,
        }
    }
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Products manufactured on `date`, by id.
    pub async fn get_by_date(&self, date: NaiveDate) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE manufacturing_date = $1 ORDER BY id"
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        debug!(%date, count = rows.len(), "Products by manufacturing date");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (name, type, flavor, size, price_cents, quantity, manufacturing_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&product.name)
        .bind(&product.product_type)
        .bind(&product.flavor)
        .bind(product.size.as_str())
        .bind(product.price.cents())
        .bind(product.quantity)
        .bind(product.manufacturing_date)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = row.id, name = %row.name, "Product inserted");
        Ok(row.into())
    }

    /// Adds `delta` to the stock in one guarded statement.
    ///
    /// ## Errors
    /// - `NotFound` if no product has this id
    /// - `ConstraintViolation` if stock would drop below zero
    pub async fn apply_stock_delta(&self, id: i64, delta: i64) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity + $1
            WHERE id = $2 AND quantity + $1 >= 0
            "#,
        )
        .bind(delta)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

            return Err(match exists {
                None => DbError::not_found("product", id),
                Some(_) => DbError::constraint(format!(
                    "stock of product {id} cannot drop below zero (delta {delta})"
                )),
            });
        }

        debug!(id, delta, "Stock updated");
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for ProductRepository {
    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Product>> {
        Ok(ProductRepository::get_by_id(self, id).await?)
    }

    async fn get_by_date(&self, date: NaiveDate) -> StoreResult<Vec<Product>> {
        Ok(ProductRepository::get_by_date(self, date).await?)
    }

    async fn create(&self, product: NewProduct) -> StoreResult<Product> {
        Ok(self.insert(&product).await?)
    }

    async fn apply_stock_delta(&self, id: i64, delta: i64) -> StoreResult<()> {
        Ok(ProductRepository::apply_stock_delta(self, id, delta).await?)
    }
}

// =============================================================================
// Integration Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn repo() -> ProductRepository {
        let url = std::env::var("DATABASE_URL").unwrap();
        Database::new(DbConfig::new(url)).await.unwrap().products()
    }

    fn snack(quantity: i64) -> NewProduct {
        NewProduct {
            name: "Keripik".to_string(),
            product_type: "Chips".to_string(),
            flavor: "Balado".to_string(),
            size: ProductSize::Small,
            price: Money::from_major(10_000),
            quantity,
            manufacturing_date: NaiveDate::from_ymd_opt(2025, 10, 22).unwrap(),
        }
    }

    #[test]
    fn test_row_conversion_keeps_unknown_size() {
        let product = Product::from(ProductRow {
            id: 1,
            name: "Keripik".to_string(),
            product_type: "Chips".to_string(),
            flavor: "Balado".to_string(),
            size: "Family".to_string(),
            price_cents: 1_000_000,
            quantity: 3,
            manufacturing_date: NaiveDate::from_ymd_opt(2025, 10, 22).unwrap(),
        });
        assert_eq!(product.size, ProductSize::Unknown("Family".to_string()));
        assert_eq!(product.price, Money::from_major(10_000));
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
    async fn test_insert_and_guarded_stock_delta() {
        let repo = repo().await;
        let product = repo.insert(&snack(3)).await.unwrap();

        ProductRepository::apply_stock_delta(&repo, product.id, -2).await.unwrap();
        let err = ProductRepository::apply_stock_delta(&repo, product.id, -2)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation { .. }));

        let reloaded = ProductRepository::get_by_id(&repo, product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.quantity, 1);

        let err = ProductRepository::apply_stock_delta(&repo, i64::MAX, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
