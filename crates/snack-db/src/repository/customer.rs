//! # Customer Repository
//!
//! Loyalty customers: lookup by exact name, lazy creation, guarded points
//! deltas and the points leaderboard.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use snack_core::Customer;
use snack_workflow::{CustomerStore, StoreResult};

use crate::error::{DbError, DbResult};

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        CustomerRepository { pool }
    }

    /// Case-sensitive name lookup.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, points, created_at, updated_at
            FROM customers
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a customer with zero points.
    ///
    /// ## Errors
    /// `UniqueViolation` if the name is taken.
    pub async fn insert(&self, name: &str) -> DbResult<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, points)
            VALUES ($1, 0)
            RETURNING id, name, points, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = customer.id, "Customer inserted");
        Ok(customer)
    }

    /// Adds `delta` to the balance. Debits never drive it below zero.
    pub async fn apply_points_delta(&self, id: i64, delta: i64) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET points = points + $1, updated_at = NOW()
            WHERE id = $2 AND ($1 >= 0 OR points + $1 >= 0)
            "#,
        )
        .bind(delta)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM customers WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

            return Err(match exists {
                None => DbError::not_found("customer", id),
                Some(_) => DbError::constraint(format!(
                    "points of customer {id} cannot drop below zero (delta {delta})"
                )),
            });
        }

        debug!(id, delta, "Points updated");
        Ok(())
    }

    /// All customers, highest balance first.
    pub async fn list_all(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, points, created_at, updated_at
            FROM customers
            ORDER BY points DESC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }
}

#[async_trait]
impl CustomerStore for CustomerRepository {
    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Customer>> {
        Ok(CustomerRepository::get_by_name(self, name).await?)
    }

    async fn create(&self, name: &str) -> StoreResult<Customer> {
        Ok(self.insert(name).await?)
    }

    async fn apply_points_delta(&self, id: i64, delta: i64) -> StoreResult<()> {
        Ok(CustomerRepository::apply_points_delta(self, id, delta).await?)
    }

    async fn list_all(&self) -> StoreResult<Vec<Customer>> {
        Ok(CustomerRepository::list_all(self).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn repo() -> CustomerRepository {
        let url = std::env::var("DATABASE_URL").unwrap();
        Database::new(DbConfig::new(url)).await.unwrap().customers()
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
    async fn test_insert_is_unique_and_points_guarded() {
        let repo = repo().await;
        let name = format!("test-{}", uuid::Uuid::new_v4());

        let customer = repo.insert(&name).await.unwrap();
        assert_eq!(customer.points, 0);
        assert!(matches!(
            repo.insert(&name).await.unwrap_err(),
            DbError::UniqueViolation { .. }
        ));

        CustomerRepository::apply_points_delta(&repo, customer.id, 250).await.unwrap();
        CustomerRepository::apply_points_delta(&repo, customer.id, -200).await.unwrap();
        let err = CustomerRepository::apply_points_delta(&repo, customer.id, -200)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation { .. }));

        let reloaded = CustomerRepository::get_by_name(&repo, &name)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.points, 50);

        // exact match only
        let upper = name.to_uppercase();
        assert!(CustomerRepository::get_by_name(&repo, &upper)
            .await
            .unwrap()
            .is_none());
    }
}
