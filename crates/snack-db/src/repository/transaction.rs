//! # Transaction Repository
//!
//! The append-only ledger and the sales report aggregation.
//!
//! ## Report Snapshot
//! ```text
//! BEGIN ISOLATION LEVEL REPEATABLE READ
//!   1. COUNT(DISTINCT customer_id), SUM(quantity), SUM(total_price_cents)
//!   2. best "name - flavor" by SUM(quantity)
//!   3. rows in range, most recent first
//! COMMIT
//! ```
//! All three read the same snapshot, so the totals always agree with the
//! listed rows even while purchases are being recorded.
//!
//! Range filter: the UTC calendar day of `transaction_date` between `start`
//! and `end`, both inclusive.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use snack_core::{Money, NewTransaction, ProductSize, SalesReport, Transaction, NO_SALES_LABEL};
use snack_workflow::{LedgerStore, StoreResult};

use crate::error::DbResult;

const IN_RANGE: &str = "(transaction_date AT TIME ZONE 'UTC')::date BETWEEN $1 AND $2";

/// Row shape of the `transactions` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    customer_id: i64,
    customer_name: String,
    product_id: i64,
    product_name: String,
    product_size: String,
    product_flavor: String,
    quantity: i64,
    total_price_cents: i64,
    transaction_date: DateTime<Utc>,
    is_new_customer: bool,
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Transaction {
            id: row.id,
            customer_id: row.customer_id,
            customer_name: row.customer_name,
            product_id: row.product_id,
            product_name: row.product_name,
            product_size: ProductSize::from(row.product_size),
            product_flavor: row.product_flavor,
            quantity: row.quantity,
            total_price: Money::from_cents(row.total_price_cents),
            transaction_date: row.transaction_date,
            is_new_customer: row.is_new_customer,
        }
    }
}

/// Repository for the transaction ledger.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        TransactionRepository { pool }
    }

    /// Appends a transaction.
    pub async fn insert(&self, record: NewTransaction) -> DbResult<Transaction> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, customer_id, customer_name,
                product_id, product_name, product_size, product_flavor,
                quantity, total_price_cents, transaction_date, is_new_customer
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(id)
        .bind(record.customer_id)
        .bind(&record.customer_name)
        .bind(record.product_id)
        .bind(&record.product_name)
        .bind(record.product_size.as_str())
        .bind(&record.product_flavor)
        .bind(record.quantity)
        .bind(record.total_price.cents())
        .bind(record.transaction_date)
        .bind(record.is_new_customer)
        .execute(&self.pool)
        .await?;

        debug!(%id, "Transaction recorded");
        Ok(record.with_id(id))
    }

    /// Aggregates `[start, end]` from one REPEATABLE READ snapshot.
    pub async fn report(&self, start: NaiveDate, end: NaiveDate) -> DbResult<SalesReport> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let (total_customers, total_products, income_cents): (i64, i64, i64) =
            sqlx::query_as(&format!(
                r#"
                SELECT
                    COUNT(DISTINCT customer_id),
                    COALESCE(SUM(quantity), 0)::BIGINT,
                    COALESCE(SUM(total_price_cents), 0)::BIGINT
                FROM transactions
                WHERE {IN_RANGE}
                "#
            ))
            .bind(start)
            .bind(end)
            .fetch_one(&mut *tx)
            .await?;

        let best_seller: Option<String> = sqlx::query_scalar(&format!(
            r#"
            SELECT product_name || ' - ' || product_flavor
            FROM transactions
            WHERE {IN_RANGE}
            GROUP BY product_name, product_flavor
            ORDER BY SUM(quantity) DESC, product_name || ' - ' || product_flavor ASC
            LIMIT 1
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_optional(&mut *tx)
        .await?;

        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            SELECT
                id, customer_id, customer_name,
                product_id, product_name, product_size, product_flavor,
                quantity, total_price_cents, transaction_date, is_new_customer
            FROM transactions
            WHERE {IN_RANGE}
            ORDER BY transaction_date DESC, id
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(%start, %end, rows = rows.len(), "Report aggregated");
        Ok(SalesReport {
            start_date: start,
            end_date: end,
            total_customers,
            total_products,
            total_income: Money::from_cents(income_cents),
            best_seller: best_seller.unwrap_or_else(|| NO_SALES_LABEL.to_string()),
            transactions: rows.into_iter().map(Transaction::from).collect(),
        })
    }
}

#[async_trait]
impl LedgerStore for TransactionRepository {
    async fn create(&self, transaction: NewTransaction) -> StoreResult<Transaction> {
        Ok(self.insert(transaction).await?)
    }

    async fn aggregate_report(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<SalesReport> {
        Ok(self.report(start, end).await?)
    }
}
