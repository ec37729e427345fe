//! # Catalog and Customer Services
//!
//! Thin validated pass-throughs for the endpoints that do not need a saga.

use std::sync::Arc;

use tracing::{info, Instrument, Span};

use snack_core::validation::{parse_date, validate_new_product};
use snack_core::{Customer, NewProduct, Product, ValidationError};

use crate::error::WorkflowResult;
use crate::ports::{CatalogStore, CustomerStore};

/// Product insert and lookup.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogStore>,
    span: Span,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogStore>, span: Span) -> Self {
        CatalogService { catalog, span }
    }

    /// Validates and stores a new product.
    pub async fn add_product(&self, product: NewProduct) -> WorkflowResult<Product> {
        validate_new_product(&product)?;

        let product = self
            .catalog
            .create(product)
            .instrument(self.span.clone())
            .await?;

        self.span.in_scope(|| {
            info!(product_id = product.id, name = %product.name, "product added");
        });
        Ok(product)
    }

    /// Products manufactured on a `YYYY-MM-DD` date.
    pub async fn products_by_date(&self, date: &str) -> WorkflowResult<Vec<Product>> {
        if date.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "date".to_string(),
            }
            .into());
        }
        let date = parse_date("date", date)?;

        Ok(self
            .catalog
            .get_by_date(date)
            .instrument(self.span.clone())
            .await?)
    }
}

/// Customer listing.
#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerStore>,
    span: Span,
}

impl CustomerService {
    pub fn new(customers: Arc<dyn CustomerStore>, span: Span) -> Self {
        CustomerService { customers, span }
    }

    /// All customers, highest balance first.
    pub async fn list_customers(&self) -> WorkflowResult<Vec<Customer>> {
        Ok(self
            .customers
            .list_all()
            .instrument(self.span.clone())
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::memory::{MemoryCatalog, MemoryCustomers};
    use crate::ports::{MockCatalogStore, StoreError};
    use chrono::NaiveDate;
    use snack_core::{Money, ProductSize};

    fn new_snack(size: ProductSize) -> NewProduct {
        NewProduct {
            name: "Basreng".to_string(),
            product_type: "Crackers".to_string(),
            flavor: "Original".to_string(),
            size,
            price: Money::from_major(15_000),
            quantity: 12,
            manufacturing_date: NaiveDate::from_ymd_opt(2025, 10, 22).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_add_then_find_by_date() {
        let service = CatalogService::new(Arc::new(MemoryCatalog::new()), Span::none());

        let added = service.add_product(new_snack(ProductSize::Medium)).await.unwrap();
        assert_eq!(added.id, 1);

        let found = service.products_by_date("2025-10-22").await.unwrap();
        assert_eq!(found, vec![added]);
        assert!(service.products_by_date("2025-10-23").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_product_validates_before_insert() {
        let mut catalog = MockCatalogStore::new();
        catalog.expect_create().never();
        let service = CatalogService::new(Arc::new(catalog), Span::none());

        let err = service
            .add_product(new_snack(ProductSize::from("Jumbo")))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_products_by_date_requires_valid_date() {
        let service = CatalogService::new(Arc::new(MemoryCatalog::new()), Span::none());

        let err = service.products_by_date("").await.unwrap_err();
        assert_eq!(err.message(), "date is required");

        let err = service.products_by_date("22-10-2025").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_store_failure_passes_through() {
        let mut catalog = MockCatalogStore::new();
        catalog
            .expect_get_by_date()
            .returning(|_| Err(StoreError::Unavailable("connection refused".to_string())));
        let service = CatalogService::new(Arc::new(catalog), Span::none());

        let err = service.products_by_date("2025-10-22").await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_list_customers_by_points() {
        let store = Arc::new(MemoryCustomers::new());
        let ani = store.create("Ani").await.unwrap();
        store.create("Budi").await.unwrap();
        store.apply_points_delta(ani.id, 120).await.unwrap();

        let service = CustomerService::new(store, Span::none());
        let listed = service.list_customers().await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Ani");
        assert_eq!(listed[0].points, 120);
    }
}
