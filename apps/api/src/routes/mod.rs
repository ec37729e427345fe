//! HTTP routes.
//!
//! | Method | Path              | Handler                         |
//! |--------|-------------------|---------------------------------|
//! | GET    | `/health`         | [`health::check`]               |
//! | GET    | `/customers`      | [`customers::list`]             |
//! | POST   | `/products`       | [`products::create`]            |
//! | GET    | `/products`       | [`products::by_date`]           |
//! | POST   | `/transactions`   | [`transactions::purchase`]      |
//! | GET    | `/transactions`   | [`transactions::report`]        |
//! | POST   | `/redemptions`    | [`redemptions::redeem`]         |
//! | DELETE | `/reports/cache`  | [`reports::evict`]              |

pub mod customers;
pub mod health;
pub mod products;
pub mod redemptions;
pub mod reports;
pub mod transactions;

use serde::Deserialize;

/// `?start=YYYY-MM-DD&end=YYYY-MM-DD`, both optional at decode time.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}
