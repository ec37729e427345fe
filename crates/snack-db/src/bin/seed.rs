//! # Seed Data Generator
//!
//! Loads a small demo snack catalog for development.
//!
//! ## Usage
//! ```bash
//! # Uses DATABASE_URL
//! cargo run -p snack-db --bin seed
//!
//! # Override the manufacturing date stamped on every product
//! cargo run -p snack-db --bin seed -- --date 2025-10-22
//! ```
//!
//! Every flavor is generated in the three known sizes, priced per size.
//! Re-running on the same date is a no-op.

use std::env;

use snack_core::validation::{parse_date, validate_new_product};
use snack_core::{Money, NewProduct, ProductSize};
use snack_db::{Database, DbConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// (name, type, flavors)
const SNACKS: &[(&str, &str, &[&str])] = &[
    ("Keripik Pedas", "Chips", &["Balado", "Jagung Bakar", "Original"]),
    ("Kacang Atom", "Nuts", &["Bawang", "Pedas"]),
    ("Makaroni", "Crackers", &["Keju", "Pedas Daun Jeruk"]),
    ("Rengginang", "Crackers", &["Terasi", "Original"]),
];

/// Unit price in major currency units and starting stock, per size.
const SIZES: &[(ProductSize, i64, i64)] = &[
    (ProductSize::Small, 10_000, 50),
    (ProductSize::Medium, 25_000, 30),
    (ProductSize::Large, 35_000, 20),
];

const DEFAULT_DATE: &str = "2025-10-22";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().collect();
    let mut raw_date = DEFAULT_DATE.to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--date" | "-d" => {
                if i + 1 < args.len() {
                    raw_date = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Snack POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --date <YYYY-MM-DD>  Manufacturing date (default: {DEFAULT_DATE})");
                println!("  -h, --help               Show this help message");
                println!();
                println!("Environment:");
                println!("  DATABASE_URL             PostgreSQL connection URL");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let manufacturing_date = parse_date("date", &raw_date)?;
    let database_url = env::var("DATABASE_URL")?;

    let db = Database::new(DbConfig::new(database_url).max_connections(2)).await?;
    info!("Connected, migrations applied");

    let existing = db.products().get_by_date(manufacturing_date).await?;
    if !existing.is_empty() {
        warn!(
            count = existing.len(),
            date = %manufacturing_date,
            "Products already seeded for this date, skipping"
        );
        return Ok(());
    }

    let mut generated = 0;
    for (name, product_type, flavors) in SNACKS {
        for flavor in flavors.iter() {
            for (size, price, quantity) in SIZES {
                let product = NewProduct {
                    name: name.to_string(),
                    product_type: product_type.to_string(),
                    flavor: flavor.to_string(),
                    size: size.clone(),
                    price: Money::from_major(*price),
                    quantity: *quantity,
                    manufacturing_date,
                };
                validate_new_product(&product)?;

                match db.products().insert(&product).await {
                    Ok(stored) => {
                        generated += 1;
                        info!(id = stored.id, label = %stored.label(), size = %stored.size, "Seeded");
                    }
                    Err(e) => error!(label = %format!("{name} - {flavor}"), error = %e, "Insert failed"),
                }
            }
        }
    }

    info!(generated, date = %manufacturing_date, "Seed complete");
    db.close().await;
    Ok(())
}
