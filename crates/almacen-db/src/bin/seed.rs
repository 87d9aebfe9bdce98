//! # Seed Data Loader
//!
//! Loads the sample catalog into an empty database for demos and development.
//!
//! ## Usage
//! ```bash
//! cargo run -p almacen-db --bin seed
//!
//! # Specify database path
//! cargo run -p almacen-db --bin seed -- --db ./data/almacen.db
//! ```
//!
//! ## Sample Products
//! Five phones and accessories, each attached to its brand from the initial
//! migration. Nothing is inserted when the product table already has rows.

use std::env;

use almacen_core::{Money, Product, DEFAULT_BRAND_ID};
use almacen_db::{Database, DbConfig};

/// (name, description, price, stock, brand)
const SAMPLE_PRODUCTS: &[(&str, &str, &str, i64, &str)] = &[
    (
        "iPhone 15 Pro",
        "Smartphone con chip A17 Pro y cámara de 48MP",
        "4500.00",
        15,
        "Apple",
    ),
    (
        "Samsung Galaxy S24",
        "Smartphone con IA integrada y pantalla Dynamic AMOLED",
        "3800.00",
        20,
        "Samsung",
    ),
    (
        "Honor Magic 6 Pro",
        "Smartphone con cámara de 50MP y carga rápida de 66W",
        "2800.00",
        25,
        "Honor",
    ),
    (
        "Xiaomi 14 Ultra",
        "Smartphone con cámara Leica y cuerpo de titanio",
        "3200.00",
        18,
        "Xiaomi",
    ),
    (
        "Funda iPhone 15 Pro",
        "Funda protectora para iPhone 15 Pro",
        "80.00",
        100,
        "General",
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./almacen_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Almacen POS Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./almacen_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("Almacen POS Seed Data Loader");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        db.close().await;
        return Ok(());
    }

    let mut inserted = 0;
    for (name, description, price, stock, brand) in SAMPLE_PRODUCTS {
        let brand_id = db
            .brands()
            .get_by_name(brand)
            .await?
            .map(|b| b.id)
            .unwrap_or_else(|| DEFAULT_BRAND_ID.to_string());

        let product = Product::new(*name, Money::parse(price)?.cents(), *stock)
            .with_description(*description)
            .with_brand(brand_id);

        match db.products().insert(&product).await {
            Ok(p) => {
                println!("  + {} ({}, stock {})", p.name, p.price(), p.stock);
                inserted += 1;
            }
            Err(e) => eprintln!("Failed to insert {}: {}", product.name, e),
        }
    }

    let summary = db.dashboard().summary().await?;
    println!();
    println!("✓ Inserted {} products", inserted);
    println!("  Inventory value: {}", summary.inventory_value);

    db.close().await;
    Ok(())
}
