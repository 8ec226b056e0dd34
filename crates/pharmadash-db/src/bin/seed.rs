//! # Seed Data Generator
//!
//! Populates the database with pharmacy products and sales for development.
//!
//! ## Usage
//! ```bash
//! # 120 sales over the last 45 days (default)
//! cargo run -p pharmadash-db --bin seed
//!
//! # Custom amount
//! cargo run -p pharmadash-db --bin seed -- --sales 500
//!
//! # Specify database path
//! cargo run -p pharmadash-db --bin seed -- --db ./data/pharmadash.db
//! ```
//!
//! After seeding, the dashboard overview is printed as JSON.

use chrono::{Duration, Local, Utc};
use std::env;

use pharmadash_core::{LineItem, Money, ProductStock, SaleRecord, SaleStatus};
use pharmadash_db::repository::product::generate_product_id;
use pharmadash_db::{init_tracing, DashboardConfig, DashboardService, Database, DbConfig};

/// (name, price in cents, stock, min_stock)
const PRODUCTS: &[(&str, i64, i64, Option<i64>)] = &[
    ("Paracetamol 500mg x20", 350, 120, None),
    ("Ibuprofen 400mg x10", 420, 4, None),
    ("Amoxicillin 500mg x21", 1290, 8, Some(10)),
    ("Loratadine 10mg x10", 560, 35, None),
    ("Omeprazole 20mg x14", 780, 2, Some(6)),
    ("Saline Solution 500ml", 310, 60, None),
    ("Vitamin C 1g x10", 640, 18, None),
    ("Cough Syrup 120ml", 890, 5, None),
    ("Sterile Gauze 10x10", 150, 200, Some(50)),
    ("Digital Thermometer", 1750, 3, None),
];

const CLIENTS: &[&str] = &[
    "Ana Torres",
    "Luis Gómez",
    "María Rojas",
    "Carlos Pérez",
    "Lucía Herrera",
    "Jorge Castillo",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut sales_count: usize = 120;
    let mut db_path = String::from("./pharmadash_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--sales" | "-s" => {
                if i + 1 < args.len() {
                    sales_count = args[i + 1].parse().unwrap_or(120);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("PharmaDash Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --sales <N>    Number of sales to generate (default: 120)");
                println!("  -d, --db <PATH>    Database file path (default: ./pharmadash_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("PharmaDash Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!("Sales:    {}", sales_count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.sales().count().await? > 0 {
        println!("⚠ Database already has sales");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut products = Vec::with_capacity(PRODUCTS.len());
    for (name, price, stock, min_stock) in PRODUCTS {
        let product = ProductStock {
            id: generate_product_id(),
            name: name.to_string(),
            price: Money::from_cents(*price),
            stock: *stock,
            min_stock: *min_stock,
        };
        db.products().insert(&product).await?;
        products.push(product);
    }
    println!("✓ Inserted {} products", products.len());

    let start = std::time::Instant::now();
    let mut generated = 0;
    for seed in 0..sales_count {
        let sale = generate_sale(&products, seed);
        if let Err(e) = db.sales().insert(&sale).await {
            eprintln!("Failed to insert sale {}: {}", sale.id, e);
            continue;
        }
        generated += 1;
    }
    println!("✓ Generated {} sales in {:?}", generated, start.elapsed());

    let config = DashboardConfig {
        database_path: db_path.into(),
        ..DashboardConfig::default()
    };
    let service = DashboardService::new(db.clone(), &config);
    let overview = service.overview(Local::now()).await?;

    println!();
    println!("{}", serde_json::to_string_pretty(&overview.stats)?);
    println!("{}", serde_json::to_string_pretty(&overview.status_counts)?);
    println!("Low-stock products: {}", overview.low_stock_count);

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates one sale with 1-3 line items spread over the last 45 days.
fn generate_sale(products: &[ProductStock], seed: usize) -> SaleRecord {
    let minutes_ago = ((seed * 7919) % (45 * 24 * 60)) as i64;
    let created_at = Utc::now() - Duration::minutes(minutes_ago);

    let item_count = 1 + seed % 3;
    let items: Vec<LineItem> = (0..item_count)
        .map(|n| {
            let product = &products[(seed * 3 + n * 5) % products.len()];
            let quantity = 1 + ((seed + n) % 4) as i64;
            LineItem::new(product.id.clone(), quantity, product.price)
        })
        .collect();
    let total: Money = items.iter().map(LineItem::subtotal).sum();

    let status = match seed % 10 {
        0..=3 => SaleStatus::Delivered,
        4..=6 => SaleStatus::Confirmed,
        7 | 8 => SaleStatus::Pending,
        _ => SaleStatus::Cancelled,
    };

    SaleRecord::new(total, created_at)
        .with_status(status)
        .with_client(CLIENTS[seed % CLIENTS.len()])
        .with_items(items)
}
