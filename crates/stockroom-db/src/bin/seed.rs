//! # Seed Data Generator
//!
//! Populates the database with sample inventory for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 items (default)
//! cargo run -p stockroom-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p stockroom-db --bin seed -- --count 1000
//!
//! # Specify database path (otherwise STOCKROOM_DB_PATH or ./stockroom.db)
//! cargo run -p stockroom-db --bin seed -- --db ./data/stockroom.db
//! ```
//!
//! ## Generated Data
//! - One category per entry in [`CATEGORIES`]
//! - An `admin` user who performs every write
//! - Items named `{product} {variant}`, created through `InventoryService`
//!   so each one gets its opening stock transaction and audit entry
//! - A handful of sales and deliveries against the first items

use std::env;

use stockroom_core::{Money, NewInventoryItem, PageRequest, UserRole};
use stockroom_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Categories and the products stocked in each.
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "Fasteners",
        "Screws, bolts, nuts and washers",
        &["Hex Bolt", "Wood Screw", "Wall Anchor", "Lock Nut", "Flat Washer"],
    ),
    (
        "Hand Tools",
        "Non-powered tools",
        &["Claw Hammer", "Screwdriver Set", "Tape Measure", "Utility Knife", "Pliers"],
    ),
    (
        "Electrical",
        "Wiring and fittings",
        &["Cable Tie", "Fuse", "Wall Socket", "Light Switch", "Junction Box"],
    ),
    (
        "Paint",
        "Paints, brushes and rollers",
        &["Primer", "Gloss Paint", "Paint Brush", "Paint Roller", "Masking Tape"],
    ),
];

/// Size variants with their price addon in cents.
const VARIANTS: &[(&str, i64)] = &[
    ("Small", 0),
    ("Medium", 150),
    ("Large", 300),
    ("Bulk Pack", 1200),
];

const DEFAULT_COUNT: usize = 200;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,stockroom=debug,sqlx=warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count = DEFAULT_COUNT;
    let mut config = DbConfig::from_env()?;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(DEFAULT_COUNT);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of items to generate (default: {})", DEFAULT_COUNT);
                println!("  -d, --db <PATH>    Database file path (default: $STOCKROOM_DB_PATH or ./stockroom.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(argument = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(path = %config.database_path.display(), count, "Seeding database");

    let db = Database::new(config).await?;

    let existing = db.items().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has items, skipping seed");
        println!("Delete the database file to regenerate.");
        return Ok(());
    }

    let service = db.inventory();

    let admin = db
        .users()
        .create("admin", Some("Store Administrator"), UserRole::Admin)
        .await?;
    let actor = Some(admin.user_id);

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (name, description, _) in CATEGORIES {
        let category = service
            .create_category(name, Some(*description), actor)
            .await?;
        category_ids.push(category.category_id);
    }

    let start = std::time::Instant::now();
    let mut generated = 0;
    let mut seed = 0usize;
    let mut first_items = Vec::new();

    'outer: for round in 1.. {
        let before_round = generated;
        for ((_, _, products), category_id) in CATEGORIES.iter().zip(&category_ids) {
            for product in products.iter() {
                for (variant, price_addon) in VARIANTS {
                    if generated >= count {
                        break 'outer;
                    }

                    let draft = generate_item(product, variant, round, *price_addon, *category_id, seed);
                    seed += 1;

                    match service.create_item(&draft, actor).await {
                        Ok(item) => {
                            generated += 1;
                            if first_items.len() < 5 {
                                first_items.push(item.item_id);
                            }
                            if generated % 50 == 0 {
                                info!(generated, "Progress");
                            }
                        }
                        Err(e) => warn!(name = %draft.item_name, error = %e, "Failed to insert item"),
                    }
                }
            }
        }

        // Every insert failed; more rounds would fail the same way
        if generated == before_round {
            break;
        }
    }

    let elapsed = start.elapsed();
    info!(generated, elapsed_ms = elapsed.as_millis() as u64, "Items generated");

    // Some movement so the dashboard has history
    for (n, item_id) in first_items.iter().enumerate() {
        let n = n as i64;
        service.adjust_stock(*item_id, -(n + 2), Some("Sold"), actor).await?;
        service.adjust_stock(*item_id, 5 * (n + 1), Some("Delivery"), actor).await?;
    }

    let summary = db.reports().dashboard().await?;
    println!();
    println!("Seed complete");
    println!("  Items:          {}", summary.total_items);
    println!("  Stock value:    {}", summary.total_value());
    println!("  Low stock:      {}", summary.low_stock_items);
    for category in &summary.categories {
        println!(
            "  {:<15} {:>4} items  {}",
            category.category_name,
            category.item_count,
            Money::from_cents(category.value_cents)
        );
    }

    let activity = db.activity_logs().recent(PageRequest::first()).await?;
    println!("  Activity rows:  {}", activity.total_elements);

    Ok(())
}

/// Builds one item draft with deterministic pseudo-random numbers.
fn generate_item(
    product: &str,
    variant: &str,
    round: usize,
    price_addon: i64,
    category_id: i64,
    seed: usize,
) -> NewInventoryItem {
    let name = if round == 1 {
        format!("{} {}", product, variant)
    } else {
        format!("{} {} #{}", product, variant, round)
    };

    // Base $0.99 - $24.99 plus variant addon
    let price_cents = 99 + ((seed * 37) % 2400) as i64 + price_addon;

    // Stock 0 - 120, some of it under the reorder level
    let quantity = ((seed * 13) % 121) as i64;
    let reorder_level = 5 + (seed % 4) as i64 * 5;

    NewInventoryItem::new(name, quantity, Money::from_cents(price_cents), category_id)
        .description(format!("{} ({})", product, variant))
        .reorder_level(reorder_level)
}
