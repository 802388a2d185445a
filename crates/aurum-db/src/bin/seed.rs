//! # Seed Data Generator
//!
//! Writes a rate sheet and a few demo estimations for development.
//!
//! ## Usage
//! ```bash
//! # Three demo estimations into the configured database
//! cargo run -p aurum-db --bin seed
//!
//! # Custom amount and database path
//! cargo run -p aurum-db --bin seed -- --count 10 --db ./aurum_dev.db
//! ```
//!
//! ## Generated Estimations
//! Each estimation prices one or two catalog pieces against the demo rate
//! sheet. Every second one trades in old gold; every third one redeems a chit.

use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;

use aurum_core::entry::{price_product, PurchaseDraft};
use aurum_core::{
    ChitDeduction, Customer, EstimationStore, FinalizeOutcome, MakingChargeType, Metal,
    MetalRateSheet, Money, Product, PurchaseDeduction, WastageType,
};
use aurum_db::logging::init_tracing;
use aurum_db::{Database, DbConfig, EstimateConfig, SqliteGateway};

/// Walk-in customers for demo estimations.
const CUSTOMERS: &[(&str, &str)] = &[
    ("Lakshmi Narayanan", "9876543210"),
    ("Ravi Kumar", "9000012345"),
    ("Meena Sundaram", "9444098765"),
    ("Arjun Prakash", "9840011223"),
];

/// Demo rate sheet, rupees per gram.
fn demo_rate_sheet() -> MetalRateSheet {
    MetalRateSheet::new(
        Decimal::new(4900, 0),
        Decimal::new(5450, 0),
        Decimal::new(6000, 0),
        Decimal::new(6540, 0),
        Decimal::new(80, 0),
    )
}

/// Tagged pieces on the showroom floor.
fn catalog() -> Vec<Product> {
    vec![
        Product {
            tag_number: Some("TG-22-0042".into()),
            description: Some("Plain ring".into()),
            metal: Metal::Gold,
            purity: 22,
            piece_count: 1,
            gross_weight: Decimal::new(55, 1),
            stone_weight: Decimal::ZERO,
            wastage: Decimal::new(10, 0),
            wastage_type: WastageType::Percentage,
            making_charge: Decimal::new(500, 0),
            making_charge_type: MakingChargeType::Fixed,
        },
        Product {
            tag_number: Some("TG-22-0107".into()),
            description: Some("Stone studded bangle".into()),
            metal: Metal::Gold,
            purity: 22,
            piece_count: 2,
            gross_weight: Decimal::new(24_350, 3),
            stone_weight: Decimal::new(1_200, 3),
            wastage: Decimal::new(12, 1),
            wastage_type: WastageType::Weight,
            making_charge: Decimal::new(450, 0),
            making_charge_type: MakingChargeType::PerGram,
        },
        Product {
            tag_number: Some("TG-18-0013".into()),
            description: Some("Diamond pendant".into()),
            metal: Metal::Gold,
            purity: 18,
            piece_count: 1,
            gross_weight: Decimal::new(4_100, 3),
            stone_weight: Decimal::new(300, 3),
            wastage: Decimal::new(14, 0),
            wastage_type: WastageType::Percentage,
            making_charge: Decimal::new(12, 0),
            making_charge_type: MakingChargeType::Percentage,
        },
        Product {
            tag_number: Some("SV-0301".into()),
            description: Some("Silver anklet pair".into()),
            metal: Metal::Silver,
            purity: 925,
            piece_count: 2,
            gross_weight: Decimal::new(62, 0),
            stone_weight: Decimal::ZERO,
            wastage: Decimal::new(8, 0),
            wastage_type: WastageType::Percentage,
            making_charge: Decimal::new(15, 0),
            making_charge_type: MakingChargeType::PerGram,
        },
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 3;
    let mut db_path: Option<String> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(3);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Aurum Estimate Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>      Number of estimations to generate (default: 3)");
                println!("  -d, --db <PATH>      Database file path (default: from estimate.toml)");
                println!("      --config <PATH>  Config file path (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = EstimateConfig::load_or_default(config_path);
    let db_config = match &db_path {
        Some(path) => DbConfig::new(path).max_connections(config.database.max_connections),
        None => config.db_config(),
    };

    println!("🌱 Aurum Estimate Seed Data Generator");
    println!("=====================================");
    println!("Store:       {}", config.store.name);
    println!("Database:    {}", db_config.database_path.display());
    println!("Tax:         {}%", config.pricing.tax_percent);
    println!("Estimations: {}", count);
    println!();

    let db = Database::new(db_config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.estimations().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} estimations", existing);
        println!("  Skipping seed to keep numbering clean.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut store = EstimationStore::new(SqliteGateway::new(db.clone()), config.pricing());
    store.load().await?;
    store.update_rate_sheet(demo_rate_sheet()).await?;
    println!("✓ Rate sheet saved (22K ₹{}/g)", store.rate_sheet().rate_22k);

    println!();
    println!("Generating estimations...");

    let products = catalog();
    for n in 0..count {
        let first = &products[n % products.len()];
        let item = price_product(first, store.rate_sheet(), store.config(), format!("item-{n}-a"));
        store.add_item(item);

        if n % 2 == 1 {
            let second = &products[(n + 1) % products.len()];
            let item =
                price_product(second, store.rate_sheet(), store.config(), format!("item-{n}-b"));
            store.add_item(item);

            let trade_in = store.price_purchase(
                PurchaseDraft::new(format!("old-{n}"), "old chain", Metal::Gold, 22, Decimal::new(8, 0))
                    .with_deduction(PurchaseDeduction::Percentage(Decimal::new(8, 0))),
            );
            store.add_purchase_item(trade_in);
        }

        if n % 3 == 2 {
            store.add_chit_item(ChitDeduction::new(
                format!("chit-{n}"),
                format!("CH-{:04}", 100 + n),
                Money::new(Decimal::new(5000, 0)),
            ));
        }

        let (name, mobile) = CUSTOMERS[n % CUSTOMERS.len()];
        store.set_customer(Customer::new(name, mobile));

        let net_payable = store.totals().net_payable;
        match store.finalize().await? {
            FinalizeOutcome::Saved { estimation_number } => {
                println!("  #{:<4} {:<20} {}", estimation_number, name, net_payable);
            }
            FinalizeOutcome::NothingToSave => {}
        }
    }

    println!();
    println!("Recent estimations:");
    for record in store.history() {
        println!(
            "  #{:<4} {} item(s), net payable {}",
            record.estimation_number,
            record.items.len(),
            record.totals.net_payable
        );
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
