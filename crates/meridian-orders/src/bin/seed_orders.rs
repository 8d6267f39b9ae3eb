//! # Demo Order Generator
//!
//! Creates demo orders through the real creation flow, so bill numbers
//! continue from whatever the database already holds.
//!
//! ## Usage
//! ```bash
//! # Create 25 orders (default) using orders.toml / environment settings
//! cargo run -p meridian-orders --bin seed-orders
//!
//! # Custom amount against a specific database
//! cargo run -p meridian-orders --bin seed-orders -- --count 1200 --db ./meridian_dev.db
//! ```
//!
//! Running it twice against the same file shows recovery: the second run's
//! first bill number follows the first run's last one.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use meridian_core::{NewOrder, NewOrderItem, OrderSource, OrderType, PaymentMethod};
use meridian_db::Database;
use meridian_orders::{BillCounter, CounterStart, OrderContext, OrderCreator, ServiceConfig};
use tracing_subscriber::EnvFilter;

/// Menu used for demo orders: (item id, English, Arabic, unit price in cents)
const MENU: &[(&str, &str, &str, i64)] = &[
    ("shawarma-chicken", "Chicken Shawarma", "شاورما دجاج", 450),
    ("shawarma-beef", "Beef Shawarma", "شاورما لحم", 550),
    ("falafel-wrap", "Falafel Wrap", "لفافة فلافل", 300),
    ("hummus", "Hummus", "حمص", 250),
    ("fries", "French Fries", "بطاطس مقلية", 200),
    ("laban", "Laban", "لبن", 150),
];

const SOURCES: &[OrderSource] = &[
    OrderSource::Walkin,
    OrderSource::Walkin,
    OrderSource::Talabat,
    OrderSource::Jahez,
    OrderSource::Website,
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,meridian=debug,sqlx=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 25;
    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(25);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
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
                println!("Meridian POS Demo Order Generator");
                println!();
                println!("Usage: seed-orders [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>      Number of orders to create (default: 25)");
                println!("  -d, --db <PATH>      Database file path (overrides config)");
                println!("      --config <PATH>  Config file path (default: orders.toml)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let mut config = ServiceConfig::load_or_default(config_path);
    if let Some(path) = db_path {
        config.database.path = path;
    }

    println!("Meridian POS Demo Order Generator");
    println!("=================================");
    println!("Database: {}", config.database.path.display());
    println!("Tenant:   {}", config.tenant_id());
    println!("Orders:   {}", count);
    println!();

    let db = Database::new(config.db_config()).await?;
    let store = db.orders();
    let existing = store.count(config.tenant_id()).await?;
    println!("✓ Connected ({} existing orders)", existing);

    let counter = Arc::new(BillCounter::new(config.init_timeout()));
    match counter.initialize(&store, config.tenant_id()).await {
        CounterStart::Recovered { last } => println!("✓ Bill counter resumes after {}", last),
        CounterStart::Fresh => println!("✓ Bill counter starts fresh"),
        CounterStart::Degraded(failure) => println!("⚠ Bill counter degraded: {}", failure),
    }

    let creator = OrderCreator::from_config(store, counter, &config);
    let context = OrderContext::for_user("seed-orders");

    let mut first: Option<String> = None;
    let mut last: Option<String> = None;
    let mut created = 0;
    let start = std::time::Instant::now();

    for seed in 0..count {
        match creator.create(&demo_order(seed), &context).await {
            Ok(summary) => {
                first.get_or_insert_with(|| summary.bill_number.clone());
                last = Some(summary.bill_number);
                created += 1;
            }
            Err(e) => eprintln!("Failed to create order {}: {}", seed, e),
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Created {} orders in {:?}", created, elapsed);
    if let (Some(first), Some(last)) = (first, last) {
        println!("  Bill numbers: {} .. {}", first, last);
    }

    db.close().await;
    Ok(())
}

/// Builds a deterministic demo order; `seed` varies the lines and the payment.
fn demo_order(seed: usize) -> NewOrder {
    let line_count = 1 + seed % 3;
    let items: Vec<NewOrderItem> = (0..line_count)
        .map(|line| {
            let (item_id, name, name_ar, price) = MENU[(seed + line * 2) % MENU.len()];
            let quantity = 1 + ((seed + line) % 3) as i64;
            NewOrderItem {
                item_id: item_id.to_string(),
                variant_id: None,
                name: name.to_string(),
                name_ar: name_ar.to_string(),
                quantity,
                unit_price_cents: price,
                total_price_cents: price * quantity,
                notes: None,
            }
        })
        .collect();

    let subtotal_cents: i64 = items.iter().map(|item| item.total_price_cents).sum();
    // 5% VAT
    let tax_cents = subtotal_cents * 5 / 100;
    let total_cents = subtotal_cents + tax_cents;

    let payment_method = match seed % 4 {
        0 | 1 => Some(PaymentMethod::Cash),
        2 => Some(PaymentMethod::Card),
        _ => None,
    };
    let cash_received_cents = match payment_method {
        Some(PaymentMethod::Cash) => Some((total_cents / 500 + 1) * 500),
        _ => None,
    };

    NewOrder {
        order_type: if seed % 5 == 0 { OrderType::Qsr } else { OrderType::Takeaway },
        order_source: SOURCES[seed % SOURCES.len()],
        items,
        subtotal_cents,
        tax_cents,
        service_charge_cents: 0,
        delivery_fee_cents: 0,
        total_cents,
        payment_method,
        cash_received_cents,
        change_due_cents: cash_received_cents.map(|cash| cash - total_cents),
        customer_name: None,
        customer_phone: None,
        customer_address: None,
        notes: None,
    }
}
