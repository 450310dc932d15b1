//! scan-runner: headless runner for the spendscan detection engine.
//!
//! Usage:
//!   scan-runner --seed 12345 --days 30 --history-days 120 --db findings.db
//!   scan-runner --seed 12345 --org acme --json

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use spendscan_core::{
    config::DetectorConfig,
    engine::DetectionEngine,
    store::SqliteResultStore,
    types::Transaction,
};
use std::env;

const CATEGORIES: [(&str, f64); 5] = [
    ("groceries", 60.0),
    ("dining", 35.0),
    ("transport", 20.0),
    ("utilities", 80.0),
    ("entertainment", 25.0),
];

const VENDORS: [&str; 5] = [
    "Fresh Mart",
    "Corner Bistro",
    "Metro Transit",
    "City Power & Light",
    "Streamflix",
];

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let days = parse_arg(&args, "--days", 30u64);
    let history_days = parse_arg(&args, "--history-days", 120u64);
    let json_output = args.iter().any(|a| a == "--json");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let org = args
        .windows(2)
        .find(|w| w[0] == "--org")
        .map(|w| w[1].to_string());

    if !json_output {
        println!("spendscan — scan-runner");
        println!("  seed:         {seed}");
        println!("  days:         {days}");
        println!("  history-days: {history_days}");
        println!("  db:           {db}");
        println!();
    }

    let store = if db == ":memory:" {
        SqliteResultStore::in_memory()?
    } else {
        SqliteResultStore::open(db)?
    };
    store.migrate()?;

    let (current, historical) = generate_corpus(seed, days, history_days);

    let engine = DetectionEngine::new(store, DetectorConfig::default());
    let result = engine.detect_anomalies(&current, &historical, org.as_deref());

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("=== RUN SUMMARY ===");
    println!("  run_id:       {}", result.run_id);
    println!("  transactions: {}", result.statistics.total_transactions);
    println!("  anomalies:    {}", result.anomalies.len());
    println!("  anomaly rate: {:.1}%", result.statistics.anomaly_rate * 100.0);
    println!("  avg conf:     {:.2}", result.statistics.avg_confidence);
    if let Some(err) = &result.persistence_error {
        println!("  persistence:  FAILED ({err})");
    } else {
        println!("  persistence:  ok ({db})");
    }

    println!();
    println!("=== RANKED FINDINGS ===");
    if result.anomalies.is_empty() {
        println!("  (none)");
    }
    for anomaly in &result.anomalies {
        println!(
            "  [{}] {} ({:.2}) {}",
            anomaly.severity.as_str(),
            anomaly.anomaly_type.as_str(),
            anomaly.confidence,
            anomaly.description
        );
    }

    println!();
    println!("=== RECOMMENDATIONS ===");
    if result.recommendations.is_empty() {
        println!("  (none)");
    }
    for rec in &result.recommendations {
        println!("  - {rec}");
    }

    Ok(())
}

/// Deterministic synthetic corpus: routine daily spend across a few
/// categories, with a duplicate pair, one large outlier, and a block of
/// round amounts injected into the current period.
fn generate_corpus(seed: u64, days: u64, history_days: u64) -> (Vec<Transaction>, Vec<Transaction>) {
    let mut rng = Pcg64::seed_from_u64(seed);
    let today = NaiveDate::from_ymd_opt(2024, 6, 30).expect("valid anchor date");
    let current_start = today - Duration::days(days as i64 - 1);
    let history_start = current_start - Duration::days(history_days as i64);

    let mut historical = Vec::new();
    let mut current = Vec::new();
    let mut next_id = 0u64;

    let mut day = history_start;
    while day <= today {
        let txns_today = rng.gen_range(2..=5);
        for _ in 0..txns_today {
            let slot = rng.gen_range(0..CATEGORIES.len());
            let (category, base) = CATEGORIES[slot];
            let amount = base * rng.gen_range(0.6..1.6);
            let txn = Transaction {
                id: format!("txn-{next_id:06}"),
                date: day,
                amount: (amount * 100.0).round() / 100.0,
                vendor: VENDORS[slot].to_string(),
                category: Some(category.to_string()),
                description: None,
            };
            next_id += 1;
            if day < current_start {
                historical.push(txn);
            } else {
                current.push(txn);
            }
        }
        day += Duration::days(1);
    }

    // Injected signals.
    let dup_date = today - Duration::days(3);
    for n in [123, 456] {
        current.push(Transaction {
            id: format!("txn-{next_id:06}"),
            date: dup_date,
            amount: 49.99,
            vendor: format!("Corner Bistro #{n}"),
            category: Some("dining".into()),
            description: None,
        });
        next_id += 1;
    }
    current.push(Transaction {
        id: format!("txn-{next_id:06}"),
        date: today - Duration::days(1),
        amount: 5000.0,
        vendor: "Luxe Imports".into(),
        category: Some("shopping".into()),
        description: None,
    });
    next_id += 1;
    for offset in 0..5 {
        current.push(Transaction {
            id: format!("txn-{next_id:06}"),
            date: today - Duration::days(offset),
            amount: 600.0,
            vendor: "Crypto Cash ATM".into(),
            category: Some("transfers".into()),
            description: None,
        });
        next_id += 1;
    }

    log::info!(
        "generated corpus: {} current, {} historical transactions",
        current.len(),
        historical.len()
    );
    (current, historical)
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
