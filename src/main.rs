use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::env;
use std::path::{Path, PathBuf};

use finwise::{
    aggregate, get_all_transactions, insert_transactions, load_csv, load_json, setup_database,
    verify_count, CategoryRuleSet,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("import") => {
            let file = args
                .get(2)
                .context("Usage: finwise import <transactions.json|.csv>")?;
            run_import(Path::new(file))?;
        }
        Some("report") | None => run_report()?,
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Usage: finwise [import <file> | report]");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Database location, overridable for testing and deployment
fn db_path() -> PathBuf {
    env::var("FINWISE_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("finwise.db"))
}

fn run_import(file: &Path) -> Result<()> {
    println!("💾 FinWise - Transaction Import");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load the feed file, dispatching on extension
    println!("\n📂 Loading {:?}...", file);
    let transactions = match file.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(file)?,
        Some("csv") => load_csv(file)?,
        _ => bail!("Unsupported file type (expected .json or .csv): {:?}", file),
    };
    println!("✓ Loaded {} transactions", transactions.len());

    // 2. Setup database
    let conn = Connection::open(db_path())?;
    setup_database(&conn)?;
    println!("✓ Database initialized with WAL mode");

    // 3. Insert with dedup
    let summary = insert_transactions(&conn, &transactions)?;
    println!("✓ Inserted: {} transactions", summary.inserted);
    println!("✓ Skipped duplicates: {}", summary.duplicates);

    // 4. Verify count
    let count = verify_count(&conn)?;
    println!("✓ Database contains {} transactions", count);

    Ok(())
}

fn run_report() -> Result<()> {
    let path = db_path();
    if !path.exists() {
        eprintln!("❌ Database not found at {:?}", path);
        eprintln!("   Run: finwise import <transactions.json>");
        eprintln!("   to import a feed first.");
        std::process::exit(1);
    }

    let conn = Connection::open(&path)?;
    let transactions = get_all_transactions(&conn)?;

    println!("📊 FinWise Dashboard ({} transactions)", transactions.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let rules = CategoryRuleSet::with_defaults();
    let data = aggregate(&transactions, &rules);

    println!("\nMonthly totals:");
    for bucket in &data.monthly_spending {
        println!("  {}  {:>12.2}", bucket.date, bucket.amount);
    }

    println!("\nExpense categories:");
    if data.expense_categories.is_empty() {
        println!("  (no expenses)");
    }
    for share in &data.expense_categories {
        println!("  {:<16} {:>5.1}%", share.name, share.value);
    }

    println!("\nDaily spending:");
    for bucket in &data.daily_spending {
        println!("  {}  {:>12.2}", bucket.date, bucket.amount);
    }

    println!("\nRecent transactions:");
    for tx in data.transactions.iter().take(10) {
        println!(
            "  {}  {:>12.2}  {}",
            tx.booking_date,
            tx.amount,
            if tx.description.is_empty() { "-" } else { &tx.description }
        );
    }

    Ok(())
}
