// 💾 Transaction Store - SQLite + WAL
// Persists imported bank feeds. The aggregation layer stays stateless:
// the store only remembers what was imported, dedups on insert via the
// idempotency hash, and hands batches back ordered most-recent-first.

use crate::transaction::Transaction;
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            idempotency_hash TEXT UNIQUE NOT NULL,
            external_id TEXT NOT NULL,
            amount REAL NOT NULL,
            booking_date TEXT NOT NULL,
            value_date TEXT NOT NULL,
            description TEXT NOT NULL,
            bank_transaction_code TEXT NOT NULL,
            purpose_code TEXT,
            currency TEXT NOT NULL,
            account_name TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_idempotency_hash ON transactions(idempotency_hash)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_booking_date ON transactions(booking_date)",
        [],
    )?;

    Ok(())
}

/// Import counts: how many records landed and how many the hash rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub duplicates: usize,
}

/// Load a transaction batch from a JSON file. Accepts either a bare array
/// or the analysis envelope the backend returns (`{ "transactions": [...] }`).
pub fn load_json(path: &Path) -> Result<Vec<Transaction>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {:?}", path))?;

    let value: serde_json::Value =
        serde_json::from_str(&content).context("Failed to parse transactions JSON")?;

    let array = match &value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(map) => map
            .get("transactions")
            .cloned()
            .context("JSON object has no \"transactions\" field")?,
        _ => anyhow::bail!("Expected a JSON array or an analysis envelope"),
    };

    let transactions: Vec<Transaction> =
        serde_json::from_value(array).context("Failed to deserialize transactions")?;

    Ok(transactions)
}

/// Load a transaction batch from a CSV export with the same field names as
/// the JSON feed.
pub fn load_csv(path: &Path) -> Result<Vec<Transaction>> {
    let mut rdr = csv::Reader::from_path(path).context("Failed to open CSV file")?;

    let mut transactions = Vec::new();
    for result in rdr.deserialize() {
        let transaction: Transaction = result.context("Failed to deserialize transaction")?;
        transactions.push(transaction);
    }

    Ok(transactions)
}

/// Insert a batch, skipping records whose idempotency hash is already
/// stored. Duplicates are counted, not errors: re-importing a feed is a
/// normal operation.
pub fn insert_transactions(conn: &Connection, transactions: &[Transaction]) -> Result<ImportSummary> {
    let mut inserted = 0;
    let mut duplicates = 0;

    for tx in transactions {
        let hash = tx.compute_idempotency_hash();

        let result = conn.execute(
            "INSERT INTO transactions (
                idempotency_hash, external_id, amount, booking_date, value_date,
                description, bank_transaction_code, purpose_code, currency, account_name
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                hash,
                tx.id,
                tx.amount,
                tx.booking_date,
                tx.value_date,
                tx.description,
                tx.bank_transaction_code,
                tx.purpose_code,
                tx.currency,
                tx.account_name,
            ],
        );

        match result {
            Ok(_) => inserted += 1,
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                duplicates += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(ImportSummary { inserted, duplicates })
}

pub fn get_all_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT external_id, amount, booking_date, value_date, description,
                bank_transaction_code, purpose_code, currency, account_name
         FROM transactions
         ORDER BY booking_date DESC",
    )?;

    let transactions = stmt
        .query_map([], |row| {
            Ok(Transaction {
                id: row.get(0)?,
                amount: row.get(1)?,
                booking_date: row.get(2)?,
                value_date: row.get(3)?,
                description: row.get(4)?,
                bank_transaction_code: row.get(5)?,
                purpose_code: row.get(6)?,
                currency: row.get(7)?,
                account_name: row.get(8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(transactions)
}

pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;

    Ok(count)
}

// ============================================================================
// TESTS
// ============================================================================
