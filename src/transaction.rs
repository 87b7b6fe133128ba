// 💳 Transaction Model - Bank Feed Records
// The immutable transaction record as delivered by the bank feed,
// plus the date-key helpers every derived view buckets on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single ledger entry from the bank feed.
///
/// Core fields mirror the feed payload and never change after import.
/// `amount` is signed: negative = outflow (expense), positive = inflow
/// (income). `booking_date` is an ISO-8601 date string and is the only
/// field used for time bucketing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque unique identifier from the feed; generated when absent
    #[serde(rename = "externalId", default = "default_id")]
    pub id: String,

    #[serde(rename = "amount")]
    pub amount: f64,

    #[serde(rename = "bookingDate")]
    pub booking_date: String,

    /// Settlement date; carried through but never bucketed
    #[serde(rename = "valueDate", default)]
    pub value_date: String,

    /// Free-text narrative (merchant/payer name or memo)
    #[serde(rename = "remittanceInformationUnstructured", default)]
    pub description: String,

    /// Source-ledger code; not semantically parsed
    #[serde(rename = "bankTransactionCode", default)]
    pub bank_transaction_code: String,

    /// Optional short code used as a categorization hint (e.g. CASH, BKDF)
    #[serde(rename = "purposeCode", default, skip_serializing_if = "Option::is_none")]
    pub purpose_code: Option<String>,

    #[serde(rename = "currency", default)]
    pub currency: String,

    #[serde(rename = "accountName", default)]
    pub account_name: String,
}

fn default_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Transaction {
    /// Outflows carry a negative amount in the feed.
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    /// Parse the booking date strictly as `YYYY-MM-DD`.
    ///
    /// Feeds sometimes append a time suffix, so only the first ten
    /// characters are considered. Returns `None` for malformed dates;
    /// callers decide whether to exclude the record or fail.
    pub fn booking_day(&self) -> Option<NaiveDate> {
        let date_part = self.booking_date.get(..10)?;
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }

    /// Monthly grouping key (`YYYY-MM`), `None` when the date is malformed.
    ///
    /// Fixed-width and zero-padded, so lexical order is chronological.
    pub fn month_key(&self) -> Option<String> {
        self.booking_day().map(|d| d.format("%Y-%m").to_string())
    }

    /// Daily grouping key (`YYYY-MM-DD`), `None` when the date is malformed.
    pub fn day_key(&self) -> Option<String> {
        self.booking_day().map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// Compute idempotency hash for duplicate detection at the store
    /// boundary. NOTE: identity = id, deduplication = hash.
    pub fn compute_idempotency_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!(
            "{}{}{}",
            self.booking_date, self.amount, self.description
        ));
        format!("{:x}", hasher.finalize())
    }
}

// ============================================================================
// TESTS
// ============================================================================
