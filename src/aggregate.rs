// 📊 Dashboard Aggregator - Derived Views
// Reduces a transaction batch into the four views the dashboard charts:
// monthly totals, expense category shares, daily spend, sorted list.
// Stateless by design: every call recomputes from scratch, nothing is
// cached or mutated incrementally.

use crate::classify::CategoryRuleSet;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A (date key, total) pair. The key is `YYYY-MM` for monthly buckets and
/// `YYYY-MM-DD` for daily buckets; it is only ever used for grouping and
/// sorting, never parsed back into a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub date: String,
    pub amount: f64,
}

/// A category's share of total expenses, as a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub name: String,
    pub value: f64,
}

/// Everything the dashboard renders, derived from one transaction batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    /// All transactions bucketed by month, ascending
    pub monthly_spending: Vec<TimeBucket>,

    /// Expense share per category, descending by percentage
    pub expense_categories: Vec<CategoryShare>,

    /// Expenses bucketed by day, ascending
    pub daily_spending: Vec<TimeBucket>,

    /// The input batch ordered most-recent-first for list display
    pub transactions: Vec<Transaction>,
}

/// Derive the dashboard views from a transaction batch.
///
/// Four independent passes over the same input; no shared mutable state.
/// Deterministic: the same batch always produces structurally identical
/// output. Records with malformed booking dates are excluded from the
/// date-bucketed views but still counted in category shares — a bad date
/// is a per-record defect and must not corrupt the other buckets.
pub fn aggregate(transactions: &[Transaction], rules: &CategoryRuleSet) -> DashboardData {
    DashboardData {
        monthly_spending: monthly_spending(transactions),
        expense_categories: expense_categories(transactions, rules),
        daily_spending: daily_spending(transactions),
        transactions: sorted_by_date_desc(transactions),
    }
}

/// Group all transactions (income and expense alike) by `YYYY-MM` and sum
/// absolute amounts. BTreeMap keeps the fixed-width keys ascending.
fn monthly_spending(transactions: &[Transaction]) -> Vec<TimeBucket> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();

    for tx in transactions {
        if let Some(month) = tx.month_key() {
            *totals.entry(month).or_insert(0.0) += tx.amount.abs();
        }
    }

    totals
        .into_iter()
        .map(|(date, amount)| TimeBucket { date, amount })
        .collect()
}

/// Classify expenses and convert each category's sum into a percentage of
/// the expense total, descending. A batch with no expenses yields an empty
/// list rather than 0%/NaN entries.
fn expense_categories(
    transactions: &[Transaction],
    rules: &CategoryRuleSet,
) -> Vec<CategoryShare> {
    let mut sums: HashMap<&str, f64> = HashMap::new();

    for tx in transactions.iter().filter(|tx| tx.is_expense()) {
        *sums.entry(rules.classify(tx)).or_insert(0.0) += tx.amount.abs();
    }

    let total: f64 = sums.values().sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut shares: Vec<CategoryShare> = sums
        .into_iter()
        .map(|(name, sum)| CategoryShare {
            name: name.to_string(),
            value: sum / total * 100.0,
        })
        .collect();

    // Ties broken by name so repeated runs are byte-identical
    shares.sort_by(|a, b| b.value.total_cmp(&a.value).then(a.name.cmp(&b.name)));
    shares
}

/// Group expenses by full date and sum absolute amounts, ascending.
fn daily_spending(transactions: &[Transaction]) -> Vec<TimeBucket> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();

    for tx in transactions.iter().filter(|tx| tx.is_expense()) {
        if let Some(day) = tx.day_key() {
            *totals.entry(day).or_insert(0.0) += tx.amount.abs();
        }
    }

    totals
        .into_iter()
        .map(|(date, amount)| TimeBucket { date, amount })
        .collect()
}

/// Copy of the batch ordered by booking date descending, stable for equal
/// dates. Lexical comparison is chronological for ISO-8601 strings.
fn sorted_by_date_desc(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.booking_date.cmp(&a.booking_date));
    sorted
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{EXPENSE, FOOD_AND_DINING, TRANSPORTATION};
    use crate::transaction::tests::sample;

    fn rules() -> CategoryRuleSet {
        CategoryRuleSet::with_defaults()
    }

    #[test]
    fn test_spec_scenario() {
        // The reference scenario: one Zomato expense, one salary credit.
        let batch = vec![
            sample(-500.0, "2024-01-05", "Zomato order"),
            sample(2000.0, "2024-01-10", "Salary credit"),
        ];

        let data = aggregate(&batch, &rules());

        assert_eq!(
            data.monthly_spending,
            vec![TimeBucket { date: "2024-01".to_string(), amount: 2500.0 }]
        );
        assert_eq!(
            data.expense_categories,
            vec![CategoryShare { name: FOOD_AND_DINING.to_string(), value: 100.0 }]
        );
        assert_eq!(
            data.daily_spending,
            vec![TimeBucket { date: "2024-01-05".to_string(), amount: 500.0 }]
        );
        assert_eq!(data.transactions[0].booking_date, "2024-01-10");
    }

    #[test]
    fn test_empty_batch_yields_empty_views() {
        let data = aggregate(&[], &rules());
        assert!(data.monthly_spending.is_empty());
        assert!(data.expense_categories.is_empty());
        assert!(data.daily_spending.is_empty());
        assert!(data.transactions.is_empty());
    }

    #[test]
    fn test_monthly_totals_cover_the_whole_batch() {
        let batch = vec![
            sample(-500.0, "2024-01-05", "Zomato order"),
            sample(2000.0, "2024-01-10", "Salary credit"),
            sample(-230.0, "2024-02-03", "Uber trip"),
            sample(-120.0, "2023-12-28", "coffee"),
        ];

        let data = aggregate(&batch, &rules());

        let bucket_sum: f64 = data.monthly_spending.iter().map(|b| b.amount).sum();
        let batch_sum: f64 = batch.iter().map(|tx| tx.amount.abs()).sum();
        assert!((bucket_sum - batch_sum).abs() < 1e-9);

        // Ascending month keys
        let keys: Vec<&str> = data.monthly_spending.iter().map(|b| b.date.as_str()).collect();
        assert_eq!(keys, vec!["2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn test_category_percentages_sum_to_100() {
        let batch = vec![
            sample(-500.0, "2024-01-05", "Zomato order"),
            sample(-230.0, "2024-01-06", "Uber trip"),
            sample(-770.0, "2024-01-07", "bookstore"),
            sample(9000.0, "2024-01-10", "Salary credit"),
        ];

        let data = aggregate(&batch, &rules());

        let pct_sum: f64 = data.expense_categories.iter().map(|c| c.value).sum();
        assert!((pct_sum - 100.0).abs() < 1e-9);

        // Descending by share: bookstore 770 > Zomato 500 > Uber 230
        let names: Vec<&str> = data.expense_categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![EXPENSE, FOOD_AND_DINING, TRANSPORTATION]);
    }

    #[test]
    fn test_no_expenses_means_no_category_shares() {
        let batch = vec![
            sample(2000.0, "2024-01-10", "Salary credit"),
            sample(150.0, "2024-01-20", "refund"),
        ];

        let data = aggregate(&batch, &rules());
        assert!(data.expense_categories.is_empty());
        for share in &data.expense_categories {
            assert!(!share.value.is_nan());
        }
    }

    #[test]
    fn test_daily_spending_ignores_income() {
        let batch = vec![
            sample(-500.0, "2024-01-05", "Zomato order"),
            sample(-100.0, "2024-01-05", "Swiggy order"),
            sample(2000.0, "2024-01-05", "Salary credit"),
        ];

        let data = aggregate(&batch, &rules());
        assert_eq!(
            data.daily_spending,
            vec![TimeBucket { date: "2024-01-05".to_string(), amount: 600.0 }]
        );
    }

    #[test]
    fn test_sorted_is_a_stable_desc_permutation() {
        let mut a = sample(-500.0, "2024-01-05", "first on day");
        a.id = "a".to_string();
        let mut b = sample(-100.0, "2024-01-05", "second on day");
        b.id = "b".to_string();
        let c = sample(2000.0, "2024-01-10", "Salary credit");

        let batch = vec![a, b, c];
        let data = aggregate(&batch, &rules());

        assert_eq!(data.transactions.len(), batch.len());
        assert_eq!(data.transactions[0].booking_date, "2024-01-10");
        // Stable sort preserves input order for equal dates
        assert_eq!(data.transactions[1].id, "a");
        assert_eq!(data.transactions[2].id, "b");
        // Input untouched
        assert_eq!(batch[0].id, "a");
    }

    #[test]
    fn test_malformed_date_excluded_from_time_buckets_only() {
        let batch = vec![
            sample(-500.0, "2024-01-05", "Zomato order"),
            sample(-300.0, "garbage", "Uber trip"),
        ];

        let data = aggregate(&batch, &rules());

        // Only the well-dated record lands in time buckets
        assert_eq!(data.monthly_spending.len(), 1);
        assert_eq!(data.daily_spending.len(), 1);

        // Both records still participate in category shares
        let names: Vec<&str> = data.expense_categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![FOOD_AND_DINING, TRANSPORTATION]);
        let pct_sum: f64 = data.expense_categories.iter().map(|c| c.value).sum();
        assert!((pct_sum - 100.0).abs() < 1e-9);

        // And the sorted list keeps every record
        assert_eq!(data.transactions.len(), 2);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let batch = vec![
            sample(-500.0, "2024-01-05", "Zomato order"),
            sample(2000.0, "2024-01-10", "Salary credit"),
            sample(-230.0, "2024-02-03", "Uber trip"),
        ];

        let first = aggregate(&batch, &rules());
        let second = aggregate(&batch, &rules());

        assert_eq!(first.monthly_spending, second.monthly_spending);
        assert_eq!(first.expense_categories, second.expense_categories);
        assert_eq!(first.daily_spending, second.daily_spending);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_classifier_runs_inside_aggregation() {
        let batch = vec![sample(-15000.0, "2024-01-01", "Landlord transfer")];
        let data = aggregate(&batch, &rules());
        assert_eq!(data.expense_categories[0].name, "Rent");
    }
}
