// 🏷️ Category Classifier - Rules as Data
// Ordered rule list mapping raw transactions to spending categories.
// First match wins; the generic Income/Expense fallback never misses.

use crate::transaction::Transaction;
use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// Category names produced by the default rule set
pub const TRANSPORTATION: &str = "Transportation";
pub const FOOD_AND_DINING: &str = "Food & Dining";
pub const RENT: &str = "Rent";
pub const SALARY: &str = "Salary";
pub const CASH_WITHDRAWAL: &str = "Cash Withdrawal";
pub const BANK_TRANSFER: &str = "Bank Transfer";
pub const EXPENSE: &str = "Expense";
pub const INCOME: &str = "Income";

// ============================================================================
// RULE DEFINITION
// ============================================================================

/// How a rule inspects a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMatcher {
    /// Case-insensitive substring match on the description;
    /// any one token matching is enough
    DescriptionContains(Vec<String>),

    /// Case-insensitive equality on the purpose code
    PurposeCodeIs(String),
}

impl RuleMatcher {
    pub fn matches(&self, tx: &Transaction) -> bool {
        match self {
            RuleMatcher::DescriptionContains(tokens) => {
                let description = tx.description.to_lowercase();
                tokens
                    .iter()
                    .any(|token| description.contains(&token.to_lowercase()))
            }
            RuleMatcher::PurposeCodeIs(code) => tx
                .purpose_code
                .as_deref()
                .map(|pc| pc.eq_ignore_ascii_case(code))
                .unwrap_or(false),
        }
    }
}

/// One classification rule: a matcher and the category it assigns.
///
/// Rules live in an ordered list and earlier, more specific rules shadow
/// the generic fallback. New rules are appended, never interleaved into
/// control flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    pub matcher: RuleMatcher,
}

impl CategoryRule {
    pub fn description_contains(category: &str, tokens: &[&str]) -> Self {
        CategoryRule {
            category: category.to_string(),
            matcher: RuleMatcher::DescriptionContains(
                tokens.iter().map(|t| t.to_string()).collect(),
            ),
        }
    }

    pub fn purpose_code_is(category: &str, code: &str) -> Self {
        CategoryRule {
            category: category.to_string(),
            matcher: RuleMatcher::PurposeCodeIs(code.to_string()),
        }
    }
}

// ============================================================================
// RULE SET
// ============================================================================

/// Ordered rule list with first-match-wins classification.
///
/// `classify` is total: when no rule matches, the transaction falls through
/// to the sign-based Income/Expense fallback. This is a UI convenience
/// categorizer, not a ground-truth classifier; falling into the generic
/// bucket is a normal outcome, not an error.
#[derive(Debug, Clone)]
pub struct CategoryRuleSet {
    rules: Vec<CategoryRule>,
}

impl CategoryRuleSet {
    /// Create an empty rule set (fallback-only classification)
    pub fn empty() -> Self {
        CategoryRuleSet { rules: Vec::new() }
    }

    /// The stock rule list used by the dashboard
    pub fn with_defaults() -> Self {
        CategoryRuleSet {
            rules: vec![
                CategoryRule::description_contains(TRANSPORTATION, &["ola", "uber"]),
                CategoryRule::description_contains(FOOD_AND_DINING, &["zomato", "swiggy"]),
                CategoryRule::description_contains(RENT, &["landlord"]),
                CategoryRule::description_contains(SALARY, &["salary", "company"]),
                CategoryRule::purpose_code_is(CASH_WITHDRAWAL, "CASH"),
                CategoryRule::purpose_code_is(BANK_TRANSFER, "BKDF"),
            ],
        }
    }

    /// Load a custom rule list from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read rules file: {:?}", path.as_ref()))?;

        let rules: Vec<CategoryRule> =
            serde_json::from_str(&content).context("Failed to parse rules JSON")?;

        Ok(CategoryRuleSet { rules })
    }

    /// Append a rule; later rules only see transactions no earlier rule
    /// claimed
    pub fn push_rule(&mut self, rule: CategoryRule) {
        self.rules.push(rule);
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Map a transaction to a category name. Total: always returns a
    /// category, never fails. Empty descriptions and missing purpose codes
    /// fall through safely to the sign fallback.
    pub fn classify<'a>(&'a self, tx: &Transaction) -> &'a str {
        for rule in &self.rules {
            if rule.matcher.matches(tx) {
                return &rule.category;
            }
        }

        if tx.is_expense() {
            EXPENSE
        } else {
            INCOME
        }
    }
}

impl Default for CategoryRuleSet {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::tests::sample;

    #[test]
    fn test_ride_hailing_tokens() {
        let rules = CategoryRuleSet::with_defaults();
        assert_eq!(rules.classify(&sample(-230.0, "2024-01-05", "UBER trip 4412")), TRANSPORTATION);
        assert_eq!(rules.classify(&sample(-90.0, "2024-01-06", "Ola cabs")), TRANSPORTATION);
    }

    #[test]
    fn test_food_delivery_tokens() {
        let rules = CategoryRuleSet::with_defaults();
        assert_eq!(rules.classify(&sample(-500.0, "2024-01-05", "Zomato order")), FOOD_AND_DINING);
        assert_eq!(rules.classify(&sample(-320.0, "2024-01-07", "SWIGGY*8821")), FOOD_AND_DINING);
    }

    #[test]
    fn test_rent_and_salary() {
        let rules = CategoryRuleSet::with_defaults();
        assert_eq!(rules.classify(&sample(-15000.0, "2024-01-01", "Landlord transfer")), RENT);
        assert_eq!(rules.classify(&sample(2000.0, "2024-01-10", "Salary credit")), SALARY);
        assert_eq!(rules.classify(&sample(45000.0, "2024-01-31", "ACME Company payroll")), SALARY);
    }

    #[test]
    fn test_purpose_code_rules() {
        let rules = CategoryRuleSet::with_defaults();

        let mut tx = sample(-1000.0, "2024-01-12", "ATM");
        tx.purpose_code = Some("CASH".to_string());
        assert_eq!(rules.classify(&tx), CASH_WITHDRAWAL);

        // Feed codes arrive in either case
        tx.purpose_code = Some("cash".to_string());
        assert_eq!(rules.classify(&tx), CASH_WITHDRAWAL);

        tx.purpose_code = Some("BKDF".to_string());
        assert_eq!(rules.classify(&tx), BANK_TRANSFER);
    }

    #[test]
    fn test_sign_fallback_is_total() {
        let rules = CategoryRuleSet::with_defaults();
        assert_eq!(rules.classify(&sample(-42.0, "2024-01-05", "")), EXPENSE);
        assert_eq!(rules.classify(&sample(42.0, "2024-01-05", "")), INCOME);
        // Zero is not an outflow
        assert_eq!(rules.classify(&sample(0.0, "2024-01-05", "")), INCOME);
    }

    #[test]
    fn test_rule_order_shadows_fallback() {
        // A salary narrative on an outflow still classifies as Salary:
        // rule 4 runs before the sign fallback.
        let rules = CategoryRuleSet::with_defaults();
        assert_eq!(rules.classify(&sample(-100.0, "2024-01-05", "salary advance repayment")), SALARY);
    }

    #[test]
    fn test_description_rules_beat_purpose_code() {
        let rules = CategoryRuleSet::with_defaults();
        let mut tx = sample(-700.0, "2024-01-05", "Uber airport");
        tx.purpose_code = Some("CASH".to_string());
        assert_eq!(rules.classify(&tx), TRANSPORTATION);
    }

    #[test]
    fn test_appended_rule_runs_after_defaults() {
        let mut rules = CategoryRuleSet::with_defaults();
        rules.push_rule(CategoryRule::description_contains("Groceries", &["bigbasket"]));

        assert_eq!(rules.classify(&sample(-900.0, "2024-01-05", "BIGBASKET demand")), "Groceries");
        // Defaults still claim their transactions first
        assert_eq!(rules.classify(&sample(-900.0, "2024-01-05", "zomato bigbasket")), FOOD_AND_DINING);
    }

    #[test]
    fn test_empty_rule_set_only_falls_back() {
        let rules = CategoryRuleSet::empty();
        assert_eq!(rules.rule_count(), 0);
        assert_eq!(rules.classify(&sample(-500.0, "2024-01-05", "Zomato order")), EXPENSE);
    }

    #[test]
    fn test_rules_round_trip_through_json() {
        let rules = vec![
            CategoryRule::description_contains("Groceries", &["bigbasket", "dmart"]),
            CategoryRule::purpose_code_is("Cash Withdrawal", "CASH"),
        ];

        let json = serde_json::to_string(&rules).unwrap();
        let parsed: Vec<CategoryRule> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].category, "Groceries");
    }
}
