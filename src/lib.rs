// FinWise Core - Financial Assistant Data Engine
// Exposes all modules for use in the CLI, API server, and tests

pub mod transaction;
pub mod classify;
pub mod aggregate;
pub mod calculators;
pub mod game;
pub mod store;

// Re-export commonly used types
pub use transaction::Transaction;
pub use classify::{CategoryRule, CategoryRuleSet, RuleMatcher};
pub use aggregate::{aggregate, CategoryShare, DashboardData, TimeBucket};
pub use calculators::{
    compare_regimes, goal_progress_percent, new_regime_tax, old_regime_tax, sip_future_value,
    time_left, Deductions, TaxComparison, TaxRegime, TimeLeft,
};
pub use game::{
    Achievement, ContributionOutcome, PlayerProfile, SavingsGame, SavingsGoal,
};
pub use store::{
    get_all_transactions, insert_transactions, load_csv, load_json, setup_database,
    verify_count, ImportSummary,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
