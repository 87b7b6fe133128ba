// 🧮 Financial Calculators - Closed-Form Widgets
// SIP future value, old/new regime income-tax comparison, and the savings
// goal progress helpers. All pure arithmetic; figures in rupees.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Old regime deduction caps
const SECTION_80C_CAP: f64 = 150_000.0;
const SECTION_80D_CAP: f64 = 50_000.0;
const HOUSING_LOAN_CAP: f64 = 200_000.0;

// Health & education cess applied to the computed tax in both regimes
const CESS_RATE: f64 = 0.04;

// ============================================================================
// SIP CALCULATOR
// ============================================================================

/// Future value of a monthly SIP: `M × [((1+r)^n − 1) / r] × (1+r)` where
/// `r` is the monthly rate and `n` the number of months. Rounded to the
/// nearest rupee. A zero rate degenerates to plain accumulation so the
/// division never produces NaN.
pub fn sip_future_value(monthly_amount: f64, annual_rate_pct: f64, years: u32) -> f64 {
    let monthly_rate = annual_rate_pct / 100.0 / 12.0;
    let months = (years * 12) as f64;

    if monthly_rate == 0.0 {
        return (monthly_amount * months).round();
    }

    let amount = monthly_amount
        * (((1.0 + monthly_rate).powf(months) - 1.0) / monthly_rate)
        * (1.0 + monthly_rate);
    amount.round()
}

// ============================================================================
// TAX PLANNER
// ============================================================================

/// Deduction claims considered under the old regime. Each is capped at its
/// statutory limit before subtraction.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Deductions {
    /// Section 80C investments (cap 1.5L)
    #[serde(default)]
    pub section_80c: f64,

    /// Section 80D health premiums (cap 50k)
    #[serde(default)]
    pub section_80d: f64,

    /// Housing loan interest (cap 2L)
    #[serde(default)]
    pub housing_loan_interest: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    Old,
    New,
}

/// Both regime figures for one income, with the cheaper regime called out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxComparison {
    pub old_regime_tax: f64,
    pub new_regime_tax: f64,
    pub recommended: TaxRegime,
    pub savings: f64,
}

/// Old regime: deductions capped and subtracted, then the 2.5L/5L/10L slab
/// ladder at 5/20/30% with fixed slab bases, plus 4% cess. Rounded.
pub fn old_regime_tax(income: f64, deductions: Deductions) -> f64 {
    let taxable = income
        - deductions.section_80c.min(SECTION_80C_CAP)
        - deductions.section_80d.min(SECTION_80D_CAP)
        - deductions.housing_loan_interest.min(HOUSING_LOAN_CAP);

    let tax = if taxable > 1_000_000.0 {
        112_500.0 + (taxable - 1_000_000.0) * 0.30
    } else if taxable > 500_000.0 {
        12_500.0 + (taxable - 500_000.0) * 0.20
    } else if taxable > 250_000.0 {
        (taxable - 250_000.0) * 0.05
    } else {
        0.0
    };

    (tax * (1.0 + CESS_RATE)).round()
}

/// New regime: no deductions, the 3L..15L slab ladder at 5..30% with fixed
/// slab bases, plus 4% cess. Rounded.
pub fn new_regime_tax(income: f64) -> f64 {
    let taxable = income;

    let tax = if taxable > 1_500_000.0 {
        187_500.0 + (taxable - 1_500_000.0) * 0.30
    } else if taxable > 1_250_000.0 {
        125_000.0 + (taxable - 1_250_000.0) * 0.25
    } else if taxable > 1_000_000.0 {
        75_000.0 + (taxable - 1_000_000.0) * 0.20
    } else if taxable > 750_000.0 {
        37_500.0 + (taxable - 750_000.0) * 0.15
    } else if taxable > 500_000.0 {
        12_500.0 + (taxable - 500_000.0) * 0.10
    } else if taxable > 300_000.0 {
        (taxable - 300_000.0) * 0.05
    } else {
        0.0
    };

    (tax * (1.0 + CESS_RATE)).round()
}

/// Run both regimes and pick the cheaper one. Ties recommend the new
/// regime.
pub fn compare_regimes(income: f64, deductions: Deductions) -> TaxComparison {
    let old_tax = old_regime_tax(income, deductions);
    let new_tax = new_regime_tax(income);

    let recommended = if old_tax < new_tax {
        TaxRegime::Old
    } else {
        TaxRegime::New
    };

    TaxComparison {
        old_regime_tax: old_tax,
        new_regime_tax: new_tax,
        recommended,
        savings: (old_tax - new_tax).abs(),
    }
}

// ============================================================================
// GOAL HELPERS
// ============================================================================

/// Percentage of a goal reached, rounded and clamped to 100. Non-positive
/// targets report 0 rather than dividing by zero.
pub fn goal_progress_percent(current: f64, target: f64) -> u8 {
    if target <= 0.0 {
        return 0;
    }
    ((current / target * 100.0).round() as u8).min(100)
}

/// Human-readable time remaining until a goal's target date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "count")]
pub enum TimeLeft {
    Overdue,
    Today,
    Tomorrow,
    Days(i64),
    Months(i64),
    Years(i64),
}

impl TimeLeft {
    pub fn label(&self) -> String {
        match self {
            TimeLeft::Overdue => "Overdue".to_string(),
            TimeLeft::Today => "Today".to_string(),
            TimeLeft::Tomorrow => "Tomorrow".to_string(),
            TimeLeft::Days(n) => format!("{} days left", n),
            TimeLeft::Months(n) => format!("{} months left", n),
            TimeLeft::Years(n) => format!("{} years left", n),
        }
    }
}

/// Bucket the distance to `target` the way the goals widget displays it:
/// day-precise inside a month, then months, then years.
pub fn time_left(target: NaiveDate, today: NaiveDate) -> TimeLeft {
    let diff_days = (target - today).num_days();

    match diff_days {
        d if d < 0 => TimeLeft::Overdue,
        0 => TimeLeft::Today,
        1 => TimeLeft::Tomorrow,
        d if d < 30 => TimeLeft::Days(d),
        d if d < 365 => TimeLeft::Months(d / 30),
        d => TimeLeft::Years(d / 365),
    }
}

// ============================================================================
// TESTS
// ============================================================================
