//! Derived financial figures for the rollup parents (crops and ledgers)
//! plus the predicates the list views filter them by.
//!
//! Everything here is pure arithmetic over already-aggregated sums; the
//! actual SQL aggregation lives in the compute crate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Sign tag attached to net figures for downstream rendering.
/// Computed on the fly, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BalanceSign {
    /// Zero counts as positive: a break-even crop is not a loss.
    Positive,
    Negative,
}

impl BalanceSign {
    pub fn of(value: Decimal) -> Self {
        if value.is_sign_negative() && !value.is_zero() {
            BalanceSign::Negative
        } else {
            BalanceSign::Positive
        }
    }
}

/// Aggregate figures for one crop cycle.
///
/// Per-acre ratios are `None` when the crop has zero acres recorded,
/// rather than faulting on the division.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CropMetrics {
    pub crop_id: i32,
    pub total_expense: Decimal,
    pub total_output: Decimal,
    pub net_profit: Decimal,
    pub expense_per_acre: Option<Decimal>,
    pub output_per_acre: Option<Decimal>,
    pub net_profit_per_acre: Option<Decimal>,
    pub profit_sign: BalanceSign,
}

impl CropMetrics {
    pub fn new(
        crop_id: i32,
        total_expense: Decimal,
        total_output: Decimal,
        total_acres: Decimal,
    ) -> Self {
        let net_profit = total_output - total_expense;
        Self {
            crop_id,
            total_expense,
            total_output,
            net_profit,
            expense_per_acre: total_expense.checked_div(total_acres),
            output_per_acre: total_output.checked_div(total_acres),
            net_profit_per_acre: net_profit.checked_div(total_acres),
            profit_sign: BalanceSign::of(net_profit),
        }
    }
}

/// Aggregate figures for one ledger (a counterparty's running account).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LedgerBalance {
    pub ledger_id: i32,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub net_balance: Decimal,
    pub balance_sign: BalanceSign,
}

impl LedgerBalance {
    pub fn new(ledger_id: i32, total_debit: Decimal, total_credit: Decimal) -> Self {
        let net_balance = total_credit - total_debit;
        Self {
            ledger_id,
            total_debit,
            total_credit,
            net_balance,
            balance_sign: BalanceSign::of(net_balance),
        }
    }
}

/// Crop list filter over the derived figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProfitabilityFilter {
    Profitable,
    Loss,
    Balanced,
}

impl ProfitabilityFilter {
    /// The filter must agree with the displayed figures for the same
    /// row, so it is evaluated on the metrics struct itself.
    pub fn matches(&self, metrics: &CropMetrics) -> bool {
        match self {
            ProfitabilityFilter::Profitable => metrics.total_output > metrics.total_expense,
            ProfitabilityFilter::Loss => metrics.total_output < metrics.total_expense,
            ProfitabilityFilter::Balanced => metrics.total_output == metrics.total_expense,
        }
    }
}

/// Ledger list filter over the running balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BalanceFilter {
    Debt,
    Credit,
    Balanced,
}

impl BalanceFilter {
    pub fn matches(&self, balance: &LedgerBalance) -> bool {
        match self {
            BalanceFilter::Debt => balance.total_debit > balance.total_credit,
            BalanceFilter::Credit => balance.total_debit < balance.total_credit,
            BalanceFilter::Balanced => balance.total_debit == balance.total_credit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    #[test]
    fn crop_metrics_scenario() {
        // Expenses [100, 50], one output of 2 mann at rate 80.
        let metrics = CropMetrics::new(1, dec(150), dec(160), dec(4));
        assert_eq!(metrics.total_expense, dec(150));
        assert_eq!(metrics.total_output, dec(160));
        assert_eq!(metrics.net_profit, dec(10));
        assert_eq!(metrics.profit_sign, BalanceSign::Positive);
        assert_eq!(metrics.expense_per_acre, dec(150).checked_div(dec(4)));
    }

    #[test]
    fn net_profit_identity_is_exact() {
        let metrics = CropMetrics::new(7, Decimal::new(12345, 2), Decimal::new(99999, 2), dec(3));
        assert_eq!(
            metrics.net_profit,
            metrics.total_output - metrics.total_expense
        );
    }

    #[test]
    fn zero_acres_yields_undefined_ratios() {
        let metrics = CropMetrics::new(2, dec(150), dec(160), Decimal::ZERO);
        assert_eq!(metrics.expense_per_acre, None);
        assert_eq!(metrics.output_per_acre, None);
        assert_eq!(metrics.net_profit_per_acre, None);
        // The absolute figures are unaffected.
        assert_eq!(metrics.net_profit, dec(10));
    }

    #[test]
    fn ledger_balance_scenario() {
        // Entries [Debit 500, Debit 200, Credit 300].
        let balance = LedgerBalance::new(5, dec(700), dec(300));
        assert_eq!(balance.net_balance, dec(-400));
        assert_eq!(balance.balance_sign, BalanceSign::Negative);
    }

    #[test]
    fn zero_net_is_tagged_positive() {
        let balance = LedgerBalance::new(5, dec(300), dec(300));
        assert_eq!(balance.balance_sign, BalanceSign::Positive);
    }

    #[test]
    fn profitability_filter_matches_displayed_figures() {
        let profitable = CropMetrics::new(1, dec(150), dec(160), dec(4));
        let loss = CropMetrics::new(2, dec(160), dec(150), dec(4));
        let balanced = CropMetrics::new(3, dec(150), dec(150), dec(4));

        assert!(ProfitabilityFilter::Profitable.matches(&profitable));
        assert!(!ProfitabilityFilter::Profitable.matches(&loss));
        assert!(!ProfitabilityFilter::Profitable.matches(&balanced));
        assert!(ProfitabilityFilter::Loss.matches(&loss));
        assert!(ProfitabilityFilter::Balanced.matches(&balanced));
    }

    #[test]
    fn balance_filter_matches() {
        let debt = LedgerBalance::new(1, dec(700), dec(300));
        let credit = LedgerBalance::new(2, dec(100), dec(300));
        let balanced = LedgerBalance::new(3, dec(300), dec(300));

        assert!(BalanceFilter::Debt.matches(&debt));
        assert!(BalanceFilter::Credit.matches(&credit));
        assert!(BalanceFilter::Balanced.matches(&balanced));
        assert!(!BalanceFilter::Debt.matches(&credit));
    }
}
