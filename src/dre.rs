use crate::aggregate::AggregateMetrics;
use crate::schema::{CardEntry, Country, FixedCost, Payable, PayableStatus, VariableCost};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// Configured conversion rate applied to ad spend recorded outside the home
/// market. A static configuration value, not a live-rate lookup.
pub const USD_TO_BRL_RATE: f64 = 5.0;

/// Flat tax charged on gross revenue.
pub const REVENUE_TAX_RATE: f64 = 0.06;

/// Budget target assumed for a month that has none stored.
pub const DEFAULT_MONTHLY_BUDGET: f64 = 20_000.0;

/// How far into the monthly budget the expenses have eaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BudgetStatus {
    OnTrack,
    Warning,
    Critical,
}

impl BudgetStatus {
    /// Band policy: under 80% is fine, 80–95% is a warning, 95% and up is
    /// critical. The UI maps these to colors; the bands themselves are a
    /// business rule.
    pub fn classify(percent_used: f64) -> BudgetStatus {
        if percent_used < 80.0 {
            BudgetStatus::OnTrack
        } else if percent_used < 95.0 {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Critical
        }
    }
}

/// The month's income-statement rollup: budget consumption on one side,
/// the gross-to-net profit chain on the other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DreResult {
    pub month: String,
    pub budget: f64,

    pub total_fixed: f64,
    pub total_variable: f64,
    pub total_card: f64,
    /// Outstanding (Pendente) payables. Tracked for visibility but NOT part
    /// of `total_expense`.
    pub total_payables_pending: f64,

    pub total_expense: f64,
    pub remaining: f64,
    pub percent_used: f64,
    pub status: BudgetStatus,

    pub total_revenue: f64,
    /// All countries' ad spend expressed in the home currency.
    pub total_ad_spend_brl: f64,
    pub gross_profit: f64,
    pub tax: f64,
    pub net_profit: f64,
}

/// Computes the DRE for one month.
///
/// `ad_spend_by_country` carries the already-aggregated per-country metrics
/// for the month (both apps summed). Home-market spend is used as-is; every
/// other market's spend is converted at [`USD_TO_BRL_RATE`] before entering
/// the total.
///
/// Card-statement spend counts toward budget consumption but is deliberately
/// absent from the net-profit chain; it funds the fixed/variable categories
/// separately in the source accounting model.
pub fn compute_dre(
    month: &str,
    budget: f64,
    ad_spend_by_country: &BTreeMap<Country, AggregateMetrics>,
    fixed_costs: &[FixedCost],
    variable_costs: &[VariableCost],
    card_statement: &[CardEntry],
    payables: &[Payable],
) -> DreResult {
    let budget = budget.max(0.0);

    let mut total_revenue = 0.0;
    let mut total_ad_spend_brl = 0.0;
    for (country, metrics) in ad_spend_by_country {
        total_revenue += metrics.revenue;
        total_ad_spend_brl += if *country == Country::HOME {
            metrics.spend
        } else {
            metrics.spend * USD_TO_BRL_RATE
        };
    }

    let total_fixed: f64 = fixed_costs.iter().map(|c| c.valor).sum();
    let total_variable: f64 = variable_costs.iter().map(|c| c.valor).sum();
    let total_card: f64 = card_statement.iter().map(|c| c.valor).sum();
    let total_payables_pending: f64 = payables
        .iter()
        .filter(|p| p.status == PayableStatus::Pendente)
        .map(|p| p.valor)
        .sum();

    let total_expense = total_fixed + total_variable + total_card;
    let remaining = budget - total_expense;
    let percent_used = if budget > 0.0 {
        total_expense / budget * 100.0
    } else {
        0.0
    };

    let gross_profit = total_revenue - total_ad_spend_brl;
    let tax = total_revenue * REVENUE_TAX_RATE;
    let net_profit = gross_profit - total_fixed - total_variable - tax;

    debug!(
        "DRE {}: expense {:.2} of budget {:.2} ({:.1}%), net profit {:.2}",
        month, total_expense, budget, percent_used, net_profit
    );

    DreResult {
        month: month.to_string(),
        budget,
        total_fixed,
        total_variable,
        total_card,
        total_payables_pending,
        total_expense,
        remaining,
        percent_used,
        status: BudgetStatus::classify(percent_used),
        total_revenue,
        total_ad_spend_brl,
        gross_profit,
        tax,
        net_profit,
    }
}
