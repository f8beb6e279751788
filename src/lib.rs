//! # Divine Sales Core
//!
//! The metrics aggregation and derivation engine behind a multi-regional
//! sales dashboard for two mobile apps across five country markets.
//!
//! ## Core Concepts
//!
//! - **Daily records**: flat per-day rows (spend, installs, trials, new
//!   subscribers, store revenue) stored per `{app}_{country}` key
//! - **Period filter**: lexical `YYYY-MM` narrowing, or "all time"
//! - **Aggregation**: sums per country, per app, or global, with ratios
//!   (cost per trial, conversion, ROI) derived from the totals
//! - **DRE rollup**: the month's budget consumption and gross-to-net profit
//!   chain over the four expense ledgers
//! - **Unit economics**: a standalone what-if model (LTV, max acquisition
//!   costs, funnel targets, investment simulation)
//!
//! The presentation layer and the durable key-value store are collaborators
//! on the other side of the [`store::RecordStore`] trait; everything in here
//! is a pure, total function of its inputs.
//!
//! ## Example
//!
//! ```rust,ignore
//! use divine_sales_core::*;
//!
//! let mut store = MemoryStore::new();
//! // ... presentation layer writes records through the store adapter ...
//!
//! let view = ViewState::month("2025-01");
//! let overview = DashboardOverview::compute(&store, &view)?;
//! println!("top region: {}", overview.top_region);
//! println!("net profit: {:.2}", overview.dre.net_profit);
//! ```

pub mod aggregate;
pub mod dre;
pub mod error;
pub mod generator;
pub mod overview;
pub mod period;
pub mod schema;
pub mod store;
pub mod unit_economics;

pub use aggregate::{
    aggregate, aggregate_by, aggregate_by_app, aggregate_by_country, aggregate_global,
    monthly_trend, top_region, AggregateMetrics, RecordsByScope, TrendPoint,
};
pub use dre::{
    compute_dre, BudgetStatus, DreResult, DEFAULT_MONTHLY_BUDGET, REVENUE_TAX_RATE,
    USD_TO_BRL_RATE,
};
pub use error::{DashboardError, Result};
pub use generator::{generate_sample_data, seed_sample_financial_month, GeneratorConfig};
pub use overview::{ChartMetric, DashboardOverview, ViewState};
pub use period::{available_periods, filter_by_period, filter_owned, month_of, Period};
pub use schema::{
    budget_key, ledger_key, record_key, AppId, CardEntry, Country, DailyRecord, ExpenseCategory,
    FixedCost, Ledger, Payable, PayableStatus, VariableCost,
};
pub use store::{MemoryStore, RecordStore};
pub use unit_economics::{
    compute_unit_economics, InvestmentSimulation, Metric, PlanTiers, UnitEconomicsInputs,
    UnitEconomicsOutputs, NET_MARGIN_RATE,
};
