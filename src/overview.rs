use crate::aggregate::{
    aggregate_by_app, aggregate_by_country, aggregate_global, monthly_trend, top_region,
    AggregateMetrics, TrendPoint,
};
use crate::dre::{compute_dre, DreResult, REVENUE_TAX_RATE};
use crate::error::Result;
use crate::period::{available_periods, Period};
use crate::schema::{AppId, Country};
use crate::store::{self, RecordStore};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;

/// The complete, immutable view selection. The browser build kept these as
/// ambient globals mutated by event handlers; here the presentation layer
/// threads one of these through every call and the core stays stateless.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub period: Period,
    /// Restrict to a single app, or `None` for both.
    pub app_filter: Option<AppId>,
}

impl ViewState {
    pub fn all_time() -> Self {
        Self {
            period: Period::All,
            app_filter: None,
        }
    }

    pub fn month(month: &str) -> Self {
        Self {
            period: Period::Month(month.to_string()),
            app_filter: None,
        }
    }

    fn apps(&self) -> Vec<AppId> {
        match self.app_filter {
            Some(app) => vec![app],
            None => AppId::ALL.to_vec(),
        }
    }
}

/// Which series a comparison chart is plotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartMetric {
    Revenue,
    Trials,
    CostPerTrial,
    Profit,
}

impl ChartMetric {
    /// Dropdown/button value convention of the dashboard markup.
    pub fn parse(value: &str) -> Option<ChartMetric> {
        match value {
            "revenue" => Some(ChartMetric::Revenue),
            "trials" => Some(ChartMetric::Trials),
            "cpt" => Some(ChartMetric::CostPerTrial),
            "profit" => Some(ChartMetric::Profit),
            _ => None,
        }
    }

    pub fn select(&self, metrics: &AggregateMetrics) -> f64 {
        match self {
            ChartMetric::Revenue => metrics.revenue,
            ChartMetric::Trials => metrics.trials,
            ChartMetric::CostPerTrial => metrics.cost_per_trial,
            ChartMetric::Profit => metrics.profit,
        }
    }
}

/// Everything the overview screen needs for one view selection, computed in
/// one pass over the store. Re-running with unchanged inputs yields identical
/// output; nothing is cached.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub view: ViewState,
    pub by_country: BTreeMap<Country, AggregateMetrics>,
    pub by_app: BTreeMap<AppId, AggregateMetrics>,
    pub global: AggregateMetrics,
    pub top_region: Country,
    pub roi_by_country: BTreeMap<Country, f64>,
    pub trend: BTreeMap<String, TrendPoint>,
    /// The flat revenue tax owed on the period's gross revenue.
    pub tax_on_revenue: f64,
    pub dre: DreResult,
    /// Months present in storage, newest first, for the period dropdowns.
    /// Always derived from the full dataset, not the filtered view.
    pub available_periods: Vec<String>,
}

impl DashboardOverview {
    pub fn compute<S>(store: &S, view: &ViewState) -> Result<DashboardOverview>
    where
        S: RecordStore + ?Sized,
    {
        info!("Computing dashboard overview for period {}", view.period);

        let apps = view.apps();
        let data = store::load_scope(store, &apps, &view.period)?;

        let by_country = aggregate_by_country(&data);
        let by_app = aggregate_by_app(&data);
        let global = aggregate_global(&data);
        let top_region = top_region(&by_country);
        let roi_by_country = by_country
            .iter()
            .map(|(country, metrics)| (*country, metrics.roi()))
            .collect();
        let trend = monthly_trend(&data);
        let tax_on_revenue = global.revenue * REVENUE_TAX_RATE;

        // Ledger keys are month-scoped, so the "all time" view reads no
        // ledgers and the DRE degrades to a budget-only statement.
        let month = view.period.to_string();
        let dre = compute_dre(
            &month,
            store::budget(store, &month),
            &by_country,
            &store::fixed_costs(store, &month)?,
            &store::variable_costs(store, &month)?,
            &store::card_entries(store, &month)?,
            &store::payables(store, &month)?,
        );

        let full = store::load_scope(store, &AppId::ALL, &Period::All)?;
        let available_periods = available_periods(full.values().map(|v| v.as_slice()));

        debug!(
            "Overview: {} records in scope, top region {}, global revenue {:.2}",
            data.values().map(|v| v.len()).sum::<usize>(),
            top_region,
            global.revenue
        );

        Ok(DashboardOverview {
            view: view.clone(),
            by_country,
            by_app,
            global,
            top_region,
            roi_by_country,
            trend,
            tax_on_revenue,
            dre,
            available_periods,
        })
    }
}
