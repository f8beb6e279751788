use crate::period::month_of;
use crate::schema::{AppId, Country, DailyRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// All daily records currently in scope, one vec per (app, country) pair.
/// Built by the store adapter; every aggregation below groups over it.
pub type RecordsByScope = BTreeMap<(AppId, Country), Vec<DailyRecord>>;

/// Summed and derived metrics for one scope (a country, an app, or the
/// whole dataset) over one period. Derived ratios are computed from the
/// aggregated sums, never averaged per record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AggregateMetrics {
    pub revenue: f64,
    pub spend: f64,
    pub trials: f64,
    pub subscribers: f64,
    pub installs: f64,
    pub cost_per_trial: f64,
    pub profit: f64,
    pub conversion_rate: f64,
}

impl AggregateMetrics {
    /// Return on ad spend as a percentage. 0 when nothing was spent.
    pub fn roi(&self) -> f64 {
        if self.spend == 0.0 {
            0.0
        } else {
            (self.revenue - self.spend) / self.spend * 100.0
        }
    }
}

/// Sums one or more record sets into a single metrics block.
///
/// The caller decides what the sets mean (both apps for one country, one app
/// across countries, everything); this function is group-agnostic. Missing
/// and non-numeric fields were already coerced to 0 at deserialization, so
/// summation is total and never errors.
pub fn aggregate<'a, I>(record_sets: I) -> AggregateMetrics
where
    I: IntoIterator<Item = &'a [DailyRecord]>,
{
    let mut m = AggregateMetrics::default();

    for records in record_sets {
        for record in records {
            m.revenue += record.revenue();
            m.spend += record.spend;
            m.trials += record.trials;
            m.subscribers += record.new_subscribers;
            m.installs += record.installs;
        }
    }

    // Ratios from totals. spend/trials averaged per day would weight a
    // low-volume day the same as a high-volume one.
    m.cost_per_trial = if m.trials > 0.0 { m.spend / m.trials } else { 0.0 };
    m.profit = m.revenue - m.spend;
    m.conversion_rate = if m.trials > 0.0 {
        m.subscribers / m.trials * 100.0
    } else {
        0.0
    };

    m
}

/// One aggregation per group, where the group of a record set is decided by
/// the key function. Scopes mapping to `None` are skipped. `by_country`,
/// `by_app`, and the global rollup are all this function with a different key.
pub fn aggregate_by<K, F>(data: &RecordsByScope, key: F) -> BTreeMap<K, AggregateMetrics>
where
    K: Ord,
    F: Fn(AppId, Country) -> Option<K>,
{
    let mut groups: BTreeMap<K, Vec<&[DailyRecord]>> = BTreeMap::new();
    for ((app, country), records) in data {
        if let Some(k) = key(*app, *country) {
            groups.entry(k).or_default().push(records.as_slice());
        }
    }

    groups
        .into_iter()
        .map(|(k, sets)| (k, aggregate(sets.iter().copied())))
        .collect()
}

/// Both apps summed together, one entry per country.
pub fn aggregate_by_country(data: &RecordsByScope) -> BTreeMap<Country, AggregateMetrics> {
    aggregate_by(data, |_, country| Some(country))
}

/// All countries summed together, one entry per app.
pub fn aggregate_by_app(data: &RecordsByScope) -> BTreeMap<AppId, AggregateMetrics> {
    aggregate_by(data, |app, _| Some(app))
}

/// Everything in scope summed into one block.
pub fn aggregate_global(data: &RecordsByScope) -> AggregateMetrics {
    aggregate(data.values().map(|v| v.as_slice()))
}

/// The country with the highest revenue. Ties go to whichever comes first
/// in the fixed `BR, US, CA, GB, AU` order.
pub fn top_region(by_country: &BTreeMap<Country, AggregateMetrics>) -> Country {
    let mut best = Country::ALL[0];
    let mut best_revenue = by_country.get(&best).map_or(0.0, |m| m.revenue);

    for country in Country::ALL.iter().skip(1) {
        let revenue = by_country.get(country).map_or(0.0, |m| m.revenue);
        if revenue > best_revenue {
            best = *country;
            best_revenue = revenue;
        }
    }

    best
}

/// One point of the monthly evolution chart.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TrendPoint {
    pub revenue: f64,
    pub spend: f64,
    pub profit: f64,
}

/// Revenue, spend, and profit bucketed by calendar month across every scope,
/// in ascending month order. Records without a usable date are skipped here;
/// they still count in the non-bucketed aggregates.
pub fn monthly_trend(data: &RecordsByScope) -> BTreeMap<String, TrendPoint> {
    let mut buckets: BTreeMap<String, TrendPoint> = BTreeMap::new();

    for records in data.values() {
        for record in records {
            let Some(month) = month_of(&record.date) else {
                continue;
            };
            let point = buckets.entry(month.to_string()).or_default();
            let revenue = record.revenue();
            point.revenue += revenue;
            point.spend += record.spend;
            point.profit += revenue - record.spend;
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoped(entries: Vec<(AppId, Country, Vec<DailyRecord>)>) -> RecordsByScope {
        entries
            .into_iter()
            .map(|(app, country, records)| ((app, country), records))
            .collect()
    }

    fn record(date: &str, spend: f64, trials: f64, subs: f64, apple: f64, android: f64) -> DailyRecord {
        DailyRecord {
            date: date.to_string(),
            spend,
            trials,
            new_subscribers: subs,
            revenue_apple: apple,
            revenue_android: android,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_record_scenario() {
        let records = vec![record("2025-01-01", 100.0, 10.0, 2.0, 50.0, 80.0)];
        let m = aggregate([records.as_slice()]);

        assert_eq!(m.revenue, 130.0);
        assert_eq!(m.spend, 100.0);
        assert_eq!(m.profit, 30.0);
        assert_eq!(m.cost_per_trial, 10.0);
        assert_eq!(m.conversion_rate, 20.0);
    }

    #[test]
    fn test_empty_set_is_all_zeros() {
        let empty: Vec<DailyRecord> = Vec::new();
        let m = aggregate([empty.as_slice()]);
        assert_eq!(m, AggregateMetrics::default());
        assert_eq!(m.cost_per_trial, 0.0);
        assert_eq!(m.conversion_rate, 0.0);
    }

    #[test]
    fn test_profit_identity() {
        let records = vec![
            record("2025-01-01", 40.0, 3.0, 1.0, 10.0, 25.0),
            record("2025-01-02", 60.0, 7.0, 2.0, 30.0, 55.0),
        ];
        let m = aggregate([records.as_slice()]);
        assert_eq!(m.profit, m.revenue - m.spend);
    }

    #[test]
    fn test_ratios_from_totals_not_daily_averages() {
        // Day one: 100 spent for a single trial. Day two: 9 free trials.
        // Total CPT is 10; the average of daily CPTs would be 50.
        let records = vec![
            record("2025-01-01", 100.0, 1.0, 0.0, 0.0, 0.0),
            record("2025-01-02", 0.0, 9.0, 0.0, 0.0, 0.0),
        ];
        let m = aggregate([records.as_slice()]);
        assert_eq!(m.cost_per_trial, 10.0);
    }

    #[test]
    fn test_multiple_sets_sum_together() {
        let talk = vec![record("2025-01-01", 50.0, 5.0, 1.0, 20.0, 0.0)];
        let tv = vec![record("2025-01-01", 50.0, 5.0, 1.0, 0.0, 30.0)];
        let m = aggregate([talk.as_slice(), tv.as_slice()]);
        assert_eq!(m.spend, 100.0);
        assert_eq!(m.revenue, 50.0);
        assert_eq!(m.trials, 10.0);
    }

    #[test]
    fn test_grouping_by_country_merges_apps() {
        let data = scoped(vec![
            (
                AppId::DivineTalk,
                Country::US,
                vec![record("2025-01-01", 10.0, 2.0, 1.0, 5.0, 0.0)],
            ),
            (
                AppId::DivineTv,
                Country::US,
                vec![record("2025-01-01", 20.0, 4.0, 1.0, 0.0, 15.0)],
            ),
            (
                AppId::DivineTalk,
                Country::BR,
                vec![record("2025-01-01", 7.0, 1.0, 0.0, 3.0, 0.0)],
            ),
        ]);

        let by_country = aggregate_by_country(&data);
        assert_eq!(by_country[&Country::US].spend, 30.0);
        assert_eq!(by_country[&Country::US].trials, 6.0);
        assert_eq!(by_country[&Country::BR].spend, 7.0);

        let by_app = aggregate_by_app(&data);
        assert_eq!(by_app[&AppId::DivineTalk].spend, 17.0);
        assert_eq!(by_app[&AppId::DivineTv].spend, 20.0);

        let global = aggregate_global(&data);
        assert_eq!(global.spend, 37.0);
    }

    #[test]
    fn test_top_region_tie_goes_to_list_order() {
        let mut by_country = BTreeMap::new();
        by_country.insert(
            Country::US,
            AggregateMetrics {
                revenue: 100.0,
                ..Default::default()
            },
        );
        by_country.insert(
            Country::CA,
            AggregateMetrics {
                revenue: 100.0,
                ..Default::default()
            },
        );
        // US precedes CA in the fixed order, so it wins the tie.
        assert_eq!(top_region(&by_country), Country::US);
    }

    #[test]
    fn test_top_region_empty_defaults_to_home() {
        assert_eq!(top_region(&BTreeMap::new()), Country::BR);
    }

    #[test]
    fn test_roi_guards_zero_spend() {
        let m = AggregateMetrics {
            revenue: 500.0,
            spend: 0.0,
            ..Default::default()
        };
        assert_eq!(m.roi(), 0.0);

        let m = AggregateMetrics {
            revenue: 150.0,
            spend: 100.0,
            ..Default::default()
        };
        assert_eq!(m.roi(), 50.0);
    }

    #[test]
    fn test_monthly_trend_buckets() {
        let data = scoped(vec![(
            AppId::DivineTalk,
            Country::BR,
            vec![
                record("2025-01-01", 10.0, 0.0, 0.0, 30.0, 0.0),
                record("2025-01-15", 5.0, 0.0, 0.0, 10.0, 0.0),
                record("2025-02-01", 20.0, 0.0, 0.0, 25.0, 0.0),
                record("bogus", 99.0, 0.0, 0.0, 99.0, 0.0),
            ],
        )]);

        let trend = monthly_trend(&data);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend["2025-01"].spend, 15.0);
        assert_eq!(trend["2025-01"].revenue, 40.0);
        assert_eq!(trend["2025-01"].profit, 25.0);
        assert_eq!(trend["2025-02"].profit, 5.0);
    }
}
