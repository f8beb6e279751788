use crate::aggregate::RecordsByScope;
use crate::dre::DEFAULT_MONTHLY_BUDGET;
use crate::error::Result;
use crate::period::{filter_owned, Period};
use crate::schema::{
    budget_key, ledger_key, record_key, AppId, CardEntry, Country, DailyRecord, FixedCost, Ledger,
    Payable, VariableCost,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

/// The durable key-value collaborator. In the browser build this was
/// `localStorage`; here it is whatever the embedder provides. Reads are
/// synchronous and assumed infallible; a missing key is not an error.
pub trait RecordStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// Plain in-memory store, for tests and self-contained embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

fn get_json<T, S>(store: &S, key: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    match store.get(key) {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

fn set_json<T, S>(store: &mut S, key: &str, rows: &[T]) -> Result<()>
where
    T: Serialize,
    S: RecordStore + ?Sized,
{
    store.set(key, serde_json::to_string(rows)?);
    Ok(())
}

/// Daily records for one app in one country. Missing key → empty.
pub fn daily_records<S>(store: &S, app: AppId, country: Country) -> Result<Vec<DailyRecord>>
where
    S: RecordStore + ?Sized,
{
    get_json(store, &record_key(app, country))
}

pub fn set_daily_records<S>(
    store: &mut S,
    app: AppId,
    country: Country,
    records: &[DailyRecord],
) -> Result<()>
where
    S: RecordStore + ?Sized,
{
    set_json(store, &record_key(app, country), records)
}

/// Loads every (app, country) record set, already narrowed to the period.
/// Scopes with no stored data come back as empty vecs, same as the source.
pub fn load_scope<S>(store: &S, apps: &[AppId], period: &Period) -> Result<RecordsByScope>
where
    S: RecordStore + ?Sized,
{
    let mut data = RecordsByScope::new();
    for app in apps {
        for country in Country::ALL {
            let records = daily_records(store, *app, country)?;
            data.insert((*app, country), filter_owned(&records, period));
        }
    }
    Ok(data)
}

pub fn payables<S: RecordStore + ?Sized>(store: &S, month: &str) -> Result<Vec<Payable>> {
    get_json(store, &ledger_key(Ledger::ContasPagar, month))
}

pub fn fixed_costs<S: RecordStore + ?Sized>(store: &S, month: &str) -> Result<Vec<FixedCost>> {
    get_json(store, &ledger_key(Ledger::CustosFixos, month))
}

pub fn variable_costs<S: RecordStore + ?Sized>(store: &S, month: &str) -> Result<Vec<VariableCost>> {
    get_json(store, &ledger_key(Ledger::CustosVariaveis, month))
}

pub fn card_entries<S: RecordStore + ?Sized>(store: &S, month: &str) -> Result<Vec<CardEntry>> {
    get_json(store, &ledger_key(Ledger::ExtratoCartao, month))
}

pub fn set_payables<S: RecordStore + ?Sized>(store: &mut S, month: &str, rows: &[Payable]) -> Result<()> {
    set_json(store, &ledger_key(Ledger::ContasPagar, month), rows)
}

pub fn set_fixed_costs<S: RecordStore + ?Sized>(store: &mut S, month: &str, rows: &[FixedCost]) -> Result<()> {
    set_json(store, &ledger_key(Ledger::CustosFixos, month), rows)
}

pub fn set_variable_costs<S: RecordStore + ?Sized>(
    store: &mut S,
    month: &str,
    rows: &[VariableCost],
) -> Result<()> {
    set_json(store, &ledger_key(Ledger::CustosVariaveis, month), rows)
}

pub fn set_card_entries<S: RecordStore + ?Sized>(store: &mut S, month: &str, rows: &[CardEntry]) -> Result<()> {
    set_json(store, &ledger_key(Ledger::ExtratoCartao, month), rows)
}

/// The month's budget target. Absent or unparseable → the 20000 default;
/// an explicit stored 0 stays 0.
pub fn budget<S: RecordStore + ?Sized>(store: &S, month: &str) -> f64 {
    store
        .get(&budget_key(month))
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .unwrap_or(DEFAULT_MONTHLY_BUDGET)
        .max(0.0)
}

pub fn set_budget<S: RecordStore + ?Sized>(store: &mut S, month: &str, value: f64) {
    store.set(&budget_key(month), value.max(0.0).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_empty_not_error() {
        let store = MemoryStore::new();
        let records = daily_records(&store, AppId::DivineTalk, Country::BR).unwrap();
        assert!(records.is_empty());
        assert!(payables(&store, "2026-02").unwrap().is_empty());
    }

    #[test]
    fn test_record_round_trip_uses_exact_keys() {
        let mut store = MemoryStore::new();
        let records = vec![DailyRecord {
            date: "2025-01-01".to_string(),
            spend: 100.0,
            ..Default::default()
        }];
        set_daily_records(&mut store, AppId::DivineTv, Country::GB, &records).unwrap();

        assert!(store.get("divinetv_GB").is_some());
        let loaded = daily_records(&store, AppId::DivineTv, Country::GB).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_load_scope_filters_and_fills_gaps() {
        let mut store = MemoryStore::new();
        set_daily_records(
            &mut store,
            AppId::DivineTalk,
            Country::US,
            &[
                DailyRecord {
                    date: "2025-01-05".to_string(),
                    spend: 10.0,
                    ..Default::default()
                },
                DailyRecord {
                    date: "2025-02-05".to_string(),
                    spend: 20.0,
                    ..Default::default()
                },
            ],
        )
        .unwrap();

        let data = load_scope(&store, &AppId::ALL, &Period::parse("2025-01")).unwrap();
        // Every app × country slot exists, populated or not.
        assert_eq!(data.len(), AppId::ALL.len() * Country::ALL.len());
        assert_eq!(data[&(AppId::DivineTalk, Country::US)].len(), 1);
        assert!(data[&(AppId::DivineTv, Country::AU)].is_empty());
    }

    #[test]
    fn test_budget_defaults_and_parses() {
        let mut store = MemoryStore::new();
        assert_eq!(budget(&store, "2026-02"), DEFAULT_MONTHLY_BUDGET);

        set_budget(&mut store, "2026-02", 15000.0);
        assert_eq!(store.get("budget_2026-02").as_deref(), Some("15000"));
        assert_eq!(budget(&store, "2026-02"), 15000.0);

        store.set("budget_2026-03", "garbage".to_string());
        assert_eq!(budget(&store, "2026-03"), DEFAULT_MONTHLY_BUDGET);

        store.set("budget_2026-04", "0".to_string());
        assert_eq!(budget(&store, "2026-04"), 0.0);
    }

    #[test]
    fn test_ledger_round_trips() {
        let mut store = MemoryStore::new();
        let rows = vec![FixedCost {
            descricao: "Aluguel".to_string(),
            valor: 3500.0,
        }];
        set_fixed_costs(&mut store, "2026-02", &rows).unwrap();
        assert!(store.get("financial_custosFixos_2026-02").is_some());
        assert_eq!(fixed_costs(&store, "2026-02").unwrap(), rows);
    }
}
