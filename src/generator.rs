use crate::error::Result;
use crate::schema::{
    AppId, CardEntry, Country, DailyRecord, ExpenseCategory, FixedCost, Payable, PayableStatus,
    VariableCost,
};
use crate::store::{
    set_budget, set_card_entries, set_daily_records, set_fixed_costs, set_payables,
    set_variable_costs, RecordStore,
};
use chrono::{Datelike, NaiveDate};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Shape of the generated dataset. Defaults mirror the browser console
/// script: three months of ten active days each, and a 15000 budget.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorConfig {
    pub months: u32,
    pub days_per_month: u32,
    pub budget: f64,
    /// Relative jitter applied to revenue figures, 0 disables it.
    pub revenue_noise: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            months: 3,
            days_per_month: 10,
            budget: 15_000.0,
            revenue_noise: 0.05,
            seed: 0,
        }
    }
}

/// Bigger markets produce proportionally bigger numbers across the board.
fn country_multiplier(country: Country) -> f64 {
    match country {
        Country::BR => 1.5,
        Country::US => 1.0,
        Country::CA => 0.8,
        Country::GB => 0.7,
        Country::AU => 0.6,
    }
}

/// Populates the store with plausible daily records for every app and
/// country, ending in the month of `anchor`, plus a budget for each
/// generated month. Deterministic for a given config.
pub fn generate_sample_data<S>(store: &mut S, anchor: NaiveDate, config: &GeneratorConfig) -> Result<()>
where
    S: RecordStore + ?Sized,
{
    let mut rng = StdRng::seed_from_u64(config.seed);
    let months = month_starts_ending_at(anchor, config.months);

    for app in AppId::ALL {
        for country in Country::ALL {
            let mut records = Vec::new();
            for month in &months {
                for day in 1..=config.days_per_month {
                    let date = NaiveDate::from_ymd_opt(month.year(), month.month(), day)
                        .unwrap_or(*month);
                    records.push(sample_day(&mut rng, date, country, config.revenue_noise));
                }
            }
            set_daily_records(store, app, country, &records)?;
            info!(
                "Generated {} sample records for {}_{}",
                records.len(),
                app,
                country
            );
        }
    }

    for month in &months {
        set_budget(store, &month.format("%Y-%m").to_string(), config.budget);
    }

    Ok(())
}

fn sample_day(rng: &mut StdRng, date: NaiveDate, country: Country, noise: f64) -> DailyRecord {
    let multiplier = country_multiplier(country);

    let spend = (rng.gen_range(200.0..700.0) * multiplier).round();
    let installs = (rng.gen_range(50.0..150.0) * multiplier).round();
    // Funnel-consistent counts: roughly 30-50% of installs trial,
    // 15-25% of trials convert.
    let trials = (installs * rng.gen_range(0.3..0.5)).round();
    let subscribers = (trials * rng.gen_range(0.15..0.25)).round();

    let mut revenue_apple = rng.gen_range(400.0..1200.0) * multiplier;
    let mut revenue_android = rng.gen_range(300.0..900.0) * multiplier;
    if noise > 0.0 {
        if let Ok(normal) = Normal::new(0.0, noise) {
            revenue_apple *= 1.0 + normal.sample(rng);
            revenue_android *= 1.0 + normal.sample(rng);
        }
    }

    DailyRecord {
        date: date.format("%Y-%m-%d").to_string(),
        spend,
        installs,
        trials,
        new_subscribers: subscribers,
        revenue_apple: revenue_apple.round(),
        revenue_android: revenue_android.round(),
    }
}

fn month_starts_ending_at(anchor: NaiveDate, count: u32) -> Vec<NaiveDate> {
    let mut months = Vec::with_capacity(count as usize);
    let mut year = anchor.year();
    let mut month = anchor.month();

    for _ in 0..count {
        months.push(NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(anchor));
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }

    months.reverse();
    months
}

/// Writes a fixed, representative financial month: a handful of payables in
/// both statuses, the usual fixed costs, and categorized variable/card spend.
pub fn seed_sample_financial_month<S>(store: &mut S, month: &str) -> Result<()>
where
    S: RecordStore + ?Sized,
{
    let day = |d: u32| format!("{month}-{d:02}");

    set_payables(
        store,
        month,
        &[
            payable(&day(5), "Aluguel Escritório", 3500.0, PayableStatus::Pago),
            payable(&day(10), "Fornecedor de TI", 2800.0, PayableStatus::Pendente),
            payable(&day(15), "Energia Elétrica", 450.0, PayableStatus::Pendente),
            payable(&day(20), "Internet Empresarial", 300.0, PayableStatus::Pago),
            payable(&day(25), "Contador", 1200.0, PayableStatus::Pendente),
        ],
    )?;

    set_fixed_costs(
        store,
        month,
        &[
            fixed("Salários", 25_000.0),
            fixed("Aluguel", 3500.0),
            fixed("Seguros", 800.0),
            fixed("Software & Licenças", 1500.0),
        ],
    )?;

    set_variable_costs(
        store,
        month,
        &[
            variable(&day(3), "Google Ads", 4500.0, ExpenseCategory::Marketing),
            variable(&day(5), "Facebook Ads", 3200.0, ExpenseCategory::Marketing),
            variable(&day(10), "Freelancer Design", 1800.0, ExpenseCategory::Operacional),
            variable(&day(12), "AWS Cloud", 950.0, ExpenseCategory::Tecnologia),
            variable(&day(15), "Consultoria", 2500.0, ExpenseCategory::Outros),
        ],
    )?;

    set_card_entries(
        store,
        month,
        &[
            card(&day(2), "Notion Pro", 48.0, ExpenseCategory::Tecnologia),
            card(&day(6), "Almoço Cliente", 180.0, ExpenseCategory::Operacional),
            card(&day(11), "Canva Pro", 55.0, ExpenseCategory::Marketing),
            card(&day(13), "Domínios", 120.0, ExpenseCategory::Tecnologia),
        ],
    )?;

    Ok(())
}

fn payable(vencimento: &str, descricao: &str, valor: f64, status: PayableStatus) -> Payable {
    Payable {
        vencimento: vencimento.to_string(),
        descricao: descricao.to_string(),
        valor,
        status,
    }
}

fn fixed(descricao: &str, valor: f64) -> FixedCost {
    FixedCost {
        descricao: descricao.to_string(),
        valor,
    }
}

fn variable(data: &str, descricao: &str, valor: f64, categoria: ExpenseCategory) -> VariableCost {
    VariableCost {
        data: data.to_string(),
        descricao: descricao.to_string(),
        valor,
        categoria,
    }
}

fn card(data: &str, descricao: &str, valor: f64, categoria: ExpenseCategory) -> CardEntry {
    CardEntry {
        data: data.to_string(),
        descricao: descricao.to_string(),
        valor,
        categoria,
    }
}
