use crate::error::DashboardError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Country markets tracked by the dashboard, in canonical order.
///
/// The order matters: ranking ties (e.g. top region by revenue) are broken by
/// first-listed-wins over this sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum Country {
    BR,
    US,
    CA,
    GB,
    AU,
}

impl Country {
    pub const ALL: [Country; 5] = [
        Country::BR,
        Country::US,
        Country::CA,
        Country::GB,
        Country::AU,
    ];

    /// The home market. Its spend is already denominated in the reporting
    /// currency (BRL); every other market is converted at a fixed rate.
    pub const HOME: Country = Country::BR;

    pub fn code(&self) -> &'static str {
        match self {
            Country::BR => "BR",
            Country::US => "US",
            Country::CA => "CA",
            Country::GB => "GB",
            Country::AU => "AU",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Country {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BR" => Ok(Country::BR),
            "US" => Ok(Country::US),
            "CA" => Ok(Country::CA),
            "GB" => Ok(Country::GB),
            "AU" => Ok(Country::AU),
            other => Err(DashboardError::UnknownCountry(other.to_string())),
        }
    }
}

/// The two tracked apps. Identifiers double as storage key prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppId {
    DivineTalk,
    DivineTv,
}

impl AppId {
    pub const ALL: [AppId; 2] = [AppId::DivineTalk, AppId::DivineTv];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppId::DivineTalk => "divinetalk",
            AppId::DivineTv => "divinetv",
        }
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppId {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "divinetalk" => Ok(AppId::DivineTalk),
            "divinetv" => Ok(AppId::DivineTv),
            other => Err(DashboardError::UnknownApp(other.to_string())),
        }
    }
}

/// One app's activity for one country on one calendar day.
///
/// Field names mirror the stored JSON exactly; values written by the browser
/// build arrive as strings, numbers, or are simply absent, so every numeric
/// field is deserialized leniently (anything non-numeric becomes 0).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct DailyRecord {
    /// ISO-8601 calendar date (YYYY-MM-DD). An empty or malformed date keeps
    /// the record out of month-bucketed views but not out of "all time".
    #[serde(default)]
    pub date: String,

    /// Ad spend for the day, in the country's local currency.
    #[serde(rename = "valorGasto", default, deserialize_with = "lenient_f64")]
    pub spend: f64,

    #[serde(rename = "instalacoes", default, deserialize_with = "lenient_f64")]
    pub installs: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub trials: f64,

    #[serde(rename = "novosAssinantes", default, deserialize_with = "lenient_f64")]
    pub new_subscribers: f64,

    /// App Store revenue, always reported in USD.
    #[serde(rename = "faturamentoApple", default, deserialize_with = "lenient_f64")]
    pub revenue_apple: f64,

    /// Play Store revenue, in the country's local currency.
    #[serde(rename = "faturamentoAndroid", default, deserialize_with = "lenient_f64")]
    pub revenue_android: f64,
}

impl DailyRecord {
    /// Combined store revenue for the day. No FX conversion happens here;
    /// cross-currency totals are the DRE engine's concern.
    pub fn revenue(&self) -> f64 {
        self.revenue_apple + self.revenue_android
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&schemars::schema_for!(DailyRecord))
    }
}

/// The four month-scoped ledgers of the financial tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Ledger {
    ContasPagar,
    CustosFixos,
    CustosVariaveis,
    ExtratoCartao,
}

impl Ledger {
    pub const ALL: [Ledger; 4] = [
        Ledger::ContasPagar,
        Ledger::CustosFixos,
        Ledger::CustosVariaveis,
        Ledger::ExtratoCartao,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ledger::ContasPagar => "contasPagar",
            Ledger::CustosFixos => "custosFixos",
            Ledger::CustosVariaveis => "custosVariaveis",
            Ledger::ExtratoCartao => "extratoCartao",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum PayableStatus {
    #[default]
    #[serde(alias = "pendente")]
    Pendente,
    #[serde(alias = "pago")]
    Pago,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum ExpenseCategory {
    Marketing,
    Operacional,
    Tecnologia,
    #[default]
    Outros,
}

/// A bill with a due date. Only `Pendente` entries count toward the
/// outstanding-liability total.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Payable {
    #[serde(default)]
    pub vencimento: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub valor: f64,
    #[serde(default)]
    pub status: PayableStatus,
}

/// A recurring monthly cost (rent, salaries, insurance).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct FixedCost {
    #[serde(default)]
    pub descricao: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub valor: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct VariableCost {
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub valor: f64,
    #[serde(default)]
    pub categoria: ExpenseCategory,
}

/// One card statement line. Card spend funds the fixed/variable categories;
/// see the DRE engine for how it enters (and does not enter) the rollup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct CardEntry {
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub valor: f64,
    #[serde(default)]
    pub categoria: ExpenseCategory,
}

/// Storage key for one app's daily records in one country: `{app}_{country}`.
pub fn record_key(app: AppId, country: Country) -> String {
    format!("{}_{}", app.as_str(), country.code())
}

/// Storage key for one ledger in one month: `financial_{ledger}_{YYYY-MM}`.
pub fn ledger_key(ledger: Ledger, month: &str) -> String {
    format!("financial_{}_{}", ledger.as_str(), month)
}

/// Storage key for the monthly budget target: `budget_{YYYY-MM}`.
pub fn budget_key(month: &str) -> String {
    format!("budget_{}", month)
}

/// Accepts a JSON number, a numeric string, null, or garbage; everything that
/// does not parse cleanly as a number becomes 0. This is the explicit version
/// of the `parseFloat(x) || 0` coercion the stored data was written against.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    })
}
