use crate::schema::DailyRecord;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// A reporting window: either everything ever recorded or a single
/// calendar month identified by its `YYYY-MM` prefix.
///
/// Serializes as the dropdown value convention: the literal `"all"` or the
/// month string itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Period {
    All,
    Month(String),
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Period::parse(&value))
    }
}

impl Period {
    /// Parses the dropdown value convention: the literal `"all"` or a
    /// `YYYY-MM` month string. Anything else is treated as a month string
    /// verbatim; it will simply match no records.
    pub fn parse(value: &str) -> Period {
        if value == "all" {
            Period::All
        } else {
            Period::Month(value.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Period::All)
    }

    pub fn as_month(&self) -> Option<&str> {
        match self {
            Period::All => None,
            Period::Month(m) => Some(m.as_str()),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::All => f.write_str("all"),
            Period::Month(m) => f.write_str(m),
        }
    }
}

/// Narrows a record list to the given period.
///
/// `All` is the identity, including records with missing or malformed dates.
/// A month match is a lexical prefix comparison on the date's first seven
/// characters, not a calendar computation; a malformed date fails to match
/// and is dropped. Never errors.
pub fn filter_by_period<'a>(records: &'a [DailyRecord], period: &Period) -> Vec<&'a DailyRecord> {
    match period {
        Period::All => records.iter().collect(),
        Period::Month(month) => records
            .iter()
            .filter(|r| month_of(&r.date).is_some_and(|m| m == month.as_str()))
            .collect(),
    }
}

/// Owned variant of [`filter_by_period`] for callers that go on to mutate or
/// store the filtered set.
pub fn filter_owned(records: &[DailyRecord], period: &Period) -> Vec<DailyRecord> {
    filter_by_period(records, period)
        .into_iter()
        .cloned()
        .collect()
}

/// The `YYYY-MM` prefix of a date string, if it has one.
pub fn month_of(date: &str) -> Option<&str> {
    date.get(..7)
}

/// Distinct months present across the given record sets, newest first.
/// Feeds the period dropdowns; dateless records contribute nothing.
pub fn available_periods<'a, I>(record_sets: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [DailyRecord]>,
{
    let mut months = BTreeSet::new();
    for records in record_sets {
        for record in records {
            if let Some(month) = month_of(&record.date) {
                months.insert(month.to_string());
            }
        }
    }
    months.into_iter().rev().collect()
}
