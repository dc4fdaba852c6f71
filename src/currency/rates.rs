use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::CoreError;

/// Every rate is expressed as PLN per one unit of the currency.
pub const ANCHOR_CURRENCY: &str = "PLN";

/// How long a fetched rate table may be reused.
pub const RATE_CACHE_TTL_HOURS: i64 = 12;

/// Currency code to PLN-per-unit mapping. Always contains `PLN -> 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct RateTable {
    rates: BTreeMap<String, f64>,
}

impl RateTable {
    pub fn new() -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(ANCHOR_CURRENCY.to_string(), 1.0);
        Self { rates }
    }

    /// Records a rate. Non-finite values and attempts to re-price the anchor
    /// currency are ignored.
    pub fn insert(&mut self, code: &str, pln_per_unit: f64) {
        let code = code.trim().to_uppercase();
        if code.is_empty() || code == ANCHOR_CURRENCY || !pln_per_unit.is_finite() {
            return;
        }
        self.rates.insert(code, pln_per_unit);
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(&code.trim().to_uppercase()).copied()
    }

    /// Known codes, anchor first, then the preferred list, then alphabetical.
    pub fn codes(&self) -> Vec<&str> {
        let preferred = super::PREFERRED_CURRENCIES;
        let mut codes: Vec<&str> = self.rates.keys().map(String::as_str).collect();
        codes.sort_by_key(|code| {
            let rank = preferred
                .iter()
                .position(|p| p == code)
                .unwrap_or(preferred.len());
            (rank, code.to_string())
        });
        codes
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BTreeMap<String, f64>> for RateTable {
    fn from(map: BTreeMap<String, f64>) -> Self {
        let mut table = RateTable::new();
        for (code, rate) in map {
            table.insert(&code, rate);
        }
        table
    }
}

impl From<RateTable> for BTreeMap<String, f64> {
    fn from(table: RateTable) -> Self {
        table.rates
    }
}

/// Converts `amount` between two currencies through their PLN prices.
///
/// Returns `0.0` when either code is unknown or priced at zero, so a missing
/// rate renders as a placeholder instead of failing.
pub fn convert(amount: f64, from: &str, to: &str, table: &RateTable) -> f64 {
    let from_rate = table.rate(from).filter(|rate| *rate != 0.0);
    let to_rate = table.rate(to).filter(|rate| *rate != 0.0);
    match (from_rate, to_rate) {
        (Some(from_rate), Some(to_rate)) => amount * (from_rate / to_rate),
        _ => 0.0,
    }
}

/// A cached copy of one published rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub fetched_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
    pub rates: RateTable,
}

#[derive(Deserialize)]
struct NbpTable {
    #[serde(rename = "effectiveDate", default)]
    effective_date: Option<String>,
    #[serde(default)]
    rates: Vec<NbpRate>,
}

#[derive(Deserialize)]
struct NbpRate {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    mid: Value,
}

impl RateSnapshot {
    /// Builds a snapshot from an NBP "table A" response
    /// (`[{"effectiveDate": "...", "rates": [{"code": "EUR", "mid": 4.3}]}]`).
    ///
    /// Only invalid JSON is an error. A payload of an unexpected shape yields
    /// a table holding just the anchor currency, and rate entries without a
    /// code or a numeric `mid` are skipped.
    pub fn from_nbp_payload(json: &str, fetched_at: DateTime<Utc>) -> Result<Self, CoreError> {
        let payload: Value = serde_json::from_str(json)?;
        let table = payload
            .as_array()
            .and_then(|tables| tables.first())
            .and_then(|first| serde_json::from_value::<NbpTable>(first.clone()).ok());

        let mut rates = RateTable::new();
        let mut effective_date = None;
        if let Some(table) = table {
            effective_date = table.effective_date;
            for entry in table.rates {
                match (entry.code, entry.mid.as_f64()) {
                    (Some(code), Some(mid)) => rates.insert(&code, mid),
                    (code, _) => debug!(?code, "skipping malformed rate entry"),
                }
            }
        }

        Ok(Self {
            fetched_at,
            effective_date,
            rates,
        })
    }

    /// True while the snapshot is younger than the cache TTL.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.fetched_at < Duration::hours(RATE_CACHE_TTL_HOURS)
    }
}
