use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::currency::parse_amount;
use crate::schedule::calendar::parse_iso_date;

/// Opaque backend identifier. The REST API hands out integers, older exports
/// use strings; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId")]
pub struct SubscriptionId(pub String);

impl SubscriptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for SubscriptionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

impl From<RawId> for SubscriptionId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(value) => Self(value.to_string()),
            RawId::Text(value) => Self(value),
        }
    }
}

/// Billing cadence. Unknown or missing values fall back to monthly, which is
/// what every record created before yearly billing existed implicitly meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum BillingPeriod {
    #[default]
    Monthly,
    Yearly,
}

impl BillingPeriod {
    /// Distance between two consecutive occurrences, in calendar months.
    pub fn stride_months(self) -> u32 {
        match self {
            BillingPeriod::Monthly => 1,
            BillingPeriod::Yearly => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "monthly",
            BillingPeriod::Yearly => "yearly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "Monthly",
            BillingPeriod::Yearly => "Yearly",
        }
    }
}

impl From<Option<String>> for BillingPeriod {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("yearly") => BillingPeriod::Yearly,
            _ => BillingPeriod::Monthly,
        }
    }
}

/// One recurring subscription from the backend snapshot.
///
/// Deserialization is lenient: a price that does not parse becomes `0.0` and
/// an anchor that is not a string is dropped, so a single broken record never
/// rejects the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: f64,
    #[serde(
        default,
        rename = "next_payment",
        alias = "next_payment_date",
        alias = "anchor_date",
        deserialize_with = "deserialize_anchor"
    )]
    pub anchor: Option<String>,
    #[serde(default)]
    pub period: BillingPeriod,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Subscription {
    pub fn new(
        id: impl Into<SubscriptionId>,
        name: impl Into<String>,
        price: f64,
        anchor: impl Into<String>,
        period: BillingPeriod,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            anchor: Some(anchor.into()),
            period,
            active: true,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Parsed anchor date, `None` when missing or malformed.
    pub fn anchor_date(&self) -> Option<NaiveDate> {
        self.anchor.as_deref().and_then(parse_iso_date)
    }

    /// Raw anchor text, empty when missing.
    pub fn anchor_str(&self) -> &str {
        self.anchor.as_deref().unwrap_or("")
    }
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(text) => parse_amount(&text),
        _ => 0.0,
    })
}

fn deserialize_anchor<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => Some(text),
        _ => None,
    })
}
