use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDate;

use super::subscription::Subscription;
use crate::errors::CoreError;

/// Orderings offered by the subscription list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOption {
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    DateAsc,
    DateDesc,
}

impl FromStr for SortOption {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "name-asc" => Ok(SortOption::NameAsc),
            "name-desc" => Ok(SortOption::NameDesc),
            "price-asc" => Ok(SortOption::PriceAsc),
            "price-desc" => Ok(SortOption::PriceDesc),
            "date-asc" => Ok(SortOption::DateAsc),
            "date-desc" => Ok(SortOption::DateDesc),
            other => Err(CoreError::InvalidInput(format!(
                "unknown sort option `{}`",
                other
            ))),
        }
    }
}

/// Keeps subscriptions whose name contains `needle`, ignoring case.
/// An empty needle keeps everything.
pub fn filter_by_name<'a>(subs: &'a [Subscription], needle: &str) -> Vec<&'a Subscription> {
    let needle = needle.to_lowercase();
    subs.iter()
        .filter(|sub| sub.name.to_lowercase().contains(&needle))
        .collect()
}

/// Sorts in place. Records without a usable anchor go last in both date orders.
pub fn sort_subscriptions(subs: &mut [&Subscription], option: SortOption) {
    match option {
        SortOption::NameAsc => subs.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortOption::NameDesc => subs.sort_by(|a, b| compare_names(&b.name, &a.name)),
        SortOption::PriceAsc => subs.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortOption::PriceDesc => subs.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortOption::DateAsc => {
            subs.sort_by(|a, b| compare_dates(a.anchor_date(), b.anchor_date(), false))
        }
        SortOption::DateDesc => {
            subs.sort_by(|a, b| compare_dates(a.anchor_date(), b.anchor_date(), true))
        }
    }
}

/// Case-insensitive name order with a raw comparison as tie-break so the
/// result is total.
pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn compare_dates(a: Option<NaiveDate>, b: Option<NaiveDate>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
