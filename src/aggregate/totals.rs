use std::cmp::Ordering;

use chrono::Datelike;
use serde::Serialize;

use super::active;
use crate::domain::listing::compare_names;
use crate::domain::{Subscription, SubscriptionId};
use crate::schedule::{DateWindow, Occurrences};

/// Entries shown in the month breakdown table.
pub const TOP_SPENDERS: usize = 10;
/// Entries shown in the summary highlight.
pub const HIGHLIGHT_SPENDERS: usize = 5;

/// Twelve monthly buckets of billed amounts, January first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTotals {
    pub year: i32,
    pub months: [f64; 12],
}

impl YearTotals {
    pub fn total(&self) -> f64 {
        self.months.iter().sum()
    }

    /// Amount billed in `month` (1-based); `0.0` outside 1..=12.
    pub fn month(&self, month: u32) -> f64 {
        month
            .checked_sub(1)
            .and_then(|idx| self.months.get(idx as usize))
            .copied()
            .unwrap_or(0.0)
    }
}

pub fn year_totals(subs: &[Subscription], year: i32) -> YearTotals {
    let mut months = [0.0; 12];
    if let Some(window) = DateWindow::year(year) {
        for sub in active(subs) {
            let Some(anchor) = sub.anchor_date() else {
                continue;
            };
            for date in Occurrences::new(anchor, sub.period, window) {
                months[date.month0() as usize] += sub.price;
            }
        }
    }
    YearTotals { year, months }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionTotal {
    pub subscription_id: SubscriptionId,
    pub name: String,
    pub occurrences: usize,
    pub amount: f64,
}

/// Per-subscription totals for one month, largest first. Subscriptions with
/// no payment in the month are left out; `top` truncates the list.
pub fn month_totals_by_subscription(
    subs: &[Subscription],
    year: i32,
    month: u32,
    top: Option<usize>,
) -> Vec<SubscriptionTotal> {
    let Some(window) = DateWindow::month(year, month) else {
        return Vec::new();
    };

    let mut totals: Vec<SubscriptionTotal> = active(subs)
        .filter_map(|sub| {
            let anchor = sub.anchor_date()?;
            let occurrences = Occurrences::new(anchor, sub.period, window).count();
            (occurrences > 0).then(|| SubscriptionTotal {
                subscription_id: sub.id.clone(),
                name: sub.name.clone(),
                occurrences,
                amount: sub.price * occurrences as f64,
            })
        })
        .collect();

    totals.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(Ordering::Equal)
            .then_with(|| compare_names(&a.name, &b.name))
    });
    if let Some(limit) = top {
        totals.truncate(limit);
    }
    totals
}
