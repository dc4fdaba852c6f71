use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::calendar::{add_days, month_end, month_index, month_start, parse_iso_date, step_months};
use crate::domain::{BillingPeriod, Subscription, SubscriptionId};

/// Inclusive date range `[start, end]`. A window whose start lies after its
/// end is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The whole calendar month.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        Some(Self::new(month_start(year, month)?, month_end(year, month)?))
    }

    /// 1 January to 31 December.
    pub fn year(year: i32) -> Option<Self> {
        Some(Self::new(
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        ))
    }

    /// `[start, start + days]`.
    pub fn days_from(start: NaiveDate, days: u32) -> Option<Self> {
        Some(Self::new(start, add_days(start, i64::from(days))?))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// One billing instance of a subscription. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Occurrence {
    pub subscription_id: SubscriptionId,
    pub date: NaiveDate,
    pub amount: f64,
}

/// Billing dates of one anchor/period pair inside a window, ascending.
///
/// The iterator holds no reference to its inputs; cloning it, or building a
/// new one from the same arguments, replays the same sequence.
#[derive(Debug, Clone)]
pub struct Occurrences {
    anchor_day: u32,
    stride: u32,
    end: NaiveDate,
    next: Option<NaiveDate>,
}

impl Occurrences {
    pub fn new(anchor: NaiveDate, period: BillingPeriod, window: DateWindow) -> Self {
        let stride = period.stride_months();
        let anchor_day = anchor.day();
        let next = if window.is_empty() {
            None
        } else {
            first_on_or_after(anchor, anchor_day, stride, window.start)
        };
        trace!(%anchor, ?period, start = %window.start, end = %window.end, "occurrence window");
        Self {
            anchor_day,
            stride,
            end: window.end,
            next,
        }
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        if current > self.end {
            self.next = None;
            return None;
        }
        self.next = step_months(current, self.anchor_day, self.stride);
        Some(current)
    }
}

/// First stride multiple from `anchor` that is not before `start`.
///
/// Stepping `k` times by `stride` with a fixed anchor day lands on the same
/// date as one jump of `k * stride` months, so the walk up to the window is
/// computed directly instead of looping from an anchor that may be years old.
fn first_on_or_after(
    anchor: NaiveDate,
    anchor_day: u32,
    stride: u32,
    start: NaiveDate,
) -> Option<NaiveDate> {
    if anchor >= start {
        return Some(anchor);
    }
    let stride = i64::from(stride);
    let gap = month_index(start) - month_index(anchor);
    let mut strides = gap.div_euclid(stride);
    loop {
        let months = u32::try_from(strides * stride).ok()?;
        let candidate = step_months(anchor, anchor_day, months)?;
        if candidate >= start {
            return Some(candidate);
        }
        strides += 1;
    }
}

/// Billing dates for a raw anchor string. An anchor that is missing or not a
/// valid `YYYY-MM-DD` date produces no occurrences.
pub fn occurrences_in_window(
    anchor: &str,
    period: BillingPeriod,
    window: DateWindow,
) -> Vec<NaiveDate> {
    match parse_iso_date(anchor) {
        Some(anchor) => Occurrences::new(anchor, period, window).collect(),
        None => Vec::new(),
    }
}

/// Occurrences of one subscription with their amounts. The active flag is not
/// consulted here; aggregate views filter on it.
pub fn occurrences_for(sub: &Subscription, window: DateWindow) -> Vec<Occurrence> {
    let Some(anchor) = sub.anchor_date() else {
        debug!(id = %sub.id, name = %sub.name, anchor = sub.anchor_str(), "skipping subscription without a usable anchor");
        return Vec::new();
    };
    Occurrences::new(anchor, sub.period, window)
        .map(|date| Occurrence {
            subscription_id: sub.id.clone(),
            date,
            amount: sub.price,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_end_anchor_clamps_and_recovers() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 5, 31));
        let dates = occurrences_in_window("2024-01-31", BillingPeriod::Monthly, window);
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 31),
                date(2024, 2, 29),
                date(2024, 3, 31),
                date(2024, 4, 30),
                date(2024, 5, 31),
            ]
        );
    }

    #[test]
    fn window_endpoints_are_inclusive() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 3, 1));
        let dates = occurrences_in_window("2024-01-01", BillingPeriod::Monthly, window);
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]);
    }

    #[test]
    fn invalid_anchor_yields_nothing() {
        let window = DateWindow::year(2024).unwrap();
        assert!(occurrences_in_window("", BillingPeriod::Monthly, window).is_empty());
        assert!(occurrences_in_window("not-a-date", BillingPeriod::Yearly, window).is_empty());
    }

    #[test]
    fn old_anchor_skips_ahead_to_window() {
        let window = DateWindow::new(date(2024, 6, 1), date(2024, 7, 31));
        let dates = occurrences_in_window("1999-12-31", BillingPeriod::Monthly, window);
        assert_eq!(dates, vec![date(2024, 6, 30), date(2024, 7, 31)]);
    }

    #[test]
    fn anchor_before_start_in_same_month() {
        let window = DateWindow::new(date(2024, 6, 20), date(2024, 8, 1));
        let dates = occurrences_in_window("2024-06-15", BillingPeriod::Monthly, window);
        assert_eq!(dates, vec![date(2024, 7, 15)]);
    }

    #[test]
    fn future_anchor_starts_at_anchor() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 12, 31));
        let dates = occurrences_in_window("2024-10-10", BillingPeriod::Monthly, window);
        assert_eq!(dates, vec![date(2024, 10, 10), date(2024, 11, 10), date(2024, 12, 10)]);
    }

    #[test]
    fn yearly_stride() {
        let window = DateWindow::new(date(2023, 1, 1), date(2026, 12, 31));
        let dates = occurrences_in_window("2020-02-29", BillingPeriod::Yearly, window);
        assert_eq!(
            dates,
            vec![
                date(2023, 2, 28),
                date(2024, 2, 29),
                date(2025, 2, 28),
                date(2026, 2, 28),
            ]
        );
    }

    #[test]
    fn yearly_anchor_outside_window_month() {
        let window = DateWindow::month(2024, 3).unwrap();
        assert!(occurrences_in_window("2020-05-01", BillingPeriod::Yearly, window).is_empty());
    }

    #[test]
    fn inverted_window_is_empty() {
        let window = DateWindow::new(date(2024, 5, 1), date(2024, 4, 1));
        assert!(window.is_empty());
        assert!(occurrences_in_window("2024-01-01", BillingPeriod::Monthly, window).is_empty());
    }

    #[test]
    fn iterator_is_restartable() {
        let window = DateWindow::year(2024).unwrap();
        let iter = Occurrences::new(date(2024, 1, 5), BillingPeriod::Monthly, window);
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first.len(), 12);
        assert_eq!(first, second);
    }

    #[test]
    fn bounded_by_window_size() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 12, 31));
        let count = occurrences_in_window("2024-01-01", BillingPeriod::Monthly, window).len();
        assert!(count <= 13);
    }

    #[test]
    fn occurrences_for_carries_amount() {
        let sub = Subscription::new("9", "Cloud", 9.99, "2024-02-10", BillingPeriod::Monthly);
        let window = DateWindow::month(2024, 3).unwrap();
        let occurrences = occurrences_for(&sub, window);
        assert_eq!(
            occurrences,
            vec![Occurrence {
                subscription_id: SubscriptionId::new("9"),
                date: date(2024, 3, 10),
                amount: 9.99,
            }]
        );
    }
}
