use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::active;
use crate::domain::{BillingPeriod, Subscription, SubscriptionId};
use crate::schedule::{earliest_across_all, iso_key, DateWindow, Occurrences};

/// Six full weeks, enough for any month laid out Monday first.
pub const GRID_CELLS: usize = 42;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub subscription_id: SubscriptionId,
    pub name: String,
    pub amount: f64,
    pub period: BillingPeriod,
}

/// Payments falling on one day and their sum for the cell badge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayCell {
    pub events: Vec<CalendarEvent>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub window: DateWindow,
    /// Keyed by `YYYY-MM-DD`, only days with at least one payment.
    pub days: BTreeMap<String, DayCell>,
    /// `YYYY-MM-DD` of the globally nearest due payment, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearest_due: Option<String>,
}

impl CalendarMonth {
    pub fn day(&self, date: NaiveDate) -> Option<&DayCell> {
        self.days.get(&iso_key(date))
    }

    pub fn total(&self) -> f64 {
        self.days.values().map(|cell| cell.total).sum()
    }

    pub fn event_count(&self) -> usize {
        self.days.values().map(|cell| cell.events.len()).sum()
    }
}

/// Groups the month's payments by day. Returns `None` only for an invalid
/// month number.
pub fn calendar_month(subs: &[Subscription], year: i32, month: u32) -> Option<CalendarMonth> {
    let window = DateWindow::month(year, month)?;
    let mut days: BTreeMap<String, DayCell> = BTreeMap::new();

    for sub in active(subs) {
        let Some(anchor) = sub.anchor_date() else {
            continue;
        };
        for date in Occurrences::new(anchor, sub.period, window) {
            let cell = days.entry(iso_key(date)).or_default();
            cell.total += sub.price;
            cell.events.push(CalendarEvent {
                subscription_id: sub.id.clone(),
                name: sub.name.clone(),
                amount: sub.price,
                period: sub.period,
            });
        }
    }

    Some(CalendarMonth {
        year,
        month,
        window,
        days,
        nearest_due: None,
    })
}

/// [`calendar_month`] plus the nearest due date relative to `today`, which the
/// calendar highlights even when it falls outside the displayed month.
pub fn calendar_month_with_highlight(
    subs: &[Subscription],
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Option<CalendarMonth> {
    let mut view = calendar_month(subs, year, month)?;
    view.nearest_due = earliest_across_all(subs, today).map(|next| iso_key(next.date));
    Some(view)
}

/// Dates of a Monday-first month grid: starts on the Monday on or before the
/// 1st and always spans [`GRID_CELLS`] days.
pub fn month_grid(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let lead = i64::from(first.weekday().num_days_from_monday());
    let start = first.checked_sub_signed(Duration::days(lead))?;
    (0..GRID_CELLS as i64)
        .map(|offset| start.checked_add_signed(Duration::days(offset)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn groups_same_day_payments() {
        let subs = vec![
            Subscription::new("1", "Music", 20.0, "2024-01-10", BillingPeriod::Monthly),
            Subscription::new("2", "Video", 30.5, "2023-12-10", BillingPeriod::Monthly),
            Subscription::new("3", "Domain", 60.0, "2023-03-02", BillingPeriod::Yearly),
        ];
        let view = calendar_month(&subs, 2024, 3).unwrap();
        let cell = view.day(date(2024, 3, 10)).expect("cell");
        assert_eq!(cell.events.len(), 2);
        assert!((cell.total - 50.5).abs() < 1e-9);
        assert!((view.day(date(2024, 3, 2)).unwrap().total - 60.0).abs() < 1e-9);
        assert_eq!(view.event_count(), 3);
        assert!((view.total() - 110.5).abs() < 1e-9);
    }

    #[test]
    fn invalid_month_is_none() {
        assert!(calendar_month(&[], 2024, 13).is_none());
    }

    #[test]
    fn highlight_uses_global_next_due() {
        let subs = vec![Subscription::new(
            "1",
            "Music",
            20.0,
            "2024-01-10",
            BillingPeriod::Monthly,
        )];
        let view = calendar_month_with_highlight(&subs, 2024, 8, date(2024, 6, 11)).unwrap();
        assert_eq!(view.nearest_due.as_deref(), Some("2024-07-10"));
    }

    #[test]
    fn grid_starts_on_monday() {
        let grid = month_grid(2024, 5).unwrap();
        assert_eq!(grid.len(), GRID_CELLS);
        assert_eq!(grid[0], date(2024, 4, 29));
        assert_eq!(grid[2], date(2024, 5, 1));
        assert_eq!(grid[41], date(2024, 6, 9));
    }

    #[test]
    fn grid_for_month_starting_monday() {
        let grid = month_grid(2024, 7).unwrap();
        assert_eq!(grid[0], date(2024, 7, 1));
    }
}
