use chrono::NaiveDate;
use serde::Serialize;

use super::calendar::{add_years, parse_iso_date};
use super::occurrences::{DateWindow, Occurrences};
use crate::domain::{BillingPeriod, Subscription};

/// Look-ahead used when resolving the next due date. Any monthly or yearly
/// schedule has at least one occurrence inside it.
pub const NEXT_DUE_LOOKAHEAD_YEARS: u32 = 2;

/// The nearest upcoming payment together with the subscription it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextDue<'a> {
    pub subscription: &'a Subscription,
    pub date: NaiveDate,
    pub days_until: i64,
}

/// First occurrence on or after `today`, or `None` for an unusable anchor.
pub fn next_occurrence_on_or_after(
    anchor: &str,
    period: BillingPeriod,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let anchor = parse_iso_date(anchor)?;
    next_from_date(anchor, period, today)
}

fn next_from_date(anchor: NaiveDate, period: BillingPeriod, today: NaiveDate) -> Option<NaiveDate> {
    let horizon = add_years(today, NEXT_DUE_LOOKAHEAD_YEARS)?;
    Occurrences::new(anchor, period, DateWindow::new(today, horizon)).next()
}

/// Earliest next due payment across the active subscriptions of a snapshot.
/// When several subscriptions are due the same day the first one in snapshot
/// order wins.
pub fn earliest_across_all(subs: &[Subscription], today: NaiveDate) -> Option<NextDue<'_>> {
    let mut best: Option<NextDue<'_>> = None;
    for sub in subs.iter().filter(|sub| sub.active) {
        let Some(anchor) = sub.anchor_date() else {
            continue;
        };
        let Some(date) = next_from_date(anchor, sub.period, today) else {
            continue;
        };
        if best.as_ref().map_or(true, |current| date < current.date) {
            best = Some(NextDue {
                subscription: sub,
                date,
                days_until: (date - today).num_days(),
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn next_due_after_passed_anchor_day() {
        let next =
            next_occurrence_on_or_after("2024-06-15", BillingPeriod::Monthly, date(2024, 6, 20));
        assert_eq!(next, Some(date(2024, 7, 15)));
    }

    #[test]
    fn due_today_counts() {
        let next =
            next_occurrence_on_or_after("2024-01-20", BillingPeriod::Monthly, date(2024, 6, 20));
        assert_eq!(next, Some(date(2024, 6, 20)));
    }

    #[test]
    fn yearly_next_due() {
        let next =
            next_occurrence_on_or_after("2021-03-01", BillingPeriod::Yearly, date(2024, 6, 20));
        assert_eq!(next, Some(date(2025, 3, 1)));
    }

    #[test]
    fn far_future_anchor_is_outside_lookahead() {
        let next =
            next_occurrence_on_or_after("2030-01-01", BillingPeriod::Monthly, date(2024, 6, 20));
        assert_eq!(next, None);
    }

    #[test]
    fn invalid_anchor_has_no_next_due() {
        assert_eq!(
            next_occurrence_on_or_after("garbage", BillingPeriod::Monthly, date(2024, 6, 20)),
            None
        );
    }

    #[test]
    fn earliest_skips_inactive_and_invalid() {
        let today = date(2024, 6, 20);
        let subs = vec![
            Subscription::new("1", "Inactive", 5.0, "2024-06-21", BillingPeriod::Monthly)
                .with_active(false),
            Subscription::new("2", "Broken", 5.0, "nope", BillingPeriod::Monthly),
            Subscription::new("3", "Music", 20.0, "2024-01-25", BillingPeriod::Monthly),
            Subscription::new("4", "Video", 30.0, "2024-03-30", BillingPeriod::Monthly),
        ];
        let next = earliest_across_all(&subs, today).expect("next due");
        assert_eq!(next.subscription.name, "Music");
        assert_eq!(next.date, date(2024, 6, 25));
        assert_eq!(next.days_until, 5);
    }

    #[test]
    fn earliest_tie_keeps_first() {
        let today = date(2024, 6, 1);
        let subs = vec![
            Subscription::new("1", "First", 5.0, "2024-05-10", BillingPeriod::Monthly),
            Subscription::new("2", "Second", 5.0, "2024-04-10", BillingPeriod::Monthly),
        ];
        let next = earliest_across_all(&subs, today).unwrap();
        assert_eq!(next.subscription.name, "First");
    }

    #[test]
    fn earliest_of_empty_snapshot() {
        assert!(earliest_across_all(&[], date(2024, 1, 1)).is_none());
    }
}
