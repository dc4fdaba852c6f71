use chrono::NaiveDate;
use serde::Serialize;

use super::active;
use crate::domain::listing::compare_names;
use crate::domain::Subscription;
use crate::schedule::{DateWindow, Occurrences};

pub const UPCOMING_HORIZON_DAYS: u32 = 30;
pub const UPCOMING_LIMIT: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingPayment<'a> {
    pub subscription: &'a Subscription,
    pub date: NaiveDate,
    pub days_from_today: i64,
}

/// Payments in `[today, today + horizon_days]`, ordered by date and then by
/// subscription name. `limit` caps the list length.
pub fn upcoming(
    subs: &[Subscription],
    today: NaiveDate,
    horizon_days: u32,
    limit: Option<usize>,
) -> Vec<UpcomingPayment<'_>> {
    let Some(window) = DateWindow::days_from(today, horizon_days) else {
        return Vec::new();
    };

    let mut payments: Vec<UpcomingPayment<'_>> = active(subs)
        .filter_map(|sub| sub.anchor_date().map(|anchor| (sub, anchor)))
        .flat_map(|(sub, anchor)| {
            Occurrences::new(anchor, sub.period, window).map(move |date| UpcomingPayment {
                subscription: sub,
                date,
                days_from_today: (date - today).num_days(),
            })
        })
        .collect();

    payments.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| compare_names(&a.subscription.name, &b.subscription.name))
    });
    if let Some(limit) = limit {
        payments.truncate(limit);
    }
    payments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BillingPeriod;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn lists_payments_within_horizon() {
        let subs = vec![
            Subscription::new("1", "Video", 30.0, "2024-01-25", BillingPeriod::Monthly),
            Subscription::new("2", "Audio", 20.0, "2024-01-25", BillingPeriod::Monthly),
            Subscription::new("3", "Gym", 100.0, "2024-02-05", BillingPeriod::Monthly),
            Subscription::new("4", "Far", 1.0, "2024-09-01", BillingPeriod::Yearly),
        ];
        let today = date(2024, 6, 20);
        let list = upcoming(&subs, today, UPCOMING_HORIZON_DAYS, None);
        let rows: Vec<_> = list
            .iter()
            .map(|p| (p.subscription.name.as_str(), p.date, p.days_from_today))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Audio", date(2024, 6, 25), 5),
                ("Video", date(2024, 6, 25), 5),
                ("Gym", date(2024, 7, 5), 15),
            ]
        );
    }

    #[test]
    fn horizon_is_inclusive_and_today_counts() {
        let subs = vec![
            Subscription::new("1", "Today", 1.0, "2024-05-20", BillingPeriod::Monthly),
            Subscription::new("2", "Edge", 1.0, "2024-07-20", BillingPeriod::Yearly),
        ];
        let list = upcoming(&subs, date(2024, 6, 20), 30, None);
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].days_from_today, 0);
        assert_eq!(list[2].date, date(2024, 7, 20));
        assert_eq!(list[2].days_from_today, 30);
    }

    #[test]
    fn limit_caps_results() {
        let subs: Vec<Subscription> = (1..=20)
            .map(|i| {
                Subscription::new(
                    i.to_string().as_str(),
                    format!("Sub {i:02}"),
                    1.0,
                    "2024-01-21",
                    BillingPeriod::Monthly,
                )
            })
            .collect();
        let list = upcoming(&subs, date(2024, 6, 20), 30, Some(UPCOMING_LIMIT));
        assert_eq!(list.len(), UPCOMING_LIMIT);
        assert_eq!(list[0].subscription.name, "Sub 01");
    }
}
