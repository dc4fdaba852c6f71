//! Dashboard summary: what the current month costs and whether it breaks the
//! user's monthly limit.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::aggregate::{month_totals_by_subscription, SubscriptionTotal, HIGHLIGHT_SPENDERS};
use crate::config::Settings;
use crate::domain::Subscription;
use crate::schedule::{earliest_across_all, NextDue};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSummary<'a> {
    pub year: i32,
    pub month: u32,
    /// Amount billed in the calendar month containing `today`.
    pub month_total: f64,
    pub active_count: usize,
    pub limit: Option<f64>,
    pub over_limit: bool,
    pub top: Vec<SubscriptionTotal>,
    pub next_due: Option<NextDue<'a>>,
}

/// Builds the summary for the month containing `today`.
pub fn spending_summary<'a>(
    subs: &'a [Subscription],
    settings: &Settings,
    today: NaiveDate,
) -> SpendingSummary<'a> {
    let (year, month) = (today.year(), today.month());
    let all = month_totals_by_subscription(subs, year, month, None);
    let month_total: f64 = all.iter().map(|entry| entry.amount).sum();
    let limit = settings.monthly_limit();

    SpendingSummary {
        year,
        month,
        month_total,
        active_count: subs.iter().filter(|sub| sub.active).count(),
        limit,
        over_limit: limit.is_some_and(|limit| month_total > limit),
        top: all.into_iter().take(HIGHLIGHT_SPENDERS).collect(),
        next_due: earliest_across_all(subs, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BillingPeriod;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn subs() -> Vec<Subscription> {
        vec![
            Subscription::new("1", "Video", 43.0, "2024-01-12", BillingPeriod::Monthly),
            Subscription::new("2", "Music", 20.0, "2024-02-28", BillingPeriod::Monthly),
            Subscription::new("3", "Domain", 60.0, "2023-11-02", BillingPeriod::Yearly),
            Subscription::new("4", "Old", 99.0, "2024-01-01", BillingPeriod::Monthly)
                .with_active(false),
        ]
    }

    #[test]
    fn totals_current_month_and_flags_limit() {
        let settings = Settings {
            limit_on: true,
            limit_val: "50".into(),
            ..Settings::default()
        };
        let subs = subs();
        let summary = spending_summary(&subs, &settings, date(2024, 6, 20));
        assert!((summary.month_total - 63.0).abs() < 1e-9);
        assert_eq!(summary.active_count, 3);
        assert_eq!(summary.limit, Some(50.0));
        assert!(summary.over_limit);
        assert_eq!(summary.top.len(), 2);
        let next = summary.next_due.expect("next due");
        assert_eq!(next.subscription.name, "Music");
        assert_eq!(next.date, date(2024, 6, 28));
    }

    #[test]
    fn disabled_limit_never_trips() {
        let subs = subs();
        let summary = spending_summary(&subs, &Settings::default(), date(2024, 11, 1));
        assert!((summary.month_total - 123.0).abs() < 1e-9);
        assert_eq!(summary.limit, None);
        assert!(!summary.over_limit);
    }

    #[test]
    fn empty_snapshot() {
        let summary = spending_summary(&[], &Settings::default(), date(2024, 1, 1));
        assert_eq!(summary.month_total, 0.0);
        assert_eq!(summary.active_count, 0);
        assert!(summary.top.is_empty());
        assert!(summary.next_due.is_none());
    }
}
