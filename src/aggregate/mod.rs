//! Cross-subscription views built on the occurrence generator.
//!
//! Every view looks at active subscriptions only, is a pure function of the
//! snapshot and its parameters, and recomputes from scratch on each call.

pub mod calendar;
pub mod totals;
pub mod upcoming;

pub use calendar::{
    calendar_month, calendar_month_with_highlight, month_grid, CalendarEvent, CalendarMonth,
    DayCell, GRID_CELLS,
};
pub use totals::{
    month_totals_by_subscription, year_totals, SubscriptionTotal, YearTotals,
    HIGHLIGHT_SPENDERS, TOP_SPENDERS,
};
pub use upcoming::{upcoming, UpcomingPayment, UPCOMING_HORIZON_DAYS, UPCOMING_LIMIT};

use crate::domain::Subscription;

pub(crate) fn active(subs: &[Subscription]) -> impl Iterator<Item = &Subscription> {
    subs.iter().filter(|sub| sub.active)
}
