//! Recurring payment schedule: month-safe stepping, occurrence generation
//! and next-due resolution.

pub mod calendar;
pub mod next_due;
pub mod occurrences;

pub use calendar::{days_in_month, iso_key, parse_iso_date, step_months};
pub use next_due::{earliest_across_all, next_occurrence_on_or_after, NextDue};
pub use occurrences::{occurrences_for, occurrences_in_window, DateWindow, Occurrence, Occurrences};
