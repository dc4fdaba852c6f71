//! Subscription records as delivered by the backend snapshot, plus list helpers.

pub mod listing;
pub mod subscription;

pub use listing::{filter_by_name, sort_subscriptions, SortOption};
pub use subscription::{BillingPeriod, Subscription, SubscriptionId};
