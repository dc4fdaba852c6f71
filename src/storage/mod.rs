//! Local JSON files: the subscription snapshot handed over by the backend and
//! the cached exchange-rate table.

pub mod json_backend;

use crate::{currency::RateSnapshot, domain::Subscription, errors::CoreError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Source of already-fetched data the engine works on.
pub trait SnapshotStore {
    fn load_subscriptions(&self) -> Result<Vec<Subscription>>;
    fn save_subscriptions(&self, subs: &[Subscription]) -> Result<()>;
    /// `Ok(None)` when nothing has been cached yet.
    fn load_rates(&self) -> Result<Option<RateSnapshot>>;
    fn save_rates(&self, snapshot: &RateSnapshot) -> Result<()>;
}

pub use json_backend::{parse_snapshot, JsonStore};
