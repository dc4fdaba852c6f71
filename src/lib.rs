#![doc(test(attr(deny(warnings))))]

//! Subscription Core computes billing occurrences, due dates and spending
//! aggregates for recurring subscriptions, plus the currency helpers and
//! local snapshot handling used by the tracker front ends.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod schedule;
pub mod storage;
pub mod summary;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Subscription Core tracing initialized.");
    });
}
