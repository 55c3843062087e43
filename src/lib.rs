#![doc(test(attr(deny(warnings))))]

//! GroupSave Core tracks group savings plans: a fixed roster saving toward a
//! shared goal over a number of calendar months, with an append-only
//! contribution ledger and lazy completion once the duration elapses.

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::core::{
    Clock, FixedClock, MonthlyContributions, PlanManager, PlanOverview, SystemClock,
};
pub use config::{Config, ConfigManager};
pub use domain::{Contribution, ContributionDraft, PlanDraft, PlanStatus, SavingsPlan};
pub use errors::{SavingsError, StoreError, ValidationError, ValidationKind};
pub use storage::{InMemoryPlanStore, JsonPlanStore, PlanStore};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    init_with_filter(None);
}

/// Like [`init`], using `directives` when `RUST_LOG` is unset.
pub fn init_with_filter(directives: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(directives);
        tracing::info!("GroupSave Core tracing initialized.");
    });
}
