pub mod json_backend;
pub mod memory;

use std::sync::Arc;

use crate::{
    domain::{SavingsPlan, CURRENT_SCHEMA_VERSION},
    errors::StoreError,
};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence contract for plan aggregates, keyed by plan code.
///
/// Implementations must make `insert` the authoritative uniqueness check and
/// `save` a compare-and-swap on the plan's version. Only the stores in this
/// crate can stamp a version; other implementations wrap one of them.
pub trait PlanStore: Send + Sync {
    /// Stores a new plan. Fails with [`StoreError::DuplicateCode`] if the code is taken.
    fn insert(&self, plan: &SavingsPlan) -> Result<()>;

    /// Cheap existence probe. Advisory only: `insert` still arbitrates.
    fn contains(&self, plan_code: &str) -> Result<bool>;

    fn load(&self, plan_code: &str) -> Result<Option<SavingsPlan>>;

    /// Replaces the stored plan if its version still equals `expected_version`,
    /// then stamps `plan` with the new version.
    fn save(&self, plan: &mut SavingsPlan, expected_version: u64) -> Result<()>;

    fn list_codes(&self) -> Result<Vec<String>>;
}

impl<S: PlanStore + ?Sized> PlanStore for Arc<S> {
    fn insert(&self, plan: &SavingsPlan) -> Result<()> {
        (**self).insert(plan)
    }

    fn contains(&self, plan_code: &str) -> Result<bool> {
        (**self).contains(plan_code)
    }

    fn load(&self, plan_code: &str) -> Result<Option<SavingsPlan>> {
        (**self).load(plan_code)
    }

    fn save(&self, plan: &mut SavingsPlan, expected_version: u64) -> Result<()> {
        (**self).save(plan, expected_version)
    }

    fn list_codes(&self) -> Result<Vec<String>> {
        (**self).list_codes()
    }
}

/// Rejects snapshots written by a newer schema than this build understands.
pub fn ensure_schema_support(plan: &SavingsPlan) -> Result<()> {
    if plan.schema_version() > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchema {
            found: plan.schema_version(),
            supported: CURRENT_SCHEMA_VERSION,
        });
    }
    Ok(())
}

pub use json_backend::JsonPlanStore;
pub use memory::InMemoryPlanStore;
