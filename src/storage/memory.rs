//! In-memory plan store for tests, demos and embedding.

use dashmap::{mapref::entry::Entry, DashMap};

use crate::{domain::SavingsPlan, errors::StoreError};

use super::{PlanStore, Result};

/// Keeps every plan in a sharded concurrent map keyed by plan code.
#[derive(Debug, Default)]
pub struct InMemoryPlanStore {
    plans: DashMap<String, SavingsPlan>,
}

impl InMemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

impl PlanStore for InMemoryPlanStore {
    fn insert(&self, plan: &SavingsPlan) -> Result<()> {
        match self.plans.entry(plan.plan_code().to_string()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateCode(plan.plan_code().to_string())),
            Entry::Vacant(slot) => {
                slot.insert(plan.clone());
                Ok(())
            }
        }
    }

    fn contains(&self, plan_code: &str) -> Result<bool> {
        Ok(self.plans.contains_key(plan_code))
    }

    fn load(&self, plan_code: &str) -> Result<Option<SavingsPlan>> {
        Ok(self.plans.get(plan_code).map(|entry| entry.value().clone()))
    }

    fn save(&self, plan: &mut SavingsPlan, expected_version: u64) -> Result<()> {
        let mut stored = self
            .plans
            .get_mut(plan.plan_code())
            .ok_or_else(|| StoreError::Missing(plan.plan_code().to_string()))?;
        if stored.version() != expected_version {
            return Err(StoreError::VersionConflict {
                plan_code: plan.plan_code().to_string(),
                expected: expected_version,
                found: stored.version(),
            });
        }
        plan.stamp_version(expected_version + 1);
        *stored = plan.clone();
        Ok(())
    }

    fn list_codes(&self) -> Result<Vec<String>> {
        let mut codes: Vec<String> = self.plans.iter().map(|entry| entry.key().clone()).collect();
        codes.sort();
        Ok(codes)
    }
}
