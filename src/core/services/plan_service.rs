//! Construction and status upkeep for plan aggregates.

use chrono::{DateTime, Utc};

use crate::{
    core::completion::CompletionEvaluator,
    domain::{PlanDraft, SavingsPlan},
};

use super::ServiceResult;

pub struct PlanService;

impl PlanService {
    /// Validates the draft and builds an active plan starting at `now`.
    pub fn build(
        plan_code: impl Into<String>,
        draft: &PlanDraft,
        now: DateTime<Utc>,
    ) -> ServiceResult<SavingsPlan> {
        Ok(SavingsPlan::new(plan_code, draft, now)?)
    }

    /// Applies lazy completion. Returns `true` when the caller must persist the plan.
    pub fn refresh_status(plan: &mut SavingsPlan, now: DateTime<Utc>) -> bool {
        CompletionEvaluator::evaluate(plan, now)
    }
}
