use chrono::{DateTime, Utc};

use crate::{core::time::MonthClock, domain::SavingsPlan};

/// Lazy `active -> completed` transition, evaluated whenever a plan is read or mutated.
pub struct CompletionEvaluator;

impl CompletionEvaluator {
    /// True once the full duration has elapsed, regardless of current status.
    pub fn is_due(plan: &SavingsPlan, now: DateTime<Utc>) -> bool {
        MonthClock::elapsed_months(plan.start_date(), now) >= i64::from(plan.duration_months())
    }

    /// Completes the plan if it is active and due. Returns whether the status changed.
    pub fn evaluate(plan: &mut SavingsPlan, now: DateTime<Utc>) -> bool {
        if !plan.is_active() || !Self::is_due(plan, now) {
            return false;
        }
        plan.mark_completed(now)
    }
}
