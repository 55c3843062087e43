//! Validated appends to a plan's contribution ledger.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    core::completion::CompletionEvaluator,
    domain::{Contribution, ContributionDraft, SavingsPlan},
    errors::{SavingsError, ValidationError},
};

use super::ServiceResult;

pub struct ContributionService;

impl ContributionService {
    /// Appends a contribution and returns its identifier.
    ///
    /// Checks run in a fixed order and stop at the first failure: plan status,
    /// roster membership, then field contents. Nothing is mutated unless every
    /// check passes. On success the total is recomputed and completion is
    /// re-evaluated against `now`.
    pub fn add(
        plan: &mut SavingsPlan,
        draft: ContributionDraft,
        now: DateTime<Utc>,
        accepted_methods: &[String],
    ) -> ServiceResult<Uuid> {
        if !plan.is_active() {
            return Err(SavingsError::PlanCompleted(plan.plan_code().to_string()));
        }
        if !plan.has_participant(&draft.participant_name) {
            return Err(SavingsError::UnknownParticipant {
                plan_code: plan.plan_code().to_string(),
                participant: draft.participant_name,
            });
        }
        Self::validate_fields(plan, &draft, accepted_methods)?;

        let contribution = Contribution::record(draft, now);
        let id = contribution.id;
        plan.append_contribution(contribution);
        CompletionEvaluator::evaluate(plan, now);
        Ok(id)
    }

    fn validate_fields(
        plan: &SavingsPlan,
        draft: &ContributionDraft,
        accepted_methods: &[String],
    ) -> Result<(), ValidationError> {
        if !draft.amount.is_finite() {
            return Err(ValidationError::invalid("amount", "amount must be a number"));
        }
        if draft.amount <= 0.0 {
            return Err(ValidationError::out_of_range(
                "amount",
                format!("amount must be positive, got {}", draft.amount),
            ));
        }
        let method = draft.payment_method.trim();
        if method.is_empty() {
            return Err(ValidationError::missing(
                "paymentMethod",
                "payment method is required",
            ));
        }
        if !accepted_methods.is_empty() && !accepted_methods.iter().any(|m| m == method) {
            return Err(ValidationError::invalid(
                "paymentMethod",
                format!("`{}` is not an accepted payment method", method),
            ));
        }
        if draft.month == 0 {
            return Err(ValidationError::missing("month", "month is required"));
        }
        if !plan.accepts_month(draft.month) {
            return Err(ValidationError::out_of_range(
                "month",
                format!(
                    "month must be between 1 and {}, got {}",
                    plan.duration_months(),
                    draft.month
                ),
            ));
        }
        Ok(())
    }
}
