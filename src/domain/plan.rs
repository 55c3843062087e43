//! The savings plan aggregate: identity, roster, duration, ledger and status.

use std::{collections::HashSet, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{common::NamedEntity, contribution::Contribution, ledger::ContributionLedger},
    errors::ValidationError,
};

pub const MIN_PARTICIPANTS: usize = 2;
pub const MAX_PARTICIPANTS: usize = 5;
pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Lifecycle state of a plan. `Completed` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    #[default]
    Active,
    Completed,
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlanStatus::Active => "active",
            PlanStatus::Completed => "completed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl NamedEntity for Participant {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Caller input for plan creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDraft {
    pub plan_name: String,
    pub participants: Vec<String>,
    pub duration_months: u32,
}

impl PlanDraft {
    pub fn new<I, S>(plan_name: impl Into<String>, participants: I, duration_months: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            plan_name: plan_name.into(),
            participants: participants.into_iter().map(Into::into).collect(),
            duration_months,
        }
    }

    /// Returns a trimmed copy after checking every creation constraint.
    pub fn normalized(&self) -> Result<PlanDraft, ValidationError> {
        let plan_name = self.plan_name.trim();
        if plan_name.is_empty() {
            return Err(ValidationError::missing("planName", "plan name is required"));
        }
        if self.participants.is_empty() {
            return Err(ValidationError::missing(
                "participants",
                "at least two participant names are required",
            ));
        }
        let count = self.participants.len();
        if !(MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&count) {
            return Err(ValidationError::out_of_range(
                "participants",
                format!(
                    "expected {} to {} names, got {}",
                    MIN_PARTICIPANTS, MAX_PARTICIPANTS, count
                ),
            ));
        }
        let mut seen = HashSet::new();
        let mut participants = Vec::with_capacity(count);
        for raw in &self.participants {
            let name = raw.trim();
            if name.is_empty() {
                return Err(ValidationError::missing(
                    "participants",
                    "participant names cannot be blank",
                ));
            }
            if !seen.insert(name) {
                return Err(ValidationError::duplicate(
                    "participants",
                    format!("`{}` is listed more than once", name),
                ));
            }
            participants.push(name.to_string());
        }
        if self.duration_months == 0 {
            return Err(ValidationError::out_of_range(
                "durationMonths",
                "duration must be at least one month",
            ));
        }
        Ok(PlanDraft {
            plan_name: plan_name.to_string(),
            participants,
            duration_months: self.duration_months,
        })
    }
}

/// A group savings plan.
///
/// Identity fields (`plan_code`, `start_date`, roster, duration) are fixed at
/// construction. The only mutations are ledger appends and the one-way
/// completion transition; `total_saved` is recomputed from the ledger on every
/// append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPlan {
    plan_name: String,
    plan_code: String,
    participants: Vec<Participant>,
    duration_months: u32,
    #[serde(default)]
    contributions: ContributionLedger,
    #[serde(default)]
    total_saved: f64,
    #[serde(default)]
    status: PlanStatus,
    start_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    version: u64,
    #[serde(default = "SavingsPlan::schema_version_default")]
    schema_version: u8,
}

impl SavingsPlan {
    /// Builds an active plan with an empty ledger, starting at `start_date`.
    pub fn new(
        plan_code: impl Into<String>,
        draft: &PlanDraft,
        start_date: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let draft = draft.normalized()?;
        Ok(Self {
            plan_name: draft.plan_name,
            plan_code: plan_code.into(),
            participants: draft.participants.into_iter().map(Participant::new).collect(),
            duration_months: draft.duration_months,
            contributions: ContributionLedger::new(),
            total_saved: 0.0,
            status: PlanStatus::Active,
            start_date,
            created_at: start_date,
            updated_at: start_date,
            version: 0,
            schema_version: CURRENT_SCHEMA_VERSION,
        })
    }

    pub fn plan_name(&self) -> &str {
        &self.plan_name
    }

    pub fn plan_code(&self) -> &str {
        &self.plan_code
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn duration_months(&self) -> u32 {
        self.duration_months
    }

    pub fn contributions(&self) -> &ContributionLedger {
        &self.contributions
    }

    pub fn total_saved(&self) -> f64 {
        self.total_saved
    }

    pub fn status(&self) -> PlanStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == PlanStatus::Active
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Optimistic-concurrency counter maintained by the store.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Set only by the crate's stores after a successful compare-and-swap.
    pub(crate) fn stamp_version(&mut self, version: u64) {
        self.version = version;
    }

    pub fn schema_version(&self) -> u8 {
        self.schema_version
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    /// Case-sensitive roster membership.
    pub fn has_participant(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p.is_named(name))
    }

    pub fn accepts_month(&self, month: u32) -> bool {
        (1..=self.duration_months).contains(&month)
    }

    /// Appends an already validated contribution and recomputes the total.
    pub(crate) fn append_contribution(&mut self, contribution: Contribution) {
        self.contributions.append(contribution);
        self.recompute_total();
        self.touch(self.contributions.last().map(|c| c.created_at));
    }

    /// Flips `Active` to `Completed`. Returns `false` when already completed.
    pub(crate) fn mark_completed(&mut self, at: DateTime<Utc>) -> bool {
        if self.status == PlanStatus::Completed {
            return false;
        }
        self.status = PlanStatus::Completed;
        self.touch(Some(at));
        true
    }

    fn recompute_total(&mut self) {
        self.total_saved = self.contributions.total();
    }

    fn touch(&mut self, at: Option<DateTime<Utc>>) {
        if let Some(at) = at {
            if at > self.updated_at {
                self.updated_at = at;
            }
        }
    }

    /// Lists broken invariants in a plan snapshot (for example a hand-edited file).
    pub fn integrity_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let count = self.participants.len();
        if !(MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&count) {
            issues.push(format!("plan has {} participants", count));
        }
        let unique: HashSet<_> = self.participants.iter().map(|p| p.name.as_str()).collect();
        if unique.len() != count {
            issues.push("participant names are not unique".into());
        }
        for contribution in &self.contributions {
            if !self.has_participant(&contribution.participant_name) {
                issues.push(format!(
                    "contribution {} references unknown participant `{}`",
                    contribution.id, contribution.participant_name
                ));
            }
            if !self.accepts_month(contribution.month) {
                issues.push(format!(
                    "contribution {} declares month {} outside 1..={}",
                    contribution.id, contribution.month, self.duration_months
                ));
            }
        }
        let expected = self.contributions.total();
        if (expected - self.total_saved).abs() > f64::EPSILON * expected.abs().max(1.0) {
            issues.push(format!(
                "cached total {} differs from ledger sum {}",
                self.total_saved, expected
            ));
        }
        issues
    }

    /// Restores the cached total from the ledger after loading a drifted snapshot.
    pub fn resync_total(&mut self) {
        self.recompute_total();
    }
}
