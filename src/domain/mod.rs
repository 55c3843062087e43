//! Pure domain models for group savings plans. No I/O, no clock, no storage.

pub mod common;
pub mod contribution;
pub mod ledger;
pub mod plan;

pub use common::{Amounted, Identifiable, NamedEntity};
pub use contribution::{Contribution, ContributionDraft};
pub use ledger::{ContributionLedger, MonthBuckets, ParticipantTotal};
pub use plan::{
    Participant, PlanDraft, PlanStatus, SavingsPlan, CURRENT_SCHEMA_VERSION, MAX_PARTICIPANTS,
    MIN_PARTICIPANTS,
};
