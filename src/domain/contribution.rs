use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Amounted, Identifiable};

/// Caller-supplied input for a new contribution.
///
/// `month` names the billing period the money belongs to; it is not derived
/// from `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDraft {
    pub participant_name: String,
    pub amount: f64,
    pub payment_method: String,
    pub date: NaiveDate,
    pub month: u32,
}

impl ContributionDraft {
    pub fn new(
        participant_name: impl Into<String>,
        amount: f64,
        payment_method: impl Into<String>,
        date: NaiveDate,
        month: u32,
    ) -> Self {
        Self {
            participant_name: participant_name.into(),
            amount,
            payment_method: payment_method.into(),
            date,
            month,
        }
    }
}

/// A contribution as recorded in a plan's ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub id: Uuid,
    pub participant_name: String,
    pub amount: f64,
    pub payment_method: String,
    pub date: NaiveDate,
    pub month: u32,
    pub created_at: DateTime<Utc>,
}

impl Contribution {
    /// Stamps a validated draft with an identifier and its record-creation time.
    pub fn record(draft: ContributionDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            participant_name: draft.participant_name,
            amount: draft.amount,
            payment_method: draft.payment_method.trim().to_string(),
            date: draft.date,
            month: draft.month,
            created_at,
        }
    }
}

impl Identifiable for Contribution {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Contribution {
    fn amount(&self) -> f64 {
        self.amount
    }
}
