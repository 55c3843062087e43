use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    core::time::MonthClock,
    domain::{MonthBuckets, ParticipantTotal, SavingsPlan},
};

/// Month-grouped projection of a plan's ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyContributions {
    pub contributions_by_month: MonthBuckets,
    pub total_saved: f64,
}

/// Plan state plus the values derived from the clock and the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOverview {
    pub plan: SavingsPlan,
    pub current_month: u32,
    pub elapsed_months: i64,
    pub progress_percent: f64,
    pub participant_totals: Vec<ParticipantTotal>,
}

pub struct SummaryService;

impl SummaryService {
    pub fn by_month(plan: &SavingsPlan) -> MonthlyContributions {
        MonthlyContributions {
            contributions_by_month: plan.contributions().by_month(plan.duration_months()),
            total_saved: plan.total_saved(),
        }
    }

    pub fn overview(plan: &SavingsPlan, now: DateTime<Utc>) -> PlanOverview {
        let current_month =
            MonthClock::current_month_index(plan.start_date(), now, plan.duration_months());
        let progress_percent =
            f64::from(current_month) / f64::from(plan.duration_months().max(1)) * 100.0;
        PlanOverview {
            plan: plan.clone(),
            current_month,
            elapsed_months: MonthClock::elapsed_months(plan.start_date(), now),
            progress_percent,
            participant_totals: plan
                .contributions()
                .totals_by_participant(plan.participants()),
        }
    }
}
