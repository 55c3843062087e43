//! Append-only contribution log and the read-time projections built on it.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    common::{find_by_id, sum_amounts},
    contribution::Contribution,
    plan::Participant,
};

/// Contributions grouped by their declared month, keyed `1..=duration_months`.
pub type MonthBuckets = BTreeMap<u32, Vec<Contribution>>;

/// Ordered, append-only record of a plan's contributions.
///
/// Insertion order is ledger order. Entries are never sorted, edited or removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContributionLedger {
    entries: Vec<Contribution>,
}

impl ContributionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the plan aggregate appends, after it has validated the record.
    pub(crate) fn append(&mut self, contribution: Contribution) {
        self.entries.push(contribution);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Contribution> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Contribution] {
        &self.entries
    }

    pub fn last(&self) -> Option<&Contribution> {
        self.entries.last()
    }

    /// Full sum over every entry.
    pub fn total(&self) -> f64 {
        sum_amounts(&self.entries)
    }

    pub fn get(&self, id: Uuid) -> Option<&Contribution> {
        find_by_id(&self.entries, id)
    }

    /// Newest entries first, by ledger position rather than by `date`.
    pub fn recent_first(&self) -> impl Iterator<Item = &Contribution> {
        self.entries.iter().rev()
    }

    /// Partitions the ledger into exactly one bucket per month `1..=duration_months`,
    /// including empty months. Entries declaring a month outside that range
    /// belong to no bucket.
    pub fn by_month(&self, duration_months: u32) -> MonthBuckets {
        let mut buckets: MonthBuckets = (1..=duration_months).map(|m| (m, Vec::new())).collect();
        for contribution in &self.entries {
            if let Some(bucket) = buckets.get_mut(&contribution.month) {
                bucket.push(contribution.clone());
            }
        }
        buckets
    }

    /// Per-member totals in roster order; members without contributions report zero.
    pub fn totals_by_participant(&self, roster: &[Participant]) -> Vec<ParticipantTotal> {
        let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
        for contribution in &self.entries {
            let slot = sums
                .entry(contribution.participant_name.as_str())
                .or_insert((0.0, 0));
            slot.0 += contribution.amount;
            slot.1 += 1;
        }
        roster
            .iter()
            .map(|participant| {
                let (total, count) = sums
                    .get(participant.name.as_str())
                    .copied()
                    .unwrap_or((0.0, 0));
                ParticipantTotal {
                    name: participant.name.clone(),
                    total,
                    contribution_count: count,
                }
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ContributionLedger {
    type Item = &'a Contribution;
    type IntoIter = std::slice::Iter<'a, Contribution>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Aggregated contributions for a single participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantTotal {
    pub name: String,
    pub total: f64,
    pub contribution_count: usize,
}
