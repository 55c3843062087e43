//! Facade that coordinates plan state, persistence, the clock and code assignment.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    core::{
        plan_code::{PlanCodeGenerator, RandomPlanCodes},
        services::{
            ContributionService, MonthlyContributions, PlanOverview, PlanService,
            ServiceResult, SummaryService,
        },
        time::{Clock, SystemClock},
    },
    domain::{ContributionDraft, PlanDraft, SavingsPlan},
    errors::{SavingsError, StoreError},
    storage::PlanStore,
};

/// Entry point for the four plan operations exposed to a transport layer.
///
/// The store handle is owned by the caller's composition root; the manager
/// never opens or closes it.
pub struct PlanManager {
    store: Box<dyn PlanStore>,
    clock: Box<dyn Clock>,
    codes: Box<dyn PlanCodeGenerator>,
    config: Config,
    plan_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl PlanManager {
    pub fn new(store: Box<dyn PlanStore>, config: Config) -> Self {
        Self {
            store,
            clock: Box::new(SystemClock),
            codes: Box::new(RandomPlanCodes),
            config: config.normalized(),
            plan_locks: DashMap::new(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_code_generator(mut self, codes: impl PlanCodeGenerator + 'static) -> Self {
        self.codes = Box::new(codes);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &dyn PlanStore {
        self.store.as_ref()
    }

    /// Validates the draft, then assigns a unique code and inserts the plan.
    ///
    /// Each attempt generates a fresh candidate. A candidate that the store
    /// already holds, or that loses an insert race, costs one attempt.
    pub fn create_plan(&self, draft: &PlanDraft) -> ServiceResult<SavingsPlan> {
        let draft = draft.normalized()?;
        let limit = self.config.code_retry_limit.max(1);
        for attempt in 1..=limit {
            let code = self.codes.generate();
            if self.store.contains(&code)? {
                debug!(plan_code = %code, attempt, "plan code already taken");
                continue;
            }
            let plan = PlanService::build(code.clone(), &draft, self.clock.now())?;
            match self.store.insert(&plan) {
                Ok(()) => {
                    info!(
                        plan_code = %code,
                        participants = plan.participants().len(),
                        duration_months = plan.duration_months(),
                        "savings plan created"
                    );
                    return Ok(plan);
                }
                Err(StoreError::DuplicateCode(_)) => {
                    debug!(plan_code = %code, attempt, "plan code claimed concurrently");
                }
                Err(err) => return Err(err.into()),
            }
        }
        warn!(attempts = limit, "unable to assign a unique plan code");
        Err(SavingsError::Conflict(format!(
            "could not assign a unique plan code after {} attempts",
            limit
        )))
    }

    /// Loads a plan, completing and persisting it first if its duration has elapsed.
    pub fn get_plan(&self, plan_code: &str) -> ServiceResult<SavingsPlan> {
        self.read_modify_write(plan_code, |_, _| Ok(()))
            .map(|(plan, ())| plan)
    }

    pub fn get_overview(&self, plan_code: &str) -> ServiceResult<PlanOverview> {
        let plan = self.get_plan(plan_code)?;
        Ok(SummaryService::overview(&plan, self.clock.now()))
    }

    /// Appends a contribution and persists the updated plan as one unit.
    pub fn add_contribution(
        &self,
        plan_code: &str,
        draft: ContributionDraft,
    ) -> ServiceResult<SavingsPlan> {
        let methods = self.config.payment_methods.clone();
        let (plan, id) = self.read_modify_write(plan_code, |plan, now| {
            ContributionService::add(plan, draft.clone(), now, &methods)
        })?;
        info!(
            plan_code = %plan.plan_code(),
            contribution_id = %id,
            total_saved = plan.total_saved(),
            "contribution recorded"
        );
        Ok(plan)
    }

    /// Pure projection; does not evaluate completion.
    pub fn contributions_by_month(&self, plan_code: &str) -> ServiceResult<MonthlyContributions> {
        let plan = self.load_existing(plan_code)?;
        Ok(SummaryService::by_month(&plan))
    }

    pub fn list_codes(&self) -> ServiceResult<Vec<String>> {
        Ok(self.store.list_codes()?)
    }

    fn load_existing(&self, plan_code: &str) -> ServiceResult<SavingsPlan> {
        self.store
            .load(plan_code)?
            .ok_or_else(|| SavingsError::NotFound(plan_code.to_string()))
    }

    fn plan_lock(&self, plan_code: &str) -> Arc<Mutex<()>> {
        self.plan_locks
            .entry(plan_code.to_string())
            .or_default()
            .clone()
    }

    /// Drops the table entry once no caller holds a handle to it.
    fn release_plan_lock(&self, plan_code: &str, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.plan_locks.remove_if(plan_code, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Load, evaluate completion, apply `op`, and persist if anything changed.
    ///
    /// Calls for the same code are serialized within this manager; the store's
    /// version check catches writers outside it, in which case the whole
    /// sequence is retried against a fresh load. A failed `op` still persists a
    /// completion transition triggered by the load. Unknown codes are rejected
    /// before a lock entry is created.
    fn read_modify_write<T, F>(&self, plan_code: &str, op: F) -> ServiceResult<(SavingsPlan, T)>
    where
        F: FnMut(&mut SavingsPlan, DateTime<Utc>) -> ServiceResult<T>,
    {
        if !self.store.contains(plan_code)? {
            return Err(SavingsError::NotFound(plan_code.to_string()));
        }
        let lock = self.plan_lock(plan_code);
        let outcome = {
            let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            self.read_modify_write_locked(plan_code, op)
        };
        self.release_plan_lock(plan_code, lock);
        outcome
    }

    fn read_modify_write_locked<T, F>(
        &self,
        plan_code: &str,
        mut op: F,
    ) -> ServiceResult<(SavingsPlan, T)>
    where
        F: FnMut(&mut SavingsPlan, DateTime<Utc>) -> ServiceResult<T>,
    {
        let limit = self.config.mutation_retry_limit.max(1);
        for attempt in 1..=limit {
            let mut plan = self.load_existing(plan_code)?;
            let before = plan.clone();
            let now = self.clock.now();

            PlanService::refresh_status(&mut plan, now);
            let outcome = op(&mut plan, now);

            if plan != before {
                match self.store.save(&mut plan, before.version()) {
                    Ok(()) => {}
                    Err(StoreError::VersionConflict { found, .. }) => {
                        debug!(plan_code, attempt, found, "concurrent update, retrying");
                        continue;
                    }
                    Err(StoreError::Missing(code)) => return Err(SavingsError::NotFound(code)),
                    Err(err) => return Err(err.into()),
                }
                if before.is_active() && !plan.is_active() {
                    info!(plan_code, "savings plan completed");
                }
            }
            return outcome.map(|value| (plan, value));
        }
        warn!(plan_code, attempts = limit, "plan update abandoned after conflicts");
        Err(SavingsError::Conflict(format!(
            "plan {} kept changing; gave up after {} attempts",
            plan_code, limit
        )))
    }
}
