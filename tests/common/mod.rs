#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, sync::Mutex};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use groupsave_core::{
    config::{Config, ConfigManager},
    ContributionDraft, FixedClock, JsonPlanStore, PlanManager,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub struct TestEnv {
    pub manager: PlanManager,
    pub clock: Arc<FixedClock>,
    pub store: Arc<JsonPlanStore>,
    pub config_manager: ConfigManager,
    pub base: PathBuf,
}

pub fn plan_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap()
}

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates an isolated manager over a JSON store in a unique directory.
pub fn setup_test_env() -> TestEnv {
    let base = temp_base();
    let clock = Arc::new(FixedClock::new(plan_start()));
    let store = Arc::new(JsonPlanStore::new(base.join("data")).expect("create json plan store"));
    let manager = PlanManager::new(Box::new(store.clone()), Config::default())
        .with_clock(clock.clone());
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");

    TestEnv {
        manager,
        clock,
        store,
        config_manager,
        base,
    }
}

pub fn contribution(name: &str, amount: f64, method: &str, month: u32) -> ContributionDraft {
    ContributionDraft::new(
        name,
        amount,
        method,
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
        month,
    )
}
