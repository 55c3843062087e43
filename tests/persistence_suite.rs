mod common;

use std::{fs, sync::Arc};

use common::{contribution, plan_start, setup_test_env, temp_base};
use groupsave_core::{
    config::Config, FixedClock, JsonPlanStore, PlanDraft, PlanManager, PlanStatus, PlanStore,
    SavingsError, StoreError,
};
use serde_json::Value;

fn reopen(env: &common::TestEnv) -> PlanManager {
    let store = JsonPlanStore::new(env.base.join("data")).expect("reopen store");
    PlanManager::new(Box::new(store), Config::default()).with_clock(env.clock.clone())
}

#[test]
fn plans_survive_a_fresh_store_handle() {
    let env = setup_test_env();
    let plan = env
        .manager
        .create_plan(&PlanDraft::new("Rent", ["Ada", "Bo", "Cy"], 6))
        .unwrap();
    env.manager
        .add_contribution(plan.plan_code(), contribution("Cy", 75.25, "Mobile Money", 1))
        .unwrap();

    let reopened = reopen(&env);
    let loaded = reopened.get_plan(plan.plan_code()).unwrap();
    assert_eq!(loaded.total_saved(), 75.25);
    assert_eq!(loaded.contributions().len(), 1);
    assert_eq!(loaded.version(), 1);
    assert_eq!(reopened.list_codes().unwrap(), vec![plan.plan_code().to_string()]);
}

#[test]
fn snapshots_use_camel_case_documents() {
    let env = setup_test_env();
    let plan = env
        .manager
        .create_plan(&PlanDraft::new("Rent", ["Ada", "Bo"], 2))
        .unwrap();
    env.manager
        .add_contribution(plan.plan_code(), contribution("Ada", 12.0, "Cash", 2))
        .unwrap();

    let path = env.store.plan_path(plan.plan_code()).unwrap();
    let doc: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(doc["planCode"], plan.plan_code());
    assert_eq!(doc["durationMonths"], 2);
    assert_eq!(doc["status"], "active");
    assert_eq!(doc["totalSaved"], 12.0);
    assert_eq!(doc["participants"][0]["name"], "Ada");
    assert_eq!(doc["contributions"][0]["paymentMethod"], "Cash");
    assert_eq!(doc["contributions"][0]["date"], "2024-03-20");
}

#[test]
fn lazy_completion_is_written_back() {
    let env = setup_test_env();
    let code = env
        .manager
        .create_plan(&PlanDraft::new("Rent", ["Ada", "Bo"], 1))
        .unwrap()
        .plan_code()
        .to_string();

    env.clock.advance_months(1);
    env.manager.get_plan(&code).unwrap();

    let on_disk = env.store.load(&code).unwrap().unwrap();
    assert_eq!(on_disk.status(), PlanStatus::Completed);
    assert_eq!(on_disk.version(), 1);

    env.manager.get_plan(&code).unwrap();
    assert_eq!(env.store.load(&code).unwrap().unwrap().version(), 1);
}

#[test]
fn month_view_does_not_write() {
    let env = setup_test_env();
    let code = env
        .manager
        .create_plan(&PlanDraft::new("Rent", ["Ada", "Bo"], 1))
        .unwrap()
        .plan_code()
        .to_string();

    env.clock.advance_months(4);
    let view = env.manager.contributions_by_month(&code).unwrap();
    assert_eq!(view.contributions_by_month.len(), 1);
    assert_eq!(env.store.load(&code).unwrap().unwrap().status(), PlanStatus::Active);
}

#[test]
fn edited_snapshot_months_stay_within_the_plan_duration() {
    let env = setup_test_env();
    let code = env
        .manager
        .create_plan(&PlanDraft::new("Rent", ["Ada", "Bo"], 3))
        .unwrap()
        .plan_code()
        .to_string();
    env.manager
        .add_contribution(&code, contribution("Ada", 8.0, "Cash", 2))
        .unwrap();
    env.manager
        .add_contribution(&code, contribution("Bo", 5.0, "Cash", 3))
        .unwrap();

    let path = env.store.plan_path(&code).unwrap();
    let mut doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    doc["contributions"][1]["month"] = Value::from(9);
    fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

    let view = env.manager.contributions_by_month(&code).unwrap();
    let months: Vec<u32> = view.contributions_by_month.keys().copied().collect();
    assert_eq!(months, vec![1, 2, 3]);
    assert_eq!(view.contributions_by_month[&2].len(), 1);
    assert!(view.contributions_by_month[&3].is_empty());
}

#[test]
fn unreadable_snapshots_surface_store_errors() {
    let env = setup_test_env();
    let code = env
        .manager
        .create_plan(&PlanDraft::new("Rent", ["Ada", "Bo"], 2))
        .unwrap()
        .plan_code()
        .to_string();
    let path = env.store.plan_path(&code).unwrap();

    fs::write(&path, "{ not json").unwrap();
    let err = env.manager.get_plan(&code).unwrap_err();
    assert!(matches!(err, SavingsError::Store(StoreError::Serde(_))), "got {err:?}");

    let mut doc: Value = serde_json::to_value(
        groupsave_core::SavingsPlan::new(&code, &PlanDraft::new("Rent", ["Ada", "Bo"], 2), plan_start())
            .unwrap(),
    )
    .unwrap();
    doc["schemaVersion"] = Value::from(7);
    fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();
    let err = env
        .manager
        .add_contribution(&code, contribution("Ada", 1.0, "Cash", 1))
        .unwrap_err();
    assert!(
        matches!(err, SavingsError::Store(StoreError::UnsupportedSchema { found: 7, .. })),
        "got {err:?}"
    );
}

#[test]
fn configured_data_root_and_methods_are_honoured() {
    let env = setup_test_env();
    let data_root = temp_base().join("custom-root");
    let config = Config {
        data_root: Some(data_root.clone()),
        payment_methods: vec!["Barter".into()],
        ..Config::default()
    };
    env.config_manager.save(&config).unwrap();

    let loaded = env.config_manager.load().unwrap();
    let store = JsonPlanStore::new(loaded.resolve_data_root()).unwrap();
    let manager = PlanManager::new(Box::new(store), loaded)
        .with_clock(Arc::new(FixedClock::new(plan_start())));
    let code = manager
        .create_plan(&PlanDraft::new("Swap", ["Ada", "Bo"], 2))
        .unwrap()
        .plan_code()
        .to_string();

    assert!(data_root.join("plans").join(format!("{code}.json")).is_file());
    assert!(manager
        .add_contribution(&code, contribution("Ada", 3.0, "Barter", 1))
        .is_ok());
    assert!(matches!(
        manager
            .add_contribution(&code, contribution("Ada", 3.0, "Cash", 1))
            .unwrap_err(),
        SavingsError::Validation(_)
    ));
}

#[test]
fn stray_files_are_ignored_when_listing() {
    let env = setup_test_env();
    let code = env
        .manager
        .create_plan(&PlanDraft::new("Rent", ["Ada", "Bo"], 2))
        .unwrap()
        .plan_code()
        .to_string();
    fs::write(env.store.plans_dir().join("notes.txt"), "hello").unwrap();
    fs::create_dir_all(env.store.plans_dir().join("archive.json")).unwrap();

    assert_eq!(env.manager.list_codes().unwrap(), vec![code]);
}
