use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("groupsave_cli").unwrap();
    cmd.env("GROUPSAVE_HOME", home.path()).env("RUST_LOG", "off");
    cmd
}

fn stdout_json(output: std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("json on stdout")
}

#[test]
fn create_contribute_and_inspect() {
    let home = TempDir::new().unwrap();

    let created = cli(&home)
        .args(["create", "Trip Fund", "3", "Ada", "Bo"])
        .output()
        .unwrap();
    assert!(created.status.success());
    let plan = stdout_json(created);
    let code = plan["planCode"].as_str().unwrap().to_string();
    assert_eq!(plan["status"], "active");
    assert!(home.path().join("plans").join(format!("{code}.json")).is_file());

    let updated = cli(&home)
        .args(["contribute", code.as_str(), "Ada", "100.50", "Cash", "2024-01-15", "1"])
        .output()
        .unwrap();
    assert!(updated.status.success());
    assert_eq!(stdout_json(updated)["totalSaved"], 100.5);

    let months = stdout_json(cli(&home).args(["months", code.as_str()]).output().unwrap());
    assert_eq!(months["contributionsByMonth"]["1"][0]["participantName"], "Ada");
    assert_eq!(months["contributionsByMonth"]["3"], Value::Array(vec![]));

    let overview = stdout_json(cli(&home).args(["show", code.as_str()]).output().unwrap());
    assert_eq!(overview["currentMonth"], 1);
    assert_eq!(overview["plan"]["planCode"], code.as_str());

    cli(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(contains(code.as_str()));
}

#[test]
fn domain_errors_exit_non_zero() {
    let home = TempDir::new().unwrap();

    cli(&home)
        .args(["show", "SAVE-NONE"])
        .assert()
        .failure()
        .stderr(contains("Error: Plan not found: SAVE-NONE"));

    cli(&home)
        .args(["create", "Solo", "6", "OnlyOne"])
        .assert()
        .failure()
        .stderr(contains("Validation failed"));

    cli(&home)
        .args(["contribute", "SAVE-NONE", "Ada", "ten", "Cash", "2024-01-15", "1"])
        .assert()
        .failure()
        .stderr(contains("invalid amount"));
}

#[test]
fn missing_command_prints_usage() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .assert()
        .failure()
        .stderr(contains("Usage: groupsave_cli"));
}
