//! End-to-end tests for the `budgetcal` binary.
//!
//! Every test runs against its own temporary data directory passed with
//! `--dir`, so nothing touches the real configuration.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const EXAMPLE_PLAN: &str = r#"
monthly_discretionary: "3300.00"
category_allocations:
  dining:
    amount: "507.72"
    strategy: { type: clustered, days: 4 }
  coffee:
    amount: "676.96"
    strategy: { type: spread, days: 12, eligible: weekdays }
  groceries:
    amount: "2115.32"
    strategy: { type: spread }
fixed_expenses:
  rent: { amount: "1400.00", day: 1 }
"#;

fn budgetcal(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("budgetcal").unwrap();
    cmd.arg("--dir").arg(dir).env_remove("BUDGET_CALENDAR_DIR");
    cmd
}

fn write_plan(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("plan.yaml");
    fs::write(&path, contents).unwrap();
    path
}

fn build_march(dir: &Path) {
    let plan = write_plan(dir, EXAMPLE_PLAN);
    budgetcal(dir)
        .args(["build", "--month", "2025-03"])
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Built 2025-03 calendar for 'default': $4700.00 across 31 days",
        ));
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("budgetcal")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("rebalance"))
        .stdout(predicate::str::contains("ledger"));
}

#[test]
fn init_writes_settings() {
    let temp = TempDir::new().unwrap();
    budgetcal(temp.path())
        .args(["init", "--user", "alex", "--categories", "dining,coffee,rent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Default user: alex"))
        .stdout(predicate::str::contains("dining, coffee, rent").or(
            predicate::str::contains("coffee, dining, rent"),
        ));

    assert!(temp.path().join("config.json").exists());

    budgetcal(temp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized:         true"));
}

#[test]
fn build_refuses_to_overwrite_without_force() {
    let temp = TempDir::new().unwrap();
    build_march(temp.path());

    let plan = temp.path().join("plan.yaml");
    budgetcal(temp.path())
        .args(["build", "--month", "2025-03"])
        .arg(&plan)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    budgetcal(temp.path())
        .args(["build", "--month", "2025-03", "--force"])
        .arg(&plan)
        .assert()
        .success();
}

#[test]
fn build_rejects_imbalanced_plan() {
    let temp = TempDir::new().unwrap();
    let plan = write_plan(
        temp.path(),
        r#"
monthly_discretionary: "100.00"
category_allocations:
  dining: { amount: "60.00", strategy: { type: clustered } }
  coffee: { amount: "30.00", strategy: { type: spread } }
"#,
    );

    budgetcal(temp.path())
        .args(["build", "--month", "2025-03"])
        .arg(&plan)
        .assert()
        .failure();

    assert!(!temp
        .path()
        .join("data/calendars/default/2025-03.json")
        .exists());
}

#[test]
fn spend_rebalance_and_ledger() {
    let temp = TempDir::new().unwrap();
    build_march(temp.path());

    budgetcal(temp.path())
        .args(["spend", "dining", "250", "--date", "2025-03-07"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Recorded $250.00 of dining on 2025-03-07",
        ));

    // Dry run reports the move but leaves the stored calendar alone
    let stored = temp.path().join("data/calendars/default/2025-03.json");
    let before = fs::read_to_string(&stored).unwrap();
    budgetcal(temp.path())
        .args(["rebalance", "--month", "2025-03", "--as-of", "2025-03-07", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run: nothing was saved."));
    assert_eq!(fs::read_to_string(&stored).unwrap(), before);

    budgetcal(temp.path())
        .args(["rebalance", "--month", "2025-03", "--as-of", "2025-03-07"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Moved $126.93 from Sat Mar 8 to cover Fri Mar 7's dining overspend",
        ))
        .stdout(predicate::str::contains(
            "Moved $54.83 of groceries budget from Sat Mar 8",
        ));

    budgetcal(temp.path())
        .args(["ledger", "--month", "2025-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transfers for 'default' in 2025-03"))
        .stdout(predicate::str::contains("Sat Mar 8 (dining)"));

    budgetcal(temp.path())
        .args(["ledger", "--month", "2025-03", "--history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BUILD Calendar default/2025-03"))
        .stdout(predicate::str::contains("SPEND Calendar default/2025-03"))
        .stdout(predicate::str::contains("REDISTRIBUTE Calendar default/2025-03"));

    // Nothing left to move on a second pass
    budgetcal(temp.path())
        .args(["redistribute", "--month", "2025-03", "--as-of", "2025-03-07"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Calendar is balanced; nothing to move.",
        ));

    budgetcal(temp.path())
        .args(["show", "--month", "2025-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Month total: $4700.00"));
}

#[test]
fn import_reports_bad_rows() {
    let temp = TempDir::new().unwrap();
    build_march(temp.path());

    let csv = temp.path().join("spending.csv");
    fs::write(
        &csv,
        "date,category,amount\n\
         2025-03-03,coffee,4.50\n\
         2025-03-04,groceries,52.10\n\
         2025-03-05,yachts,900.00\n\
         2025-04-01,coffee,3.00\n",
    )
    .unwrap();

    budgetcal(temp.path())
        .args(["import", "--month", "2025-03"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 of 4 rows ($56.60 total)"))
        .stdout(predicate::str::contains("row 3:"))
        .stdout(predicate::str::contains("row 4:"));
}

#[test]
fn show_list_names_stored_months() {
    let temp = TempDir::new().unwrap();
    build_march(temp.path());

    budgetcal(temp.path())
        .args(["show", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-03"));
}

#[test]
fn missing_calendar_is_an_error() {
    let temp = TempDir::new().unwrap();
    budgetcal(temp.path())
        .args(["show", "--month", "2031-01"])
        .assert()
        .failure();
}
