use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

const BIN_NAME: &str = "expense";

fn expense(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("EXPENSE_TRACKER_DATA_DIR", data_dir.path())
        .env_remove("EXPENSE_TRACKER_USER")
        .env_remove("EXPENSE_LOG");
    cmd
}

/// Pull the full id out of the "  ID: ..." line printed after saving
fn saved_id(stdout: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    text.lines()
        .find_map(|line| line.trim().strip_prefix("ID: "))
        .expect("id line printed")
        .to_string()
}

// Stepping back 11 always clamps to January, so `--back 11 --forward 2`
// lands on March regardless of today's date.
const MARCH: [&str; 5] = ["month", "--back", "11", "--forward", "2"];

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    expense(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("spend").and(contains("month")).and(contains("year")));
}

#[test]
fn init_writes_settings() {
    let dir = TempDir::new().unwrap();
    expense(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Initialization complete!"));

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("data").is_dir());

    expense(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("already initialized"));
    expense(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(contains("Initialized:     yes"));
}

#[test]
fn month_without_data_prints_no_records() {
    let dir = TempDir::new().unwrap();
    expense(&dir)
        .arg("month")
        .assert()
        .success()
        .stdout(contains("No records"));
}

#[test]
fn month_overview_shows_totals() {
    let dir = TempDir::new().unwrap();
    expense(&dir)
        .args(["spend", "12.50", "-c", "Food", "-d", "2019-03-02"])
        .assert()
        .success();
    expense(&dir)
        .args(["spend", "30", "-c", "Rent", "-d", "2019-03-09", "-n", "March share"])
        .assert()
        .success();
    expense(&dir)
        .args(["income", "100", "-s", "Salary", "-d", "2019-03-01"])
        .assert()
        .success();

    expense(&dir)
        .args(MARCH)
        .assert()
        .success()
        .stdout(
            contains("March 2019")
                .and(contains("$100.00"))
                .and(contains("$42.50"))
                .and(contains("$57.50"))
                .and(contains("March share")),
        );
}

#[test]
fn year_overview_defaults_to_latest_year() {
    let dir = TempDir::new().unwrap();
    expense(&dir)
        .args(["spend", "5", "-c", "Food", "-d", "2019-06-01"])
        .assert()
        .success();
    expense(&dir)
        .args(["spend", "7", "-c", "Food", "-d", "2020-02-01"])
        .assert()
        .success();

    expense(&dir)
        .arg("year")
        .assert()
        .success()
        .stdout(contains("Year 2020").and(contains("earlier year available")));

    expense(&dir)
        .args(["year", "--back", "1"])
        .assert()
        .success()
        .stdout(contains("Year 2019").and(contains("later year available")));
}

#[test]
fn removed_record_disappears() {
    let dir = TempDir::new().unwrap();
    let output = expense(&dir)
        .args(["spend", "9.99", "-c", "Books", "-d", "2019-03-15"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let id = saved_id(&output.stdout);
    assert!(id.starts_with("rec-"));

    expense(&dir)
        .args(["remove", id.as_str()])
        .assert()
        .success()
        .stdout(contains("Removed record"));

    expense(&dir)
        .args(MARCH)
        .assert()
        .success()
        .stdout(contains("No records"));
}

#[test]
fn removed_income_disappears() {
    let dir = TempDir::new().unwrap();
    expense(&dir)
        .args(["spend", "3", "-c", "Coffee", "-d", "2019-03-04"])
        .assert()
        .success();
    let output = expense(&dir)
        .args(["income", "250", "-s", "Bonus", "-d", "2019-03-20"])
        .output()
        .unwrap();
    let id = saved_id(&output.stdout);

    expense(&dir)
        .args(["remove", id.as_str()])
        .assert()
        .success()
        .stdout(contains("Removed income"));

    expense(&dir)
        .args(MARCH)
        .assert()
        .success()
        .stdout(contains("Coffee").and(contains("Bonus").not()));
}

#[test]
fn removing_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    expense(&dir)
        .args(["spend", "3", "-c", "Coffee", "-d", "2019-03-04"])
        .assert()
        .success();

    expense(&dir)
        .args(["remove", "rec-00000000-0000-0000-0000-000000000000"])
        .assert()
        .failure()
        .stderr(contains("Failed to remove record"));
}

#[test]
fn invalid_amount_is_rejected() {
    let dir = TempDir::new().unwrap();
    expense(&dir)
        .args(["spend", "twelve", "-c", "Food"])
        .assert()
        .failure()
        .stderr(contains("Invalid amount"));
}

#[test]
fn users_are_kept_apart() {
    let dir = TempDir::new().unwrap();
    expense(&dir)
        .args(["--user", "alice", "spend", "20", "-c", "Gifts", "-d", "2019-03-10"])
        .assert()
        .success();

    expense(&dir)
        .args(["--user", "bob"])
        .args(MARCH)
        .assert()
        .success()
        .stdout(contains("No records"));

    expense(&dir)
        .args(["--user", "alice"])
        .args(MARCH)
        .assert()
        .success()
        .stdout(contains("Gifts"));
}

#[test]
fn malformed_event_file_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::write(
        dir.path().join("data").join("events.json"),
        r#"{"user-events": {"local": {"2019": {"spending": {"abc": 5}}}}}"#,
    )
    .unwrap();

    expense(&dir)
        .arg("month")
        .assert()
        .failure()
        .stderr(contains("Failed to fetch records"));
}
