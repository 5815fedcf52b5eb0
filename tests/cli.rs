use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

/// A `ledger` command isolated to its own config dir and working file
fn ledger(dir: &TempDir, file: &str) -> Command {
    let mut cmd = Command::cargo_bin("ledger").unwrap();
    cmd.env("POCKET_LEDGER_DIR", dir.path())
        .env_remove("POCKET_LEDGER_FILE")
        .env_remove("RUST_LOG")
        .arg("--file")
        .arg(dir.path().join(file));
    cmd
}

fn run(dir: &TempDir, file: &str, args: &[&str]) {
    ledger(dir, file).args(args).assert().success();
}

fn seed_wallet_scenario(dir: &TempDir, file: &str) {
    run(dir, file, &["account", "create", "Wallet"]);
    run(dir, file, &["category", "create", "Food", "--kind", "expense"]);
    run(
        dir,
        file,
        &[
            "operation", "add", "expense", "Wallet", "Food", "50.00", "--date", "2024-01-10",
        ],
    );
}

#[test]
fn wallet_scenario_end_to_end() {
    let dir = TempDir::new().unwrap();
    seed_wallet_scenario(&dir, "ledger.json");

    ledger(&dir, "ledger.json")
        .args(["account", "recalculate", "Wallet"])
        .assert()
        .success()
        .stdout(contains("-50.00"));

    ledger(&dir, "ledger.json")
        .args(["account", "delete", "1"])
        .assert()
        .failure()
        .stderr(contains("referenced by 1 operation(s)"));

    run(&dir, "ledger.json", &["operation", "delete", "1"]);
    run(&dir, "ledger.json", &["account", "delete", "1"]);

    ledger(&dir, "ledger.json")
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(contains("No accounts found."));
}

#[test]
fn kind_mismatch_is_rejected_and_nothing_saved() {
    let dir = TempDir::new().unwrap();
    seed_wallet_scenario(&dir, "ledger.json");

    ledger(&dir, "ledger.json")
        .args(["operation", "add", "income", "Wallet", "Food", "10", "--date", "2024-01-11"])
        .assert()
        .failure()
        .stderr(contains("does not match category kind"));

    let saved = std::fs::read_to_string(dir.path().join("ledger.json")).unwrap();
    assert_eq!(saved.matches("\"accountId\"").count(), 1);
}

#[test]
fn csv_export_then_overwrite_import_into_fresh_ledger() {
    let dir = TempDir::new().unwrap();
    seed_wallet_scenario(&dir, "ledger.json");
    let export_path = dir.path().join("out.csv");

    ledger(&dir, "ledger.json")
        .arg("export")
        .arg(&export_path)
        .assert()
        .success()
        .stdout(contains("Exported 1 account(s), 1 category(ies), 1 operation(s)"));

    let csv = std::fs::read_to_string(&export_path).unwrap();
    assert!(csv.starts_with("=== ACCOUNTS ===\nid,name,balance\n1,Wallet,0.00\n"));
    assert!(csv.contains("1,EXPENSE,1,1,50.00,2024-01-10,\n"));

    ledger(&dir, "fresh.yaml")
        .arg("import")
        .arg(&export_path)
        .assert()
        .success()
        .stdout(contains("overwrite: 1 account(s), 1 category(ies), 1 operation(s)"));

    let yaml = std::fs::read_to_string(dir.path().join("fresh.yaml")).unwrap();
    assert!(yaml.contains("name: Wallet"));
    assert!(yaml.contains("name: Food"));
    assert!(yaml.contains("kind: EXPENSE"));
}

#[test]
fn merge_import_keeps_existing_entities() {
    let dir = TempDir::new().unwrap();
    run(&dir, "ledger.json", &["account", "create", "Cash"]);
    run(&dir, "ledger.json", &["account", "create", "Card"]);

    let incoming = dir.path().join("incoming.json");
    std::fs::write(
        &incoming,
        r#"{"accounts":[{"id":2,"name":"Card (imported)","balance":12.5},{"id":9,"name":"Bank","balance":0}]}"#,
    )
    .unwrap();

    ledger(&dir, "ledger.json")
        .arg("import")
        .arg(&incoming)
        .arg("--merge")
        .assert()
        .success()
        .stdout(contains("1 replaced"));

    ledger(&dir, "ledger.json")
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(
            contains("Cash")
                .and(contains("Card (imported)"))
                .and(contains("Bank"))
                .and(contains("12.50")),
        );

    ledger(&dir, "ledger.json")
        .args(["account", "create", "Later"])
        .assert()
        .success()
        .stdout(contains("ID: 10"));
}

#[test]
fn malformed_csv_records_are_skipped() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("partial.csv");
    std::fs::write(
        &input,
        "=== ACCOUNTS ===\nid,name,balance\n1,Wallet,5.00\nbroken line\n3,Wal\"let,1.00\n2,Card,1.00\n",
    )
    .unwrap();

    ledger(&dir, "ledger.json")
        .arg("import")
        .arg(&input)
        .assert()
        .success()
        .stdout(contains("2 account(s)"))
        .stderr(contains("skipping malformed CSV record"));
}

#[test]
fn unsupported_format_fails() {
    let dir = TempDir::new().unwrap();
    ledger(&dir, "ledger.json")
        .args(["export", "out.xml", "--format", "xml"])
        .assert()
        .failure();
}

#[test]
fn report_shows_totals() {
    let dir = TempDir::new().unwrap();
    seed_wallet_scenario(&dir, "ledger.json");
    run(&dir, "ledger.json", &["category", "create", "Salary", "-k", "income"]);
    run(
        &dir,
        "ledger.json",
        &["operation", "add", "income", "1", "Salary", "1000", "-d", "2024-01-01"],
    );

    ledger(&dir, "ledger.json")
        .args(["report", "--from", "2024-01-01", "--to", "2024-01-31"])
        .assert()
        .success()
        .stdout(
            contains("Income")
                .and(contains("1000.00"))
                .and(contains("950.00"))
                .and(contains("Expense by category")),
        );
}

#[test]
fn config_prints_paths() {
    let dir = TempDir::new().unwrap();
    ledger(&dir, "ledger.json")
        .arg("config")
        .assert()
        .success()
        .stdout(contains("Default format: json"));
}
