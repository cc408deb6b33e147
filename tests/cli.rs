//! E2E tests driving the landed binary

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::process::{Command, Output};

fn landed(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_landed"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn decimal(value: &serde_json::Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

/// 2021 Toyota Harrier, 2.0L, FOB 15,000 with default freight and insurance
#[test]
fn calc_json_reference_vehicle() {
    let output = landed(&[
        "calc", "--make", "Toyota", "--model", "Harrier", "-y", "2021", "-e", "2.0", "--fob",
        "15000", "--json", "--as-of-year", "2025",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["make"], "TOYOTA");
    assert_eq!(json["age"], 4);
    assert_eq!(json["fob_source"], "supplied");
    assert_eq!(decimal(&json["costs"]["cif_usd"]), dec!(16500));
    assert_eq!(decimal(&json["costs"]["customs_duty"]), dec!(4125));
    assert_eq!(decimal(&json["costs"]["grand_total"]), dec!(3867024.0625));
}

#[test]
fn calc_table_report() {
    let output = landed(&[
        "calc", "--make", "toyota", "--model", "harrier", "-y", "2021", "-e", "2.0", "--fob",
        "15000", "--as-of-year", "2025",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert!(stdout.contains("TOYOTA harrier (2021)"));
    assert!(stdout.contains("Railway development levy"));
    assert!(stdout.contains("GRAND TOTAL: KES 3,867,024.06"));
    assert!(stdout.contains("Importing could save"));
}

#[test]
fn calc_rejects_vehicle_over_maximum_age() {
    let output = landed(&[
        "calc", "--make", "Nissan", "--model", "Note", "-y", "2016", "-e", "1.2", "--fob", "6000",
        "--as-of-year", "2025",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("maximum importable age"), "stderr: {}", stderr);
}

#[test]
fn calc_reports_amounts_too_large_to_compute() {
    let output = landed(&[
        "calc", "--make", "Toyota", "--model", "Harrier", "-y", "2021", "-e", "2.0", "--fob",
        "39614081257132168796771975167", "--as-of-year", "2025",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("too large to compute"), "stderr: {}", stderr);
}

#[test]
fn calc_requires_fob_or_estimate() {
    let output = landed(&[
        "calc", "--make", "Mazda", "--model", "CX-5", "-y", "2022", "-e", "2.5", "--as-of-year",
        "2025",
    ]);
    assert!(!output.status.success());

    let output = landed(&[
        "calc", "--make", "Mazda", "--model", "CX-5", "-y", "2022", "-e", "2.5", "--estimate-fob",
        "--json", "--as-of-year", "2025",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["fob_source"], "estimated");
    assert_eq!(decimal(&json["costs"]["fob_usd"]), dec!(11054.25));
}

#[test]
fn calc_exports_summary_into_directory() {
    let dir = tempfile::tempdir().unwrap();
    let output = landed(&[
        "calc", "--make", "Toyota", "--model", "Harrier", "-y", "2021", "-e", "2.0", "--fob",
        "15000", "--as-of-year", "2025", "--export", dir.path().to_str().unwrap(),
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let exported: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(exported.len(), 1);
    let csv = std::fs::read_to_string(exported[0].as_ref().unwrap().path()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Item,Value");
    assert_eq!(lines[9], "GRAND TOTAL (KES),\"3,867,024.06\"");
}

#[test]
fn search_finds_matches_case_insensitively() {
    let output = landed(&[
        "search", "-r", "tests/data/reference.csv", "--make", "toyota", "--model", "harrier",
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["total_matches"], 2);
    assert_eq!(json["matches"][0]["MODEL"], "HARRIER 2.0");
    assert_eq!(json["matches"][1]["MODEL NUMBER"], "AXUH80");
    assert_eq!(json["table_sha256"].as_str().unwrap().len(), 64);
}

#[test]
fn search_limit_only_truncates_display() {
    let output = landed(&[
        "search", "-r", "tests/data/reference.csv", "--make", "TOYOTA", "--model", "HARRIER",
        "-l", "1",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert!(stdout.contains("ZSU60W"));
    assert!(!stdout.contains("AXUH80"));
    assert!(stdout.contains("Showing 1 of 2 matches"));
    assert!(stdout.contains("ENGINE (L, GUESS)"));
}

#[test]
fn search_miss_suggests_manual_entry() {
    let output = landed(&[
        "search", "-r", "tests/data/reference.csv", "--make", "SUBARU", "--model", "FORESTER",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("enter the details manually"));
}

#[test]
fn search_reads_windows_1252_reference() {
    let output = landed(&[
        "search", "-r", "tests/data/reference_latin1.csv", "--make", "citro", "--model", "c3",
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["total_matches"], 1);
    assert_eq!(json["matches"][0]["MAKE"], "CITRO\u{00CB}N");
}

#[test]
fn check_exit_status_follows_eligibility() {
    let output = landed(&["check", "-y", "2018", "--as-of-year", "2025"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("Eligible: 7 years old"));

    let output = landed(&["check", "-y", "2017", "--as-of-year", "2025"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("general age limit"));

    let output = landed(&["check", "-y", "2016", "--as-of-year", "2025"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("maximum importable age"));
}

#[test]
fn estimate_prints_fob() {
    let output = landed(&["estimate", "-y", "2023", "--make", "toyota", "--as-of-year", "2025"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("18,062.50"));
}

#[test]
fn batch_csv_reports_each_row() {
    let output = landed(&[
        "batch", "-v", "tests/data/vehicles.csv", "--estimate-fob", "--csv", "--as-of-year",
        "2025",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("row_num,vehicle,year"));
    assert!(lines[1].contains("3,867,024.06"));
    assert!(lines[2].contains("OK (FOB estimated)"));
    assert!(lines[3].contains("Rejected"));
    assert!(lines[4].contains("Invalid"));
}

#[test]
fn config_override_changes_exchange_rate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tariff.json");
    std::fs::write(&path, r#"{ "exchange_rate": 130 }"#).unwrap();

    let output = landed(&[
        "calc", "--make", "Toyota", "--model", "Harrier", "-y", "2021", "-e", "2.0", "--fob",
        "15000", "--json", "--as-of-year", "2025", "--config", path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(decimal(&json["costs"]["exchange_rate"]), dec!(130));
}

#[test]
fn schema_csv_header_lists_batch_columns() {
    let output = landed(&["schema", "csv-header"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(
        stdout(&output).trim(),
        "make,model,year,engine_liters,fob_usd,freight_usd,insurance_usd"
    );
}
