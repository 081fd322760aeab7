//! Integration tests for the `spot` CLI binary.
//!
//! These use `assert_cmd` and `predicates` to exercise the resolve, quote and
//! history subcommands through the actual binary, including stdin piping, file
//! I/O, environment configuration and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// A `spot` command with a clean environment for its settings.
fn spot() -> Command {
    let mut cmd = Command::cargo_bin("spot").unwrap();
    cmd.env_remove("SPOT_TODAY").env_remove("SPOT_TZ").env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// resolve
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn resolve_file_reports_every_listing() {
    let out = stdout_json(spot().args([
        "--today",
        "2024-01-03",
        "resolve",
        "-i",
        fixture("cars.json").as_str(),
    ]));
    let cards = out.as_array().unwrap();

    assert_eq!(cards.len(), 4);

    assert_eq!(cards[0]["name"], "Level 2 Bay 14");
    assert_eq!(cards[0]["availability"]["state"], "booked");
    assert_eq!(cards[0]["availability"]["source"], "bookings");
    assert_eq!(cards[0]["freeOn"], "2024-01-06");
    assert_eq!(cards[0]["daysUntilAvailable"], 3);
    assert_eq!(cards[0]["bookable"], false);

    assert_eq!(cards[1]["badge"], "Available (4 days)");
    assert_eq!(cards[1]["badgeDetail"], "until 7 Jan");
    assert_eq!(cards[1]["bookable"], true);

    assert_eq!(cards[2]["availability"]["state"], "fully_available");
    assert_eq!(cards[2]["bookable"], false);

    assert_eq!(cards[3]["availability"]["source"], "availability");
    assert_eq!(cards[3]["freeOn"], "2024-01-05");
    assert_eq!(cards[3]["daysUntilAvailable"], 2);
}

#[test]
fn resolve_stdin_single_listing() {
    let input = r#"{"id": 5, "name": "Bay 5", "bookings": [{"from": "2024-01-01", "to": "2024-01-02"}]}"#;

    let out = stdout_json(spot().args(["--today", "2024-01-06", "resolve"]).write_stdin(input));

    assert_eq!(out[0]["id"], "5");
    assert_eq!(out[0]["availability"]["state"], "fully_available");
    assert_eq!(out[0]["bookable"], true);
}

#[test]
fn resolve_today_from_environment() {
    let input = r#"[{"bookings": [{"pickupDate": "2024-01-01", "returnDate": "2024-01-05"}]}]"#;

    let out = stdout_json(spot().env("SPOT_TODAY", "2024-01-04").arg("resolve").write_stdin(input));

    assert_eq!(out[0]["daysUntilAvailable"], 2);
}

#[test]
fn resolve_timezone_shifts_day_boundaries() {
    // Return at 20:00 UTC is already the 6th in Kolkata.
    let input = r#"[{"bookings": [{"pickupDate": "2024-01-01T00:00:00Z", "returnDate": "2024-01-05T20:00:00Z"}]}]"#;

    let utc = stdout_json(spot().args(["--today", "2024-01-06", "resolve"]).write_stdin(input));
    let ist = stdout_json(
        spot()
            .args(["--today", "2024-01-06", "--tz", "Asia/Kolkata", "resolve"])
            .write_stdin(input),
    );

    assert_eq!(utc[0]["bookable"], true);
    assert_eq!(ist[0]["bookable"], false);
    assert_eq!(ist[0]["availability"]["until"], "2024-01-06");
}

#[test]
fn resolve_writes_output_file() {
    let output_path = std::env::temp_dir().join("spot-test-resolve-output.json");
    let _ = std::fs::remove_file(&output_path);

    spot()
        .args(["--today", "2024-01-03", "resolve", "-i", fixture("cars.json").as_str(), "-o"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let value: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 4);

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn resolve_pretty_prints() {
    spot()
        .args(["--today", "2024-01-03", "--pretty", "resolve"])
        .write_stdin("{}")
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  {"));
}

#[test]
fn resolve_rejects_invalid_json() {
    spot()
        .args(["--today", "2024-01-03", "resolve"])
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read listings"));
}

#[test]
fn resolve_rejects_missing_file() {
    spot()
        .args(["resolve", "-i", "/nonexistent/cars.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn bad_today_and_timezone_rejected() {
    spot()
        .args(["--today", "03-01-2024", "resolve"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--today must be YYYY-MM-DD"));

    spot()
        .args(["--tz", "Moon/Base", "resolve"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown timezone"));
}

// ─────────────────────────────────────────────────────────────────────────────
// quote
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn quote_without_listing() {
    let out = stdout_json(spot().args([
        "quote", "--pickup", "2024-06-01", "--return", "2024-06-04", "--rate", "500",
    ]));

    assert_eq!(out["quote"]["rentalDays"], 3);
    assert_eq!(out["quote"]["total"], 1500.0);
    assert!(out.get("listing").is_none());
    assert_eq!(out["conflicts"].as_array().unwrap().len(), 0);
}

#[test]
fn quote_uses_listing_rate_when_free() {
    let out = stdout_json(spot().args([
        "quote",
        "--pickup",
        "2024-06-13",
        "--return",
        "2024-06-15",
        "-i",
        fixture("car.json").as_str(),
    ]));

    assert_eq!(out["listing"], "Level 2 Bay 14");
    assert_eq!(out["quote"]["dailyRate"], 1200.0);
    assert_eq!(out["quote"]["total"], 2400.0);
    assert_eq!(out["conflicts"].as_array().unwrap().len(), 0);
}

#[test]
fn quote_conflict_exits_with_code_2() {
    spot()
        .args([
            "quote",
            "--pickup",
            "2024-06-12",
            "--return",
            "2024-06-21",
            "-i",
            fixture("car.json").as_str(),
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"overlapDays\":1"))
        .stdout(predicate::str::contains("\"overlapDays\":2"))
        .stderr(predicate::str::contains("overlap 2 existing booking(s)"));
}

#[test]
fn quote_writes_output_file_even_on_conflict() {
    let output_path = std::env::temp_dir().join("spot-test-quote-output.json");
    let _ = std::fs::remove_file(&output_path);

    spot()
        .args([
            "quote",
            "--pickup",
            "2024-06-24",
            "--return",
            "2024-06-27",
            "-i",
            fixture("car.json").as_str(),
            "-o",
        ])
        .arg(&output_path)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("overlap 1 existing booking(s)"));

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let value: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["quote"]["rentalDays"], 3);
    assert_eq!(value["conflicts"][0]["overlapDays"], 2);

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn quote_invalid_range_fails() {
    spot()
        .args(["quote", "--pickup", "2024-06-05", "--return", "2024-06-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date range"));
}

#[test]
fn quote_missing_dates_fails() {
    spot()
        .args(["quote", "--pickup", "2024-06-05"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pickup and a return date"));
}

#[test]
fn quote_needs_id_for_listing_pages() {
    spot()
        .args([
            "quote",
            "--pickup",
            "2024-06-01",
            "--return",
            "2024-06-02",
            "-i",
            fixture("cars.json").as_str(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pick one with --id"));

    let out = stdout_json(spot().args([
        "quote",
        "--pickup",
        "2024-06-01",
        "--return",
        "2024-06-02",
        "-i",
        fixture("cars.json").as_str(),
        "--id",
        "65a1f0c2e4b0a4",
    ]));
    assert_eq!(out["listing"], "Basement 22");
    assert_eq!(out["quote"]["total"], 950.0);
}

// ─────────────────────────────────────────────────────────────────────────────
// history
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn history_classifies_and_summarizes() {
    let out = stdout_json(spot().args([
        "--today",
        "2024-06-10",
        "history",
        "-i",
        fixture("mybookings.json").as_str(),
    ]));

    assert_eq!(out["filter"], "all");
    let entries = out["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["status"], "upcoming");
    assert_eq!(entries[1]["status"], "completed");
    assert_eq!(entries[1]["listingName"], "Rooftop 3");
    assert_eq!(entries[2]["status"], "cancelled");
    assert_eq!(entries[2]["listingName"], "Basement 22");

    assert_eq!(out["summary"]["total"], 3);
    assert_eq!(out["summary"]["upcoming"], 1);
    assert_eq!(out["summary"]["completed"], 1);
    assert_eq!(out["summary"]["cancelled"], 1);
}

#[test]
fn history_filter_narrows_entries_only() {
    let out = stdout_json(spot().args([
        "--today",
        "2024-06-10",
        "history",
        "-i",
        fixture("mybookings.json").as_str(),
        "--filter",
        "upcoming",
    ]));

    let entries = out["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], "b-100");
    assert_eq!(out["summary"]["total"], 3);
}

#[test]
fn history_rejects_unknown_filter() {
    spot()
        .args(["history", "--filter", "archived"])
        .write_stdin("[]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown filter 'archived'"));
}

#[test]
fn no_subcommand_shows_usage() {
    spot()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
