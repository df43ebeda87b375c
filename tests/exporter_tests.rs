// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use kakeibo::config::Thresholds;
use kakeibo::{cli, commands::exporter, db, pipeline};
use rusqlite::Connection;
use tempfile::tempdir;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run_export(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(args);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(conn, export_m)
}

#[test]
fn snapshot_timeline_exports_one_csv_row_per_month() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO salary_records(year_month, base_salary, total_payment, net_payment)
            VALUES ('2025-06', 300000, 300000, 300000);
        INSERT INTO assets(name, category, current_value) VALUES ('Mizuho ordinary', 'bank', 900000);
        "#,
    )
    .unwrap();
    let limits = Thresholds::default();
    pipeline::refresh_month(&conn, "2025-05", &limits).unwrap();
    pipeline::refresh_month(&conn, "2025-06", &limits).unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("snapshots.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(
        &conn,
        &["kakeibo", "export", "snapshots", "--format", "csv", "--out", &out_str],
    )
    .unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("month,total_payment"));
    assert!(lines[1].starts_with("2025-05,"));
    assert!(lines[2].starts_with("2025-06,"));
    assert!(lines[2].contains("300000"));
}

#[test]
fn usages_export_as_pretty_json() {
    let conn = setup();
    conn.execute_batch(
        r#"
        INSERT INTO credit_cards(id, name, closing_day, payment_day) VALUES (1, 'Alpha', 15, 10);
        INSERT INTO credit_usages(card_id, usage_date, amount, merchant, payment_date, is_paid)
            VALUES (1, '2025-03-20', 42000, 'Bic Camera', '2025-05-10', 0);
        "#,
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("usages.json");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(
        &conn,
        &["kakeibo", "export", "usages", "--format", "json", "--out", &out_str],
    )
    .unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([
            {
                "date": "2025-03-20",
                "card": "Alpha",
                "amount": 42000,
                "merchant": "Bic Camera",
                "payment_date": "2025-05-10",
                "is_paid": false
            }
        ])
    );
}

#[test]
fn export_rejects_unknown_format() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("snapshots.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    let result = run_export(
        &conn,
        &["kakeibo", "export", "snapshots", "--format", "xml", "--out", &out_str],
    );
    assert!(result.is_err());
    assert!(!out_path.exists());
}
