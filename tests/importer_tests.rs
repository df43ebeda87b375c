// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use kakeibo::{cli, commands::importer, db};
use rusqlite::Connection;
use std::io::Write;
use tempfile::NamedTempFile;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run_import(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(args);
    let Some(("import", import_m)) = matches.subcommand() else {
        panic!("no import subcommand");
    };
    importer::handle(conn, import_m)
}

#[test]
fn usage_import_projects_debit_dates_per_row() {
    let mut conn = setup();
    conn.execute(
        "INSERT INTO credit_cards(id, name, closing_day, payment_day) VALUES (1, 'Alpha', 15, 10)",
        [],
    )
    .unwrap();

    let mut csv = NamedTempFile::new().unwrap();
    writeln!(csv, "date,amount,merchant").unwrap();
    writeln!(csv, "2025-03-10,12000,Seiyu").unwrap();
    writeln!(csv, "2025-03-20,30000,Bic Camera").unwrap();
    let path = csv.path().to_string_lossy().to_string();

    run_import(
        &mut conn,
        &["kakeibo", "import", "usages", "--path", &path, "--card", "Alpha"],
    )
    .unwrap();

    // Before the closing day: next month. After: the month after that.
    let rows: Vec<(String, i64)> = conn
        .prepare("SELECT payment_date, amount FROM credit_usages ORDER BY usage_date")
        .unwrap()
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(rows, vec![("2025-04-10".into(), 12000), ("2025-05-10".into(), 30000)]);
}

#[test]
fn usage_import_fails_for_unknown_card() {
    let mut conn = setup();
    let mut csv = NamedTempFile::new().unwrap();
    writeln!(csv, "date,amount,merchant").unwrap();
    writeln!(csv, "2025-03-10,12000,Seiyu").unwrap();
    let path = csv.path().to_string_lossy().to_string();

    let result = run_import(
        &mut conn,
        &["kakeibo", "import", "usages", "--path", &path, "--card", "Nope"],
    );
    assert!(result.is_err());
}

#[test]
fn expense_import_is_all_or_nothing() {
    let mut conn = setup();
    let mut csv = NamedTempFile::new().unwrap();
    writeln!(csv, "month,category,amount,description").unwrap();
    writeln!(csv, "2025-06,food,42000,groceries").unwrap();
    writeln!(csv, "2025-06,mattress,1000,bad category").unwrap();
    let path = csv.path().to_string_lossy().to_string();

    let result = run_import(&mut conn, &["kakeibo", "import", "expenses", "--path", &path]);
    assert!(result.is_err());

    // The transaction rolled back: not even the valid first row landed.
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM variable_expenses", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn expense_import_inserts_rows() {
    let mut conn = setup();
    let mut csv = NamedTempFile::new().unwrap();
    writeln!(csv, "month,category,amount,description").unwrap();
    writeln!(csv, "2025-06,food,42000,groceries").unwrap();
    writeln!(csv, "2025-06,transport,6000,").unwrap();
    let path = csv.path().to_string_lossy().to_string();

    run_import(&mut conn, &["kakeibo", "import", "expenses", "--path", &path]).unwrap();

    let total: i64 = conn
        .query_row(
            "SELECT SUM(amount) FROM variable_expenses WHERE year_month='2025-06'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(total, 48_000);
}
