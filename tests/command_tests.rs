// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use kakeibo::{cashflow, cli, commands, db};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(args);
    match matches.subcommand() {
        Some(("asset", sub)) => commands::assets::handle(conn, sub),
        Some(("liability", sub)) => commands::liabilities::handle(conn, sub),
        Some(("fixed", sub)) => commands::fixed::handle(conn, sub),
        Some(("card", sub)) => commands::cards::handle(conn, sub),
        Some(("usage", sub)) => commands::usages::handle(conn, sub),
        Some(("loan", sub)) => commands::loans::handle(conn, sub),
        Some(("salary", sub)) => commands::salary::handle(conn, sub),
        Some(("schedule", sub)) => commands::schedule::handle(conn, sub),
        Some(("cashflow", sub)) => commands::cashflow::handle(conn, sub),
        Some(("balance", sub)) => commands::balance::handle(conn, sub),
        Some(("config", sub)) => commands::config::handle(conn, sub),
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

#[test]
fn show_without_update_fails_when_nothing_is_stored() {
    let conn = setup();
    let err = run(&conn, &["kakeibo", "schedule", "show", "--month", "2025-06"]).unwrap_err();
    assert!(err.to_string().contains("--update"));
    assert!(run(&conn, &["kakeibo", "cashflow", "show", "--month", "2025-06"]).is_err());
    assert!(run(&conn, &["kakeibo", "balance", "show", "--month", "2025-06"]).is_err());
}

#[test]
fn show_with_update_computes_and_stores() {
    let conn = setup();
    run(
        &conn,
        &["kakeibo", "schedule", "show", "--month", "2025-06", "--update"],
    )
    .unwrap();
    // Stored now, so a plain show succeeds.
    run(&conn, &["kakeibo", "schedule", "show", "--month", "2025-06"]).unwrap();
}

#[test]
fn invalid_month_is_rejected_before_any_compute() {
    let conn = setup();
    let err = run(
        &conn,
        &["kakeibo", "schedule", "show", "--month", "June", "--update"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Invalid month"));
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM payment_schedules", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn usage_add_projects_and_pay_settles() {
    let conn = setup();
    run(
        &conn,
        &["kakeibo", "card", "add", "--name", "Alpha", "--closing", "15", "--payment", "10"],
    )
    .unwrap();
    run(
        &conn,
        &["kakeibo", "usage", "add", "--card", "Alpha", "--date", "2025-03-20", "--amount", "42000"],
    )
    .unwrap();

    let debit: String = conn
        .query_row("SELECT payment_date FROM credit_usages", [], |r| r.get(0))
        .unwrap();
    assert_eq!(debit, "2025-05-10");

    run(&conn, &["kakeibo", "usage", "pay", "--month", "2025-05"]).unwrap();
    let paid: bool = conn
        .query_row("SELECT is_paid FROM credit_usages", [], |r| r.get(0))
        .unwrap();
    assert!(paid);
}

#[test]
fn cashflow_set_feeds_carried_fields_into_the_snapshot() {
    let conn = setup();
    run(
        &conn,
        &[
            "kakeibo", "salary", "add", "--month", "2025-06", "--base", "300000",
        ],
    )
    .unwrap();
    run(
        &conn,
        &[
            "kakeibo", "cashflow", "set", "--month", "2025-06", "--opening", "1000000",
            "--closing", "1200000", "--bonus", "500000",
        ],
    )
    .unwrap();

    let cf = cashflow::load(&conn, "2025-06").unwrap().unwrap();
    assert_eq!(cf.bonus, 500_000);
    assert_eq!(cf.total_income, 800_000);
    assert_eq!(cf.monthly_change, 200_000);
}

#[test]
fn loan_tick_decrements_and_deactivates() {
    let conn = setup();
    run(
        &conn,
        &["kakeibo", "loan", "add", "--name", "iPhone split", "--payment", "4000", "--months", "1"],
    )
    .unwrap();
    run(&conn, &["kakeibo", "loan", "tick"]).unwrap();

    let (months, active): (i64, bool) = conn
        .query_row(
            "SELECT remaining_months, is_active FROM short_term_loans",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(months, 0);
    assert!(!active);

    // A second tick leaves the finished loan alone.
    run(&conn, &["kakeibo", "loan", "tick"]).unwrap();
    let months: i64 = conn
        .query_row("SELECT remaining_months FROM short_term_loans", [], |r| r.get(0))
        .unwrap();
    assert_eq!(months, 0);
}

#[test]
fn config_set_rejects_unknown_keys() {
    let conn = setup();
    assert!(run(
        &conn,
        &["kakeibo", "config", "set", "--key", "nonsense", "--value", "1"]
    )
    .is_err());
    run(
        &conn,
        &["kakeibo", "config", "set", "--key", "debt_ratio_danger", "--value", "80"],
    )
    .unwrap();
    let t = kakeibo::config::Thresholds::load(&conn).unwrap();
    assert_eq!(t.debt_ratio_danger.to_string(), "80");
}

#[test]
fn asset_rm_deactivates_instead_of_deleting() {
    let conn = setup();
    run(
        &conn,
        &["kakeibo", "asset", "add", "--name", "Wallet", "--category", "cash", "--value", "30000"],
    )
    .unwrap();
    run(&conn, &["kakeibo", "asset", "rm", "--name", "Wallet"]).unwrap();

    let (count, active): (i64, bool) = conn
        .query_row("SELECT COUNT(*), MAX(is_active) FROM assets", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!(count, 1);
    assert!(!active);
}
