// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use kakeibo::config::Thresholds;
use kakeibo::{balance, cashflow, db, pipeline, schedule};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn seed(conn: &Connection) {
    conn.execute_batch(
        r#"
        INSERT INTO credit_cards(id, name, closing_day, payment_day) VALUES (1, 'Alpha', 15, 10);
        INSERT INTO credit_usages(card_id, usage_date, amount, payment_date, is_paid)
            VALUES (1, '2025-04-20', 50000, '2025-06-10', 0);
        INSERT INTO short_term_loans(name, monthly_payment, remaining_months)
            VALUES ('Phone installments', 4000, 10);
        INSERT INTO salary_records(year_month, base_salary, total_payment, net_payment)
            VALUES ('2025-06', 320000, 320000, 320000);
        INSERT INTO assets(name, category, current_value) VALUES ('Mizuho ordinary', 'bank', 900000);
        "#,
    )
    .unwrap();
}

#[test]
fn refresh_month_stores_all_three_snapshots_in_order() {
    let conn = setup();
    seed(&conn);
    let limits = Thresholds::default();

    let (s, cf, bs) = pipeline::refresh_month(&conn, "2025-06", &limits).unwrap();
    assert_eq!(s.total_credit_payment, 50_000);
    assert_eq!(s.total_payment, 54_000);

    // Both dependents saw the schedule computed in the same pass.
    assert_eq!(cf.total_credit_payment, 50_000);
    assert_eq!(bs.credit_card_debt, 50_000);

    assert!(schedule::load(&conn, "2025-06").unwrap().is_some());
    assert!(cashflow::load(&conn, "2025-06").unwrap().is_some());
    assert!(balance::load(&conn, "2025-06").unwrap().is_some());
}

#[test]
fn snapshots_go_stale_until_explicitly_refreshed() {
    let conn = setup();
    seed(&conn);
    let limits = Thresholds::default();
    pipeline::refresh_month(&conn, "2025-06", &limits).unwrap();

    // A new usage lands in the same debit month.
    conn.execute(
        "INSERT INTO credit_usages(card_id, usage_date, amount, payment_date, is_paid)
         VALUES (1, '2025-04-25', 30000, '2025-06-10', 0)",
        [],
    )
    .unwrap();

    // Stored rows still show the old totals: no reactive invalidation.
    let stale = cashflow::load(&conn, "2025-06").unwrap().unwrap();
    assert_eq!(stale.total_credit_payment, 50_000);

    let (_, cf, bs) = pipeline::refresh_month(&conn, "2025-06", &limits).unwrap();
    assert_eq!(cf.total_credit_payment, 80_000);
    assert_eq!(bs.credit_card_debt, 80_000);
}

#[test]
fn refreshing_a_dependent_refreshes_the_schedule_first() {
    let conn = setup();
    seed(&conn);
    let limits = Thresholds::default();

    // Never computed the schedule explicitly; the cash flow stage must.
    let cf = pipeline::refresh_cashflow(&conn, "2025-06", &limits).unwrap();
    assert_eq!(cf.total_credit_payment, 50_000);
    let stored = schedule::load(&conn, "2025-06").unwrap().unwrap();
    assert_eq!(stored.total_credit_payment, 50_000);

    let bs = pipeline::refresh_balance_sheet(&conn, "2025-06", &limits).unwrap();
    assert_eq!(bs.credit_card_debt, 50_000);
}

#[test]
fn salary_feeds_the_cash_flow_through_the_pipeline() {
    let conn = setup();
    seed(&conn);
    let (_, cf, _) = pipeline::refresh_month(&conn, "2025-06", &Thresholds::default()).unwrap();
    assert_eq!(cf.salary_net, 320_000);
}

#[test]
fn months_without_data_still_produce_consistent_zero_snapshots() {
    let conn = setup();
    let (s, cf, bs) = pipeline::refresh_month(&conn, "2031-01", &Thresholds::default()).unwrap();
    assert_eq!(s.total_payment, 0);
    assert_eq!(cf.total_income, 0);
    assert_eq!(cf.net_cashflow, 0);
    assert_eq!(bs.total_assets, 0);
    assert_eq!(bs.net_worth, 0);
}
