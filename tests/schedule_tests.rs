// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use kakeibo::config::Thresholds;
use kakeibo::models::{CreditCard, RiskLevel};
use kakeibo::{db, schedule};
use rusqlite::{Connection, params};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn card(closing_day: u32, payment_day: u32) -> CreditCard {
    CreditCard {
        id: 1,
        name: "Test Card".into(),
        last4: None,
        closing_day,
        payment_day,
        is_active: true,
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn usage_after_closing_day_settles_two_months_out() {
    // Day 20 is past the 15th closing, so the debit lands two months later
    // on the card's day-10 debit day.
    let c = card(15, 10);
    assert_eq!(c.project_payment_date(d(2025, 3, 20)), d(2025, 5, 10));
}

#[test]
fn usage_on_or_before_closing_day_settles_next_month() {
    let c = card(15, 10);
    assert_eq!(c.project_payment_date(d(2025, 3, 15)), d(2025, 4, 10));
    assert_eq!(c.project_payment_date(d(2025, 3, 1)), d(2025, 4, 10));
}

#[test]
fn debit_day_clamps_to_short_months() {
    let c = card(15, 31);
    // Lands in April, which has no day 31.
    assert_eq!(c.project_payment_date(d(2025, 3, 10)), d(2025, 4, 30));
    // February in a leap year.
    assert_eq!(c.project_payment_date(d(2024, 1, 10)), d(2024, 2, 29));
}

#[test]
fn schedule_sums_unpaid_usages_by_debit_month() {
    let conn = setup();
    conn.execute(
        "INSERT INTO credit_cards(id, name, closing_day, payment_day) VALUES (1, 'Alpha', 15, 10)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO credit_cards(id, name, closing_day, payment_day) VALUES (2, 'Beta', 25, 5)",
        [],
    )
    .unwrap();
    // Two unpaid rows debiting in May, one already paid, one in June.
    conn.execute(
        "INSERT INTO credit_usages(card_id, usage_date, amount, payment_date, is_paid) VALUES
         (1, '2025-03-20', 40000, '2025-05-10', 0),
         (1, '2025-03-25', 20000, '2025-05-10', 0),
         (1, '2025-03-22', 99999, '2025-05-10', 1),
         (2, '2025-04-20', 15000, '2025-06-05', 0)",
        [],
    )
    .unwrap();

    let s = schedule::compute(&conn, "2025-05", &Thresholds::default()).unwrap();
    assert_eq!(s.credit_card_payments.get("Alpha"), Some(&60000));
    // Beta has nothing due in May and is omitted from the map.
    assert!(!s.credit_card_payments.contains_key("Beta"));
    assert_eq!(s.total_credit_payment, 60000);
    assert_eq!(s.total_payment, s.total_credit_payment + s.total_loan_payment);
}

#[test]
fn inactive_cards_are_excluded() {
    let conn = setup();
    conn.execute(
        "INSERT INTO credit_cards(id, name, closing_day, payment_day, is_active)
         VALUES (1, 'Closed', 15, 10, 0)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO credit_usages(card_id, usage_date, amount, payment_date, is_paid)
         VALUES (1, '2025-03-20', 40000, '2025-05-10', 0)",
        [],
    )
    .unwrap();

    let s = schedule::compute(&conn, "2025-05", &Thresholds::default()).unwrap();
    assert!(s.credit_card_payments.is_empty());
    assert_eq!(s.total_payment, 0);
}

#[test]
fn every_active_loan_is_due_every_month() {
    let conn = setup();
    conn.execute(
        "INSERT INTO short_term_loans(name, monthly_payment, remaining_months) VALUES
         ('Phone installments', 4000, 10),
         ('Fiber install fee', 1000, 3)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO short_term_loans(name, monthly_payment, remaining_months, is_active)
         VALUES ('Paid off', 9000, 0, 0)",
        [],
    )
    .unwrap();

    let s = schedule::compute(&conn, "2025-05", &Thresholds::default()).unwrap();
    assert_eq!(s.loan_payments.len(), 2);
    assert_eq!(s.total_loan_payment, 5000);
    assert_eq!(s.total_payment, 5000);
}

#[test]
fn risk_level_follows_amount_thresholds() {
    let conn = setup();
    let limits = Thresholds::default();

    let seed = |amount: i64| {
        conn.execute("DELETE FROM short_term_loans", []).unwrap();
        conn.execute(
            "INSERT INTO short_term_loans(name, monthly_payment, remaining_months)
             VALUES ('Loan', ?1, 12)",
            params![amount],
        )
        .unwrap();
    };

    seed(99_999);
    let s = schedule::compute(&conn, "2025-05", &limits).unwrap();
    assert_eq!(s.risk_level, RiskLevel::Safe);

    seed(100_000);
    let s = schedule::compute(&conn, "2025-05", &limits).unwrap();
    assert_eq!(s.risk_level, RiskLevel::Warning);

    seed(200_000);
    let s = schedule::compute(&conn, "2025-05", &limits).unwrap();
    assert_eq!(s.risk_level, RiskLevel::Danger);
}

#[test]
fn thresholds_are_overridable_through_settings() {
    let conn = setup();
    kakeibo::config::set_threshold(&conn, "schedule_safe_max", "500000").unwrap();
    conn.execute(
        "INSERT INTO short_term_loans(name, monthly_payment, remaining_months)
         VALUES ('Loan', 300000, 12)",
        [],
    )
    .unwrap();

    let limits = Thresholds::load(&conn).unwrap();
    let s = schedule::compute(&conn, "2025-05", &limits).unwrap();
    assert_eq!(s.risk_level, RiskLevel::Safe);
}

#[test]
fn upsert_then_load_round_trips_and_recompute_is_idempotent() {
    let conn = setup();
    conn.execute(
        "INSERT INTO credit_cards(id, name, closing_day, payment_day) VALUES (1, 'Alpha', 15, 10)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO credit_usages(card_id, usage_date, amount, payment_date, is_paid)
         VALUES (1, '2025-03-20', 42000, '2025-05-10', 0)",
        [],
    )
    .unwrap();

    let limits = Thresholds::default();
    let first = schedule::compute(&conn, "2025-05", &limits).unwrap();
    schedule::upsert(&conn, &first).unwrap();
    let second = schedule::compute(&conn, "2025-05", &limits).unwrap();
    schedule::upsert(&conn, &second).unwrap();

    let stored = schedule::load(&conn, "2025-05").unwrap().unwrap();
    assert_eq!(stored.credit_card_payments, first.credit_card_payments);
    assert_eq!(stored.total_payment, first.total_payment);
    assert_eq!(stored.risk_level, first.risk_level);

    // One snapshot row per month even after repeated upserts.
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM payment_schedules", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn load_returns_none_for_missing_month() {
    let conn = setup();
    assert!(schedule::load(&conn, "2031-01").unwrap().is_none());
}
