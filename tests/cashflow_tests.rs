// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use kakeibo::config::Thresholds;
use kakeibo::models::RiskLevel;
use kakeibo::{cashflow, db, schedule};
use rusqlite::{Connection, params};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn seed_salary(conn: &Connection, month: &str, net: i64) {
    conn.execute(
        "INSERT INTO salary_records(year_month, base_salary, total_payment, net_payment)
         VALUES (?1, ?2, ?2, ?2)",
        params![month, net],
    )
    .unwrap();
}

#[test]
fn income_side_sums_come_from_income_rows() {
    let conn = setup();
    seed_salary(&conn, "2025-06", 280_000);
    conn.execute(
        "INSERT INTO incomes(year_month, category, amount) VALUES
         ('2025-06', 'side_business', 30000),
         ('2025-06', 'side_business', 20000),
         ('2025-06', 'rent_income', 65000),
         ('2025-06', 'temporary', 10000),
         ('2025-06', 'refund', 8000),
         ('2025-05', 'side_business', 99999)",
        [],
    )
    .unwrap();

    let cf = cashflow::compute(&conn, "2025-06", None, &Thresholds::default()).unwrap();
    assert_eq!(cf.salary_net, 280_000);
    assert_eq!(cf.side_income, 50_000);
    assert_eq!(cf.rent_income, 65_000);
    assert_eq!(cf.temporary_income, 10_000);
    assert_eq!(cf.refund, 8_000);
    assert_eq!(cf.total_income, 280_000 + 50_000 + 65_000 + 10_000 + 8_000);
}

#[test]
fn missing_salary_record_degrades_to_zero() {
    let conn = setup();
    let cf = cashflow::compute(&conn, "2025-06", None, &Thresholds::default()).unwrap();
    assert_eq!(cf.salary_net, 0);
    assert_eq!(cf.total_income, 0);
}

#[test]
fn loan_expenses_split_on_housing_name() {
    let conn = setup();
    conn.execute(
        "INSERT INTO fixed_expenses(name, category, monthly_amount) VALUES
         ('Flat 35 housing loan', 'loan', 85000),
         ('Car payments', 'loan', 25000),
         ('Life insurance', 'insurance', 12000),
         ('Netflix', 'subscription', 1500),
         ('Electricity', 'utility', 9000),
         ('Mobile plan', 'communication', 3000),
         ('Parking rent', 'rent', 11000)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO fixed_expenses(name, category, monthly_amount, is_active)
         VALUES ('Cancelled gym', 'subscription', 8000, 0)",
        [],
    )
    .unwrap();

    let cf = cashflow::compute(&conn, "2025-06", None, &Thresholds::default()).unwrap();
    assert_eq!(cf.housing_loan, 85_000);
    assert_eq!(cf.other_loans, 25_000);
    assert_eq!(cf.insurance, 12_000);
    assert_eq!(cf.subscription, 1_500);
    assert_eq!(cf.utilities, 9_000);
    assert_eq!(cf.communication, 3_000);
    assert_eq!(cf.rent, 11_000);
    assert_eq!(cf.total_fixed_expense, 146_500);
}

#[test]
fn credit_columns_copy_the_schedule_verbatim() {
    let conn = setup();
    conn.execute(
        "INSERT INTO credit_cards(id, name, closing_day, payment_day) VALUES (1, 'Alpha', 15, 10)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO credit_usages(card_id, usage_date, amount, payment_date, is_paid)
         VALUES (1, '2025-04-20', 47000, '2025-06-10', 0)",
        [],
    )
    .unwrap();

    let limits = Thresholds::default();
    let s = schedule::compute(&conn, "2025-06", &limits).unwrap();
    let cf = cashflow::compute(&conn, "2025-06", Some(&s), &limits).unwrap();
    assert_eq!(cf.total_credit_payment, 47_000);
    assert_eq!(cf.credit_card_payments, s.credit_card_payments);

    // No schedule: the credit columns degrade to zero.
    let cf = cashflow::compute(&conn, "2025-06", None, &limits).unwrap();
    assert_eq!(cf.total_credit_payment, 0);
    assert!(cf.credit_card_payments.is_empty());
}

#[test]
fn variable_sums_and_grand_totals() {
    let conn = setup();
    seed_salary(&conn, "2025-06", 300_000);
    conn.execute(
        "INSERT INTO variable_expenses(year_month, category, amount) VALUES
         ('2025-06', 'food', 42000),
         ('2025-06', 'food', 8000),
         ('2025-06', 'transport', 6000),
         ('2025-06', 'entertainment', 14000),
         ('2025-07', 'food', 70000)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO fixed_expenses(name, category, monthly_amount)
         VALUES ('Mobile plan', 'communication', 3000)",
        [],
    )
    .unwrap();

    let cf = cashflow::compute(&conn, "2025-06", None, &Thresholds::default()).unwrap();
    assert_eq!(cf.food, 50_000);
    assert_eq!(cf.transport, 6_000);
    assert_eq!(cf.entertainment, 14_000);
    assert_eq!(cf.total_variable_expense, 70_000);
    assert_eq!(
        cf.total_expense,
        cf.total_fixed_expense + cf.total_credit_payment + cf.total_variable_expense
    );
    assert_eq!(cf.net_cashflow, cf.total_income - cf.total_expense);
}

#[test]
fn deficit_wins_over_every_other_risk_rule() {
    let conn = setup();
    conn.execute(
        "INSERT INTO variable_expenses(year_month, category, amount)
         VALUES ('2025-06', 'food', 50000)",
        [],
    )
    .unwrap();

    // No income at all, so net cash flow is negative.
    let cf = cashflow::compute(&conn, "2025-06", None, &Thresholds::default()).unwrap();
    assert!(cf.net_cashflow < 0);
    assert_eq!(cf.risk_level, RiskLevel::Danger);
}

#[test]
fn low_closing_balance_is_a_warning() {
    let conn = setup();
    seed_salary(&conn, "2025-06", 300_000);
    let limits = Thresholds::default();

    let cf = cashflow::compute(&conn, "2025-06", None, &limits).unwrap();
    cashflow::upsert(&conn, &cf).unwrap();
    conn.execute(
        "UPDATE monthly_cashflows SET opening_balance=80000, closing_balance=90000
         WHERE year_month='2025-06'",
        [],
    )
    .unwrap();

    let cf = cashflow::compute(&conn, "2025-06", None, &limits).unwrap();
    assert!(cf.net_cashflow >= 0);
    assert_eq!(cf.risk_level, RiskLevel::Warning);
    assert_eq!(cf.monthly_change, 10_000);
}

#[test]
fn expense_ratio_at_eighty_percent_warns_despite_surplus() {
    let conn = setup();
    seed_salary(&conn, "2025-06", 1_000_000);
    conn.execute(
        "INSERT INTO variable_expenses(year_month, category, amount)
         VALUES ('2025-06', 'other', 850000)",
        [],
    )
    .unwrap();
    let limits = Thresholds::default();

    let cf = cashflow::compute(&conn, "2025-06", None, &limits).unwrap();
    cashflow::upsert(&conn, &cf).unwrap();
    conn.execute(
        "UPDATE monthly_cashflows SET closing_balance=500000 WHERE year_month='2025-06'",
        [],
    )
    .unwrap();

    let cf = cashflow::compute(&conn, "2025-06", None, &limits).unwrap();
    assert_eq!(cf.net_cashflow, 150_000);
    assert_eq!(cf.risk_level, RiskLevel::Warning);
    assert!(cf.risk_message.unwrap().contains("85"));
}

#[test]
fn healthy_month_is_safe() {
    let conn = setup();
    seed_salary(&conn, "2025-06", 400_000);
    conn.execute(
        "INSERT INTO variable_expenses(year_month, category, amount)
         VALUES ('2025-06', 'food', 100000)",
        [],
    )
    .unwrap();
    let limits = Thresholds::default();

    let cf = cashflow::compute(&conn, "2025-06", None, &limits).unwrap();
    cashflow::upsert(&conn, &cf).unwrap();
    conn.execute(
        "UPDATE monthly_cashflows SET closing_balance=800000 WHERE year_month='2025-06'",
        [],
    )
    .unwrap();

    let cf = cashflow::compute(&conn, "2025-06", None, &limits).unwrap();
    assert_eq!(cf.risk_level, RiskLevel::Safe);
}

#[test]
fn carried_fields_survive_recompute() {
    let conn = setup();
    seed_salary(&conn, "2025-06", 300_000);
    let limits = Thresholds::default();

    let cf = cashflow::compute(&conn, "2025-06", None, &limits).unwrap();
    cashflow::upsert(&conn, &cf).unwrap();
    conn.execute(
        "UPDATE monthly_cashflows
         SET bonus=600000, other_income=12000, opening_balance=1000000, closing_balance=1500000
         WHERE year_month='2025-06'",
        [],
    )
    .unwrap();

    let cf = cashflow::compute(&conn, "2025-06", None, &limits).unwrap();
    assert_eq!(cf.bonus, 600_000);
    assert_eq!(cf.other_income, 12_000);
    assert_eq!(cf.total_income, 300_000 + 600_000 + 12_000);
    assert_eq!(cf.monthly_change, 500_000);
}

#[test]
fn recompute_with_unchanged_inputs_is_idempotent() {
    let conn = setup();
    seed_salary(&conn, "2025-06", 300_000);
    conn.execute(
        "INSERT INTO variable_expenses(year_month, category, amount)
         VALUES ('2025-06', 'food', 40000)",
        [],
    )
    .unwrap();
    let limits = Thresholds::default();

    let first = cashflow::compute(&conn, "2025-06", None, &limits).unwrap();
    cashflow::upsert(&conn, &first).unwrap();
    let second = cashflow::compute(&conn, "2025-06", None, &limits).unwrap();
    cashflow::upsert(&conn, &second).unwrap();

    assert_eq!(first.total_income, second.total_income);
    assert_eq!(first.total_expense, second.total_expense);
    assert_eq!(first.net_cashflow, second.net_cashflow);
    assert_eq!(first.risk_level, second.risk_level);

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM monthly_cashflows", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}
