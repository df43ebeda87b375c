// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Kakeibo", "kakeibo"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("kakeibo.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS assets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        category TEXT NOT NULL,
        subcategory TEXT,
        current_value INTEGER NOT NULL CHECK(current_value >= 0),
        acquisition_date TEXT,
        acquisition_cost INTEGER CHECK(acquisition_cost IS NULL OR acquisition_cost >= 0),
        institution TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        memo TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS liabilities(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        category TEXT NOT NULL,
        current_balance INTEGER NOT NULL CHECK(current_balance >= 0),
        original_amount INTEGER NOT NULL CHECK(original_amount >= 0),
        monthly_payment INTEGER NOT NULL CHECK(monthly_payment >= 0),
        remaining_months INTEGER NOT NULL CHECK(remaining_months >= 0),
        payment_day INTEGER CHECK(payment_day IS NULL OR payment_day BETWEEN 1 AND 31),
        lender TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        memo TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS fixed_expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        category TEXT NOT NULL,
        monthly_amount INTEGER NOT NULL CHECK(monthly_amount >= 0),
        payment_day INTEGER CHECK(payment_day IS NULL OR payment_day BETWEEN 1 AND 31),
        is_loan INTEGER NOT NULL DEFAULT 0,
        remaining_months INTEGER CHECK(remaining_months IS NULL OR remaining_months >= 0),
        is_active INTEGER NOT NULL DEFAULT 1,
        memo TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS incomes(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        year_month TEXT NOT NULL,
        category TEXT NOT NULL,
        amount INTEGER NOT NULL CHECK(amount >= 0),
        source TEXT,
        memo TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_incomes_month ON incomes(year_month);

    CREATE TABLE IF NOT EXISTS variable_expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        year_month TEXT NOT NULL,
        category TEXT NOT NULL,
        amount INTEGER NOT NULL CHECK(amount >= 0),
        description TEXT,
        memo TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_variable_expenses_month ON variable_expenses(year_month);

    CREATE TABLE IF NOT EXISTS credit_cards(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        last4 TEXT,
        closing_day INTEGER NOT NULL CHECK(closing_day BETWEEN 1 AND 31),
        payment_day INTEGER NOT NULL CHECK(payment_day BETWEEN 1 AND 31),
        is_active INTEGER NOT NULL DEFAULT 1,
        memo TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS credit_usages(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        card_id INTEGER NOT NULL,
        usage_date TEXT NOT NULL,
        amount INTEGER NOT NULL CHECK(amount >= 0),
        merchant TEXT,
        payment_date TEXT,
        is_paid INTEGER NOT NULL DEFAULT 0,
        memo TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(card_id) REFERENCES credit_cards(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_credit_usages_payment ON credit_usages(payment_date);

    CREATE TABLE IF NOT EXISTS short_term_loans(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        monthly_payment INTEGER NOT NULL CHECK(monthly_payment >= 0),
        remaining_months INTEGER NOT NULL CHECK(remaining_months >= 0),
        payment_day INTEGER CHECK(payment_day IS NULL OR payment_day BETWEEN 1 AND 31),
        start_date TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        memo TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS salary_records(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        year_month TEXT NOT NULL UNIQUE,
        base_salary INTEGER NOT NULL DEFAULT 0,
        allowances INTEGER NOT NULL DEFAULT 0,
        overtime_pay INTEGER NOT NULL DEFAULT 0,
        commuting_allowance INTEGER NOT NULL DEFAULT 0,
        health_insurance INTEGER NOT NULL DEFAULT 0,
        pension_insurance INTEGER NOT NULL DEFAULT 0,
        employment_insurance INTEGER NOT NULL DEFAULT 0,
        income_tax INTEGER NOT NULL DEFAULT 0,
        resident_tax INTEGER NOT NULL DEFAULT 0,
        other_deduction INTEGER NOT NULL DEFAULT 0,
        total_payment INTEGER NOT NULL DEFAULT 0,
        total_deduction INTEGER NOT NULL DEFAULT 0,
        net_payment INTEGER NOT NULL DEFAULT 0,
        memo TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    -- Derived snapshots: one row per month, overwritten on every recompute.
    CREATE TABLE IF NOT EXISTS payment_schedules(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        year_month TEXT NOT NULL UNIQUE,
        credit_card_payments TEXT NOT NULL DEFAULT '{}',
        total_credit_payment INTEGER NOT NULL DEFAULT 0,
        loan_payments TEXT NOT NULL DEFAULT '{}',
        total_loan_payment INTEGER NOT NULL DEFAULT 0,
        total_payment INTEGER NOT NULL DEFAULT 0,
        risk_level TEXT NOT NULL DEFAULT 'safe',
        memo TEXT,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS monthly_cashflows(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        year_month TEXT NOT NULL UNIQUE,
        opening_balance INTEGER NOT NULL DEFAULT 0,
        closing_balance INTEGER NOT NULL DEFAULT 0,
        monthly_change INTEGER NOT NULL DEFAULT 0,
        salary_net INTEGER NOT NULL DEFAULT 0,
        bonus INTEGER NOT NULL DEFAULT 0,
        side_income INTEGER NOT NULL DEFAULT 0,
        rent_income INTEGER NOT NULL DEFAULT 0,
        temporary_income INTEGER NOT NULL DEFAULT 0,
        refund INTEGER NOT NULL DEFAULT 0,
        other_income INTEGER NOT NULL DEFAULT 0,
        total_income INTEGER NOT NULL DEFAULT 0,
        housing_loan INTEGER NOT NULL DEFAULT 0,
        other_loans INTEGER NOT NULL DEFAULT 0,
        insurance INTEGER NOT NULL DEFAULT 0,
        subscription INTEGER NOT NULL DEFAULT 0,
        utilities INTEGER NOT NULL DEFAULT 0,
        communication INTEGER NOT NULL DEFAULT 0,
        rent INTEGER NOT NULL DEFAULT 0,
        total_fixed_expense INTEGER NOT NULL DEFAULT 0,
        credit_card_payments TEXT NOT NULL DEFAULT '{}',
        total_credit_payment INTEGER NOT NULL DEFAULT 0,
        food INTEGER NOT NULL DEFAULT 0,
        daily_goods INTEGER NOT NULL DEFAULT 0,
        clothing INTEGER NOT NULL DEFAULT 0,
        social INTEGER NOT NULL DEFAULT 0,
        transport INTEGER NOT NULL DEFAULT 0,
        medical INTEGER NOT NULL DEFAULT 0,
        education INTEGER NOT NULL DEFAULT 0,
        entertainment INTEGER NOT NULL DEFAULT 0,
        other_variable INTEGER NOT NULL DEFAULT 0,
        total_variable_expense INTEGER NOT NULL DEFAULT 0,
        total_expense INTEGER NOT NULL DEFAULT 0,
        net_cashflow INTEGER NOT NULL DEFAULT 0,
        risk_level TEXT NOT NULL DEFAULT 'safe',
        risk_message TEXT,
        memo TEXT,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS monthly_balance_sheets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        year_month TEXT NOT NULL UNIQUE,
        cash INTEGER NOT NULL DEFAULT 0,
        bank_deposits INTEGER NOT NULL DEFAULT 0,
        current_assets INTEGER NOT NULL DEFAULT 0,
        stocks INTEGER NOT NULL DEFAULT 0,
        bonds INTEGER NOT NULL DEFAULT 0,
        investment_trusts INTEGER NOT NULL DEFAULT 0,
        crypto INTEGER NOT NULL DEFAULT 0,
        investment_assets INTEGER NOT NULL DEFAULT 0,
        real_estate INTEGER NOT NULL DEFAULT 0,
        vehicles INTEGER NOT NULL DEFAULT 0,
        other_assets INTEGER NOT NULL DEFAULT 0,
        fixed_assets INTEGER NOT NULL DEFAULT 0,
        total_assets INTEGER NOT NULL DEFAULT 0,
        credit_card_debt INTEGER NOT NULL DEFAULT 0,
        short_term_loans INTEGER NOT NULL DEFAULT 0,
        current_liabilities INTEGER NOT NULL DEFAULT 0,
        housing_loan INTEGER NOT NULL DEFAULT 0,
        car_loan INTEGER NOT NULL DEFAULT 0,
        student_loan INTEGER NOT NULL DEFAULT 0,
        other_loans INTEGER NOT NULL DEFAULT 0,
        long_term_liabilities INTEGER NOT NULL DEFAULT 0,
        total_liabilities INTEGER NOT NULL DEFAULT 0,
        net_worth INTEGER NOT NULL DEFAULT 0,
        net_worth_change INTEGER NOT NULL DEFAULT 0,
        net_worth_change_ratio TEXT NOT NULL DEFAULT '0',
        debt_ratio TEXT NOT NULL DEFAULT '0',
        liquidity_ratio TEXT NOT NULL DEFAULT '0',
        financial_health TEXT NOT NULL DEFAULT 'fair',
        health_message TEXT,
        memo TEXT,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}
