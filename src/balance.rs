// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Thresholds;
use crate::models::FinancialHealth;
use crate::schedule::PaymentSchedule;
use crate::utils::{InvestmentBucket, classify_investment, fmt_yen, pct, prev_month};
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One month's balance sheet snapshot. Fully derived except the memo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlyBalanceSheet {
    pub year_month: String,

    // Current assets
    pub cash: i64,
    pub bank_deposits: i64,
    pub current_assets: i64,

    // Investment assets
    pub stocks: i64,
    pub bonds: i64,
    pub investment_trusts: i64,
    pub crypto: i64,
    pub investment_assets: i64,

    // Fixed assets
    pub real_estate: i64,
    pub vehicles: i64,
    pub other_assets: i64,
    pub fixed_assets: i64,

    pub total_assets: i64,

    // Current liabilities
    pub credit_card_debt: i64,
    pub short_term_loans: i64,
    pub current_liabilities: i64,

    // Long-term liabilities
    pub housing_loan: i64,
    pub car_loan: i64,
    pub student_loan: i64,
    pub other_loans: i64,
    pub long_term_liabilities: i64,

    pub total_liabilities: i64,

    pub net_worth: i64,
    pub net_worth_change: i64,
    pub net_worth_change_ratio: Decimal,

    pub debt_ratio: Decimal,
    pub liquidity_ratio: Decimal,

    pub financial_health: FinancialHealth,
    pub health_message: Option<String>,
    pub memo: Option<String>,
}

/// Recomputes the month from active assets and liabilities. The schedule is
/// the cross-aggregate input for credit-card debt; `None` degrades to zero.
pub fn compute(
    conn: &Connection,
    month: &str,
    schedule: Option<&PaymentSchedule>,
    limits: &Thresholds,
) -> Result<MonthlyBalanceSheet> {
    let mut bs = load(conn, month)?.unwrap_or_default();
    bs.year_month = month.to_string();

    let sum_assets = |category: &str| -> Result<i64> {
        let v: i64 = conn.query_row(
            "SELECT IFNULL(SUM(current_value), 0) FROM assets
             WHERE is_active=1 AND category=?1",
            params![category],
            |r| r.get(0),
        )?;
        Ok(v)
    };
    bs.cash = sum_assets("cash")?;
    bs.bank_deposits = sum_assets("bank")?;
    bs.current_assets = bs.cash + bs.bank_deposits;

    // Investment split: explicit subcategory wins, else the name heuristic.
    // Rows matching neither are dropped from the split.
    bs.stocks = 0;
    bs.bonds = 0;
    bs.investment_trusts = 0;
    bs.crypto = 0;
    let mut stmt = conn.prepare(
        "SELECT name, subcategory, current_value FROM assets
         WHERE is_active=1 AND category='investment'",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, i64>(2)?,
        ))
    })?;
    for row in rows {
        let (name, subcategory, value) = row?;
        match classify_investment(&name, subcategory.as_deref()) {
            Some(InvestmentBucket::Stocks) => bs.stocks += value,
            Some(InvestmentBucket::Bonds) => bs.bonds += value,
            Some(InvestmentBucket::InvestmentTrusts) => bs.investment_trusts += value,
            Some(InvestmentBucket::Crypto) => bs.crypto += value,
            None => {}
        }
    }
    bs.investment_assets = bs.stocks + bs.bonds + bs.investment_trusts + bs.crypto;

    bs.real_estate = sum_assets("real_estate")?;
    bs.vehicles = sum_assets("vehicle")?;
    bs.other_assets = sum_assets("other")?;
    bs.fixed_assets = bs.real_estate + bs.vehicles + bs.other_assets;

    bs.total_assets = bs.current_assets + bs.investment_assets + bs.fixed_assets;

    bs.credit_card_debt = schedule.map(|s| s.total_credit_payment).unwrap_or(0);
    bs.short_term_loans = conn.query_row(
        "SELECT IFNULL(SUM(current_balance), 0) FROM liabilities
         WHERE is_active=1 AND remaining_months <= 12 AND category != 'housing_loan'",
        [],
        |r| r.get(0),
    )?;
    bs.current_liabilities = bs.credit_card_debt + bs.short_term_loans;

    let sum_liabilities = |category: &str| -> Result<i64> {
        let v: i64 = conn.query_row(
            "SELECT IFNULL(SUM(current_balance), 0) FROM liabilities
             WHERE is_active=1 AND category=?1",
            params![category],
            |r| r.get(0),
        )?;
        Ok(v)
    };
    bs.housing_loan = sum_liabilities("housing_loan")?;
    bs.car_loan = sum_liabilities("car_loan")?;
    bs.student_loan = sum_liabilities("student_loan")?;
    bs.other_loans = sum_liabilities("other")?;
    bs.long_term_liabilities = bs.housing_loan + bs.car_loan + bs.student_loan + bs.other_loans;

    bs.total_liabilities = bs.current_liabilities + bs.long_term_liabilities;
    bs.net_worth = bs.total_assets - bs.total_liabilities;

    // Missing previous month degrades the change columns to zero.
    match load(conn, &prev_month(month)?)? {
        Some(previous) => {
            bs.net_worth_change = bs.net_worth - previous.net_worth;
            bs.net_worth_change_ratio = pct(bs.net_worth_change, previous.net_worth);
        }
        None => {
            bs.net_worth_change = 0;
            bs.net_worth_change_ratio = Decimal::ZERO;
        }
    }

    bs.debt_ratio = pct(bs.total_liabilities, bs.total_assets);
    bs.liquidity_ratio = pct(bs.current_assets, bs.current_liabilities);

    let (health, message) = evaluate_health(&bs, limits);
    bs.financial_health = health;
    bs.health_message = Some(message);
    Ok(bs)
}

/// Strict priority order; the first matching rule decides.
fn evaluate_health(
    bs: &MonthlyBalanceSheet,
    limits: &Thresholds,
) -> (FinancialHealth, String) {
    if bs.net_worth < 0 {
        return (
            FinancialHealth::Danger,
            "Liabilities exceed assets. Reduce debt urgently.".to_string(),
        );
    }
    if bs.debt_ratio > limits.debt_ratio_warning {
        let message = format!("Debt ratio is high ({}%).", bs.debt_ratio);
        if bs.debt_ratio > limits.debt_ratio_danger {
            return (FinancialHealth::Danger, message);
        }
        return (FinancialHealth::Warning, message);
    }
    if bs.current_liabilities > 0 && bs.liquidity_ratio < limits.liquidity_ratio_floor {
        return (
            FinancialHealth::Warning,
            format!("Liquidity ratio is low ({}%).", bs.liquidity_ratio),
        );
    }
    if bs.net_worth_change > 0 {
        return (
            FinancialHealth::Excellent,
            format!("Net worth grew by {} this month.", fmt_yen(bs.net_worth_change)),
        );
    }
    (FinancialHealth::Good, "Financial position is sound.".to_string())
}

pub fn upsert(conn: &Connection, bs: &MonthlyBalanceSheet) -> Result<()> {
    conn.execute(
        "INSERT INTO monthly_balance_sheets(
            year_month, cash, bank_deposits, current_assets,
            stocks, bonds, investment_trusts, crypto, investment_assets,
            real_estate, vehicles, other_assets, fixed_assets, total_assets,
            credit_card_debt, short_term_loans, current_liabilities,
            housing_loan, car_loan, student_loan, other_loans,
            long_term_liabilities, total_liabilities,
            net_worth, net_worth_change, net_worth_change_ratio,
            debt_ratio, liquidity_ratio, financial_health, health_message,
            memo, updated_at
         ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,
                   ?18,?19,?20,?21,?22,?23,?24,?25,?26,?27,?28,?29,?30,?31,
                   datetime('now'))
         ON CONFLICT(year_month) DO UPDATE SET
            cash=excluded.cash,
            bank_deposits=excluded.bank_deposits,
            current_assets=excluded.current_assets,
            stocks=excluded.stocks,
            bonds=excluded.bonds,
            investment_trusts=excluded.investment_trusts,
            crypto=excluded.crypto,
            investment_assets=excluded.investment_assets,
            real_estate=excluded.real_estate,
            vehicles=excluded.vehicles,
            other_assets=excluded.other_assets,
            fixed_assets=excluded.fixed_assets,
            total_assets=excluded.total_assets,
            credit_card_debt=excluded.credit_card_debt,
            short_term_loans=excluded.short_term_loans,
            current_liabilities=excluded.current_liabilities,
            housing_loan=excluded.housing_loan,
            car_loan=excluded.car_loan,
            student_loan=excluded.student_loan,
            other_loans=excluded.other_loans,
            long_term_liabilities=excluded.long_term_liabilities,
            total_liabilities=excluded.total_liabilities,
            net_worth=excluded.net_worth,
            net_worth_change=excluded.net_worth_change,
            net_worth_change_ratio=excluded.net_worth_change_ratio,
            debt_ratio=excluded.debt_ratio,
            liquidity_ratio=excluded.liquidity_ratio,
            financial_health=excluded.financial_health,
            health_message=excluded.health_message,
            updated_at=excluded.updated_at",
        params![
            bs.year_month,
            bs.cash,
            bs.bank_deposits,
            bs.current_assets,
            bs.stocks,
            bs.bonds,
            bs.investment_trusts,
            bs.crypto,
            bs.investment_assets,
            bs.real_estate,
            bs.vehicles,
            bs.other_assets,
            bs.fixed_assets,
            bs.total_assets,
            bs.credit_card_debt,
            bs.short_term_loans,
            bs.current_liabilities,
            bs.housing_loan,
            bs.car_loan,
            bs.student_loan,
            bs.other_loans,
            bs.long_term_liabilities,
            bs.total_liabilities,
            bs.net_worth,
            bs.net_worth_change,
            bs.net_worth_change_ratio.to_string(),
            bs.debt_ratio.to_string(),
            bs.liquidity_ratio.to_string(),
            bs.financial_health.as_str(),
            bs.health_message,
            bs.memo,
        ],
    )?;
    Ok(())
}

fn from_row(month: &str, r: &Row<'_>) -> rusqlite::Result<(MonthlyBalanceSheet, [String; 4])> {
    Ok((
        MonthlyBalanceSheet {
            year_month: month.to_string(),
            cash: r.get("cash")?,
            bank_deposits: r.get("bank_deposits")?,
            current_assets: r.get("current_assets")?,
            stocks: r.get("stocks")?,
            bonds: r.get("bonds")?,
            investment_trusts: r.get("investment_trusts")?,
            crypto: r.get("crypto")?,
            investment_assets: r.get("investment_assets")?,
            real_estate: r.get("real_estate")?,
            vehicles: r.get("vehicles")?,
            other_assets: r.get("other_assets")?,
            fixed_assets: r.get("fixed_assets")?,
            total_assets: r.get("total_assets")?,
            credit_card_debt: r.get("credit_card_debt")?,
            short_term_loans: r.get("short_term_loans")?,
            current_liabilities: r.get("current_liabilities")?,
            housing_loan: r.get("housing_loan")?,
            car_loan: r.get("car_loan")?,
            student_loan: r.get("student_loan")?,
            other_loans: r.get("other_loans")?,
            long_term_liabilities: r.get("long_term_liabilities")?,
            total_liabilities: r.get("total_liabilities")?,
            net_worth: r.get("net_worth")?,
            net_worth_change: r.get("net_worth_change")?,
            net_worth_change_ratio: Decimal::ZERO,
            debt_ratio: Decimal::ZERO,
            liquidity_ratio: Decimal::ZERO,
            financial_health: FinancialHealth::Fair,
            health_message: r.get("health_message")?,
            memo: r.get("memo")?,
        },
        [
            r.get::<_, String>("net_worth_change_ratio")?,
            r.get::<_, String>("debt_ratio")?,
            r.get::<_, String>("liquidity_ratio")?,
            r.get::<_, String>("financial_health")?,
        ],
    ))
}

pub fn load(conn: &Connection, month: &str) -> Result<Option<MonthlyBalanceSheet>> {
    let row = conn
        .query_row(
            "SELECT * FROM monthly_balance_sheets WHERE year_month=?1",
            params![month],
            |r| from_row(month, r),
        )
        .optional()?;
    let Some((mut bs, [change_ratio, debt_ratio, liquidity_ratio, health])) = row else {
        return Ok(None);
    };
    bs.net_worth_change_ratio = change_ratio
        .parse()
        .with_context(|| format!("Corrupt change ratio for {}", month))?;
    bs.debt_ratio = debt_ratio
        .parse()
        .with_context(|| format!("Corrupt debt ratio for {}", month))?;
    bs.liquidity_ratio = liquidity_ratio
        .parse()
        .with_context(|| format!("Corrupt liquidity ratio for {}", month))?;
    bs.financial_health = health.parse()?;
    Ok(Some(bs))
}
