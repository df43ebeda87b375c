// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Thresholds;
use crate::models::RiskLevel;
use crate::schedule::PaymentSchedule;
use crate::utils::{is_housing_name, pct};
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One month's cash flow. Everything is recomputed from raw rows except the
/// user-carried fields: opening/closing balance, bonus, other_income, memo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlyCashFlow {
    pub year_month: String,

    // Account balances, user-entered via `cashflow set`.
    pub opening_balance: i64,
    pub closing_balance: i64,
    pub monthly_change: i64,

    // Income
    pub salary_net: i64,
    pub bonus: i64,
    pub side_income: i64,
    pub rent_income: i64,
    pub temporary_income: i64,
    pub refund: i64,
    pub other_income: i64,
    pub total_income: i64,

    // Fixed expenses
    pub housing_loan: i64,
    pub other_loans: i64,
    pub insurance: i64,
    pub subscription: i64,
    pub utilities: i64,
    pub communication: i64,
    pub rent: i64,
    pub total_fixed_expense: i64,

    // Credit card, copied from the payment schedule
    pub credit_card_payments: BTreeMap<String, i64>,
    pub total_credit_payment: i64,

    // Variable expenses
    pub food: i64,
    pub daily_goods: i64,
    pub clothing: i64,
    pub social: i64,
    pub transport: i64,
    pub medical: i64,
    pub education: i64,
    pub entertainment: i64,
    pub other_variable: i64,
    pub total_variable_expense: i64,

    pub total_expense: i64,
    pub net_cashflow: i64,
    pub risk_level: RiskLevel,
    pub risk_message: Option<String>,
    pub memo: Option<String>,
}

/// Recomputes the month from raw rows. The schedule is the cross-aggregate
/// input; `None` degrades the credit columns to zero rather than erroring.
pub fn compute(
    conn: &Connection,
    month: &str,
    schedule: Option<&PaymentSchedule>,
    limits: &Thresholds,
) -> Result<MonthlyCashFlow> {
    // Carried fields survive the overwrite.
    let mut cf = load(conn, month)?.unwrap_or_default();
    cf.year_month = month.to_string();

    cf.salary_net = conn
        .query_row(
            "SELECT net_payment FROM salary_records WHERE year_month=?1",
            params![month],
            |r| r.get(0),
        )
        .optional()?
        .unwrap_or(0);

    let sum_income = |category: &str| -> Result<i64> {
        let v: i64 = conn.query_row(
            "SELECT IFNULL(SUM(amount), 0) FROM incomes WHERE year_month=?1 AND category=?2",
            params![month, category],
            |r| r.get(0),
        )?;
        Ok(v)
    };
    cf.side_income = sum_income("side_business")?;
    cf.rent_income = sum_income("rent_income")?;
    cf.temporary_income = sum_income("temporary")?;
    cf.refund = sum_income("refund")?;

    cf.total_income = cf.salary_net
        + cf.bonus
        + cf.side_income
        + cf.rent_income
        + cf.temporary_income
        + cf.refund
        + cf.other_income;

    // Loan-category rows split on the housing name pattern; the rest of the
    // fixed categories are straight sums.
    cf.housing_loan = 0;
    cf.other_loans = 0;
    let mut stmt = conn.prepare(
        "SELECT name, monthly_amount FROM fixed_expenses WHERE is_active=1 AND category='loan'",
    )?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)))?;
    for row in rows {
        let (name, amount) = row?;
        if is_housing_name(&name) {
            cf.housing_loan += amount;
        } else {
            cf.other_loans += amount;
        }
    }

    let sum_fixed = |category: &str| -> Result<i64> {
        let v: i64 = conn.query_row(
            "SELECT IFNULL(SUM(monthly_amount), 0) FROM fixed_expenses
             WHERE is_active=1 AND category=?1",
            params![category],
            |r| r.get(0),
        )?;
        Ok(v)
    };
    cf.insurance = sum_fixed("insurance")?;
    cf.subscription = sum_fixed("subscription")?;
    cf.utilities = sum_fixed("utility")?;
    cf.communication = sum_fixed("communication")?;
    cf.rent = sum_fixed("rent")?;

    cf.total_fixed_expense = cf.housing_loan
        + cf.other_loans
        + cf.insurance
        + cf.subscription
        + cf.utilities
        + cf.communication
        + cf.rent;

    match schedule {
        Some(s) => {
            cf.credit_card_payments = s.credit_card_payments.clone();
            cf.total_credit_payment = s.total_credit_payment;
        }
        None => {
            cf.credit_card_payments = BTreeMap::new();
            cf.total_credit_payment = 0;
        }
    }

    let sum_variable = |category: &str| -> Result<i64> {
        let v: i64 = conn.query_row(
            "SELECT IFNULL(SUM(amount), 0) FROM variable_expenses
             WHERE year_month=?1 AND category=?2",
            params![month, category],
            |r| r.get(0),
        )?;
        Ok(v)
    };
    cf.food = sum_variable("food")?;
    cf.daily_goods = sum_variable("daily_goods")?;
    cf.clothing = sum_variable("clothing")?;
    cf.social = sum_variable("social")?;
    cf.transport = sum_variable("transport")?;
    cf.medical = sum_variable("medical")?;
    cf.education = sum_variable("education")?;
    cf.entertainment = sum_variable("entertainment")?;
    cf.other_variable = sum_variable("other")?;

    cf.total_variable_expense = cf.food
        + cf.daily_goods
        + cf.clothing
        + cf.social
        + cf.transport
        + cf.medical
        + cf.education
        + cf.entertainment
        + cf.other_variable;

    cf.total_expense = cf.total_fixed_expense + cf.total_credit_payment + cf.total_variable_expense;
    cf.net_cashflow = cf.total_income - cf.total_expense;
    cf.monthly_change = cf.closing_balance - cf.opening_balance;

    let (risk, message) = evaluate_risk(&cf, limits);
    cf.risk_level = risk;
    cf.risk_message = Some(message);
    Ok(cf)
}

/// First match wins: deficit, then low closing balance, then expense ratio.
fn evaluate_risk(cf: &MonthlyCashFlow, limits: &Thresholds) -> (RiskLevel, String) {
    if cf.net_cashflow < 0 {
        return (
            RiskLevel::Danger,
            "Spending exceeded income this month.".to_string(),
        );
    }
    if cf.closing_balance < limits.closing_balance_floor {
        return (
            RiskLevel::Warning,
            "Closing balance is running low.".to_string(),
        );
    }
    if cf.total_income > 0 {
        let expense_ratio = pct(cf.total_expense, cf.total_income);
        if expense_ratio >= limits.expense_ratio_warning {
            return (
                RiskLevel::Warning,
                format!("Expense ratio is high ({}%).", expense_ratio),
            );
        }
    }
    (RiskLevel::Safe, "Cash flow is healthy.".to_string())
}

pub fn upsert(conn: &Connection, cf: &MonthlyCashFlow) -> Result<()> {
    conn.execute(
        "INSERT INTO monthly_cashflows(
            year_month, opening_balance, closing_balance, monthly_change,
            salary_net, bonus, side_income, rent_income, temporary_income,
            refund, other_income, total_income,
            housing_loan, other_loans, insurance, subscription, utilities,
            communication, rent, total_fixed_expense,
            credit_card_payments, total_credit_payment,
            food, daily_goods, clothing, social, transport, medical,
            education, entertainment, other_variable, total_variable_expense,
            total_expense, net_cashflow, risk_level, risk_message, memo, updated_at
         ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,
                   ?18,?19,?20,?21,?22,?23,?24,?25,?26,?27,?28,?29,?30,?31,?32,
                   ?33,?34,?35,?36,?37,datetime('now'))
         ON CONFLICT(year_month) DO UPDATE SET
            opening_balance=excluded.opening_balance,
            closing_balance=excluded.closing_balance,
            monthly_change=excluded.monthly_change,
            salary_net=excluded.salary_net,
            bonus=excluded.bonus,
            side_income=excluded.side_income,
            rent_income=excluded.rent_income,
            temporary_income=excluded.temporary_income,
            refund=excluded.refund,
            other_income=excluded.other_income,
            total_income=excluded.total_income,
            housing_loan=excluded.housing_loan,
            other_loans=excluded.other_loans,
            insurance=excluded.insurance,
            subscription=excluded.subscription,
            utilities=excluded.utilities,
            communication=excluded.communication,
            rent=excluded.rent,
            total_fixed_expense=excluded.total_fixed_expense,
            credit_card_payments=excluded.credit_card_payments,
            total_credit_payment=excluded.total_credit_payment,
            food=excluded.food,
            daily_goods=excluded.daily_goods,
            clothing=excluded.clothing,
            social=excluded.social,
            transport=excluded.transport,
            medical=excluded.medical,
            education=excluded.education,
            entertainment=excluded.entertainment,
            other_variable=excluded.other_variable,
            total_variable_expense=excluded.total_variable_expense,
            total_expense=excluded.total_expense,
            net_cashflow=excluded.net_cashflow,
            risk_level=excluded.risk_level,
            risk_message=excluded.risk_message,
            updated_at=excluded.updated_at",
        params![
            cf.year_month,
            cf.opening_balance,
            cf.closing_balance,
            cf.monthly_change,
            cf.salary_net,
            cf.bonus,
            cf.side_income,
            cf.rent_income,
            cf.temporary_income,
            cf.refund,
            cf.other_income,
            cf.total_income,
            cf.housing_loan,
            cf.other_loans,
            cf.insurance,
            cf.subscription,
            cf.utilities,
            cf.communication,
            cf.rent,
            cf.total_fixed_expense,
            serde_json::to_string(&cf.credit_card_payments)?,
            cf.total_credit_payment,
            cf.food,
            cf.daily_goods,
            cf.clothing,
            cf.social,
            cf.transport,
            cf.medical,
            cf.education,
            cf.entertainment,
            cf.other_variable,
            cf.total_variable_expense,
            cf.total_expense,
            cf.net_cashflow,
            cf.risk_level.as_str(),
            cf.risk_message,
            cf.memo,
        ],
    )?;
    Ok(())
}

fn from_row(month: &str, r: &Row<'_>) -> rusqlite::Result<(MonthlyCashFlow, String, String)> {
    Ok((
        MonthlyCashFlow {
            year_month: month.to_string(),
            opening_balance: r.get("opening_balance")?,
            closing_balance: r.get("closing_balance")?,
            monthly_change: r.get("monthly_change")?,
            salary_net: r.get("salary_net")?,
            bonus: r.get("bonus")?,
            side_income: r.get("side_income")?,
            rent_income: r.get("rent_income")?,
            temporary_income: r.get("temporary_income")?,
            refund: r.get("refund")?,
            other_income: r.get("other_income")?,
            total_income: r.get("total_income")?,
            housing_loan: r.get("housing_loan")?,
            other_loans: r.get("other_loans")?,
            insurance: r.get("insurance")?,
            subscription: r.get("subscription")?,
            utilities: r.get("utilities")?,
            communication: r.get("communication")?,
            rent: r.get("rent")?,
            total_fixed_expense: r.get("total_fixed_expense")?,
            credit_card_payments: BTreeMap::new(),
            total_credit_payment: r.get("total_credit_payment")?,
            food: r.get("food")?,
            daily_goods: r.get("daily_goods")?,
            clothing: r.get("clothing")?,
            social: r.get("social")?,
            transport: r.get("transport")?,
            medical: r.get("medical")?,
            education: r.get("education")?,
            entertainment: r.get("entertainment")?,
            other_variable: r.get("other_variable")?,
            total_variable_expense: r.get("total_variable_expense")?,
            total_expense: r.get("total_expense")?,
            net_cashflow: r.get("net_cashflow")?,
            risk_level: RiskLevel::Safe,
            risk_message: r.get("risk_message")?,
            memo: r.get("memo")?,
        },
        r.get::<_, String>("credit_card_payments")?,
        r.get::<_, String>("risk_level")?,
    ))
}

pub fn load(conn: &Connection, month: &str) -> Result<Option<MonthlyCashFlow>> {
    let row = conn
        .query_row(
            "SELECT * FROM monthly_cashflows WHERE year_month=?1",
            params![month],
            |r| from_row(month, r),
        )
        .optional()?;
    let Some((mut cf, cards_json, risk)) = row else {
        return Ok(None);
    };
    cf.credit_card_payments = serde_json::from_str(&cards_json)
        .with_context(|| format!("Corrupt card payment map for {}", month))?;
    cf.risk_level = risk.parse()?;
    Ok(Some(cf))
}
