// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Thresholds;
use crate::models::RiskLevel;
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One month's payment schedule: per-card and per-loan amounts due, their
/// sums, and a threshold-based risk tag. Fully derived; the memo survives
/// recomputes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSchedule {
    pub year_month: String,
    pub credit_card_payments: BTreeMap<String, i64>,
    pub total_credit_payment: i64,
    pub loan_payments: BTreeMap<String, i64>,
    pub total_loan_payment: i64,
    pub total_payment: i64,
    pub risk_level: RiskLevel,
    pub memo: Option<String>,
}

/// Rolls up unpaid credit usages landing in `month` per active card, plus
/// every active loan's monthly payment (policy: an active loan is due every
/// month, no date filtering).
pub fn compute(conn: &Connection, month: &str, limits: &Thresholds) -> Result<PaymentSchedule> {
    let mut credit_card_payments = BTreeMap::new();
    let mut stmt = conn.prepare(
        "SELECT c.name, IFNULL(SUM(u.amount), 0)
         FROM credit_cards c
         JOIN credit_usages u ON u.card_id = c.id
         WHERE c.is_active = 1
           AND u.is_paid = 0
           AND u.payment_date IS NOT NULL
           AND substr(u.payment_date, 1, 7) = ?1
         GROUP BY c.id
         ORDER BY c.name",
    )?;
    let rows = stmt.query_map(params![month], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?))
    })?;
    for row in rows {
        let (name, amount) = row?;
        if amount > 0 {
            credit_card_payments.insert(name, amount);
        }
    }
    let total_credit_payment: i64 = credit_card_payments.values().sum();

    let mut loan_payments = BTreeMap::new();
    let mut stmt = conn.prepare(
        "SELECT name, monthly_payment FROM short_term_loans WHERE is_active=1 ORDER BY name",
    )?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)))?;
    for row in rows {
        let (name, amount) = row?;
        loan_payments.insert(name, amount);
    }
    let total_loan_payment: i64 = loan_payments.values().sum();

    let total_payment = total_credit_payment + total_loan_payment;
    let memo: Option<String> = conn
        .query_row(
            "SELECT memo FROM payment_schedules WHERE year_month=?1",
            params![month],
            |r| r.get(0),
        )
        .optional()?
        .flatten();

    Ok(PaymentSchedule {
        year_month: month.to_string(),
        credit_card_payments,
        total_credit_payment,
        loan_payments,
        total_loan_payment,
        total_payment,
        risk_level: evaluate_risk(total_payment, limits),
        memo,
    })
}

/// Amount-only thresholds; not cross-checked against income.
fn evaluate_risk(total_payment: i64, limits: &Thresholds) -> RiskLevel {
    if total_payment < limits.schedule_safe_max {
        RiskLevel::Safe
    } else if total_payment < limits.schedule_warning_max {
        RiskLevel::Warning
    } else {
        RiskLevel::Danger
    }
}

pub fn upsert(conn: &Connection, s: &PaymentSchedule) -> Result<()> {
    conn.execute(
        "INSERT INTO payment_schedules(
            year_month, credit_card_payments, total_credit_payment,
            loan_payments, total_loan_payment, total_payment, risk_level, updated_at
         ) VALUES (?1,?2,?3,?4,?5,?6,?7,datetime('now'))
         ON CONFLICT(year_month) DO UPDATE SET
            credit_card_payments=excluded.credit_card_payments,
            total_credit_payment=excluded.total_credit_payment,
            loan_payments=excluded.loan_payments,
            total_loan_payment=excluded.total_loan_payment,
            total_payment=excluded.total_payment,
            risk_level=excluded.risk_level,
            updated_at=excluded.updated_at",
        params![
            s.year_month,
            serde_json::to_string(&s.credit_card_payments)?,
            s.total_credit_payment,
            serde_json::to_string(&s.loan_payments)?,
            s.total_loan_payment,
            s.total_payment,
            s.risk_level.as_str(),
        ],
    )?;
    Ok(())
}

pub fn load(conn: &Connection, month: &str) -> Result<Option<PaymentSchedule>> {
    let row: Option<(String, i64, String, i64, i64, String, Option<String>)> = conn
        .query_row(
            "SELECT credit_card_payments, total_credit_payment, loan_payments,
                    total_loan_payment, total_payment, risk_level, memo
             FROM payment_schedules WHERE year_month=?1",
            params![month],
            |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                    r.get(6)?,
                ))
            },
        )
        .optional()?;
    let Some((cards_json, total_credit, loans_json, total_loan, total, risk, memo)) = row else {
        return Ok(None);
    };
    Ok(Some(PaymentSchedule {
        year_month: month.to_string(),
        credit_card_payments: serde_json::from_str(&cards_json)
            .with_context(|| format!("Corrupt card payment map for {}", month))?,
        total_credit_payment: total_credit,
        loan_payments: serde_json::from_str(&loans_json)
            .with_context(|| format!("Corrupt loan payment map for {}", month))?,
        total_loan_payment: total_loan,
        total_payment: total,
        risk_level: risk.parse()?,
        memo,
    }))
}
