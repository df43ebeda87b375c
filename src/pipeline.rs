// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Snapshot recompute pipeline. The payment schedule feeds both the cash
//! flow and the balance sheet, so every refresh recomputes it first and
//! passes the result down instead of relying on call order.

use crate::balance::{self, MonthlyBalanceSheet};
use crate::cashflow::{self, MonthlyCashFlow};
use crate::config::Thresholds;
use crate::schedule::{self, PaymentSchedule};
use anyhow::Result;
use rusqlite::Connection;

pub fn refresh_schedule(
    conn: &Connection,
    month: &str,
    limits: &Thresholds,
) -> Result<PaymentSchedule> {
    let s = schedule::compute(conn, month, limits)?;
    schedule::upsert(conn, &s)?;
    Ok(s)
}

pub fn refresh_cashflow(
    conn: &Connection,
    month: &str,
    limits: &Thresholds,
) -> Result<MonthlyCashFlow> {
    let s = refresh_schedule(conn, month, limits)?;
    let cf = cashflow::compute(conn, month, Some(&s), limits)?;
    cashflow::upsert(conn, &cf)?;
    Ok(cf)
}

pub fn refresh_balance_sheet(
    conn: &Connection,
    month: &str,
    limits: &Thresholds,
) -> Result<MonthlyBalanceSheet> {
    let s = refresh_schedule(conn, month, limits)?;
    let bs = balance::compute(conn, month, Some(&s), limits)?;
    balance::upsert(conn, &bs)?;
    Ok(bs)
}

/// Full refresh for one month: schedule, then both dependent snapshots.
pub fn refresh_month(
    conn: &Connection,
    month: &str,
    limits: &Thresholds,
) -> Result<(PaymentSchedule, MonthlyCashFlow, MonthlyBalanceSheet)> {
    let s = refresh_schedule(conn, month, limits)?;
    let cf = cashflow::compute(conn, month, Some(&s), limits)?;
    cashflow::upsert(conn, &cf)?;
    let bs = balance::compute(conn, month, Some(&s), limits)?;
    balance::upsert(conn, &bs)?;
    Ok((s, cf, bs))
}
