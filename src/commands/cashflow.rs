// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cashflow::{self, MonthlyCashFlow};
use crate::config::Thresholds;
use crate::error::LedgerError;
use crate::pipeline;
use crate::utils::{fmt_yen, maybe_print_json, parse_amount, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;

    let cf = if sub.get_flag("update") {
        let limits = Thresholds::load(conn)?;
        let cf = pipeline::refresh_cashflow(conn, &month, &limits)?;
        println!("Recomputed cash flow for {}", month);
        cf
    } else {
        cashflow::load(conn, &month)?.ok_or(LedgerError::SnapshotMissing {
            kind: "cash flow",
            month: month.clone(),
        })?
    };

    if maybe_print_json(json_flag, jsonl_flag, &cf)? {
        return Ok(());
    }
    print_cashflow(&cf);
    Ok(())
}

/// Persist the user-carried fields, then recompute so the stored snapshot
/// stays internally consistent.
fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let limits = Thresholds::load(conn)?;

    // Make sure a row exists before patching individual columns.
    pipeline::refresh_cashflow(conn, &month, &limits)?;

    let fields = [
        ("opening", "opening_balance"),
        ("closing", "closing_balance"),
        ("bonus", "bonus"),
        ("other", "other_income"),
    ];
    for (arg, column) in fields {
        if let Some(raw) = sub.get_one::<String>(arg) {
            let value = parse_amount(raw)?;
            conn.execute(
                &format!("UPDATE monthly_cashflows SET {}=?1 WHERE year_month=?2", column),
                params![value, month],
            )?;
        }
    }
    if let Some(memo) = sub.get_one::<String>("memo") {
        conn.execute(
            "UPDATE monthly_cashflows SET memo=?1 WHERE year_month=?2",
            params![memo, month],
        )?;
    }

    let cf = pipeline::refresh_cashflow(conn, &month, &limits)?;
    println!(
        "Updated {}: net cash flow {}, risk {}",
        month,
        fmt_yen(cf.net_cashflow),
        cf.risk_level.as_str()
    );
    Ok(())
}

pub fn print_cashflow(cf: &MonthlyCashFlow) {
    let income_rows = vec![
        vec!["Salary (net)".into(), fmt_yen(cf.salary_net)],
        vec!["Bonus".into(), fmt_yen(cf.bonus)],
        vec!["Side business".into(), fmt_yen(cf.side_income)],
        vec!["Rent income".into(), fmt_yen(cf.rent_income)],
        vec!["Temporary".into(), fmt_yen(cf.temporary_income)],
        vec!["Refunds".into(), fmt_yen(cf.refund)],
        vec!["Other".into(), fmt_yen(cf.other_income)],
        vec!["Total income".into(), fmt_yen(cf.total_income)],
    ];
    println!("{}", pretty_table(&["Income", "Amount"], income_rows));

    let expense_rows = vec![
        vec!["Housing loan".into(), fmt_yen(cf.housing_loan)],
        vec!["Other loans".into(), fmt_yen(cf.other_loans)],
        vec!["Insurance".into(), fmt_yen(cf.insurance)],
        vec!["Subscriptions".into(), fmt_yen(cf.subscription)],
        vec!["Utilities".into(), fmt_yen(cf.utilities)],
        vec!["Communication".into(), fmt_yen(cf.communication)],
        vec!["Rent".into(), fmt_yen(cf.rent)],
        vec!["Fixed subtotal".into(), fmt_yen(cf.total_fixed_expense)],
        vec!["Credit cards".into(), fmt_yen(cf.total_credit_payment)],
        vec!["Variable subtotal".into(), fmt_yen(cf.total_variable_expense)],
        vec!["Total expense".into(), fmt_yen(cf.total_expense)],
    ];
    println!("{}", pretty_table(&["Expense", "Amount"], expense_rows));

    println!("Net cash flow: {}", fmt_yen(cf.net_cashflow));
    println!(
        "Balances: opening {}, closing {} ({:+} over the month)",
        fmt_yen(cf.opening_balance),
        fmt_yen(cf.closing_balance),
        cf.monthly_change
    );
    println!("Risk level: {}", cf.risk_level.as_str());
    if let Some(ref message) = cf.risk_message {
        println!("{}", message);
    }
}
