// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("snapshots", sub)) => export_snapshots(conn, sub),
        Some(("usages", sub)) => export_usages(conn, sub),
        _ => Ok(()),
    }
}

/// One row per month with the headline figures of all three snapshots.
/// Months missing a snapshot export empty cells rather than being skipped.
fn export_snapshots(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT m.year_month,
                p.total_payment, p.risk_level,
                c.total_income, c.total_expense, c.net_cashflow, c.risk_level,
                b.total_assets, b.total_liabilities, b.net_worth, b.financial_health
         FROM (SELECT year_month FROM payment_schedules
               UNION SELECT year_month FROM monthly_cashflows
               UNION SELECT year_month FROM monthly_balance_sheets) m
         LEFT JOIN payment_schedules p ON p.year_month = m.year_month
         LEFT JOIN monthly_cashflows c ON c.year_month = m.year_month
         LEFT JOIN monthly_balance_sheets b ON b.year_month = m.year_month
         ORDER BY m.year_month",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, Option<i64>>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, Option<i64>>(3)?,
            r.get::<_, Option<i64>>(4)?,
            r.get::<_, Option<i64>>(5)?,
            r.get::<_, Option<String>>(6)?,
            r.get::<_, Option<i64>>(7)?,
            r.get::<_, Option<i64>>(8)?,
            r.get::<_, Option<i64>>(9)?,
            r.get::<_, Option<String>>(10)?,
        ))
    })?;

    let headers = [
        "month",
        "total_payment",
        "schedule_risk",
        "total_income",
        "total_expense",
        "net_cashflow",
        "cashflow_risk",
        "total_assets",
        "total_liabilities",
        "net_worth",
        "financial_health",
    ];

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(headers)?;
            for row in rows {
                let (month, pay, prisk, inc, exp, net, crisk, assets, debts, worth, health) = row?;
                let cell = |v: Option<i64>| v.map(|x| x.to_string()).unwrap_or_default();
                wtr.write_record([
                    month,
                    cell(pay),
                    prisk.unwrap_or_default(),
                    cell(inc),
                    cell(exp),
                    cell(net),
                    crisk.unwrap_or_default(),
                    cell(assets),
                    cell(debts),
                    cell(worth),
                    health.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (month, pay, prisk, inc, exp, net, crisk, assets, debts, worth, health) = row?;
                items.push(json!({
                    "month": month,
                    "total_payment": pay, "schedule_risk": prisk,
                    "total_income": inc, "total_expense": exp,
                    "net_cashflow": net, "cashflow_risk": crisk,
                    "total_assets": assets, "total_liabilities": debts,
                    "net_worth": worth, "financial_health": health
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => return Err(anyhow!("Unknown format: {} (use csv|json)", fmt)),
    }
    println!("Exported snapshots to {}", out);
    Ok(())
}

fn export_usages(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT u.usage_date, c.name AS card, u.amount, u.merchant, u.payment_date, u.is_paid
         FROM credit_usages u
         JOIN credit_cards c ON u.card_id=c.id
         ORDER BY u.usage_date, u.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, i64>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, bool>(5)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "card", "amount", "merchant", "payment_date", "is_paid"])?;
            for row in rows {
                let (date, card, amount, merchant, debit, paid) = row?;
                wtr.write_record([
                    date,
                    card,
                    amount.to_string(),
                    merchant.unwrap_or_default(),
                    debit.unwrap_or_default(),
                    paid.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (date, card, amount, merchant, debit, paid) = row?;
                items.push(json!({
                    "date": date, "card": card, "amount": amount,
                    "merchant": merchant, "payment_date": debit, "is_paid": paid
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => return Err(anyhow!("Unknown format: {} (use csv|json)", fmt)),
    }
    println!("Exported usages to {}", out);
    Ok(())
}
