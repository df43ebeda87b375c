// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Usage rows that never got a projected debit date
    let mut stmt = conn.prepare(
        "SELECT u.usage_date, c.name FROM credit_usages u
         JOIN credit_cards c ON u.card_id=c.id
         WHERE u.payment_date IS NULL ORDER BY u.usage_date",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let date: String = r.get(0)?;
        let card: String = r.get(1)?;
        rows.push(vec![
            "usage_missing_payment_date".into(),
            format!("{} {}", date, card),
        ]);
    }

    // 2) Loans still active with nothing left to pay
    let mut stmt2 = conn.prepare(
        "SELECT name FROM short_term_loans WHERE is_active=1 AND remaining_months=0",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let name: String = r.get(0)?;
        rows.push(vec!["loan_active_at_zero".into(), name]);
    }

    // 3) Cash flow months with no salary record behind salary_net
    let mut stmt3 = conn.prepare(
        "SELECT year_month FROM monthly_cashflows
         WHERE year_month NOT IN (SELECT year_month FROM salary_records)
         ORDER BY year_month",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let month: String = r.get(0)?;
        rows.push(vec!["cashflow_without_salary".into(), month]);
    }

    // 4) Snapshot months that never had their schedule computed
    let mut stmt4 = conn.prepare(
        "SELECT year_month FROM monthly_balance_sheets
         WHERE year_month NOT IN (SELECT year_month FROM payment_schedules)
         UNION
         SELECT year_month FROM monthly_cashflows
         WHERE year_month NOT IN (SELECT year_month FROM payment_schedules)
         ORDER BY year_month",
    )?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let month: String = r.get(0)?;
        rows.push(vec!["snapshot_without_schedule".into(), month]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
