// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::ShortTermLoan;
use crate::utils::{fmt_yen, maybe_print_json, parse_amount, parse_date, parse_day, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("tick", _)) => tick(conn)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let payment = parse_amount(sub.get_one::<String>("payment").unwrap())?;
    let months: i64 = sub
        .get_one::<String>("months")
        .unwrap()
        .parse()
        .map_err(|_| anyhow!("Invalid remaining months"))?;
    let day = sub
        .get_one::<String>("day")
        .map(|s| parse_day(s))
        .transpose()?;
    let start = sub
        .get_one::<String>("start")
        .map(|s| parse_date(s))
        .transpose()?;
    let memo = sub.get_one::<String>("memo").map(|s| s.to_string());

    conn.execute(
        "INSERT INTO short_term_loans(name, monthly_payment, remaining_months,
                                      payment_day, start_date, memo)
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![
            name,
            payment,
            months,
            day,
            start.map(|d| d.to_string()),
            memo
        ],
    )?;
    println!(
        "Added loan '{}' ({}/month, {} payments left)",
        name,
        fmt_yen(payment),
        months
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare(
        "SELECT id, name, monthly_payment, remaining_months, payment_day, start_date, is_active
         FROM short_term_loans ORDER BY name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, i64>(2)?,
            r.get::<_, i64>(3)?,
            r.get::<_, Option<u32>>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, bool>(6)?,
        ))
    })?;

    let mut loans = Vec::new();
    for row in rows {
        let (id, name, payment, months, day, start, active) = row?;
        loans.push(ShortTermLoan {
            id,
            name,
            monthly_payment: payment,
            remaining_months: months,
            payment_day: day,
            start_date: start.as_deref().map(parse_date).transpose()?,
            is_active: active,
        });
    }

    if maybe_print_json(json_flag, jsonl_flag, &loans)? {
        return Ok(());
    }
    let data = loans
        .iter()
        .map(|l| {
            vec![
                l.name.clone(),
                fmt_yen(l.monthly_payment),
                l.remaining_months.to_string(),
                fmt_yen(l.total_remaining()),
                l.completion_date()
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                if l.is_active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Name", "Monthly", "Months left", "Remaining", "Done by", "Active"],
            data
        )
    );
    Ok(())
}

/// Monthly batch: one payment elapsed on every active loan. Loans reaching
/// zero are deactivated in the same statement.
fn tick(conn: &Connection) -> Result<()> {
    let n = conn.execute(
        "UPDATE short_term_loans
         SET remaining_months = remaining_months - 1,
             is_active = CASE WHEN remaining_months - 1 <= 0 THEN 0 ELSE 1 END
         WHERE is_active=1 AND remaining_months > 0",
        [],
    )?;
    let finished: i64 = conn.query_row(
        "SELECT COUNT(*) FROM short_term_loans WHERE is_active=0 AND remaining_months=0",
        [],
        |r| r.get(0),
    )?;
    println!("Ticked {} loan(s); {} fully repaid", n, finished);
    Ok(())
}
