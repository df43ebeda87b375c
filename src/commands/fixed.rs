// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{FixedExpense, FixedExpenseCategory};
use crate::utils::{fmt_yen, maybe_print_json, parse_amount, parse_day, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let category: FixedExpenseCategory = sub.get_one::<String>("category").unwrap().parse()?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let day = sub
        .get_one::<String>("day")
        .map(|s| parse_day(s))
        .transpose()?;
    let is_loan = sub.get_flag("loan");
    let months = sub
        .get_one::<String>("months")
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| anyhow!("Invalid remaining months '{}'", s))
        })
        .transpose()?;
    if months.is_some() && !is_loan {
        return Err(anyhow!("--months requires --loan"));
    }
    let memo = sub.get_one::<String>("memo").map(|s| s.to_string());

    conn.execute(
        "INSERT INTO fixed_expenses(name, category, monthly_amount, payment_day,
                                    is_loan, remaining_months, memo)
         VALUES (?1,?2,?3,?4,?5,?6,?7)",
        params![name, category.as_str(), amount, day, is_loan, months, memo],
    )?;
    println!(
        "Added fixed expense '{}' ({}, {}/month)",
        name,
        category.as_str(),
        fmt_yen(amount)
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let include_inactive = sub.get_flag("all");

    let mut sql = String::from(
        "SELECT id, name, category, monthly_amount, payment_day, is_loan,
                remaining_months, is_active
         FROM fixed_expenses",
    );
    if !include_inactive {
        sql.push_str(" WHERE is_active=1");
    }
    sql.push_str(" ORDER BY category, name");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, i64>(3)?,
            r.get::<_, Option<u32>>(4)?,
            r.get::<_, bool>(5)?,
            r.get::<_, Option<i64>>(6)?,
            r.get::<_, bool>(7)?,
        ))
    })?;

    let mut expenses = Vec::new();
    for row in rows {
        let (id, name, cat, amount, day, is_loan, months, active) = row?;
        expenses.push(FixedExpense {
            id,
            name,
            category: cat.parse()?,
            monthly_amount: amount,
            payment_day: day,
            is_loan,
            remaining_months: months,
            is_active: active,
        });
    }

    if maybe_print_json(json_flag, jsonl_flag, &expenses)? {
        return Ok(());
    }
    let data = expenses
        .iter()
        .map(|f| {
            vec![
                f.name.clone(),
                f.category.as_str().to_string(),
                fmt_yen(f.monthly_amount),
                if f.is_loan { "yes" } else { "no" }.to_string(),
                f.remaining_months.map(|m| m.to_string()).unwrap_or_default(),
                fmt_yen(f.total_remaining()),
                if f.is_active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Name", "Category", "Monthly", "Loan", "Months left", "Remaining", "Active"],
            data
        )
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let n = conn.execute(
        "UPDATE fixed_expenses SET is_active=0 WHERE name=?1",
        params![name],
    )?;
    if n == 0 {
        return Err(anyhow!("Fixed expense '{}' not found", name));
    }
    println!("Deactivated fixed expense '{}'", name);
    Ok(())
}
