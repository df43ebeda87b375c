// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Liability, LiabilityCategory};
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
    let category: LiabilityCategory = sub.get_one::<String>("category").unwrap().parse()?;
    let balance = parse_amount(sub.get_one::<String>("balance").unwrap())?;
    let original = parse_amount(sub.get_one::<String>("original").unwrap())?;
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
    let lender = sub.get_one::<String>("lender").map(|s| s.to_string());
    let memo = sub.get_one::<String>("memo").map(|s| s.to_string());

    conn.execute(
        "INSERT INTO liabilities(name, category, current_balance, original_amount,
                                 monthly_payment, remaining_months, payment_day, lender, memo)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
        params![
            name,
            category.as_str(),
            balance,
            original,
            payment,
            months,
            day,
            lender,
            memo
        ],
    )?;
    println!(
        "Added liability '{}' ({}, balance {})",
        name,
        category.as_str(),
        fmt_yen(balance)
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let include_inactive = sub.get_flag("all");

    let mut sql = String::from(
        "SELECT id, name, category, current_balance, original_amount, monthly_payment,
                remaining_months, payment_day, lender, is_active
         FROM liabilities",
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
            r.get::<_, i64>(4)?,
            r.get::<_, i64>(5)?,
            r.get::<_, i64>(6)?,
            r.get::<_, Option<u32>>(7)?,
            r.get::<_, Option<String>>(8)?,
            r.get::<_, bool>(9)?,
        ))
    })?;

    let mut liabilities = Vec::new();
    for row in rows {
        let (id, name, cat, balance, original, payment, months, day, lender, active) = row?;
        liabilities.push(Liability {
            id,
            name,
            category: cat.parse()?,
            current_balance: balance,
            original_amount: original,
            monthly_payment: payment,
            remaining_months: months,
            payment_day: day,
            lender,
            is_active: active,
        });
    }

    if maybe_print_json(json_flag, jsonl_flag, &liabilities)? {
        return Ok(());
    }
    let data = liabilities
        .iter()
        .map(|l| {
            vec![
                l.name.clone(),
                l.category.as_str().to_string(),
                fmt_yen(l.current_balance),
                fmt_yen(l.monthly_payment),
                l.remaining_months.to_string(),
                format!("{}%", l.repayment_ratio()),
                if l.is_active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Name", "Category", "Balance", "Monthly", "Months left", "Repaid %", "Active"],
            data
        )
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let n = conn.execute(
        "UPDATE liabilities SET is_active=0 WHERE name=?1",
        params![name],
    )?;
    if n == 0 {
        return Err(anyhow!("Liability '{}' not found", name));
    }
    println!("Deactivated liability '{}'", name);
    Ok(())
}
