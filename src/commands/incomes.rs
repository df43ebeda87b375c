// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::IncomeCategory;
use crate::utils::{fmt_yen, maybe_print_json, parse_amount, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let category: IncomeCategory = sub.get_one::<String>("category").unwrap().parse()?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let source = sub.get_one::<String>("source").map(|s| s.to_string());
    let memo = sub.get_one::<String>("memo").map(|s| s.to_string());

    conn.execute(
        "INSERT INTO incomes(year_month, category, amount, source, memo)
         VALUES (?1,?2,?3,?4,?5)",
        params![month, category.as_str(), amount, source, memo],
    )?;
    println!(
        "Recorded {} income of {} for {}",
        category.as_str(),
        fmt_yen(amount),
        month
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;

    let mut stmt = conn.prepare(
        "SELECT category, amount, IFNULL(source, '') FROM incomes
         WHERE year_month=?1 ORDER BY category, id",
    )?;
    let rows = stmt.query_map(params![month], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (cat, amount, source) = row?;
        data.push(vec![cat, fmt_yen(amount), source]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Category", "Amount", "Source"], data));
    }
    Ok(())
}
