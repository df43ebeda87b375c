// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{maybe_print_json, parse_day, pretty_table};
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
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let closing = parse_day(sub.get_one::<String>("closing").unwrap())?;
    let payment = parse_day(sub.get_one::<String>("payment").unwrap())?;
    let last4 = sub.get_one::<String>("last4").map(|s| s.to_string());
    let memo = sub.get_one::<String>("memo").map(|s| s.to_string());

    conn.execute(
        "INSERT INTO credit_cards(name, last4, closing_day, payment_day, memo)
         VALUES (?1,?2,?3,?4,?5)",
        params![name, last4, closing, payment, memo],
    )?;
    println!(
        "Added card '{}' (closes day {}, debits day {})",
        name, closing, payment
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare(
        "SELECT name, IFNULL(last4, ''), closing_day, payment_day, is_active
         FROM credit_cards ORDER BY name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, u32>(2)?,
            r.get::<_, u32>(3)?,
            r.get::<_, bool>(4)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (name, last4, closing, payment, active) = row?;
        data.push(vec![
            name,
            last4,
            closing.to_string(),
            payment.to_string(),
            if active { "yes" } else { "no" }.to_string(),
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(&["Name", "Last4", "Closing day", "Debit day", "Active"], data)
        );
    }
    Ok(())
}
