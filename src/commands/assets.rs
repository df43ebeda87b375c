// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Asset, AssetCategory};
use crate::utils::{
    InvestmentBucket, fmt_yen, maybe_print_json, parse_amount, parse_date, pretty_table,
};
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
    let category: AssetCategory = sub.get_one::<String>("category").unwrap().parse()?;
    let subcategory = sub.get_one::<String>("subcategory").map(|s| s.to_string());
    if let Some(ref sc) = subcategory {
        if category != AssetCategory::Investment {
            return Err(anyhow!("--subcategory only applies to investment assets"));
        }
        InvestmentBucket::parse(sc)
            .ok_or_else(|| anyhow!("Unknown subcategory '{}' (stocks|bonds|investment_trusts|crypto)", sc))?;
    }
    let value = parse_amount(sub.get_one::<String>("value").unwrap())?;
    let acquired = sub
        .get_one::<String>("acquired")
        .map(|s| parse_date(s))
        .transpose()?;
    let cost = sub
        .get_one::<String>("cost")
        .map(|s| parse_amount(s))
        .transpose()?;
    let institution = sub.get_one::<String>("institution").map(|s| s.to_string());
    let memo = sub.get_one::<String>("memo").map(|s| s.to_string());

    conn.execute(
        "INSERT INTO assets(name, category, subcategory, current_value, acquisition_date,
                            acquisition_cost, institution, memo)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
        params![
            name,
            category.as_str(),
            subcategory,
            value,
            acquired.map(|d| d.to_string()),
            cost,
            institution,
            memo
        ],
    )?;
    println!("Added asset '{}' ({}, {})", name, category.as_str(), fmt_yen(value));
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let include_inactive = sub.get_flag("all");

    let mut sql = String::from(
        "SELECT id, name, category, subcategory, current_value, acquisition_date,
                acquisition_cost, institution, is_active
         FROM assets",
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
            r.get::<_, Option<String>>(3)?,
            r.get::<_, i64>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<i64>>(6)?,
            r.get::<_, Option<String>>(7)?,
            r.get::<_, bool>(8)?,
        ))
    })?;

    let mut assets = Vec::new();
    for row in rows {
        let (id, name, cat, sub_cat, value, acquired, cost, institution, active) = row?;
        assets.push(Asset {
            id,
            name,
            category: cat.parse()?,
            subcategory: sub_cat,
            current_value: value,
            acquisition_date: acquired.as_deref().map(parse_date).transpose()?,
            acquisition_cost: cost,
            institution,
            is_active: active,
        });
    }

    if maybe_print_json(json_flag, jsonl_flag, &assets)? {
        return Ok(());
    }
    let data = assets
        .iter()
        .map(|a| {
            vec![
                a.name.clone(),
                a.category.as_str().to_string(),
                a.subcategory.clone().unwrap_or_default(),
                fmt_yen(a.current_value),
                fmt_yen(a.unrealized_gain()),
                format!("{}%", a.unrealized_gain_ratio()),
                if a.is_active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Name", "Category", "Sub", "Value", "Gain", "Gain %", "Active"],
            data
        )
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let n = conn.execute(
        "UPDATE assets SET is_active=0 WHERE name=?1",
        params![name],
    )?;
    if n == 0 {
        return Err(anyhow!("Asset '{}' not found", name));
    }
    println!("Deactivated asset '{}'", name);
    Ok(())
}
