// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::CreditUsage;
use crate::utils::{
    card_by_name, fmt_yen, maybe_print_json, parse_amount, parse_date, parse_month, pretty_table,
};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let card = card_by_name(conn, sub.get_one::<String>("card").unwrap())?;
    let usage_date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let merchant = sub.get_one::<String>("merchant").map(|s| s.to_string());
    let memo = sub.get_one::<String>("memo").map(|s| s.to_string());

    // Projected once here; recomputes never touch it.
    let payment_date = card.project_payment_date(usage_date);

    conn.execute(
        "INSERT INTO credit_usages(card_id, usage_date, amount, merchant, payment_date, memo)
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![
            card.id,
            usage_date.to_string(),
            amount,
            merchant,
            payment_date.to_string(),
            memo
        ],
    )?;
    println!(
        "Recorded {} on {} ({}), debited {}",
        fmt_yen(amount),
        usage_date,
        card.name,
        payment_date
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let unpaid_only = sub.get_flag("unpaid");
    let month = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()?;

    let mut sql = String::from(
        "SELECT u.id, u.card_id, c.name, u.usage_date, u.amount, u.merchant,
                u.payment_date, u.is_paid
         FROM credit_usages u JOIN credit_cards c ON u.card_id=c.id
         WHERE 1=1",
    );
    if month.is_some() {
        sql.push_str(" AND substr(u.payment_date, 1, 7) = ?1");
    }
    if unpaid_only {
        sql.push_str(" AND u.is_paid = 0");
    }
    sql.push_str(" ORDER BY u.usage_date DESC, u.id DESC");

    fn map_row(
        r: &rusqlite::Row<'_>,
    ) -> rusqlite::Result<(i64, i64, String, String, i64, Option<String>, Option<String>, bool)>
    {
        Ok((
            r.get(0)?,
            r.get(1)?,
            r.get(2)?,
            r.get(3)?,
            r.get(4)?,
            r.get(5)?,
            r.get(6)?,
            r.get(7)?,
        ))
    }
    let mut stmt = conn.prepare(&sql)?;
    let rows = match month {
        Some(ref m) => stmt.query_map(params![m], map_row)?,
        None => stmt.query_map([], map_row)?,
    };

    let mut usages = Vec::new();
    for row in rows {
        let (id, card_id, card_name, date, amount, merchant, debit, paid) = row?;
        let usage = CreditUsage {
            id,
            card_id,
            usage_date: parse_date(&date)?,
            amount,
            merchant,
            payment_date: debit.as_deref().map(parse_date).transpose()?,
            is_paid: paid,
        };
        usages.push((usage, card_name));
    }

    if json_flag || jsonl_flag {
        let bare: Vec<&CreditUsage> = usages.iter().map(|(u, _)| u).collect();
        maybe_print_json(json_flag, jsonl_flag, &bare)?;
        return Ok(());
    }
    let data = usages
        .iter()
        .map(|(u, card_name)| {
            vec![
                u.usage_date.to_string(),
                card_name.clone(),
                fmt_yen(u.amount),
                u.merchant.clone().unwrap_or_default(),
                u.payment_date.map(|d| d.to_string()).unwrap_or_default(),
                if u.is_paid { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Card", "Amount", "Merchant", "Debit", "Paid"], data)
    );
    Ok(())
}

fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let n = match sub.get_one::<String>("card") {
        Some(name) => {
            let card = card_by_name(conn, name)?;
            conn.execute(
                "UPDATE credit_usages SET is_paid=1
                 WHERE card_id=?1 AND is_paid=0 AND substr(payment_date, 1, 7)=?2",
                params![card.id, month],
            )?
        }
        None => conn.execute(
            "UPDATE credit_usages SET is_paid=1
             WHERE is_paid=0 AND substr(payment_date, 1, 7)=?1",
            params![month],
        )?,
    };
    println!("Marked {} usage row(s) as settled for {}", n, month);
    Ok(())
}
