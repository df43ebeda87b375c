// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::VariableExpenseCategory;
use crate::utils::{card_by_name, parse_amount, parse_date, parse_month};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::{Connection, params};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("usages", sub)) => import_usages(conn, sub),
        Some(("expenses", sub)) => import_expenses(conn, sub),
        _ => Ok(()),
    }
}

/// CSV columns: date, amount, merchant[, memo]. Debit dates are projected
/// from the card cycle at insert, exactly as `usage add` does.
fn import_usages(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let card = card_by_name(conn, sub.get_one::<String>("card").unwrap())?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut count = 0usize;
    for result in rdr.records() {
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim();
        let amount_raw = rec.get(1).context("amount missing")?.trim();
        let merchant = rec
            .get(2)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
        let memo = rec
            .get(3)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let usage_date =
            parse_date(date_raw).with_context(|| format!("Invalid usage date '{}'", date_raw))?;
        let amount = parse_amount(amount_raw)
            .with_context(|| format!("Invalid amount '{}' on {}", amount_raw, date_raw))?;
        let payment_date = card.project_payment_date(usage_date);

        tx.execute(
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
        count += 1;
    }
    tx.commit()?;
    println!("Imported {} usage row(s) from {} for '{}'", count, path, card.name);
    Ok(())
}

/// CSV columns: month, category, amount[, description].
fn import_expenses(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut count = 0usize;
    for result in rdr.records() {
        let rec = result?;
        let month_raw = rec.get(0).context("month missing")?.trim();
        let category_raw = rec.get(1).context("category missing")?.trim();
        let amount_raw = rec.get(2).context("amount missing")?.trim();
        let description = rec
            .get(3)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let month = parse_month(month_raw)?;
        let category: VariableExpenseCategory = category_raw
            .parse()
            .with_context(|| format!("Row for {}", month))?;
        let amount = parse_amount(amount_raw)
            .with_context(|| format!("Invalid amount '{}' for {}", amount_raw, month))?;

        tx.execute(
            "INSERT INTO variable_expenses(year_month, category, amount, description)
             VALUES (?1,?2,?3,?4)",
            params![month, category.as_str(), amount, description],
        )?;
        count += 1;
    }
    tx.commit()?;
    println!("Imported {} expense row(s) from {}", count, path);
    Ok(())
}
