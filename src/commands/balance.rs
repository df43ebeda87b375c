// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::balance::{self, MonthlyBalanceSheet};
use crate::config::Thresholds;
use crate::error::LedgerError;
use crate::pipeline;
use crate::utils::{fmt_yen, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;

    let bs = if sub.get_flag("update") {
        let limits = Thresholds::load(conn)?;
        let bs = pipeline::refresh_balance_sheet(conn, &month, &limits)?;
        println!("Recomputed balance sheet for {}", month);
        bs
    } else {
        balance::load(conn, &month)?.ok_or(LedgerError::SnapshotMissing {
            kind: "balance sheet",
            month: month.clone(),
        })?
    };

    if maybe_print_json(json_flag, jsonl_flag, &bs)? {
        return Ok(());
    }
    print_balance_sheet(&bs);
    Ok(())
}

pub fn print_balance_sheet(bs: &MonthlyBalanceSheet) {
    let asset_rows = vec![
        vec!["Cash".into(), fmt_yen(bs.cash)],
        vec!["Bank deposits".into(), fmt_yen(bs.bank_deposits)],
        vec!["Current subtotal".into(), fmt_yen(bs.current_assets)],
        vec!["Stocks".into(), fmt_yen(bs.stocks)],
        vec!["Bonds".into(), fmt_yen(bs.bonds)],
        vec!["Investment trusts".into(), fmt_yen(bs.investment_trusts)],
        vec!["Crypto".into(), fmt_yen(bs.crypto)],
        vec!["Investment subtotal".into(), fmt_yen(bs.investment_assets)],
        vec!["Real estate".into(), fmt_yen(bs.real_estate)],
        vec!["Vehicles".into(), fmt_yen(bs.vehicles)],
        vec!["Other".into(), fmt_yen(bs.other_assets)],
        vec!["Fixed subtotal".into(), fmt_yen(bs.fixed_assets)],
        vec!["Total assets".into(), fmt_yen(bs.total_assets)],
    ];
    println!("{}", pretty_table(&["Assets", "Amount"], asset_rows));

    let liability_rows = vec![
        vec!["Credit cards".into(), fmt_yen(bs.credit_card_debt)],
        vec!["Short-term loans".into(), fmt_yen(bs.short_term_loans)],
        vec!["Current subtotal".into(), fmt_yen(bs.current_liabilities)],
        vec!["Housing loan".into(), fmt_yen(bs.housing_loan)],
        vec!["Car loan".into(), fmt_yen(bs.car_loan)],
        vec!["Student loan".into(), fmt_yen(bs.student_loan)],
        vec!["Other loans".into(), fmt_yen(bs.other_loans)],
        vec!["Long-term subtotal".into(), fmt_yen(bs.long_term_liabilities)],
        vec!["Total liabilities".into(), fmt_yen(bs.total_liabilities)],
    ];
    println!("{}", pretty_table(&["Liabilities", "Amount"], liability_rows));

    println!(
        "Net worth: {} ({:+} vs previous month, {}%)",
        fmt_yen(bs.net_worth),
        bs.net_worth_change,
        bs.net_worth_change_ratio
    );
    println!(
        "Debt ratio: {}%, liquidity ratio: {}%",
        bs.debt_ratio, bs.liquidity_ratio
    );
    println!("Financial health: {}", bs.financial_health.as_str());
    if let Some(ref message) = bs.health_message {
        println!("{}", message);
    }
}
