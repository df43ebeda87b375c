// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Thresholds;
use crate::error::LedgerError;
use crate::pipeline;
use crate::schedule::{self, PaymentSchedule};
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

    let s = if sub.get_flag("update") {
        let limits = Thresholds::load(conn)?;
        let s = pipeline::refresh_schedule(conn, &month, &limits)?;
        println!("Recomputed payment schedule for {}", month);
        s
    } else {
        schedule::load(conn, &month)?.ok_or(LedgerError::SnapshotMissing {
            kind: "payment schedule",
            month: month.clone(),
        })?
    };

    if maybe_print_json(json_flag, jsonl_flag, &s)? {
        return Ok(());
    }
    print_schedule(&s);
    Ok(())
}

pub fn print_schedule(s: &PaymentSchedule) {
    if s.credit_card_payments.is_empty() {
        println!("No credit-card debits for {}", s.year_month);
    } else {
        let mut rows: Vec<Vec<String>> = s
            .credit_card_payments
            .iter()
            .map(|(name, amount)| vec![name.clone(), fmt_yen(*amount)])
            .collect();
        rows.push(vec!["Total".into(), fmt_yen(s.total_credit_payment)]);
        println!("{}", pretty_table(&["Card", "Debit"], rows));
    }

    if s.loan_payments.is_empty() {
        println!("No loan payments for {}", s.year_month);
    } else {
        let mut rows: Vec<Vec<String>> = s
            .loan_payments
            .iter()
            .map(|(name, amount)| vec![name.clone(), fmt_yen(*amount)])
            .collect();
        rows.push(vec!["Total".into(), fmt_yen(s.total_loan_payment)]);
        println!("{}", pretty_table(&["Loan", "Payment"], rows));
    }

    println!("Total due: {}", fmt_yen(s.total_payment));
    println!("Risk level: {}", s.risk_level.as_str());
}
