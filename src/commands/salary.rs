// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::SalaryRecord;
use crate::utils::{fmt_yen, maybe_print_json, parse_amount, parse_month, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn opt_amount(sub: &clap::ArgMatches, key: &str) -> Result<i64> {
    match sub.get_one::<String>(key) {
        Some(s) => parse_amount(s),
        None => Ok(0),
    }
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut record = SalaryRecord {
        year_month: parse_month(sub.get_one::<String>("month").unwrap())?,
        base_salary: parse_amount(sub.get_one::<String>("base").unwrap())?,
        allowances: opt_amount(sub, "allowances")?,
        overtime_pay: opt_amount(sub, "overtime")?,
        commuting_allowance: opt_amount(sub, "commute")?,
        health_insurance: opt_amount(sub, "health")?,
        pension_insurance: opt_amount(sub, "pension")?,
        employment_insurance: opt_amount(sub, "employment")?,
        income_tax: opt_amount(sub, "income-tax")?,
        resident_tax: opt_amount(sub, "resident-tax")?,
        other_deduction: opt_amount(sub, "other-deduction")?,
        ..Default::default()
    };
    record.derive_totals();
    let memo = sub.get_one::<String>("memo").map(|s| s.to_string());

    conn.execute(
        "INSERT INTO salary_records(
            year_month, base_salary, allowances, overtime_pay, commuting_allowance,
            health_insurance, pension_insurance, employment_insurance,
            income_tax, resident_tax, other_deduction,
            total_payment, total_deduction, net_payment, memo
         ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15)
         ON CONFLICT(year_month) DO UPDATE SET
            base_salary=excluded.base_salary,
            allowances=excluded.allowances,
            overtime_pay=excluded.overtime_pay,
            commuting_allowance=excluded.commuting_allowance,
            health_insurance=excluded.health_insurance,
            pension_insurance=excluded.pension_insurance,
            employment_insurance=excluded.employment_insurance,
            income_tax=excluded.income_tax,
            resident_tax=excluded.resident_tax,
            other_deduction=excluded.other_deduction,
            total_payment=excluded.total_payment,
            total_deduction=excluded.total_deduction,
            net_payment=excluded.net_payment",
        params![
            record.year_month,
            record.base_salary,
            record.allowances,
            record.overtime_pay,
            record.commuting_allowance,
            record.health_insurance,
            record.pension_insurance,
            record.employment_insurance,
            record.income_tax,
            record.resident_tax,
            record.other_deduction,
            record.total_payment,
            record.total_deduction,
            record.net_payment,
            memo
        ],
    )?;
    println!(
        "Saved salary for {}: net {} (paid {}, deducted {})",
        record.year_month,
        fmt_yen(record.net_payment),
        fmt_yen(record.total_payment),
        fmt_yen(record.total_deduction)
    );
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;

    let record: Option<SalaryRecord> = conn
        .query_row(
            "SELECT year_month, base_salary, allowances, overtime_pay, commuting_allowance,
                    health_insurance, pension_insurance, employment_insurance,
                    income_tax, resident_tax, other_deduction,
                    total_payment, total_deduction, net_payment
             FROM salary_records WHERE year_month=?1",
            params![month],
            |r| {
                Ok(SalaryRecord {
                    year_month: r.get(0)?,
                    base_salary: r.get(1)?,
                    allowances: r.get(2)?,
                    overtime_pay: r.get(3)?,
                    commuting_allowance: r.get(4)?,
                    health_insurance: r.get(5)?,
                    pension_insurance: r.get(6)?,
                    employment_insurance: r.get(7)?,
                    income_tax: r.get(8)?,
                    resident_tax: r.get(9)?,
                    other_deduction: r.get(10)?,
                    total_payment: r.get(11)?,
                    total_deduction: r.get(12)?,
                    net_payment: r.get(13)?,
                })
            },
        )
        .optional()?;
    let Some(record) = record else {
        return Err(anyhow!("No salary record for {}", month));
    };

    if maybe_print_json(json_flag, jsonl_flag, &record)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Base salary".into(), fmt_yen(record.base_salary)],
        vec!["Allowances".into(), fmt_yen(record.allowances)],
        vec!["Overtime".into(), fmt_yen(record.overtime_pay)],
        vec!["Commuting".into(), fmt_yen(record.commuting_allowance)],
        vec!["Total paid".into(), fmt_yen(record.total_payment)],
        vec!["Health insurance".into(), fmt_yen(record.health_insurance)],
        vec!["Pension".into(), fmt_yen(record.pension_insurance)],
        vec![
            "Employment insurance".into(),
            fmt_yen(record.employment_insurance),
        ],
        vec!["Income tax".into(), fmt_yen(record.income_tax)],
        vec!["Resident tax".into(), fmt_yen(record.resident_tax)],
        vec!["Other deductions".into(), fmt_yen(record.other_deduction)],
        vec!["Total deducted".into(), fmt_yen(record.total_deduction)],
        vec!["Net payment".into(), fmt_yen(record.net_payment)],
    ];
    println!("Salary for {}", record.year_month);
    println!("{}", pretty_table(&["Item", "Amount"], rows));
    Ok(())
}
