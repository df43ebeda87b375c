// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Validates and normalizes a YYYY-MM month key. Months key every snapshot
/// row, so this runs before any computation touches the database.
pub fn parse_month(s: &str) -> Result<String> {
    let s = s.trim();
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .map_err(|_| LedgerError::InvalidMonth(s.to_string()))?;
    Ok(s.to_string())
}

pub fn parse_amount(s: &str) -> Result<i64> {
    let v: i64 = s
        .trim()
        .replace(',', "")
        .parse()
        .with_context(|| format!("Invalid amount '{}', expected integer yen", s))?;
    if v < 0 {
        return Err(LedgerError::NegativeAmount(v).into());
    }
    Ok(v)
}

pub fn parse_day(s: &str) -> Result<u32> {
    let d: i64 = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid day '{}', expected 1..=31", s))?;
    if !(1..=31).contains(&d) {
        return Err(LedgerError::DayOutOfRange(d).into());
    }
    Ok(d as u32)
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn month_start(month: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map_err(|_| LedgerError::InvalidMonth(month.to_string()).into())
}

pub fn month_end(month: &str) -> Result<NaiveDate> {
    let start = month_start(month)?;
    let last_day = last_day_of_month(start.year(), start.month());
    NaiveDate::from_ymd_opt(start.year(), start.month(), last_day)
        .ok_or_else(|| anyhow::anyhow!("Invalid month '{}'", month))
}

pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
    }
}

/// Shift a YYYY-MM key by a signed number of months.
pub fn shift_month(month: &str, delta: i32) -> Result<String> {
    let start = month_start(month)?;
    let total = start.year() * 12 + start.month() as i32 - 1 + delta;
    let (y, m) = (total.div_euclid(12), total.rem_euclid(12) as u32 + 1);
    Ok(format!("{:04}-{:02}", y, m))
}

pub fn prev_month(month: &str) -> Result<String> {
    shift_month(month, -1)
}

/// numer / denom × 100 as a fixed-point percentage with 2 fractional digits;
/// 0 when denom is 0.
pub fn pct(numer: i64, denom: i64) -> Decimal {
    if denom == 0 {
        return Decimal::ZERO;
    }
    let mut v = (Decimal::from(numer) * Decimal::from(100) / Decimal::from(denom)).round_dp(2);
    v.rescale(2);
    v
}

pub fn fmt_yen(v: i64) -> String {
    let neg = v < 0;
    let digits = v.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if neg {
        format!("-{}", out)
    } else {
        out
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn card_by_name(conn: &rusqlite::Connection, name: &str) -> Result<crate::models::CreditCard> {
    let mut stmt = conn.prepare(
        "SELECT id, name, last4, closing_day, payment_day, is_active
         FROM credit_cards WHERE name=?1",
    )?;
    let card = stmt
        .query_row(rusqlite::params![name], |r| {
            Ok(crate::models::CreditCard {
                id: r.get(0)?,
                name: r.get(1)?,
                last4: r.get(2)?,
                closing_day: r.get(3)?,
                payment_day: r.get(4)?,
                is_active: r.get(5)?,
            })
        })
        .with_context(|| format!("Card '{}' not found", name))?;
    Ok(card)
}

// Name-pattern heuristics for bucketing rows that carry no structural
// sub-category. An explicit subcategory field always wins over these.
static HOUSING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)housing|住宅").unwrap());
static STOCK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)stock|equity|株").unwrap());
static TRUST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)trust|fund|投資信託|投信").unwrap());
static CRYPTO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)crypto|bitcoin|暗号").unwrap());

pub fn is_housing_name(name: &str) -> bool {
    HOUSING_RE.is_match(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvestmentBucket {
    Stocks,
    Bonds,
    InvestmentTrusts,
    Crypto,
}

impl InvestmentBucket {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stocks" => Some(Self::Stocks),
            "bonds" => Some(Self::Bonds),
            "investment_trusts" => Some(Self::InvestmentTrusts),
            "crypto" => Some(Self::Crypto),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stocks => "stocks",
            Self::Bonds => "bonds",
            Self::InvestmentTrusts => "investment_trusts",
            Self::Crypto => "crypto",
        }
    }
}

/// Buckets an investment-category asset. The stored subcategory wins; names
/// matching no pattern are dropped from the split (they still count toward
/// nothing else — the documented misclassification risk of the heuristic).
pub fn classify_investment(name: &str, subcategory: Option<&str>) -> Option<InvestmentBucket> {
    if let Some(sub) = subcategory {
        return InvestmentBucket::parse(sub);
    }
    // Trust patterns first: "investment trust" would otherwise hit STOCK_RE
    // through names like "stock index fund".
    if TRUST_RE.is_match(name) {
        Some(InvestmentBucket::InvestmentTrusts)
    } else if CRYPTO_RE.is_match(name) {
        Some(InvestmentBucket::Crypto)
    } else if STOCK_RE.is_match(name) {
        Some(InvestmentBucket::Stocks)
    } else {
        None
    }
}
