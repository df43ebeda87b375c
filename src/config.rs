// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

/// Classification thresholds. Hard defaults, overridable per key through the
/// settings table so the cut-offs are data, not code.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    /// Schedule total below this is safe.
    pub schedule_safe_max: i64,
    /// Schedule total below this (and at or above safe) is warning; else danger.
    pub schedule_warning_max: i64,
    /// Cash flow closing balance below this is warning.
    pub closing_balance_floor: i64,
    /// Expense / income ratio (%) at or above this is warning.
    pub expense_ratio_warning: Decimal,
    /// Debt ratio (%) above this is warning.
    pub debt_ratio_warning: Decimal,
    /// Debt ratio (%) above this is danger.
    pub debt_ratio_danger: Decimal,
    /// Liquidity ratio (%) below this is warning when short-term debt exists.
    pub liquidity_ratio_floor: Decimal,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            schedule_safe_max: 100_000,
            schedule_warning_max: 200_000,
            closing_balance_floor: 100_000,
            expense_ratio_warning: Decimal::from(80),
            debt_ratio_warning: Decimal::from(50),
            debt_ratio_danger: Decimal::from(70),
            liquidity_ratio_floor: Decimal::from(100),
        }
    }
}

pub const THRESHOLD_KEYS: &[&str] = &[
    "schedule_safe_max",
    "schedule_warning_max",
    "closing_balance_floor",
    "expense_ratio_warning",
    "debt_ratio_warning",
    "debt_ratio_danger",
    "liquidity_ratio_floor",
];

fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![format!("threshold.{}", key)],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

impl Thresholds {
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut t = Self::default();
        let parse_int = |key: &str, s: String| -> Result<i64> {
            s.parse::<i64>()
                .with_context(|| format!("Invalid threshold.{} value '{}'", key, s))
        };
        let parse_dec = |key: &str, s: String| -> Result<Decimal> {
            s.parse::<Decimal>()
                .with_context(|| format!("Invalid threshold.{} value '{}'", key, s))
        };

        if let Some(s) = get_setting(conn, "schedule_safe_max")? {
            t.schedule_safe_max = parse_int("schedule_safe_max", s)?;
        }
        if let Some(s) = get_setting(conn, "schedule_warning_max")? {
            t.schedule_warning_max = parse_int("schedule_warning_max", s)?;
        }
        if let Some(s) = get_setting(conn, "closing_balance_floor")? {
            t.closing_balance_floor = parse_int("closing_balance_floor", s)?;
        }
        if let Some(s) = get_setting(conn, "expense_ratio_warning")? {
            t.expense_ratio_warning = parse_dec("expense_ratio_warning", s)?;
        }
        if let Some(s) = get_setting(conn, "debt_ratio_warning")? {
            t.debt_ratio_warning = parse_dec("debt_ratio_warning", s)?;
        }
        if let Some(s) = get_setting(conn, "debt_ratio_danger")? {
            t.debt_ratio_danger = parse_dec("debt_ratio_danger", s)?;
        }
        if let Some(s) = get_setting(conn, "liquidity_ratio_floor")? {
            t.liquidity_ratio_floor = parse_dec("liquidity_ratio_floor", s)?;
        }
        Ok(t)
    }
}

pub fn set_threshold(conn: &Connection, key: &str, value: &str) -> Result<()> {
    if !THRESHOLD_KEYS.contains(&key) {
        return Err(anyhow!(
            "Unknown threshold '{}' (known: {})",
            key,
            THRESHOLD_KEYS.join(", ")
        ));
    }
    value
        .parse::<Decimal>()
        .with_context(|| format!("Invalid threshold value '{}'", value))?;
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![format!("threshold.{}", key), value],
    )?;
    Ok(())
}
