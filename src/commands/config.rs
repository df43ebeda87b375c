// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{THRESHOLD_KEYS, Thresholds, set_threshold};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            let value = sub.get_one::<String>("value").unwrap();
            set_threshold(conn, key, value)?;
            println!("Set threshold.{} = {}", key, value);
        }
        Some(("show", _)) => {
            let t = Thresholds::load(conn)?;
            let rows = vec![
                vec![THRESHOLD_KEYS[0].to_string(), t.schedule_safe_max.to_string()],
                vec![THRESHOLD_KEYS[1].to_string(), t.schedule_warning_max.to_string()],
                vec![THRESHOLD_KEYS[2].to_string(), t.closing_balance_floor.to_string()],
                vec![THRESHOLD_KEYS[3].to_string(), t.expense_ratio_warning.to_string()],
                vec![THRESHOLD_KEYS[4].to_string(), t.debt_ratio_warning.to_string()],
                vec![THRESHOLD_KEYS[5].to_string(), t.debt_ratio_danger.to_string()],
                vec![THRESHOLD_KEYS[6].to_string(), t.liquidity_ratio_floor.to_string()],
            ];
            println!("{}", pretty_table(&["Threshold", "Value"], rows));
        }
        _ => {}
    }
    Ok(())
}
