// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use kakeibo::{cli, commands, db};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("asset", sub)) => commands::assets::handle(&conn, sub)?,
        Some(("liability", sub)) => commands::liabilities::handle(&conn, sub)?,
        Some(("fixed", sub)) => commands::fixed::handle(&conn, sub)?,
        Some(("income", sub)) => commands::incomes::handle(&conn, sub)?,
        Some(("expense", sub)) => commands::expenses::handle(&conn, sub)?,
        Some(("card", sub)) => commands::cards::handle(&conn, sub)?,
        Some(("usage", sub)) => commands::usages::handle(&conn, sub)?,
        Some(("loan", sub)) => commands::loans::handle(&conn, sub)?,
        Some(("salary", sub)) => commands::salary::handle(&conn, sub)?,
        Some(("schedule", sub)) => commands::schedule::handle(&conn, sub)?,
        Some(("cashflow", sub)) => commands::cashflow::handle(&conn, sub)?,
        Some(("balance", sub)) => commands::balance::handle(&conn, sub)?,
        Some(("config", sub)) => commands::config::handle(&conn, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
