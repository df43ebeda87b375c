// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn month_arg(required: bool) -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .required(required)
}

fn memo_arg() -> Arg {
    Arg::new("memo").long("memo").value_name("TEXT")
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn snapshot_show(about: &'static str) -> Command {
    json_flags(
        Command::new("show")
            .about(about)
            .arg(month_arg(true))
            .arg(
                Arg::new("update")
                    .long("update")
                    .action(ArgAction::SetTrue)
                    .help("Recompute from raw records before showing"),
            ),
    )
}

pub fn build_cli() -> Command {
    Command::new("kakeibo")
        .about("Personal-finance ledger: monthly cash flow, balance sheet, and payment schedule")
        .version(crate_version!())
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("asset")
                .about("Manage assets")
                .subcommand(
                    Command::new("add")
                        .about("Add an asset")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .help("cash|bank|investment|real_estate|vehicle|other"),
                        )
                        .arg(
                            Arg::new("subcategory")
                                .long("subcategory")
                                .help("stocks|bonds|investment_trusts|crypto (investment only)"),
                        )
                        .arg(Arg::new("value").long("value").required(true))
                        .arg(Arg::new("acquired").long("acquired").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("cost").long("cost").value_name("YEN"))
                        .arg(Arg::new("institution").long("institution"))
                        .arg(memo_arg()),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List assets").arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Include inactive rows"),
                    ),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Deactivate an asset")
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("liability")
                .about("Manage liabilities")
                .subcommand(
                    Command::new("add")
                        .about("Add a liability")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("category").long("category").required(true).help(
                            "housing_loan|car_loan|card_loan|student_loan|personal_loan|other",
                        ))
                        .arg(Arg::new("balance").long("balance").required(true))
                        .arg(Arg::new("original").long("original").required(true))
                        .arg(Arg::new("payment").long("payment").required(true))
                        .arg(Arg::new("months").long("months").required(true))
                        .arg(Arg::new("day").long("day").value_name("1-31"))
                        .arg(Arg::new("lender").long("lender"))
                        .arg(memo_arg()),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List liabilities").arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Include inactive rows"),
                    ),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Deactivate a liability")
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("fixed")
                .about("Manage fixed monthly expenses")
                .subcommand(
                    Command::new("add")
                        .about("Add a fixed expense")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("category").long("category").required(true).help(
                            "loan|insurance|subscription|utility|communication|rent|other",
                        ))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("day").long("day").value_name("1-31"))
                        .arg(
                            Arg::new("loan")
                                .long("loan")
                                .action(ArgAction::SetTrue)
                                .help("Mark as an installment loan"),
                        )
                        .arg(Arg::new("months").long("months").value_name("REMAINING"))
                        .arg(memo_arg()),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List fixed expenses").arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Include inactive rows"),
                    ),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Deactivate a fixed expense")
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("income")
                .about("Record non-salary income")
                .subcommand(
                    Command::new("add")
                        .about("Add an income row")
                        .arg(month_arg(true))
                        .arg(Arg::new("category").long("category").required(true).help(
                            "side_business|rent_income|investment|refund|bonus|temporary|other",
                        ))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("source").long("source"))
                        .arg(memo_arg()),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List income rows for a month")
                        .arg(month_arg(true)),
                )),
        )
        .subcommand(
            Command::new("expense")
                .about("Record variable expenses")
                .subcommand(
                    Command::new("add")
                        .about("Add a variable expense row")
                        .arg(month_arg(true))
                        .arg(Arg::new("category").long("category").required(true).help(
                            "food|daily_goods|clothing|social|transport|medical|education|entertainment|other",
                        ))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("description").long("description"))
                        .arg(memo_arg()),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List variable expenses for a month")
                        .arg(month_arg(true)),
                )),
        )
        .subcommand(
            Command::new("card")
                .about("Manage credit cards")
                .subcommand(
                    Command::new("add")
                        .about("Add a credit card")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("closing")
                                .long("closing")
                                .required(true)
                                .value_name("1-31")
                                .help("Statement closing day"),
                        )
                        .arg(
                            Arg::new("payment")
                                .long("payment")
                                .required(true)
                                .value_name("1-31")
                                .help("Debit day"),
                        )
                        .arg(Arg::new("last4").long("last4"))
                        .arg(memo_arg()),
                )
                .subcommand(json_flags(Command::new("list").about("List credit cards"))),
        )
        .subcommand(
            Command::new("usage")
                .about("Record credit-card usage")
                .subcommand(
                    Command::new("add")
                        .about("Add a usage row; the debit date is projected from the card cycle")
                        .arg(Arg::new("card").long("card").required(true).value_name("NAME"))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .value_name("YYYY-MM-DD"),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("merchant").long("merchant"))
                        .arg(memo_arg()),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List usage rows")
                        .arg(month_arg(false).help("Filter by debit month"))
                        .arg(
                            Arg::new("unpaid")
                                .long("unpaid")
                                .action(ArgAction::SetTrue)
                                .help("Only rows not yet settled"),
                        ),
                ))
                .subcommand(
                    Command::new("pay")
                        .about("Mark usage rows debited in a month as settled")
                        .arg(month_arg(true))
                        .arg(Arg::new("card").long("card").value_name("NAME")),
                ),
        )
        .subcommand(
            Command::new("loan")
                .about("Manage short-term loans")
                .subcommand(
                    Command::new("add")
                        .about("Add a short-term loan")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("payment").long("payment").required(true))
                        .arg(Arg::new("months").long("months").required(true))
                        .arg(Arg::new("day").long("day").value_name("1-31"))
                        .arg(Arg::new("start").long("start").value_name("YYYY-MM-DD"))
                        .arg(memo_arg()),
                )
                .subcommand(json_flags(Command::new("list").about("List short-term loans")))
                .subcommand(
                    Command::new("tick")
                        .about("Monthly batch: decrement remaining months, deactivate finished loans"),
                ),
        )
        .subcommand(
            Command::new("salary")
                .about("Manage monthly salary records")
                .subcommand(
                    Command::new("add")
                        .about("Add or replace the salary slip for a month")
                        .arg(month_arg(true))
                        .arg(Arg::new("base").long("base").required(true))
                        .arg(Arg::new("allowances").long("allowances"))
                        .arg(Arg::new("overtime").long("overtime"))
                        .arg(Arg::new("commute").long("commute"))
                        .arg(Arg::new("health").long("health"))
                        .arg(Arg::new("pension").long("pension"))
                        .arg(Arg::new("employment").long("employment"))
                        .arg(Arg::new("income-tax").long("income-tax"))
                        .arg(Arg::new("resident-tax").long("resident-tax"))
                        .arg(Arg::new("other-deduction").long("other-deduction"))
                        .arg(memo_arg()),
                )
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Show the salary slip for a month")
                        .arg(month_arg(true)),
                )),
        )
        .subcommand(
            Command::new("schedule")
                .about("Monthly payment schedule snapshot")
                .subcommand(snapshot_show("Show the payment schedule for a month")),
        )
        .subcommand(
            Command::new("cashflow")
                .about("Monthly cash flow snapshot")
                .subcommand(snapshot_show("Show the cash flow for a month"))
                .subcommand(
                    Command::new("set")
                        .about("Set the user-carried fields for a month")
                        .arg(month_arg(true))
                        .arg(Arg::new("opening").long("opening").value_name("YEN"))
                        .arg(Arg::new("closing").long("closing").value_name("YEN"))
                        .arg(Arg::new("bonus").long("bonus").value_name("YEN"))
                        .arg(Arg::new("other").long("other").value_name("YEN"))
                        .arg(memo_arg()),
                ),
        )
        .subcommand(
            Command::new("balance")
                .about("Monthly balance sheet snapshot")
                .subcommand(snapshot_show("Show the balance sheet for a month")),
        )
        .subcommand(
            Command::new("config")
                .about("Classification thresholds")
                .subcommand(
                    Command::new("set")
                        .about("Override a threshold")
                        .arg(Arg::new("key").long("key").required(true))
                        .arg(Arg::new("value").long("value").required(true)),
                )
                .subcommand(Command::new("show").about("Show effective thresholds")),
        )
        .subcommand(
            Command::new("import")
                .about("Bulk import from CSV")
                .subcommand(
                    Command::new("usages")
                        .about("Import credit-card usage rows (date,amount,merchant[,memo])")
                        .arg(Arg::new("path").long("path").required(true))
                        .arg(Arg::new("card").long("card").required(true).value_name("NAME")),
                )
                .subcommand(
                    Command::new("expenses")
                        .about("Import variable expenses (month,category,amount[,description])")
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export to CSV or JSON")
                .subcommand(
                    Command::new("snapshots")
                        .about("Export the monthly snapshot timeline")
                        .arg(Arg::new("format").long("format").default_value("csv"))
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("usages")
                        .about("Export credit-card usage rows")
                        .arg(Arg::new("format").long("format").default_value("csv"))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Run ledger consistency checks"))
}
