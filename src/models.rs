// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use crate::utils::{last_day_of_month, pct};
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

macro_rules! category_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            pub const ALL: &'static [&'static str] = &[$($text),+];
        }

        impl FromStr for $name {
            type Err = LedgerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(LedgerError::UnknownCategory {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

category_enum!(AssetCategory, "asset", {
    Cash => "cash",
    Bank => "bank",
    Investment => "investment",
    RealEstate => "real_estate",
    Vehicle => "vehicle",
    Other => "other",
});

category_enum!(LiabilityCategory, "liability", {
    HousingLoan => "housing_loan",
    CarLoan => "car_loan",
    CardLoan => "card_loan",
    StudentLoan => "student_loan",
    PersonalLoan => "personal_loan",
    Other => "other",
});

category_enum!(FixedExpenseCategory, "fixed expense", {
    Loan => "loan",
    Insurance => "insurance",
    Subscription => "subscription",
    Utility => "utility",
    Communication => "communication",
    Rent => "rent",
    Other => "other",
});

category_enum!(IncomeCategory, "income", {
    SideBusiness => "side_business",
    RentIncome => "rent_income",
    Investment => "investment",
    Refund => "refund",
    Bonus => "bonus",
    Temporary => "temporary",
    Other => "other",
});

category_enum!(VariableExpenseCategory, "variable expense", {
    Food => "food",
    DailyGoods => "daily_goods",
    Clothing => "clothing",
    Social => "social",
    Transport => "transport",
    Medical => "medical",
    Education => "education",
    Entertainment => "entertainment",
    Other => "other",
});

/// 3-level classification used by the payment schedule and cash flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Safe,
    Warning,
    Danger,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl FromStr for RiskLevel {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "safe" => Ok(Self::Safe),
            "warning" => Ok(Self::Warning),
            "danger" => Ok(Self::Danger),
            _ => Err(LedgerError::UnknownCategory {
                kind: "risk level",
                value: s.to_string(),
            }),
        }
    }
}

/// 5-level classification used by the balance sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinancialHealth {
    Excellent,
    Good,
    #[default]
    Fair,
    Warning,
    Danger,
}

impl FinancialHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl FromStr for FinancialHealth {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "excellent" => Ok(Self::Excellent),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            "warning" => Ok(Self::Warning),
            "danger" => Ok(Self::Danger),
            _ => Err(LedgerError::UnknownCategory {
                kind: "financial health",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub name: String,
    pub category: AssetCategory,
    pub subcategory: Option<String>,
    pub current_value: i64,
    pub acquisition_date: Option<NaiveDate>,
    pub acquisition_cost: Option<i64>,
    pub institution: Option<String>,
    pub is_active: bool,
}

impl Asset {
    pub fn unrealized_gain(&self) -> i64 {
        match self.acquisition_cost {
            Some(cost) => self.current_value - cost,
            None => 0,
        }
    }

    pub fn unrealized_gain_ratio(&self) -> Decimal {
        match self.acquisition_cost {
            Some(cost) if cost > 0 => pct(self.current_value - cost, cost),
            _ => Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Liability {
    pub id: i64,
    pub name: String,
    pub category: LiabilityCategory,
    pub current_balance: i64,
    pub original_amount: i64,
    pub monthly_payment: i64,
    pub remaining_months: i64,
    pub payment_day: Option<u32>,
    pub lender: Option<String>,
    pub is_active: bool,
}

impl Liability {
    /// Approximate interest still to pay over the remaining schedule.
    pub fn total_interest(&self) -> i64 {
        self.monthly_payment * self.remaining_months - self.current_balance
    }

    pub fn repayment_ratio(&self) -> Decimal {
        pct(self.original_amount - self.current_balance, self.original_amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedExpense {
    pub id: i64,
    pub name: String,
    pub category: FixedExpenseCategory,
    pub monthly_amount: i64,
    pub payment_day: Option<u32>,
    pub is_loan: bool,
    pub remaining_months: Option<i64>,
    pub is_active: bool,
}

impl FixedExpense {
    pub fn total_remaining(&self) -> i64 {
        match (self.is_loan, self.remaining_months) {
            (true, Some(months)) => self.monthly_amount * months,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: i64,
    pub name: String,
    pub last4: Option<String>,
    pub closing_day: u32,
    pub payment_day: u32,
    pub is_active: bool,
}

impl CreditCard {
    /// Billing-cycle projection: usage after the closing day settles two
    /// months out, otherwise one month out, on the card's payment day
    /// clamped to the landing month's last day. Computed once at insert and
    /// stored; never recalculated for existing rows.
    pub fn project_payment_date(&self, usage_date: NaiveDate) -> NaiveDate {
        let months = if usage_date.day() > self.closing_day {
            2
        } else {
            1
        };
        let landing = usage_date + Months::new(months);
        let day = self
            .payment_day
            .min(last_day_of_month(landing.year(), landing.month()));
        // Day is clamped into the month, so this cannot be out of range.
        NaiveDate::from_ymd_opt(landing.year(), landing.month(), day)
            .unwrap_or(landing)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditUsage {
    pub id: i64,
    pub card_id: i64,
    pub usage_date: NaiveDate,
    pub amount: i64,
    pub merchant: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub is_paid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortTermLoan {
    pub id: i64,
    pub name: String,
    pub monthly_payment: i64,
    pub remaining_months: i64,
    pub payment_day: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub is_active: bool,
}

impl ShortTermLoan {
    pub fn total_remaining(&self) -> i64 {
        self.monthly_payment * self.remaining_months
    }

    pub fn completion_date(&self) -> Option<NaiveDate> {
        let start = self.start_date?;
        Some(start + Months::new(self.remaining_months.max(0) as u32))
    }
}

/// Monthly salary slip. Totals are derived with `derive_totals` before every
/// write; `net_payment` is what the cash flow reads as salary_net.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalaryRecord {
    pub year_month: String,
    pub base_salary: i64,
    pub allowances: i64,
    pub overtime_pay: i64,
    pub commuting_allowance: i64,
    pub health_insurance: i64,
    pub pension_insurance: i64,
    pub employment_insurance: i64,
    pub income_tax: i64,
    pub resident_tax: i64,
    pub other_deduction: i64,
    pub total_payment: i64,
    pub total_deduction: i64,
    pub net_payment: i64,
}

impl SalaryRecord {
    pub fn derive_totals(&mut self) {
        self.total_payment =
            self.base_salary + self.allowances + self.overtime_pay + self.commuting_allowance;
        self.total_deduction = self.health_insurance
            + self.pension_insurance
            + self.employment_insurance
            + self.income_tax
            + self.resident_tax
            + self.other_deduction;
        self.net_payment = self.total_payment - self.total_deduction;
    }
}
