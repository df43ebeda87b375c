// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Domain validation failures, surfaced before any computation runs.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Day {0} is out of range, expected 1..=31")]
    DayOutOfRange(i64),

    #[error("Unknown {kind} category '{value}'")]
    UnknownCategory { kind: &'static str, value: String },

    #[error("No {kind} stored for {month} (pass --update to compute it)")]
    SnapshotMissing { kind: &'static str, month: String },

    #[error("Amount {0} must not be negative")]
    NegativeAmount(i64),
}
