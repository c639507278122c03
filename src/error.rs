// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Errors raised on genuinely invalid, untyped input.
//!
//! The calculators themselves never fail: they recover locally to a neutral
//! value. These variants only surface when a caller parses raw strings
//! (month keys, dates, amounts) or looks up a record that is not there.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid decimal '{0}'")]
    InvalidDecimal(String),
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
}
