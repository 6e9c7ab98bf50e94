use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ratios::RatioKind;
use crate::statement::StatementLine;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FinRatioError {
    #[error("Duplicate statement key: {entity_id} / {fiscal_year} appears more than once")]
    DuplicateKey { entity_id: String, fiscal_year: i32 },

    #[error("Division by zero in {ratio} for {entity_id} / {fiscal_year}: {denominator} is zero")]
    DivisionByZero {
        entity_id: String,
        fiscal_year: i32,
        ratio: RatioKind,
        denominator: String,
    },

    #[error("Missing field for {ratio} in {entity_id} / {fiscal_year}: {field} not supplied")]
    MissingField {
        entity_id: String,
        fiscal_year: i32,
        ratio: RatioKind,
        field: StatementLine,
    },

    #[error("{ratio} for {entity_id} / {fiscal_year} depends on {dependency}, which could not be derived")]
    DependencyUnavailable {
        entity_id: String,
        fiscal_year: i32,
        ratio: RatioKind,
        dependency: RatioKind,
    },

    #[error("Arithmetic overflow in {ratio} for {entity_id} / {fiscal_year}")]
    Overflow {
        entity_id: String,
        fiscal_year: i32,
        ratio: RatioKind,
    },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl FinRatioError {
    /// The ratio a per-record derivation error is attached to.
    pub fn ratio(&self) -> Option<RatioKind> {
        match self {
            Self::DivisionByZero { ratio, .. }
            | Self::MissingField { ratio, .. }
            | Self::DependencyUnavailable { ratio, .. }
            | Self::Overflow { ratio, .. } => Some(*ratio),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FinRatioError {
    fn from(e: serde_json::Error) -> Self {
        FinRatioError::SerializationError(e.to_string())
    }
}
