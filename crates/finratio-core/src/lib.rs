//! Financial-statement ratio derivation.
//!
//! [`ratios::RatioEngine`] turns [`statement::StatementRecord`]s into
//! [`ratios::RatioRecord`]s: liquidity, profitability, efficiency and
//! solvency ratios, with days-outstanding ratios derived from their turnover
//! ratios. Degenerate inputs are reported per ratio and never abort a batch;
//! only duplicate (entity, year) keys reject the whole input.

pub mod config;
pub mod error;
pub mod parallel;
pub mod ratios;
pub mod statement;
pub mod types;

#[cfg(feature = "analysis")]
pub mod analysis;

pub use config::EngineConfig;
pub use error::FinRatioError;
pub use ratios::{RatioEngine, RatioKind, RatioRecord};
pub use statement::{StatementLine, StatementRecord};
pub use types::*;

/// Standard result type for all finratio operations
pub type FinRatioResult<T> = Result<T, FinRatioError>;
