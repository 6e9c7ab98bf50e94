//! Consumers of derived ratio records.
//!
//! Nothing here recomputes a ratio from statement data; every function reads
//! [`RatioRecord`](crate::ratios::RatioRecord) values and treats absent ratios
//! as gaps.

pub mod comparison;
pub mod dupont;
pub mod trend;
pub mod working_capital;
