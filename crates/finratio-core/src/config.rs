//! Engine configuration.
//!
//! Travels inside the [`RatioInput`](crate::ratios::engine::RatioInput)
//! document and may be overridden by CLI flags.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FinRatioError;
use crate::FinRatioResult;

/// Day-count basis for the days-outstanding ratios.
pub const DEFAULT_DAYS_IN_PERIOD: u32 = 365;

/// Record count above which derivation switches to parallel iteration.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Numerator of DIO/DSO/DPO (365 for annual statements).
    pub days_in_period: u32,
    /// Allow rayon-based derivation (requires the `parallel` feature).
    pub parallel: bool,
    /// Minimum record count before parallel iteration is used.
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            days_in_period: DEFAULT_DAYS_IN_PERIOD,
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Config that never parallelises, regardless of feature flags.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub fn with_days_in_period(mut self, days: u32) -> Self {
        self.days_in_period = days;
        self
    }

    pub fn days(&self) -> Decimal {
        Decimal::from(self.days_in_period)
    }

    pub fn should_parallelize(&self, len: usize) -> bool {
        self.parallel && len > self.parallel_threshold
    }

    pub fn validate(&self) -> FinRatioResult<()> {
        if self.days_in_period == 0 {
            return Err(FinRatioError::InvalidInput {
                field: "days_in_period".into(),
                reason: "Day-count basis must be positive.".into(),
            });
        }
        Ok(())
    }
}
