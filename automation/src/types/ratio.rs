use serde::{Deserialize, Serialize};

use crate::error::AutomationError;

/// Sampling fraction in (0, 1].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Ratio(f64);

impl Ratio {
    pub fn new(value: f64) -> Result<Self, AutomationError> {
        if value.is_nan() || value <= 0.0 || value > 1.0 {
            return Err(AutomationError::ConfigError(format!("sampling ratio {} must be in (0, 1]", value)));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Rounded share of `n` items.
    pub fn of(&self, n: usize) -> usize {
        (self.0 * n as f64).round() as usize
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Self(0.3)
    }
}
