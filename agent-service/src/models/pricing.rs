//! Token pricing and cost accounting.

use serde::{Deserialize, Serialize};

/// Per-token rates, expressed in USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl Pricing {
    pub fn is_valid(&self) -> bool {
        [self.input_per_million, self.output_per_million]
            .iter()
            .all(|rate| rate.is_finite() && *rate >= 0.0)
    }

    /// Cost in USD for the given token counts, truncated to 4 decimal places.
    ///
    /// Truncation floors toward zero; it never rounds up to the next cent
    /// fraction. With the default rates, 2 input and 3 output tokens cost
    /// 0.000051 USD, which truncates to `0.0`.
    pub fn calculate_cost(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        // Millionths of a dollar: token count times USD per million tokens.
        let micros = f64::from(input_tokens) * self.input_per_million
            + f64::from(output_tokens) * self.output_per_million;

        // 100 micros per 0.0001 USD step. The epsilon absorbs binary
        // representation error from fractional rates such as 0.1.
        let steps = (micros / 100.0 + 1e-9).floor().max(0.0);
        steps / 10_000.0
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            input_per_million: 3.0,
            output_per_million: 15.0,
        }
    }
}
