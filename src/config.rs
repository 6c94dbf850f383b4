//! Robust Soliton tuning parameters.

use serde::{Deserialize, Serialize};

/// Tuning constants for the Robust Soliton degree distribution.
///
/// Both constants trade expected overhead against decode-failure
/// probability; the defaults match the reference implementation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolitonConfig {
    /// Ripple tuning constant `c`.
    ///
    /// Scales the expected ripple size `R = c · ln(k/δ) · √k`.
    ///
    /// Default: 0.03
    pub c: f64,

    /// Decode-failure bound `δ`.
    ///
    /// Target probability that decoding fails after receiving
    /// `k + R · ln(R/δ)` encoded blocks.
    ///
    /// Default: 0.05
    pub delta: f64,
}

impl Default for SolitonConfig {
    fn default() -> Self {
        Self { c: 0.03, delta: 0.05 }
    }
}

impl SolitonConfig {
    /// Create a configuration with explicit tuning constants.
    #[must_use]
    pub const fn new(c: f64, delta: f64) -> Self {
        Self { c, delta }
    }

    /// Expected ripple size `R = c · ln(k/δ) · √k` for `k` source blocks.
    #[must_use]
    pub fn expected_ripple(&self, k: u32) -> f64 {
        let k = f64::from(k);
        self.c * (k / self.delta).ln() * k.sqrt()
    }
}
