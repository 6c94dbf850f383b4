//! Robust Soliton degree distribution and neighbor selection.
//!
//! The distribution is precomputed once per encoder/decoder as a CDF over
//! degrees `1..=k`. Sampling consumes exactly one `gen_unit` draw, and the
//! distinct-index selection that follows consumes one `gen_range` draw per
//! candidate (rejecting duplicates). Encoder and decoder both go through
//! [`DegreeTable::neighbors`], so the draw sequence cannot diverge.

use crate::config::SolitonConfig;
use crate::prng::Xoshiro256;

/// Precomputed Robust Soliton CDF for a fixed `k`.
#[derive(Clone, Debug)]
pub(crate) struct DegreeTable {
    k: u32,
    cdf: Vec<f64>,
}

impl DegreeTable {
    /// Build the table for `k` source blocks. Requires `k >= 1`.
    pub(crate) fn new(k: u32, config: &SolitonConfig) -> Self {
        Self { k, cdf: robust_soliton_cdf(k, config) }
    }

    pub(crate) fn k(&self) -> u32 {
        self.k
    }

    /// Smallest degree `d` with `CDF(d) >= u`; exact endpoints resolve to
    /// the smaller degree.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn sample(&self, u: f64) -> u32 {
        let ix = self.cdf.partition_point(|&p| p < u);
        // Accumulated rounding can leave CDF(k) a hair under 1; a draw in
        // that sliver maps to the maximum degree.
        ix.min(self.k as usize - 1) as u32 + 1
    }

    /// Replay the neighbor selection recorded by `seed`: one degree draw,
    /// then rejection sampling until that many distinct indices are held.
    ///
    /// Indices come back in draw order, so the result is deterministic in
    /// full, not just as a set.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn neighbors(&self, seed: u64) -> (u32, Vec<u32>) {
        let mut prng = Xoshiro256::new(seed);
        let degree = self.sample(prng.gen_unit());

        let mut indices: Vec<u32> = Vec::with_capacity(degree as usize);
        while (indices.len() as u32) < degree {
            let candidate = prng.gen_range(0, u64::from(self.k)) as u32;
            if !indices.contains(&candidate) {
                indices.push(candidate);
            }
        }

        (degree, indices)
    }
}

/// Ideal Soliton PMF `rho` over degrees `1..=k` (unnormalized tail of the
/// robust distribution).
fn ideal_soliton(k: u32) -> Vec<f64> {
    let kf = f64::from(k);
    let mut rho = Vec::with_capacity(k as usize);
    rho.push(1.0 / kf);
    for d in 2..=u64::from(k) {
        #[allow(clippy::cast_precision_loss)]
        let df = d as f64;
        rho.push(1.0 / (df * (df - 1.0)));
    }
    rho
}

/// Robust tail `tau`: a `R/(d·k)` head up to the pivot, a spike at the
/// pivot, zero beyond.
fn robust_tail(k: u32, config: &SolitonConfig) -> Vec<f64> {
    let mut tau = vec![0.0; k as usize];
    let r = config.expected_ripple(k);
    if !r.is_finite() || r <= 0.0 {
        // Degenerate tuning (c <= 0 or delta >= k); fall back to the
        // ideal distribution alone.
        return tau;
    }

    let kf = f64::from(k);
    // The pivot k/R lands at 0 or past k for extreme tunings; it is
    // bounded to [2, k-1], with the head truncated and the spike dropped
    // when k is too small to hold them (k <= 2 has no interior position).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pivot = ((kf / r).floor() as u64)
        .min(u64::from(k).saturating_sub(1))
        .max(2);

    for d in 1..pivot {
        let Some(slot) = tau.get_mut((d - 1) as usize) else {
            break;
        };
        #[allow(clippy::cast_precision_loss)]
        let df = d as f64;
        *slot = r / (df * kf);
    }
    if let Some(slot) = tau.get_mut((pivot - 1) as usize) {
        *slot = (r * (r / config.delta).ln() / kf).max(0.0);
    }

    tau
}

/// Normalized CDF of `mu(d) = (rho(d) + tau(d)) / Z`.
fn robust_soliton_cdf(k: u32, config: &SolitonConfig) -> Vec<f64> {
    let rho = ideal_soliton(k);
    let tau = robust_tail(k, config);

    let z: f64 = rho.iter().sum::<f64>() + tau.iter().sum::<f64>();
    debug_assert!(z > 0.0);

    let mut cdf = Vec::with_capacity(k as usize);
    let mut acc = 0.0;
    for (r, t) in rho.iter().zip(&tau) {
        acc += (r + t) / z;
        cdf.push(acc);
    }
    cdf
}
