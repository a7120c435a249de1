//! Monte Carlo estimate of the sequencing depth needed in tissue 2 to detect
//! a pattern that is more frequent there than in tissue 1.
//!
//! For a candidate tissue-2 depth `n2` the estimator simulates `n_trials`
//! experiments: `k1 ~ Binomial(n1, f1)`, then `k2 ~ Binomial(n2, f2)`, and
//! tests the table `[[k2, n2 - k2], [k1, n1 - k1]]` with a one-sided
//! Fisher's exact test. The share of trials with `p < alpha` is the
//! empirical power; the first candidate reaching the target power is
//! returned.
//!
//! Every estimate owns a [`ChaCha8Rng`] seeded from [`PowerConfig::seed`],
//! so results are reproducible and independent of how estimates are
//! scheduled across threads.

mod config;

pub use config::{
    PowerConfig,
    PowerError,
    SearchStrategy,
};
use log::*;
use rand::{
    Rng,
    SeedableRng,
};
use rand_chacha::ChaCha8Rng;
use rand_distr::{
    Binomial,
    Distribution,
};
use rayon::prelude::*;

use crate::data_structs::typedef::{
    DepthType,
    FractionType,
};
use crate::data_structs::{
    CoverageThreshold,
    ThresholdCandidate,
};
use crate::utils::{
    fisher_exact,
    Alternative,
    THREAD_POOL,
};

/// Empirical power of the one-sided Fisher's exact test at depths `n1` and
/// `n2`, drawing every trial from `rng`.
pub fn simulate_power<R: Rng + ?Sized>(
    f1: FractionType,
    f2: FractionType,
    n1: DepthType,
    n2: DepthType,
    alpha: f64,
    n_trials: usize,
    rng: &mut R,
) -> Result<f64, PowerError> {
    if n_trials == 0 {
        return Err(PowerError::InvalidParameters(
            "n_trials must be positive".to_string(),
        ));
    }
    let tissue1 = Binomial::new(n1, f1).map_err(|e| {
        PowerError::InvalidParameters(format!("f1 = {}: {:?}", f1, e))
    })?;
    let tissue2 = Binomial::new(n2, f2).map_err(|e| {
        PowerError::InvalidParameters(format!("f2 = {}: {:?}", f2, e))
    })?;

    let mut significant = 0usize;
    for _ in 0..n_trials {
        let k1 = tissue1.sample(rng);
        let k2 = tissue2.sample(rng);
        let (_, pvalue) =
            fisher_exact([[k2, n2 - k2], [k1, n1 - k1]], Alternative::Greater);
        if pvalue < alpha {
            significant += 1;
        }
    }
    Ok(significant as f64 / n_trials as f64)
}

/// Smallest tissue-2 depth on the candidate grid at which the difference
/// between `f2` and `f1` is detected with the configured power.
///
/// Returns `Ok(None)` when `f2 <= f1`, when the grid is empty
/// (`max_depth < floor`) or when no candidate reaches the target power.
///
/// # Errors
///
/// [`PowerError::InvalidParameters`] for fractions outside `[0, 1]`, a zero
/// tissue-1 depth or an invalid [`PowerConfig`].
pub fn estimate_required_depth(
    f1: FractionType,
    f2: FractionType,
    n1: DepthType,
    config: &PowerConfig,
) -> Result<Option<DepthType>, PowerError> {
    config::check_fraction("f1", f1)?;
    config::check_fraction("f2", f2)?;
    if n1 == 0 {
        return Err(PowerError::InvalidParameters(
            "n1 must be positive".to_string(),
        ));
    }
    config.validate()?;

    if f2 <= f1 {
        debug!("f2 ({}) does not exceed f1 ({}), skipping", f2, f1);
        return Ok(None);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let found = match config.strategy {
        SearchStrategy::Linear => linear_search(f1, f2, n1, config, &mut rng)?,
        SearchStrategy::Bisect => bisect_search(f1, f2, n1, config, &mut rng)?,
    };

    match found {
        Some(depth) => debug!("f1 = {}, f2 = {}: required depth {}", f1, f2, depth),
        None => {
            debug!(
                "f1 = {}, f2 = {}: target power {} not reached up to {}",
                f1, f2, config.power, config.max_depth
            )
        },
    }
    Ok(found)
}

fn linear_search<R: Rng + ?Sized>(
    f1: FractionType,
    f2: FractionType,
    n1: DepthType,
    config: &PowerConfig,
    rng: &mut R,
) -> Result<Option<DepthType>, PowerError> {
    for n2 in config.candidates() {
        let power = simulate_power(f1, f2, n1, n2, config.alpha, config.n_trials, rng)?;
        trace!("n2 = {}: power {:.3}", n2, power);
        if power >= config.power {
            return Ok(Some(n2));
        }
    }
    Ok(None)
}

fn bisect_search<R: Rng + ?Sized>(
    f1: FractionType,
    f2: FractionType,
    n1: DepthType,
    config: &PowerConfig,
    rng: &mut R,
) -> Result<Option<DepthType>, PowerError> {
    let total = config.n_candidates();
    if total == 0 {
        return Ok(None);
    }
    let mut reaches = |idx: u64| -> Result<bool, PowerError> {
        let n2 = config.candidate(idx);
        let power = simulate_power(f1, f2, n1, n2, config.alpha, config.n_trials, rng)?;
        trace!("n2 = {}: power {:.3}", n2, power);
        Ok(power >= config.power)
    };

    // Probe indices 0, 1, 3, 7, ... until one reaches the target.
    let mut failed: Option<u64> = None;
    let mut probe = 0u64;
    let mut hit = loop {
        let idx = probe.min(total - 1);
        if reaches(idx)? {
            break idx;
        }
        if idx == total - 1 {
            return Ok(None);
        }
        failed = Some(idx);
        probe = probe * 2 + 1;
    };

    let mut lo = failed.map_or(0, |idx| idx + 1);
    while lo < hit {
        let mid = lo + (hit - lo) / 2;
        if reaches(mid)? {
            hit = mid;
        }
        else {
            lo = mid + 1;
        }
    }
    Ok(Some(config.candidate(hit)))
}

/// Estimates the required tissue-2 depth for every candidate.
///
/// Output rows follow input order. Each estimate is seeded independently,
/// so the result does not depend on the number of threads.
pub fn estimate_thresholds_for_candidates<T>(
    rows: &[T],
    coverage_tissue1: DepthType,
    config: &PowerConfig,
) -> Result<Vec<CoverageThreshold>, PowerError>
where
    T: ThresholdCandidate + Sync, {
    estimate_thresholds_with_callback(rows, coverage_tissue1, config, |_| {})
}

/// Same as [`estimate_thresholds_for_candidates`], calling `on_done` after
/// each finished estimate (in completion order).
pub fn estimate_thresholds_with_callback<T, F>(
    rows: &[T],
    coverage_tissue1: DepthType,
    config: &PowerConfig,
    on_done: F,
) -> Result<Vec<CoverageThreshold>, PowerError>
where
    T: ThresholdCandidate + Sync,
    F: Fn(&CoverageThreshold) + Sync, {
    config.validate()?;
    info!(
        "Estimating required depth for {} candidates (n1 = {}, alpha = {}, power = {})",
        rows.len(),
        coverage_tissue1,
        config.alpha,
        config.power
    );

    THREAD_POOL.install(|| {
        rows.par_iter()
            .map(|row| {
                let required = estimate_required_depth(
                    row.fraction_tissue1(),
                    row.fraction_tissue2(),
                    coverage_tissue1,
                    config,
                )?;
                let threshold = CoverageThreshold {
                    cpg_coordinates:      row.cpg_coordinates().to_string(),
                    pattern:              row.pattern(),
                    fraction_t1:          row.fraction_tissue1(),
                    fraction_t2:          row.fraction_tissue2(),
                    coverage_tissue1,
                    coverage_required_t2: required,
                };
                on_done(&threshold);
                Ok(threshold)
            })
            .collect()
    })
}
