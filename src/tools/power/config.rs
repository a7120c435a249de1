use thiserror::Error;

use crate::data_structs::typedef::{
    DepthType,
    FractionType,
};
use crate::with_field_fn;

/// Order in which candidate tissue-2 depths are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// Every candidate from the floor upwards, stopping at the first one
    /// that reaches the target power.
    #[default]
    Linear,
    /// Exponential probing over the candidate grid followed by a binary
    /// search. Assumes power grows with depth.
    Bisect,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PowerError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerConfig {
    /// Significance level of the one-sided Fisher's exact test.
    pub alpha:     f64,
    /// Target power.
    pub power:     f64,
    /// Largest tissue-2 depth considered (inclusive).
    pub max_depth: DepthType,
    /// Distance between candidate depths.
    pub step:      DepthType,
    /// Smallest tissue-2 depth considered.
    pub floor:     DepthType,
    /// Monte Carlo trials per candidate depth.
    pub n_trials:  usize,
    pub seed:      u64,
    pub strategy:  SearchStrategy,
}

impl PowerConfig {
    with_field_fn!(alpha, f64);
    with_field_fn!(power, f64);
    with_field_fn!(max_depth, DepthType);
    with_field_fn!(step, DepthType);
    with_field_fn!(floor, DepthType);
    with_field_fn!(n_trials, usize);
    with_field_fn!(seed, u64);
    with_field_fn!(strategy, SearchStrategy);

    pub fn validate(&self) -> Result<(), PowerError> {
        check_open_unit("alpha", self.alpha)?;
        check_open_unit("power", self.power)?;
        if self.step == 0 {
            return Err(PowerError::InvalidParameters(
                "step must be positive".to_string(),
            ));
        }
        if self.n_trials == 0 {
            return Err(PowerError::InvalidParameters(
                "n_trials must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of depths on the grid `floor, floor + step, ... <= max_depth`.
    pub fn n_candidates(&self) -> u64 {
        if self.max_depth < self.floor || self.step == 0 {
            0
        }
        else {
            (self.max_depth - self.floor) / self.step + 1
        }
    }

    /// Depth of the `idx`-th grid candidate.
    pub fn candidate(
        &self,
        idx: u64,
    ) -> DepthType {
        self.floor + idx * self.step
    }

    pub fn candidates(&self) -> impl Iterator<Item = DepthType> + '_ {
        (0..self.n_candidates()).map(move |idx| self.candidate(idx))
    }
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            alpha:     0.05,
            power:     0.8,
            max_depth: 100_000,
            step:      100,
            floor:     10,
            n_trials:  1000,
            seed:      42,
            strategy:  SearchStrategy::Linear,
        }
    }
}

fn check_open_unit(
    name: &str,
    value: f64,
) -> Result<(), PowerError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    }
    else {
        Err(PowerError::InvalidParameters(format!(
            "{} must be in (0, 1), got {}",
            name, value
        )))
    }
}

pub(super) fn check_fraction(
    name: &str,
    value: FractionType,
) -> Result<(), PowerError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    }
    else {
        Err(PowerError::InvalidParameters(format!(
            "{} must be in [0, 1], got {}",
            name, value
        )))
    }
}
