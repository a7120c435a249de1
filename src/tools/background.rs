//! Background mutation rate of a normal sample.
//!
//! Sites with a high alternate-allele fraction are likely germline and are
//! excluded. The median alt fraction of the remaining sites is the
//! background rate, and its inverse (per million) the number of reads
//! needed before a call rises above background.

use anyhow::bail;
use log::*;
use serde::{
    Deserialize,
    Serialize,
};

use crate::io::NormalVariant;
use crate::utils::median;
use crate::with_field_fn;

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundConfig {
    /// Sites with an alt fraction at or above this value are excluded.
    pub max_alt_fraction: f64,
}

impl BackgroundConfig {
    with_field_fn!(max_alt_fraction, f64);
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            max_alt_fraction: 0.30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundRate {
    /// Sites contributing to the estimate.
    pub n_sites:           usize,
    pub background_rate:   f64,
    pub reads_per_million: f64,
}

/// Alt fractions of the sites kept by the filter, in input order.
pub fn background_fractions(
    variants: &[NormalVariant],
    config: &BackgroundConfig,
) -> Vec<f64> {
    variants
        .iter()
        .filter_map(NormalVariant::alt_fraction)
        .filter(|af| *af < config.max_alt_fraction)
        .collect()
}

/// # Errors
///
/// Fails when no site passes the filter or the median alt fraction is 0.
pub fn background_mutation_rate(
    variants: &[NormalVariant],
    config: &BackgroundConfig,
) -> anyhow::Result<BackgroundRate> {
    let fractions = background_fractions(variants, config);
    debug!(
        "{} of {} sites below alt fraction {}",
        fractions.len(),
        variants.len(),
        config.max_alt_fraction
    );
    if fractions.is_empty() {
        bail!(
            "No site with alt fraction below {}",
            config.max_alt_fraction
        );
    }
    let rate = median(&fractions);
    if rate <= 0.0 {
        bail!("Median background alt fraction is 0, reads per million is undefined");
    }
    let result = BackgroundRate {
        n_sites:           fractions.len(),
        background_rate:   rate,
        reads_per_million: 1e6 / rate,
    };
    info!(
        "Median background mutation rate: {:.6e}; reads per million required: {:.2}",
        result.background_rate, result.reads_per_million
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn site(
        depth: u64,
        alt_depth: u64,
    ) -> NormalVariant {
        NormalVariant {
            chrom: "chr1".to_string(),
            pos: "1".to_string(),
            reference: "A".to_string(),
            alt: "G".to_string(),
            depth,
            ref_depth: depth.saturating_sub(alt_depth),
            alt_depth,
        }
    }

    #[test]
    fn test_background_fractions_filter() {
        let sites = vec![site(100, 1), site(0, 0), site(10, 3), site(100, 29), site(10, 5)];
        let fractions = background_fractions(&sites, &BackgroundConfig::default());
        assert_eq!(fractions.len(), 2);
        assert_approx_eq!(fractions[0], 0.01);
        assert_approx_eq!(fractions[1], 0.29);
    }

    #[test]
    fn test_background_mutation_rate() -> anyhow::Result<()> {
        let sites = vec![site(1000, 1), site(1000, 2), site(1000, 4), site(10, 9)];
        let rate = background_mutation_rate(&sites, &BackgroundConfig::default())?;
        assert_eq!(rate.n_sites, 3);
        assert_approx_eq!(rate.background_rate, 0.002);
        assert_approx_eq!(rate.reads_per_million, 5e8, 1e-3);
        Ok(())
    }

    #[test]
    fn test_background_mutation_rate_errors() {
        let config = BackgroundConfig::default();
        assert!(background_mutation_rate(&[], &config).is_err());
        assert!(background_mutation_rate(&[site(10, 5)], &config).is_err());
        assert!(background_mutation_rate(&[site(10, 0), site(20, 0)], &config).is_err());
    }
}
