//! This module provides the analyses of the pmpkit crate.
//!
//! - [`coverage`]: per-CpG coverage by tissue, summary statistics and the
//!   "CpGs covered at ≥ X reads" curve.
//! - [`enrichment`]: tissue-specific methylation patterns selected with a
//!   one-sided Fisher's exact test.
//! - [`power`]: Monte Carlo estimate of the depth needed to detect a
//!   pattern in the target tissue, for one pattern or a batch of them.
//! - [`somatic`]: tumor/normal VCF comparison.
//! - [`background`]: background mutation rate of a normal sample.
pub mod background;
pub mod coverage;
pub mod enrichment;
pub mod power;
pub mod somatic;
