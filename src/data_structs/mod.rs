//! This module contains the core data structures used throughout the
//! `pmpkit` crate for representing PMP (Pattern of Methylated Probes) count
//! tables and the records produced by the analysis tools.
//!
//! Key components of this module include:
//!
//! - [`PmpPattern`]: one of the eight methylation patterns a read can show
//!   over three adjacent CpG sites.
//! - [`PmpRecord`]: a single row of a PMP count table (one locus, strand,
//!   sample, replicate and tissue).
//! - [`CandidatePattern`] and the [`ThresholdCandidate`] trait: anything
//!   carrying a locus/pattern label and the pattern fraction in two tissues,
//!   which is what the power estimator consumes.
//! - [`CoverageThreshold`]: the output record of the power estimator batch
//!   driver.
//! - [`frame`]: the columnar (polars) view of PMP records the aggregation
//!   tools work on, with its column names and count expressions.
//! - [`typedef`]: type aliases for read counts, depths and fractions.

pub mod frame;
mod pattern;
mod records;
pub mod typedef;


pub use pattern::PmpPattern;
pub use records::{
    CandidatePattern,
    CoverageThreshold,
    PmpRecord,
    ThresholdCandidate,
};
