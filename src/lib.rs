//! # pmpkit
//!
//! `pmpkit` is a Rust library and command-line tool for the analysis of
//! PMP (Pattern of Methylated Probes) sequencing data: per-read methylation
//! patterns over three adjacent CpG sites, counted per sample, replicate and
//! tissue.
//!
//! The crate covers three questions asked of such data:
//!
//! * **How deep is the data?** Per-CpG coverage summaries per tissue, with
//!   median / coefficient of variation and a "CpGs covered at ≥ X reads"
//!   curve ([`tools::coverage`]).
//! * **Which patterns are tissue specific?** Per locus and pattern, Fisher's
//!   exact test of the pattern fraction in one tissue against another, with a
//!   specificity filter on the background tissue ([`tools::enrichment`]).
//! * **How deep must we sequence?** A Monte Carlo power estimator that finds
//!   the minimal tissue-2 depth at which the pattern difference is detected
//!   with the requested power ([`tools::power`]).
//!
//! Two small variant utilities live alongside: a tumor/normal VCF comparison
//! ([`tools::somatic`]) and a background mutation rate estimate
//! ([`tools::background`]).
//!
//! Number of threads used by the batch tools can be configured with the
//! `PMPKIT_NUM_THREADS` environment variable.
//!
//! ## Structure
//!
//! * [`data_structs`]: PMP patterns, typed input and output records.
//! * [`io`]: readers for PMP count tables, VCF and variant tables, and a
//!   generic delimited-table writer.
//! * [`tools`]: the analyses listed above.
//! * [`utils`]: statistical primitives (Fisher's exact test, summary
//!   statistics) and the global thread pool.
//!
//! ## Usage
//!
//! ### Estimating the required depth for one pattern
//!
//! ```no_run
//! use pmpkit::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PowerConfig::default()
//!         .with_max_depth(100_000)
//!         .with_step(100);
//!
//!     match estimate_required_depth(0.001, 0.05, 1_000_000, &config)? {
//!         Some(depth) => println!("Tissue 2 needs {} reads", depth),
//!         None => println!("No depth up to 100000 reaches the target power"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### From a PMP table to coverage thresholds
//!
//! ```no_run
//! use pmpkit::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let records = read_pmp_table("PupilBioTest_PMP_revA.csv")?;
//!     let significant =
//!         compute_pattern_enrichment(&records, &EnrichmentConfig::default())?;
//!     let top = top_patterns(significant, 10);
//!
//!     let thresholds = estimate_thresholds_for_candidates(
//!         &top,
//!         1_000_000,
//!         &PowerConfig::default(),
//!     )?;
//!     write_table(&thresholds, "thresholds.tsv", TableFormat::Tsv)?;
//!     Ok(())
//! }
//! ```

pub mod data_structs;
pub mod exports;
pub mod io;
pub mod prelude;
pub mod tools;
pub mod utils;
