//! Per-CpG read coverage by tissue.
//!
//! Every PMP row covers three CpG sites. A read contributes to a site's
//! coverage according to [`PmpPattern::coverage_mask`]. Within a tissue the
//! coverage of a site is the maximum over rows sharing (CpG, strand,
//! sample, replicate), summed over strands, samples and replicates.
//!
//! [`PmpPattern::coverage_mask`]: crate::data_structs::PmpPattern::coverage_mask

use anyhow::bail;
use itertools::{
    izip,
    Itertools,
};
use log::*;
use polars::prelude::{
    col,
    concat,
    Column,
    DataFrame,
    IntoLazy,
    SortMultipleOptions,
    UnionArgs,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::frame::colnames::*;
use crate::data_structs::frame::{
    pmp_frame,
    site_coverage_expr,
};
use crate::data_structs::PmpRecord;
use crate::utils::{
    mean,
    median,
    std_dev,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpgCoverage {
    #[serde(rename = "CpG")]
    pub cpg:      String,
    #[serde(rename = "Tissue")]
    pub tissue:   String,
    #[serde(rename = "Coverage")]
    pub coverage: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TissueCoverageStats {
    #[serde(rename = "Tissue")]
    pub tissue: String,
    pub n_cpgs: usize,
    pub median: f64,
    pub mean:   f64,
    /// Sample standard deviation.
    pub std:    f64,
    /// Coefficient of variation, `std / mean`.
    pub cv:     f64,
}

/// One point of the "share of CpGs with coverage >= X" curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageCurvePoint {
    #[serde(rename = "Tissue")]
    pub tissue:     String,
    #[serde(rename = "Coverage")]
    pub coverage:   u64,
    pub percentage: f64,
}

const CPG_NAME: &str = "CpG";
const COVERAGE_NAME: &str = "Coverage";
const SITE_NAMES: [&str; 3] = ["CpG1", "CpG2", "CpG3"];

/// PMP frame with the three site identifiers of every row appended.
fn site_frame(records: &[PmpRecord]) -> anyhow::Result<DataFrame> {
    let mut sites: [Vec<&str>; 3] = Default::default();
    for record in records {
        let Some(parts) = record.cpg_sites() else {
            bail!(
                "Malformed CpG_Coordinates '{}': expected three ':'-separated sites",
                record.cpg_coordinates
            );
        };
        for (column, site) in sites.iter_mut().zip(parts) {
            column.push(site);
        }
    }
    let site_columns = SITE_NAMES
        .into_iter()
        .zip(sites)
        .map(|(name, values)| Column::new(name.into(), values))
        .collect_vec();
    Ok(pmp_frame(records)?.hstack(&site_columns)?)
}

/// Coverage of every CpG site, ordered by tissue then CpG.
///
/// # Errors
///
/// Fails on a `CpG_Coordinates` value that does not hold exactly three
/// sites.
pub fn per_cpg_coverage(records: &[PmpRecord]) -> anyhow::Result<Vec<CpgCoverage>> {
    let frame = site_frame(records)?;
    let per_site = SITE_NAMES
        .into_iter()
        .enumerate()
        .map(|(site, name)| {
            frame.clone().lazy().select([
                col(TISSUE_NAME),
                col(name).alias(CPG_NAME),
                col(STRAND_NAME),
                col(SAMPLE_ID_NAME),
                col(REPLICATE_NAME),
                site_coverage_expr(site).alias(COVERAGE_NAME),
            ])
        })
        .collect_vec();

    let summed = concat(per_site, UnionArgs::default())?
        .group_by([
            col(TISSUE_NAME),
            col(CPG_NAME),
            col(STRAND_NAME),
            col(SAMPLE_ID_NAME),
            col(REPLICATE_NAME),
        ])
        .agg([col(COVERAGE_NAME).max()])
        .group_by([col(TISSUE_NAME), col(CPG_NAME)])
        .agg([col(COVERAGE_NAME).sum()])
        .sort([TISSUE_NAME, CPG_NAME], SortMultipleOptions::default())
        .collect()?;
    debug!(
        "Computed coverage of {} CpG sites from {} records",
        summed.height(),
        records.len()
    );

    let tissues = summed.column(TISSUE_NAME)?.as_materialized_series().str()?;
    let cpgs = summed.column(CPG_NAME)?.as_materialized_series().str()?;
    let coverage = summed.column(COVERAGE_NAME)?.as_materialized_series().u64()?;

    Ok(izip!(tissues, cpgs, coverage)
        .map(|(tissue, cpg, coverage)| {
            CpgCoverage {
                cpg:      cpg.unwrap_or_default().to_string(),
                tissue:   tissue.unwrap_or_default().to_string(),
                coverage: coverage.unwrap_or(0),
            }
        })
        .collect())
}

/// Median, mean, sample standard deviation and coefficient of variation of
/// the CpG coverage of every tissue.
pub fn coverage_stats(rows: &[CpgCoverage]) -> Vec<TissueCoverageStats> {
    rows.iter()
        .into_group_map_by(|row| row.tissue.as_str())
        .into_iter()
        .sorted_by(|a, b| a.0.cmp(b.0))
        .map(|(tissue, group)| {
            let values = group.iter().map(|r| r.coverage as f64).collect_vec();
            let mean = mean(&values);
            let std = std_dev(&values);
            TissueCoverageStats {
                tissue: tissue.to_string(),
                n_cpgs: values.len(),
                median: median(&values),
                mean,
                std,
                cv: std / mean,
            }
        })
        .collect()
}

/// Percentage of distinct CpGs of each tissue with coverage of at least X,
/// for X = 0, step, 2 * step, ... up to the tissue's maximum coverage.
pub fn coverage_curve(
    rows: &[CpgCoverage],
    step: u64,
) -> anyhow::Result<Vec<CoverageCurvePoint>> {
    if step == 0 {
        bail!("Coverage curve step must be positive");
    }
    let mut points = Vec::new();
    for (tissue, group) in rows
        .iter()
        .into_group_map_by(|row| row.tissue.as_str())
        .into_iter()
        .sorted_by(|a, b| a.0.cmp(b.0))
    {
        let n_cpgs = group.iter().map(|r| r.cpg.as_str()).unique().count();
        let max_coverage = group.iter().map(|r| r.coverage).max().unwrap_or(0);
        for threshold in (0..=max_coverage).step_by(step as usize) {
            let covered = group.iter().filter(|r| r.coverage >= threshold).count();
            points.push(CoverageCurvePoint {
                tissue:     tissue.to_string(),
                coverage:   threshold,
                percentage: 100.0 * covered as f64 / n_cpgs as f64,
            });
        }
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn record(
        coords: &str,
        strand: &str,
        sample: &str,
        tissue: &str,
        counts: [u32; 8],
    ) -> PmpRecord {
        PmpRecord {
            cpg_coordinates: coords.to_string(),
            strand:          strand.to_string(),
            p000:            counts[0],
            p001:            counts[1],
            p010:            counts[2],
            p011:            counts[3],
            p100:            counts[4],
            p101:            counts[5],
            p110:            counts[6],
            p111:            counts[7],
            sample_id:       sample.to_string(),
            replicate:       "Rep1".to_string(),
            tissue:          tissue.to_string(),
        }
    }

    fn coverage(
        cpg: &str,
        tissue: &str,
        coverage: u64,
    ) -> CpgCoverage {
        CpgCoverage {
            cpg: cpg.to_string(),
            tissue: tissue.to_string(),
            coverage,
        }
    }

    #[test]
    fn test_site_coverage_uses_mask() -> anyhow::Result<()> {
        // 000 -> all sites, 001 -> CpG3, 010 -> CpG2, 110 -> CpG1 + CpG2
        let rec = record("1:2:3", "f", "S1", "cfDNA", [2, 3, 5, 0, 0, 0, 7, 0]);
        assert_eq!(
            per_cpg_coverage(&[rec])?,
            vec![
                coverage("1", "cfDNA", 9),
                coverage("2", "cfDNA", 14),
                coverage("3", "cfDNA", 5),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_site_frame_appends_sites() -> anyhow::Result<()> {
        let frame = site_frame(&[record("7:8:9", "f", "S1", "cfDNA", [1; 8])])?;
        assert_eq!(frame.width(), 16);
        let site = frame.column("CpG3")?.as_materialized_series().str()?.get(0);
        assert_eq!(site, Some("9"));
        assert!(per_cpg_coverage(&[])?.is_empty());
        Ok(())
    }

    #[test]
    fn test_per_cpg_coverage_max_then_sum() -> anyhow::Result<()> {
        let records = vec![
            // Two rows share CpG 20 on the same strand and sample: max is taken.
            record("10:20:30", "f", "S1", "cfDNA", [4, 0, 0, 0, 0, 0, 0, 0]),
            record("20:30:40", "f", "S1", "cfDNA", [6, 0, 0, 0, 0, 0, 0, 0]),
            // Other strand and other sample add up.
            record("10:20:30", "r", "S1", "cfDNA", [1, 0, 0, 0, 0, 0, 0, 0]),
            record("10:20:30", "f", "S2", "cfDNA", [2, 0, 0, 0, 0, 0, 0, 0]),
            record("10:20:30", "f", "S3", "Islet", [0, 0, 0, 0, 0, 0, 0, 3]),
        ];
        let rows = per_cpg_coverage(&records)?;
        assert_eq!(
            rows,
            vec![
                coverage("10", "Islet", 3),
                coverage("20", "Islet", 3),
                coverage("30", "Islet", 3),
                coverage("10", "cfDNA", 7),
                coverage("20", "cfDNA", 9),
                coverage("30", "cfDNA", 9),
                coverage("40", "cfDNA", 6),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_per_cpg_coverage_rejects_bad_coordinates() {
        let records = vec![record("10:20", "f", "S1", "cfDNA", [1; 8])];
        assert!(per_cpg_coverage(&records).is_err());
    }

    #[test]
    fn test_coverage_stats() {
        let rows = vec![
            coverage("1", "cfDNA", 10),
            coverage("2", "cfDNA", 20),
            coverage("3", "cfDNA", 30),
            coverage("1", "Islet", 5),
        ];
        let stats = coverage_stats(&rows);
        assert_eq!(stats.len(), 2);

        assert_eq!(stats[0].tissue, "Islet");
        assert_eq!(stats[0].n_cpgs, 1);
        assert!(stats[0].std.is_nan());

        assert_eq!(stats[1].tissue, "cfDNA");
        assert_approx_eq!(stats[1].median, 20.0);
        assert_approx_eq!(stats[1].mean, 20.0);
        assert_approx_eq!(stats[1].std, 10.0);
        assert_approx_eq!(stats[1].cv, 0.5);
    }

    #[test]
    fn test_coverage_curve() -> anyhow::Result<()> {
        let rows = vec![
            coverage("1", "cfDNA", 50),
            coverage("2", "cfDNA", 150),
            coverage("3", "cfDNA", 250),
            coverage("4", "cfDNA", 250),
        ];
        let curve = coverage_curve(&rows, 100)?;
        let values = curve
            .iter()
            .map(|p| (p.coverage, p.percentage))
            .collect_vec();
        assert_eq!(values, vec![(0, 100.0), (100, 75.0), (200, 50.0)]);

        assert!(coverage_curve(&rows, 0).is_err());
        assert!(coverage_curve(&[], 100)?.is_empty());
        Ok(())
    }
}
