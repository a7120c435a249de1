//! Tissue-specific methylation patterns.
//!
//! Pattern counts are summed per locus and tissue over all samples and
//! replicates. For every locus and pattern the fraction of reads showing
//! the pattern is compared between the background tissue (tissue 1) and
//! the target tissue (tissue 2) with a one-sided Fisher's exact test.
//! Patterns that are rare in tissue 1 and significantly more frequent in
//! tissue 2 are reported.

use itertools::Itertools;
use log::*;
use polars::prelude::{
    col,
    lit,
    DataFrame,
    IntoLazy,
    LazyFrame,
    PolarsResult,
    SortMultipleOptions,
    UInt64Chunked,
};
use rayon::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::frame::colnames::*;
use crate::data_structs::frame::{
    pattern_columns,
    pattern_sum,
    pmp_frame,
};
use crate::data_structs::typedef::FractionType;
use crate::data_structs::{
    PmpPattern,
    PmpRecord,
    ThresholdCandidate,
};
use crate::utils::{
    fisher_exact,
    Alternative,
    THREAD_POOL,
};
use crate::with_field_fn;

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentConfig {
    /// Background tissue, in which the pattern must be rare.
    pub tissue1:               String,
    /// Target tissue.
    pub tissue2:               String,
    /// Largest tissue-1 fraction a reported pattern may have.
    pub specificity_threshold: FractionType,
    pub alpha:                 f64,
}

impl EnrichmentConfig {
    with_field_fn!(tissue1, String);
    with_field_fn!(tissue2, String);
    with_field_fn!(specificity_threshold, FractionType);
    with_field_fn!(alpha, f64);
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            tissue1:               "cfDNA".to_string(),
            tissue2:               "Islet".to_string(),
            specificity_threshold: 0.01,
            alpha:                 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRow {
    #[serde(rename = "CpG_Coordinates")]
    pub cpg_coordinates:     String,
    pub pattern:             PmpPattern,
    #[serde(rename = "read_count_Tissue1")]
    pub read_count_tissue1:  u64,
    #[serde(rename = "total_reads_Tissue1")]
    pub total_reads_tissue1: u64,
    #[serde(rename = "read_count_Tissue2")]
    pub read_count_tissue2:  u64,
    #[serde(rename = "total_reads_Tissue2")]
    pub total_reads_tissue2: u64,
    #[serde(rename = "fraction_Tissue1")]
    pub fraction_tissue1:    FractionType,
    #[serde(rename = "fraction_Tissue2")]
    pub fraction_tissue2:    FractionType,
    pub p_value:             f64,
}

impl EnrichmentRow {
    fn new(
        cpg_coordinates: &str,
        pattern: PmpPattern,
        tissue1: [u64; 2],
        tissue2: [u64; 2],
    ) -> Self {
        let [c1, t1] = tissue1;
        let [c2, t2] = tissue2;
        let p_value = if t1 == 0 && t2 == 0 {
            1.0
        }
        else {
            fisher_exact([[c2, t2 - c2], [c1, t1 - c1]], Alternative::Greater).1
        };
        Self {
            cpg_coordinates: cpg_coordinates.to_string(),
            pattern,
            read_count_tissue1: c1,
            total_reads_tissue1: t1,
            read_count_tissue2: c2,
            total_reads_tissue2: t2,
            fraction_tissue1: fraction(c1, t1),
            fraction_tissue2: fraction(c2, t2),
            p_value,
        }
    }
}

impl ThresholdCandidate for EnrichmentRow {
    fn cpg_coordinates(&self) -> &str { &self.cpg_coordinates }

    fn pattern(&self) -> PmpPattern { self.pattern }

    fn fraction_tissue1(&self) -> FractionType { self.fraction_tissue1 }

    fn fraction_tissue2(&self) -> FractionType { self.fraction_tissue2 }
}

fn fraction(
    count: u64,
    total: u64,
) -> FractionType {
    if total == 0 {
        0.0
    }
    else {
        count as f64 / total as f64
    }
}

const TISSUE1_SUFFIX: &str = "_tissue1";
const TISSUE2_SUFFIX: &str = "_tissue2";

fn suffixed(
    name: &str,
    suffix: &str,
) -> String {
    format!("{}{}", name, suffix)
}

/// Pattern counts and total reads summed per (locus, tissue).
fn sum_counts(records: &[PmpRecord]) -> PolarsResult<LazyFrame> {
    let sums = pmp_frame(records)?
        .lazy()
        .group_by([col(CPG_COORDINATES_NAME), col(TISSUE_NAME)])
        .agg(pattern_columns().map(|c| c.sum()).collect_vec())
        .with_column(pattern_sum(PmpPattern::ALL).alias(TOTAL_READS_NAME));
    Ok(sums)
}

/// Sums of one tissue, count columns renamed with `suffix`.
fn tissue_counts(
    sums: LazyFrame,
    tissue: &str,
    suffix: &str,
) -> LazyFrame {
    let mut columns = vec![col(CPG_COORDINATES_NAME)];
    columns.extend(count_names().map(|name| col(name).alias(suffixed(name, suffix))));
    sums.filter(col(TISSUE_NAME).eq(lit(tissue)))
        .select(columns)
}

fn count_names() -> impl Iterator<Item = &'static str> {
    PmpPattern::ALL
        .into_iter()
        .map(|p| p.as_str())
        .chain([TOTAL_READS_NAME])
}

/// Summed counts of both tissues at one locus.
#[derive(Debug, Clone, PartialEq)]
struct LocusCounts {
    cpg_coordinates: String,
    /// Pattern counts in [`PmpPattern::ALL`] order followed by the total.
    tissue1:         [u64; 9],
    tissue2:         [u64; 9],
}

fn count_columns<'a>(
    frame: &'a DataFrame,
    suffix: &str,
) -> anyhow::Result<Vec<&'a UInt64Chunked>> {
    count_names()
        .map(|name| {
            let column = frame.column(&suffixed(name, suffix))?;
            Ok(column.as_materialized_series().u64()?)
        })
        .collect()
}

fn row_values(
    columns: &[&UInt64Chunked],
    idx: usize,
) -> [u64; 9] {
    let mut values = [0u64; 9];
    for (value, column) in values.iter_mut().zip(columns) {
        *value = column.get(idx).unwrap_or(0);
    }
    values
}

/// Tissue-1 and tissue-2 sums of every locus seen in any tissue, side by
/// side. A tissue without rows at a locus has all counts zero. Loci are
/// sorted.
fn locus_counts(
    records: &[PmpRecord],
    config: &EnrichmentConfig,
) -> anyhow::Result<Vec<LocusCounts>> {
    let sums = sum_counts(records)?;
    let loci = sums
        .clone()
        .group_by([col(CPG_COORDINATES_NAME)])
        .agg([col(TISSUE_NAME).count()])
        .select([col(CPG_COORDINATES_NAME)]);

    let filled = [TISSUE1_SUFFIX, TISSUE2_SUFFIX]
        .into_iter()
        .flat_map(|suffix| count_names().map(move |name| suffixed(name, suffix)))
        .map(|name| col(name.as_str()).fill_null(lit(0u64)))
        .collect_vec();
    let frame = loci
        .left_join(
            tissue_counts(sums.clone(), &config.tissue1, TISSUE1_SUFFIX),
            col(CPG_COORDINATES_NAME),
            col(CPG_COORDINATES_NAME),
        )
        .left_join(
            tissue_counts(sums, &config.tissue2, TISSUE2_SUFFIX),
            col(CPG_COORDINATES_NAME),
            col(CPG_COORDINATES_NAME),
        )
        .with_columns(filled)
        .sort([CPG_COORDINATES_NAME], SortMultipleOptions::default())
        .collect()?;

    let coords = frame
        .column(CPG_COORDINATES_NAME)?
        .as_materialized_series()
        .str()?;
    let tissue1 = count_columns(&frame, TISSUE1_SUFFIX)?;
    let tissue2 = count_columns(&frame, TISSUE2_SUFFIX)?;

    Ok(coords
        .into_iter()
        .enumerate()
        .map(|(idx, coords)| {
            LocusCounts {
                cpg_coordinates: coords.unwrap_or_default().to_string(),
                tissue1:         row_values(&tissue1, idx),
                tissue2:         row_values(&tissue2, idx),
            }
        })
        .collect())
}

/// Tests every (locus, pattern) and keeps the tissue-2 specific ones.
///
/// Rows are ordered by locus, then pattern.
pub fn compute_pattern_enrichment(
    records: &[PmpRecord],
    config: &EnrichmentConfig,
) -> anyhow::Result<Vec<EnrichmentRow>> {
    let loci = locus_counts(records, config)?;
    debug!(
        "Summed {} records into {} loci",
        records.len(),
        loci.len()
    );

    let all_rows: Vec<EnrichmentRow> = THREAD_POOL.install(|| {
        loci.par_iter()
            .flat_map_iter(|locus| {
                PmpPattern::ALL.into_iter().map(move |pattern| {
                    let idx = pattern.index();
                    EnrichmentRow::new(
                        &locus.cpg_coordinates,
                        pattern,
                        [locus.tissue1[idx], locus.tissue1[8]],
                        [locus.tissue2[idx], locus.tissue2[8]],
                    )
                })
            })
            .collect()
    });

    let tested = all_rows.len();
    let significant = all_rows
        .into_iter()
        .filter(|row| row.fraction_tissue1 <= config.specificity_threshold)
        .filter(|row| row.p_value < config.alpha)
        .collect_vec();
    info!(
        "{} of {} patterns are specific to {} against {}",
        significant.len(),
        tested,
        config.tissue2,
        config.tissue1
    );
    Ok(significant)
}

/// Keeps the `n` rows with the smallest p-values. Ties keep input order.
pub fn top_patterns(
    mut rows: Vec<EnrichmentRow>,
    n: usize,
) -> Vec<EnrichmentRow> {
    rows.sort_by(|a, b| a.p_value.total_cmp(&b.p_value));
    rows.truncate(n);
    rows
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn record(
        coords: &str,
        tissue: &str,
        sample: &str,
        counts: [u32; 8],
    ) -> PmpRecord {
        PmpRecord {
            cpg_coordinates: coords.to_string(),
            strand:          "f".to_string(),
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

    fn records() -> Vec<PmpRecord> {
        vec![
            // Locus A: `111` absent from cfDNA, frequent in Islet.
            record("1:2:3", "cfDNA", "S1", [500, 0, 0, 0, 0, 0, 0, 0]),
            record("1:2:3", "cfDNA", "S2", [500, 0, 0, 0, 0, 0, 0, 0]),
            record("1:2:3", "Islet", "S3", [10, 0, 0, 0, 0, 0, 0, 30]),
            // Locus B: same fractions in both tissues.
            record("4:5:6", "cfDNA", "S1", [50, 0, 0, 0, 0, 0, 0, 50]),
            record("4:5:6", "Islet", "S3", [50, 0, 0, 0, 0, 0, 0, 50]),
            // Locus C: only present in a third tissue.
            record("7:8:9", "Liver", "S4", [0, 0, 0, 0, 0, 0, 0, 40]),
        ]
    }

    #[test]
    fn test_fraction_of_empty_total() {
        assert_eq!(fraction(0, 0), 0.0);
        assert_approx_eq!(fraction(1, 4), 0.25);
    }

    #[test]
    fn test_sum_counts_merges_samples() -> anyhow::Result<()> {
        let sums = sum_counts(&records())?.collect()?;
        assert_eq!(sums.height(), 5);

        let loci = locus_counts(&records(), &EnrichmentConfig::default())?;
        assert_eq!(
            loci.iter().map(|l| l.cpg_coordinates.as_str()).collect_vec(),
            vec!["1:2:3", "4:5:6", "7:8:9"]
        );
        // Two cfDNA samples merged, Islet alongside.
        assert_eq!(loci[0].tissue1[0], 1000);
        assert_eq!(loci[0].tissue1[8], 1000);
        assert_eq!(loci[0].tissue2[7], 30);
        assert_eq!(loci[0].tissue2[8], 40);
        // Locus only seen in a third tissue.
        assert_eq!(loci[2].tissue1, [0; 9]);
        assert_eq!(loci[2].tissue2, [0; 9]);
        Ok(())
    }

    #[test]
    fn test_enrichment_finds_specific_pattern() -> anyhow::Result<()> {
        let rows = compute_pattern_enrichment(&records(), &EnrichmentConfig::default())?;
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.cpg_coordinates, "1:2:3");
        assert_eq!(row.pattern, PmpPattern::P111);
        assert_eq!(row.read_count_tissue1, 0);
        assert_eq!(row.total_reads_tissue1, 1000);
        assert_eq!(row.read_count_tissue2, 30);
        assert_eq!(row.total_reads_tissue2, 40);
        assert_eq!(row.fraction_tissue1, 0.0);
        assert_approx_eq!(row.fraction_tissue2, 0.75);
        assert!(row.p_value < 1e-10);
        Ok(())
    }

    #[test]
    fn test_enrichment_loose_filters_keep_order() -> anyhow::Result<()> {
        let config = EnrichmentConfig::default()
            .with_specificity_threshold(1.0)
            .with_alpha(1.0 + f64::EPSILON);
        let rows = compute_pattern_enrichment(&records(), &config)?;
        // Every pattern of every locus, including the one absent from both
        // tissues (p = 1).
        assert_eq!(rows.len(), 3 * 8);
        assert_eq!(rows[0].cpg_coordinates, "1:2:3");
        assert_eq!(rows[0].pattern, PmpPattern::P000);
        assert_eq!(rows[23].cpg_coordinates, "7:8:9");
        assert_eq!(rows[23].pattern, PmpPattern::P111);
        assert_eq!(rows[23].p_value, 1.0);
        assert_eq!(rows[23].fraction_tissue2, 0.0);
        Ok(())
    }

    #[test]
    fn test_enrichment_swapped_tissues() -> anyhow::Result<()> {
        let config = EnrichmentConfig::default()
            .with_tissue1("Islet".to_string())
            .with_tissue2("cfDNA".to_string());
        let rows = compute_pattern_enrichment(&records(), &config)?;
        assert!(rows.is_empty());
        Ok(())
    }

    #[test]
    fn test_enrichment_of_empty_table() -> anyhow::Result<()> {
        let rows = compute_pattern_enrichment(&[], &EnrichmentConfig::default())?;
        assert!(rows.is_empty());
        Ok(())
    }

    #[test]
    fn test_top_patterns_stable() -> anyhow::Result<()> {
        let mut rows = compute_pattern_enrichment(
            &records(),
            &EnrichmentConfig::default()
                .with_specificity_threshold(1.0)
                .with_alpha(1.0 + f64::EPSILON),
        )?;
        rows.reverse();
        let top = top_patterns(rows, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].pattern, PmpPattern::P111);
        assert_eq!(top[0].cpg_coordinates, "1:2:3");
        assert!(top.windows(2).all(|w| w[0].p_value <= w[1].p_value));

        assert!(top_patterns(Vec::new(), 10).is_empty());
        Ok(())
    }
}
