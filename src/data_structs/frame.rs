use polars::prelude::{
    col,
    lit,
    Column,
    DataFrame,
    Expr,
    PolarsResult,
};

use super::{
    PmpPattern,
    PmpRecord,
};

pub mod colnames {
    pub const CPG_COORDINATES_NAME: &str = "CpG_Coordinates";
    pub const STRAND_NAME: &str = "strand";
    pub const SAMPLE_ID_NAME: &str = "Sample_ID";
    pub const REPLICATE_NAME: &str = "Replicate";
    pub const TISSUE_NAME: &str = "Tissue";
    /// Reads of a row, all patterns combined
    pub const TOTAL_READS_NAME: &str = "total_reads";
}

use colnames::*;

/// Columnar view of PMP records.
///
/// Identifier columns keep their table names; pattern counts are stored as
/// `UInt64` columns named `000` … `111`, so sums over many rows do not
/// overflow.
pub fn pmp_frame(records: &[PmpRecord]) -> PolarsResult<DataFrame> {
    let mut columns = vec![
        str_column(CPG_COORDINATES_NAME, records, |r| r.cpg_coordinates.as_str()),
        str_column(STRAND_NAME, records, |r| r.strand.as_str()),
        str_column(SAMPLE_ID_NAME, records, |r| r.sample_id.as_str()),
        str_column(REPLICATE_NAME, records, |r| r.replicate.as_str()),
        str_column(TISSUE_NAME, records, |r| r.tissue.as_str()),
    ];
    for pattern in PmpPattern::ALL {
        let counts = records
            .iter()
            .map(|r| r.count(pattern) as u64)
            .collect::<Vec<_>>();
        columns.push(Column::new(pattern.as_str().into(), counts));
    }
    DataFrame::new(columns)
}

fn str_column<F>(
    name: &str,
    records: &[PmpRecord],
    field: F,
) -> Column
where
    F: Fn(&PmpRecord) -> &str, {
    let values = records.iter().map(field).collect::<Vec<_>>();
    Column::new(name.into(), values)
}

/// Pattern count columns in [`PmpPattern::ALL`] order.
pub fn pattern_columns() -> impl Iterator<Item = Expr> {
    PmpPattern::ALL.into_iter().map(|p| col(p.as_str()))
}

/// Sum of the count columns of the given patterns.
pub fn pattern_sum<I>(patterns: I) -> Expr
where
    I: IntoIterator<Item = PmpPattern>, {
    patterns
        .into_iter()
        .fold(lit(0u64), |acc, p| acc + col(p.as_str()))
}

/// Reads of a row covering CpG site `site` (0, 1 or 2), following
/// [`PmpPattern::coverage_mask`].
pub fn site_coverage_expr(site: usize) -> Expr {
    pattern_sum(
        PmpPattern::ALL
            .into_iter()
            .filter(|p| p.coverage_mask()[site] == 1),
    )
}
