use serde::{
    Deserialize,
    Serialize,
};

use super::pattern::PmpPattern;
use super::typedef::{
    CountType,
    DepthType,
    FractionType,
};

/// One row of a PMP count table.
///
/// Pattern columns are named `` `000`` … `` `111`` in the raw export; the
/// bare names are accepted as well. Columns not listed here are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PmpRecord {
    #[serde(rename = "CpG_Coordinates")]
    pub cpg_coordinates: String,
    pub strand:          String,
    #[serde(rename = "`000", alias = "000")]
    pub p000:            CountType,
    #[serde(rename = "`001", alias = "001")]
    pub p001:            CountType,
    #[serde(rename = "`010", alias = "010")]
    pub p010:            CountType,
    #[serde(rename = "`011", alias = "011")]
    pub p011:            CountType,
    #[serde(rename = "`100", alias = "100")]
    pub p100:            CountType,
    #[serde(rename = "`101", alias = "101")]
    pub p101:            CountType,
    #[serde(rename = "`110", alias = "110")]
    pub p110:            CountType,
    #[serde(rename = "`111", alias = "111")]
    pub p111:            CountType,
    #[serde(rename = "Sample_ID")]
    pub sample_id:       String,
    #[serde(rename = "Replicate")]
    pub replicate:       String,
    #[serde(rename = "Tissue")]
    pub tissue:          String,
}

impl PmpRecord {
    /// Pattern counts in [`PmpPattern::ALL`] order.
    pub fn counts(&self) -> [CountType; 8] {
        [
            self.p000, self.p001, self.p010, self.p011, self.p100, self.p101,
            self.p110, self.p111,
        ]
    }

    pub fn count(
        &self,
        pattern: PmpPattern,
    ) -> CountType {
        self.counts()[pattern.index()]
    }

    /// Reads observed at this locus, all patterns combined.
    pub fn total_reads(&self) -> u64 {
        self.counts().iter().map(|&c| c as u64).sum()
    }

    /// Splits `CpG_Coordinates` into the three CpG site identifiers.
    ///
    /// Returns `None` unless the field holds exactly three `:`-separated
    /// parts.
    pub fn cpg_sites(&self) -> Option<[&str; 3]> {
        let mut parts = self.cpg_coordinates.split(':');
        let sites = [parts.next()?, parts.next()?, parts.next()?];
        if parts.next().is_some() {
            return None;
        }
        Some(sites)
    }
}

/// A labelled pattern with its fraction in two tissues, i.e. the input of
/// the coverage power estimator.
pub trait ThresholdCandidate {
    fn cpg_coordinates(&self) -> &str;
    fn pattern(&self) -> PmpPattern;
    fn fraction_tissue1(&self) -> FractionType;
    fn fraction_tissue2(&self) -> FractionType;
}

/// Minimal [`ThresholdCandidate`] as read from a candidates table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePattern {
    #[serde(rename = "CpG_Coordinates")]
    pub cpg_coordinates:  String,
    pub pattern:          PmpPattern,
    #[serde(rename = "fraction_Tissue1", alias = "fraction_T1")]
    pub fraction_tissue1: FractionType,
    #[serde(rename = "fraction_Tissue2", alias = "fraction_T2")]
    pub fraction_tissue2: FractionType,
}

impl ThresholdCandidate for CandidatePattern {
    fn cpg_coordinates(&self) -> &str { &self.cpg_coordinates }

    fn pattern(&self) -> PmpPattern { self.pattern }

    fn fraction_tissue1(&self) -> FractionType { self.fraction_tissue1 }

    fn fraction_tissue2(&self) -> FractionType { self.fraction_tissue2 }
}

/// Required tissue-2 depth for one candidate pattern.
///
/// `coverage_required_t2` is `None` when no depth within the search bound
/// reaches the target power (or the tissue-2 fraction does not exceed the
/// tissue-1 fraction); it is written as an empty field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageThreshold {
    #[serde(rename = "CpG_Coordinates")]
    pub cpg_coordinates:      String,
    pub pattern:              PmpPattern,
    #[serde(rename = "fraction_T1")]
    pub fraction_t1:          FractionType,
    #[serde(rename = "fraction_T2")]
    pub fraction_t2:          FractionType,
    #[serde(rename = "coverage_Tissue1")]
    pub coverage_tissue1:     DepthType,
    #[serde(rename = "coverage_required_T2")]
    pub coverage_required_t2: Option<DepthType>,
}
