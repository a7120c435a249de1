/// Read count of a single pattern (or a sum of patterns) at one locus.
pub type CountType = u32;
/// Sequencing depth, i.e. the number of reads drawn for one tissue.
pub type DepthType = u64;
/// Fraction of reads showing a pattern.
pub type FractionType = f64;
