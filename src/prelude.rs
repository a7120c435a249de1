pub use crate::data_structs::typedef::*;
pub use crate::data_structs::{
    CandidatePattern,
    CoverageThreshold,
    PmpPattern,
    PmpRecord,
    ThresholdCandidate,
};
pub use crate::io::{
    open_maybe_gz,
    read_candidates,
    read_normal_variants,
    read_pmp_from,
    read_pmp_table,
    read_table,
    read_table_from,
    write_table,
    write_table_to,
    NormalVariant,
    TableFormat,
    VcfReader,
    VcfRecord,
};
pub use crate::tools::background::{
    background_mutation_rate,
    BackgroundConfig,
    BackgroundRate,
};
pub use crate::tools::coverage::{
    coverage_curve,
    coverage_stats,
    per_cpg_coverage,
    CoverageCurvePoint,
    CpgCoverage,
    TissueCoverageStats,
};
pub use crate::tools::enrichment::{
    compute_pattern_enrichment,
    top_patterns,
    EnrichmentConfig,
    EnrichmentRow,
};
pub use crate::tools::power::{
    estimate_required_depth,
    estimate_thresholds_for_candidates,
    estimate_thresholds_with_callback,
    simulate_power,
    PowerConfig,
    PowerError,
    SearchStrategy,
};
pub use crate::tools::somatic::{
    find_somatic_variants,
    SomaticConfig,
    VariantCall,
};
pub use crate::utils::{
    fisher_exact,
    Alternative,
};
