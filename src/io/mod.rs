//! Readers and writers for the files pmpkit works with.
//!
//! - PMP count tables (CSV, optionally gzipped) into [`PmpRecord`]s.
//! - VCF files (plain or bgzipped) as a stream of [`VcfRecord`]s, parsed
//!   with `noodles-vcf`. Only the site fields and the first sample's `AD`
//!   are kept.
//! - Whitespace-separated normal-variant tables (`CHROM POS REF ALT DP AD`).
//! - Generic delimited tables of any serde record, used for every output.
//!
//! [`PmpRecord`]: crate::data_structs::PmpRecord

mod compression;
mod pmp;
mod table;
mod variants;
mod vcf;

pub use compression::{
    open_maybe_gz,
    Compression,
};
pub use pmp::{
    read_pmp_from,
    read_pmp_table,
};
pub use table::{
    read_candidates,
    read_table,
    read_table_from,
    write_table,
    write_table_to,
    TableFormat,
};
pub use variants::{
    read_normal_variants,
    read_normal_variants_from,
    NormalVariant,
};
pub use vcf::{
    VcfReader,
    VcfRecord,
};
