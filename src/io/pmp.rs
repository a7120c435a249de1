use std::io::Read;
use std::path::Path;

use anyhow::Context;
use log::*;

use super::compression::open_maybe_gz;
use super::table::{
    read_table_from,
    TableFormat,
};
use crate::data_structs::PmpRecord;

/// Parses a comma separated PMP count table.
pub fn read_pmp_from<R: Read>(reader: R) -> anyhow::Result<Vec<PmpRecord>> {
    read_table_from(reader, TableFormat::Csv)
}

/// Reads a PMP count table (`CpG_Coordinates`, `strand`, the eight pattern
/// columns, `Sample_ID`, `Replicate`, `Tissue`) from a plain or gzipped
/// CSV file.
pub fn read_pmp_table<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<PmpRecord>> {
    let path = path.as_ref();
    let records = read_pmp_from(open_maybe_gz(path)?)
        .with_context(|| format!("Failed to read PMP table {}", path.display()))?;
    info!("Read {} PMP records from {}", records.len(), path.display());
    Ok(records)
}
