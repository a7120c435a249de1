use std::io::BufRead;
use std::path::Path;

use anyhow::Context;
use log::*;

use super::compression::open_maybe_gz;

/// One line of a normal-sample variant table: `CHROM POS REF ALT DP AD`,
/// whitespace separated, `AD` as `ref,alt`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalVariant {
    pub chrom:     String,
    pub pos:       String,
    pub reference: String,
    pub alt:       String,
    pub depth:     u64,
    pub ref_depth: u64,
    pub alt_depth: u64,
}

impl NormalVariant {
    /// Returns `None` for lines with missing columns or non-numeric depths.
    pub fn parse_line(line: &str) -> Option<Self> {
        let cols = line.split_whitespace().collect::<Vec<_>>();
        if cols.len() < 6 {
            return None;
        }
        let depth = cols[4].parse::<u64>().ok()?;
        let mut ad = cols[5].split(',');
        let ref_depth = ad.next()?.parse::<u64>().ok()?;
        let alt_depth = ad.next()?.parse::<u64>().ok()?;

        Some(Self {
            chrom: cols[0].to_string(),
            pos: cols[1].to_string(),
            reference: cols[2].to_string(),
            alt: cols[3].to_string(),
            depth,
            ref_depth,
            alt_depth,
        })
    }

    /// `alt_depth / DP`, `None` when `DP` is zero.
    pub fn alt_fraction(&self) -> Option<f64> {
        if self.depth == 0 {
            None
        }
        else {
            Some(self.alt_depth as f64 / self.depth as f64)
        }
    }
}

pub fn read_normal_variants_from<R: BufRead>(reader: R) -> anyhow::Result<Vec<NormalVariant>> {
    let mut variants = Vec::new();
    let mut skipped = 0usize;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        match NormalVariant::parse_line(&line) {
            Some(variant) => variants.push(variant),
            None => {
                trace!("Skipping malformed line {}: {}", idx + 1, line);
                skipped += 1;
            },
        }
    }
    if skipped > 0 {
        warn!("Skipped {} malformed variant lines", skipped);
    }
    Ok(variants)
}

/// Reads a plain or gzipped normal-variant table.
pub fn read_normal_variants<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<NormalVariant>> {
    let path = path.as_ref();
    read_normal_variants_from(open_maybe_gz(path)?)
        .with_context(|| format!("Failed to read {}", path.display()))
}
