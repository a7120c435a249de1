use std::io::BufRead;
use std::path::Path;

use anyhow::{
    anyhow,
    Context,
};
use log::*;
use noodles_vcf as vcf;
use noodles_vcf::variant::record::samples::series::value::Array;
use noodles_vcf::variant::record::samples::series::Value;
use noodles_vcf::variant::record::samples::Sample as _;
use noodles_vcf::variant::record::samples::Samples as _;
use noodles_vcf::variant::record::AlternateBases;

use super::compression::open_maybe_gz;

const ALLELE_DEPTHS: &str = "AD";

/// Site-level fields of a VCF data line and the allele depths of its first
/// sample.
#[derive(Debug, Clone, PartialEq)]
pub struct VcfRecord {
    pub chrom:     String,
    pub pos:       u64,
    pub reference: String,
    pub alts:      Vec<String>,
    /// `AD` of the first sample: reference depth followed by one depth per
    /// alternate allele.
    pub ad:        Option<Vec<u64>>,
}

impl VcfRecord {
    fn from_noodles(
        record: &vcf::Record,
        header: &vcf::Header,
    ) -> anyhow::Result<Self> {
        let chrom = record.reference_sequence_name().to_string();
        let pos = match record.variant_start() {
            Some(Ok(pos)) => pos.get() as u64,
            Some(Err(e)) => return Err(e).context("Invalid POS"),
            None => return Err(anyhow!("Missing POS")),
        };
        let reference = record.reference_bases().to_string();
        let alts = record
            .alternate_bases()
            .iter()
            .map(|alt| alt.map(str::to_string))
            .collect::<std::io::Result<Vec<_>>>()
            .context("Invalid ALT")?;
        let ad = first_sample_depths(record, header)?;

        Ok(Self {
            chrom,
            pos,
            reference,
            alts,
            ad,
        })
    }

    pub fn allele_depths(&self) -> Option<&[u64]> { self.ad.as_deref() }

    /// Share of reads supporting any alternate allele,
    /// `sum(AD[1..]) / sum(AD)`. `None` when `AD` is missing or sums to zero.
    pub fn alt_fraction(&self) -> Option<f64> {
        let depths = self.allele_depths()?;
        let total: u64 = depths.iter().sum();
        if total == 0 {
            return None;
        }
        let alt: u64 = depths.iter().skip(1).sum();
        Some(alt as f64 / total as f64)
    }
}

/// Typed `AD` of the first sample. Missing keys, missing values and
/// negative depths all yield `None`.
fn first_sample_depths(
    record: &vcf::Record,
    header: &vcf::Header,
) -> anyhow::Result<Option<Vec<u64>>> {
    let samples = record.samples();
    let Some(sample) = samples.iter().next() else {
        return Ok(None);
    };
    let value = match sample.get(header, ALLELE_DEPTHS) {
        Some(value) => value.context("Invalid AD")?,
        None => None,
    };

    let depths = match value {
        Some(Value::Array(Array::Integer(values))) => values
            .iter()
            .map(|v| v.map(|d| d.and_then(|d| u64::try_from(d).ok())))
            .collect::<std::io::Result<Option<Vec<_>>>>()
            .context("Invalid AD")?,
        Some(Value::Integer(depth)) => u64::try_from(depth).ok().map(|d| vec![d]),
        _ => None,
    };
    Ok(depths)
}

/// Streaming reader of plain or gzipped VCF files. The header is parsed on
/// construction and used to type the sample fields.
pub struct VcfReader {
    inner:  vcf::io::Reader<Box<dyn BufRead>>,
    header: vcf::Header,
    line:   usize,
}

impl VcfReader {
    pub fn new(handle: Box<dyn BufRead>) -> anyhow::Result<Self> {
        let mut inner = vcf::io::Reader::new(handle);
        let header = inner
            .read_header()
            .context("Failed to read VCF header")?;
        trace!(
            "VCF header with {} sample(s)",
            header.sample_names().len()
        );
        Ok(Self {
            inner,
            header,
            line: 0,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        debug!("Opening VCF {}", path.display());
        Self::new(open_maybe_gz(path)?)
            .with_context(|| format!("Failed to open VCF {}", path.display()))
    }

    pub fn header(&self) -> &vcf::Header { &self.header }
}

impl Iterator for VcfReader {
    type Item = anyhow::Result<VcfRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = vcf::Record::default();
        match self.inner.read_record(&mut record) {
            Ok(0) => None,
            Ok(_) => {
                self.line += 1;
                Some(
                    VcfRecord::from_noodles(&record, &self.header)
                        .with_context(|| format!("Malformed VCF record {}", self.line)),
                )
            },
            Err(e) => Some(Err(e).context("Failed to read VCF")),
        }
    }
}
