//! Tumor/normal comparison of variant calls.
//!
//! A tumor call is reported as somatic when its alternate-allele fraction
//! is high enough in the tumor and (nearly) absent in the matched normal.

use hashbrown::HashMap;
use log::*;
use serde::{
    Deserialize,
    Serialize,
};

use crate::io::VcfRecord;
use crate::with_field_fn;

#[derive(Debug, Clone, PartialEq)]
pub struct SomaticConfig {
    /// Smallest tumor alt fraction of a somatic call.
    pub min_tumor_af:  f64,
    /// Largest normal alt fraction of a somatic call.
    pub max_normal_af: f64,
}

impl SomaticConfig {
    with_field_fn!(min_tumor_af, f64);
    with_field_fn!(max_normal_af, f64);

    pub fn is_somatic(
        &self,
        tumor_af: f64,
        normal_af: f64,
    ) -> bool {
        tumor_af >= self.min_tumor_af && normal_af <= self.max_normal_af
    }
}

impl Default for SomaticConfig {
    fn default() -> Self {
        Self {
            min_tumor_af:  0.1,
            max_normal_af: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantCall {
    #[serde(rename = "CHROM")]
    pub chrom:     String,
    #[serde(rename = "POS")]
    pub pos:       u64,
    #[serde(rename = "REF")]
    pub reference: String,
    #[serde(rename = "ALT")]
    pub alt:       String,
    #[serde(rename = "Normal_AF")]
    pub normal_af: f64,
    #[serde(rename = "Tumor_AF")]
    pub tumor_af:  f64,
}

type VariantKey = (String, u64, String, String);

fn variant_keys(record: &VcfRecord) -> impl Iterator<Item = VariantKey> + '_ {
    record.alts.iter().map(move |alt| {
        (
            record.chrom.clone(),
            record.pos,
            record.reference.clone(),
            alt.clone(),
        )
    })
}

/// Alt fraction of every (CHROM, POS, REF, ALT) of the normal sample.
/// Records without a usable `AD` are left out.
pub fn normal_alt_fractions<I>(normal: I) -> anyhow::Result<HashMap<VariantKey, f64>>
where
    I: IntoIterator<Item = anyhow::Result<VcfRecord>>, {
    let mut fractions = HashMap::new();
    for record in normal {
        let record = record?;
        let Some(af) = record.alt_fraction() else {
            continue;
        };
        for key in variant_keys(&record) {
            fractions.insert(key, af);
        }
    }
    debug!("Loaded {} normal alleles", fractions.len());
    Ok(fractions)
}

/// Somatic calls of the tumor sample, in tumor file order.
///
/// Tumor alleles without a usable or with a zero alt fraction are skipped.
/// Alleles missing from the normal sample have a normal alt fraction of 0.
pub fn find_somatic_variants<N, T>(
    normal: N,
    tumor: T,
    config: &SomaticConfig,
) -> anyhow::Result<Vec<VariantCall>>
where
    N: IntoIterator<Item = anyhow::Result<VcfRecord>>,
    T: IntoIterator<Item = anyhow::Result<VcfRecord>>, {
    let normal_afs = normal_alt_fractions(normal)?;

    let mut calls = Vec::new();
    let mut n_tested = 0usize;
    for record in tumor {
        let record = record?;
        let tumor_af = match record.alt_fraction() {
            Some(af) if af > 0.0 => af,
            _ => continue,
        };
        for key in variant_keys(&record) {
            n_tested += 1;
            let normal_af = normal_afs.get(&key).copied().unwrap_or(0.0);
            if config.is_somatic(tumor_af, normal_af) {
                let (chrom, pos, reference, alt) = key;
                calls.push(VariantCall {
                    chrom,
                    pos,
                    reference,
                    alt,
                    normal_af,
                    tumor_af,
                });
            }
        }
    }
    info!(
        "{} of {} tumor alleles are somatic",
        calls.len(),
        n_tested
    );
    Ok(calls)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn vcf(
        chrom: &str,
        pos: u64,
        alts: &[&str],
        ad: Option<Vec<u64>>,
    ) -> anyhow::Result<VcfRecord> {
        Ok(VcfRecord {
            chrom:     chrom.to_string(),
            pos,
            reference: "A".to_string(),
            alts:      alts.iter().map(|a| a.to_string()).collect(),
            ad,
        })
    }

    #[rstest]
    #[case(0.1, 0.0, true)]
    #[case(0.1, 0.01, true)]
    #[case(0.09, 0.0, false)]
    #[case(0.5, 0.02, false)]
    fn test_is_somatic(
        #[case] tumor: f64,
        #[case] normal: f64,
        #[case] expected: bool,
    ) {
        assert_eq!(SomaticConfig::default().is_somatic(tumor, normal), expected);
    }

    #[test]
    fn test_find_somatic_variants() -> anyhow::Result<()> {
        let normal = vec![
            vcf("chr1", 100, &["G"], Some(vec![100, 0])),
            vcf("chr1", 200, &["T"], Some(vec![50, 50])),
            vcf("chr1", 300, &["C"], None),
        ];
        let tumor = vec![
            // Absent in normal reads: somatic.
            vcf("chr1", 100, &["G"], Some(vec![80, 20])),
            // Germline.
            vcf("chr1", 200, &["T"], Some(vec![40, 60])),
            // Not in the normal file: normal AF defaults to 0.
            vcf("chr2", 50, &["T"], Some(vec![70, 30])),
            // Zero tumor AF is skipped.
            vcf("chr2", 60, &["T"], Some(vec![70, 0])),
            // Tumor AF too low.
            vcf("chr2", 70, &["T"], Some(vec![95, 5])),
            // Missing AD in normal is treated as absent.
            vcf("chr1", 300, &["C"], Some(vec![10, 10])),
        ];
        let calls = find_somatic_variants(normal, tumor, &SomaticConfig::default())?;
        let summary = calls
            .iter()
            .map(|c| (c.chrom.as_str(), c.pos, c.normal_af, c.tumor_af))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![
                ("chr1", 100, 0.0, 0.2),
                ("chr2", 50, 0.0, 0.3),
                ("chr1", 300, 0.0, 0.5),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_multiallelic_uses_combined_fraction() -> anyhow::Result<()> {
        let tumor = vec![vcf("chr3", 10, &["G", "T"], Some(vec![60, 30, 10]))];
        let calls = find_somatic_variants(Vec::new(), tumor, &SomaticConfig::default())?;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].alt, "G");
        assert_eq!(calls[1].alt, "T");
        assert_eq!(calls[0].tumor_af, 0.4);
        Ok(())
    }

    #[test]
    fn test_errors_propagate() {
        let tumor = vec![Err(anyhow::anyhow!("broken line"))];
        assert!(find_somatic_variants(Vec::new(), tumor, &SomaticConfig::default()).is_err());
    }
}
