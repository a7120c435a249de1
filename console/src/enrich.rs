use std::path::PathBuf;

use anyhow::anyhow;
use clap::Args;
use console::style;
use pmpkit::prelude::*;

use crate::utils::{
    expand_wildcards,
    OutputFormat,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct EnrichArgs {
    #[arg(
        value_parser,
        short = 'i',
        long,
        num_args=1..,
        required = true,
        help = "Paths to PMP count tables (CSV, optionally gzipped). Wildcards are expanded."
    )]
    input:  Vec<String>,
    #[arg(short = 'o', long, required = true, help = "Output table path.")]
    output: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
    format: OutputFormat,

    #[arg(
        long = "tissue1",
        default_value = "cfDNA",
        help_heading = "TEST ARGS",
        help = "Background tissue. Reported patterns must be rare in it."
    )]
    tissue1:     String,
    #[arg(
        long = "tissue2",
        default_value = "Islet",
        help_heading = "TEST ARGS",
        help = "Target tissue."
    )]
    tissue2:     String,
    #[arg(
        short = 's',
        long,
        default_value_t = 0.01,
        help_heading = "TEST ARGS",
        help = "Largest pattern fraction allowed in the background tissue."
    )]
    specificity: f64,
    #[arg(
        short = 'a',
        long,
        default_value_t = 0.05,
        help_heading = "TEST ARGS",
        help = "Fisher's exact test p-value threshold."
    )]
    alpha:       f64,
    #[arg(
        short = 'n',
        long,
        help_heading = "TEST ARGS",
        help = "Keep only the N patterns with the smallest p-values."
    )]
    top:         Option<usize>,
}

impl EnrichArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let paths = expand_wildcards(self.input.clone());
        if paths.is_empty() {
            return Err(anyhow!("No input files matched"));
        }

        let progress_bar = utils.pbar(paths.len())?;
        let mut records = Vec::new();
        for path in paths.iter() {
            progress_bar.set_message(format!("{}", style(path.display()).green()));
            records.extend(read_pmp_table(path)?);
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        let config = EnrichmentConfig::default()
            .with_tissue1(self.tissue1.clone())
            .with_tissue2(self.tissue2.clone())
            .with_specificity_threshold(self.specificity)
            .with_alpha(self.alpha);
        let mut rows = compute_pattern_enrichment(&records, &config)?;
        if let Some(n) = self.top {
            rows = top_patterns(rows, n);
        }

        write_table(&rows, &self.output, self.format.into())?;
        println!(
            "{}",
            style(format!(
                "Found {} {}-specific patterns.",
                rows.len(),
                self.tissue2
            ))
            .green()
            .bold()
        );
        Ok(())
    }
}
