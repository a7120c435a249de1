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
pub(crate) struct CoverageArgs {
    #[arg(
        value_parser,
        short = 'i',
        long,
        num_args=1..,
        required = true,
        help = "Paths to PMP count tables (CSV, optionally gzipped). Wildcards are expanded."
    )]
    input:  Vec<String>,
    #[arg(
        short = 'o',
        long,
        required = true,
        help = "Prefix for the generated output files."
    )]
    output: PathBuf,
    #[arg(
        short,
        long,
        default_value_t = 100,
        help = "Coverage increment of the CpGs-covered-at-X curve."
    )]
    step:   u64,
    #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
    format: OutputFormat,
}

impl CoverageArgs {
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

        let coverage = per_cpg_coverage(&records)?;
        let stats = coverage_stats(&coverage);
        let curve = coverage_curve(&coverage, self.step)?;

        let ext = self.format.extension();
        let prefix = self.output.display();
        write_table(
            &coverage,
            format!("{}.coverage.{}", prefix, ext),
            self.format.into(),
        )?;
        write_table(&stats, format!("{}.stats.{}", prefix, ext), self.format.into())?;
        write_table(&curve, format!("{}.curve.{}", prefix, ext), self.format.into())?;

        for row in stats.iter() {
            println!(
                "{}\tmedian {:.1}\tcv {:.3}\t({} CpGs)",
                style(&row.tissue).blue().bold(),
                row.median,
                row.cv,
                row.n_cpgs
            );
        }
        Ok(())
    }
}
