use std::path::PathBuf;

use clap::Args;
use console::style;
use pmpkit::prelude::*;

use crate::utils::{
    OutputFormat,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct SomaticArgs {
    #[arg(short = 'n', long, required = true, help = "Normal sample VCF (plain or gzipped).")]
    normal: PathBuf,
    #[arg(short = 't', long, required = true, help = "Tumor sample VCF (plain or gzipped).")]
    tumor:  PathBuf,
    #[arg(short = 'o', long, help = "Output table path. Defaults to standard output.")]
    output: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
    format: OutputFormat,

    #[arg(
        long,
        default_value_t = 0.1,
        help_heading = "FILTER ARGS",
        help = "Smallest tumor alt fraction of a somatic call."
    )]
    min_tumor_af:  f64,
    #[arg(
        long,
        default_value_t = 0.01,
        help_heading = "FILTER ARGS",
        help = "Largest normal alt fraction of a somatic call."
    )]
    max_normal_af: f64,
}

impl SomaticArgs {
    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let config = SomaticConfig::default()
            .with_min_tumor_af(self.min_tumor_af)
            .with_max_normal_af(self.max_normal_af);

        let calls = find_somatic_variants(
            VcfReader::from_path(&self.normal)?,
            VcfReader::from_path(&self.tumor)?,
            &config,
        )?;

        match &self.output {
            Some(path) => write_table(&calls, path, self.format.into())?,
            None => write_table_to(&calls, std::io::stdout().lock(), self.format.into())?,
        }
        eprintln!(
            "{}",
            style(format!("Found {} somatic variants.", calls.len()))
                .green()
                .bold()
        );
        Ok(())
    }
}
