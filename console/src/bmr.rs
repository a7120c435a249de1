use std::path::PathBuf;

use clap::Args;
use console::style;
use pmpkit::prelude::*;

use crate::utils::UtilsArgs;

#[derive(Args, Debug, Clone)]
pub(crate) struct BmrArgs {
    #[arg(
        short = 'i',
        long,
        required = true,
        help = "Normal variant table: whitespace separated CHROM POS REF ALT DP AD."
    )]
    input:            PathBuf,
    #[arg(
        long,
        default_value_t = 0.30,
        help = "Sites with an alt fraction at or above this value are excluded."
    )]
    max_alt_fraction: f64,
    #[arg(long, default_value_t = false, help = "Print the result as JSON.")]
    json:             bool,
}

impl BmrArgs {
    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let variants = read_normal_variants(&self.input)?;
        let config = BackgroundConfig::default().with_max_alt_fraction(self.max_alt_fraction);
        let rate = background_mutation_rate(&variants, &config)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rate)?);
        }
        else {
            println!(
                "Median background mutation rate: {}",
                style(format!("{:.6e}", rate.background_rate)).green()
            );
            println!(
                "Reads per million required for confident call: {}",
                style(format!("{:.2}", rate.reads_per_million)).green()
            );
        }
        Ok(())
    }
}
