use std::path::PathBuf;

use anyhow::anyhow;
use clap::{
    Args,
    ValueEnum,
};
use console::style;
use pmpkit::prelude::*;
use serde::Serialize;

use crate::utils::{
    OutputFormat,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct PowerArgs {
    #[arg(
        short = 'i',
        long,
        required_unless_present_all = ["f1", "f2"],
        conflicts_with_all = ["f1", "f2"],
        help = "Candidate table with CpG_Coordinates, pattern, fraction_Tissue1 and \
                fraction_Tissue2 columns (e.g. the output of `enrich`)."
    )]
    input:  Option<PathBuf>,
    #[arg(
        short = 'o',
        long,
        requires = "input",
        help = "Output table path. Defaults to standard output."
    )]
    output: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
    format: OutputFormat,

    #[arg(long, requires = "f2", help = "Pattern fraction in tissue 1.")]
    f1: Option<f64>,
    #[arg(long, requires = "f1", help = "Pattern fraction in tissue 2.")]
    f2: Option<f64>,

    #[arg(
        short = 'c',
        long,
        default_value_t = 1_000_000,
        help_heading = "SIMULATION ARGS",
        help = "Sequencing depth of tissue 1."
    )]
    coverage_t1: DepthType,
    #[arg(
        short = 'a',
        long,
        default_value_t = 0.05,
        help_heading = "SIMULATION ARGS",
        help = "Significance level of the one-sided Fisher's exact test."
    )]
    alpha:       f64,
    #[arg(
        short = 'p',
        long,
        default_value_t = 0.8,
        help_heading = "SIMULATION ARGS",
        help = "Target power."
    )]
    power:       f64,
    #[arg(
        short = 'm',
        long,
        default_value_t = 100_000,
        help_heading = "SEARCH ARGS",
        help = "Largest tissue-2 depth to consider."
    )]
    max_depth:   DepthType,
    #[arg(
        short = 's',
        long,
        default_value_t = 100,
        help_heading = "SEARCH ARGS",
        help = "Distance between candidate tissue-2 depths."
    )]
    step:        DepthType,
    #[arg(
        long,
        default_value_t = 10,
        help_heading = "SEARCH ARGS",
        help = "Smallest tissue-2 depth to consider."
    )]
    floor:       DepthType,
    #[arg(
        short = 't',
        long,
        default_value_t = 1000,
        help_heading = "SIMULATION ARGS",
        help = "Monte Carlo trials per candidate depth."
    )]
    trials:      usize,
    #[arg(
        long,
        default_value_t = 42,
        help_heading = "SIMULATION ARGS",
        help = "Random seed."
    )]
    seed:        u64,
    #[arg(
        long,
        value_enum,
        default_value_t = StrategyArg::Linear,
        help_heading = "SEARCH ARGS",
        help = "Candidate search order. `bisect` assumes power grows with depth."
    )]
    strategy:    StrategyArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum StrategyArg {
    Linear,
    Bisect,
}

impl From<StrategyArg> for SearchStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Linear => SearchStrategy::Linear,
            StrategyArg::Bisect => SearchStrategy::Bisect,
        }
    }
}

#[derive(Debug, Serialize)]
struct SingleEstimate {
    f1:                   f64,
    f2:                   f64,
    coverage_tissue1:     DepthType,
    coverage_required_t2: Option<DepthType>,
}

impl PowerArgs {
    fn config(&self) -> PowerConfig {
        PowerConfig::default()
            .with_alpha(self.alpha)
            .with_power(self.power)
            .with_max_depth(self.max_depth)
            .with_step(self.step)
            .with_floor(self.floor)
            .with_n_trials(self.trials)
            .with_seed(self.seed)
            .with_strategy(self.strategy.into())
    }

    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let config = self.config();

        if let (Some(f1), Some(f2)) = (self.f1, self.f2) {
            let required = estimate_required_depth(f1, f2, self.coverage_t1, &config)?;
            let estimate = SingleEstimate {
                f1,
                f2,
                coverage_tissue1: self.coverage_t1,
                coverage_required_t2: required,
            };
            println!("{}", serde_json::to_string_pretty(&estimate)?);
            return Ok(());
        }

        let input = self
            .input
            .as_ref()
            .ok_or_else(|| anyhow!("Either --input or --f1/--f2 is required"))?;
        let candidates = read_candidates(input)?;

        let progress_bar = utils.pbar(candidates.len())?;
        let thresholds = estimate_thresholds_with_callback(
            &candidates,
            self.coverage_t1,
            &config,
            |threshold| {
                progress_bar.set_message(format!(
                    "{}",
                    style(format!(
                        "{} {}",
                        threshold.cpg_coordinates, threshold.pattern
                    ))
                    .blue()
                ));
                progress_bar.inc(1);
            },
        )?;
        progress_bar.finish();

        match &self.output {
            Some(path) => write_table(&thresholds, path, self.format.into())?,
            None => write_table_to(&thresholds, std::io::stdout().lock(), self.format.into())?,
        }

        let found = thresholds
            .iter()
            .filter(|t| t.coverage_required_t2.is_some())
            .count();
        eprintln!(
            "{}",
            style(format!(
                "Target power reached for {} of {} patterns.",
                found,
                thresholds.len()
            ))
            .green()
            .bold()
        );
        Ok(())
    }
}
