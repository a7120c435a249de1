use std::path::PathBuf;

use clap::{
    Args,
    ValueEnum,
};
use glob::glob;
use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use log::{
    warn,
    LevelFilter,
};
use pmpkit::io::TableFormat;

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(
        long,
        short = 'T',
        required = false,
        help_heading = "UTILS",
        help = "Number of threads to use. Defaults to PMPKIT_NUM_THREADS or all cores."
    )]
    pub threads:  Option<usize>,
    #[arg(
        long,
        short = 'V',
        default_value_t = false,
        help_heading = "UTILS",
        help = "Verbose output."
    )]
    pub verbose:  bool,
    #[arg(
        long,
        default_value_t = false,
        help_heading = "UTILS",
        help = "Display progress bar."
    )]
    pub progress: bool,
}

impl UtilsArgs {
    /// Initialises logging and the thread count. Must run before any
    /// library call touches the thread pool.
    pub fn setup(&self) -> anyhow::Result<()> {
        let mut builder = pretty_env_logger::formatted_builder();
        match std::env::var("RUST_LOG") {
            Ok(filters) => {
                builder.parse_filters(&filters);
            },
            Err(_) => {
                builder.filter_level(if self.verbose {
                    LevelFilter::Debug
                }
                else {
                    LevelFilter::Info
                });
            },
        }
        builder.try_init()?;

        if let Some(threads) = self.threads {
            std::env::set_var("PMPKIT_NUM_THREADS", threads.to_string());
        }
        log::debug!("Using {} threads", pmpkit::utils::n_threads());
        Ok(())
    }

    pub fn pbar(
        &self,
        total: usize,
    ) -> anyhow::Result<ProgressBar> {
        if self.progress {
            init_pbar(total)
        }
        else {
            Ok(ProgressBar::hidden())
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum OutputFormat {
    Tsv,
    Csv,
}

impl From<OutputFormat> for TableFormat {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Tsv => TableFormat::Tsv,
            OutputFormat::Csv => TableFormat::Csv,
        }
    }
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Tsv => "tsv",
            OutputFormat::Csv => "csv",
        }
    }
}

pub fn init_pbar(total: usize) -> anyhow::Result<ProgressBar> {
    let progress_bar = ProgressBar::new(total as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}, ETA: {eta}] [{bar:40.cyan/blue}] {pos:>5.green}/{len:5} {msg}")?
            .progress_chars("#>-"),
    );
    progress_bar.set_message("Processing...");
    Ok(progress_bar)
}

pub(crate) fn expand_wildcards(paths: Vec<String>) -> Vec<PathBuf> {
    let mut expanded_paths = Vec::new();

    for path in paths {
        if path.contains('*') || path.contains('?') {
            match glob(&path) {
                Ok(matches) => {
                    expanded_paths.extend(matches.filter_map(Result::ok));
                },
                Err(e) => warn!("Error processing wildcard '{}': {}", path, e),
            }
        }
        else {
            expanded_paths.push(PathBuf::from(path));
        }
    }

    expanded_paths
}
