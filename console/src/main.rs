mod bmr;
mod coverage;
mod enrich;
mod power;
mod somatic;
pub mod utils;

use bmr::BmrArgs;
use clap::{
    Parser,
    Subcommand,
};
use coverage::CoverageArgs;
use enrich::EnrichArgs;
use power::PowerArgs;
use somatic::SomaticArgs;
use utils::UtilsArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Per-CpG coverage by tissue, summary statistics and coverage curve.
    Coverage {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  CoverageArgs,
    },

    /// Tissue-specific methylation patterns (one-sided Fisher's exact test).
    Enrich {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  EnrichArgs,
    },

    /// Sequencing depth needed in tissue 2 to detect a pattern.
    Power {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  PowerArgs,
    },

    /// Somatic calls from a tumor/normal VCF pair.
    Somatic {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  SomaticArgs,
    },

    /// Background mutation rate of a normal sample.
    Bmr {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  BmrArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Coverage { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Enrich { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Power { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Somatic { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Bmr { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
    }
    Ok(())
}
