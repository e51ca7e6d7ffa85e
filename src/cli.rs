use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::EmbeddingMode;

#[derive(Parser, Debug)]
#[command(
    name = "landed-cost",
    version,
    about = "Allocate landed cost across the items of a customs import declaration"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(short, long, global = true, help = "Log allocation details to stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Allocate costs and reconcile them against the declared totals.
    Run {
        /// DI XML export or serialized declaration (.xml / .json)
        file: PathBuf,
        #[arg(long, help = "Freight is already inside the merchandise value (CFR/CIF)")]
        freight_embedded: bool,
        #[arg(long, help = "Insurance is already inside the merchandise value (CIF)")]
        insurance_embedded: bool,
        #[arg(long, value_enum, conflicts_with_all = ["freight_embedded", "insurance_embedded"])]
        mode: Option<ModeArg>,
        #[arg(long, help = "Pick the mode from the declaration's trade term")]
        detect_incoterm: bool,
        #[arg(long, help = "Exit with an error when the reconciliation diverges")]
        strict: bool,
    },
    /// Show the trade term found in a declaration and the mode it implies.
    Incoterm { file: PathBuf },
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    Show,
    Set {
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        #[arg(long)]
        detect_incoterm: Option<bool>,
        #[arg(long)]
        strict: Option<bool>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Separate,
    FreightEmbedded,
    InsuranceEmbedded,
    BothEmbedded,
}

impl From<ModeArg> for EmbeddingMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Separate => EmbeddingMode::Separate,
            ModeArg::FreightEmbedded => EmbeddingMode::FreightEmbedded,
            ModeArg::InsuranceEmbedded => EmbeddingMode::InsuranceEmbedded,
            ModeArg::BothEmbedded => EmbeddingMode::BothEmbedded,
        }
    }
}
