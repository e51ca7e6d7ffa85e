mod cli;
mod domain;
mod infra;
mod report;
mod util;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::domain::{process, suggest_mode, EmbeddingMode};
use crate::infra::source::load_declaration;
use crate::util::persistence::{load_settings, save_settings};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            file,
            freight_embedded,
            insurance_embedded,
            mode,
            detect_incoterm,
            strict,
        } => {
            let settings = load_settings();
            let mut declaration = load_declaration(&file)
                .with_context(|| format!("could not load declaration {}", file.display()))?;

            let explicit = if freight_embedded || insurance_embedded {
                Some(EmbeddingMode::from_flags(freight_embedded, insurance_embedded))
            } else {
                mode.map(EmbeddingMode::from)
            };
            let detected = if explicit.is_none() && (detect_incoterm || settings.detect_incoterm) {
                let suggestion = suggest_mode(&declaration);
                if suggestion.is_none() {
                    warn!("no recognised trade term in declaration; using default mode");
                }
                suggestion
            } else {
                None
            };
            let mode = explicit
                .or(detected.map(|(_, mode)| mode))
                .unwrap_or(settings.default_mode);
            info!(mode = %mode, "cost configuration resolved");

            let result = process(&mut declaration, mode)
                .with_context(|| format!("could not allocate costs for {}", file.display()))?;

            if cli.json {
                report::print_json(report::RunReport::new(
                    file.display().to_string(),
                    mode,
                    detected.map(|(incoterm, _)| incoterm),
                    &declaration,
                ))?;
            } else {
                print!("{}", report::render_text(&declaration)?);
            }

            if !result.is_ok() && (strict || settings.strict) {
                bail!(
                    "allocation diverges from declared totals by {:.4}%",
                    result.percent_difference
                );
            }
        }
        Commands::Incoterm { file } => {
            let declaration = load_declaration(&file)
                .with_context(|| format!("could not load declaration {}", file.display()))?;
            report::print_incoterm(
                cli.json,
                declaration.first_incoterm(),
                suggest_mode(&declaration),
            )?;
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => report::print_settings(cli.json, &load_settings())?,
            ConfigCommands::Set {
                mode,
                detect_incoterm,
                strict,
            } => {
                let mut settings = load_settings();
                if let Some(mode) = mode {
                    settings.default_mode = mode.into();
                }
                if let Some(detect) = detect_incoterm {
                    settings.detect_incoterm = detect;
                }
                if let Some(strict) = strict {
                    settings.strict = strict;
                }
                let path = save_settings(&settings).context("could not save settings")?;
                info!("settings saved to {}", path.display());
                report::print_settings(cli.json, &settings)?;
            }
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
