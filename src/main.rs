use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use lotscout::cli::{AppContext, Cli, Commands};
use lotscout::cli_ext::{lookup_cmd, recommend_cmd};
use lotscout::core::error::QueryError;
use lotscout::infra::config::{self, Config, DEFAULT_LOG_LEVEL};
use lotscout::infra::logging;
use tracing::debug;

/// Exit code for a malformed request (bad budget, category, brand, price)
const EXIT_BAD_QUERY: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Build a context once, pass everywhere
    let ctx = cli.context();
    if ctx.no_color {
        owo_colors::set_override(false);
    }

    match run(cli.command, &ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(err),
    }
}

fn run(command: Commands, ctx: &AppContext) -> Result<()> {
    match command {
        Commands::Recommend(args) => recommend_cmd::run(args, &configured(ctx)?, ctx),
        Commands::Match(args) => lookup_cmd::run_match(args, &configured(ctx)?, ctx),
        Commands::Appraise(args) => lookup_cmd::run_appraise(args, &configured(ctx)?, ctx),
        Commands::Classify(args) => {
            logging::init(DEFAULT_LOG_LEVEL, ctx.verbose, ctx.no_color)?;
            lookup_cmd::run_classify(args, ctx)
        }
        Commands::Init(args) => {
            logging::init(DEFAULT_LOG_LEVEL, ctx.verbose, ctx.no_color)?;
            config::init(args, ctx)
        }
        Commands::Completions(args) => {
            logging::init(DEFAULT_LOG_LEVEL, ctx.verbose, ctx.no_color)?;
            lotscout::completion::run(args, ctx)
        }
    }
}

/// Load config for the inventory commands, then start logging at its level
fn configured(ctx: &AppContext) -> Result<Config> {
    let cfg = config::load_config()?;
    logging::init(&cfg.log.level, ctx.verbose, ctx.no_color)?;

    match &cfg.source {
        Some(path) => debug!(path = %path.display(), "using config file"),
        None => debug!("no config file, using defaults"),
    }
    Ok(cfg)
}

fn report(err: anyhow::Error) -> ExitCode {
    if let Some(query_err) = err.downcast_ref::<QueryError>() {
        eprintln!("{:?}", miette::Report::new(query_err.clone()));
        return ExitCode::from(EXIT_BAD_QUERY);
    }

    eprintln!("Error: {err:#}");
    ExitCode::FAILURE
}
