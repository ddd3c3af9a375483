use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use parlance::{Config, Engine};
use std::{io, path::PathBuf};

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    config: PathBuf,

    /// Overrides the seed given in the config file.
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Run,

    Check,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mut cfg = Config::from_file(&args.config).context("failed to construct cfg")?;
    if args.seed.is_some() {
        cfg.run.seed = args.seed;
    }
    log::info!("{cfg:#?}");

    match args.command {
        Command::Run => {
            let mut engine = Engine::generate_initial_condition(cfg)
                .context("failed to generate initial condition")?;
            let stdout = io::stdout();
            engine
                .perform_simulation(&mut stdout.lock())
                .context("failed to perform simulation")?;
        }
        Command::Check => log::info!("config is valid"),
    }

    Ok(())
}
