use anyhow::Result;
use clap::{Parser, Subcommand};
use reactive_examples_cli::logging::init_tracing;
use reactive_examples_cli::{DemoConfig, Scenarios};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "reactive-examples")]
#[command(about = "Runs Mono/Flux scenarios over a cast of people", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML configuration file (cast, delay, logging, scheduler)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Block on a single person
    Mono,

    /// Map a person into a command object
    MonoTransform,

    /// Filter a person out and block on the empty result
    MonoFilter {
        #[arg(long, default_value = "foo")]
        first_name: String,
    },

    /// Subscribe to the whole cast
    Flux,

    /// Subscribe to the cast filtered by first name
    FluxFilter {
        #[arg(long, default_value = "Fiona")]
        first_name: String,
    },

    /// Subscribe to the cast with every person delayed
    FluxDelay,

    /// Delay the cast, then filter first names containing a substring
    FluxFilterDelay {
        #[arg(long, default_value = "i")]
        contains: String,
    },

    /// Run every scenario
    All,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DemoConfig::from_file(path)?,
        None => DemoConfig::default(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    init_tracing(&config.logging);

    info!(
        "Starting reactive-examples v{} with {} people",
        env!("CARGO_PKG_VERSION"),
        config.cast.len()
    );

    let scenarios = Scenarios::new(config)?;
    let lines = match cli.command {
        Commands::Mono => scenarios.mono()?,
        Commands::MonoTransform => scenarios.mono_transform()?,
        Commands::MonoFilter { first_name } => scenarios.mono_filter(&first_name)?,
        Commands::Flux => scenarios.flux()?,
        Commands::FluxFilter { first_name } => scenarios.flux_filter(&first_name)?,
        Commands::FluxDelay => scenarios.flux_delay()?,
        Commands::FluxFilterDelay { contains } => scenarios.flux_filter_delay(&contains)?,
        Commands::All => scenarios.all()?,
    };

    info!("{} line(s) emitted", lines.len());
    Ok(())
}
