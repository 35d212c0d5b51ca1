use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use declgen::{CONFIG_FILE, Config, RunOptions, RunOutcome, run};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Regenerate TypeScript declarations from a JSON Schema
#[derive(Parser)]
#[command(name = "declgen", version, about)]
struct Cli {
    /// Config file
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Regenerate even if the schema is unchanged
    #[arg(long)]
    force: bool,

    /// Schema URL or path, overriding [source] url
    #[arg(long)]
    source: Option<String>,

    /// Output file, overriding [output] path
    #[arg(long)]
    output: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_log(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .try_init()
        .context("error initializing logging")?;

    Ok(())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_log(cli.verbose)?;

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    // Command-line paths are relative to the working directory, not the config.
    if let Some(source) = cli.source {
        let source = if source.contains("://") {
            source
        } else {
            std::path::absolute(&source)
                .with_context(|| format!("resolving {}", source))?
                .to_string_lossy()
                .into_owned()
        };
        config.source.url = Some(source);
    }
    if let Some(output) = cli.output {
        config.output.path = std::path::absolute(&output)
            .with_context(|| format!("resolving {}", output.display()))?;
    }

    let options = RunOptions {
        check_fingerprint: !cli.force,
    };

    match run(&config, &options).context("regeneration failed")? {
        RunOutcome::Unchanged { fingerprint } => {
            tracing::info!(%fingerprint, "nothing to do");
        }
        RunOutcome::Generated { path, fingerprint } => {
            tracing::info!(path = %path.display(), %fingerprint, "generated");
        }
    }

    Ok(ExitCode::SUCCESS)
}
