use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use post_variant_translator::{run_variants, DeepLXBackend, TranslationService, VariantsConfig};

/// Generate translated variants of blog posts
#[derive(Parser, Debug)]
#[command(name = "translate-post-variants", version, about)]
struct Args {
    /// Path to the TOML configuration (defaults to ./translate-variants.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write an example configuration to PATH and exit
    #[arg(long, value_name = "PATH", conflicts_with = "config")]
    init: Option<PathBuf>,

    /// Log every translation request
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    if let Some(path) = args.init {
        VariantsConfig::generate_example_config(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Wrote example configuration to {}", path.display());
        return Ok(());
    }

    let config = VariantsConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    let backend = DeepLXBackend::new(&config.translation).context("failed to build HTTP client")?;
    let mut service = TranslationService::new(backend, config.translation.clone(), config.retry.clone());

    run_variants(&mut service, &config.resolved_jobs()).await?;
    Ok(())
}
