//! mdsite CLI: builds a static site from a directory of markdown pages.

use anyhow::{Context, Result};
use clap::Parser;
use mdsite::build::build_site;
use mdsite::config::{Config, Overrides};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "mdsite")]
#[command(about = "Build a static site from a directory of markdown pages")]
#[command(version)]
struct Cli {
    /// Project root; defaults below and `mdsite.yaml` are relative to it
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Markdown page directory [default: <root>/pages]
    #[arg(long)]
    pages: Option<PathBuf>,

    /// Static asset directory, copied to <output>/assets [default: <root>/assets]
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Layout template [default: <root>/templates/layout.html]
    #[arg(long)]
    template: Option<PathBuf>,

    /// Output directory, deleted and recreated on every build [default: <root>/dist]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Site title [default: My Site]
    #[arg(long, env = "SITE_TITLE")]
    site_title: Option<String>,

    /// Base path prefix, e.g. "/my-repo/" [default: /]
    #[arg(long, env = "BASE_PATH")]
    base_path: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    fmt().with_env_filter(filter).with_target(false).init();

    let config = Config::from_directory(
        &cli.root,
        Overrides {
            site_title: cli.site_title,
            base_path: cli.base_path,
            pages: cli.pages,
            assets: cli.assets,
            template: cli.template,
            output: cli.output,
        },
    )?;

    let summary = build_site(&config)
        .with_context(|| format!("Building site into '{}'", config.output_directory.display()))?;

    info!(
        pages = summary.pages,
        "Built → {}/",
        config.output_directory.display()
    );
    Ok(())
}
