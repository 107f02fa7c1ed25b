//! Command-line driver for the CodeIgniter bundler hooks.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};

use codeigniter_vite::config::{discover_options, load_options_file};
use codeigniter_vite::{CodeIgniterPlugin, HookMode, ImageCrateResizer};

#[derive(Debug, Parser)]
#[command(name = "codeigniter-vite", version, about = "Bundler hooks for CodeIgniter projects")]
struct Cli {
    /// Options file; defaults to `codeigniter.config.json` in the working directory.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Project directory every option path is resolved against.
    #[arg(long, global = true, value_name = "DIR")]
    cwd: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, global = true, value_name = "FILTER", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the resolved options.
    Options(PrintArgs),
    /// Print the bundler build description.
    Config(PrintArgs),
    /// Empty the assets directory and copy static files into it.
    Prepare,
    /// Generate image variants from the bundled assets.
    Variants,
}

#[derive(Debug, Args)]
struct PrintArgs {
    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = match cli.cwd {
        Some(dir) => std::path::absolute(&dir)
            .with_context(|| format!("failed to resolve {}", dir.display()))?,
        None => std::env::current_dir().context("failed to read the working directory")?,
    };
    let plugin = load_plugin(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Command::Options(args) => print_json(plugin.options(), args.pretty),
        Command::Config(args) => print_json(&plugin.config()?, args.pretty),
        Command::Prepare => {
            let copied = plugin.prepare(HookMode::Build)?;
            info!(copied, "assets directory prepared");
            Ok(())
        }
        Command::Variants => {
            let written = plugin
                .close_bundle(HookMode::Build, &ImageCrateResizer::default())?
                .into_result()
                .context("image variant generation failed")?;
            info!(count = written.len(), "image variants ready");
            Ok(())
        }
    }
}

fn load_plugin(config: Option<&Path>, cwd: &Path) -> Result<CodeIgniterPlugin> {
    let input = match config {
        Some(path) => load_options_file(&cwd.join(path))?,
        None => discover_options(cwd)?,
    };
    Ok(CodeIgniterPlugin::new(&input, cwd)?)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .ok();
}
