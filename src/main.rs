//! csdoc: generate Markdown documentation from C# XML documentation comments.
//!
//! Every enabled input folder is scanned for `*.cs` files. Documented types
//! and members are collected into one project, reclassified by the enabled
//! plugins and written as one Markdown page per type:
//!
//! `csdoc -o docs Assets/Scripts Packages/Core`

mod config;
mod diagnostics;
mod error;
mod markup;
mod model;
mod parser;
mod plugin;
mod render;

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::{Config, InputFolder, DEFAULT_CONFIG_FILE};
use diagnostics::{Diagnostics, Severity};
use model::DocumentationProject;
use plugin::Pipeline;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "csdoc",
    version,
    about = "Generate Markdown documentation from C# XML documentation comments"
)]
struct Cli {
    /// Input folders, scanned recursively for .cs files. Replaces the
    /// folders from the config file.
    inputs: Vec<PathBuf>,

    /// Output folder
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Config file (default: ./csdoc.toml if present)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Do not write the `# Full.Name` title
    #[arg(long)]
    no_title: bool,

    /// Generate a table of contents on each page
    #[arg(long)]
    toc: bool,

    /// Do not list attributes above item documentation
    #[arg(long)]
    no_attributes: bool,

    /// Render nested types inside their parent's page
    #[arg(long)]
    inline_classes: bool,

    /// Disable a plugin by name. Can be specified multiple times.
    #[arg(long, value_name = "NAME")]
    disable_plugin: Vec<String>,

    /// Print the available plugins and their settings, then exit
    #[arg(long)]
    list_plugins: bool,

    /// Print the effective configuration as TOML, then exit
    #[arg(long)]
    dump_config: bool,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);

    let mut diags = Diagnostics::new();
    config.align_kinds(&mut diags);
    let mut pipeline = Pipeline::load(&plugin::registry(), &config.plugins, &mut diags);

    if cli.list_plugins {
        let mut out = String::new();
        pipeline.describe(&mut out)?;
        print!("{}", out);
        return Ok(());
    }

    if cli.dump_config {
        pipeline.sync_settings(&mut config.plugins, &mut diags);
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    config.validate()?;
    generate(&config, &mut pipeline, &mut diags)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Explicit `--config`, else `csdoc.toml` in the working directory, else defaults.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            Ok(Config::load(Path::new(DEFAULT_CONFIG_FILE))?)
        }
        None => Ok(Config::default()),
    }
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if !cli.inputs.is_empty() {
        config.input_folders = cli.inputs.iter().map(InputFolder::new).collect();
    }
    if let Some(output) = &cli.output {
        config.output_folder = Some(output.clone());
    }
    if cli.no_title {
        config.write_title = false;
    }
    if cli.toc {
        config.generate_toc = true;
    }
    if cli.no_attributes {
        config.write_attributes = false;
    }
    if cli.inline_classes {
        config.inline_classes = true;
    }
    for name in &cli.disable_plugin {
        config.set_plugin_enabled(name, false);
    }
}

/// Parse, run plugins, render. Only write failures make the run fail.
fn generate(config: &Config, pipeline: &mut Pipeline, diags: &mut Diagnostics) -> Result<()> {
    let mut project = DocumentationProject::new();
    for folder in config.enabled_inputs() {
        if !folder.is_dir() {
            diags.error(format!("input folder not found: {}", folder.display()));
            continue;
        }
        parser::parse_folder(&mut project, folder, diags)
            .with_context(|| format!("failed to scan {}", folder.display()))?;
    }

    info!("running plugins: {}", pipeline.active().join(", "));
    pipeline.run(&mut project, diags);

    let output = config
        .output_folder
        .as_deref()
        .context("no output folder")?;
    let report = render::write_project(&project, &config.render_options(), output, diags);

    info!(
        "{} pages, {} warnings, {} errors",
        report.pages_written,
        diags.count(Severity::Warning),
        diags.count(Severity::Error)
    );
    if report.write_errors > 0 {
        bail!("{} page(s) could not be written", report.write_errors);
    }
    Ok(())
}
