//! Chat Widget CLI
//!
//! Config tooling for the chat widget:
//! - Generate a documented default config
//! - Validate a config
//! - Export the widget section as `widget-config.json` for static hosting

use anyhow::Context;
use chatwidget::config::{generate_default_config, Config};
use chatwidget::Severity;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "chatwidget-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Config tooling for the embeddable chat widget")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate default config file
    Init {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a config file
    Check {
        /// Path to the TOML config
        path: PathBuf,
    },

    /// Write the widget section as widget-config.json
    Export {
        /// Path to the TOML config
        path: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { output } => {
            let config = generate_default_config();
            write_output(output.as_deref(), &config)?;
        }

        Commands::Check { path } => {
            let config = load(&path)?;
            let issues = config.validate();

            if issues.is_empty() {
                println!("{}: ok", path.display());
                return Ok(());
            }

            for issue in &issues {
                println!("{}", issue);
            }

            let errors = issues
                .iter()
                .filter(|issue| issue.severity == Severity::Error)
                .count();
            println!(
                "{}: {} error(s), {} warning(s)",
                path.display(),
                errors,
                issues.len() - errors
            );
            if errors > 0 {
                std::process::exit(1);
            }
        }

        Commands::Export { path, output } => {
            let config = load(&path)?;
            for issue in config.validate().iter().filter(|i| i.is_error()) {
                eprintln!("{}", issue);
            }

            let json = serde_json::to_string_pretty(&config.widget)?;
            write_output(output.as_deref(), &format!("{}\n", json))?;
        }
    }

    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Config> {
    Config::load(path).with_context(|| format!("cannot use {}", path.display()))
}

fn write_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            // Create parent directory if needed
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
            println!("Written to {:?}", path);
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
