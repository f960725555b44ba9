//! TokenForge CLI - generate token contracts from a TokenSpec document
//!
//! - `generate`: validate a spec and emit contract source (or JSON)
//! - `validate`: report every validation error as JSON
//! - `catalog`: print the feature catalog with parameter schemas

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tokenforge_core::{
    plan, validate, FeatureCatalog, ForgeError, TokenForge, TokenSpec, ValidationError,
};

mod config;
mod error;

use error::{CliError, CliResult};

/// TokenForge CLI application
#[derive(Parser)]
#[command(name = "tokenforge")]
#[command(about = "TokenForge - feature-composable token contract generator", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, env = "TOKENFORGE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Generate contract source from a spec file (`-` reads stdin)
    Generate {
        spec: PathBuf,

        /// Write output here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "source")]
        format: OutputFormat,
    },

    /// Validate a spec file and check it composes, without generating
    Validate { spec: PathBuf },

    /// Print the feature catalog as JSON
    Catalog,
}

/// Output format for `generate`
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Contract source text
    Source,
    /// Full artifact as JSON
    Json,
}

#[derive(Serialize)]
struct ValidationReport<'a> {
    valid: bool,
    errors: &'a [ValidationError],
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate { spec, out, format } => {
            let spec = read_spec(&spec)?;
            let mut forge = TokenForge::with_config(FeatureCatalog::standard(), config);
            let artifact = match forge.generate(&spec) {
                Ok(artifact) => artifact,
                Err(e) => {
                    if let Some(errors) = e.validation_errors() {
                        for err in errors {
                            eprintln!("  {}", err);
                        }
                        return Err(CliError::Rejected(errors.len()));
                    }
                    return Err(e.into());
                }
            };
            let rendered = match format {
                OutputFormat::Source => artifact.source_text,
                OutputFormat::Json => serde_json::to_string_pretty(&artifact)?,
            };
            match out {
                Some(path) => {
                    std::fs::write(&path, rendered)?;
                    tracing::info!(path = %path.display(), "wrote output");
                }
                None => print!("{}", rendered),
            }
            Ok(())
        }
        Commands::Validate { spec } => {
            let spec = read_spec(&spec)?;
            let catalog = FeatureCatalog::standard();
            let errors = validate(&catalog, &spec).err().unwrap_or_default();
            if errors.is_empty() {
                // Catalog mismatches are composition defects, not field errors.
                plan(&catalog, &spec).map_err(ForgeError::from)?;
            }
            let report = ValidationReport {
                valid: errors.is_empty(),
                errors: &errors,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            if errors.is_empty() {
                Ok(())
            } else {
                Err(CliError::Rejected(errors.len()))
            }
        }
        Commands::Catalog => {
            println!("{}", serde_json::to_string_pretty(&FeatureCatalog::standard())?);
            Ok(())
        }
    }
}

/// Parse a spec document; `.yaml`/`.yml` files are YAML, everything else JSON.
fn read_spec(path: &Path) -> CliResult<TokenSpec> {
    let (content, yaml) = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        let yaml = !buf.trim_start().starts_with('{');
        (buf, yaml)
    } else {
        let yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        (std::fs::read_to_string(path)?, yaml)
    };

    let spec = if yaml {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    Ok(spec)
}
