//! CLI configuration loading

use std::path::Path;

use tokenforge_core::GeneratorConfig;

use crate::error::CliResult;

/// Load generator settings from a TOML file, or defaults when no path
/// is given. Missing keys fall back to their defaults.
pub fn load(path: Option<&Path>) -> CliResult<GeneratorConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            let config: GeneratorConfig = toml::from_str(&content)?;
            tracing::debug!(path = %path.display(), "loaded configuration");
            Ok(config)
        }
        None => Ok(GeneratorConfig::default()),
    }
}
