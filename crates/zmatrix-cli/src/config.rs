use crate::cli::EngineArgs;
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;
use zmatrix::engine::config::{EngineConfig, EngineConfigBuilder};

/// Settings read from the optional `--config` file.
///
/// The `[engine]` table deserializes straight into [`EngineConfig`], so any
/// subset of its keys may be given:
///
/// ```toml
/// [engine]
/// linearity-tolerance = 1e-7
/// min-reference-angle = 1.0
/// ```
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    engine: Option<EngineConfig>,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the file when one is given, or starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Layers command-line overrides over the file values and the defaults.
    pub fn merge_with_cli(self, args: &EngineArgs) -> Result<EngineConfig> {
        let mut builder = EngineConfigBuilder::from_config(self.engine.unwrap_or_default());

        if let Some(v) = args.linearity_tolerance {
            builder = builder.linearity_tolerance(v);
        }
        if let Some(v) = args.min_reference_angle {
            builder = builder.min_reference_angle(v);
        }
        if let Some(v) = args.delta_threshold {
            builder = builder.delta_threshold(v);
        }

        let config = builder.build()?;
        debug!("Final engine configuration: {:?}", config);
        Ok(config)
    }
}
