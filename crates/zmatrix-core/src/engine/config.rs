use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Numeric settings shared by every Z-matrix engine component.
///
/// All fields have defaults, so a configuration table may set any subset of
/// them. Deserialized values are not checked; pass them through
/// [`EngineConfigBuilder::from_config`] or [`EngineConfig::validate`].
///
/// ```toml
/// linearity-tolerance = 1e-7
/// min-reference-angle = 1.0
/// delta-threshold = 1e-7
/// dummy-connectivity = 100
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EngineConfig {
    /// Tolerance used to detect collinear reference atoms and to floor
    /// denominators during reconstruction.
    pub linearity_tolerance: f64,
    /// Minimum candidate-I-J angle (degrees) for a second-angle reference.
    pub min_reference_angle: f64,
    /// Displacements smaller than this leave an internal coordinate untouched.
    pub delta_threshold: f64,
    /// Connectivity assigned to a dummy atom with a single bond when ranking
    /// reference candidates, so such dummies are chosen last.
    pub dummy_connectivity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            linearity_tolerance: 1e-7,
            min_reference_angle: 1.0,
            delta_threshold: 1e-7,
            dummy_connectivity: 100,
        }
    }
}

impl EngineConfig {
    /// Checks that every tolerance is finite and within range.
    pub fn validate(self) -> Result<Self, ConfigError> {
        check_tolerance("linearity_tolerance", self.linearity_tolerance)?;
        check_tolerance("delta_threshold", self.delta_threshold)?;
        if !self.min_reference_angle.is_finite()
            || !(0.0..180.0).contains(&self.min_reference_angle)
        {
            return Err(ConfigError::InvalidParameter {
                name: "min_reference_angle",
                reason: format!("{} is not in [0, 180)", self.min_reference_angle),
            });
        }
        Ok(self)
    }
}

fn check_tolerance(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: format!("{} must be a finite, non-negative number", value),
        });
    }
    if value >= 1.0 {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: format!("{} must be smaller than 1", value),
        });
    }
    Ok(())
}

#[derive(Default)]
pub struct EngineConfigBuilder {
    linearity_tolerance: Option<f64>,
    min_reference_angle: Option<f64>,
    delta_threshold: Option<f64>,
    dummy_connectivity: Option<usize>,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration instead of the defaults.
    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            linearity_tolerance: Some(config.linearity_tolerance),
            min_reference_angle: Some(config.min_reference_angle),
            delta_threshold: Some(config.delta_threshold),
            dummy_connectivity: Some(config.dummy_connectivity),
        }
    }

    pub fn linearity_tolerance(mut self, tolerance: f64) -> Self {
        self.linearity_tolerance = Some(tolerance);
        self
    }
    pub fn min_reference_angle(mut self, degrees: f64) -> Self {
        self.min_reference_angle = Some(degrees);
        self
    }
    pub fn delta_threshold(mut self, threshold: f64) -> Self {
        self.delta_threshold = Some(threshold);
        self
    }
    pub fn dummy_connectivity(mut self, connectivity: usize) -> Self {
        self.dummy_connectivity = Some(connectivity);
        self
    }

    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let defaults = EngineConfig::default();
        EngineConfig {
            linearity_tolerance: self
                .linearity_tolerance
                .unwrap_or(defaults.linearity_tolerance),
            min_reference_angle: self
                .min_reference_angle
                .unwrap_or(defaults.min_reference_angle),
            delta_threshold: self.delta_threshold.unwrap_or(defaults.delta_threshold),
            dummy_connectivity: self
                .dummy_connectivity
                .unwrap_or(defaults.dummy_connectivity),
        }
        .validate()
    }
}
