//! Bake configuration.
//!
//! Everything has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! displacement = 0.001
//!
//! [clip]
//! max_output_triangles = 500
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Geometric tolerance used for every equality-like test.
pub const DEFAULT_ERROR_TOLERANCE: f32 = 0.005;
/// Cap on triangles emitted by one bake.
pub const DEFAULT_MAX_OUTPUT_TRIANGLES: usize = 100;
/// Cap on source triangles gathered for one bake.
pub const DEFAULT_MAX_SOURCE_TRIANGLES: usize = 1000;
/// Number of distinct model layers; a layer mask has one bit per layer.
pub const LAYER_COUNT: u32 = 32;
/// Largest output cap whose vertices can still be indexed with `u32`.
pub const MAX_OUTPUT_TRIANGLES_LIMIT: usize = (u32::MAX / 3) as usize;
/// Offset of the output surface along its normal, to avoid z-fighting.
pub const DEFAULT_DISPLACEMENT: f32 = 0.0001;

/// Settings consumed by the clipping engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipConfig {
    pub error_tolerance: f32,
    pub max_output_triangles: usize,
    /// Clip source triangles on the rayon pool. Output is identical to a
    /// sequential bake.
    pub parallel: bool,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            error_tolerance: DEFAULT_ERROR_TOLERANCE,
            max_output_triangles: DEFAULT_MAX_OUTPUT_TRIANGLES,
            parallel: false,
        }
    }
}

impl ClipConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.error_tolerance.is_finite() || self.error_tolerance <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "error_tolerance must be a positive number, got {}",
                self.error_tolerance
            )));
        }
        if self.max_output_triangles == 0 {
            return Err(ConfigError::Invalid(
                "max_output_triangles must be greater than zero".to_string(),
            ));
        }
        if self.max_output_triangles > MAX_OUTPUT_TRIANGLES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_output_triangles must be at most {}, got {}",
                MAX_OUTPUT_TRIANGLES_LIMIT, self.max_output_triangles
            )));
        }
        Ok(())
    }
}

/// Space the output mesh vertices are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSpace {
    /// Relative to the projector, for meshes parented to it.
    #[default]
    ProjectorLocal,
    World,
}

/// Full projector configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecalConfig {
    pub clip: ClipConfig,
    pub displacement: f32,
    /// Bit `n` set means models on layer `n` receive the decal.
    pub layer_mask: u32,
    pub max_source_triangles: usize,
    pub output_space: OutputSpace,
}

impl Default for DecalConfig {
    fn default() -> Self {
        Self {
            clip: ClipConfig::default(),
            displacement: DEFAULT_DISPLACEMENT,
            layer_mask: u32::MAX,
            max_source_triangles: DEFAULT_MAX_SOURCE_TRIANGLES,
            output_space: OutputSpace::default(),
        }
    }
}

impl DecalConfig {
    /// Load configuration from a `.toml` file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.extension().and_then(|e| e.to_str()) != Some("toml") {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.clip.validate()?;
        if !self.displacement.is_finite() {
            return Err(ConfigError::Invalid("displacement must be finite".to_string()));
        }
        Ok(())
    }

    /// True if a model on `layer` is affected by this projector.
    pub fn accepts_layer(&self, layer: u32) -> bool {
        layer < LAYER_COUNT && self.layer_mask & (1 << layer) != 0
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Invalid value: {0}")]
    Invalid(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = DecalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.clip.max_output_triangles, 100);
        assert_eq!(config.clip.error_tolerance, 0.005);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = DecalConfig::from_toml_str(
            r#"
            displacement = 0.01
            output_space = "world"

            [clip]
            max_output_triangles = 12
            "#,
        )
        .unwrap();
        assert_eq!(config.displacement, 0.01);
        assert_eq!(config.output_space, OutputSpace::World);
        assert_eq!(config.clip.max_output_triangles, 12);
        assert_eq!(config.clip.error_tolerance, DEFAULT_ERROR_TOLERANCE);
        assert_eq!(config.layer_mask, u32::MAX);
    }

    #[test]
    fn rejects_non_positive_tolerance() {
        let err = DecalConfig::from_toml_str("[clip]\nerror_tolerance = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_cap() {
        let clip = ClipConfig {
            max_output_triangles: 0,
            ..ClipConfig::default()
        };
        assert!(clip.validate().is_err());
    }

    #[test]
    fn cap_must_fit_u32_vertex_indices() {
        let mut clip = ClipConfig {
            max_output_triangles: MAX_OUTPUT_TRIANGLES_LIMIT,
            ..ClipConfig::default()
        };
        assert!(clip.validate().is_ok());
        assert!(MAX_OUTPUT_TRIANGLES_LIMIT * 3 <= u32::MAX as usize);

        clip.max_output_triangles += 1;
        assert!(matches!(clip.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = DecalConfig::from_toml_str("displacement = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = DecalConfig::load_from_file("decal.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = DecalConfig::default();
        config.layer_mask = 0b101;
        config.clip.parallel = true;
        let text = config.to_toml_string().unwrap();
        assert_eq!(DecalConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn layer_mask_filtering() {
        let config = DecalConfig {
            layer_mask: 0b101,
            ..DecalConfig::default()
        };
        assert!(config.accepts_layer(0));
        assert!(!config.accepts_layer(1));
        assert!(config.accepts_layer(2));
        assert!(!config.accepts_layer(40));
        assert!(!DecalConfig::default().accepts_layer(LAYER_COUNT));
    }
}
