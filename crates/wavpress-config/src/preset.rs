//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use wavpress_core::{BitDepth, CompressionConfig, DEFAULT_SAMPLE_RATE, EncodingConfig, Interpolation};

use crate::error::ConfigError;

/// Transcode settings stored as a TOML file.
///
/// A preset pairs compressor settings with an output format. Every field
/// except `name` may be omitted; missing values fall back to the `upload`
/// settings.
///
/// # TOML Format
///
/// ```toml
/// name = "Upload"
/// description = "Loudness-levelled 16-bit WAV for upload"
///
/// [compression]
/// enabled = true
/// threshold_db = -24.0
/// knee_db = 30.0
/// ratio = 12.0
/// attack_ms = 3.0
/// release_ms = 250.0
///
/// [encoding]
/// sample_rate = 44100
/// bit_depth = 16
/// interpolation = "linear"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Compressor settings.
    #[serde(default)]
    pub compression: CompressionSection,

    /// Output format settings.
    #[serde(default)]
    pub encoding: EncodingSection,
}

/// `[compression]` table. Times are in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompressionSection {
    /// Run the compressor at all.
    pub enabled: bool,
    /// Level where gain reduction starts, in dBFS.
    pub threshold_db: f32,
    /// Width of the soft knee in dB.
    pub knee_db: f32,
    /// Input:output ratio above the knee.
    pub ratio: f32,
    /// Attack time in milliseconds.
    pub attack_ms: f32,
    /// Release time in milliseconds.
    pub release_ms: f32,
}

impl Default for CompressionSection {
    fn default() -> Self {
        Self::from(&CompressionConfig::upload())
    }
}

impl From<&CompressionConfig> for CompressionSection {
    fn from(config: &CompressionConfig) -> Self {
        Self {
            enabled: true,
            threshold_db: config.threshold_db(),
            knee_db: config.knee_db(),
            ratio: config.ratio(),
            attack_ms: config.attack_seconds() * 1000.0,
            release_ms: config.release_seconds() * 1000.0,
        }
    }
}

/// `[encoding]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EncodingSection {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Output bits per sample (16 or 32).
    pub bit_depth: u16,
    /// Resampling kernel name (`linear` or `cubic`).
    pub interpolation: String,
}

impl Default for EncodingSection {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            bit_depth: BitDepth::default().bits(),
            interpolation: Interpolation::default().name().to_string(),
        }
    }
}

impl From<&EncodingConfig> for EncodingSection {
    fn from(config: &EncodingConfig) -> Self {
        Self {
            sample_rate: config.sample_rate(),
            bit_depth: config.bit_depth().bits(),
            interpolation: config.interpolation().name().to_string(),
        }
    }
}

impl Preset {
    /// Create a preset with the default sections.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            compression: CompressionSection::default(),
            encoding: EncodingSection::default(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the compressor settings and enable compression.
    pub fn with_compression(mut self, config: &CompressionConfig) -> Self {
        self.compression = CompressionSection::from(config);
        self
    }

    /// Disable compression, keeping the stored parameters.
    pub fn without_compression(mut self) -> Self {
        self.compression.enabled = false;
        self
    }

    /// Replace the output format settings.
    pub fn with_encoding(mut self, config: &EncodingConfig) -> Self {
        self.encoding = EncodingSection::from(config);
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset: Preset = toml::from_str(&content)?;
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validated compressor settings, or `None` when compression is disabled.
    pub fn compression_config(&self) -> Result<Option<CompressionConfig>, ConfigError> {
        let section = &self.compression;
        if !section.enabled {
            return Ok(None);
        }
        CompressionConfig::new(
            section.threshold_db,
            section.knee_db,
            section.ratio,
            section.attack_ms / 1000.0,
            section.release_ms / 1000.0,
        )
        .map(Some)
        .map_err(|e| ConfigError::invalid("compression", e))
    }

    /// Validated output format settings.
    pub fn encoding_config(&self) -> Result<EncodingConfig, ConfigError> {
        let section = &self.encoding;
        let bit_depth = BitDepth::try_from(section.bit_depth)
            .map_err(|e| ConfigError::invalid("encoding.bit_depth", e))?;
        let interpolation = Interpolation::from_name(&section.interpolation).ok_or_else(|| {
            ConfigError::invalid(
                "encoding.interpolation",
                format!("unknown kernel '{}' (expected linear or cubic)", section.interpolation),
            )
        })?;
        let config = EncodingConfig::new(section.sample_rate, bit_depth)
            .map_err(|e| ConfigError::invalid("encoding.sample_rate", e))?;
        Ok(config.with_interpolation(interpolation))
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_new_uses_upload_settings() {
        let preset = Preset::new("Test");
        assert_eq!(preset.name, "Test");
        assert!(preset.description.is_none());
        assert_eq!(
            preset.compression_config().unwrap(),
            Some(CompressionConfig::upload())
        );
        assert_eq!(preset.encoding_config().unwrap(), EncodingConfig::default());
    }

    #[test]
    fn test_millisecond_conversion() {
        let preset = Preset::from_toml(
            r#"
            name = "Fast"
            [compression]
            attack_ms = 1.0
            release_ms = 50.0
            "#,
        )
        .unwrap();
        let config = preset.compression_config().unwrap().unwrap();
        assert!((config.attack_seconds() - 0.001).abs() < 1e-7);
        assert!((config.release_seconds() - 0.05).abs() < 1e-7);
        assert_eq!(config.ratio(), 12.0);
    }

    #[test]
    fn test_minimal_toml_fills_defaults() {
        let preset = Preset::from_toml(r#"name = "Bare""#).unwrap();
        assert_eq!(preset.compression, CompressionSection::default());
        assert_eq!(preset.encoding, EncodingSection::default());
    }

    #[test]
    fn test_disabled_compression() {
        let preset = Preset::new("Off").without_compression();
        assert_eq!(preset.compression_config().unwrap(), None);
    }

    #[test]
    fn test_disabled_section_skips_validation() {
        let mut preset = Preset::new("Off");
        preset.compression.ratio = 0.5;
        preset.compression.enabled = false;
        assert!(preset.compression_config().unwrap().is_none());
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        let mut preset = Preset::new("Bad");
        preset.compression.ratio = 0.5;
        assert!(matches!(
            preset.compression_config(),
            Err(ConfigError::InvalidValue { field: "compression", .. })
        ));
    }

    #[test]
    fn test_invalid_bit_depth_rejected() {
        let mut preset = Preset::new("Bad");
        preset.encoding.bit_depth = 24;
        assert!(matches!(
            preset.encoding_config(),
            Err(ConfigError::InvalidValue { field: "encoding.bit_depth", .. })
        ));
    }

    #[test]
    fn test_invalid_interpolation_rejected() {
        let mut preset = Preset::new("Bad");
        preset.encoding.interpolation = "sinc".to_string();
        let err = preset.encoding_config().unwrap_err();
        assert!(err.to_string().contains("sinc"), "got: {err}");
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let mut preset = Preset::new("Bad");
        preset.encoding.sample_rate = 0;
        assert!(matches!(
            preset.encoding_config(),
            Err(ConfigError::InvalidValue { field: "encoding.sample_rate", .. })
        ));
    }

    #[test]
    fn test_toml_roundtrip() {
        let encoding = EncodingConfig::new(48000, BitDepth::Float32)
            .unwrap()
            .with_interpolation(Interpolation::Cubic);
        let original = Preset::new("Roundtrip")
            .with_description("float output")
            .with_encoding(&encoding)
            .without_compression();

        let toml = original.to_toml().unwrap();
        let parsed = Preset::from_toml(&toml).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(parsed.encoding_config().unwrap(), encoding);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Preset::from_toml("name = "),
            Err(ConfigError::TomlParse(_))
        ));
    }
}
