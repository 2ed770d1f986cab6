//! Factory presets bundled with wavpress.
//!
//! These are embedded at compile time and always available without any
//! preset files on disk.

use crate::Preset;
use crate::error::ConfigError;

/// Internal identifiers of the factory presets, default first.
pub static FACTORY_PRESET_NAMES: &[&str] = &["upload", "gentle", "broadcast", "passthrough"];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("upload", UPLOAD_PRESET),
    ("gentle", GENTLE_PRESET),
    ("broadcast", BROADCAST_PRESET),
    ("passthrough", PASSTHROUGH_PRESET),
];

/// Upload preset - heavy levelling for voice and mixed uploads.
const UPLOAD_PRESET: &str = r#"
name = "Upload"
description = "Heavy soft-knee levelling, 44.1 kHz 16-bit"

[compression]
enabled = true
threshold_db = -24.0
knee_db = 30.0
ratio = 12.0
attack_ms = 3.0
release_ms = 250.0

[encoding]
sample_rate = 44100
bit_depth = 16
interpolation = "linear"
"#;

/// Gentle preset - light glue compression.
const GENTLE_PRESET: &str = r#"
name = "Gentle"
description = "Light 2:1 compression that keeps transients, 44.1 kHz 16-bit"

[compression]
enabled = true
threshold_db = -18.0
knee_db = 12.0
ratio = 2.0
attack_ms = 10.0
release_ms = 200.0

[encoding]
sample_rate = 44100
bit_depth = 16
interpolation = "cubic"
"#;

/// Broadcast preset - firm levelling at video rate.
const BROADCAST_PRESET: &str = r#"
name = "Broadcast"
description = "Firm 4:1 levelling at 48 kHz 16-bit"

[compression]
enabled = true
threshold_db = -20.0
knee_db = 6.0
ratio = 4.0
attack_ms = 5.0
release_ms = 150.0

[encoding]
sample_rate = 48000
bit_depth = 16
interpolation = "cubic"
"#;

/// Passthrough preset - format conversion only.
const PASSTHROUGH_PRESET: &str = r#"
name = "Passthrough"
description = "No compression, 44.1 kHz 32-bit float"

[compression]
enabled = false

[encoding]
sample_rate = 44100
bit_depth = 32
interpolation = "linear"
"#;

/// Get all factory presets.
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by identifier or display name, ignoring case.
///
/// # Example
///
/// ```rust
/// use wavpress_config::get_factory_preset;
///
/// let preset = get_factory_preset("Broadcast").unwrap();
/// assert_eq!(preset.encoding.sample_rate, 48000);
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(id, toml)| Some((id, Preset::from_toml(toml).ok()?)))
        .find(|(id, preset)| id.eq_ignore_ascii_case(name) || preset.name.eq_ignore_ascii_case(name))
        .map(|(_, preset)| preset)
}

/// Like [`get_factory_preset`], but reports a missing preset as an error.
pub fn require_factory_preset(name: &str) -> Result<Preset, ConfigError> {
    get_factory_preset(name).ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
}

/// Check if a name matches a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}
