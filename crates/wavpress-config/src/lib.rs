//! Preset management for the wavpress transcoder.
//!
//! A preset is a TOML file holding compressor settings and an output
//! format. Presets convert into the validated `wavpress-core` config types
//! the pipeline consumes.
//!
//! # Features
//!
//! - **Preset Files**: Load and save presets as TOML
//! - **Factory Presets**: Built-in `upload`, `gentle`, `broadcast`, and
//!   `passthrough` settings
//! - **Validation**: Conversion reports which field holds a bad value
//!
//! # Example
//!
//! ```rust,no_run
//! use wavpress_config::{Preset, get_factory_preset};
//!
//! let mut preset = get_factory_preset("upload").unwrap();
//! preset.encoding.sample_rate = 48000;
//! preset.save("presets/upload-48k.toml").unwrap();
//!
//! let loaded = Preset::load("presets/upload-48k.toml").unwrap();
//! let encoding = loaded.encoding_config().unwrap();
//! assert_eq!(encoding.sample_rate(), 48000);
//! ```

mod error;
mod preset;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_presets, get_factory_preset, is_factory_preset,
    require_factory_preset,
};
pub use preset::{CompressionSection, EncodingSection, Preset};
