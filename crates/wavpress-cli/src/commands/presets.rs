//! Factory preset listing.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use wavpress_config::{FACTORY_PRESET_NAMES, Preset, get_factory_preset, require_factory_preset};

#[derive(Args)]
pub struct PresetsArgs {
    /// Preset to print as TOML (lists all presets when omitted)
    name: Option<String>,

    /// Write the preset to this file instead of printing it
    #[arg(short, long, requires = "name")]
    save: Option<PathBuf>,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    let Some(name) = args.name else {
        list();
        return Ok(());
    };

    let preset = require_factory_preset(&name)?;
    match args.save {
        Some(path) => {
            preset
                .save(&path)
                .with_context(|| format!("failed to save preset '{name}'"))?;
            println!("Saved {} to {}", preset.name, path.display());
        }
        None => print!("{}", preset.to_toml()?),
    }
    Ok(())
}

fn list() {
    println!("Factory presets:\n");
    for id in FACTORY_PRESET_NAMES {
        if let Some(preset) = get_factory_preset(id) {
            println!("  {id:<12} {}", summary(&preset));
        }
    }
    println!("\nUse `wavpress presets <NAME>` to print one as TOML.");
}

fn summary(preset: &Preset) -> String {
    let encoding = &preset.encoding;
    let format = format!(
        "{} Hz {}-bit {}",
        encoding.sample_rate, encoding.bit_depth, encoding.interpolation
    );
    let compression = &preset.compression;
    if compression.enabled {
        format!(
            "{format}, {:.0}:1 @ {:.0} dB (knee {:.0} dB, {:.0}/{:.0} ms)",
            compression.ratio,
            compression.threshold_db,
            compression.knee_db,
            compression.attack_ms,
            compression.release_ms
        )
    } else {
        format!("{format}, no compression")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let upload = get_factory_preset("upload").unwrap();
        assert_eq!(
            summary(&upload),
            "44100 Hz 16-bit linear, 12:1 @ -24 dB (knee 30 dB, 3/250 ms)"
        );
        let passthrough = get_factory_preset("passthrough").unwrap();
        assert!(summary(&passthrough).ends_with("no compression"));
    }
}
