//! File transcode command.

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use wavpress_config::{ConfigError, Preset, get_factory_preset};
use wavpress_core::linear_to_db;
use wavpress_io::{Stage, TranscodeReport, Transcoder};

#[derive(Args)]
pub struct TranscodeArgs {
    /// Input audio file (WAV, FLAC, MP3, Ogg Vorbis, AAC/ALAC in MP4)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Factory preset name or preset file (TOML)
    #[arg(short, long, default_value = "upload")]
    preset: String,

    /// Output sample rate in Hz
    #[arg(short = 'r', long)]
    sample_rate: Option<u32>,

    /// Output bit depth (16 or 32)
    #[arg(short, long)]
    bit_depth: Option<u16>,

    /// Resampling kernel (linear or cubic)
    #[arg(long)]
    interpolation: Option<String>,

    /// Compressor threshold in dBFS
    #[arg(long, allow_negative_numbers = true)]
    threshold: Option<f32>,

    /// Soft-knee width in dB
    #[arg(long)]
    knee: Option<f32>,

    /// Compression ratio
    #[arg(long)]
    ratio: Option<f32>,

    /// Attack time in milliseconds
    #[arg(long, value_name = "MS")]
    attack: Option<f32>,

    /// Release time in milliseconds
    #[arg(long, value_name = "MS")]
    release: Option<f32>,

    /// Skip the compressor
    #[arg(long)]
    no_compress: bool,
}

pub fn run(args: TranscodeArgs) -> anyhow::Result<()> {
    let preset = resolve_preset(&args)?;
    let encoding = preset.encoding_config()?;
    let compression = preset.compression_config()?;

    let mut transcoder = Transcoder::new(encoding);
    if let Some(config) = compression {
        transcoder = transcoder.with_compression(config);
    }

    println!("Reading {}...", args.input.display());
    let input = std::fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    tracing::info!(preset = %preset.name, ?encoding, ?compression, "transcode");

    let stages = if compression.is_some() { 4 } else { 3 };
    let pb = ProgressBar::new(stages);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:24.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    let result = transcoder.run_with_progress(&input, |stage: Stage| {
        if stage != Stage::Decode {
            pb.inc(1);
        }
        pb.set_message(stage.to_string());
    });
    let out = match result {
        Ok(out) => {
            pb.inc(1);
            pb.finish_with_message("done");
            out
        }
        Err(e) => {
            pb.abandon_with_message("failed");
            return Err(e).with_context(|| format!("failed to transcode {}", args.input.display()));
        }
    };

    print_summary(&out.report, encoding.bit_depth().bits());

    println!("\nWriting {}...", args.output.display());
    std::fs::write(&args.output, &out.bytes)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Done!");

    Ok(())
}

/// Load the named preset and apply command-line overrides on top of it.
fn resolve_preset(args: &TranscodeArgs) -> anyhow::Result<Preset> {
    let mut preset = load_preset(&args.preset)?;

    let encoding = &mut preset.encoding;
    if let Some(rate) = args.sample_rate {
        encoding.sample_rate = rate;
    }
    if let Some(bits) = args.bit_depth {
        encoding.bit_depth = bits;
    }
    if let Some(kernel) = &args.interpolation {
        encoding.interpolation.clone_from(kernel);
    }

    let compression = &mut preset.compression;
    if let Some(threshold) = args.threshold {
        compression.threshold_db = threshold;
    }
    if let Some(knee) = args.knee {
        compression.knee_db = knee;
    }
    if let Some(ratio) = args.ratio {
        compression.ratio = ratio;
    }
    if let Some(attack) = args.attack {
        compression.attack_ms = attack;
    }
    if let Some(release) = args.release {
        compression.release_ms = release;
    }
    if args.no_compress {
        compression.enabled = false;
    }

    Ok(preset)
}

fn load_preset(name_or_path: &str) -> Result<Preset, ConfigError> {
    if let Some(preset) = get_factory_preset(name_or_path) {
        return Ok(preset);
    }
    let path = Path::new(name_or_path);
    if path.is_file() {
        return Preset::load(path);
    }
    Err(ConfigError::UnknownPreset(name_or_path.to_string()))
}

fn print_summary(report: &TranscodeReport, bits: u16) {
    println!("\nSummary:");
    println!(
        "  Input:  {} Hz, {} ch, {} frames, peak {:.1} dBFS",
        report.input_sample_rate,
        report.channels,
        report.input_frames,
        linear_to_db(report.input_peak)
    );
    println!(
        "  Output: {} Hz, {}-bit, {} frames, peak {:.1} dBFS{}",
        report.output_sample_rate,
        bits,
        report.output_frames,
        linear_to_db(report.output_peak),
        if report.compressed { "" } else { " (uncompressed)" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: TranscodeArgs,
    }

    fn parse(argv: &[&str]) -> TranscodeArgs {
        let mut full = vec!["wavpress", "in.mp3", "out.wav"];
        full.extend_from_slice(argv);
        Harness::parse_from(full).args
    }

    #[test]
    fn test_defaults_to_upload() {
        let preset = resolve_preset(&parse(&[])).unwrap();
        assert_eq!(preset, get_factory_preset("upload").unwrap());
    }

    #[test]
    fn test_flags_override_preset() {
        let args = parse(&[
            "--preset",
            "broadcast",
            "--sample-rate",
            "22050",
            "--threshold",
            "-30",
            "--ratio",
            "8",
            "--interpolation",
            "linear",
        ]);
        let preset = resolve_preset(&args).unwrap();
        assert_eq!(preset.encoding.sample_rate, 22050);
        assert_eq!(preset.encoding.interpolation, "linear");
        assert_eq!(preset.compression.threshold_db, -30.0);
        assert_eq!(preset.compression.ratio, 8.0);
        // untouched fields keep the preset's values
        assert_eq!(preset.compression.knee_db, 6.0);
    }

    #[test]
    fn test_no_compress() {
        let preset = resolve_preset(&parse(&["--no-compress"])).unwrap();
        assert!(preset.compression_config().unwrap().is_none());
    }

    #[test]
    fn test_unknown_preset() {
        let err = resolve_preset(&parse(&["--preset", "no-such-preset"])).unwrap_err();
        assert!(err.to_string().contains("unknown preset"), "got: {err}");
    }
}
