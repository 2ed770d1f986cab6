//! Display audio stream metadata.

use anyhow::Context;
use clap::Args;
use wavpress_io::probe;

/// Display stream information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the audio file
    pub file: std::path::PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let info = probe(&bytes)?;

    println!("File:        {}", args.file.display());
    match info.bits_per_sample {
        Some(bits) => println!("Codec:       {} ({bits}-bit)", info.codec),
        None => println!("Codec:       {}", info.codec),
    }
    println!("Channels:    {}", info.channels);
    println!("Sample Rate: {} Hz", info.sample_rate);
    match (info.duration_secs(), info.num_frames) {
        (Some(secs), Some(frames)) => println!("Duration:    {secs:.3}s ({frames} frames)"),
        _ => println!("Duration:    unknown"),
    }
    println!("File Size:   {}", format_bytes(bytes.len() as u64));

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
