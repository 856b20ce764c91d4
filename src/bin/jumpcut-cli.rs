use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use jumpcut::extract::extract;
use jumpcut::{
    BackendRegistry, Config, DetectionMethod, JumpcutParams, ProcessRunner, WhisperModel, progress,
};

/// Host-less front end for the detection pipeline: runs a backend directly on
/// a media file and prints the cut list, without any editor attached. Useful
/// for validating backend installs and parameter choices before wiring a
/// panel up.
#[derive(Parser, Debug)]
#[command(name = "jumpcut-cli")]
#[command(about = "Run silence detection backends and inspect their cut lists")]
struct Params {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a detection backend against a media file.
    Run(RunArgs),

    /// Check which backend executables are installed.
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Path to the media file to analyze.
    #[arg(short = 'a', long = "media")]
    media_path: PathBuf,

    /// Directory containing the backend executables.
    #[arg(long = "backend-dir", default_value = "dist")]
    backend_dir: PathBuf,

    /// Silence threshold in dB.
    #[arg(long = "silence-cutoff", default_value_t = -80.0, allow_hyphen_values = true)]
    silence_cutoff: f64,

    /// Remove silences longer than this many seconds.
    #[arg(long = "remove-over", default_value_t = 1.0)]
    remove_over: f64,

    /// Keep gaps between silences shorter than this many seconds.
    #[arg(long = "keep-over", default_value_t = 0.3)]
    keep_over: f64,

    /// Padding in seconds retained on either side of a cut.
    #[arg(long = "padding", default_value_t = 0.5)]
    padding: f64,

    #[arg(long = "method", value_enum, default_value_t = DetectionMethod::Loudness)]
    method: DetectionMethod,

    /// Whisper model size (whisper method only).
    #[arg(long = "model", value_enum, default_value_t = WhisperModel::Base)]
    model: WhisperModel,

    /// Whisper language hint (whisper method only; auto-detects when omitted).
    #[arg(long = "language")]
    language: Option<String>,

    /// Kill the backend if it runs longer than this many seconds.
    #[arg(long = "timeout")]
    timeout_secs: Option<u64>,
}

#[derive(Args, Debug)]
struct DoctorArgs {
    /// Directory containing the backend executables.
    #[arg(long = "backend-dir", default_value = "dist")]
    backend_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    jumpcut::logging::init();

    match Params::parse().command {
        Command::Run(args) => run(args).await,
        Command::Doctor(args) => doctor(args),
    }
}

async fn run(args: RunArgs) -> Result<()> {
    let mut config = Config::new(&args.backend_dir);
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout_secs(secs);
    }

    let params = match args.method {
        DetectionMethod::Loudness => JumpcutParams::for_loudness(
            args.silence_cutoff,
            args.remove_over,
            args.keep_over,
            args.padding,
        ),
        DetectionMethod::Whisper => JumpcutParams::for_whisper(
            args.silence_cutoff,
            args.remove_over,
            args.keep_over,
            args.padding,
            args.model,
            args.language.clone(),
        ),
    };
    let params_json = serde_json::to_string(&params)?;

    let registry = BackendRegistry::new(&config);
    let descriptor = registry.descriptor(args.method);
    let backend_args = BackendRegistry::build_args(&args.media_path, &params, &params_json);

    let stdout = ProcessRunner::from_config(&config)
        .run(&descriptor, &backend_args, |line| {
            if let Some(update) = progress::observe(line, args.method) {
                eprintln!("[{:>3}%] {}", update.percent, update.message);
            }
        })
        .await
        .with_context(|| format!("{} backend run failed", args.method))?;

    let cuts = extract(&stdout)?;
    eprintln!(
        "Detected {} silence intervals ({} cuts).",
        cuts.silences.len(),
        cuts.cuts_applied()
    );
    println!("{}", serde_json::to_string_pretty(&cuts)?);
    Ok(())
}

fn doctor(args: DoctorArgs) -> Result<()> {
    let registry = BackendRegistry::new(&Config::new(&args.backend_dir));
    let statuses = registry.verify();

    let mut missing = 0;
    for status in &statuses {
        let verdict = if status.present { "ok" } else { "MISSING" };
        println!(
            "{:<10} {:<48} {verdict}",
            status.method.as_str(),
            status.executable.display()
        );
        if !status.present {
            missing += 1;
        }
    }

    if missing > 0 {
        bail!(
            "{missing} backend executable(s) missing under '{}'",
            args.backend_dir.display()
        );
    }
    Ok(())
}
