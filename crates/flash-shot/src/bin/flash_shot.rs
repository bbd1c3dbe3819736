//! `flash-shot` command line: run the detector over captured frames and
//! manage the persisted detection settings.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use flash_shot::detect::{detect_shots_in_files, DetectError};
use flash_shot::io::{apply_overrides, IoError, ShotDetectConfig};
use flash_shot::settings::{
    FileRecordStore, RecordStoreError, SettingsStore, SettingsStoreError, DEFAULT_NAMESPACE,
};
use flash_shot::DetectionSettings;

#[derive(Parser, Debug)]
#[command(
    name = "flash-shot",
    version,
    about = "Detect camera flashes (shots) in frame sequences"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding persisted settings.
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        env = "FLASH_SHOT_STORE",
        default_value = ".flash-shot"
    )]
    store: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the detector over frames in capture order.
    Detect(DetectArgs),
    /// Show or change the persisted detection settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Args, Debug)]
struct DetectArgs {
    /// Frame images (JPEG, PNG, ...) in capture order.
    #[arg(value_name = "FRAMES")]
    frames: Vec<PathBuf>,

    /// JSON run config; frames given on the command line are appended.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Partial settings overrides as a JSON object.
    #[arg(long, value_name = "JSON")]
    settings: Option<String>,

    /// Write a JSON report of every frame.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Print the stored settings (defaults when none are stored).
    Show,
    /// Persist the firmware defaults.
    Reset,
    /// Update individual fields and persist the result.
    Set(SetArgs),
}

fn range_i64<T: Copy + Into<i64>>(range: RangeInclusive<T>) -> RangeInclusive<i64> {
    (*range.start()).into()..=(*range.end()).into()
}

#[derive(Args, Debug)]
struct SetArgs {
    #[arg(long, allow_negative_numbers = true,
        value_parser = clap::value_parser!(i8).range(range_i64(DetectionSettings::AUTO_EXPOSURE_LEVEL)))]
    auto_exposure_level: Option<i8>,

    #[arg(long)]
    brightness_threshold: Option<u8>,

    #[arg(long,
        value_parser = clap::value_parser!(u16).range(range_i64(DetectionSettings::MAX_SPOT_SIZE)))]
    max_spot_size: Option<u16>,

    #[arg(long,
        value_parser = clap::value_parser!(u8).range(range_i64(DetectionSettings::MIN_BRIGHTNESS_CHANGE)))]
    min_brightness_change: Option<u8>,

    #[arg(long,
        value_parser = clap::value_parser!(u16).range(range_i64(DetectionSettings::MIN_FRAMES_BETWEEN_HITS)))]
    min_frames_between_hits: Option<u16>,
}

impl SetArgs {
    fn apply(&self, mut settings: DetectionSettings) -> DetectionSettings {
        if let Some(v) = self.auto_exposure_level {
            settings.auto_exposure_level = v;
        }
        if let Some(v) = self.brightness_threshold {
            settings.brightness_threshold = v;
        }
        if let Some(v) = self.max_spot_size {
            settings.max_spot_size = v;
        }
        if let Some(v) = self.min_brightness_change {
            settings.min_brightness_change = v;
        }
        if let Some(v) = self.min_frames_between_hits {
            settings.min_frames_between_hits = v;
        }
        settings
    }
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Detect(#[from] DetectError),
    #[error(transparent)]
    Store(#[from] RecordStoreError),
    #[error(transparent)]
    Settings(#[from] SettingsStoreError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no frames given")]
    NoFrames,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: u8) {
    let level = flash_shot::core::level_from_verbosity(verbose);
    let _ = flash_shot::core::init_with_level(level);
}

#[cfg(feature = "tracing")]
fn init_logging(verbose: u8) {
    let level = flash_shot::core::level_from_verbosity(verbose);
    flash_shot::core::init_tracing(level, false);
    let _ = tracing_log::LogTracer::init();
}

fn open_store(dir: &Path) -> Result<SettingsStore<FileRecordStore>, RecordStoreError> {
    Ok(SettingsStore::new(FileRecordStore::new(dir, DEFAULT_NAMESPACE)?))
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Detect(args) => run_detect(&cli.store, args),
        Command::Settings(cmd) => run_settings(&cli.store, cmd),
    }
}

fn run_detect(store: &Path, args: DetectArgs) -> Result<(), CliError> {
    let mut config = match &args.config {
        Some(path) => ShotDetectConfig::load_json(path)?,
        None => ShotDetectConfig::default(),
    };
    config.frames.extend(args.frames);
    if config.settings_store.is_none() {
        config.settings_store = Some(store.to_path_buf());
    }
    if args.report.is_some() {
        config.report_path = args.report;
    }
    if config.frames.is_empty() {
        return Err(CliError::NoFrames);
    }

    let mut settings = config.resolve_settings()?;
    if let Some(raw) = &args.settings {
        let overrides: serde_json::Value = serde_json::from_str(raw)?;
        settings = apply_overrides(settings, &overrides)?;
    }

    let report = detect_shots_in_files(&config.frames, settings)?;
    for frame in report.shots() {
        if let Some(shot) = frame.result.shot {
            println!(
                "shot at {:.4} {:.4} (frame {}, {} px) {}",
                shot.position.x,
                shot.position.y,
                frame.result.frame_index,
                shot.pixels,
                frame.path.display()
            );
        }
    }
    let failed = report.frames.iter().filter(|f| f.result.decode_failed).count();
    if failed > 0 {
        log::warn!("{failed} frame(s) failed to decode");
    }
    println!(
        "{} shot(s) in {} frame(s)",
        report.shots().count(),
        report.frames.len()
    );

    if let Some(path) = &config.report_path {
        report.write_json(path)?;
        log::info!("report written to {}", path.display());
    }
    Ok(())
}

fn run_settings(dir: &Path, cmd: SettingsCommand) -> Result<(), CliError> {
    let mut store = open_store(dir)?;
    let settings = match cmd {
        SettingsCommand::Show => store.load(),
        SettingsCommand::Reset => store.reset()?,
        SettingsCommand::Set(args) => {
            let updated = args.apply(store.load());
            store.save(&updated)?;
            updated
        }
    };
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
