//! Run one detection session from a JSON run config and write the report.
//!
//! ```text
//! cargo run -p flash-shot --example detect_frames -- run.json
//! ```

use std::{env, path::PathBuf, time::Instant};

use flash_shot::detect::detect_shots_in_files;
use flash_shot::io::ShotDetectConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    flash_shot::core::init_with_level(log::LevelFilter::Info)?;

    let config_path = parse_config_path();
    let cfg = ShotDetectConfig::load_json(&config_path)?;
    let settings = cfg.resolve_settings()?;

    let started = Instant::now();
    let report = detect_shots_in_files(&cfg.frames, settings)?;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    for frame in report.shots() {
        if let Some(pos) = frame.result.position() {
            println!("{}: shot at ({:.3}, {:.3})", frame.path.display(), pos.x, pos.y);
        }
    }
    println!(
        "{} frames ({}x{}) in {elapsed_ms:.1} ms",
        report.frames.len(),
        report.geometry.width,
        report.geometry.height
    );

    let output_path = cfg
        .report_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("shot_report.json"));
    report.write_json(&output_path)?;
    println!("wrote report JSON to {}", output_path.display());
    Ok(())
}

fn parse_config_path() -> PathBuf {
    env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("testdata/shot_detect_config.json"))
}
