use std::error::Error;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use image::{GrayImage, ImageFormat, Luma};
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::tempdir;

fn flash_shot(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin("flash-shot").expect("flash-shot binary");
    cmd.arg("--store").arg(store).env_remove("FLASH_SHOT_STORE");
    cmd
}

fn write_png(path: &Path, spot: Option<(u32, u32)>) -> Result<(), Box<dyn Error>> {
    let img = GrayImage::from_fn(16, 16, |x, y| {
        Luma([if spot == Some((x, y)) { 255 } else { 10 }])
    });
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
    std::fs::write(path, out)?;
    Ok(())
}

fn frames(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let spots = [None, Some((8, 4)), None];
    let mut paths = Vec::new();
    for (i, spot) in spots.into_iter().enumerate() {
        let path = dir.join(format!("f{i}.png"));
        write_png(&path, spot)?;
        paths.push(path);
    }
    Ok(paths)
}

#[test]
fn settings_show_prints_defaults_without_writing() -> Result<(), Box<dyn Error>> {
    let store = tempdir()?;
    flash_shot(store.path())
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(contains("\"brightness_threshold\": 245"))
        .stdout(contains("\"min_frames_between_hits\": 5"));
    assert!(!store.path().join("detection").exists());
    Ok(())
}

#[test]
fn settings_set_persists_across_runs() -> Result<(), Box<dyn Error>> {
    let store = tempdir()?;
    flash_shot(store.path())
        .args(["settings", "set", "--max-spot-size", "12", "--auto-exposure-level", "-2"])
        .assert()
        .success();
    assert!(store.path().join("detection").join("settings.bin").is_file());

    flash_shot(store.path())
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(contains("\"max_spot_size\": 12"))
        .stdout(contains("\"auto_exposure_level\": -2"));

    flash_shot(store.path())
        .args(["settings", "reset"])
        .assert()
        .success()
        .stdout(contains("\"max_spot_size\": 20"));
    Ok(())
}

#[test]
fn out_of_range_setting_is_rejected() -> Result<(), Box<dyn Error>> {
    let store = tempdir()?;
    flash_shot(store.path())
        .args(["settings", "set", "--max-spot-size", "0"])
        .assert()
        .failure()
        .stderr(contains("max-spot-size"));
    flash_shot(store.path())
        .args(["settings", "set", "--min-brightness-change", "101"])
        .assert()
        .failure();
    assert!(!store.path().join("detection").exists());
    Ok(())
}

#[test]
fn detect_prints_accepted_shots() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let paths = frames(dir.path())?;
    let report = dir.path().join("report.json");

    flash_shot(dir.path())
        .arg("detect")
        .args(&paths)
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(contains("shot at 0.5000 0.2500 (frame 1, 1 px)"))
        .stdout(contains("1 shot(s) in 3 frame(s)"));

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&report)?)?;
    assert_eq!(json["frames"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["frames"][1]["shot"]["pixels"], 1);
    Ok(())
}

#[test]
fn detect_applies_json_overrides() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let paths = frames(dir.path())?;

    flash_shot(dir.path())
        .arg("detect")
        .args(&paths)
        .args(["--settings", r#"{"brightness_threshold": 255}"#])
        .assert()
        .success()
        .stdout(contains("shot at").not())
        .stdout(contains("0 shot(s) in 3 frame(s)"));
    Ok(())
}

#[test]
fn detect_without_frames_fails() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    flash_shot(dir.path())
        .arg("detect")
        .assert()
        .failure()
        .stderr(contains("no frames given"));
    Ok(())
}

#[test]
fn detect_rejects_unusable_overrides() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let paths = frames(dir.path())?;

    flash_shot(dir.path())
        .arg("detect")
        .args(&paths)
        .args(["--settings", "200"])
        .assert()
        .failure()
        .stderr(contains("must be a JSON object"));

    flash_shot(dir.path())
        .arg("detect")
        .args(&paths)
        .args(["--settings", r#"{"brightness_treshold": 200}"#])
        .assert()
        .failure()
        .stderr(contains("unknown setting \"brightness_treshold\""));
    Ok(())
}
