//! Replay a landmark recording through a pinch level control.

use std::path::PathBuf;

use anyhow::Context;
use percept_common::{AppConfig, FrameClock, FrameRateMeter, PerceptError};
use percept_frame_model::landmark::parse_landmark_frames;
use percept_processing_core::LevelControl;

use super::{fps_suffix, read_recording};
use crate::Preset;

pub fn run(
    config: &AppConfig,
    path: PathBuf,
    preset: Preset,
    smoothing: f64,
    json: bool,
) -> anyhow::Result<()> {
    let content = read_recording(&path)?;
    let frames = parse_landmark_frames(&content).context("Failed to parse landmark frames")?;

    let (name, levels) = match preset {
        Preset::Volume => ("volume", &config.landmark.volume),
        Preset::Brightness => ("brightness", &config.landmark.brightness),
    };
    let mut control = LevelControl::from_preset(name, levels)?.with_smoothing(smoothing);

    if !json {
        println!("Replaying {} frames from {} ({name})", frames.len(), path.display());
    }

    let mut meter = FrameRateMeter::new();
    let (mut readings, mut no_hand, mut skipped) = (0usize, 0usize, 0usize);

    for frame in &frames {
        let fps = meter.tick(frame.timestamp_ns);
        let secs = FrameClock::ns_to_secs(frame.timestamp_ns);

        match control.update(frame) {
            Ok(Some(reading)) => {
                readings += 1;
                if json {
                    let record = serde_json::json!({ "t": frame.timestamp_ns, "reading": reading });
                    println!("{record}");
                } else {
                    println!(
                        "  t={secs:7.3}s  dist={:6.1}  level={:8.2}  {:3}%  bar={:5.1}{}",
                        reading.distance,
                        reading.level,
                        reading.percent_int(),
                        reading.bar_y,
                        fps_suffix(fps)
                    );
                }
            }
            Ok(None) => {
                no_hand += 1;
                if !json {
                    println!("  t={secs:7.3}s  no hand");
                }
            }
            Err(e @ PerceptError::MissingLandmark { .. }) => {
                skipped += 1;
                tracing::warn!(t = frame.timestamp_ns, error = %e, "skipping frame");
            }
            Err(e) => return Err(e.into()),
        }
    }

    if !json {
        println!("\nReplay complete: {readings} readings, {no_hand} without a hand, {skipped} skipped.");
    }
    Ok(())
}
