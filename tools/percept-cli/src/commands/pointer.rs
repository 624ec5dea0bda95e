//! Replay a landmark recording through the virtual pointer.

use std::path::PathBuf;

use anyhow::Context;
use percept_common::{AppConfig, FrameClock, FrameRateMeter, PerceptError};
use percept_frame_model::landmark::parse_landmark_frames;
use percept_processing_core::{PointerCommand, PointerConfig, VirtualPointer};

use super::{fps_suffix, read_recording};

pub fn run(
    config: &AppConfig,
    path: PathBuf,
    screen_width: u32,
    screen_height: u32,
    edge: bool,
    json: bool,
) -> anyhow::Result<()> {
    let content = read_recording(&path)?;
    let frames = parse_landmark_frames(&content).context("Failed to parse landmark frames")?;

    let mut pointer_config =
        PointerConfig::from_landmark_config(&config.landmark, screen_width as f64, screen_height as f64);
    pointer_config.click_edge_only |= edge;
    let mut pointer = VirtualPointer::new(pointer_config)?;

    if !json {
        println!(
            "Replaying {} frames from {} onto a {screen_width}x{screen_height} screen",
            frames.len(),
            path.display()
        );
    }

    let mut meter = FrameRateMeter::new();
    let (mut moves, mut clicks, mut skipped) = (0usize, 0usize, 0usize);

    for frame in &frames {
        let fps = meter.tick(frame.timestamp_ns);
        let secs = FrameClock::ns_to_secs(frame.timestamp_ns);

        let update = match pointer.update(frame) {
            Ok(update) => update,
            Err(e @ PerceptError::MissingLandmark { .. }) => {
                skipped += 1;
                tracing::warn!(t = frame.timestamp_ns, error = %e, "skipping frame");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let Some(update) = update else {
            if !json {
                println!("  t={secs:7.3}s  no hand");
            }
            continue;
        };

        let action = match update.command {
            Some(PointerCommand::MoveTo { x, y }) => {
                moves += 1;
                format!("move to ({x:.0}, {y:.0})")
            }
            Some(PointerCommand::Click { x, y }) => {
                clicks += 1;
                format!("click at ({x:.0}, {y:.0})")
            }
            None => "-".to_string(),
        };

        if json {
            let record = serde_json::json!({ "t": frame.timestamp_ns, "update": update });
            println!("{record}");
        } else {
            println!(
                "  t={secs:7.3}s  {:<6}  {action}{}",
                format!("{:?}", update.mode),
                fps_suffix(fps)
            );
        }
    }

    if !json {
        println!("\nReplay complete: {moves} moves, {clicks} clicks, {skipped} skipped.");
    }
    Ok(())
}
