//! Replay recorded detector candidates through the primary detection path.

use std::path::PathBuf;

use anyhow::Context;
use percept_common::{AppConfig, FrameClock, PerceptError};
use percept_frame_model::detection::parse_candidate_frames;
use percept_processing_core::detection::{ClassLabels, NmsConfig};
use percept_processing_core::{FrameDetectionEngine, FrameInput};

use super::read_recording;

pub fn run(config: &AppConfig, path: PathBuf, labels: Option<PathBuf>) -> anyhow::Result<()> {
    let labels_path = labels
        .or_else(|| config.detection.labels_path.clone())
        .ok_or_else(|| {
            PerceptError::detector_unavailable(
                "no class label file (pass --labels or set detection.labels_path)",
            )
        })?;
    let labels = ClassLabels::load(&labels_path)
        .map_err(|e| PerceptError::detector_unavailable(e.to_string()))
        .with_context(|| format!("Failed to load class labels from {}", labels_path.display()))?;

    let content = read_recording(&path)?;
    let frames = parse_candidate_frames(&content).context("Failed to parse candidate frames")?;

    println!(
        "Replaying {} frames from {} ({} classes)",
        frames.len(),
        path.display(),
        labels.len()
    );

    let mut engine = FrameDetectionEngine::primary(labels, NmsConfig::from(&config.detection));
    let mut total = 0usize;

    for frame in &frames {
        let report = engine.process(FrameInput::Candidates(&frame.candidates))?;
        total += report.count();

        println!(
            "  t={:7.3}s  {} ({} candidates)",
            FrameClock::ns_to_secs(frame.timestamp_ns),
            report.summary(),
            frame.candidates.len()
        );
        for region in &report.regions {
            let b = region.bbox;
            println!(
                "      {:<16} at ({:.0}, {:.0}) {:.0}x{:.0}",
                region.caption(),
                b.x,
                b.y,
                b.width,
                b.height
            );
        }
    }

    println!("\nReplay complete: {total} regions reported.");
    Ok(())
}
