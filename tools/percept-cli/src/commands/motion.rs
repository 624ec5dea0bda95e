//! Run the motion fallback over a sequence of images.

use std::path::PathBuf;

use anyhow::Context;
use percept_common::{AppConfig, FrameClock, FrameRateMeter};
use percept_processing_core::detection::MotionConfig;
use percept_processing_core::{FrameDetectionEngine, FrameInput};

use super::fps_suffix;

pub fn run(config: &AppConfig, frames: Vec<PathBuf>, blur: Option<f32>) -> anyhow::Result<()> {
    let mut motion = MotionConfig::from(&config.detection);
    if let Some(sigma) = blur {
        if sigma <= 0.0 {
            anyhow::bail!("--blur must be positive, got {sigma}");
        }
        motion.blur_sigma = Some(sigma);
    }

    println!(
        "Motion detection over {} frames (threshold={}, min area={})",
        frames.len(),
        motion.threshold,
        motion.min_area
    );

    let mut engine = FrameDetectionEngine::fallback(motion);
    let clock = FrameClock::start();
    let mut meter = FrameRateMeter::new();
    println!("  Session started: {}", clock.epoch_wall());

    for path in &frames {
        let image = image::open(path)
            .with_context(|| format!("Failed to read image {}", path.display()))?
            .to_luma8();
        let report = engine
            .process(FrameInput::Intensity(&image))
            .with_context(|| format!("Motion detection failed on {}", path.display()))?;
        let fps = meter.tick(clock.elapsed_ns());

        println!("  {}: {}{}", path.display(), report.summary(), fps_suffix(fps));
        for region in &report.regions {
            let b = region.bbox;
            println!(
                "      {} at ({:.0}, {:.0}) {:.0}x{:.0}",
                region.label, b.x, b.y, b.width, b.height
            );
        }
    }

    println!(
        "\nProcessed {} frames in {:.3}s.",
        frames.len(),
        FrameClock::ns_to_secs(clock.elapsed_ns())
    );
    Ok(())
}
