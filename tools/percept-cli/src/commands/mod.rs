pub mod config;
pub mod detect;
pub mod level;
pub mod motion;
pub mod pointer;

use std::path::Path;

use anyhow::Context;

/// Read a JSONL recording into a string.
pub(crate) fn read_recording(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Recording not found: {}", path.display()))
}

/// `  (30.0 fps)` for a measured rate, empty for the first frame.
pub(crate) fn fps_suffix(fps: Option<f64>) -> String {
    fps.map(|f| format!("  ({f:.1} fps)")).unwrap_or_default()
}
