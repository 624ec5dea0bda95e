//! Class-name table for the primary detector.

use std::borrow::Cow;
use std::path::Path;

use percept_common::{PerceptError, PerceptResult};

/// Class names addressed by the detector's class index, one per file line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLabels {
    names: Vec<String>,
}

impl ClassLabels {
    /// Parse a label table. Every line is one index, trimmed; blank lines
    /// keep their slot so later indices stay aligned.
    pub fn parse(content: &str) -> PerceptResult<Self> {
        let names: Vec<String> = content.lines().map(|l| l.trim().to_string()).collect();
        if names.iter().all(String::is_empty) {
            return Err(PerceptError::detector_unavailable("class label table is empty"));
        }
        Ok(Self { names })
    }

    /// Read a label table from disk.
    pub fn load(path: &Path) -> PerceptResult<Self> {
        if !path.exists() {
            return Err(PerceptError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let labels = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), classes = labels.len(), "loaded class labels");
        Ok(labels)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.names.get(class_id).map(String::as_str)
    }

    /// Name for `class_id`, or `class <id>` when the table has no such entry.
    pub fn label_for(&self, class_id: usize) -> Cow<'_, str> {
        match self.get(class_id) {
            Some(name) => Cow::Borrowed(name),
            None => {
                tracing::warn!(class_id, classes = self.len(), "class id outside label table");
                Cow::Owned(format!("class {class_id}"))
            }
        }
    }
}
