//! Local plain-text export of generated results

use std::path::{Path, PathBuf};

use crate::task::TaskKind;
use crate::Result;

/// Build the export filename for a task and free-text topic
///
/// Spaces become underscores; path separators and other non-filename
/// characters are dropped. The extension is always `.txt`.
#[must_use]
pub fn export_filename(task: TaskKind, topic: &str) -> String {
    let slug: String = topic
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-'))
        .collect();

    if slug.is_empty() {
        format!("{}.txt", task.label())
    } else {
        format!("{}_{slug}.txt", task.label())
    }
}

/// Write generated text to `dir` under the task-specific filename
///
/// Synchronous, local-only. Returns the path written.
///
/// # Errors
///
/// Returns error if the file cannot be written.
pub fn export_text(dir: &Path, task: TaskKind, topic: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(export_filename(task, topic));
    std::fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), "result exported");
    Ok(path)
}
