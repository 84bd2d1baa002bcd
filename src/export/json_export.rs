//! JSON save and restore of the hidden answer.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::state::{AnswerObserver, HiddenAnswer};

const SNAPSHOT_VERSION: &str = "1.0.0";

/// Saved hidden answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerSnapshot {
    /// Export timestamp (RFC 3339)
    pub exported_at: String,
    /// Export version for compatibility
    pub version: String,
    pub answer: HiddenAnswer,
}

/// Save the hidden answer to `path`
pub fn save_answer_json<P: AsRef<Path>>(answer: &HiddenAnswer, path: P) -> Result<()> {
    let snapshot = AnswerSnapshot {
        exported_at: Local::now().to_rfc3339(),
        version: SNAPSHOT_VERSION.to_string(),
        answer: answer.clone(),
    };
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    log::info!("Answer saved: {}", path.as_ref().display());
    Ok(())
}

/// Load a hidden answer previously written by [`save_answer_json`]
pub fn load_answer_json<P: AsRef<Path>>(path: P) -> Result<HiddenAnswer> {
    let file = File::open(path.as_ref())?;
    let snapshot: AnswerSnapshot = serde_json::from_reader(file)?;
    ensure!(
        snapshot.version == SNAPSHOT_VERSION,
        "unsupported answer snapshot version {}",
        snapshot.version
    );
    log::info!("Answer loaded: {}", path.as_ref().display());
    Ok(snapshot.answer)
}

/// Observer that rewrites `path` every time the hidden answer changes.
///
/// Write failures are logged, not propagated.
pub fn persist_answer_to<P: Into<PathBuf>>(path: P) -> impl AnswerObserver + 'static {
    let path = path.into();
    move |answer: &HiddenAnswer| {
        if let Err(e) = save_answer_json(answer, &path) {
            log::error!("Failed to persist answer to {}: {:#}", path.display(), e);
        }
    }
}
