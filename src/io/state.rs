use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::io::storage::atomic_write;
use crate::ops::expansion::ExpansionSet;

const STATE_FILE: &str = ".state.json";

/// View state kept between runs (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// IDs of expanded events
    #[serde(default)]
    pub expanded: ExpansionSet,
}

/// Read .state.json from the data directory. `None` when absent or unreadable.
pub fn read_ui_state(data_dir: &Path) -> Option<UiState> {
    let path = data_dir.join(STATE_FILE);
    let content = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable view state");
            None
        }
    }
}

/// Write .state.json to the data directory
pub fn write_ui_state(data_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = data_dir.join(STATE_FILE);
    let content = serde_json::to_string_pretty(state)?;
    fs::create_dir_all(data_dir)?;
    atomic_write(&path, content.as_bytes())
}
