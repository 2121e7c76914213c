use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::task::Scope;

/// Persisted TUI state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Which list had focus
    #[serde(default)]
    pub focus: Scope,
    /// Cursor in the day list
    #[serde(default)]
    pub daily_cursor: usize,
    /// Cursor in the global list
    #[serde(default)]
    pub global_cursor: usize,
}

/// Read .state.json from the data directory
pub fn read_ui_state(data_dir: &Path) -> Option<UiState> {
    let path = data_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the data directory
pub fn write_ui_state(data_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = data_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}
