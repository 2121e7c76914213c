use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::{Config, ThemeMode};

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not parse config.toml for editing: {0}")]
    EditError(#[from] toml_edit::TomlError),
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Read the config, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing. A missing file yields
/// defaults and an empty document.
pub fn read_config(data_dir: &Path) -> Result<(Config, toml_edit::DocumentMut), ConfigError> {
    let path = config_path(data_dir);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    let config: Config = toml::from_str(&text)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(data_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let path = config_path(data_dir);
    crate::io::recovery::atomic_write(&path, doc.to_string().as_bytes())
        .map_err(|e| ConfigError::WriteError { path, source: e })
}

/// Update `[ui] theme` in the config document
pub fn set_theme(doc: &mut toml_edit::DocumentMut, mode: ThemeMode) {
    if !doc.contains_key("ui") {
        doc["ui"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["ui"]["theme"] = toml_edit::value(mode.as_str());
}

/// Read, update and write back the theme in one step
pub fn save_theme(data_dir: &Path, mode: ThemeMode) -> Result<(), ConfigError> {
    let (_config, mut doc) = read_config(data_dir)?;
    set_theme(&mut doc, mode);
    write_config(data_dir, &doc)
}
