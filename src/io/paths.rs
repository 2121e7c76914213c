use std::path::{Path, PathBuf};

/// Resolve the data directory: explicit override, then `$DAYLIST_DIR`,
/// then `$XDG_DATA_HOME/daylist`, then `~/.local/share/daylist`.
pub fn data_dir(override_dir: Option<&Path>) -> PathBuf {
    data_dir_with(override_dir, |name| std::env::var(name).ok())
}

/// Same as [`data_dir`], with the environment supplied by the caller
pub fn data_dir_with<F>(override_dir: Option<&Path>, env: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    let non_empty = |name: &str| env(name).filter(|v| !v.is_empty());
    if let Some(dir) = non_empty("DAYLIST_DIR") {
        return PathBuf::from(dir);
    }
    let data_home = non_empty("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            non_empty("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/"))
                .join(".local")
                .join("share")
        });
    data_home.join("daylist")
}
