//! Platform-specific preset directories.
//!
//! - **User presets**: `~/.config/diodering/presets/` (Linux),
//!   `~/Library/Application Support/diodering/presets/` (macOS),
//!   `%APPDATA%\diodering\presets\` (Windows)
//! - **System presets**: `/usr/share/diodering/presets/` (Linux),
//!   `/Library/Application Support/diodering/presets/` (macOS)

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "diodering";

/// Subdirectory name for presets.
const PRESETS_SUBDIR: &str = "presets";

/// Returns the user-specific presets directory.
///
/// Falls back to `./diodering/presets` if the config directory cannot be
/// determined.
pub fn user_presets_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(PRESETS_SUBDIR)
}

/// Returns the system-wide presets directory.
///
/// Usually read-only, populated by packagers.
pub fn system_presets_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        PathBuf::from("/usr/share").join(APP_NAME).join(PRESETS_SUBDIR)
    }
    #[cfg(target_os = "macos")]
    {
        PathBuf::from("/Library/Application Support")
            .join(APP_NAME)
            .join(PRESETS_SUBDIR)
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME)
            .join(PRESETS_SUBDIR)
    }
}

/// Find a preset file by path or name.
///
/// Searches in order:
/// 1. `name` as a literal path
/// 2. the user presets directory
/// 3. the system presets directory
///
/// A `.toml` extension is appended to bare names for the directory lookups.
pub fn find_preset(name: &str) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }
    find_preset_in(name, &[user_presets_dir(), system_presets_dir()])
}

fn find_preset_in(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };
    dirs.iter()
        .map(|dir| dir.join(&filename))
        .find(|candidate| candidate.is_file())
}

/// Ensure the user presets directory exists and return it.
///
/// # Errors
///
/// [`ConfigError::CreateDir`](crate::ConfigError::CreateDir) if the
/// directory cannot be created.
pub fn ensure_user_presets_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_presets_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
        tracing::info!(dir = %dir.display(), "created user presets directory");
    }
    Ok(dir)
}

/// List preset files in the user presets directory.
pub fn list_user_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&user_presets_dir())
}

/// List preset files in the system presets directory.
pub fn list_system_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&system_presets_dir())
}

/// List user presets followed by system presets.
///
/// Duplicate names are not filtered; [`find_preset`] gives user files
/// precedence.
pub fn list_all_presets() -> Vec<PathBuf> {
    let mut presets = list_user_presets();
    presets.extend(list_system_presets());
    presets
}

/// `.toml` files directly inside `dir`, sorted. Empty if unreadable.
pub fn list_presets_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut presets: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    presets.sort();
    presets
}

/// Preset name from a file path (the file stem).
///
/// # Example
///
/// ```rust
/// use diodering_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// let name = preset_name_from_path(Path::new("/path/to/half_wave.toml"));
/// assert_eq!(name, Some("half_wave".to_string()));
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(ToString::to_string)
}
