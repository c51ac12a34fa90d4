//! Platform-specific configuration paths.
//!
//! # Lookup Order
//!
//! [`find_config`] resolves the analysis configuration in this order:
//!
//! 1. An explicit path given by the caller
//! 2. `actvib.toml` in the working directory
//! 3. `actvib.toml` in the user config directory
//!    (`~/.config/actvib/` on Linux, `~/Library/Application Support/actvib/`
//!    on macOS, `%APPDATA%\actvib\` on Windows)
//!
//! When nothing is found the caller falls back to
//! [`AnalysisConfig::default`](crate::AnalysisConfig::default).

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "actvib";

/// File name of the analysis configuration.
pub const CONFIG_FILE_NAME: &str = "actvib.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the configuration file inside the user config directory.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE_NAME)
}

/// Locate the configuration file.
///
/// An explicit path is returned only if it is an existing file.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.is_file().then(|| path.to_path_buf());
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    let user = default_config_path();
    user.is_file().then_some(user)
}

/// Ensure the user config directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_config_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_config_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn user_config_dir_ends_with_app_name() {
        assert!(user_config_dir().ends_with(APP_NAME));
    }

    #[test]
    fn default_path_uses_file_name() {
        let path = default_config_path();
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);
        assert!(path.starts_with(user_config_dir()));
    }

    #[test]
    fn explicit_existing_file_is_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "sample_rate = 416.0\n").unwrap();

        assert_eq!(find_config(Some(&path)), Some(path));
    }

    #[test]
    fn explicit_missing_file_is_not_replaced() {
        let dir = TempDir::new().unwrap();
        assert_eq!(find_config(Some(&dir.path().join("missing.toml"))), None);
    }

    #[test]
    fn explicit_directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        assert_eq!(find_config(Some(dir.path())), None);
    }
}
