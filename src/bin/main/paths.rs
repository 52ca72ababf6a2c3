//! Per-user file locations, resolved with `dirs`.
//!
//! Linux: `~/.config/aeroread/`, macOS: `~/Library/Application Support/aeroread/`,
//! Windows: `%APPDATA%\aeroread\`.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub(super) struct AppPaths {
    pub config_dir: PathBuf,
    pub settings_file: PathBuf,
    pub log_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "aeroread";

    /// Falls back to the working directory when the platform has no config
    /// dir.
    pub(super) fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        Self {
            settings_file: config_dir.join("settings.toml"),
            log_file: config_dir.join("aeroread.log"),
            config_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_in_the_config_dir() {
        let paths = AppPaths::new();
        assert!(paths.settings_file.starts_with(&paths.config_dir));
        assert!(paths.log_file.starts_with(&paths.config_dir));
        assert!(
            paths
                .settings_file
                .file_name()
                .is_some_and(|name| name == "settings.toml")
        );
    }
}
