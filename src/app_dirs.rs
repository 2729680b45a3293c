use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "typerator";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        if let Some(pd) = ProjectDirs::from("", "", APP_NAME) {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("typerator_config.json")
        }
    }

    /// `$HOME/.local/state/typerator`, falling back to the platform data dir.
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join(APP_NAME))
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    pub fn score_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("last_score.json"))
            .unwrap_or_else(|| PathBuf::from("typerator_last_score.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("typerator.log"))
    }
}
