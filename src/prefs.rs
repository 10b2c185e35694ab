use serde::{Deserialize, Serialize};
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

/// The one durable piece of client state: the dark-mode toggle, kept under a
/// fixed key in a small JSON file. Read once at startup, written on every
/// toggle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct Prefs {
    #[serde(rename = "darkMode", default)]
    pub dark_mode: bool,
}

pub fn resolve_prefs_path() -> PathBuf {
    if let Ok(path) = env::var("APP_PREFS_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/prefs.json")
}

pub async fn load_prefs(path: &Path) -> Prefs {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(prefs) => prefs,
            Err(err) => {
                error!("failed to parse preferences file: {err}");
                Prefs::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Prefs::default(),
        Err(err) => {
            error!("failed to read preferences file: {err}");
            Prefs::default()
        }
    }
}

pub async fn persist_prefs(path: &Path, prefs: &Prefs) -> Result<(), std::io::Error> {
    let payload = serde_json::to_vec_pretty(prefs).map_err(std::io::Error::other)?;
    fs::write(path, payload).await
}
