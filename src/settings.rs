use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct Settings {
    pub shader_root: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shader_root: PathBuf::from("data/shaders"),
        }
    }
}

impl Settings {
    pub fn load_global() -> Self {
        Self::load_from(&settings_path())
    }

    /// Missing or unreadable files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        std::fs::read(path)
            .map(|data| serde_json::from_slice(&data).unwrap_or_default())
            .unwrap_or_default()
    }

    pub fn save(&self) -> io::Result<()> {
        self.save_to(&settings_path())
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, data)
    }
}

fn settings_path() -> PathBuf {
    PathBuf::from("shaderland.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = Settings {
            shader_root: PathBuf::from("assets/shaders"),
        };
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.shader_root, PathBuf::from("assets/shaders"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let loaded = Settings::load_from(&dir.path().join("nope.json"));
        assert_eq!(loaded.shader_root, Settings::default().shader_root);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.shader_root, Settings::default().shader_root);
    }
}
