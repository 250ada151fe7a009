use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Settings shared by the demo binaries, read from an optional JSON file.
///
/// Every field has a default, so a config file only needs the keys it wants
/// to override. A missing file is not an error; a malformed one is, so typos
/// do not silently fall back to defaults.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub clear_color: [f32; 4],
    pub font_path: PathBuf,
    pub font_size: f32,
    pub cube_texture_path: PathBuf,
    pub sim_cube_count: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            window_width: 1280,
            window_height: 720,
            clear_color: [0.45, 0.55, 0.60, 1.0],
            font_path: PathBuf::from("resources/Kenney Mini.ttf"),
            font_size: 32.0,
            cube_texture_path: PathBuf::from("resources/ph16.png"),
            sim_cube_count: 3,
        }
    }
}

impl DemoConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("{} not found, using defaults", path.display());
                return Ok(DemoConfig::default());
            }
            Err(e) => return Err(Error::InvalidConfig(format!("{}: {e}", path.display()))),
        };
        serde_json::from_str(&text)
            .map_err(|e| Error::InvalidConfig(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let config = DemoConfig::load("/nonexistent/demo_config.json").unwrap();
        assert_eq!(config.window_width, 1280);
        assert_eq!(config.window_height, 720);
        assert_eq!(config.font_size, 32.0);
        assert_eq!(config.font_path, PathBuf::from("resources/Kenney Mini.ttf"));
    }

    #[test]
    fn test_partial_file_overrides_only_named_keys() {
        let path = std::env::temp_dir().join("glyphquad_partial_config_test.json");
        std::fs::write(&path, r#"{ "font_size": 48.0, "window_width": 1920 }"#).unwrap();

        let config = DemoConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.font_size, 48.0);
        assert_eq!(config.window_width, 1920);
        assert_eq!(config.window_height, 720);
        assert_eq!(config.clear_color, [0.45, 0.55, 0.60, 1.0]);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = std::env::temp_dir().join("glyphquad_malformed_config_test.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = DemoConfig::load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
