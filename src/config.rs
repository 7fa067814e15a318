use config::{Config, Environment, File};
use serde::Deserialize;

/// Runtime settings, layered from an optional `posegenie.toml` next to the
/// binary and `POSEGENIE_*` environment variables (env wins).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Vision service API key. Falls back to `GEMINI_API_KEY` when unset.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub camera: CameraSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraSettings {
    #[serde(default = "default_device")]
    pub device: String,
    /// Requested capture size; the driver may negotiate something else.
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_device() -> String {
    "/dev/video0".to_string()
}

// Portrait selfie target.
fn default_width() -> u32 {
    720
}

fn default_height() -> u32 {
    1280
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device: default_device(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            camera: CameraSettings::default(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, config::ConfigError> {
        Config::builder()
            .add_source(File::with_name("posegenie").required(false))
            .add_source(Environment::with_prefix("POSEGENIE").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// API key with the `GEMINI_API_KEY` environment fallback.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_portrait_selfie_capture() {
        let settings = Settings::default();
        assert_eq!(settings.camera.width, 720);
        assert_eq!(settings.camera.height, 1280);
        assert_eq!(settings.model, "gemini-2.5-flash");
        assert!(settings.api_key.is_none());
    }
}
