//! Application settings

use serde::{Deserialize, Serialize};

use crate::viewport::snap::DEFAULT_NORMAL_TOLERANCE;

/// Environment variable overriding [`AppSettings::backend_url`]
pub const ENV_BACKEND_URL: &str = "NFINIT_BACKEND_URL";
/// Environment variable overriding [`AppSettings::codegen_url`]
pub const ENV_CODEGEN_URL: &str = "NFINIT_CODEGEN_URL";

/// Face selection behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionSettings {
    /// Normal components below this magnitude are snapped to zero
    pub normal_tolerance: f32,
    /// Distance the face grid floats above the picked surface
    pub grid_offset: f32,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            normal_tolerance: DEFAULT_NORMAL_TOLERANCE,
            grid_offset: 0.005,
        }
    }
}

/// Reference grid display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSettings {
    /// Show the ground grid under the model
    pub visible: bool,
    /// Minor cell size in world units
    pub cell_size: f32,
    /// Major (section) line spacing in world units
    pub section_size: f32,
    /// Lines fade out completely at this distance from the grid origin
    pub fade_distance: f32,
    pub cell_color: [u8; 3],
    pub section_color: [u8; 3],
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: true,
            cell_size: 0.25,
            section_size: 1.0,
            fade_distance: 15.0,
            cell_color: [0x5b, 0x9b, 0xd5],
            section_color: [0x2e, 0x75, 0xb6],
        }
    }
}

/// Axis display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisSettings {
    /// Show axes
    pub visible: bool,
    /// Axis arrow length
    pub length: f32,
    /// Show axis labels (X, Y, Z)
    pub show_labels: bool,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            visible: true,
            length: 1.5,
            show_labels: true,
        }
    }
}

/// Viewport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
    /// Surface color of generated models
    pub model_color: [u8; 3],
    pub metalness: f32,
    pub roughness: f32,
    /// Display scale applied to generated models (meshes arrive in metres)
    pub model_scale: f32,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [0xd4, 0xd4, 0xd4],
            model_color: [0x6b, 0x72, 0x80],
            metalness: 0.3,
            roughness: 0.6,
            model_scale: 100.0,
        }
    }
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_codegen_url() -> String {
    "http://localhost:3001/api/generate-code".to_string()
}

fn default_model_id() -> String {
    shared::DEFAULT_MODEL.to_string()
}

/// All application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Base URL of the mesh generation service
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Full URL of the code generation endpoint
    #[serde(default = "default_codegen_url")]
    pub codegen_url: String,
    /// Language model used for code generation
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default)]
    pub selection: SelectionSettings,
    /// Grid settings
    #[serde(default)]
    pub grid: GridSettings,
    /// Axis settings
    #[serde(default)]
    pub axes: AxisSettings,
    /// Viewport settings
    #[serde(default)]
    pub viewport: ViewportSettings,
    /// UI settings
    #[serde(default)]
    pub ui: UiSettings,
    /// File values of URLs replaced by environment overrides; these are what gets saved
    #[serde(skip)]
    overridden: OverriddenUrls,
}

#[derive(Debug, Clone, Default)]
struct OverriddenUrls {
    backend_url: Option<String>,
    codegen_url: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            codegen_url: default_codegen_url(),
            model_id: default_model_id(),
            selection: SelectionSettings::default(),
            grid: GridSettings::default(),
            axes: AxisSettings::default(),
            viewport: ViewportSettings::default(),
            ui: UiSettings::default(),
            overridden: OverriddenUrls::default(),
        }
    }
}

impl AppSettings {
    /// Load settings from file, or return default if not found.
    /// Environment overrides are applied on top.
    pub fn load() -> Self {
        let mut settings = Self::load_file().unwrap_or_default();
        settings.apply_overrides(|key| std::env::var(key).ok());
        settings
    }

    fn load_file() -> Option<Self> {
        let dirs = directories::ProjectDirs::from("com", "nfinit", "nfinit")?;
        let config_path = dirs.config_dir().join("settings.json");
        let json = std::fs::read_to_string(&config_path).ok()?;
        match serde_json::from_str(&json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(path = %config_path.display(), "Ignoring unreadable settings: {e}");
                None
            }
        }
    }

    /// Override service URLs from `lookup` (normally the process environment).
    /// Overrides last for the session only; [`AppSettings::save`] keeps the file values.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
            let file_value = std::mem::replace(&mut self.backend_url, url);
            self.overridden.backend_url.get_or_insert(file_value);
        }
        if let Some(url) = lookup(ENV_CODEGEN_URL).filter(|v| !v.trim().is_empty()) {
            let file_value = std::mem::replace(&mut self.codegen_url, url);
            self.overridden.codegen_url.get_or_insert(file_value);
        }
    }

    /// The settings as they should be written to disk, without session overrides
    pub fn persisted(&self) -> AppSettings {
        let mut out = self.clone();
        if let Some(url) = out.overridden.backend_url.take() {
            out.backend_url = url;
        }
        if let Some(url) = out.overridden.codegen_url.take() {
            out.codegen_url = url;
        }
        out
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "nfinit", "nfinit") {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(&self.persisted()) {
                    if let Err(e) = std::fs::write(config_path, json) {
                        tracing::warn!("Failed to save settings: {e}");
                    }
                }
            }
        }
    }

    /// Endpoint the mesh generation collaborator is called on
    pub fn mesh_endpoint(&self) -> String {
        format!("{}/generate-mesh", self.backend_url.trim_end_matches('/'))
    }
}
