use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::callout::DEFAULT_FREEHAND_STROKE_WIDTH;
use crate::geometry::HexColor;
use crate::shapes::DEFAULT_MIN_PIXEL_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "stepmark";
const APP_CONFIG_FILE: &str = "config.json";
const DEFAULT_CALLOUT_COLOR: HexColor = HexColor::new(0xef, 0x44, 0x44);

/// Overlay settings from `config.json`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Minimum on-screen side of point callouts, applied by both renderers.
    pub min_pixel_size: f64,
    pub default_color: String,
    pub freehand_stroke_width: f64,
    /// Render reveal callouts as disclosures in exported HTML.
    pub export_interactive: bool,
    /// Width of the exported image box in percent of the page.
    pub image_box_percent: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            min_pixel_size: DEFAULT_MIN_PIXEL_SIZE,
            default_color: DEFAULT_CALLOUT_COLOR.to_hex(),
            freehand_stroke_width: DEFAULT_FREEHAND_STROKE_WIDTH,
            export_interactive: false,
            image_box_percent: 100.0,
        }
    }
}

impl OverlayConfig {
    pub fn default_color(&self) -> HexColor {
        HexColor::parse(&self.default_color).unwrap_or(DEFAULT_CALLOUT_COLOR)
    }

    pub fn min_pixel_size(&self) -> f64 {
        if self.min_pixel_size.is_finite() && self.min_pixel_size >= 0.0 {
            self.min_pixel_size
        } else {
            DEFAULT_MIN_PIXEL_SIZE
        }
    }

    pub fn freehand_stroke_width(&self) -> f64 {
        if self.freehand_stroke_width.is_finite() && self.freehand_stroke_width > 0.0 {
            self.freehand_stroke_width
        } else {
            DEFAULT_FREEHAND_STROKE_WIDTH
        }
    }

    pub fn image_box_percent(&self) -> f64 {
        if self.image_box_percent.is_finite() && self.image_box_percent > 0.0 {
            self.image_box_percent.min(100.0)
        } else {
            100.0
        }
    }
}

pub fn load_overlay_config() -> OverlayConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_overlay_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_overlay_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> OverlayConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return OverlayConfig::default(),
    };
    if !path.exists() {
        return OverlayConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => parse_overlay_config(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            OverlayConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            OverlayConfig::default()
        }
    }
}

pub fn parse_overlay_config(contents: &str) -> Result<OverlayConfig, serde_json::Error> {
    serde_json::from_str(contents)
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
