//! Typed configuration loaded from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `SKETCHBOARD_STATE_PATH` | `sketchboard.json` |
//! | `SKETCHBOARD_STYLE` | `colorful` |
//! | `SKETCHBOARD_BEND` | `true` |
//! | `SKETCHBOARD_CURVE_STRENGTH` | `0.7` |
//! | `SKETCHBOARD_ORIGIN_X` / `SKETCHBOARD_ORIGIN_Y` | `100` / `100` |
//! | `SKETCHBOARD_SCREEN_W` / `SKETCHBOARD_SCREEN_H` | `1280` / `800` |
//!
//! Unparseable numbers and booleans fall back to their defaults. An unknown
//! style is an error.

use std::path::PathBuf;

use canvas::camera::Point;

use crate::diagram::{CompileOptions, StylePreset};
use crate::import::ImportOptions;

const DEFAULT_STATE_PATH: &str = "sketchboard.json";
const DEFAULT_BEND: bool = true;
const DEFAULT_CURVE_STRENGTH: f64 = 0.7;
const DEFAULT_ORIGIN: f64 = 100.0;
const DEFAULT_SCREEN_W: f64 = 1280.0;
const DEFAULT_SCREEN_H: f64 = 800.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid SKETCHBOARD_STYLE `{0}`: expected colorful or serious")]
    InvalidStyle(String),
}

impl ConfigError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidStyle(_) => "E_CONFIG_STYLE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    /// Where the saved document lives.
    pub state_path: PathBuf,
    pub style: StylePreset,
    pub enable_bend: bool,
    pub curve_strength: f64,
    pub origin: Point,
    pub screen_width: f64,
    pub screen_height: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            style: StylePreset::default(),
            enable_bend: DEFAULT_BEND,
            curve_strength: DEFAULT_CURVE_STRENGTH,
            origin: Point::new(DEFAULT_ORIGIN, DEFAULT_ORIGIN),
            screen_width: DEFAULT_SCREEN_W,
            screen_height: DEFAULT_SCREEN_H,
        }
    }
}

impl BoardConfig {
    /// Load from `SKETCHBOARD_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStyle`] when `SKETCHBOARD_STYLE` names
    /// an unknown preset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let style = match std::env::var("SKETCHBOARD_STYLE") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse::<StylePreset>().map_err(|_| ConfigError::InvalidStyle(raw))?,
            _ => StylePreset::default(),
        };
        let state_path = std::env::var("SKETCHBOARD_STATE_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STATE_PATH), PathBuf::from);

        Ok(Self {
            state_path,
            style,
            enable_bend: env_parse("SKETCHBOARD_BEND", DEFAULT_BEND),
            curve_strength: env_parse("SKETCHBOARD_CURVE_STRENGTH", DEFAULT_CURVE_STRENGTH),
            origin: Point::new(
                env_parse("SKETCHBOARD_ORIGIN_X", DEFAULT_ORIGIN),
                env_parse("SKETCHBOARD_ORIGIN_Y", DEFAULT_ORIGIN),
            ),
            screen_width: env_parse("SKETCHBOARD_SCREEN_W", DEFAULT_SCREEN_W),
            screen_height: env_parse("SKETCHBOARD_SCREEN_H", DEFAULT_SCREEN_H),
        })
    }

    #[must_use]
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions { enable_bend: self.enable_bend, style: self.style, curve_strength: self.curve_strength }
    }

    #[must_use]
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            origin: self.origin,
            compile: self.compile_options(),
            screen_width: self.screen_width,
            screen_height: self.screen_height,
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
