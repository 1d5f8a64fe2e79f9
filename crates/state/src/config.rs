//! User-tunable settings persisted to `settings.toml`.
//!
//! Every timing constant and threshold of the carousel lives here, so the
//! defaults below are the reference behaviour. Missing keys fall back to
//! their defaults and an unreadable file falls back to `Settings::default()`.

use std::f32::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::ValidRange;
use crate::error::Result;

pub const CONFIG_FILE: &str = "settings.toml";
pub const APP_NAME: &str = "Memoir";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborMode {
    #[default]
    Clamped,
    Circular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CenterTapAction {
    #[default]
    ToggleVoice,
    Inert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog_path: Option<PathBuf>,
    pub fallback_detail: Option<String>,
    pub neighbors: NeighborMode,
    pub center_tap: CenterTapAction,
    pub range: RangeSettings,
    pub gesture: GestureSettings,
    pub hold: HoldSettings,
    pub idle: IdleSettings,
    pub entry: EntrySettings,
    pub scroll: ScrollSettings,
    pub launch: LaunchSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_path: None,
            fallback_detail: Some("media/hero.mp4".to_string()),
            neighbors: NeighborMode::default(),
            center_tap: CenterTapAction::default(),
            range: RangeSettings::default(),
            gesture: GestureSettings::default(),
            hold: HoldSettings::default(),
            idle: IdleSettings::default(),
            entry: EntrySettings::default(),
            scroll: ScrollSettings::default(),
            launch: LaunchSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeSettings {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Display months of the strip; days outside `start..=end` are shown disabled.
    pub strip_start: Option<NaiveDate>,
    pub strip_end: Option<NaiveDate>,
}

impl Default for RangeSettings {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2023, 12, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2025, 10, 31).unwrap_or_default(),
            strip_start: None,
            strip_end: None,
        }
    }
}

impl RangeSettings {
    pub fn valid_range(&self) -> Result<ValidRange> {
        ValidRange::new(self.start, self.end)
    }

    pub fn strip_bounds(&self) -> (NaiveDate, NaiveDate) {
        (
            self.strip_start.unwrap_or(self.start),
            self.strip_end.unwrap_or(self.end),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    pub timeline_mouse_threshold: f32,
    pub timeline_touch_threshold: f32,
    pub scroll_damping: f32,
    pub side_tilt_threshold: f32,
    pub center_tilt_threshold: f32,
    pub max_rotation: f32,
    pub double_tap_window_ms: f64,
    pub just_dragged_ms: f64,
    pub spring_back_ms: f64,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            timeline_mouse_threshold: 5.0,
            timeline_touch_threshold: 10.0,
            scroll_damping: 0.8,
            side_tilt_threshold: 10.0,
            center_tilt_threshold: 5.0,
            max_rotation: 25.0,
            double_tap_window_ms: 400.0,
            just_dragged_ms: 100.0,
            spring_back_ms: 600.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldSettings {
    pub duration_ms: f64,
}

impl Default for HoldSettings {
    fn default() -> Self {
        Self {
            duration_ms: 2_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleSettings {
    /// Radians per millisecond.
    pub speed: f32,
    pub max_rotation: f32,
    pub amplitude_x: f32,
    pub amplitude_y: f32,
    /// Left, center, right.
    pub phase_offsets: [f32; 3],
}

impl Default for IdleSettings {
    fn default() -> Self {
        Self {
            speed: 0.0004,
            max_rotation: 8.0,
            amplitude_x: 1.2,
            amplitude_y: 1.5,
            phase_offsets: [0.0, PI * 0.33, PI * 0.66],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntrySettings {
    pub center_falls_at_ms: f64,
    pub sides_slide_at_ms: f64,
    pub complete_at_ms: f64,
}

impl Default for EntrySettings {
    fn default() -> Self {
        Self {
            center_falls_at_ms: 100.0,
            sides_slide_at_ms: 700.0,
            complete_at_ms: 1_300.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollSettings {
    pub settle_epsilon: f32,
    pub settle_samples: u32,
    pub correction_threshold: f32,
    pub quiet_ms: f64,
    pub fallback_ms: f64,
    pub smooth_duration_ms: f64,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            settle_epsilon: 1.0,
            settle_samples: 3,
            correction_threshold: 2.0,
            quiet_ms: 300.0,
            fallback_ms: 1_500.0,
            smooth_duration_ms: 450.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchSettings {
    pub skip_landing: bool,
    pub logo_out_ms: f64,
    pub loading_ms: f64,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            skip_landing: false,
            logo_out_ms: 1_000.0,
            loading_ms: 2_000.0,
        }
    }
}

/// `<config dir>/Memoir/settings.toml`, when the platform has a config dir.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
}

/// Loads user settings, falling back to defaults when none are saved.
pub fn load() -> Settings {
    let Some(path) = config_path() else {
        return Settings::default();
    };
    if !path.exists() {
        return Settings::default();
    }
    load_from_path(&path).unwrap_or_else(|err| {
        log::warn!("failed to read {}: {err}", path.display());
        Settings::default()
    })
}

pub fn save(settings: &Settings) -> Result<()> {
    match config_path() {
        Some(path) => save_to_path(settings, &path),
        None => Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no config directory on this platform",
        )
        .into()),
    }
}

pub fn parse(content: &str) -> Result<Settings> {
    Ok(toml::from_str(content)?)
}

pub fn load_from_path(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)?;
    match parse(&content) {
        Ok(settings) => Ok(settings),
        Err(err) => {
            log::warn!("ignoring unreadable {}: {err}", path.display());
            Ok(Settings::default())
        }
    }
}

pub fn save_to_path(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(settings)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_flags() {
        let settings = Settings {
            neighbors: NeighborMode::Circular,
            center_tap: CenterTapAction::Inert,
            catalog_path: Some(PathBuf::from("/tmp/catalog.json")),
            ..Settings::default()
        };
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("nested").join(CONFIG_FILE);

        save_to_path(&settings, &path).expect("failed to save settings");
        let loaded = load_from_path(&path).expect("failed to load settings");

        assert_eq!(loaded.neighbors, NeighborMode::Circular);
        assert_eq!(loaded.center_tap, CenterTapAction::Inert);
        assert_eq!(loaded.catalog_path, settings.catalog_path);
        assert_eq!(loaded.range, settings.range);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[hold]\nduration_ms = 1500.0\n").expect("failed to write");

        let loaded = load_from_path(&path).expect("load should not error");
        assert_eq!(loaded.hold.duration_ms, 1_500.0);
        assert_eq!(loaded.gesture, GestureSettings::default());
        assert_eq!(loaded.entry.complete_at_ms, 1_300.0);
    }

    #[test]
    fn invalid_toml_falls_back_to_defaults() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "not = valid = toml").expect("failed to write");

        let loaded = load_from_path(&path).expect("load should not error");
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn parse_reports_type_errors() {
        assert!(matches!(
            parse("neighbors = \"sideways\""),
            Err(crate::error::Error::ConfigParse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().expect("failed to create temp dir");
        assert!(load_from_path(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn config_path_ends_with_app_file() {
        if let Some(path) = config_path() {
            assert!(path.ends_with(std::path::Path::new(APP_NAME).join(CONFIG_FILE)));
        }
    }

    #[test]
    fn strip_bounds_default_to_valid_range() {
        let range = RangeSettings::default();
        assert_eq!(range.strip_bounds(), (range.start, range.end));
        assert!(range.valid_range().is_ok());
    }
}
