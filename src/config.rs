//! User settings, read from `settings.json` in the OS config directory.
//!
//! Every struct carries `#[serde(default)]` so that a partial JSON file is
//! valid: missing keys fall back to the built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::timeline::{Granularity, WeekStart};

/// Largest range padding accepted from the settings file, in days.
pub const MAX_RANGE_PAD_DAYS: i64 = 3650;

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Pixel width of one header cell at each granularity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellWidths {
    pub day: f32,
    pub week: f32,
    pub month: f32,
}

impl Default for CellWidths {
    fn default() -> Self {
        Self {
            day: 50.0,
            week: 100.0,
            month: 180.0,
        }
    }
}

impl CellWidths {
    pub fn for_granularity(&self, granularity: Granularity) -> f32 {
        match granularity {
            Granularity::Day => self.day,
            Granularity::Week => self.week,
            Granularity::Month => self.month,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GanttConfig {
    pub cell_widths: CellWidths,
    pub row_height: f32,
    pub header_height: f32,
    /// Initial widths of the task grid columns: name, start, end, progress.
    pub column_widths: Vec<f32>,
    pub min_column_width: f32,
    /// Narrowest actual bar the chart draws; also the floor used for
    /// progress-drag math so zero-length tasks never divide by zero.
    pub min_bar_width: f32,
    pub min_baseline_width: f32,
    /// Days of margin before the earliest date in the timeline range.
    pub range_lead_days: i64,
    /// Days of buffer after the latest date in the timeline range.
    pub range_tail_days: i64,
    pub week_start: WeekStart,
    pub default_granularity: Granularity,
    /// Program and arguments for the schedule analyzer. Empty disables it.
    pub analysis_command: Vec<String>,
}

impl Default for GanttConfig {
    fn default() -> Self {
        Self {
            cell_widths: CellWidths::default(),
            row_height: 40.0,
            header_height: 56.0,
            column_widths: vec![250.0, 110.0, 110.0, 80.0],
            min_column_width: 40.0,
            min_bar_width: 30.0,
            min_baseline_width: 10.0,
            range_lead_days: 1,
            range_tail_days: 7,
            week_start: WeekStart::Sunday,
            default_granularity: Granularity::Day,
            analysis_command: Vec::new(),
        }
    }
}

impl GanttConfig {
    /// Default location of the settings file.
    pub fn default_path() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "GanttTimeline") {
            proj_dirs.config_dir().join("settings.json")
        } else {
            PathBuf::from("settings.json")
        }
    }

    /// Read settings from `path`, rejecting values the geometry cannot use.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|field| ConfigError::Invalid {
            path: path.to_path_buf(),
            field,
        })?;
        Ok(config)
    }

    /// Name of the first setting out of range, if any. Widths and heights
    /// must be positive; range padding must lie in `0..=MAX_RANGE_PAD_DAYS`.
    pub fn validate(&self) -> Result<(), &'static str> {
        let widths = [
            ("cell_widths.day", self.cell_widths.day),
            ("cell_widths.week", self.cell_widths.week),
            ("cell_widths.month", self.cell_widths.month),
            ("row_height", self.row_height),
            ("header_height", self.header_height),
            ("min_column_width", self.min_column_width),
            ("min_bar_width", self.min_bar_width),
            ("min_baseline_width", self.min_baseline_width),
        ];
        if let Some((field, _)) = widths.iter().find(|(_, value)| !positive(*value)) {
            return Err(*field);
        }
        if self.column_widths.is_empty() || !self.column_widths.iter().all(|w| positive(*w)) {
            return Err("column_widths");
        }
        let pad = 0..=MAX_RANGE_PAD_DAYS;
        if !pad.contains(&self.range_lead_days) {
            return Err("range_lead_days");
        }
        if !pad.contains(&self.range_tail_days) {
            return Err("range_tail_days");
        }
        Ok(())
    }

    /// Read settings from the default location, falling back to defaults when
    /// the file is missing or unreadable.
    pub fn load() -> Self {
        let path = Self::default_path();
        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("loaded settings from {}", path.display());
                config
            }
            Err(ConfigError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                log::debug!("no settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn cell_width(&self, granularity: Granularity) -> f32 {
        self.cell_widths.for_granularity(granularity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: GanttConfig =
            serde_json::from_str(r#"{ "cell_widths": { "week": 140 }, "week_start": "monday" }"#)
                .unwrap();
        assert_eq!(config.cell_widths.week, 140.0);
        assert_eq!(config.cell_widths.day, 50.0);
        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.column_widths, vec![250.0, 110.0, 110.0, 80.0]);
    }

    fn load_json(name: &str, json: &str) -> Result<GanttConfig, ConfigError> {
        let path = std::env::temp_dir().join(format!(
            "gantt-timeline-{name}-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, json).unwrap();
        let result = GanttConfig::load_from(&path);
        std::fs::remove_file(&path).ok();
        result
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(GanttConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_cell_width_is_rejected() {
        let err = load_json("zero-cell", r#"{ "cell_widths": { "day": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "cell_widths.day", .. }));
    }

    #[test]
    fn bad_widths_and_padding_are_rejected() {
        let cases = [
            (r#"{ "column_widths": [250, -1] }"#, "column_widths"),
            (r#"{ "column_widths": [] }"#, "column_widths"),
            (r#"{ "min_bar_width": 0 }"#, "min_bar_width"),
            (r#"{ "cell_widths": { "month": -180 } }"#, "cell_widths.month"),
            (r#"{ "range_lead_days": -1 }"#, "range_lead_days"),
            (r#"{ "range_tail_days": 9223372036854775807 }"#, "range_tail_days"),
        ];
        for (json, expected) in cases {
            let config: GanttConfig = serde_json::from_str(json).unwrap();
            assert_eq!(config.validate(), Err(expected), "{json}");
        }
    }

    #[test]
    fn valid_file_loads() {
        let config = load_json("valid", r#"{ "range_tail_days": 14 }"#).unwrap();
        assert_eq!(config.range_tail_days, 14);
    }

    #[test]
    fn missing_file_is_read_error() {
        let path = std::env::temp_dir().join("gantt-timeline-missing-settings.json");
        let err = GanttConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let path = std::env::temp_dir().join(format!(
            "gantt-timeline-bad-settings-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{ not json").unwrap();
        let err = GanttConfig::load_from(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
