//! Runtime tunables for the editor engine, parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: cannot parse '{value}'")]
    Parse { key: &'static str, value: String },
    #[error("{key}: {reason}")]
    OutOfRange { key: &'static str, reason: &'static str },
}

/// Every constant the engine consults at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub history_depth: usize,
    pub grid_step: f64,
    pub grid_threshold: f64,
    pub object_snap_threshold: f64,
    pub rotation_snap_deg: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub max_position: f64,
    pub duplicate_offset: f64,
    pub paste_offset: f64,
    pub anchor_gap: f64,
    pub nudge_step: f64,
    pub autoscale_reference_px: f64,
    pub glyph_width_ratio: f64,
    pub min_font_size: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_depth: consts::HISTORY_DEPTH,
            grid_step: consts::GRID_STEP,
            grid_threshold: consts::GRID_THRESHOLD,
            object_snap_threshold: consts::OBJECT_SNAP_THRESHOLD,
            rotation_snap_deg: consts::ROTATION_SNAP_DEG,
            min_width: consts::MIN_WIDTH,
            min_height: consts::MIN_HEIGHT,
            max_position: consts::MAX_POSITION,
            duplicate_offset: consts::DUPLICATE_OFFSET,
            paste_offset: consts::PASTE_OFFSET,
            anchor_gap: consts::ANCHOR_GAP,
            nudge_step: consts::NUDGE_STEP,
            autoscale_reference_px: consts::AUTOSCALE_REFERENCE_PX,
            glyph_width_ratio: consts::GLYPH_WIDTH_RATIO,
            min_font_size: consts::MIN_FONT_SIZE,
            min_zoom: consts::MIN_ZOOM,
            max_zoom: consts::MAX_ZOOM,
        }
    }
}

impl Settings {
    /// Build settings from environment variables.
    ///
    /// All optional; absent variables keep the default:
    /// - `POSTCANVAS_HISTORY_DEPTH`: default 50
    /// - `POSTCANVAS_GRID_STEP`: default 5
    /// - `POSTCANVAS_GRID_THRESHOLD`: default 2
    /// - `POSTCANVAS_OBJECT_SNAP_THRESHOLD`: default 0.5
    /// - `POSTCANVAS_ROTATION_SNAP_DEG`: default 15
    /// - `POSTCANVAS_MIN_WIDTH`: default 5
    /// - `POSTCANVAS_MIN_HEIGHT`: default 3
    /// - `POSTCANVAS_MAX_POSITION`: default 95, at most 100
    /// - `POSTCANVAS_DUPLICATE_OFFSET`: default 3
    /// - `POSTCANVAS_PASTE_OFFSET`: default 5
    /// - `POSTCANVAS_ANCHOR_GAP`: default 2
    /// - `POSTCANVAS_NUDGE_STEP`: default 1
    /// - `POSTCANVAS_AUTOSCALE_REFERENCE_PX`: default 1000
    /// - `POSTCANVAS_GLYPH_WIDTH_RATIO`: default 0.55
    /// - `POSTCANVAS_MIN_FONT_SIZE`: default 10
    /// - `POSTCANVAS_MIN_ZOOM`: default 0.1
    /// - `POSTCANVAS_MAX_ZOOM`: default 5, above the minimum
    ///
    /// A value that is not valid unicode is reported as unparseable.
    ///
    /// # Errors
    ///
    /// Returns an error if a present variable does not parse or is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var_os(key).map(|v| v.to_string_lossy().into_owned()))
    }

    /// Build settings from any key lookup. `from_env` delegates here.
    ///
    /// # Errors
    ///
    /// Returns an error if a present value does not parse or is out of range.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut s = Self::default();

        if let Some(raw) = lookup("POSTCANVAS_HISTORY_DEPTH") {
            let depth = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::Parse { key: "POSTCANVAS_HISTORY_DEPTH", value: raw.clone() })?;
            if depth == 0 {
                return Err(ConfigError::OutOfRange { key: "POSTCANVAS_HISTORY_DEPTH", reason: "must be at least 1" });
            }
            s.history_depth = depth;
        }
        s.grid_step = positive(&lookup, "POSTCANVAS_GRID_STEP", s.grid_step)?;
        s.grid_threshold = positive(&lookup, "POSTCANVAS_GRID_THRESHOLD", s.grid_threshold)?;
        s.object_snap_threshold = positive(&lookup, "POSTCANVAS_OBJECT_SNAP_THRESHOLD", s.object_snap_threshold)?;
        s.rotation_snap_deg = positive(&lookup, "POSTCANVAS_ROTATION_SNAP_DEG", s.rotation_snap_deg)?;
        s.min_width = positive(&lookup, "POSTCANVAS_MIN_WIDTH", s.min_width)?;
        s.min_height = positive(&lookup, "POSTCANVAS_MIN_HEIGHT", s.min_height)?;
        s.max_position = positive(&lookup, "POSTCANVAS_MAX_POSITION", s.max_position)?;
        s.duplicate_offset = positive(&lookup, "POSTCANVAS_DUPLICATE_OFFSET", s.duplicate_offset)?;
        s.paste_offset = positive(&lookup, "POSTCANVAS_PASTE_OFFSET", s.paste_offset)?;
        s.anchor_gap = positive(&lookup, "POSTCANVAS_ANCHOR_GAP", s.anchor_gap)?;
        s.nudge_step = positive(&lookup, "POSTCANVAS_NUDGE_STEP", s.nudge_step)?;
        s.autoscale_reference_px = positive(&lookup, "POSTCANVAS_AUTOSCALE_REFERENCE_PX", s.autoscale_reference_px)?;
        s.glyph_width_ratio = positive(&lookup, "POSTCANVAS_GLYPH_WIDTH_RATIO", s.glyph_width_ratio)?;
        s.min_font_size = positive(&lookup, "POSTCANVAS_MIN_FONT_SIZE", s.min_font_size)?;
        s.min_zoom = positive(&lookup, "POSTCANVAS_MIN_ZOOM", s.min_zoom)?;
        s.max_zoom = positive(&lookup, "POSTCANVAS_MAX_ZOOM", s.max_zoom)?;

        if s.min_width >= 100.0 {
            return Err(ConfigError::OutOfRange { key: "POSTCANVAS_MIN_WIDTH", reason: "must be below 100" });
        }
        if s.min_height >= 100.0 {
            return Err(ConfigError::OutOfRange { key: "POSTCANVAS_MIN_HEIGHT", reason: "must be below 100" });
        }
        if s.max_position > 100.0 {
            return Err(ConfigError::OutOfRange { key: "POSTCANVAS_MAX_POSITION", reason: "must be at most 100" });
        }
        if s.min_zoom >= s.max_zoom {
            return Err(ConfigError::OutOfRange { key: "POSTCANVAS_MAX_ZOOM", reason: "must be above the minimum zoom" });
        }
        Ok(s)
    }
}

fn positive<F>(lookup: &F, key: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::Parse { key, value: raw.clone() })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::OutOfRange { key, reason: "must be a positive number" });
    }
    Ok(value)
}
