use serde::{Deserialize, Serialize};

use crate::error::{Result, TrimmerError};

/// Default minimum selectable duration: 3 seconds.
pub const DEFAULT_MIN_DURATION_TL: i64 = 3_000_000;
/// Default maximum selectable duration: 120 seconds.
pub const DEFAULT_MAX_DURATION_TL: i64 = 120_000_000;
pub const DEFAULT_HANDLE_WIDTH: f64 = 15.0;
pub const DEFAULT_CURSOR_WIDTH: f64 = 30.0;

/// Tunables for one trimmer instance.
///
/// Durations are timeline ticks, widths are pixels. Fields missing from a
/// serialized config take their defaults.
///
/// # Example
/// ```
/// use trimmer::TrimmerConfig;
///
/// let config = TrimmerConfig::from_json(r#"{ "max_duration_tl": 30000000 }"#)
///     .expect("valid config");
/// assert_eq!(config.min_duration_tl, 3_000_000);
/// assert_eq!(config.max_duration_tl, 30_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimmerConfig {
    pub min_duration_tl: i64,
    pub max_duration_tl: i64,
    pub handle_width: f64,
    pub cursor_width: f64,
}

impl Default for TrimmerConfig {
    fn default() -> Self {
        Self {
            min_duration_tl: DEFAULT_MIN_DURATION_TL,
            max_duration_tl: DEFAULT_MAX_DURATION_TL,
            handle_width: DEFAULT_HANDLE_WIDTH,
            cursor_width: DEFAULT_CURSOR_WIDTH,
        }
    }
}

impl TrimmerConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with new duration limits, validated.
    pub fn with_duration_limits(self, min_tl: i64, max_tl: i64) -> Result<Self> {
        let config = Self {
            min_duration_tl: min_tl,
            max_duration_tl: max_tl,
            ..self
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects non-positive or inverted duration limits and negative widths.
    pub fn validate(&self) -> Result<()> {
        validate_duration_limits(self.min_duration_tl, self.max_duration_tl)?;
        validate_width("handle", self.handle_width)?;
        validate_width("cursor", self.cursor_width)?;
        Ok(())
    }
}

fn validate_duration_limits(min_tl: i64, max_tl: i64) -> Result<()> {
    if min_tl <= 0 || max_tl <= 0 || min_tl > max_tl {
        return Err(TrimmerError::InvalidDurationLimits { min_tl, max_tl });
    }
    Ok(())
}

fn validate_width(name: &'static str, width: f64) -> Result<()> {
    if !width.is_finite() || width < 0.0 {
        return Err(TrimmerError::InvalidControlWidth { name, width });
    }
    Ok(())
}
