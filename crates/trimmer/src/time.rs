use serde::{Deserialize, Serialize};

use crate::error::{Result, TrimmerError};

/// Timeline ticks per second. Every `_tl` value in the crate is a microsecond.
pub const TICKS_PER_SECOND: i64 = 1_000_000;

/// Duration reported by a media container: `value` units of
/// `1 / timescale` seconds each.
///
/// # Example
/// ```
/// use trimmer::StreamDuration;
///
/// // 90 s at the 600 Hz timescale common in QuickTime files.
/// let duration = StreamDuration { value: 54_000, timescale: 600 };
/// assert_eq!(duration.to_ticks().expect("valid timescale"), 90_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDuration {
    pub value: i64,
    pub timescale: i32,
}

impl StreamDuration {
    pub fn new(value: i64, timescale: i32) -> Result<Self> {
        let duration = Self { value, timescale };
        duration.check_timescale()?;
        Ok(duration)
    }

    /// Converts to timeline ticks, rounding half away from zero and
    /// saturating at the `i64` range.
    pub fn to_ticks(self) -> Result<i64> {
        self.check_timescale()?;
        let scale = i128::from(self.timescale);
        let scaled = i128::from(self.value) * i128::from(TICKS_PER_SECOND);
        let half = scale / 2;
        let ticks = if scaled >= 0 {
            (scaled + half) / scale
        } else {
            (scaled - half) / scale
        };
        Ok(i64::try_from(ticks).unwrap_or(if ticks < 0 { i64::MIN } else { i64::MAX }))
    }

    fn check_timescale(self) -> Result<()> {
        if self.timescale <= 0 {
            return Err(TrimmerError::InvalidTimescale {
                timescale: self.timescale,
            });
        }
        Ok(())
    }
}

/// Converts seconds into timeline ticks, rounding to the nearest tick.
pub fn seconds_to_ticks(seconds: f64) -> i64 {
    (seconds * TICKS_PER_SECOND as f64).round() as i64
}

pub fn ticks_to_seconds(t_tl: i64) -> f64 {
    t_tl as f64 / TICKS_PER_SECOND as f64
}
