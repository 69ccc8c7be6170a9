use serde::{Deserialize, Serialize};

use crate::error::{Result, TrimmerError};
use crate::time::StreamDuration;

/// The media being trimmed and the strip it is laid out on.
///
/// `content_width` is the full scrollable width the asset is laid out on.
/// `visible_width` is the window onto it between the container's handle
/// gutters; it only bounds how far the content can scroll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub duration_tl: i64,
    pub content_width: f64,
    pub visible_width: f64,
}

impl Timeline {
    /// Creates a timeline with validated strip geometry.
    ///
    /// A non-positive duration is accepted; such a timeline simply cannot be
    /// mapped and every selection operation on it is a no-op.
    pub fn new(duration_tl: i64, content_width: f64, visible_width: f64) -> Result<Self> {
        let timeline = Self {
            duration_tl,
            content_width,
            visible_width,
        };
        timeline.validate()?;
        Ok(timeline)
    }

    /// Creates a timeline from a duration in a container timescale.
    ///
    /// # Example
    /// ```
    /// use trimmer::{StreamDuration, Timeline};
    ///
    /// let duration = StreamDuration::new(36_000, 600).expect("valid");
    /// let timeline = Timeline::from_stream_duration(duration, 600.0, 300.0).expect("valid");
    /// assert_eq!(timeline.duration_tl, 60_000_000);
    /// assert_eq!(timeline.max_scroll_offset(), 300.0);
    /// ```
    pub fn from_stream_duration(
        duration: StreamDuration,
        content_width: f64,
        visible_width: f64,
    ) -> Result<Self> {
        Self::new(duration.to_ticks()?, content_width, visible_width)
    }

    /// Largest scroll offset the geometry allows.
    pub fn max_scroll_offset(&self) -> f64 {
        (self.content_width - self.visible_width).max(0.0)
    }

    pub fn validate(&self) -> Result<()> {
        validate_strip_geometry(self.content_width, self.visible_width)
    }
}

pub(crate) fn validate_strip_geometry(content_width: f64, visible_width: f64) -> Result<()> {
    let finite = content_width.is_finite() && visible_width.is_finite();
    if !finite || visible_width <= 0.0 || content_width < visible_width {
        return Err(TrimmerError::InvalidTimelineGeometry {
            content_width,
            visible_width,
        });
    }
    Ok(())
}

/// Linear mapping between timeline ticks and strip pixels.
///
/// Content positions are measured from the start of the scrollable content.
/// Strip positions are measured from the left edge of the fixed, non-scrolling
/// strip, so they shift by the scroll offset. Every conversion yields `None`
/// when no asset is loaded or its duration is not positive.
///
/// # Example
/// ```
/// use trimmer::{Timeline, TimeMapper};
///
/// let timeline = Timeline::new(10_000_000, 200.0, 100.0).expect("valid");
/// let mapper = TimeMapper::new(Some(&timeline), 50.0);
/// assert_eq!(mapper.position_to_time(0.0), Some(2_500_000));
/// assert_eq!(mapper.time_to_position(2_500_000), Some(0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeMapper {
    duration_tl: i64,
    content_width: f64,
    scroll_offset: f64,
}

impl TimeMapper {
    pub fn new(timeline: Option<&Timeline>, scroll_offset: f64) -> Self {
        match timeline {
            Some(timeline) => Self {
                duration_tl: timeline.duration_tl,
                content_width: timeline.content_width,
                scroll_offset,
            },
            None => Self {
                duration_tl: 0,
                content_width: 0.0,
                scroll_offset,
            },
        }
    }

    /// Returns true when times can be derived from positions.
    pub fn is_resolvable(&self) -> bool {
        self.duration_tl > 0 && self.content_width > 0.0
    }

    /// Maps a time to its x coordinate in content space.
    pub fn content_position(&self, t_tl: i64) -> Option<f64> {
        if !self.is_resolvable() {
            return None;
        }
        Some(t_tl as f64 / self.duration_tl as f64 * self.content_width)
    }

    /// Maps a content-space x coordinate to a time in `[0, duration]`.
    pub fn content_time(&self, x: f64) -> Option<i64> {
        if !self.is_resolvable() {
            return None;
        }
        let ratio = (x / self.content_width).clamp(0.0, 1.0);
        Some((ratio * self.duration_tl as f64).round() as i64)
    }

    /// Maps a time to its x coordinate on the fixed strip.
    pub fn time_to_position(&self, t_tl: i64) -> Option<f64> {
        self.content_position(t_tl).map(|x| x - self.scroll_offset)
    }

    /// Maps an x coordinate on the fixed strip to a time.
    pub fn position_to_time(&self, x: f64) -> Option<i64> {
        self.content_time(x + self.scroll_offset)
    }

    /// Width in pixels covered by `duration_tl`; zero when unresolvable.
    pub fn pixels_for_duration(&self, duration_tl: i64) -> f64 {
        self.content_position(duration_tl).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{TimeMapper, Timeline};
    use crate::error::TrimmerError;
    use crate::time::StreamDuration;

    #[test]
    fn new_rejects_content_narrower_than_visible_strip() {
        let result = Timeline::new(1_000_000, 90.0, 100.0);
        assert!(matches!(
            result,
            Err(TrimmerError::InvalidTimelineGeometry { .. })
        ));
    }

    #[test]
    fn new_rejects_non_finite_widths() {
        assert!(Timeline::new(1_000_000, f64::INFINITY, 100.0).is_err());
        assert!(Timeline::new(1_000_000, 100.0, f64::NAN).is_err());
    }

    #[test]
    fn from_stream_duration_converts_into_timeline_ticks() {
        let duration = StreamDuration::new(180_000, 90_000).expect("valid timescale");
        let timeline =
            Timeline::from_stream_duration(duration, 100.0, 100.0).expect("valid timeline");
        assert_eq!(timeline.duration_tl, 2_000_000);
    }

    #[test]
    fn from_stream_duration_rejects_zero_timescale() {
        let duration = StreamDuration {
            value: 180_000,
            timescale: 0,
        };
        assert!(matches!(
            Timeline::from_stream_duration(duration, 100.0, 100.0),
            Err(TrimmerError::InvalidTimescale { timescale: 0 })
        ));
    }

    #[test]
    fn max_scroll_offset_is_the_hidden_content_width() {
        let timeline = Timeline::new(1_000_000, 1_200.0, 600.0).expect("valid timeline");
        assert_eq!(timeline.max_scroll_offset(), 600.0);
        let fitted = Timeline::new(1_000_000, 600.0, 600.0).expect("valid timeline");
        assert_eq!(fitted.max_scroll_offset(), 0.0);
    }

    #[test]
    fn mapper_without_asset_resolves_nothing() {
        let mapper = TimeMapper::new(None, 0.0);
        assert_eq!(mapper.position_to_time(10.0), None);
        assert_eq!(mapper.time_to_position(10), None);
        assert_eq!(mapper.pixels_for_duration(3_000_000), 0.0);
    }

    #[test]
    fn zero_duration_asset_is_unresolvable() {
        let timeline = Timeline::new(0, 100.0, 100.0).expect("geometry is valid");
        let mapper = TimeMapper::new(Some(&timeline), 0.0);
        assert!(!mapper.is_resolvable());
        assert_eq!(mapper.content_time(50.0), None);
    }

    #[test]
    fn content_time_clamps_outside_the_strip() {
        let timeline = Timeline::new(10_000_000, 100.0, 100.0).expect("valid timeline");
        let mapper = TimeMapper::new(Some(&timeline), 0.0);
        assert_eq!(mapper.content_time(-5.0), Some(0));
        assert_eq!(mapper.content_time(500.0), Some(10_000_000));
    }

    #[test]
    fn position_round_trip_stays_within_one_pixel_of_time() {
        let timeline = Timeline::new(200_000_000, 1_234.5, 321.0).expect("valid timeline");
        let mapper = TimeMapper::new(Some(&timeline), 77.25);
        let one_pixel_tl = timeline.duration_tl as f64 / timeline.content_width;

        for t_tl in (0..=200_000_000).step_by(7_654_321) {
            let x = mapper.time_to_position(t_tl).expect("resolvable");
            let back = mapper.position_to_time(x).expect("resolvable");
            assert!(((back - t_tl) as f64).abs() <= one_pixel_tl);
        }
    }

    #[test]
    fn pixels_for_duration_scales_with_content_width() {
        let timeline = Timeline::new(60_000_000, 600.0, 300.0).expect("valid timeline");
        let mapper = TimeMapper::new(Some(&timeline), 0.0);
        assert!((mapper.pixels_for_duration(3_000_000) - 30.0).abs() < 1e-9);
    }
}
