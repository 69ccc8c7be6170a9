use serde::{Deserialize, Serialize};

use crate::timeline::TimeMapper;

/// One of the two selection boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleSide {
    Start,
    End,
}

impl HandleSide {
    pub fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// Allowed distance between the handles' inner edges, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapBounds {
    pub min_px: f64,
    pub max_px: f64,
}

impl GapBounds {
    /// Converts duration limits to pixels for the loaded timeline.
    ///
    /// Without a resolvable asset both bounds are zero.
    pub fn from_limits(mapper: &TimeMapper, min_duration_tl: i64, max_duration_tl: i64) -> Self {
        Self {
            min_px: mapper.pixels_for_duration(min_duration_tl),
            max_px: mapper.pixels_for_duration(max_duration_tl),
        }
    }
}

/// Positions of the start and end handles.
///
/// Each handle is stored as an inset measured inward from its own edge of the
/// strip: the start inset from the left edge, the end inset from the right
/// edge. The gap between the handles is therefore
/// `strip_width - start_inset - end_inset`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandleConstraints {
    start_inset: f64,
    end_inset: f64,
    start_origin: Option<f64>,
    end_origin: Option<f64>,
}

impl HandleConstraints {
    pub fn inset(&self, side: HandleSide) -> f64 {
        match side {
            HandleSide::Start => self.start_inset,
            HandleSide::End => self.end_inset,
        }
    }

    pub fn gap_px(&self, strip_width: f64) -> f64 {
        strip_width - self.start_inset - self.end_inset
    }

    pub fn is_dragging(&self, side: HandleSide) -> bool {
        self.origin(side).is_some()
    }

    /// Snapshots the current inset of `side` as the drag origin.
    pub fn begin_drag(&mut self, side: HandleSide) {
        let inset = self.inset(side);
        *self.origin_mut(side) = Some(inset);
    }

    /// Applies a horizontal drag translation measured from the drag origin.
    ///
    /// Returns the new inset, or `None` when `side` has no active drag.
    /// A positive `delta_x` moves either handle to the right, which grows the
    /// start inset and shrinks the end inset.
    pub fn update_drag(
        &mut self,
        side: HandleSide,
        delta_x: f64,
        strip_width: f64,
        bounds: GapBounds,
    ) -> Option<f64> {
        let origin = self.origin(side)?;
        let candidate = match side {
            HandleSide::Start => origin + delta_x,
            HandleSide::End => origin - delta_x,
        };
        Some(self.place(side, candidate, strip_width, bounds))
    }

    /// Clears the drag session of `side`. Returns false if none was active.
    pub fn end_drag(&mut self, side: HandleSide) -> bool {
        self.origin_mut(side).take().is_some()
    }

    /// Moves `side` to `inset`, clamped so the gap stays within `bounds`.
    ///
    /// A gap that would shrink below `bounds.min_px` snaps to exactly
    /// `min_px`, one that would grow past `bounds.max_px` snaps to exactly
    /// `max_px`. If the strip itself is narrower than `min_px` the handle
    /// is pinned to its edge.
    pub fn place(
        &mut self,
        side: HandleSide,
        inset: f64,
        strip_width: f64,
        bounds: GapBounds,
    ) -> f64 {
        let (lowest, highest) = self.allowed_range(side, strip_width, bounds);
        let clamped = inset.clamp(lowest, highest);
        match side {
            HandleSide::Start => self.start_inset = clamped,
            HandleSide::End => self.end_inset = clamped,
        }
        clamped
    }

    /// Inset range `side` may occupy given the opposite handle.
    pub fn allowed_range(&self, side: HandleSide, strip_width: f64, bounds: GapBounds) -> (f64, f64) {
        let room = strip_width - self.inset(side.opposite());
        let lowest = (room - bounds.max_px).max(0.0);
        let highest = (room - bounds.min_px).max(lowest);
        (lowest, highest)
    }

    /// Selects `max_px` from the start edge, or the whole strip if shorter.
    pub fn pin_max_gap(&mut self, strip_width: f64, max_px: f64) {
        self.reset();
        self.end_inset = (strip_width - max_px).clamp(0.0, strip_width.max(0.0));
    }

    /// Sets both insets directly, then fits them to the strip.
    pub fn restore(&mut self, start_inset: f64, end_inset: f64, strip_width: f64) {
        self.start_inset = start_inset;
        self.end_inset = end_inset;
        self.fit_to_strip(strip_width);
    }

    /// Pulls both insets back inside a strip that may have shrunk.
    pub fn fit_to_strip(&mut self, strip_width: f64) {
        let strip_width = strip_width.max(0.0);
        self.start_inset = self.start_inset.clamp(0.0, strip_width);
        self.end_inset = self.end_inset.clamp(0.0, strip_width - self.start_inset);
    }

    /// Selects the whole strip and drops any drag session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn origin(&self, side: HandleSide) -> Option<f64> {
        match side {
            HandleSide::Start => self.start_origin,
            HandleSide::End => self.end_origin,
        }
    }

    fn origin_mut(&mut self, side: HandleSide) -> &mut Option<f64> {
        match side {
            HandleSide::Start => &mut self.start_origin,
            HandleSide::End => &mut self.end_origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GapBounds, HandleConstraints, HandleSide};

    const STRIP: f64 = 300.0;
    const BOUNDS: GapBounds = GapBounds {
        min_px: 30.0,
        max_px: 200.0,
    };

    #[test]
    fn update_without_begin_is_ignored() {
        let mut handles = HandleConstraints::default();
        assert_eq!(
            handles.update_drag(HandleSide::Start, 40.0, STRIP, BOUNDS),
            None
        );
        assert_eq!(handles.inset(HandleSide::Start), 0.0);
    }

    #[test]
    fn start_drag_within_bounds_passes_through() {
        let mut handles = HandleConstraints::default();
        handles.place(HandleSide::End, 150.0, STRIP, BOUNDS);
        handles.begin_drag(HandleSide::Start);

        let inset = handles.update_drag(HandleSide::Start, 40.0, STRIP, BOUNDS);

        assert_eq!(inset, Some(40.0));
        assert_eq!(handles.gap_px(STRIP), 110.0);
    }

    #[test]
    fn start_drag_snaps_to_minimum_gap() {
        let mut handles = HandleConstraints::default();
        handles.begin_drag(HandleSide::Start);

        handles.update_drag(HandleSide::Start, 290.0, STRIP, BOUNDS);

        assert_eq!(handles.inset(HandleSide::Start), 270.0);
        assert_eq!(handles.gap_px(STRIP), BOUNDS.min_px);
    }

    #[test]
    fn end_drag_uses_inverted_polarity() {
        let wide = GapBounds {
            min_px: 30.0,
            max_px: 1_000.0,
        };
        let mut handles = HandleConstraints::default();
        handles.begin_drag(HandleSide::End);

        handles.update_drag(HandleSide::End, -25.0, STRIP, wide);
        assert_eq!(handles.inset(HandleSide::End), 25.0);

        handles.end_drag(HandleSide::End);
        handles.begin_drag(HandleSide::End);
        handles.update_drag(HandleSide::End, 10.0, STRIP, wide);
        assert_eq!(handles.inset(HandleSide::End), 15.0);
    }

    #[test]
    fn end_drag_snaps_to_maximum_gap() {
        let mut handles = HandleConstraints::default();
        handles.place(HandleSide::End, 150.0, STRIP, BOUNDS);
        handles.begin_drag(HandleSide::End);

        handles.update_drag(HandleSide::End, 500.0, STRIP, BOUNDS);

        assert_eq!(handles.inset(HandleSide::End), 100.0);
        assert_eq!(handles.gap_px(STRIP), BOUNDS.max_px);
    }

    #[test]
    fn strip_narrower_than_minimum_gap_keeps_full_selection() {
        let mut handles = HandleConstraints::default();
        handles.begin_drag(HandleSide::Start);

        handles.update_drag(HandleSide::Start, 10.0, 20.0, BOUNDS);

        assert_eq!(handles.inset(HandleSide::Start), 0.0);
        assert_eq!(handles.gap_px(20.0), 20.0);
    }

    #[test]
    fn second_end_drag_reports_no_session() {
        let mut handles = HandleConstraints::default();
        handles.begin_drag(HandleSide::Start);
        assert!(handles.end_drag(HandleSide::Start));
        assert!(!handles.end_drag(HandleSide::Start));
        assert!(!handles.is_dragging(HandleSide::Start));
    }

    #[test]
    fn pin_max_gap_anchors_selection_at_start_edge() {
        let mut handles = HandleConstraints::default();
        handles.pin_max_gap(STRIP, 180.0);
        assert_eq!(handles.inset(HandleSide::Start), 0.0);
        assert_eq!(handles.gap_px(STRIP), 180.0);

        handles.pin_max_gap(STRIP, 400.0);
        assert_eq!(handles.gap_px(STRIP), STRIP);
    }

    #[test]
    fn fit_to_strip_keeps_handles_from_crossing() {
        let mut handles = HandleConstraints::default();
        handles.place(HandleSide::Start, 120.0, STRIP, BOUNDS);
        handles.place(HandleSide::End, 100.0, STRIP, BOUNDS);

        handles.fit_to_strip(150.0);

        assert_eq!(handles.inset(HandleSide::Start), 120.0);
        assert_eq!(handles.inset(HandleSide::End), 30.0);
        assert!(handles.gap_px(150.0) >= 0.0);
    }
}
