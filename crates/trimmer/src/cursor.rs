/// Position bar offset, measured from the start handle's inner edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorConstraints {
    offset: f64,
    origin: Option<f64>,
}

/// Largest cursor offset that keeps the whole cursor between the handles.
///
/// Floored at zero so a selection narrower than the cursor pins it to the
/// start handle instead of pushing it past it.
pub fn max_position(strip_width: f64, start_inset: f64, end_inset: f64, cursor_width: f64) -> f64 {
    (strip_width - end_inset - start_inset - cursor_width).max(0.0)
}

impl CursorConstraints {
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.origin.is_some()
    }

    pub fn begin_drag(&mut self) {
        self.origin = Some(self.offset);
    }

    /// Moves the cursor by `delta_x` from the drag origin, clamped to
    /// `[0, max_position]`. Returns `None` without an active drag.
    pub fn update_drag(&mut self, delta_x: f64, max_position: f64) -> Option<f64> {
        let origin = self.origin?;
        Some(self.place(origin + delta_x, max_position))
    }

    pub fn end_drag(&mut self) -> bool {
        self.origin.take().is_some()
    }

    /// Places the cursor non-interactively at `offset`, clamped like a drag.
    pub fn force_seek(&mut self, offset: f64, max_position: f64) -> f64 {
        self.place(offset, max_position)
    }

    /// Slides the cursor by `delta`, clamped like a drag. An active drag
    /// origin slides with it so the gesture keeps tracking the pointer.
    pub fn shift(&mut self, delta: f64, max_position: f64) -> f64 {
        if let Some(origin) = self.origin.as_mut() {
            *origin += delta;
        }
        self.place(self.offset + delta, max_position)
    }

    /// Re-clamps the current offset after the handles moved.
    pub fn fit(&mut self, max_position: f64) {
        self.place(self.offset, max_position);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn place(&mut self, offset: f64, max_position: f64) -> f64 {
        self.offset = offset.clamp(0.0, max_position.max(0.0));
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::{CursorConstraints, max_position};

    #[test]
    fn max_position_leaves_room_for_cursor_width() {
        assert_eq!(max_position(300.0, 20.0, 50.0, 30.0), 200.0);
    }

    #[test]
    fn max_position_never_goes_negative() {
        assert_eq!(max_position(300.0, 140.0, 140.0, 30.0), 0.0);
    }

    #[test]
    fn drag_is_clamped_to_both_ends() {
        let mut cursor = CursorConstraints::default();
        cursor.begin_drag();

        assert_eq!(cursor.update_drag(250.0, 200.0), Some(200.0));
        assert_eq!(cursor.update_drag(-10.0, 200.0), Some(0.0));
        assert_eq!(cursor.update_drag(75.5, 200.0), Some(75.5));
    }

    #[test]
    fn drag_translation_is_relative_to_begin_offset() {
        let mut cursor = CursorConstraints::default();
        cursor.force_seek(40.0, 200.0);
        cursor.begin_drag();

        cursor.update_drag(10.0, 200.0);
        cursor.update_drag(20.0, 200.0);

        assert_eq!(cursor.offset(), 60.0);
    }

    #[test]
    fn update_without_begin_leaves_offset_untouched() {
        let mut cursor = CursorConstraints::default();
        cursor.force_seek(40.0, 200.0);

        assert_eq!(cursor.update_drag(10.0, 200.0), None);
        assert_eq!(cursor.offset(), 40.0);
    }

    #[test]
    fn repeated_end_is_a_no_op() {
        let mut cursor = CursorConstraints::default();
        cursor.begin_drag();
        assert!(cursor.end_drag());
        assert!(!cursor.end_drag());
    }

    #[test]
    fn shift_slides_offset_and_drag_origin() {
        let mut cursor = CursorConstraints::default();
        cursor.force_seek(40.0, 200.0);
        cursor.begin_drag();

        assert_eq!(cursor.shift(25.0, 200.0), 65.0);
        assert_eq!(cursor.update_drag(10.0, 200.0), Some(75.0));
        assert_eq!(cursor.shift(500.0, 200.0), 200.0);
    }

    #[test]
    fn fit_pulls_cursor_back_inside_a_narrower_selection() {
        let mut cursor = CursorConstraints::default();
        cursor.force_seek(150.0, 200.0);

        cursor.fit(90.0);

        assert_eq!(cursor.offset(), 90.0);
    }
}
