use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::TrimmerConfig;
use crate::cursor::{CursorConstraints, max_position};
use crate::error::Result;
use crate::handles::{GapBounds, HandleConstraints, HandleSide};
use crate::time::StreamDuration;
use crate::timeline::{TimeMapper, Timeline, validate_strip_geometry};

/// A draggable control on the trimmer strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlPoint {
    Start,
    End,
    Cursor,
}

impl ControlPoint {
    pub fn handle_side(self) -> Option<HandleSide> {
        match self {
            Self::Start => Some(HandleSide::Start),
            Self::End => Some(HandleSide::End),
            Self::Cursor => None,
        }
    }
}

/// Lifecycle phase of a pan gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    Begin,
    Move,
    End,
    Cancel,
    Fail,
}

/// Phase of a scroll interaction on the strip content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollPhase {
    Scrolling,
    Decelerating,
    DraggingEnded { will_decelerate: bool },
    DecelerationEnded,
}

/// Commands accepted by the trimmer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Replaces the loaded asset and resets the selection. `None` clears it.
    LoadAsset { timeline: Option<Timeline> },
    /// Like `LoadAsset`, with the duration in the container's own timescale.
    LoadStream {
        duration: StreamDuration,
        content_width: f64,
        visible_width: f64,
    },
    /// Updates strip geometry for the loaded asset without resetting handles.
    Relayout {
        content_width: f64,
        visible_width: f64,
    },
    /// One pan gesture update. `delta_x` is the total translation since the
    /// gesture began, not the increment since the previous move.
    Drag {
        point: ControlPoint,
        phase: DragPhase,
        #[serde(default)]
        delta_x: f64,
    },
    /// Content scroll offset, clamped to `[0, content_width - visible_width]`.
    Scroll {
        offset: f64,
        phase: ScrollPhase,
    },
    /// Places the cursor at `t_tl`, clamped into the selection.
    Seek { t_tl: i64 },
    /// Places one handle at `t_tl`, clamped to the duration limits.
    PlaceHandle { side: HandleSide, t_tl: i64 },
    SetDurationLimits { min_tl: i64, max_tl: i64 },
}

/// Events emitted by the trimmer. Both carry the cursor time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    CursorChanged { t_tl: i64 },
    CursorSettled { t_tl: i64 },
}

/// Current selection in timeline ticks. Every field is `None` without a
/// resolvable asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionSnapshot {
    pub start_tl: Option<i64>,
    pub end_tl: Option<i64>,
    pub cursor_tl: Option<i64>,
}

/// Left edges of the three controls on the scrollable track.
///
/// The track is the full content width plus one handle width on each side.
/// Subtract `scroll_offset` from an x to get its position in the visible
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlLayout {
    pub track_width: f64,
    pub scroll_offset: f64,
    pub start_handle_x: f64,
    pub end_handle_x: f64,
    pub cursor_x: f64,
}

/// Trim-range interaction controller.
///
/// # Example
/// ```
/// use trimmer::{Command, ControlPoint, DragPhase, Event, Timeline, Trimmer};
///
/// let mut trimmer = Trimmer::new();
/// let timeline = Timeline::new(60_000_000, 600.0, 600.0).expect("valid");
/// trimmer
///     .handle_command(Command::LoadAsset { timeline: Some(timeline) })
///     .expect("load");
///
/// let events = trimmer
///     .handle_command(Command::Drag {
///         point: ControlPoint::Start,
///         phase: DragPhase::Begin,
///         delta_x: 0.0,
///     })
///     .expect("drag");
/// assert_eq!(events, vec![Event::CursorChanged { t_tl: 0 }]);
/// ```
#[derive(Debug, Default)]
pub struct Trimmer {
    config: TrimmerConfig,
    pending_config: Option<TrimmerConfig>,
    timeline: Option<Timeline>,
    scroll_offset: f64,
    handles: HandleConstraints,
    cursor: CursorConstraints,
}

impl Trimmer {
    /// Creates a trimmer with the default configuration and no asset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a trimmer with a validated configuration.
    pub fn with_config(config: TrimmerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Applies one command and returns emitted events.
    ///
    /// Only configuration and geometry commands can fail. Gesture, scroll and
    /// seek input that cannot be applied is dropped without events.
    pub fn handle_command(&mut self, command: Command) -> Result<Vec<Event>> {
        match command {
            Command::LoadAsset { timeline } => self.load_asset(timeline),
            Command::LoadStream {
                duration,
                content_width,
                visible_width,
            } => {
                let timeline =
                    Timeline::from_stream_duration(duration, content_width, visible_width)?;
                self.load_asset(Some(timeline))
            }
            Command::Relayout {
                content_width,
                visible_width,
            } => self.relayout(content_width, visible_width),
            Command::Drag {
                point,
                phase,
                delta_x,
            } => Ok(self.drag(point, phase, delta_x)),
            Command::Scroll { offset, phase } => Ok(self.scroll(offset, phase)),
            Command::Seek { t_tl } => {
                self.seek(t_tl);
                Ok(Vec::new())
            }
            Command::PlaceHandle { side, t_tl } => {
                self.place_handle(side, t_tl);
                Ok(Vec::new())
            }
            Command::SetDurationLimits { min_tl, max_tl } => {
                self.set_duration_limits(min_tl, max_tl)
            }
        }
    }

    pub fn config(&self) -> &TrimmerConfig {
        &self.config
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn is_dragging(&self, point: ControlPoint) -> bool {
        match point.handle_side() {
            Some(side) => self.handles.is_dragging(side),
            None => self.cursor.is_dragging(),
        }
    }

    /// Selected start time. Scrolling does not change it.
    pub fn start_time(&self) -> Option<i64> {
        self.mapper().content_time(self.handles.inset(HandleSide::Start))
    }

    /// Selected end time. Scrolling does not change it.
    pub fn end_time(&self) -> Option<i64> {
        let end_x = self.strip_width() - self.handles.inset(HandleSide::End);
        self.mapper().content_time(end_x)
    }

    /// Time under the cursor's left edge, kept inside
    /// `[start_time, end_time]`.
    pub fn cursor_time(&self) -> Option<i64> {
        let cursor_x = self.handles.inset(HandleSide::Start) + self.cursor.offset();
        let raw = self.mapper().content_time(cursor_x)?;
        let start = self.start_time()?;
        let end = self.end_time()?;
        Some(raw.clamp(start, end.max(start)))
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            start_tl: self.start_time(),
            end_tl: self.end_time(),
            cursor_tl: self.cursor_time(),
        }
    }

    pub fn layout(&self) -> ControlLayout {
        let handle_width = self.config.handle_width;
        let strip_width = self.strip_width();
        let start_inset = self.handles.inset(HandleSide::Start);
        ControlLayout {
            track_width: strip_width + 2.0 * handle_width,
            scroll_offset: self.scroll_offset,
            start_handle_x: start_inset,
            end_handle_x: handle_width + strip_width - self.handles.inset(HandleSide::End),
            cursor_x: handle_width + start_inset + self.cursor.offset(),
        }
    }

    fn load_asset(&mut self, timeline: Option<Timeline>) -> Result<Vec<Event>> {
        if let Some(timeline) = timeline.as_ref() {
            timeline.validate()?;
        }

        self.timeline = timeline;
        self.scroll_offset = 0.0;
        self.handles.reset();
        self.cursor.reset();
        self.apply_pending_config();

        let mapper = self.mapper();
        let pinned = match timeline {
            Some(timeline)
                if mapper.is_resolvable()
                    && timeline.duration_tl > self.config.max_duration_tl =>
            {
                let max_px = mapper.pixels_for_duration(self.config.max_duration_tl);
                self.handles.pin_max_gap(timeline.content_width, max_px);
                true
            }
            _ => false,
        };

        info!(
            duration_tl = ?timeline.map(|timeline| timeline.duration_tl),
            pinned_to_max_duration = pinned,
            start_tl = ?self.start_time(),
            end_tl = ?self.end_time(),
            "asset loaded"
        );
        Ok(Vec::new())
    }

    fn relayout(&mut self, content_width: f64, visible_width: f64) -> Result<Vec<Event>> {
        validate_strip_geometry(content_width, visible_width)?;
        let previous = self.snapshot();
        let Some(timeline) = self.timeline.as_mut() else {
            debug!(content_width, visible_width, "relayout ignored: no asset");
            return Ok(Vec::new());
        };
        timeline.content_width = content_width;
        timeline.visible_width = visible_width;
        self.scroll_offset = self.scroll_offset.clamp(0.0, timeline.max_scroll_offset());

        let mapper = self.mapper();
        let start_x = previous
            .start_tl
            .and_then(|t_tl| mapper.content_position(t_tl))
            .unwrap_or_else(|| self.handles.inset(HandleSide::Start));
        let end_inset = previous
            .end_tl
            .and_then(|t_tl| mapper.content_position(t_tl))
            .map(|x| content_width - x)
            .unwrap_or_else(|| self.handles.inset(HandleSide::End));
        self.handles.restore(start_x, end_inset, content_width);
        match previous.cursor_tl {
            Some(t_tl) => self.seek(t_tl),
            None => self.cursor.fit(self.cursor_max_position()),
        }

        debug!(content_width, visible_width, "relayout applied");
        Ok(Vec::new())
    }

    fn drag(&mut self, point: ControlPoint, phase: DragPhase, delta_x: f64) -> Vec<Event> {
        match phase {
            DragPhase::Begin => self.begin_drag(point),
            DragPhase::Move => self.update_drag(point, delta_x),
            DragPhase::End | DragPhase::Cancel | DragPhase::Fail => self.end_drag(point, phase),
        }
    }

    /// A `begin` on a control that is already dragging drops the stale
    /// session and opens a fresh one at the control's current position.
    fn begin_drag(&mut self, point: ControlPoint) -> Vec<Event> {
        if self.is_dragging(point) {
            warn!(?point, "drag began while already dragging; restarting session");
        }

        match point.handle_side() {
            Some(side) => self.handles.begin_drag(side),
            None => self.cursor.begin_drag(),
        }
        self.changed()
    }

    fn update_drag(&mut self, point: ControlPoint, delta_x: f64) -> Vec<Event> {
        if !self.is_dragging(point) {
            warn!(?point, delta_x, "drag move without begin ignored");
            return Vec::new();
        }
        if !delta_x.is_finite() {
            warn!(?point, delta_x, "drag move with non-finite translation ignored");
            return Vec::new();
        }

        let mapper = self.mapper();
        if !mapper.is_resolvable() {
            debug!(?point, "drag move ignored: no resolvable asset");
            return Vec::new();
        }

        match point.handle_side() {
            Some(side) => {
                let bounds = self.gap_bounds(&mapper);
                let strip_width = self.strip_width();
                let inset = self.handles.update_drag(side, delta_x, strip_width, bounds);
                let follow_tl = match side {
                    HandleSide::Start => self.start_time(),
                    HandleSide::End => self.end_time(),
                };
                if let Some(t_tl) = follow_tl {
                    self.seek(t_tl);
                }
                debug!(?side, delta_x, inset = ?inset, follow_tl = ?follow_tl, "handle drag applied");
            }
            None => {
                let max = self.cursor_max_position();
                let offset = self.cursor.update_drag(delta_x, max);
                debug!(delta_x, offset = ?offset, "cursor drag applied");
            }
        }

        self.changed()
    }

    fn end_drag(&mut self, point: ControlPoint, phase: DragPhase) -> Vec<Event> {
        let had_session = match point.handle_side() {
            Some(side) => self.handles.end_drag(side),
            None => self.cursor.end_drag(),
        };
        if !had_session {
            warn!(?point, ?phase, "drag end without active session ignored");
            return Vec::new();
        }

        self.apply_pending_config();
        self.settled()
    }

    fn scroll(&mut self, offset: f64, phase: ScrollPhase) -> Vec<Event> {
        if !offset.is_finite() {
            warn!(offset, "scroll with non-finite offset ignored");
            return Vec::new();
        }
        let max_offset = self
            .timeline
            .map(|timeline| timeline.max_scroll_offset())
            .unwrap_or(0.0);
        let clamped = offset.clamp(0.0, max_offset);
        if clamped != offset {
            warn!(offset, max_offset, "scroll offset out of range; clamped");
        }
        self.sync_to_scroll(clamped);

        match phase {
            ScrollPhase::Scrolling => self.changed(),
            ScrollPhase::Decelerating | ScrollPhase::DraggingEnded {
                will_decelerate: true,
            } => Vec::new(),
            ScrollPhase::DraggingEnded {
                will_decelerate: false,
            }
            | ScrollPhase::DecelerationEnded => self.settled(),
        }
    }

    /// Stores the new scroll offset. The cursor stays put in the visible
    /// window, so it slides over the content by the scroll delta and only
    /// the time it points at changes. It still stops at the handles.
    fn sync_to_scroll(&mut self, offset: f64) {
        let delta = offset - self.scroll_offset;
        self.scroll_offset = offset;
        let max = self.cursor_max_position();
        let cursor = self.cursor.shift(delta, max);
        debug!(offset, delta, cursor, cursor_tl = ?self.cursor_time(), "scroll synced");
    }

    fn seek(&mut self, t_tl: i64) {
        let Some(x) = self.mapper().content_position(t_tl) else {
            debug!(t_tl, "seek ignored: no resolvable asset");
            return;
        };
        let target = x - self.handles.inset(HandleSide::Start);
        let offset = self.cursor.force_seek(target, self.cursor_max_position());
        debug!(t_tl, offset, "cursor seeked");
    }

    fn place_handle(&mut self, side: HandleSide, t_tl: i64) {
        let mapper = self.mapper();
        let Some(x) = mapper.content_position(t_tl) else {
            debug!(?side, t_tl, "handle placement ignored: no resolvable asset");
            return;
        };

        let strip_width = self.strip_width();
        let inset = match side {
            HandleSide::Start => x,
            HandleSide::End => strip_width - x,
        };
        let bounds = self.gap_bounds(&mapper);
        let placed = self.handles.place(side, inset, strip_width, bounds);
        self.cursor.fit(self.cursor_max_position());
        debug!(?side, t_tl, inset = placed, "handle placed");
    }

    fn set_duration_limits(&mut self, min_tl: i64, max_tl: i64) -> Result<Vec<Event>> {
        let config = match self.config.with_duration_limits(min_tl, max_tl) {
            Ok(config) => config,
            Err(error) => {
                warn!(min_tl, max_tl, %error, "duration limits rejected");
                return Err(error);
            }
        };

        if self.any_drag_active() {
            debug!(min_tl, max_tl, "duration limits deferred until drag ends");
            self.pending_config = Some(config);
        } else {
            info!(min_tl, max_tl, "duration limits updated");
            self.config = config;
            self.pending_config = None;
        }
        Ok(Vec::new())
    }

    fn apply_pending_config(&mut self) {
        if self.any_drag_active() {
            return;
        }
        if let Some(config) = self.pending_config.take() {
            info!(
                min_tl = config.min_duration_tl,
                max_tl = config.max_duration_tl,
                "deferred duration limits applied"
            );
            self.config = config;
        }
    }

    fn any_drag_active(&self) -> bool {
        [ControlPoint::Start, ControlPoint::End, ControlPoint::Cursor]
            .into_iter()
            .any(|point| self.is_dragging(point))
    }

    fn changed(&self) -> Vec<Event> {
        self.cursor_time()
            .map(|t_tl| vec![Event::CursorChanged { t_tl }])
            .unwrap_or_default()
    }

    fn settled(&self) -> Vec<Event> {
        self.cursor_time()
            .map(|t_tl| vec![Event::CursorSettled { t_tl }])
            .unwrap_or_default()
    }

    fn mapper(&self) -> TimeMapper {
        TimeMapper::new(self.timeline.as_ref(), self.scroll_offset)
    }

    fn gap_bounds(&self, mapper: &TimeMapper) -> GapBounds {
        GapBounds::from_limits(
            mapper,
            self.config.min_duration_tl,
            self.config.max_duration_tl,
        )
    }

    /// Width the handles and cursor are laid out on: the whole content.
    fn strip_width(&self) -> f64 {
        self.timeline
            .as_ref()
            .map(|timeline| timeline.content_width)
            .unwrap_or(0.0)
    }

    fn cursor_max_position(&self) -> f64 {
        max_position(
            self.strip_width(),
            self.handles.inset(HandleSide::Start),
            self.handles.inset(HandleSide::End),
            self.config.cursor_width,
        )
    }
}
