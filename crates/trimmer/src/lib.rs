//! UI-agnostic trim-range controller: two boundary handles laid out on a
//! scrollable timeline strip, and a playback cursor pinned to the visible
//! window over it.

pub mod api;
pub mod config;
pub mod cursor;
pub mod error;
pub mod handles;
pub mod time;
pub mod timeline;

pub use api::{
    Command, ControlLayout, ControlPoint, DragPhase, Event, ScrollPhase, SelectionSnapshot,
    Trimmer,
};
pub use config::TrimmerConfig;
pub use error::{Result, TrimmerError};
pub use handles::HandleSide;
pub use time::{StreamDuration, TICKS_PER_SECOND, seconds_to_ticks, ticks_to_seconds};
pub use timeline::{TimeMapper, Timeline};
