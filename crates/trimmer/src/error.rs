use std::fmt::{Display, Formatter};

/// Result type used by the trimmer crate.
pub type Result<T> = std::result::Result<T, TrimmerError>;

/// Errors produced when configuring the trimmer or describing its timeline.
///
/// Gesture, scroll and seek input never produce errors; malformed or
/// unresolvable input is dropped instead.
#[derive(Debug)]
pub enum TrimmerError {
    InvalidDurationLimits {
        min_tl: i64,
        max_tl: i64,
    },
    InvalidTimelineGeometry {
        content_width: f64,
        visible_width: f64,
    },
    InvalidControlWidth {
        name: &'static str,
        width: f64,
    },
    InvalidTimescale {
        timescale: i32,
    },
    ConfigSerialization(serde_json::Error),
}

impl Display for TrimmerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDurationLimits { min_tl, max_tl } => write!(
                f,
                "invalid duration limits: min {min_tl} must be positive and not above max {max_tl}"
            ),
            Self::InvalidTimelineGeometry {
                content_width,
                visible_width,
            } => write!(
                f,
                "invalid timeline geometry: content width {content_width}, visible width {visible_width}"
            ),
            Self::InvalidControlWidth { name, width } => {
                write!(f, "invalid {name} width: {width}")
            }
            Self::InvalidTimescale { timescale } => {
                write!(f, "invalid stream timescale {timescale}: must be positive")
            }
            Self::ConfigSerialization(err) => {
                write!(f, "trimmer config deserialization failed ({err})")
            }
        }
    }
}

impl std::error::Error for TrimmerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigSerialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TrimmerError {
    fn from(value: serde_json::Error) -> Self {
        Self::ConfigSerialization(value)
    }
}
