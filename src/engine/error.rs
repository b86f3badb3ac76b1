// Error taxonomy for track generation and racer updates.
// Every variant is recoverable: callers keep their previous state and carry on.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TrackError {
    /// A closed curve needs at least three anchors.
    InsufficientControlPoints { found: usize },
    /// An authored anchor slot is empty.
    MissingControlPoint { index: usize },
    /// A numeric setting is non-positive or not finite.
    InvalidConfig { field: &'static str, value: f32 },
    /// A racer was ticked without a usable track.
    MissingTrack,
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackError::InsufficientControlPoints { found } => {
                write!(f, "Need at least 3 control points to generate a track, found {found}")
            }
            TrackError::MissingControlPoint { index } => {
                write!(f, "Control point {index} is not assigned")
            }
            TrackError::InvalidConfig { field, value } => {
                write!(f, "Invalid track setting {field} = {value}")
            }
            TrackError::MissingTrack => write!(f, "No track assigned"),
        }
    }
}

impl std::error::Error for TrackError {}
