// Engine module - track geometry, lane following and racer kinematics.

pub mod components;
pub mod error;
pub mod input;
pub mod lane;
pub mod mesh;
pub mod racer;
pub mod selection;
pub mod spline;
pub mod systems;
pub mod track;
pub mod track_mesh;

// Re-export commonly used items
pub use components::*;
pub use error::TrackError;
pub use lane::{Lane, LanePose};
pub use racer::{ActivationSignal, JumpState, Racer, RacerConfig, RacerPose};
pub use selection::{Marker, Selection, TargetStatus};
pub use spline::ClosedSpline;
pub use track::Track;
pub use track_mesh::{build_track, TrackConfig, TrackMesh};
