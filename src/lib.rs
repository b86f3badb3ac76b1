// Two-lane looping racer: closed-spline track meshes, lane following and
// per-racer jump kinematics, driven one explicit tick at a time.

pub mod engine;

pub use engine::{
    build_track, ClosedSpline, Lane, Racer, RacerConfig, Selection, Track, TrackConfig, TrackError,
};
