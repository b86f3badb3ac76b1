// The track: owns its control points, curve and generated meshes.
//
// Racers only ever read a Track. Regeneration needs `&mut Track`, so it can
// never overlap a tick that is reading the same geometry.

use bevy_ecs::prelude::*;
use glam::Vec3;
use super::error::TrackError;
use super::lane::{self, Lane, LanePose, DEFAULT_FORWARD};
use super::spline::ClosedSpline;
use super::track_mesh::{build_from_spline, TrackConfig, TrackMesh};

#[derive(Component, Debug, Clone)]
pub struct Track {
    config: TrackConfig,
    spline: Option<ClosedSpline>,
    mesh: Option<TrackMesh>,
}

impl Track {
    /// Empty track: no curve, no meshes. Racers on it stay put until it is generated.
    pub fn new(config: TrackConfig) -> Self {
        Self { config, spline: None, mesh: None }
    }

    /// Build a track from a complete set of control points.
    pub fn with_control_points(points: &[Vec3], config: TrackConfig) -> Result<Self, TrackError> {
        let mut track = Self::new(config);
        let anchors: Vec<Option<Vec3>> = points.iter().copied().map(Some).collect();
        track.regenerate(&anchors)?;
        Ok(track)
    }

    /// Rebuild curve and meshes from authored anchors.
    ///
    /// On failure the previous curve and meshes stay in effect and a warning is
    /// logged; the error is also returned so the caller can surface it.
    pub fn regenerate(&mut self, anchors: &[Option<Vec3>]) -> Result<&TrackMesh, TrackError> {
        let built = self
            .config
            .validate()
            .and_then(|_| ClosedSpline::from_anchors(anchors))
            .map(|spline| {
                let mesh = build_from_spline(&spline, &self.config);
                (spline, mesh)
            });

        match built {
            Ok((spline, mesh)) => {
                self.spline = Some(spline);
                Ok(&*self.mesh.insert(mesh))
            }
            Err(err) => {
                log::warn!("Track not regenerated: {err}");
                Err(err)
            }
        }
    }

    /// Change the shape settings and rebuild from the current control points.
    /// An invalid config is rejected and the old one kept.
    pub fn reconfigure(&mut self, config: TrackConfig) -> Result<(), TrackError> {
        if let Err(err) = config.validate() {
            log::warn!("Track config rejected: {err}");
            return Err(err);
        }
        self.config = config;
        if let Some(spline) = &self.spline {
            self.mesh = Some(build_from_spline(spline, &self.config));
        }
        Ok(())
    }

    pub fn config(&self) -> &TrackConfig { &self.config }
    pub fn spline(&self) -> Option<&ClosedSpline> { self.spline.as_ref() }
    pub fn mesh(&self) -> Option<&TrackMesh> { self.mesh.as_ref() }

    /// True once a valid curve has been generated.
    pub fn is_ready(&self) -> bool { self.spline.is_some() }

    /// Point on the centerline at normalized position t (wrapped into [0, 1)).
    pub fn track_position(&self, t: f32) -> Option<Vec3> {
        self.spline.as_ref().map(|s| s.evaluate(t))
    }

    /// Lane position and forward at t, defaulting forward to +Z if the curve is degenerate there.
    pub fn lane_position(&self, t: f32, lane: Lane) -> Option<LanePose> {
        self.lane_pose(t, lane, DEFAULT_FORWARD)
    }

    /// Like `lane_position`, keeping `previous_forward` when the look-ahead is degenerate.
    pub fn lane_pose(&self, t: f32, lane: Lane, previous_forward: Vec3) -> Option<LanePose> {
        let spline = self.spline.as_ref()?;
        Some(lane::lane_pose(spline, self.config.lane_width, t, lane, previous_forward))
    }
}

impl Default for Track {
    fn default() -> Self {
        Self::new(TrackConfig::default())
    }
}
