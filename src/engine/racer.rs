// Racer kinematics: progress along the loop, lane placement and the jump arc.
//
// State machine per racer:
//   Idle ──(activation matching this racer's identity)──▶ Jumping
//   Jumping ──(elapsed ≥ jump_duration)──▶ Idle
// Activation while already jumping is ignored.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use super::components::Color;
use super::error::TrackError;
use super::lane::{look_rotation, Lane, DEFAULT_FORWARD};
use super::spline::wrap_unit;
use super::track::Track;

/// Track fraction covered per second at speed 1.0.
pub const PROGRESS_RATE: f32 = 0.1;

/// Height the racer rides above its lane when not jumping.
pub const IDLE_ELEVATION: f32 = 0.3;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RacerConfig {
    /// Token matched against the externally selected identity (e.g. a car color).
    pub identity: String,
    pub lane: Lane,
    /// Speed multiplier. 0.1 – 10 is the useful range.
    pub speed: f32,
    /// Starting parameter on the track, clamped to [0, 1].
    pub start_position: f32,
    /// Peak of the jump arc above the idle elevation.
    pub jump_height: f32,
    /// Seconds from take-off to landing.
    pub jump_duration: f32,
    pub color: Color,
}

impl Default for RacerConfig {
    fn default() -> Self {
        Self {
            identity: String::new(),
            lane: Lane::Left,
            speed: 1.0,
            start_position: 0.0,
            jump_height: 1.0,
            jump_duration: 0.5,
            color: Color::GREEN,
        }
    }
}

impl RacerConfig {
    pub fn new(identity: impl Into<String>) -> Self {
        Self { identity: identity.into(), ..Self::default() }
    }

    /// Every field must be finite and jump_duration non-negative.
    /// A zero jump duration lands on the next tick.
    pub fn validate(&self) -> Result<(), TrackError> {
        let check = |field: &'static str, value: f32, ok: bool| {
            if ok { Ok(()) } else { Err(TrackError::InvalidConfig { field, value }) }
        };
        check("speed", self.speed, self.speed.is_finite())?;
        check("start_position", self.start_position, self.start_position.is_finite())?;
        check("jump_height", self.jump_height, self.jump_height.is_finite())?;
        check(
            "jump_duration",
            self.jump_duration,
            self.jump_duration.is_finite() && self.jump_duration >= 0.0,
        )
    }
}

// ============================================================================
// TICK INPUTS AND OUTPUTS
// ============================================================================

/// What the input side reports for one tick: was there a tap/click, and which
/// racer identity is currently selected.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActivationSignal<'a> {
    pub activated: bool,
    pub selected: Option<&'a str>,
}

impl ActivationSignal<'static> {
    pub const NONE: Self = Self { activated: false, selected: None };
}

impl<'a> ActivationSignal<'a> {
    pub fn new(activated: bool, selected: Option<&'a str>) -> Self {
        Self { activated, selected }
    }

    pub fn matches(&self, identity: &str) -> bool {
        self.activated && self.selected == Some(identity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpState {
    Idle,
    Jumping { elapsed: f32 },
}

/// World transform for a racer after one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RacerPose {
    pub position: Vec3,
    pub rotation: Quat,
    pub forward: Vec3,
}

/// Parabolic jump offset: 0 at p = 0 and p = 1, `height` at p = 0.5.
pub fn jump_arc(height: f32, p: f32) -> f32 {
    4.0 * height * p * (1.0 - p)
}

// ============================================================================
// RACER
// ============================================================================

#[derive(Component, Debug, Clone)]
pub struct Racer {
    config: RacerConfig,
    current_position: f32,
    jump: JumpState,
    vertical_offset: f32,
    /// Last valid travel direction, kept when the track tangent degenerates.
    forward: Vec3,
    reported_missing_track: bool,
}

impl Racer {
    pub fn new(config: RacerConfig) -> Result<Self, TrackError> {
        config.validate()?;
        let current_position = wrap_unit(config.start_position.clamp(0.0, 1.0));
        Ok(Self {
            config,
            current_position,
            jump: JumpState::Idle,
            vertical_offset: IDLE_ELEVATION,
            forward: DEFAULT_FORWARD,
            reported_missing_track: false,
        })
    }

    /// Advance one tick.
    ///
    /// Without a generated track this is a no-op (nothing moves, no jump
    /// starts) and returns `None`; the missing track is logged once.
    pub fn tick(
        &mut self,
        track: Option<&Track>,
        dt: f32,
        signal: &ActivationSignal,
    ) -> Option<RacerPose> {
        let Some(track) = track.filter(|t| t.is_ready()) else {
            if !self.reported_missing_track {
                log::error!("Racer '{}': {}", self.config.identity, TrackError::MissingTrack);
                self.reported_missing_track = true;
            }
            return None;
        };
        self.reported_missing_track = false;

        let dt = dt.max(0.0);
        self.advance(dt);

        let lane = track.lane_pose(self.current_position, self.config.lane, self.forward)?;
        self.forward = lane.forward;

        self.update_jump(dt);
        self.try_start_jump(signal);

        Some(RacerPose {
            position: lane.position + Vec3::Y * self.vertical_offset,
            rotation: look_rotation(self.forward, Vec3::Y),
            forward: self.forward,
        })
    }

    /// Move along the loop by speed · dt · PROGRESS_RATE, wrapping at 1.
    pub fn advance(&mut self, dt: f32) {
        let step = self.config.speed * dt * PROGRESS_RATE;
        self.current_position = wrap_unit(self.current_position + step);
    }

    fn update_jump(&mut self, dt: f32) {
        match self.jump {
            JumpState::Idle => self.vertical_offset = IDLE_ELEVATION,
            JumpState::Jumping { elapsed } => {
                let elapsed = elapsed + dt;
                let duration = self.config.jump_duration;
                if elapsed >= duration {
                    self.jump = JumpState::Idle;
                    self.vertical_offset = IDLE_ELEVATION;
                    log::debug!("Racer '{}' landed", self.config.identity);
                } else {
                    let p = elapsed / duration;
                    self.vertical_offset = IDLE_ELEVATION + jump_arc(self.config.jump_height, p);
                    self.jump = JumpState::Jumping { elapsed };
                }
            }
        }
    }

    /// Edge-triggered Idle → Jumping. Returns true if a jump started.
    pub fn try_start_jump(&mut self, signal: &ActivationSignal) -> bool {
        if self.is_jumping() || !signal.matches(&self.config.identity) {
            return false;
        }
        self.jump = JumpState::Jumping { elapsed: 0.0 };
        log::debug!("Racer '{}' jumped", self.config.identity);
        true
    }

    /// Back to the configured start position.
    pub fn reset_position(&mut self) {
        self.current_position = wrap_unit(self.config.start_position.clamp(0.0, 1.0));
    }

    /// Place the racer at t, clamped to [0, 1] (1 wraps to 0).
    pub fn set_position(&mut self, t: f32) {
        self.current_position = wrap_unit(t.clamp(0.0, 1.0));
    }

    pub fn config(&self) -> &RacerConfig { &self.config }
    pub fn identity(&self) -> &str { &self.config.identity }
    pub fn current_position(&self) -> f32 { self.current_position }
    pub fn jump_state(&self) -> JumpState { self.jump }
    pub fn is_jumping(&self) -> bool { matches!(self.jump, JumpState::Jumping { .. }) }
    pub fn vertical_offset(&self) -> f32 { self.vertical_offset }
    pub fn forward(&self) -> Vec3 { self.forward }
}
