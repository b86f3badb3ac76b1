// ECS components shared by the track and racer systems.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};

/// Position and orientation of an entity in 3D space.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::default() }
    }

    /// Local +Z after rotation: the direction the entity faces.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

/// RGB tint handed to the renderer.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const GREEN: Color = Color { r: 0.0, g: 1.0, b: 0.0 };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        Self {
            r: rng.gen_range(0.2..1.0),
            g: rng.gen_range(0.2..1.0),
            b: rng.gen_range(0.2..1.0),
        }
    }
}

/// Handle from a racer entity to the entity carrying its `Track`.
/// Racers without one (or pointing at a despawned track) stay motionless.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnTrack(pub Entity);
