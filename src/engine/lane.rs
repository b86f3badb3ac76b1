// Lane following: where a racer sits on the track and which way it faces.
//
// Forward comes from a short finite-difference look-ahead along the spline,
// so it follows the curve rather than the tessellated mesh.

use glam::{Mat3, Quat, Vec3};
use super::spline::ClosedSpline;

/// Parameter step used for the look-ahead sample.
pub const LOOKAHEAD: f32 = 0.001;

/// Forward used when no valid direction has been seen yet.
pub const DEFAULT_FORWARD: Vec3 = Vec3::Z;

/// Right of `DEFAULT_FORWARD` in the right-handed, Y-up world.
pub const DEFAULT_RIGHT: Vec3 = Vec3::NEG_X;

/// One of the two lanes either side of the centerline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lane {
    #[default]
    Left,
    Right,
}

impl Lane {
    pub fn from_left(left_lane: bool) -> Self {
        if left_lane { Lane::Left } else { Lane::Right }
    }

    /// Sign applied to the right vector: left lanes sit at -right.
    pub fn side(self) -> f32 {
        match self {
            Lane::Left => -1.0,
            Lane::Right => 1.0,
        }
    }
}

/// Position in a lane and the unit forward direction of travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanePose {
    pub position: Vec3,
    pub forward: Vec3,
}

/// Horizontal right vector for a travel direction: forward × up, the same
/// side `Mat4::look_to_rh` maps to view +X. Falls back to `fallback` when
/// forward is vertical or zero.
pub fn right_of(forward: Vec3, fallback: Vec3) -> Vec3 {
    forward.cross(Vec3::Y).try_normalize().unwrap_or(fallback)
}

/// Lane position at parameter `t`.
///
/// If the look-ahead chord is degenerate, `previous_forward` is kept as the
/// forward direction instead of snapping to a zero vector.
pub fn lane_pose(
    spline: &ClosedSpline,
    lane_width: f32,
    t: f32,
    lane: Lane,
    previous_forward: Vec3,
) -> LanePose {
    let center = spline.evaluate(t);
    let ahead = spline.evaluate(t + LOOKAHEAD);

    let forward = (ahead - center).try_normalize().unwrap_or(previous_forward);
    let right = right_of(forward, right_of(previous_forward, DEFAULT_RIGHT));

    let offset = lane_width / 2.0;
    LanePose {
        position: center + right * (lane.side() * offset),
        forward,
    }
}

/// Rotation that turns local +Z onto `forward`, keeping `up` as close to
/// local +Y as possible. Returns identity for a zero forward.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let Some(z) = forward.try_normalize() else {
        return Quat::IDENTITY;
    };
    let x = match up.cross(z).try_normalize() {
        Some(x) => x,
        // forward parallel to up: pick any perpendicular axis
        None => z.any_orthonormal_vector(),
    };
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z))
}
