// ECS systems for the race loop.
// The host calls step() once per frame; nothing runs behind its back.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use glam::Vec3;
use super::components::*;
use super::error::TrackError;
use super::racer::{ActivationSignal, Racer, RacerConfig};
use super::selection::Selection;
use super::track::Track;
use super::track_mesh::TrackMesh;

/// Per-frame input for the schedule. Overwritten by every step().
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Seconds since the previous tick.
    pub dt: f32,
    /// A tap/click began this frame.
    pub activated: bool,
}

/// Advance every racer one tick along its track and write the result into its Transform.
/// Racers whose track is missing keep their previous Transform.
pub fn racer_system(
    input: Res<TickInput>,
    selection: Res<Selection>,
    tracks: Query<&Track>,
    mut racers: Query<(&mut Racer, &mut Transform, Option<&OnTrack>)>,
) {
    let signal = ActivationSignal::new(input.activated, selection.selected());

    for (mut racer, mut transform, on_track) in racers.iter_mut() {
        let track = on_track.and_then(|handle| tracks.get(handle.0).ok());
        if let Some(pose) = racer.tick(track, input.dt, &signal) {
            transform.position = pose.position;
            transform.rotation = pose.rotation;
        }
    }
}

/// Single-threaded schedule running the racer system.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems(racer_system);
    schedule
}

/// Run one tick: publish the frame's input, then run the schedule.
pub fn step(world: &mut World, schedule: &mut Schedule, dt: f32, activated: bool) {
    world.insert_resource(TickInput { dt, activated });
    world.init_resource::<Selection>();
    schedule.run(world);
}

// ============================================================================
// SPAWNING AND EDITING
// ============================================================================

pub fn spawn_track(world: &mut World, track: Track) -> Entity {
    world.spawn((track, Transform::default())).id()
}

/// Spawn a racer entity. `track` may be None; the racer then waits motionless.
/// An invalid config spawns nothing.
pub fn spawn_racer(
    world: &mut World,
    config: RacerConfig,
    track: Option<Entity>,
) -> Result<Entity, TrackError> {
    let color = config.color;
    let racer = Racer::new(config)?;
    let mut entity = world.spawn((racer, Transform::from_position(Vec3::ZERO), color));
    if let Some(track) = track {
        entity.insert(OnTrack(track));
    }
    Ok(entity.id())
}

/// Authoring-time regeneration of a spawned track. Must not be called mid-tick;
/// `&mut World` guarantees that.
pub fn regenerate_track(
    world: &mut World,
    track: Entity,
    anchors: &[Option<Vec3>],
) -> Result<TrackMesh, TrackError> {
    let mut track = world.get_mut::<Track>(track).ok_or(TrackError::MissingTrack)?;
    track.regenerate(anchors).cloned()
}
