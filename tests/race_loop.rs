// End-to-end: build a track, put racers on it and drive the schedule.

use bevy_ecs::prelude::*;
use glam::Vec3;
use loop_racer::engine::racer::{IDLE_ELEVATION, PROGRESS_RATE};
use loop_racer::engine::systems::{build_schedule, spawn_racer, spawn_track, step};
use loop_racer::engine::{
    build_track, JumpState, Lane, Marker, Racer, RacerConfig, Selection, TargetStatus, Track,
    TrackConfig, Transform,
};

fn square() -> Vec<Vec3> {
    vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(10.0, 0.0, 10.0),
        Vec3::new(0.0, 0.0, 10.0),
    ]
}

fn config() -> TrackConfig {
    TrackConfig { segments_per_section: 10, ..TrackConfig::default() }
}

#[test]
fn square_track_scenario() {
    let mesh = build_track(&square(), &config()).unwrap();
    assert_eq!(mesh.sample_count, 40);
    assert_eq!(mesh.surface.vertex_count(), 4 * 40);
    assert_eq!(mesh.surface.index_count(), 24 * 40);
    assert_eq!(mesh.divider.vertex_count(), 2 * 40);
    assert_eq!(mesh.divider.index_count(), 6 * 40);

    let track = Track::with_control_points(&square(), config()).unwrap();
    assert!(track.track_position(0.0).unwrap().abs_diff_eq(Vec3::ZERO, 1e-4));
    assert!(track.track_position(0.25).unwrap().abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), 1e-4));
    assert!(track.track_position(1.25).unwrap().abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), 1e-3));
}

#[test]
fn marker_selection_drives_jump_through_the_schedule() {
    let mut world = World::new();
    let mut schedule = build_schedule();
    world.insert_resource(Selection::default());

    let track = spawn_track(&mut world, Track::with_control_points(&square(), config()).unwrap());
    let red = spawn_racer(&mut world, RacerConfig::new("red"), Some(track)).unwrap();
    let blue = spawn_racer(
        &mut world,
        RacerConfig { lane: Lane::Right, jump_duration: 0.5, ..RacerConfig::new("blue") },
        Some(track),
    )
    .unwrap();

    // Tap before anything is selected: nobody jumps
    step(&mut world, &mut schedule, 0.125, true);
    assert!(!world.get::<Racer>(red).unwrap().is_jumping());
    assert!(!world.get::<Racer>(blue).unwrap().is_jumping());

    let marker = Marker::new("blue", "Blue ready");
    let hud = world.resource_mut::<Selection>().observe(&marker, TargetStatus::Tracked);
    assert!(hud.visible);

    step(&mut world, &mut schedule, 0.125, true);
    assert_eq!(world.get::<Racer>(blue).unwrap().jump_state(), JumpState::Jumping { elapsed: 0.0 });
    assert!(!world.get::<Racer>(red).unwrap().is_jumping());

    // Airborne: blue rides above red (both on the same flat track)
    step(&mut world, &mut schedule, 0.125, true);
    step(&mut world, &mut schedule, 0.125, true);
    let blue_y = world.get::<Transform>(blue).unwrap().position.y;
    let red_y = world.get::<Transform>(red).unwrap().position.y;
    assert!(blue_y > red_y + 0.5);
    assert!((red_y - IDLE_ELEVATION).abs() < 1e-4);

    // Lands after the full duration, tapping throughout
    step(&mut world, &mut schedule, 0.125, true);
    step(&mut world, &mut schedule, 0.125, false);
    let blue_racer = world.get::<Racer>(blue).unwrap();
    assert_eq!(blue_racer.jump_state(), JumpState::Idle);
    assert_eq!(blue_racer.vertical_offset(), IDLE_ELEVATION);
}

#[test]
fn racers_lap_the_loop_and_face_forward() {
    let mut world = World::new();
    let mut schedule = build_schedule();
    let track = spawn_track(&mut world, Track::with_control_points(&square(), config()).unwrap());
    let racer = spawn_racer(&mut world, RacerConfig { speed: 5.0, ..RacerConfig::new("red") }, Some(track))
        .unwrap();

    let dt = 1.0 / 60.0;
    let mut last = 0.0;
    let mut laps = 0;
    for _ in 0..610 {
        step(&mut world, &mut schedule, dt, false);
        let r = world.get::<Racer>(racer).unwrap();
        let pos = r.current_position();
        assert!((0.0..1.0).contains(&pos));
        if pos < last {
            laps += 1;
        }
        last = pos;

        let transform = world.get::<Transform>(racer).unwrap();
        assert!(transform.position.is_finite());
        assert!((transform.forward() - r.forward()).length() < 1e-4);
    }
    // ~10.17 s at speed 5 covers a little over 5 laps
    assert!((610.0 * dt * 5.0 * PROGRESS_RATE - 5.08).abs() < 0.01);
    assert_eq!(laps, 5);
}
