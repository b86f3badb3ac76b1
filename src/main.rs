// Headless race loop: builds a track, spawns racers and drives the ECS
// schedule at a fixed tick rate. Marker scans and taps are simulated.

use bevy_ecs::prelude::*;
use glam::Vec3;
use rand::Rng;
use winit::event::{DeviceId, ElementState, MouseButton, WindowEvent};
use loop_racer::engine::input::TapInput;
use loop_racer::engine::systems::{build_schedule, spawn_racer, spawn_track, step};
use loop_racer::engine::{
    Color as RacerColor, Lane, Marker, Racer, RacerConfig, Selection, TargetStatus, Track,
    TrackConfig, TrackError, Transform,
};

const TICK_RATE: f32 = 60.0;
const RUN_SECONDS: f32 = 20.0;
/// Chance per tick that the player taps the screen.
const TAP_CHANCE: f64 = 0.02;

// ============================================================================
// SCENE
// ============================================================================

/// Rolling oval: eight anchors with a little height variation.
fn track_anchors() -> Vec<Option<Vec3>> {
    (0..8)
        .map(|k| {
            let angle = k as f32 / 8.0 * std::f32::consts::TAU;
            let hill = if k % 2 == 0 { 0.0 } else { 0.8 };
            Some(Vec3::new(angle.cos() * 16.0, hill, angle.sin() * 10.0))
        })
        .collect()
}

const IDENTITIES: [(&str, RacerColor); 4] = [
    ("red", RacerColor { r: 1.0, g: 0.1, b: 0.1 }),
    ("blue", RacerColor { r: 0.1, g: 0.3, b: 1.0 }),
    ("yellow", RacerColor { r: 1.0, g: 0.9, b: 0.1 }),
    ("green", RacerColor::GREEN),
];

fn spawn_test_racers(world: &mut World, track: Entity) -> Result<(), TrackError> {
    let mut rng = rand::thread_rng();

    for (i, (identity, color)) in IDENTITIES.iter().enumerate() {
        let config = RacerConfig {
            lane: Lane::from_left(i % 2 == 0),
            speed: rng.gen_range(0.5..2.0),
            start_position: rng.gen_range(0.0..1.0),
            color: *color,
            ..RacerConfig::new(*identity)
        };
        spawn_racer(world, config, Some(track))?;
    }

    // One racer nobody put on a track: stays where it spawned
    spawn_racer(world, RacerConfig { color: RacerColor::random(), ..RacerConfig::new("ghost") }, None)?;

    log::info!("Spawned {} racers", IDENTITIES.len() + 1);
    Ok(())
}

/// Synthetic left click, as winit would deliver it from the window.
fn click(state: ElementState) -> WindowEvent {
    WindowEvent::MouseInput {
        // SAFETY: only used as an opaque id; no window backend looks it up
        device_id: unsafe { DeviceId::dummy() },
        state,
        button: MouseButton::Left,
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut track = Track::new(TrackConfig::default());
    if let Err(err) = track.regenerate(&track_anchors()) {
        log::error!("Could not build track: {err}");
        return;
    }
    if let Some(mesh) = track.mesh() {
        let surface = mesh.surface.to_render_mesh();
        let divider = mesh.divider.to_render_mesh();
        log::info!(
            "Track upload: surface {} KiB, divider {} KiB",
            (surface.vertex_bytes().len() + surface.index_bytes().len()) / 1024,
            (divider.vertex_bytes().len() + divider.index_bytes().len()) / 1024,
        );
    }

    let mut world = World::new();
    world.insert_resource(Selection::default());
    let track = spawn_track(&mut world, track);
    if let Err(err) = spawn_test_racers(&mut world, track) {
        log::error!("Could not spawn racers: {err}");
        return;
    }

    let markers: Vec<Marker> = IDENTITIES
        .iter()
        .map(|(identity, _)| Marker::new(*identity, format!("{identity} car ready")))
        .collect();

    let mut schedule = build_schedule();
    let mut input = TapInput::new();
    let mut rng = rand::thread_rng();
    let dt = 1.0 / TICK_RATE;
    let ticks_per_second = TICK_RATE as u32;
    let total_ticks = (RUN_SECONDS * TICK_RATE) as u32;

    for frame in 0..total_ticks {
        // Every five seconds a different marker comes into view
        if frame % (5 * ticks_per_second) == 0 {
            let marker = &markers[(frame / (5 * ticks_per_second)) as usize % markers.len()];
            let hud = world.resource_mut::<Selection>().observe(marker, TargetStatus::Tracked);
            log::info!("HUD visible={} \"{}\"", hud.visible, hud.text);
        }

        if rng.gen_bool(TAP_CHANCE) {
            input.process_event(&click(ElementState::Pressed));
            input.process_event(&click(ElementState::Released));
        }
        step(&mut world, &mut schedule, dt, input.activated());
        input.end_frame();

        if frame % ticks_per_second == 0 {
            let mut query = world.query::<(&Racer, &Transform)>();
            for (racer, transform) in query.iter(&world) {
                log::info!(
                    "t={:>5.2}s {:<7} at {:.3} pos ({:>6.2}, {:>5.2}, {:>6.2}){}",
                    frame as f32 * dt,
                    racer.identity(),
                    racer.current_position(),
                    transform.position.x,
                    transform.position.y,
                    transform.position.z,
                    if racer.is_jumping() { " JUMP" } else { "" },
                );
            }
        }
    }

    println!("Ran {} ticks at {} Hz", total_ticks, TICK_RATE);
}
