// Procedural track geometry: a thick two-lane ribbon plus a thin divider strip.
//
// Pipeline:
//   control points → ClosedSpline → sample() → extrude_surface() / extrude_divider() → TrackMesh
//
// Per sample i the builder derives a right vector from the chord to sample i+1,
// so the frame at the seam uses sample 0 as its "next" point.

use glam::{Vec2, Vec3};
use super::error::TrackError;
use super::lane::DEFAULT_RIGHT;
use super::mesh::MeshBuffers;
use super::spline::ClosedSpline;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Shape settings for the generated track.
///
/// Authoring ranges that look sensible in a scene:
///   lane_width           0.5 – 10
///   thickness            0.1 – 2
///   segments_per_section 10  – 200
/// Values outside those ranges are still built; only non-positive or
/// non-finite values are rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackConfig {
    /// Width of each lane. The ribbon is two lanes wide.
    pub lane_width: f32,
    /// How far the ribbon extends downward below the centerline.
    pub thickness: f32,
    /// Curve samples per control-point section.
    pub segments_per_section: u32,
    /// Width of the lane divider strip.
    pub divider_width: f32,
    /// Lift of the divider above the surface, keeps it from z-fighting.
    pub divider_height: f32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            lane_width: 2.0,
            thickness: 0.2,
            segments_per_section: 50,
            divider_width: 0.1,
            divider_height: 0.02,
        }
    }
}

impl TrackConfig {
    pub fn validate(&self) -> Result<(), TrackError> {
        let positive = |field: &'static str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TrackError::InvalidConfig { field, value })
            }
        };
        positive("lane_width", self.lane_width)?;
        positive("thickness", self.thickness)?;
        positive("segments_per_section", self.segments_per_section as f32)?;
        positive("divider_width", self.divider_width)?;
        positive("divider_height", self.divider_height)
    }

    /// Full ribbon width (both lanes side by side).
    pub fn total_width(&self) -> f32 { self.lane_width * 2.0 }
}

// ============================================================================
// TRACK MESH
// ============================================================================

/// The two meshes generated for a track. Owned by `Track`, read by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMesh {
    pub surface: MeshBuffers,
    pub divider: MeshBuffers,
    pub sample_count: usize,
}

/// Build both meshes from raw control points.
///
/// Vertex/index counts for n = len(points) * segments_per_section samples:
///   surface: 4n vertices, 24n indices (8 triangles per segment)
///   divider: 2n vertices,  6n indices (2 triangles per segment)
pub fn build_track(points: &[Vec3], config: &TrackConfig) -> Result<TrackMesh, TrackError> {
    config.validate()?;
    let spline = ClosedSpline::new(points.to_vec())?;
    Ok(build_from_spline(&spline, config))
}

/// Build both meshes from an already validated spline. Config must be valid.
pub fn build_from_spline(spline: &ClosedSpline, config: &TrackConfig) -> TrackMesh {
    let sample_count = spline.len() * config.segments_per_section as usize;
    let centers = spline.sample(sample_count);
    let rights = right_vectors(&centers);

    let surface = extrude_surface(&centers, &rights, config);
    let divider = extrude_divider(&centers, &rights, config);

    log::info!(
        "Built track mesh: {} samples, {} surface triangles, {} divider triangles",
        sample_count,
        surface.triangle_count(),
        divider.triangle_count(),
    );

    TrackMesh { surface, divider, sample_count }
}

// ============================================================================
// FRAME VECTORS
// ============================================================================

/// Horizontal right vector for each sample of a closed polyline.
///
/// right = normalize(forward × up), forward = chord to the next sample.
/// A zero-length chord (coincident samples) or a vertical chord keeps the
/// previous right vector instead of producing NaN. The loop is closed, so the
/// samples before the first valid chord inherit the last valid right before
/// the seam.
pub fn right_vectors(centers: &[Vec3]) -> Vec<Vec3> {
    let n = centers.len();
    let chord_right = |i: usize| {
        (centers[(i + 1) % n] - centers[i])
            .try_normalize()
            .and_then(|forward| forward.cross(Vec3::Y).try_normalize())
    };

    let mut last_right = (0..n).rev().find_map(chord_right).unwrap_or(DEFAULT_RIGHT);

    (0..n)
        .map(|i| {
            if let Some(right) = chord_right(i) {
                last_right = right;
            }
            last_right
        })
        .collect()
}

// ============================================================================
// SURFACE RIBBON
// ============================================================================

/// Four vertices per sample:
///   4i+0 top-left, 4i+1 top-right, 4i+2 bottom-left, 4i+3 bottom-right
/// UV.x = 0 on the left edge, 1 on the right; UV.y = i / n.
fn extrude_surface(centers: &[Vec3], rights: &[Vec3], config: &TrackConfig) -> MeshBuffers {
    let n = centers.len();
    let half_width = config.total_width() / 2.0;
    let down = Vec3::Y * config.thickness;
    let mut mesh = MeshBuffers::with_capacity(4 * n, 24 * n);

    for (i, (&center, &right)) in centers.iter().zip(rights).enumerate() {
        let left_outer = center - right * half_width;
        let right_outer = center + right * half_width;
        let v = i as f32 / n as f32;

        mesh.add_vertex(left_outer, Vec2::new(0.0, v));
        mesh.add_vertex(right_outer, Vec2::new(1.0, v));
        mesh.add_vertex(left_outer - down, Vec2::new(0.0, v));
        mesh.add_vertex(right_outer - down, Vec2::new(1.0, v));
    }

    for i in 0..n {
        let cur = (i * 4) as u32;
        let next = (((i + 1) % n) * 4) as u32;

        // Top (+Y)
        mesh.add_triangle(cur, cur + 1, next);
        mesh.add_triangle(cur + 1, next + 1, next);
        // Bottom (-Y)
        mesh.add_triangle(cur + 2, next + 2, cur + 3);
        mesh.add_triangle(cur + 3, next + 2, next + 3);
        // Left wall
        mesh.add_triangle(cur, next, cur + 2);
        mesh.add_triangle(next, next + 2, cur + 2);
        // Right wall
        mesh.add_triangle(cur + 1, cur + 3, next + 1);
        mesh.add_triangle(next + 1, cur + 3, next + 3);
    }

    mesh
}

// ============================================================================
// LANE DIVIDER
// ============================================================================

/// Flat strip on the centerline, lifted by `divider_height`. Two vertices per sample.
fn extrude_divider(centers: &[Vec3], rights: &[Vec3], config: &TrackConfig) -> MeshBuffers {
    let n = centers.len();
    let half_width = config.divider_width / 2.0;
    let lift = Vec3::Y * config.divider_height;
    let mut mesh = MeshBuffers::with_capacity(2 * n, 6 * n);

    for (i, (&center, &right)) in centers.iter().zip(rights).enumerate() {
        let v = i as f32 / n as f32;
        mesh.add_vertex(center - right * half_width + lift, Vec2::new(0.0, v));
        mesh.add_vertex(center + right * half_width + lift, Vec2::new(1.0, v));
    }

    for i in 0..n {
        let cur = (i * 2) as u32;
        let next = (((i + 1) % n) * 2) as u32;
        mesh.add_triangle(cur, cur + 1, next);
        mesh.add_triangle(cur + 1, next + 1, next);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, 10.0),
        ]
    }

    // Wide loop: curvature radius stays well above the half-width, so the
    // inner rail never folds back on itself.
    fn wide_loop() -> Vec<Vec3> {
        (0..8)
            .map(|k| {
                let a = k as f32 / 8.0 * std::f32::consts::TAU;
                Vec3::new(a.cos() * 20.0, 0.0, a.sin() * 20.0)
            })
            .collect()
    }

    fn config(segments: u32) -> TrackConfig {
        TrackConfig { segments_per_section: segments, ..TrackConfig::default() }
    }

    #[test]
    fn square_scenario_counts() {
        let mesh = build_track(&square(), &config(10)).unwrap();
        assert_eq!(mesh.sample_count, 40);
        assert_eq!(mesh.surface.vertex_count(), 160);
        assert_eq!(mesh.surface.index_count(), 24 * 40);
        assert_eq!(mesh.surface.uvs.len(), 160);
        assert_eq!(mesh.divider.vertex_count(), 80);
        assert_eq!(mesh.divider.index_count(), 6 * 40);
    }

    #[test]
    fn indices_stay_in_bounds_and_wrap() {
        let mesh = build_track(&square(), &config(7)).unwrap();
        for buffers in [&mesh.surface, &mesh.divider] {
            let len = buffers.vertex_count() as u32;
            assert!(buffers.indices.iter().all(|&i| i < len));
        }
        // Last surface segment reuses the first sample's top-left vertex
        let last_segment = &mesh.surface.indices[mesh.surface.index_count() - 24..];
        assert!(last_segment.contains(&0));
        let last_divider = &mesh.divider.indices[mesh.divider.index_count() - 6..];
        assert!(last_divider.contains(&0));
    }

    #[test]
    fn faces_point_outward() {
        let mesh = build_track(&wide_loop(), &config(10)).unwrap();
        let n = mesh.sample_count;
        for seg in 0..n {
            let tri = seg * 8;
            assert!(mesh.surface.face_normal(tri).y > 0.0, "top {seg}");
            assert!(mesh.surface.face_normal(tri + 1).y > 0.0, "top {seg}");
            assert!(mesh.surface.face_normal(tri + 2).y < 0.0, "bottom {seg}");
            assert!(mesh.surface.face_normal(tri + 3).y < 0.0, "bottom {seg}");
        }
        for tri in 0..mesh.divider.triangle_count() {
            assert!(mesh.divider.face_normal(tri).y > 0.0);
        }
    }

    #[test]
    fn walls_face_away_from_centerline() {
        let points = wide_loop();
        let mesh = build_track(&points, &config(10)).unwrap();
        let spline = ClosedSpline::new(points).unwrap();
        let centers = spline.sample(mesh.sample_count);
        for seg in 0..mesh.sample_count {
            let center = centers[seg];
            for (tri, side) in [(seg * 8 + 4, "left"), (seg * 8 + 6, "right")] {
                let first = mesh.surface.indices[tri * 3] as usize;
                let outward = mesh.surface.positions[first] - center;
                assert!(mesh.surface.face_normal(tri).dot(outward) > 0.0, "{side} wall {seg}");
            }
        }
    }

    #[test]
    fn surface_spans_two_lanes_and_thickness() {
        let cfg = config(10);
        let mesh = build_track(&square(), &cfg).unwrap();
        let p = &mesh.surface.positions;
        assert!((p[0].distance(p[1]) - cfg.total_width()).abs() < 1e-4);
        assert!((p[0].y - p[2].y - cfg.thickness).abs() < 1e-6);
        assert_eq!(mesh.surface.uvs[0], Vec2::new(0.0, 0.0));
        assert_eq!(mesh.surface.uvs[3], Vec2::new(1.0, 0.0));
        assert!((mesh.surface.uvs[4].y - 1.0 / 40.0).abs() < 1e-6);

        let d = &mesh.divider.positions;
        assert!((d[0].distance(d[1]) - cfg.divider_width).abs() < 1e-5);
        assert!((d[0].y - cfg.divider_height).abs() < 1e-6);
    }

    #[test]
    fn build_is_idempotent() {
        let a = build_track(&square(), &config(12)).unwrap();
        let b = build_track(&square(), &config(12)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_chords_reuse_previous_right() {
        let centers = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 5.0, 1.0),
            Vec3::new(0.0, 0.0, 0.5),
        ];
        let rights = right_vectors(&centers);
        assert!(rights.iter().all(|r| r.is_finite()));
        // Chord 0→1 runs along +Z, so right is -X
        assert!(rights[0].abs_diff_eq(Vec3::NEG_X, 1e-6));
        // Coincident and vertical chords keep it
        assert_eq!(rights[1], rights[0]);
        assert_eq!(rights[2], rights[0]);
    }

    #[test]
    fn duplicate_control_points_never_produce_nan() {
        let points = vec![Vec3::ZERO, Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 5.0)];
        let mesh = build_track(&points, &config(10)).unwrap();
        assert!(mesh.surface.positions.iter().all(|p| p.is_finite()));
        assert!(mesh.divider.positions.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            build_track(&square()[..2], &config(10)),
            Err(TrackError::InsufficientControlPoints { found: 2 })
        );
        let bad = TrackConfig { lane_width: 0.0, ..TrackConfig::default() };
        assert_eq!(
            build_track(&square(), &bad),
            Err(TrackError::InvalidConfig { field: "lane_width", value: 0.0 })
        );
        let bad = TrackConfig { segments_per_section: 0, ..TrackConfig::default() };
        assert!(bad.validate().is_err());
        assert!(TrackConfig::default().validate().is_ok());
    }

    #[test]
    fn leading_degenerate_chords_inherit_right_across_the_seam() {
        // Samples 0 and 1 coincide; the closing chord 3→0 runs along -X
        let centers = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 4.0),
            Vec3::new(4.0, 0.0, 0.0),
        ];
        let rights = right_vectors(&centers);
        // -X × up = -Z
        assert!(rights[3].abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert_eq!(rights[0], rights[3]);
        assert_ne!(rights[0], DEFAULT_RIGHT);

        let stuck = vec![Vec3::ONE; 3];
        assert!(right_vectors(&stuck).iter().all(|&r| r == DEFAULT_RIGHT));
    }

    #[test]
    fn left_edge_is_left_of_travel() {
        let mesh = build_track(&wide_loop(), &config(10)).unwrap();
        let p = &mesh.surface.positions;
        for i in 0..mesh.sample_count {
            let next = (i + 1) % mesh.sample_count;
            let forward = p[next * 4] - p[i * 4];
            let across = p[i * 4 + 1] - p[i * 4];
            // Top-left to top-right points along forward × up
            assert!(across.dot(forward.cross(Vec3::Y)) > 0.0, "sample {i}");
        }
    }
}
