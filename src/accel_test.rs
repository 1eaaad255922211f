use super::*;
use crate::mesh::Mesh;

fn quad_mesh() -> Mesh {
  // Two triangles forming the unit square in the z=0 plane.
  Mesh::new(
    vec![
      Vec3::new(0.0, 0.0, 0.0),
      Vec3::new(1.0, 0.0, 0.0),
      Vec3::new(1.0, 1.0, 0.0),
      Vec3::new(0.0, 1.0, 0.0),
    ],
    vec![[0, 1, 2], [0, 2, 3]],
  )
}

fn many_triangle_mesh(count: usize) -> Mesh {
  let mut vertices = Vec::with_capacity(count * 3);
  let mut triangles = Vec::with_capacity(count);
  for i in 0..count {
    let x = i as f32;
    vertices.push(Vec3::new(x, 0.0, 0.0));
    vertices.push(Vec3::new(x + 1.0, 0.0, 0.0));
    vertices.push(Vec3::new(x + 0.5, 1.0, 0.0));
    let base = (i * 3) as u32;
    triangles.push([base, base + 1, base + 2]);
  }
  Mesh::new(vertices, triangles)
}

#[test]
fn closest_distance_matches_direct_perpendicular_distance() {
  let accel = Accel::build(&quad_mesh());
  let probe = Vec3::new(0.5, 0.5, 2.0);
  let distance = accel.closest_distance(probe, 10.0).expect("in range");
  assert!((distance - 2.0).abs() < 1e-4);
}

#[test]
fn closest_distance_returns_none_outside_max_radius() {
  let accel = Accel::build(&quad_mesh());
  let probe = Vec3::new(0.5, 0.5, 100.0);
  assert_eq!(accel.closest_distance(probe, 1.0), None);
}

#[test]
fn closest_distance_agrees_with_brute_force_across_many_triangles() {
  let mesh = many_triangle_mesh(64);
  let accel = Accel::build(&mesh);

  let probes = [
    Vec3::new(10.0, 0.5, 3.0),
    Vec3::new(-5.0, 2.0, -1.0),
    Vec3::new(40.0, -3.0, 0.5),
  ];

  for probe in probes {
    let accel_distance = accel.closest_distance(probe, 1_000.0).unwrap();

    let brute_distance = mesh
      .triangles
      .iter()
      .map(|&t| {
        let (a, b, c) = mesh.triangle_positions(t);
        let closest = closest_point_on_triangle(probe.as_dvec3(), a.as_dvec3(), b.as_dvec3(), c.as_dvec3());
        (closest.as_vec3() - probe).length()
      })
      .fold(f32::MAX, f32::min);

    assert!((accel_distance - brute_distance).abs() < 1e-3, "{accel_distance} vs {brute_distance}");
  }
}

#[test]
fn ray_cast_hits_the_quad_from_above() {
  let accel = Accel::build(&quad_mesh());
  let hit = accel
    .ray_cast(Vec3::new(0.25, 0.25, 5.0), Vec3::new(0.0, 0.0, -1.0), 100.0)
    .expect("ray should hit the quad");
  assert!((hit.t - 5.0).abs() < 1e-4);
  assert!(hit.geometric_normal.z.abs() > 0.9);
}

#[test]
fn ray_cast_misses_when_aimed_away_from_geometry() {
  let accel = Accel::build(&quad_mesh());
  assert!(accel
    .ray_cast(Vec3::new(5.0, 5.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 100.0)
    .is_none());
}

#[test]
fn ray_cast_respects_tfar() {
  let accel = Accel::build(&quad_mesh());
  assert!(accel
    .ray_cast(Vec3::new(0.25, 0.25, 5.0), Vec3::new(0.0, 0.0, -1.0), 1.0)
    .is_none());
}

#[test]
fn empty_mesh_accel_returns_no_hits() {
  let mesh = Mesh::new(vec![], vec![]);
  let accel = Accel::build(&mesh);
  assert_eq!(accel.closest_distance(Vec3::ZERO, 10.0), None);
  assert!(accel.ray_cast(Vec3::ZERO, Vec3::Z, 10.0).is_none());
}
