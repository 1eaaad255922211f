//! Brick and volume-build benchmarks.
//!
//! Compares the cost of a single brick against a full mip-0 bake, and
//! rayon-parallel against serial dispatch at a few mesh sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{UVec3, Vec3};
use rand::SeedableRng;
use sdf_bake::accel::Accel;
use sdf_bake::brick::compute_brick;
use sdf_bake::hemisphere::stratified_uniform_hemisphere;
use sdf_bake::mesh::{Bounds, Mesh};
use sdf_bake::volume::{build_volume_data, Config};

fn sphere_mesh(subdivisions: u32) -> Mesh {
  // UV-sphere: cheap to generate at arbitrary density, a reasonable stand-in
  // for a mid-poly bake target.
  let rings = subdivisions.max(3);
  let segments = subdivisions.max(3) * 2;
  let mut vertices = Vec::new();
  for ring in 0..=rings {
    let phi = std::f32::consts::PI * ring as f32 / rings as f32;
    for segment in 0..segments {
      let theta = 2.0 * std::f32::consts::PI * segment as f32 / segments as f32;
      vertices.push(Vec3::new(
        phi.sin() * theta.cos(),
        phi.cos(),
        phi.sin() * theta.sin(),
      ));
    }
  }

  let mut triangles = Vec::new();
  for ring in 0..rings {
    for segment in 0..segments {
      let next_segment = (segment + 1) % segments;
      let a = ring * segments + segment;
      let b = ring * segments + next_segment;
      let c = (ring + 1) * segments + segment;
      let d = (ring + 1) * segments + next_segment;
      triangles.push([a, b, c]);
      triangles.push([b, d, c]);
    }
  }

  Mesh::new(vertices, triangles.into_iter().map(|[a, b, c]| [a, b, c]).collect())
}

fn bench_single_brick(c: &mut Criterion) {
  let mesh = sphere_mesh(16);
  let accel = Accel::build(&mesh);
  let mut rng = rand_chacha::ChaCha8Rng::from_seed([7u8; 32]);
  let directions = stratified_uniform_hemisphere(49, &mut rng);
  let bounds = Bounds::new(Vec3::splat(-1.5), Vec3::splat(1.5));

  c.bench_function("compute_brick/sphere_16", |b| {
    b.iter(|| {
      black_box(compute_brick(
        &accel,
        &directions,
        black_box(0.2),
        bounds,
        UVec3::ZERO,
        Vec3::splat(1.4),
      ))
    })
  });
}

fn bench_volume_build(c: &mut Criterion) {
  let mut group = c.benchmark_group("build_volume_data");
  for subdivisions in [8u32, 16, 32] {
    let mesh = sphere_mesh(subdivisions);
    let bounds = mesh.aabb();

    group.bench_with_input(BenchmarkId::new("parallel", subdivisions), &subdivisions, |b, _| {
      let config = Config::default().with_parallel(true);
      b.iter(|| black_box(build_volume_data(&mesh, bounds, &config)))
    });

    group.bench_with_input(BenchmarkId::new("serial", subdivisions), &subdivisions, |b, _| {
      let config = Config::default().with_parallel(false);
      b.iter(|| black_box(build_volume_data(&mesh, bounds, &config)))
    });
  }
  group.finish();
}

criterion_group!(brick, bench_single_brick);
criterion_group!(volume, bench_volume_build);
criterion_main!(brick, volume);
