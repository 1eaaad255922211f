//! Sparse mip-mapped distance field volume builder.
//!
//! Drives the per-mip brick computation described in `brick.rs` and
//! compacts the results into the indirection-table + brick-pool layout
//! `serialize.rs` writes to disk.

use crate::accel::Accel;
use crate::brick::{compute_brick, BrickResult};
use crate::constants::{
  self, BRICK_SIZE, BRICK_SIZE_CUBED, INVALID_BRICK_INDEX, MAX_INDIRECTION_DIMENSION,
  MESH_DISTANCE_FIELD_OBJECT_BORDER, NUM_MIPS,
};
use crate::hemisphere::stratified_uniform_hemisphere;
use crate::mesh::{Bounds, Mesh};
use glam::{UVec3, Vec2, Vec3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

const NUM_VOXEL_DISTANCE_SAMPLES: u32 = 49;

/// Tunable knobs for one bake. Mirrors the CLI flags in `bin/sdf_bake.rs`
/// one-to-one.
#[derive(Clone, Debug)]
pub struct Config {
  /// Desired voxels per local-space unit at mip 0, before `resolution_scale`.
  pub voxel_density: f32,
  /// Per-mesh multiplier on `voxel_density` (UE5 calls this the per-mesh
  /// distance field resolution scale).
  pub resolution_scale: f32,
  /// Run brick computation across all available threads with rayon.
  pub parallel: bool,
  /// Seed for the hemisphere sampling PRNG; fixing it makes a bake
  /// reproducible across runs and across `parallel` on/off.
  pub seed: u64,
  /// Emit a per-mip PLY visualization of valid/invalid bricks.
  pub dump_bricks: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      voxel_density: 0.2,
      resolution_scale: 1.0,
      parallel: true,
      seed: 0,
      dump_bricks: false,
    }
  }
}

impl Config {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_voxel_density(mut self, voxel_density: f32) -> Self {
    self.voxel_density = voxel_density;
    self
  }

  pub fn with_resolution_scale(mut self, resolution_scale: f32) -> Self {
    self.resolution_scale = resolution_scale;
    self
  }

  pub fn with_parallel(mut self, parallel: bool) -> Self {
    self.parallel = parallel;
    self
  }

  pub fn with_seed(mut self, seed: u64) -> Self {
    self.seed = seed;
    self
  }

  pub fn with_dump_bricks(mut self, dump_bricks: bool) -> Self {
    self.dump_bricks = dump_bricks;
    self
  }
}

/// Per-mip metadata: indirection grid shape and the UV remapping needed to
/// sample a virtual texture atlas built from this mip's bricks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SparseDistanceFieldMip {
  pub indirection_dimensions: UVec3,
  pub num_distance_field_bricks: u32,
  pub volume_to_virtual_uv_scale: Vec3,
  pub volume_to_virtual_uv_add: Vec3,
  pub distance_field_to_volume_scale_bias: Vec2,
  pub bulk_offset: u32,
  pub bulk_size: u32,
}

/// The complete baked output for one mesh: bounds, per-mip metadata, the
/// always-resident coarsest mip, and the streamable byte blob holding the
/// finer mips.
#[derive(Clone, Debug)]
pub struct VolumeData {
  pub local_space_mesh_bounds: Bounds,
  pub mips: [SparseDistanceFieldMip; NUM_MIPS],
  pub always_loaded_mip: Vec<u8>,
  pub streamable_mips: Vec<u8>,
}

fn max_component(v: Vec3) -> f32 {
  v.x.max(v.y).max(v.z)
}

/// Bakes a sparse, mip-mapped, quantized distance field for `mesh`.
///
/// `mesh_bounds` is typically `mesh.aabb()`; it is taken as a parameter
/// (rather than recomputed here) so callers can bake multiple meshes
/// sharing one bounds, or override it for a custom local space.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(mesh, config)))]
pub fn build_volume_data(mesh: &Mesh, mesh_bounds: Bounds, config: &Config) -> VolumeData {
  if config.resolution_scale <= 0.0 {
    return VolumeData {
      local_space_mesh_bounds: mesh_bounds,
      mips: Default::default(),
      always_loaded_mip: Vec::new(),
      streamable_mips: Vec::new(),
    };
  }

  let accel = Accel::build(mesh);

  let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
  let sample_directions = stratified_uniform_hemisphere(NUM_VOXEL_DISTANCE_SAMPLES, &mut rng);

  // UE5's "ensure minimal 1x1x1 bounds to handle planes": a mesh with zero
  // extent on any axis (a flat plane) still gets a usable volume.
  let local_space_mesh_bounds = mesh_bounds.with_minimum_unit_extent();

  let local_to_volume_scale = 1.0 / max_component(local_space_mesh_bounds.extent());
  let num_voxel_per_local = config.voxel_density * config.resolution_scale;
  let desired_dimensions =
    local_space_mesh_bounds.size() * (num_voxel_per_local / constants::UNIQUE_DATA_BRICK_SIZE as f32);

  let mip0_indirection_dimensions = UVec3::new(
    (desired_dimensions.x.round() as u32).clamp(1, MAX_INDIRECTION_DIMENSION),
    (desired_dimensions.y.round() as u32).clamp(1, MAX_INDIRECTION_DIMENSION),
    (desired_dimensions.z.round() as u32).clamp(1, MAX_INDIRECTION_DIMENSION),
  );

  let mut mips: [SparseDistanceFieldMip; NUM_MIPS] = Default::default();
  let mut always_loaded_mip = Vec::new();
  let mut streamable_mip_data = Vec::new();

  for mip_index in 0..NUM_MIPS {
    let shift = 1u32 << mip_index;
    let indirection_dimensions = UVec3::new(
      constants::div_round_up(mip0_indirection_dimensions.x, shift),
      constants::div_round_up(mip0_indirection_dimensions.y, shift),
      constants::div_round_up(mip0_indirection_dimensions.z, shift),
    );

    let unique_voxels = indirection_dimensions * constants::UNIQUE_DATA_BRICK_SIZE
      - UVec3::splat(2 * MESH_DISTANCE_FIELD_OBJECT_BORDER);
    let texel_size = local_space_mesh_bounds.size() / unique_voxels.as_vec3();
    let distance_field_volume_bounds = local_space_mesh_bounds.expand_by(texel_size);
    let indirection_voxel_size = distance_field_volume_bounds.size() / indirection_dimensions.as_vec3();

    let distance_field_voxel_size = indirection_voxel_size.length() / constants::UNIQUE_DATA_BRICK_SIZE as f32;
    let trace_distance = distance_field_voxel_size * constants::BAND_SIZE_IN_VOXELS as f32;
    let volume_space_max_encoding = trace_distance * local_to_volume_scale;

    let mut brick_coordinates = Vec::with_capacity(
      (indirection_dimensions.x * indirection_dimensions.y * indirection_dimensions.z) as usize,
    );
    for z in 0..indirection_dimensions.z {
      for y in 0..indirection_dimensions.y {
        for x in 0..indirection_dimensions.x {
          brick_coordinates.push(UVec3::new(x, y, z));
        }
      }
    }

    let compute = |coordinate: UVec3| -> BrickResult {
      compute_brick(
        &accel,
        &sample_directions,
        trace_distance,
        distance_field_volume_bounds,
        coordinate,
        indirection_voxel_size,
      )
    };

    let brick_results: Vec<BrickResult> = if config.parallel {
      brick_coordinates.into_par_iter().map(compute).collect()
    } else {
      brick_coordinates.into_iter().map(compute).collect()
    };

    let mut indirection_table = vec![
      INVALID_BRICK_INDEX;
      (indirection_dimensions.x * indirection_dimensions.y * indirection_dimensions.z) as usize
    ];

    // Compaction order is fixed (ascending brick_coordinates, i.e. row-major
    // x-fastest) regardless of the order brick_results finished computing
    // in, so the on-disk layout doesn't depend on parallel/serial dispatch.
    let valid_bricks: Vec<&BrickResult> = brick_results.iter().filter(|b| b.is_valid()).collect();
    let num_bricks = valid_bricks.len() as u32;
    let brick_size_bytes = BRICK_SIZE_CUBED as usize;

    let mut distance_field_brick_data = vec![0u8; valid_bricks.len() * brick_size_bytes];
    for (brick_index, brick) in valid_bricks.iter().enumerate() {
      let indirection_index =
        constants::indirection_linear_index(brick.brick_coordinate.to_array(), indirection_dimensions.to_array());
      indirection_table[indirection_index] = brick_index as u32;
      distance_field_brick_data[brick_index * brick_size_bytes..(brick_index + 1) * brick_size_bytes]
        .copy_from_slice(&brick.voxels);
    }

    let indirection_table_bytes: Vec<u8> = indirection_table.iter().flat_map(|v| v.to_ne_bytes()).collect();
    let mip_data_bytes = indirection_table_bytes.len() + distance_field_brick_data.len();

    let out_mip = &mut mips[mip_index];
    if mip_index == NUM_MIPS - 1 {
      always_loaded_mip.reserve_exact(mip_data_bytes);
      always_loaded_mip.extend_from_slice(&indirection_table_bytes);
      always_loaded_mip.extend_from_slice(&distance_field_brick_data);
      out_mip.bulk_offset = 0;
      out_mip.bulk_size = 0;
    } else {
      out_mip.bulk_offset = streamable_mip_data.len() as u32;
      out_mip.bulk_size = mip_data_bytes as u32;
      streamable_mip_data.extend_from_slice(&indirection_table_bytes);
      streamable_mip_data.extend_from_slice(&distance_field_brick_data);
    }

    out_mip.indirection_dimensions = indirection_dimensions;
    out_mip.num_distance_field_bricks = num_bricks;
    out_mip.distance_field_to_volume_scale_bias =
      Vec2::new(2.0 * volume_space_max_encoding, -volume_space_max_encoding);

    let dims_voxels = (indirection_dimensions * constants::UNIQUE_DATA_BRICK_SIZE).as_vec3();
    let border = Vec3::splat(MESH_DISTANCE_FIELD_OBJECT_BORDER as f32);
    let virtual_uv_min = border / dims_voxels;
    let virtual_uv_size = (dims_voxels - 2.0 * border) / dims_voxels;

    let volume_space_extent = local_space_mesh_bounds.extent() * local_to_volume_scale;
    out_mip.volume_to_virtual_uv_scale = virtual_uv_size / (2.0 * volume_space_extent);
    out_mip.volume_to_virtual_uv_add =
      volume_space_extent * out_mip.volume_to_virtual_uv_scale + virtual_uv_min;
  }

  VolumeData {
    local_space_mesh_bounds,
    mips,
    always_loaded_mip,
    streamable_mips: streamable_mip_data,
  }
}

#[cfg(test)]
#[path = "volume_test.rs"]
mod volume_test;
