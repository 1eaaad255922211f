//! Per-brick distance field computation.
//!
//! One [`BrickTask`] owns the work for a single `8^3`-voxel brick: a
//! point-query distance estimate at each voxel, followed by a ray-voting
//! pass that flips the sign for voxels the query thinks are outside the
//! mesh but a majority of traced rays say are actually inside.

use crate::accel::Accel;
use crate::constants::{self, BRICK_SIZE, BRICK_SIZE_CUBED};
use crate::mesh::Bounds;
use glam::{UVec3, Vec3};

const MAX_UINT8: u8 = u8::MAX;
const MIN_UINT8: u8 = u8::MIN;

/// Search radius for the closest-point query, expressed as a multiple of
/// `trace_distance`. The query only needs to be accurate within
/// `trace_distance`, but it is given extra slack so legitimate brick-edge
/// hits aren't missed by floating point error at the exact band boundary.
const QUERY_RADIUS_SCALE: f32 = 1.5;

/// How far to pull a ray's origin back off the sample point before tracing,
/// scaled by `trace_distance`. Prevents the ray from self-intersecting the
/// surface it started arbitrarily close to.
const PULLBACK_EPSILON: f32 = 1e-4;

/// Computed distance field data for one brick, in the layout `serialize.rs`
/// and the indirection table expect.
pub struct BrickResult {
  pub brick_coordinate: UVec3,
  pub voxels: Vec<u8>,
  pub min_distance: u8,
  pub max_distance: u8,
}

impl BrickResult {
  /// A brick is only worth storing if it contains some variation in
  /// distance; a brick that is uniformly one quantized value (entirely
  /// inside or entirely outside the band) carries no surface detail.
  pub fn is_valid(&self) -> bool {
    self.max_distance > MIN_UINT8 && self.min_distance < MAX_UINT8
  }
}

/// Computes one brick's distance field voxels.
///
/// `volume_bounds` is the (already border-expanded) bounds of the whole mip
/// level; `brick_coordinate` locates this brick within the mip's
/// indirection grid; `indirection_voxel_size` is the world-space size of
/// one indirection cell.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(accel, sample_directions)))]
pub fn compute_brick(
  accel: &Accel,
  sample_directions: &[Vec3],
  trace_distance: f32,
  volume_bounds: Bounds,
  brick_coordinate: UVec3,
  indirection_voxel_size: Vec3,
) -> BrickResult {
  let distance_field_voxel_size = indirection_voxel_size / constants::UNIQUE_DATA_BRICK_SIZE as f32;
  let brick_min_position = volume_bounds.min + brick_coordinate.as_vec3() * indirection_voxel_size;

  let mut voxels = vec![0u8; BRICK_SIZE_CUBED as usize];
  let mut min_distance = MAX_UINT8;
  let mut max_distance = MIN_UINT8;

  for z in 0..BRICK_SIZE {
    for y in 0..BRICK_SIZE {
      for x in 0..BRICK_SIZE {
        let sample_position =
          Vec3::new(x as f32, y as f32, z as f32) * distance_field_voxel_size + brick_min_position;
        let index = constants::brick_voxel_index(x, y, z);

        let mut closest_distance = accel
          .closest_distance(sample_position, QUERY_RADIUS_SCALE * trace_distance)
          .unwrap_or(QUERY_RADIUS_SCALE * trace_distance);

        if closest_distance <= trace_distance {
          let mut hit_back_count = 0usize;

          for &direction in sample_directions {
            let start = sample_position - PULLBACK_EPSILON * trace_distance * direction;
            if let Some(hit) = accel.ray_cast(start, direction, trace_distance) {
              if direction.dot(hit.geometric_normal) > 0.0 {
                hit_back_count += 1;
              }
            }
          }

          if hit_back_count != 0 && hit_back_count > sample_directions.len() / 4 {
            closest_distance = -closest_distance;
          }
        }

        let rescaled_distance = (closest_distance + trace_distance) / (2.0 * trace_distance);
        let quantized_distance = (rescaled_distance * 255.0).round().clamp(0.0, 255.0) as u8;

        voxels[index] = quantized_distance;
        min_distance = min_distance.min(quantized_distance);
        max_distance = max_distance.max(quantized_distance);
      }
    }
  }

  BrickResult {
    brick_coordinate,
    voxels,
    min_distance,
    max_distance,
  }
}

#[cfg(test)]
#[path = "brick_test.rs"]
mod brick_test;
