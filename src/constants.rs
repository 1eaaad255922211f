//! Brick and mip layout constants for the sparse distance field.
//!
//! These are part of the on-disk contract (see `serialize.rs`): changing any
//! of them changes the byte layout of every `.bin` file this crate writes.
//!
//! # Brick layout
//!
//! Each brick stores `BRICK_SIZE^3` quantized distance bytes. Of those,
//! `UNIQUE_DATA_BRICK_SIZE^3` are the interior voxels unique to the brick;
//! the outer shell duplicates the neighboring brick's edge so a GPU sampler
//! can trilinearly filter across brick boundaries without special-casing
//! seams.

/// Usable (non-shared-border) voxels per brick axis.
pub const UNIQUE_DATA_BRICK_SIZE: u32 = 7;

/// Stored voxels per brick axis, including the shared 1-voxel border.
pub const BRICK_SIZE: u32 = 8;

/// Narrow-band trace radius, in voxels.
pub const BAND_SIZE_IN_VOXELS: u32 = 4;

/// Sentinel brick index for empty indirection-table cells.
pub const INVALID_BRICK_INDEX: u32 = 0xFFFF_FFFF;

/// Clamp applied to each axis of a mip-0 indirection grid.
pub const MAX_INDIRECTION_DIMENSION: u32 = 1024;

/// Extra voxel border placed around the mesh bounds for every mip.
pub const MESH_DISTANCE_FIELD_OBJECT_BORDER: u32 = 1;

/// Number of mip levels; the last is always resident.
pub const NUM_MIPS: usize = 3;

/// Total voxels stored per brick (`BRICK_SIZE^3`).
pub const BRICK_SIZE_CUBED: u32 = BRICK_SIZE * BRICK_SIZE * BRICK_SIZE;

/// Linear index of voxel `(x, y, z)` within one brick.
///
/// Z-major: matches the brick task's innermost loop and the brick dump's
/// voxel enumeration so both sides agree on layout without a lookup table.
#[inline(always)]
pub const fn brick_voxel_index(x: u32, y: u32, z: u32) -> usize {
  (z * BRICK_SIZE * BRICK_SIZE + y * BRICK_SIZE + x) as usize
}

/// Linear index of indirection cell `(x, y, z)` within a `dims`-sized grid.
///
/// Row-major, x fastest: this is also the brick-task generation order, which
/// the compaction step in `volume.rs` depends on for reproducibility.
#[inline(always)]
pub const fn indirection_linear_index(coord: [u32; 3], dims: [u32; 3]) -> usize {
  ((coord[2] * dims[1] + coord[1]) * dims[0] + coord[0]) as usize
}

/// Integer division rounded up.
#[inline(always)]
pub const fn div_round_up(dividend: u32, divisor: u32) -> u32 {
  (dividend + divisor - 1) / divisor
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
