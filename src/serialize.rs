//! Binary (de)serialization for a baked [`VolumeData`].
//!
//! The layout is sequential and versionless, matching the reference
//! serializer: fixed-size fields (the bounds, the mip array) are written
//! raw with no length prefix; only the two variable-length byte blobs get
//! a `u32` length prefix before their bytes. Everything is native-endian.
//! There is no format version tag — this is an intermediate bake artifact
//! read back by the same binary that wrote it, not a long-lived asset
//! format.

use crate::constants::NUM_MIPS;
use crate::error::VolumeDeserializeError;
use crate::mesh::Bounds;
use crate::volume::{SparseDistanceFieldMip, VolumeData};
use glam::{Vec2, Vec3};
use std::io::{self, Read, Write};

fn write_vec3(w: &mut impl Write, v: Vec3) -> io::Result<()> {
  w.write_all(&v.x.to_ne_bytes())?;
  w.write_all(&v.y.to_ne_bytes())?;
  w.write_all(&v.z.to_ne_bytes())
}

fn write_vec2(w: &mut impl Write, v: Vec2) -> io::Result<()> {
  w.write_all(&v.x.to_ne_bytes())?;
  w.write_all(&v.y.to_ne_bytes())
}

fn write_uvec3(w: &mut impl Write, v: glam::UVec3) -> io::Result<()> {
  w.write_all(&v.x.to_ne_bytes())?;
  w.write_all(&v.y.to_ne_bytes())?;
  w.write_all(&v.z.to_ne_bytes())
}

fn write_bounds(w: &mut impl Write, bounds: Bounds) -> io::Result<()> {
  write_vec3(w, bounds.min)?;
  write_vec3(w, bounds.max)
}

fn write_mip(w: &mut impl Write, mip: &SparseDistanceFieldMip) -> io::Result<()> {
  write_uvec3(w, mip.indirection_dimensions)?;
  w.write_all(&mip.num_distance_field_bricks.to_ne_bytes())?;
  write_vec3(w, mip.volume_to_virtual_uv_scale)?;
  write_vec3(w, mip.volume_to_virtual_uv_add)?;
  write_vec2(w, mip.distance_field_to_volume_scale_bias)?;
  w.write_all(&mip.bulk_offset.to_ne_bytes())?;
  w.write_all(&mip.bulk_size.to_ne_bytes())
}

fn write_byte_blob(w: &mut impl Write, bytes: &[u8]) -> io::Result<()> {
  w.write_all(&(bytes.len() as u32).to_ne_bytes())?;
  w.write_all(bytes)
}

/// Writes `volume` in the on-disk layout to `w`.
pub fn serialize(w: &mut impl Write, volume: &VolumeData) -> io::Result<()> {
  write_bounds(w, volume.local_space_mesh_bounds)?;
  for mip in &volume.mips {
    write_mip(w, mip)?;
  }
  write_byte_blob(w, &volume.always_loaded_mip)?;
  write_byte_blob(w, &volume.streamable_mips)
}

fn read_exact_or_eof(r: &mut impl Read, buf: &mut [u8], field: &'static str) -> Result<(), VolumeDeserializeError> {
  r.read_exact(buf).map_err(|e| {
    if e.kind() == io::ErrorKind::UnexpectedEof {
      VolumeDeserializeError::UnexpectedEof { field }
    } else {
      VolumeDeserializeError::Io(e)
    }
  })
}

fn read_f32(r: &mut impl Read, field: &'static str) -> Result<f32, VolumeDeserializeError> {
  let mut buf = [0u8; 4];
  read_exact_or_eof(r, &mut buf, field)?;
  Ok(f32::from_ne_bytes(buf))
}

fn read_u32(r: &mut impl Read, field: &'static str) -> Result<u32, VolumeDeserializeError> {
  let mut buf = [0u8; 4];
  read_exact_or_eof(r, &mut buf, field)?;
  Ok(u32::from_ne_bytes(buf))
}

fn read_vec3(r: &mut impl Read, field: &'static str) -> Result<Vec3, VolumeDeserializeError> {
  Ok(Vec3::new(
    read_f32(r, field)?,
    read_f32(r, field)?,
    read_f32(r, field)?,
  ))
}

fn read_vec2(r: &mut impl Read, field: &'static str) -> Result<Vec2, VolumeDeserializeError> {
  Ok(Vec2::new(read_f32(r, field)?, read_f32(r, field)?))
}

fn read_uvec3(r: &mut impl Read, field: &'static str) -> Result<glam::UVec3, VolumeDeserializeError> {
  Ok(glam::UVec3::new(
    read_u32(r, field)?,
    read_u32(r, field)?,
    read_u32(r, field)?,
  ))
}

fn read_bounds(r: &mut impl Read) -> Result<Bounds, VolumeDeserializeError> {
  Ok(Bounds::new(
    read_vec3(r, "bounds.min")?,
    read_vec3(r, "bounds.max")?,
  ))
}

fn read_mip(r: &mut impl Read) -> Result<SparseDistanceFieldMip, VolumeDeserializeError> {
  Ok(SparseDistanceFieldMip {
    indirection_dimensions: read_uvec3(r, "mip.indirection_dimensions")?,
    num_distance_field_bricks: read_u32(r, "mip.num_distance_field_bricks")?,
    volume_to_virtual_uv_scale: read_vec3(r, "mip.volume_to_virtual_uv_scale")?,
    volume_to_virtual_uv_add: read_vec3(r, "mip.volume_to_virtual_uv_add")?,
    distance_field_to_volume_scale_bias: read_vec2(r, "mip.distance_field_to_volume_scale_bias")?,
    bulk_offset: read_u32(r, "mip.bulk_offset")?,
    bulk_size: read_u32(r, "mip.bulk_size")?,
  })
}

fn read_byte_blob(r: &mut impl Read, field: &'static str) -> Result<Vec<u8>, VolumeDeserializeError> {
  let len = read_u32(r, field)? as usize;
  let mut buf = vec![0u8; len];
  read_exact_or_eof(r, &mut buf, field)?;
  Ok(buf)
}

/// Reads back a [`VolumeData`] previously written by [`serialize`].
pub fn deserialize(r: &mut impl Read) -> Result<VolumeData, VolumeDeserializeError> {
  let local_space_mesh_bounds = read_bounds(r)?;

  let mut mips = [SparseDistanceFieldMip::default(); NUM_MIPS];
  for mip in mips.iter_mut() {
    *mip = read_mip(r)?;
  }

  let always_loaded_mip = read_byte_blob(r, "always_loaded_mip")?;
  let streamable_mips = read_byte_blob(r, "streamable_mips")?;

  Ok(VolumeData {
    local_space_mesh_bounds,
    mips,
    always_loaded_mip,
    streamable_mips,
  })
}

#[cfg(test)]
#[path = "serialize_test.rs"]
mod serialize_test;
