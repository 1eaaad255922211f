//! ASCII PLY mesh import, and an ASCII PLY point-cloud dump of a baked
//! volume's bricks (valid bricks in one file, invalid/empty ones in
//! another), used to visually sanity-check a bake without a GPU viewer.

use crate::constants::{self, BRICK_SIZE, BRICK_SIZE_CUBED, INVALID_BRICK_INDEX, MESH_DISTANCE_FIELD_OBJECT_BORDER};
use crate::error::MeshImportError;
use crate::mesh::{Bounds, Mesh};
use crate::volume::VolumeData;
use glam::{UVec3, Vec3};
use std::io::{BufRead, BufReader, Read, Write};

/// Parses an ASCII PLY mesh, triangulating quad faces as `(v0, v2, v3)` and
/// `(v0, v1, v2)` — matching the reference loader's `(face[2], new_vert,
/// face[0])` plus `(face[0], face[1], face[2])` split.
pub fn parse_ply_mesh(reader: impl Read) -> Result<Mesh, MeshImportError> {
  let mut lines = BufReader::new(reader).lines();

  let magic = lines.next().ok_or(MeshImportError::InvalidHeader(String::new()))??;
  if magic.trim() != "ply" {
    return Err(MeshImportError::InvalidHeader(magic));
  }

  let mut vertex_count = 0usize;
  let mut face_count = 0usize;
  let mut line_number = 1;

  loop {
    line_number += 1;
    let line = lines
      .next()
      .ok_or_else(|| MeshImportError::InvalidHeader("unexpected end of header".to_string()))??;
    let mut fields = line.split_whitespace();
    match fields.next() {
      Some("end_header") => break,
      Some("element") => {
        let kind = fields.next().unwrap_or_default();
        let count: usize = fields
          .next()
          .unwrap_or_default()
          .parse()
          .map_err(|source| MeshImportError::ParseInt { line: line_number, source })?;
        match kind {
          "vertex" => vertex_count = count,
          "face" => face_count = count,
          _ => {}
        }
      }
      _ => continue,
    }
  }

  let mut vertices = Vec::with_capacity(vertex_count);
  for _ in 0..vertex_count {
    line_number += 1;
    let line = lines
      .next()
      .ok_or_else(|| MeshImportError::VertexCountMismatch {
        declared: vertex_count,
        found: vertices.len(),
      })??;
    let mut fields = line.split_whitespace();
    let mut next_coord = || -> Result<f32, MeshImportError> {
      fields
        .next()
        .ok_or_else(|| MeshImportError::VertexCountMismatch {
          declared: vertex_count,
          found: vertices.len(),
        })?
        .parse()
        .map_err(|source| MeshImportError::ParseFloat { line: line_number, source })
    };
    let x = next_coord()?;
    let y = next_coord()?;
    let z = next_coord()?;
    vertices.push(Vec3::new(x, y, z));
  }

  let mut triangles = Vec::with_capacity(face_count * 2);
  for _ in 0..face_count {
    line_number += 1;
    let line = lines
      .next()
      .ok_or_else(|| MeshImportError::FaceCountMismatch {
        declared: face_count,
        found: triangles.len() / 2,
      })??;
    let mut fields = line.split_whitespace();
    let vertex_arity: usize = fields
      .next()
      .ok_or_else(|| MeshImportError::FaceCountMismatch {
        declared: face_count,
        found: triangles.len(),
      })?
      .parse()
      .map_err(|source| MeshImportError::ParseInt { line: line_number, source })?;

    let mut index = |fields: &mut std::str::SplitWhitespace| -> Result<u32, MeshImportError> {
      fields
        .next()
        .ok_or(MeshImportError::UnsupportedFaceArity {
          line: line_number,
          vertex_count: vertex_arity,
        })?
        .parse()
        .map_err(|source| MeshImportError::ParseInt { line: line_number, source })
    };

    match vertex_arity {
      3 => {
        let a = index(&mut fields)?;
        let b = index(&mut fields)?;
        let c = index(&mut fields)?;
        triangles.push([a, b, c]);
      }
      4 => {
        let a = index(&mut fields)?;
        let b = index(&mut fields)?;
        let c = index(&mut fields)?;
        let d = index(&mut fields)?;
        triangles.push([c, d, a]);
        triangles.push([a, b, c]);
      }
      _ => {
        return Err(MeshImportError::UnsupportedFaceArity {
          line: line_number,
          vertex_count: vertex_arity,
        })
      }
    }
  }

  if triangles.is_empty() {
    return Err(MeshImportError::EmptyMesh);
  }

  Ok(Mesh::new(vertices, triangles))
}

/// Writes one mip's bricks as two ASCII PLY point clouds: every voxel of a
/// valid brick is a light-gray point written to `valid`, every voxel of an
/// invalid (empty, not stored) brick is a black point written to
/// `invalid`. Point density is the full per-voxel grid, not a decimated
/// preview.
pub fn dump_mip_bricks(
  valid: &mut impl Write,
  invalid: &mut impl Write,
  volume: &VolumeData,
  mip_index: usize,
) -> std::io::Result<()> {
  let mesh_bounds = volume.local_space_mesh_bounds;
  let mip = &volume.mips[mip_index];
  let dims = mip.indirection_dimensions;

  let (indirection_table, brick_data) = mip_byte_slices(volume, mip_index);

  let unique_voxels = (dims * constants::UNIQUE_DATA_BRICK_SIZE).as_vec3()
    - Vec3::splat((2 * MESH_DISTANCE_FIELD_OBJECT_BORDER) as f32);
  let distance_field_voxel_size = mesh_bounds.size() / unique_voxels;
  let distance_field_volume_bounds = mesh_bounds.expand_by(distance_field_voxel_size);
  let indirection_voxel_size = distance_field_voxel_size * constants::UNIQUE_DATA_BRICK_SIZE as f32;

  let mut valid_points = Vec::new();
  let mut invalid_points = Vec::new();

  for position_index in 0..(dims.x * dims.y * dims.z) {
    let brick_offset = indirection_table[position_index as usize];
    let is_valid_brick = brick_offset != INVALID_BRICK_INDEX;

    let brick_coordinate = UVec3::new(
      position_index % dims.x,
      position_index / dims.x % dims.y,
      position_index / dims.x / dims.y % dims.z,
    );
    let brick_min_position = distance_field_volume_bounds.min + brick_coordinate.as_vec3() * indirection_voxel_size;

    let points = if is_valid_brick { &mut valid_points } else { &mut invalid_points };
    for i in 0..BRICK_SIZE_CUBED {
      let voxel_coordinate = UVec3::new(
        i % BRICK_SIZE,
        i / BRICK_SIZE % BRICK_SIZE,
        i / BRICK_SIZE / BRICK_SIZE,
      );
      let sample_position = voxel_coordinate.as_vec3() * distance_field_voxel_size + brick_min_position;
      points.push(sample_position);
    }
  }

  // brick_data is read but not written to the point cloud: the reference
  // visualization only plots sample positions and a validity color, not
  // the quantized distance value at each point.
  let _ = brick_data;

  write_ply_points(valid, &valid_points, (200, 200, 200))?;
  write_ply_points(invalid, &invalid_points, (0, 0, 0))
}

fn mip_byte_slices(volume: &VolumeData, mip_index: usize) -> (Vec<u32>, &[u8]) {
  let mip = &volume.mips[mip_index];
  let dims = mip.indirection_dimensions;
  let indirection_table_len = (dims.x * dims.y * dims.z) as usize;
  let indirection_table_bytes = indirection_table_len * 4;

  let bytes: &[u8] = if mip_index == volume.mips.len() - 1 {
    &volume.always_loaded_mip
  } else {
    &volume.streamable_mips[mip.bulk_offset as usize..(mip.bulk_offset + mip.bulk_size) as usize]
  };

  let indirection_table = bytes[..indirection_table_bytes]
    .chunks_exact(4)
    .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
    .collect();

  (indirection_table, &bytes[indirection_table_bytes..])
}

fn write_ply_points(w: &mut impl Write, points: &[Vec3], color: (u8, u8, u8)) -> std::io::Result<()> {
  writeln!(w, "ply")?;
  writeln!(w, "format ascii 1.0")?;
  writeln!(w, "element vertex {}", points.len())?;
  writeln!(w, "property float x")?;
  writeln!(w, "property float y")?;
  writeln!(w, "property float z")?;
  writeln!(w, "property uchar red")?;
  writeln!(w, "property uchar green")?;
  writeln!(w, "property uchar blue")?;
  writeln!(w, "end_header")?;
  for p in points {
    writeln!(w, "{} {} {} {} {} {}", p.x, p.y, p.z, color.0, color.1, color.2)?;
  }
  Ok(())
}

#[cfg(test)]
#[path = "ply_test.rs"]
mod ply_test;
