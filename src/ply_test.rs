use super::*;
use crate::volume::{build_volume_data, Config};

const TRIANGLE_PLY: &str = "ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\nproperty float y\nproperty float z\nelement face 1\nproperty list uchar int vertex_indices\nend_header\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";

const QUAD_PLY: &str = "ply\nformat ascii 1.0\nelement vertex 4\nproperty float x\nproperty float y\nproperty float z\nelement face 1\nproperty list uchar int vertex_indices\nend_header\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 0 1 2 3\n";

#[test]
fn parses_a_simple_triangle() {
  let mesh = parse_ply_mesh(TRIANGLE_PLY.as_bytes()).unwrap();
  assert_eq!(mesh.vertices.len(), 3);
  assert_eq!(mesh.triangles, vec![[0, 1, 2]]);
}

#[test]
fn triangulates_quad_faces_into_two_triangles() {
  let mesh = parse_ply_mesh(QUAD_PLY.as_bytes()).unwrap();
  assert_eq!(mesh.vertices.len(), 4);
  assert_eq!(mesh.triangles.len(), 2);
  assert_eq!(mesh.triangles[0], [2, 3, 0]);
  assert_eq!(mesh.triangles[1], [0, 1, 2]);
}

#[test]
fn rejects_a_file_without_the_ply_magic_line() {
  let err = parse_ply_mesh("not-ply\n".as_bytes()).unwrap_err();
  assert!(matches!(err, MeshImportError::InvalidHeader(_)));
}

#[test]
fn rejects_an_empty_mesh() {
  let empty = "ply\nformat ascii 1.0\nelement vertex 0\nelement face 0\nend_header\n";
  let err = parse_ply_mesh(empty.as_bytes()).unwrap_err();
  assert!(matches!(err, MeshImportError::EmptyMesh));
}

#[test]
fn dump_mip_bricks_writes_valid_ply_headers() {
  let mesh = parse_ply_mesh(QUAD_PLY.as_bytes()).unwrap();
  let bounds = mesh.aabb();
  let volume = build_volume_data(&mesh, bounds, &Config::default().with_parallel(false));

  let mut valid = Vec::new();
  let mut invalid = Vec::new();
  dump_mip_bricks(&mut valid, &mut invalid, &volume, volume.mips.len() - 1).unwrap();

  let valid_text = String::from_utf8(valid).unwrap();
  assert!(valid_text.starts_with("ply\nformat ascii 1.0\n"));
  assert!(valid_text.contains("end_header"));

  let invalid_text = String::from_utf8(invalid).unwrap();
  assert!(invalid_text.starts_with("ply\nformat ascii 1.0\n"));
}
