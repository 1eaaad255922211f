//! Library-level error types.
//!
//! These cover recoverable failures in mesh import and binary
//! (de)serialization. CLI-level failures (bad flags, file-not-found at the
//! harness boundary) are handled with `anyhow` in the binary instead; see
//! `bin/sdf_bake.rs`.

use thiserror::Error;

/// Failures that can occur while importing a mesh from disk.
#[derive(Error, Debug)]
pub enum MeshImportError {
  #[error("failed to read mesh file: {0}")]
  Io(#[from] std::io::Error),

  #[error("unrecognized PLY header: {0}")]
  InvalidHeader(String),

  #[error("PLY file declares {declared} vertices but only {found} were parsed")]
  VertexCountMismatch { declared: usize, found: usize },

  #[error("PLY file declares {declared} faces but only {found} were parsed")]
  FaceCountMismatch { declared: usize, found: usize },

  #[error("face at line {line} is not a triangle or quad ({vertex_count} vertices)")]
  UnsupportedFaceArity { line: usize, vertex_count: usize },

  #[error("malformed numeric field on line {line}: {source}")]
  ParseFloat {
    line: usize,
    #[source]
    source: std::num::ParseFloatError,
  },

  #[error("malformed index field on line {line}: {source}")]
  ParseInt {
    line: usize,
    #[source]
    source: std::num::ParseIntError,
  },

  #[error("mesh has no triangles")]
  EmptyMesh,
}

/// Failures that can occur while reading back a serialized volume.
#[derive(Error, Debug)]
pub enum VolumeDeserializeError {
  #[error("failed to read volume file: {0}")]
  Io(#[from] std::io::Error),

  #[error("unexpected end of stream while reading {field}")]
  UnexpectedEof { field: &'static str },
}
