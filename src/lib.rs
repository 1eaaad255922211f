//! sdf_bake - sparse, mip-mapped, quantized mesh signed distance field
//! baking.
//!
//! Bakes a triangle mesh into the same on-disk representation UE5 uses for
//! its offline mesh distance fields: a small indirection grid of `8^3`
//! bricks per mip level, quantized to one byte per voxel, with the
//! coarsest mip always resident and finer mips held in a separate
//! streamable byte blob.
//!
//! # Pipeline
//!
//! 1. [`mesh`] holds the input triangle soup and its bounds.
//! 2. [`accel`] builds a bounding volume hierarchy over the mesh for
//!    closest-point and ray queries.
//! 3. [`hemisphere`] generates the stratified ray-voting directions used to
//!    resolve inside/outside ambiguity.
//! 4. [`brick`] computes one `8^3` brick's quantized distances.
//! 5. [`volume`] drives `brick` across every mip level and compacts the
//!    results into a [`volume::VolumeData`].
//! 6. [`serialize`] writes and reads back a [`volume::VolumeData`] in its
//!    binary layout.
//! 7. [`ply`] imports meshes and dumps brick visualizations, both in ASCII
//!    PLY.
//!
//! # Example
//!
//! ```ignore
//! use sdf_bake::{mesh::Mesh, volume};
//!
//! let mesh: Mesh = /* ... */;
//! let bounds = mesh.aabb();
//! let config = volume::Config::default();
//! let baked = volume::build_volume_data(&mesh, bounds, &config);
//! ```

pub mod accel;
pub mod brick;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod hemisphere;
pub mod mesh;
pub mod ply;
pub mod serialize;
pub mod volume;

pub use accel::{Accel, RayHit};
pub use error::{MeshImportError, VolumeDeserializeError};
pub use mesh::{Bounds, Mesh};
pub use volume::{build_volume_data, Config, SparseDistanceFieldMip, VolumeData};
