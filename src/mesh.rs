//! Single-precision triangle mesh and its axis-aligned bounds.

use glam::Vec3;

/// Axis-aligned bounding box, single precision.
///
/// Mirrors `octree::bounds::DAabb3`'s shape but in `f32`, matching the
/// precision the brick task and volume builder work in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
  pub min: Vec3,
  pub max: Vec3,
}

impl Bounds {
  pub fn new(min: Vec3, max: Vec3) -> Self {
    Self { min, max }
  }

  /// Bounds enclosing no points; union with anything returns the other.
  pub fn empty() -> Self {
    Self {
      min: Vec3::splat(f32::MAX),
      max: Vec3::splat(f32::MIN),
    }
  }

  #[inline]
  pub fn size(&self) -> Vec3 {
    self.max - self.min
  }

  #[inline]
  pub fn extent(&self) -> Vec3 {
    self.size() * 0.5
  }

  #[inline]
  pub fn center(&self) -> Vec3 {
    (self.min + self.max) * 0.5
  }

  /// Grow by `amount` on every face.
  pub fn expand_by(&self, amount: Vec3) -> Self {
    Self {
      min: self.min - amount,
      max: self.max + amount,
    }
  }

  pub fn union(&self, other: &Bounds) -> Self {
    Self {
      min: self.min.min(other.min),
      max: self.max.max(other.max),
    }
  }

  /// Re-centers on the same point with extent clamped to at least 1 on
  /// every axis, so a perfectly flat mesh (a single plane) still gets a
  /// usable volume.
  pub fn with_minimum_unit_extent(&self) -> Self {
    let center = self.center();
    let extent = self.extent().max(Vec3::ONE);
    Self {
      min: center - extent,
      max: center + extent,
    }
  }
}

/// A triangle mesh: flat vertex positions and index triples.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
  pub vertices: Vec<Vec3>,
  pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
  pub fn new(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
    Self { vertices, triangles }
  }

  pub fn triangle_count(&self) -> usize {
    self.triangles.len()
  }

  /// World-space positions of one triangle's three corners.
  #[inline]
  pub fn triangle_positions(&self, triangle: [u32; 3]) -> (Vec3, Vec3, Vec3) {
    (
      self.vertices[triangle[0] as usize],
      self.vertices[triangle[1] as usize],
      self.vertices[triangle[2] as usize],
    )
  }

  /// Tight axis-aligned bounds over every vertex.
  pub fn aabb(&self) -> Bounds {
    let mut bounds = Bounds::empty();
    for &v in &self.vertices {
      bounds.min = bounds.min.min(v);
      bounds.max = bounds.max.max(v);
    }
    bounds
  }

  /// The AABB expanded outward by a quarter of its own size on every face,
  /// so the distance field has room to represent the narrow band outside
  /// the mesh's tightest silhouette.
  pub fn expanded_bounding_box(&self) -> Bounds {
    let aabb = self.aabb();
    let size = aabb.size();
    Bounds {
      min: aabb.min - size * 0.25,
      max: aabb.max + size * 0.25,
    }
  }
}

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;
