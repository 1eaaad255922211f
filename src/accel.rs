//! Triangle-soup acceleration structure: closest-point queries with a
//! shrinking search radius, and ray intersection with geometric normals.
//!
//! A small median-split bounding volume hierarchy, built once per mesh and
//! queried many times per brick. There is no long-lived ray/point context
//! object the way a production ray-tracing kernel would have one: Rust's
//! borrow checker makes a `&Accel` itself the cheap, `Sync` per-query
//! handle, so brick tasks just share a `&Accel` across threads instead of
//! constructing a context per query.

use crate::geometry::closest_point_on_triangle;
use crate::mesh::{Bounds, Mesh};
use glam::Vec3;

const LEAF_TRIANGLE_COUNT: usize = 4;

/// Result of a successful ray intersection.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
  pub t: f32,
  /// Unit geometric normal, or the zero vector if the hit triangle's
  /// unnormalized normal was too small to normalize safely.
  pub geometric_normal: Vec3,
}

#[derive(Clone, Copy, Debug)]
enum NodeKind {
  Leaf { start: u32, count: u32 },
  Internal { left: u32, right: u32 },
}

#[derive(Clone, Copy, Debug)]
struct Node {
  bounds: Bounds,
  kind: NodeKind,
}

/// An immutable bounding volume hierarchy over one mesh's triangles.
pub struct Accel {
  nodes: Vec<Node>,
  triangles: Vec<(Vec3, Vec3, Vec3)>,
  root: u32,
}

impl Accel {
  /// Builds the hierarchy from `mesh`. Triangles are reordered internally;
  /// the mesh itself is left untouched.
  pub fn build(mesh: &Mesh) -> Self {
    let mut triangles: Vec<(Vec3, Vec3, Vec3)> = mesh
      .triangles
      .iter()
      .map(|&t| mesh.triangle_positions(t))
      .collect();

    let mut nodes = Vec::with_capacity(triangles.len().max(1) * 2);
    let mut indices: Vec<u32> = (0..triangles.len() as u32).collect();
    let root = if indices.is_empty() {
      nodes.push(Node {
        bounds: Bounds::empty(),
        kind: NodeKind::Leaf { start: 0, count: 0 },
      });
      0
    } else {
      build_recursive(&mut nodes, &triangles, &mut indices, 0, indices.len())
    };

    // Reorder triangle storage to match the leaf-contiguous index order the
    // build produced, so leaves address a contiguous slice.
    let reordered = indices.iter().map(|&i| triangles[i as usize]).collect();
    triangles = reordered;

    Self { nodes, triangles, root }
  }

  /// Closest distance from `point` to the mesh surface, searching no
  /// farther than `max_radius`. Returns `None` if nothing is within range.
  pub fn closest_distance(&self, point: Vec3, max_radius: f32) -> Option<f32> {
    let mut best_distance_sq = max_radius * max_radius;
    let mut found = false;
    let mut stack = vec![self.root];

    while let Some(node_index) = stack.pop() {
      let node = &self.nodes[node_index as usize];
      if aabb_distance_sq(point, node.bounds) >= best_distance_sq {
        continue;
      }

      match node.kind {
        NodeKind::Leaf { start, count } => {
          for i in start..start + count {
            let (a, b, c) = self.triangles[i as usize];
            let closest = closest_point_on_triangle(point.as_dvec3(), a.as_dvec3(), b.as_dvec3(), c.as_dvec3());
            let distance_sq = (closest.as_vec3() - point).length_squared();
            if distance_sq < best_distance_sq {
              best_distance_sq = distance_sq;
              found = true;
            }
          }
        }
        NodeKind::Internal { left, right } => {
          stack.push(left);
          stack.push(right);
        }
      }
    }

    found.then(|| best_distance_sq.sqrt())
  }

  /// Casts a ray from `origin` in `direction` (need not be normalized) out
  /// to parametric distance `tfar`. Returns the nearest hit, if any.
  pub fn ray_cast(&self, origin: Vec3, direction: Vec3, tfar: f32) -> Option<RayHit> {
    let mut best: Option<RayHit> = None;
    let mut best_t = tfar;
    let mut stack = vec![self.root];

    while let Some(node_index) = stack.pop() {
      let node = &self.nodes[node_index as usize];
      if !ray_aabb_hit(origin, direction, best_t, node.bounds) {
        continue;
      }

      match node.kind {
        NodeKind::Leaf { start, count } => {
          for i in start..start + count {
            let (a, b, c) = self.triangles[i as usize];
            if let Some((t, normal)) = ray_triangle_intersect(origin, direction, a, b, c) {
              if t >= 0.0 && t < best_t {
                best_t = t;
                best = Some(RayHit {
                  t,
                  geometric_normal: safe_normalize(normal),
                });
              }
            }
          }
        }
        NodeKind::Internal { left, right } => {
          stack.push(left);
          stack.push(right);
        }
      }
    }

    best
  }
}

/// Unsafe-normal epsilon from the reference ray tracer: below this squared
/// length, treat the geometric normal as degenerate rather than dividing by
/// a near-zero length.
const UNSAFE_NORMAL_EPSILON: f32 = 1e-16;

fn safe_normalize(v: Vec3) -> Vec3 {
  if v.length_squared() < UNSAFE_NORMAL_EPSILON {
    Vec3::ZERO
  } else {
    v.normalize()
  }
}

fn aabb_distance_sq(point: Vec3, bounds: Bounds) -> f32 {
  let clamped = point.clamp(bounds.min, bounds.max);
  (clamped - point).length_squared()
}

fn ray_aabb_hit(origin: Vec3, direction: Vec3, tfar: f32, bounds: Bounds) -> bool {
  let inv_dir = Vec3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z);
  let t0 = (bounds.min - origin) * inv_dir;
  let t1 = (bounds.max - origin) * inv_dir;
  let tmin = t0.min(t1);
  let tmax = t0.max(t1);
  let tenter = tmin.x.max(tmin.y).max(tmin.z).max(0.0);
  let texit = tmax.x.min(tmax.y).min(tmax.z).min(tfar);
  tenter <= texit
}

/// Möller–Trumbore ray/triangle intersection. Returns `(t, unnormalized
/// geometric normal)` on a hit.
fn ray_triangle_intersect(origin: Vec3, direction: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<(f32, Vec3)> {
  const EPSILON: f32 = 1e-8;

  let edge1 = b - a;
  let edge2 = c - a;
  let normal = edge1.cross(edge2);

  let h = direction.cross(edge2);
  let det = edge1.dot(h);
  if det.abs() < EPSILON {
    return None;
  }

  let inv_det = 1.0 / det;
  let s = origin - a;
  let u = s.dot(h) * inv_det;
  if !(0.0..=1.0).contains(&u) {
    return None;
  }

  let q = s.cross(edge1);
  let v = direction.dot(q) * inv_det;
  if v < 0.0 || u + v > 1.0 {
    return None;
  }

  let t = edge2.dot(q) * inv_det;
  Some((t, normal))
}

fn triangle_bounds(t: (Vec3, Vec3, Vec3)) -> Bounds {
  Bounds::new(t.0.min(t.1).min(t.2), t.0.max(t.1).max(t.2))
}

fn triangle_centroid(t: (Vec3, Vec3, Vec3)) -> Vec3 {
  (t.0 + t.1 + t.2) / 3.0
}

/// Builds the subtree over `indices[start..end]` in place, appending nodes
/// to `nodes`, and returns the new subtree's root index.
///
/// Splits on the longest axis of the centroid bounds at the median, so the
/// tree stays balanced (depth `O(log n)`) regardless of input order.
fn build_recursive(
  nodes: &mut Vec<Node>,
  triangles: &[(Vec3, Vec3, Vec3)],
  indices: &mut [u32],
  start: usize,
  end: usize,
) -> u32 {
  let mut bounds = Bounds::empty();
  for &i in &indices[start..end] {
    bounds = bounds.union(&triangle_bounds(triangles[i as usize]));
  }

  if end - start <= LEAF_TRIANGLE_COUNT {
    let node_index = nodes.len() as u32;
    nodes.push(Node {
      bounds,
      kind: NodeKind::Leaf {
        start: start as u32,
        count: (end - start) as u32,
      },
    });
    return node_index;
  }

  let mut centroid_bounds = Bounds::empty();
  for &i in &indices[start..end] {
    let c = triangle_centroid(triangles[i as usize]);
    centroid_bounds.min = centroid_bounds.min.min(c);
    centroid_bounds.max = centroid_bounds.max.max(c);
  }

  let extent = centroid_bounds.size();
  let axis = if extent.x >= extent.y && extent.x >= extent.z {
    0
  } else if extent.y >= extent.z {
    1
  } else {
    2
  };

  let mid = start + (end - start) / 2;
  indices[start..end].sort_by(|&a, &b| {
    let ca = triangle_centroid(triangles[a as usize])[axis];
    let cb = triangle_centroid(triangles[b as usize])[axis];
    ca.partial_cmp(&cb).unwrap()
  });

  // Reserve the parent slot up front so we know its index before recursing.
  let node_index = nodes.len() as u32;
  nodes.push(Node {
    bounds,
    kind: NodeKind::Internal { left: 0, right: 0 },
  });

  let left = build_recursive(nodes, triangles, indices, start, mid);
  let right = build_recursive(nodes, triangles, indices, mid, end);
  nodes[node_index as usize].kind = NodeKind::Internal { left, right };

  node_index
}

#[cfg(test)]
#[path = "accel_test.rs"]
mod accel_test;
