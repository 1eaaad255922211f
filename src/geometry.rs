//! Double-precision geometry kernel: closest point on a segment or triangle,
//! and the plane primitive they're built from.
//!
//! All arithmetic here is `f64` even though the rest of the crate is `f32`;
//! mesh vertices are cast up at the call site. This keeps the Voronoi-region
//! classification stable for thin, near-degenerate triangles where a
//! single-precision cross product can flip sign.

use glam::DVec3;

/// An oriented plane, defined by a point on the plane and a unit normal.
#[derive(Clone, Copy, Debug)]
pub struct Plane {
  point: DVec3,
  normal: DVec3,
}

impl Plane {
  /// Construct from a point and a (not necessarily unit) normal.
  pub fn new(point: DVec3, normal: DVec3) -> Self {
    Self {
      point,
      normal: normal.normalize(),
    }
  }

  /// Construct the plane through three points, oriented by `(b-a) x (c-b)`.
  pub fn from_triangle(a: DVec3, b: DVec3, c: DVec3) -> Self {
    Self::new(a, (b - a).cross(c - b))
  }

  /// Signed distance from `p` to the plane along the normal.
  pub fn plane_dot(&self, p: DVec3) -> f64 {
    (p - self.point).dot(self.normal)
  }

  /// Orthogonal projection of `p` onto the plane.
  pub fn point_projection(&self, p: DVec3) -> DVec3 {
    p - self.plane_dot(p) * self.normal
  }
}

/// Closest point to `p` on the segment `[start, end]`.
pub fn closest_point_on_segment(p: DVec3, start: DVec3, end: DVec3) -> DVec3 {
  let segment = end - start;
  let vec_to_point = p - start;

  let dot1 = vec_to_point.dot(segment);
  if dot1 <= 0.0 {
    return start;
  }

  let dot2 = segment.dot(segment);
  if dot2 <= dot1 {
    return end;
  }

  start + segment * (dot1 / dot2)
}

/// Closest point to `p` on triangle `(a, b, c)`, by 7-region Voronoi
/// classification against the triangle's three edge planes.
///
/// The 8th ("impossible") region can only be reached through numerical
/// degeneracy (e.g. a zero-area triangle); it logs a diagnostic and returns
/// `p` unchanged rather than panicking, per the error-handling contract.
pub fn closest_point_on_triangle(p: DVec3, a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
  let ba = a - b;
  let ac = c - a;
  let cb = b - c;
  let normal = ba.cross(cb).normalize();

  let planes = [
    Plane::new(b, normal.cross(ba)),
    Plane::new(a, normal.cross(ac)),
    Plane::new(c, normal.cross(cb)),
  ];

  let mut mask = 0u8;
  for (i, plane) in planes.iter().enumerate() {
    if plane.plane_dot(p) > 0.0 {
      mask |= 1 << i;
    }
  }

  match mask {
    0b000 => Plane::new(a, normal).point_projection(p),
    0b001 => closest_point_on_segment(p, b, a),
    0b010 => closest_point_on_segment(p, a, c),
    0b011 => a,
    0b100 => closest_point_on_segment(p, b, c),
    0b101 => b,
    0b110 => c,
    _ => {
      #[cfg(feature = "tracing")]
      tracing::warn!("impossible Voronoi mask {mask:#05b} in closest_point_on_triangle");
      #[cfg(not(feature = "tracing"))]
      eprintln!("sdf_bake: impossible Voronoi mask {mask:#05b} in closest_point_on_triangle");
      p
    }
  }
}

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;
