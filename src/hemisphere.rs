//! Stratified hemisphere sampling for the inside/outside voting pass.
//!
//! Matches the reference generator's two-pass construction: a stratified
//! grid of `+Z` hemisphere directions, then a second independent stratified
//! grid mirrored onto `-Z`, concatenated into one direction list. The two
//! passes are NOT the same directions negated; each draws its own random
//! numbers, so the final set is not perfectly symmetric.

use glam::Vec3;
use rand::Rng;

/// Concentric disk-to-hemisphere mapping (Shirley & Chiu, 1997). `uv` are
/// stratified `[0, 1)` samples; the result is a unit `+Z` hemisphere
/// direction.
fn uniform_hemisphere_sample(uv: (f32, f32)) -> Vec3 {
  let u = uv.0 * 2.0 - 1.0;
  let v = uv.1 * 2.0 - 1.0;
  if u == 0.0 && v == 0.0 {
    return Vec3::ZERO;
  }

  let (r, theta) = if u.abs() > v.abs() {
    (u, std::f32::consts::FRAC_PI_4 * (v / u))
  } else {
    (v, std::f32::consts::FRAC_PI_2 - std::f32::consts::FRAC_PI_4 * (u / v))
  };

  let x = r * theta.cos();
  let y = r * theta.sin();
  let r2 = r * r;

  Vec3::new(x * (2.0 - r2).sqrt(), y * (2.0 - r2).sqrt(), 1.0 - r2)
}

/// One stratified pass over a `floor(sqrt(num_samples))`-sided grid of
/// `+Z` hemisphere directions.
///
/// Reproduces the reference implementation's `frac2` indexing exactly: the
/// second stratification coordinate is computed from `x_index`, not
/// `y_index`. This under-stratifies the grid's second axis, but changing it
/// would shift every baked distance field's inside/outside vote, so the
/// quirk is preserved rather than "fixed".
fn stratified_uniform_hemisphere_pass(num_samples: u32, rng: &mut impl Rng) -> Vec<Vec3> {
  let dim = (num_samples as f64).sqrt() as u32;
  let mut samples = Vec::with_capacity((dim * dim) as usize);

  for x_index in 0..dim {
    for _y_index in 0..dim {
      let u1: f32 = rng.random();
      let u2: f32 = rng.random();

      let frac1 = (x_index as f32 + u1) / dim as f32;
      let frac2 = (x_index as f32 + u2) / dim as f32;

      samples.push(uniform_hemisphere_sample((frac1, frac2)));
    }
  }

  samples
}

/// The full voting direction set for one brick task: a stratified `+Z`
/// hemisphere pass, followed by a second independent pass mirrored onto
/// `-Z`. For `num_samples = 49` this yields `2 * 7 * 7 = 98` directions.
pub fn stratified_uniform_hemisphere(num_samples: u32, rng: &mut impl Rng) -> Vec<Vec3> {
  let mut directions = stratified_uniform_hemisphere_pass(num_samples, rng);
  let other_half = stratified_uniform_hemisphere_pass(num_samples, rng);
  directions.extend(other_half.into_iter().map(|s| Vec3::new(s.x, s.y, -s.z)));
  directions
}

#[cfg(test)]
#[path = "hemisphere_test.rs"]
mod hemisphere_test;
