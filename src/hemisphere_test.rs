use super::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn stratified_uniform_hemisphere_produces_double_the_squared_grid() {
  let mut rng = ChaCha8Rng::seed_from_u64(7);
  let directions = stratified_uniform_hemisphere(49, &mut rng);
  assert_eq!(directions.len(), 98);
}

#[test]
fn stratified_uniform_hemisphere_directions_are_unit_length() {
  let mut rng = ChaCha8Rng::seed_from_u64(7);
  let directions = stratified_uniform_hemisphere(49, &mut rng);
  for d in directions {
    assert!((d.length() - 1.0).abs() < 1e-4, "non-unit direction: {d}");
  }
}

#[test]
fn stratified_uniform_hemisphere_splits_between_hemispheres() {
  let mut rng = ChaCha8Rng::seed_from_u64(7);
  let directions = stratified_uniform_hemisphere(49, &mut rng);
  let (first_half, second_half) = directions.split_at(directions.len() / 2);
  assert!(first_half.iter().all(|d| d.z >= 0.0));
  assert!(second_half.iter().all(|d| d.z <= 0.0));
}

#[test]
fn uniform_hemisphere_sample_maps_disk_center_to_the_pole() {
  assert_eq!(uniform_hemisphere_sample((0.5, 0.5)), Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn stratified_uniform_hemisphere_pass_mean_direction_is_near_the_pole() {
  let mut rng = ChaCha8Rng::seed_from_u64(7);
  let samples = stratified_uniform_hemisphere_pass(49, &mut rng);
  let sum = samples.iter().fold(Vec3::ZERO, |acc, &s| acc + s);
  let mean = sum / samples.len() as f32;
  assert!(mean.x.abs() < 0.15, "mean x out of range: {}", mean.x);
  assert!(mean.y.abs() < 0.15, "mean y out of range: {}", mean.y);
  assert!(mean.z > 0.3 && mean.z < 0.7, "mean z out of range: {}", mean.z);
}
