use super::*;

#[test]
fn brick_voxel_index_covers_full_range_without_collisions() {
  let mut seen = [false; BRICK_SIZE_CUBED as usize];
  for z in 0..BRICK_SIZE {
    for y in 0..BRICK_SIZE {
      for x in 0..BRICK_SIZE {
        let idx = brick_voxel_index(x, y, z);
        assert!(!seen[idx], "duplicate index at ({x}, {y}, {z})");
        seen[idx] = true;
      }
    }
  }
  assert!(seen.iter().all(|&b| b));
}

#[test]
fn indirection_linear_index_is_row_major_x_fastest() {
  let dims = [3, 4, 5];
  assert_eq!(indirection_linear_index([0, 0, 0], dims), 0);
  assert_eq!(indirection_linear_index([1, 0, 0], dims), 1);
  assert_eq!(indirection_linear_index([0, 1, 0], dims), 3);
  assert_eq!(indirection_linear_index([0, 0, 1], dims), 12);
}

#[test]
fn div_round_up_matches_ceil_division() {
  assert_eq!(div_round_up(7, 2), 4);
  assert_eq!(div_round_up(8, 2), 4);
  assert_eq!(div_round_up(1, 1024), 1);
  assert_eq!(div_round_up(0, 4), 0);
}
