//! Command-line mesh distance field baker.
//!
//! Reads an ASCII PLY mesh, bakes a sparse mip-mapped quantized distance
//! field, and writes the result as `<output>.bin`. Optionally dumps a
//! per-mip ASCII PLY visualization of which bricks were kept.

use anyhow::{Context, Result};
use clap::Parser;
use sdf_bake::volume::{build_volume_data, Config};
use sdf_bake::{ply, serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

/// Bakes a sparse, mip-mapped, quantized signed distance field for a mesh.
#[derive(Parser, Debug)]
#[command(name = "sdf_bake")]
#[command(about = "Bakes a sparse mip-mapped distance field for a PLY mesh")]
struct Args {
  /// Input mesh, ASCII PLY.
  #[arg(short = 'i', long = "input", default_value = "meshes/test_sphere.ply")]
  input: PathBuf,

  /// Output path prefix. Writes `<output>.bin`, and with `--brick`,
  /// `<output><mip>_valid_bricks.ply` / `<output><mip>_invalid_bricks.ply`.
  #[arg(short = 'o', long = "output", default_value = "DF_OUTPUT")]
  output: PathBuf,

  /// Desired voxels per local-space unit at mip 0.
  #[arg(short = 'v', long = "voxel-density", default_value_t = 0.2)]
  voxel_density: f32,

  /// Per-mesh distance field resolution scale.
  #[arg(long = "scale", default_value_t = 1.0)]
  resolution_scale: f32,

  /// Disable rayon parallelism across brick tasks.
  #[arg(long = "no-parallel")]
  no_parallel: bool,

  /// Dump a per-mip ASCII PLY visualization of valid/invalid bricks.
  #[arg(long = "brick")]
  dump_bricks: bool,

  /// Seed for the hemisphere-sampling PRNG.
  #[arg(long = "seed", default_value_t = 0)]
  seed: u64,
}

fn main() -> Result<()> {
  let args = Args::parse();

  let read_start = Instant::now();
  let input_file =
    File::open(&args.input).with_context(|| format!("failed to open input mesh {}", args.input.display()))?;
  let mesh = ply::parse_ply_mesh(input_file)
    .with_context(|| format!("failed to parse PLY mesh {}", args.input.display()))?;
  println!(
    "Read PLY model '{}' in {:.1}s.",
    args.input.display(),
    read_start.elapsed().as_secs_f64()
  );

  let config = Config::new()
    .with_voxel_density(args.voxel_density)
    .with_resolution_scale(args.resolution_scale)
    .with_parallel(!args.no_parallel)
    .with_seed(args.seed)
    .with_dump_bricks(args.dump_bricks);

  let bake_start = Instant::now();
  let bounds = mesh.aabb();
  let volume = build_volume_data(&mesh, bounds, &config);
  println!(
    "Distance field calculation finished in {:.1}s.",
    bake_start.elapsed().as_secs_f64()
  );

  if config.dump_bricks {
    let write_start = Instant::now();
    for mip_index in 0..volume.mips.len() {
      let valid_path = format!("{}{}_valid_bricks.ply", args.output.display(), mip_index);
      let invalid_path = format!("{}{}_invalid_bricks.ply", args.output.display(), mip_index);

      let mut valid = BufWriter::new(
        File::create(&valid_path).with_context(|| format!("failed to create {valid_path}"))?,
      );
      let mut invalid = BufWriter::new(
        File::create(&invalid_path).with_context(|| format!("failed to create {invalid_path}"))?,
      );

      ply::dump_mip_bricks(&mut valid, &mut invalid, &volume, mip_index)
        .with_context(|| format!("failed to write brick visualization for mip {mip_index}"))?;
    }
    println!("Write results in {:.1}s.", write_start.elapsed().as_secs_f64());
  }

  let serialize_start = Instant::now();
  let bin_path = format!("{}.bin", args.output.display());
  let mut out = BufWriter::new(File::create(&bin_path).with_context(|| format!("failed to create {bin_path}"))?);
  serialize::serialize(&mut out, &volume).with_context(|| format!("failed to write {bin_path}"))?;
  println!(
    "Write binary results in {:.1}ms.",
    serialize_start.elapsed().as_secs_f64() * 1000.0
  );

  Ok(())
}
