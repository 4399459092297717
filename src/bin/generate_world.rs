//! World generator binary: builds a world, meshes every chunk, prints stats.
//!
//! Usage: cargo run --release --bin generate_world -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>     JSON world config (default: built-in defaults)
//!   --seed <SEED>       Terrain seed override
//!   --size <VOXELS>     Chunk edge length override
//!   --jobs <N>          Max parallel chunk builds (default: all cores)
//!   --carve <X,Y,Z,R>   Carve a sphere after generation and remesh
//!
//! Nothing is written to disk; a JSON summary goes to stdout.

use std::path::PathBuf;
use std::time::Instant;

use serde_json::json;

use voxsculpt::core::{Result, Vec3, WorldConfig};
use voxsculpt::mesh::mesh_store;
use voxsculpt::voxel::{Voxel, World};

fn main() {
    voxsculpt::core::logging::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => WorldConfig::load(&PathBuf::from(path))?,
        None => WorldConfig::default(),
    };
    if let Some(seed) = parse_u32_arg(&args, "--seed") {
        config.terrain.seed = seed;
    }
    if let Some(size) = parse_u32_arg(&args, "--size") {
        config.chunk_size = size;
    }
    let carve = parse_str_arg(&args, "--carve").map(|s| parse_sphere(&s)).transpose()?;

    if let Some(jobs) = parse_usize_arg(&args, "--jobs") {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .map_err(|e| voxsculpt::core::Error::InvalidConfig(format!("thread pool: {}", e)))?;
    }

    let start = Instant::now();
    let mut world = World::new(config)?;
    let generate_ms = start.elapsed().as_secs_f64() * 1000.0;

    let start = Instant::now();
    let meshes = mesh_store(world.store(), &world.config().mesh);
    let mesh_ms = start.elapsed().as_secs_f64() * 1000.0;

    let quads: usize = meshes.iter().map(|(_, m)| m.quad_count()).sum();
    let triangles: usize = meshes.iter().map(|(_, m)| m.triangle_count()).sum();
    let vertices: usize = meshes.iter().map(|(_, m)| m.vertices.len()).sum();
    let solid: usize = world.store().iter().map(|(_, c)| c.solid_count()).sum();
    let empty_meshes = meshes.iter().filter(|(_, m)| m.is_empty()).count();

    let edit = match carve {
        Some((center, radius)) => {
            let start = Instant::now();
            let touched = world.edit_sphere(center, radius, Voxel::EMPTY)?;
            let remeshed = world.remesh_dirty();
            Some(json!({
                "center": [center.x, center.y, center.z],
                "radius": radius,
                "touched_chunks": touched.len(),
                "remeshed_chunks": remeshed.len(),
                "elapsed_ms": start.elapsed().as_secs_f64() * 1000.0,
            }))
        }
        None => None,
    };

    let config = world.config();
    let summary = json!({
        "chunk_size": config.chunk_size,
        "extent": config.extent,
        "terrain": config.terrain,
        "generation": world.generation(),
        "chunks": world.store().len(),
        "solid_voxels": solid,
        "mesh": {
            "quads": quads,
            "triangles": triangles,
            "vertices": vertices,
            "empty_chunks": empty_meshes,
        },
        "timings_ms": {
            "generate": generate_ms,
            "mesh": mesh_ms,
        },
        "carve": edit,
    });

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Parse `x,y,z,r`
fn parse_sphere(s: &str) -> Result<(Vec3, f32)> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| voxsculpt::core::Error::InvalidEdit(format!("--carve {}: {}", s, e)))?;
    match parts.as_slice() {
        [x, y, z, r] => Ok((Vec3::new(*x, *y, *z), *r)),
        _ => Err(voxsculpt::core::Error::InvalidEdit(format!(
            "--carve expects x,y,z,r, got {}", s
        ))),
    }
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
