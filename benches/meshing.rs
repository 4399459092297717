use criterion::{criterion_group, criterion_main, Criterion, black_box};

use voxsculpt::core::{Vec3, WorldConfig};
use voxsculpt::mesh::{extract_mesh, mesh_store, MeshOptions, PaddedBlock, SamplingPolicy};
use voxsculpt::voxel::{apply_edit, ChunkCoord, MissingChunkPolicy, SphereEdit, Voxel, VoxelChunk, World};
use voxsculpt::core::RadiusBounds;

/// Sphere of radius `r` centred in a chunk of edge `size`
fn sphere_chunk(size: u32, r: f32) -> VoxelChunk {
    let c = size as f32 / 2.0;
    VoxelChunk::from_fn(size, |p| {
        let d = p.as_vec3() + 0.5 - Vec3::splat(c);
        if d.length_squared() < r * r { Voxel(2) } else { Voxel::EMPTY }
    })
}

/// Scattered voxels: worst case for quad merging
fn noisy_chunk(size: u32) -> VoxelChunk {
    VoxelChunk::from_fn(size, |p| {
        let h = p.x.wrapping_mul(73_856_093) ^ p.y.wrapping_mul(19_349_663) ^ p.z.wrapping_mul(83_492_791);
        if h % 3 == 0 { Voxel((h % 5) as u8 + 1) } else { Voxel::EMPTY }
    })
}

fn bench_mesh_sphere_16(c: &mut Criterion) {
    let chunk = sphere_chunk(16, 7.0);
    let options = MeshOptions::default();

    c.bench_function("mesh_sphere_16", |b| {
        b.iter(|| extract_mesh(black_box(&chunk), &options));
    });
}

fn bench_mesh_sphere_32(c: &mut Criterion) {
    let chunk = sphere_chunk(32, 14.0);
    let options = MeshOptions::default();

    c.bench_function("mesh_sphere_32", |b| {
        b.iter(|| extract_mesh(black_box(&chunk), &options));
    });
}

fn bench_mesh_noisy_16(c: &mut Criterion) {
    let chunk = noisy_chunk(16);
    let welded = MeshOptions { weld_vertices: true, ..Default::default() };

    c.bench_function("mesh_noisy_16", |b| {
        b.iter(|| extract_mesh(black_box(&chunk), &MeshOptions::default()));
    });
    c.bench_function("mesh_noisy_16_welded", |b| {
        b.iter(|| extract_mesh(black_box(&chunk), &welded));
    });
}

fn bench_mesh_padded(c: &mut Criterion) {
    let world = World::new(WorldConfig::default()).expect("default config is valid");
    let store = world.snapshot();
    let coord = ChunkCoord::new(1, 1, 0);

    c.bench_function("padded_block_gather_16", |b| {
        b.iter(|| PaddedBlock::from_store(black_box(&store), coord));
    });

    let options = MeshOptions { sampling: SamplingPolicy::Padded, ..Default::default() };
    c.bench_function("mesh_store_padded_8x4", |b| {
        b.iter(|| mesh_store(black_box(&store), &options));
    });
}

fn bench_sphere_edit(c: &mut Criterion) {
    let world = World::new(WorldConfig::default()).expect("default config is valid");
    let store = world.snapshot();
    let bounds = RadiusBounds::default();
    let edit = SphereEdit::new(Vec3::new(16.0, 16.0, 8.0), 8.0, Voxel(3), &bounds)
        .expect("radius within bounds");

    c.bench_function("sphere_edit_r8_chunk_corner", |b| {
        b.iter(|| apply_edit(black_box(&store), &edit, MissingChunkPolicy::Drop));
    });
}

criterion_group!(
    benches,
    bench_mesh_sphere_16,
    bench_mesh_sphere_32,
    bench_mesh_noisy_16,
    bench_mesh_padded,
    bench_sphere_edit,
);
criterion_main!(benches);
