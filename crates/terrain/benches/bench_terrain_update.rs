use std::hint::black_box;
use std::time::Instant;

use wayfarer_common::TerrainConfig;
use wayfarer_terrain::{Terrain, TerrainGrid};

fn bench_update(size: u32, iterations: usize) {
    let config = TerrainConfig {
        seed: Some(7),
        ..TerrainConfig::with_size(size, size)
    };
    let Ok(mut terrain) = Terrain::new(&config) else {
        println!("  skipped {size}x{size}: invalid config");
        return;
    };
    let vertices = config.vertex_count();

    let start = Instant::now();
    for _ in 0..iterations {
        terrain.update();
        black_box(terrain.mesh().revision());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  update ({size}x{size}, {vertices} vertices, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_indices(segments: u32, iterations: usize) {
    let Ok(grid) = TerrainGrid::new(100.0, 100.0, segments, segments) else {
        println!("  skipped {segments}x{segments}: invalid grid");
        return;
    };

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(black_box(&grid).indices());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  indices ({segments}x{segments} cells, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Terrain Benchmarks ===\n");

    println!("Height rewrite:");
    bench_update(20, 10000);
    bench_update(100, 1000);
    bench_update(400, 50);

    println!("\nIndex generation:");
    bench_indices(50, 1000);
    bench_indices(200, 100);

    println!("\n=== Done ===");
}
