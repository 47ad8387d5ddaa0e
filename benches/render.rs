#[macro_use]
extern crate criterion;

use criterion::Criterion;
use mandeltiles::{Renderer, TileAddress, DEFAULT_ITERATIONS};

fn tile_single(c: &mut Criterion) {
    let renderer = Renderer::for_tile(TileAddress::new(1, 0, 0), 256, DEFAULT_ITERATIONS).unwrap();
    c.bench_function("tile 256 single thread", move |b| b.iter(|| renderer.render_single()));
}

fn tile_pool(c: &mut Criterion) {
    let renderer = Renderer::for_tile(TileAddress::new(1, 0, 0), 256, DEFAULT_ITERATIONS).unwrap();
    let threads = num_cpus::get();
    c.bench_function("tile 256 worker pool", move |b| {
        b.iter(|| renderer.render(threads).unwrap())
    });
}

criterion_group!(benches, tile_single, tile_pool);
criterion_main!(benches);
