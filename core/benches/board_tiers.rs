use criterion::{Criterion, criterion_group, criterion_main};
use estopim_core::*;

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (name, config) in [
        ("beginner", GameConfig::beginner()),
        ("intermediate", GameConfig::intermediate()),
        ("dense_64", GameConfig::new_unchecked(64, 1024)),
    ] {
        group.bench_function(name, |b| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                RandomMineLayoutGenerator::new(seed).generate(config)
            })
        });
    }
    group.finish();
}

fn bench_cascade(c: &mut Criterion) {
    // worst case for the flood fill: one giant zero region
    let layout = MineLayout::from_mine_coords((64, 64), &[]).unwrap();
    c.bench_function("cascade_64_empty", |b| {
        b.iter(|| {
            let mut game = Game::new(layout.clone());
            game.reveal((0, 0)).unwrap()
        })
    });
}

criterion_group!(benches, bench_generation, bench_cascade);
criterion_main!(benches);
