// Copyright 2025 the Tessella Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tessella_grid::{Aabb, BinaryWord, Grid};
use tessella_paving::{GridCell, GridTreeSet, intersection, join};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_bool(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }
}

fn random_paving(seed: u64, cells: usize, max_word: usize) -> GridTreeSet {
    let grid = Grid::unit(2);
    let mut rng = Rng::new(seed);
    let mut set = GridTreeSet::new(grid.clone());
    for _ in 0..cells {
        let len = (rng.next_u64() as usize) % (max_word + 1);
        let word: BinaryWord = (0..len).map(|_| rng.next_bool()).collect();
        set.adjoin(&GridCell::new(grid.clone(), 0, word));
    }
    set
}

fn bench_outer_approximation(c: &mut Criterion) {
    let mut group = c.benchmark_group("outer_approximation");
    let bx = Aabb::from_corners(&[0.21, 0.13], &[0.67, 0.58]);
    for depth in [2usize, 4, 6] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut set = GridTreeSet::unit(2);
                set.adjoin_outer_approximation(black_box(&bx), depth);
                black_box(set.size())
            });
        });
    }
    group.finish();
}

fn bench_set_algebra(c: &mut Criterion) {
    let a = random_paving(0xCAFE_F00D_DEAD_BEEF, 64, 10);
    let b = random_paving(0xBADC_0FFE_E123_4567, 64, 10);

    c.bench_function("join_64_cells", |bench| {
        bench.iter(|| black_box(join(&a.as_subset(), &b.as_subset()).size()));
    });
    c.bench_function("intersection_64_cells", |bench| {
        bench.iter(|| black_box(intersection(&a.as_subset(), &b.as_subset()).size()));
    });
}

fn bench_iteration(c: &mut Criterion) {
    let set = random_paving(0x1234_5678_9ABC_DEF0, 256, 12);
    c.bench_function("iterate_enabled_cells", |bench| {
        bench.iter(|| {
            let mut measure = 0.0;
            for cell in black_box(&set) {
                measure += cell.space_box().measure();
            }
            black_box(measure)
        });
    });
}

criterion_group!(
    benches,
    bench_outer_approximation,
    bench_set_algebra,
    bench_iteration
);
criterion_main!(benches);
