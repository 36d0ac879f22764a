//! Search benchmarks.
//!
//! Run with: `cargo bench -p chess-agents`

use chess_agents::{alpha_beta, minimax, MctsConfig, MctsSearch, StandardChess, TranspositionCache};
use chess_core::{perft, positions, Color, Position};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn bench_perft(c: &mut Criterion) {
    let position = Position::from_fen(positions::KIWIPETE).unwrap();

    c.bench_function("perft_kiwipete_2", |b| {
        b.iter(|| black_box(perft(&position, 2)))
    });
}

fn bench_fixed_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_depth");
    let position = Position::from_fen(positions::AFTER_E4_E5).unwrap();

    for depth in [1u8, 2] {
        group.bench_with_input(BenchmarkId::new("minimax", depth), &depth, |b, &depth| {
            b.iter(|| black_box(minimax(&StandardChess, &position, Color::White, true, depth)))
        });
        group.bench_with_input(BenchmarkId::new("alpha_beta", depth), &depth, |b, &depth| {
            b.iter(|| {
                black_box(alpha_beta(
                    &StandardChess,
                    &position,
                    Color::White,
                    true,
                    depth,
                    f64::NEG_INFINITY,
                    f64::INFINITY,
                ))
            })
        });
    }

    group.finish();
}

fn bench_mcts_iterations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_iterations");
    group.sample_size(10);
    let position = Position::new();

    for iterations in [50u32, 200] {
        group.throughput(Throughput::Elements(u64::from(iterations)));
        group.bench_with_input(
            BenchmarkId::new("opening", iterations),
            &iterations,
            |b, &iterations| {
                let config = MctsConfig::for_testing().with_max_iterations(iterations);

                b.iter(|| {
                    let mut cache = TranspositionCache::new();
                    let mut rng = ChaCha20Rng::seed_from_u64(42);
                    let mut search = MctsSearch::new(
                        &StandardChess,
                        &mut cache,
                        &mut rng,
                        config.clone(),
                        &position,
                    );
                    black_box(search.run().unwrap())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_fixed_depth, bench_mcts_iterations);
criterion_main!(benches);
