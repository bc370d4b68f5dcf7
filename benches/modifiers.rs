//! Doubler arithmetic benchmarks: fast path vs. exact path, and a full
//! token-creation resolve on a crowded board.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use battlefield_rules::cards::{CardType, Permanent, ReplacementKind, TokenShape};
use battlefield_rules::core::{Board, EngineConfig, PermanentId, Quantity};
use battlefield_rules::effects::{apply_modifiers, modified_amount, Effect, Modifier};

fn token_doublers(n: u32) -> Vec<Modifier> {
    (0..n)
        .map(|i| Modifier {
            source: PermanentId(i),
            kind: ReplacementKind::TokenDoubler,
            multiplier: 2,
            count: Quantity::one(),
        })
        .collect()
}

fn bench_paths(c: &mut Criterion) {
    let effect = Effect::CreateToken { token: TokenShape::creature("Soldier", 1, 1) };
    let base = Quantity::from(3u64);
    let fast = EngineConfig::default().with_exact_threshold(u64::MAX);
    let exact = EngineConfig::default().with_exact_threshold(0);

    let mut group = c.benchmark_group("apply_modifiers");
    for n in [4u32, 32, 128] {
        let modifiers = token_doublers(n);
        group.bench_with_input(BenchmarkId::new("fast", n), &modifiers, |b, m| {
            b.iter(|| apply_modifiers(black_box(&base), m, &effect, &fast))
        });
        group.bench_with_input(BenchmarkId::new("exact", n), &modifiers, |b, m| {
            b.iter(|| apply_modifiers(black_box(&base), m, &effect, &exact))
        });
    }
    group.finish();
}

fn bench_board_scan(c: &mut Criterion) {
    let mut board = Board::new();
    for i in 0..500 {
        let permanent = Permanent::creature(format!("Creature {}", i), 1, 1);
        board.add(permanent);
    }
    for _ in 0..10 {
        board.add(Permanent::new("Parallel Lives", [CardType::Enchantment]).with_replacement(ReplacementKind::TokenDoubler));
    }
    let effect = Effect::named_token("Soldier");
    let config = EngineConfig::default();

    c.bench_function("modified_amount_500", |b| {
        b.iter(|| modified_amount(black_box(&Quantity::one()), &effect, &board, &config))
    });
}

criterion_group!(benches, bench_paths, bench_board_scan);
criterion_main!(benches);
