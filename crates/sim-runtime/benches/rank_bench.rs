use criterion::{criterion_group, criterion_main, Criterion};
use sim_core::PlayerId;
use sim_runtime::{rank, LeaderboardEntry};

fn entries(n: u64) -> Vec<LeaderboardEntry> {
    (0..n)
        .map(|i| LeaderboardEntry {
            player_id: PlayerId::random(),
            player_name: format!("player-{i}"),
            entity_name: format!("entity-{i}"),
            level: (i % 20) as u32 + 1,
            xp: (i * 37) % 4000,
            total_score: ((i * 13) % 997) as f64,
            total_decisions: (i % 50) as u32,
            success_rate: ((i % 100) as f64) / 100.0,
            standing: ((i * 31) % 101) as f64,
            achievement_count: (i % 7) as usize,
            game_complete: i % 3 == 0,
            creation_seq: i,
        })
        .collect()
}

fn bench_rank(c: &mut Criterion) {
    let pool = entries(1000);
    c.bench_function("rank_1000_players", |b| {
        b.iter(|| rank(pool.clone()))
    });
}

criterion_group!(benches, bench_rank);
criterion_main!(benches);
