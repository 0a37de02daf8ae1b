//! Tick throughput: a busy range of turrets firing at a row of players
//! driven by seeded random input.

use std::collections::BTreeMap;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use deflect::core::fixed::{to_fixed, FIXED_HALF};
use deflect::game::{
    contact::CircleOverlapFeed,
    ground::StaticGround,
    input::{EdgeDetector, HeldButtons, InputFrame},
    tick::tick,
    world::{EntityId, World},
};
use deflect::{FixedVec2, SceneConfig};

const TICKS: usize = 600;

fn setup_range(turrets: i32, players: i32) -> (World, Vec<EntityId>) {
    let mut config = SceneConfig::default();
    config.turret.fire_interval = to_fixed(0.25);
    config.projectile.speed = to_fixed(0.5);

    let mut world = World::new(config);
    for i in 0..turrets {
        world.spawn_turret(FixedVec2::new(to_fixed(-40.0) + i * to_fixed(0.1), FIXED_HALF));
    }
    let ids = (0..players)
        .map(|i| world.spawn_player(FixedVec2::new(to_fixed(10.0) + i * to_fixed(3.0), FIXED_HALF)))
        .collect();
    world.log.take();
    (world, ids)
}

fn input_stream(players: &[EntityId], seed: u64) -> Vec<BTreeMap<EntityId, InputFrame>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges: Vec<EdgeDetector> = players.iter().map(|_| EdgeDetector::new()).collect();

    (0..TICKS)
        .map(|_| {
            players
                .iter()
                .zip(edges.iter_mut())
                .map(|(id, edge)| {
                    let held = HeldButtons {
                        move_x: rng.gen_range(-127..=127),
                        jump: rng.gen_bool(0.05),
                        parry: rng.gen_bool(0.1),
                    };
                    (*id, edge.sample(held))
                })
                .collect()
        })
        .collect()
}

fn bench_tick(c: &mut Criterion) {
    let ground = StaticGround::flat_floor(0, to_fixed(500.0));

    for (name, turrets, players) in [("tick_small", 1, 1), ("tick_busy", 16, 8)] {
        let (world, ids) = setup_range(turrets, players);
        let inputs = input_stream(&ids, 0xDEF1EC7);

        c.bench_function(name, |b| {
            b.iter_batched(
                || (world.clone(), CircleOverlapFeed::new(world.config.colliders.clone())),
                |(mut world, mut feed)| {
                    for frame in &inputs {
                        tick(&mut world, frame, &ground, &mut feed);
                    }
                    world
                },
                BatchSize::SmallInput,
            )
        });
    }
}

fn bench_hash(c: &mut Criterion) {
    let (world, _) = setup_range(16, 8);
    c.bench_function("world_hash", |b| b.iter(|| world.compute_hash()));
}

criterion_group!(benches, bench_tick, bench_hash);
criterion_main!(benches);
