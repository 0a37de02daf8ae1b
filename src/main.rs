//! Deflect Demo
//!
//! Runs a scripted scene (one turret, one player on a flat floor), prints what
//! happens through the logging sinks, then replays the recorded inputs and
//! checks the final state hash matches.
//!
//! Usage: `deflect-sim [scene.json] [ticks]`

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use deflect::{
    core::fixed::{to_fixed, to_float, FIXED_HALF, FIXED_ONE},
    game::{
        contact::{CircleOverlapFeed, ContactOutcome},
        ground::StaticGround,
        input::{EdgeDetector, HeldButtons, InputFrame, InputRecording},
        presenter::{LogSinks, Presenter},
        tick::{replay, tick},
        world::{EntityId, World},
    },
    FixedVec2, SceneConfig, TICK_RATE, VERSION,
};

/// Default scene length: 15 seconds.
const DEFAULT_TICKS: u32 = 15 * TICK_RATE;

/// Player parries when an incoming shot is this close.
const THREAT_RANGE: i32 = 2;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SceneConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => SceneConfig::default(),
    };
    let ticks = match args.next() {
        Some(n) => n.parse::<u32>().with_context(|| format!("invalid tick count {n:?}"))?,
        None => DEFAULT_TICKS,
    };

    info!("Deflect v{}", VERSION);
    info!("Tick Rate: {} Hz, dt = {:.4} s", TICK_RATE, to_float(config.tick_duration));

    demo_scene(config, ticks)
}

/// Fresh world with the demo layout.
fn build_scene(config: SceneConfig) -> (World, EntityId) {
    let mut world = World::new(config);
    world.spawn_turret(FixedVec2::new(0, FIXED_HALF));
    let player = world.spawn_player(FixedVec2::new(to_fixed(12.0), FIXED_HALF));
    (world, player)
}

/// Held buttons for the scripted player: hop once early, otherwise stand
/// still and hold parry whenever an unreflected shot is about to arrive.
fn script(world: &World, player: EntityId) -> HeldButtons {
    let Some(me) = world.player(player) else {
        return HeldButtons::default();
    };

    let threat = world.projectiles.values().any(|shot| {
        !shot.parried && (me.position.x - shot.position.x).abs() <= THREAT_RANGE * FIXED_ONE
    });

    HeldButtons {
        move_x: 0,
        jump: (30..33).contains(&world.tick),
        parry: threat,
    }
}

fn demo_scene(config: SceneConfig, ticks: u32) -> Result<()> {
    info!("=== Starting Demo Scene ({} ticks) ===", ticks);

    let ground = StaticGround::flat_floor(0, to_fixed(64.0));
    let mut feed = CircleOverlapFeed::new(config.colliders.clone());
    let mut presenter = Presenter::builder()
        .visual(LogSinks)
        .audio(LogSinks)
        .scene(LogSinks)
        .build()?;

    let (mut world, player) = build_scene(config.clone());
    presenter.dispatch(&world.log.take());

    let mut edges = EdgeDetector::new();
    let mut recording = InputRecording::new(player);
    let mut total_events = 0;
    let mut reflected = 0;
    let mut damaged = 0;

    for _ in 0..ticks {
        let frame = edges.sample(script(&world, player));
        recording.record(world.tick + 1, frame);

        let mut inputs: BTreeMap<EntityId, InputFrame> = BTreeMap::new();
        inputs.insert(player, frame);

        let result = tick(&mut world, &inputs, &ground, &mut feed);
        total_events += result.events.len();
        for (_, outcome) in &result.contacts {
            match outcome {
                ContactOutcome::Reflected => reflected += 1,
                ContactOutcome::PlayerDamaged => damaged += 1,
                _ => {}
            }
        }
        presenter.dispatch(&result.events);
    }
    recording.finalize(world.tick);

    info!("=== Scene Results ===");
    let hash = world.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!(
        "Events: {}, reflected: {}, damaged: {}, input deltas: {}",
        total_events,
        reflected,
        damaged,
        recording.delta_count()
    );
    info!("Input Recording Hash: {}", hex::encode(recording.compute_hash()));

    info!("=== Verifying Determinism ===");
    let (mut replay_world, _) = build_scene(config.clone());
    replay_world.log.take();
    let mut replay_feed = CircleOverlapFeed::new(config.colliders);
    replay(&mut replay_world, &[recording], &ground, &mut replay_feed, ticks);
    let replay_hash = replay_world.compute_hash();

    info!("Replay State Hash: {}", hex::encode(replay_hash));
    if hash != replay_hash {
        bail!("determinism failure: replay hash differs");
    }
    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}
