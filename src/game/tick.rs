//! Simulation Tick
//!
//! The fixed-timestep loop that must be 100% deterministic. Each tick runs the
//! same phases in the same order:
//!
//! 1. Free-running: projectile lifespans, player input and combat timers,
//!    turret fire/stun timers (fired projectiles spawn immediately)
//! 2. Fixed step: player ground probe, movement and integration, then
//!    projectile integration
//! 3. Contacts: newly overlapping pairs resolved one by one
//! 4. Purge: entities destroyed during the tick are removed
//!
//! Projectiles are aged before turrets fire, so a shot is not aged on the tick
//! it spawns and lives its lifespan plus one tick.

use std::collections::BTreeMap;

#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::core::fixed::Fixed;
use crate::game::contact::{resolve_contact, Contact, ContactOutcome, OverlapFeed};
use crate::game::events::{DestroyReason, GameEvent};
use crate::game::ground::GroundProbe;
use crate::game::input::{InputFrame, InputRecording};
use crate::game::world::{EntityId, World};

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick, in emission order
    pub events: Vec<GameEvent>,
    /// Contacts reported by the overlap feed and what each did
    pub contacts: Vec<(Contact, ContactOutcome)>,
    /// Entities purged at the end of the tick
    pub destroyed: usize,
}

/// Run one simulation tick.
///
/// # Arguments
///
/// * `world` - The scene state (will be mutated)
/// * `inputs` - Player inputs for this tick (BTreeMap for deterministic order!).
///   Players without an entry get an idle frame.
/// * `ground` - Ground probe used by player ground checks
/// * `overlaps` - Source of projectile contacts
///
/// # Determinism
///
/// - Uses BTreeMap for iteration order
/// - Uses fixed-point math only
/// - No system calls, no floating point
pub fn tick<G, F>(
    world: &mut World,
    inputs: &BTreeMap<EntityId, InputFrame>,
    ground: &G,
    overlaps: &mut F,
) -> TickResult
where
    G: GroundProbe + ?Sized,
    F: OverlapFeed + ?Sized,
{
    // 0. Advance tick counter
    world.tick += 1;
    world.log.set_tick(world.tick);
    let dt = world.config.tick_duration;

    // 1. Free-running phase
    age_projectiles(world, dt);
    update_players(world, inputs, dt);
    update_turrets(world, dt);

    // 2. Fixed step
    step_players(world, ground);
    integrate_projectiles(world);

    // 3. Contacts
    let contacts = resolve_contacts(world, overlaps);

    // 4. Remove what was destroyed
    let destroyed = world.purge_destroyed();

    #[cfg(feature = "debug-tracing")]
    trace!(
        tick = world.tick,
        entities = world.entity_count(),
        hash = %hex::encode(world.compute_hash()),
        "tick complete"
    );

    TickResult {
        events: world.log.take(),
        contacts,
        destroyed,
    }
}

/// Live handles in `map`, snapshotted so the world can be mutated while
/// walking them.
fn live_ids<T>(map: &BTreeMap<EntityId, T>, world: &World) -> Vec<EntityId> {
    map.keys().copied().filter(|id| world.is_alive(*id)).collect()
}

fn age_projectiles(world: &mut World, dt: Fixed) {
    for id in live_ids(&world.projectiles, world) {
        let expired = world.projectile_mut(id).map_or(false, |p| p.age(dt));
        if expired {
            world.destroy(id, DestroyReason::Expired);
        }
    }
}

fn update_players(world: &mut World, inputs: &BTreeMap<EntityId, InputFrame>, dt: Fixed) {
    for id in live_ids(&world.players, world) {
        let input = inputs.get(&id).copied().unwrap_or_default();
        if let Some(player) = world.players.get_mut(&id) {
            player.update(input, dt, &mut world.log);
        }
    }
}

fn update_turrets(world: &mut World, dt: Fixed) {
    for id in live_ids(&world.turrets, world) {
        let Some(turret) = world.turrets.get_mut(&id) else {
            continue;
        };
        if let Some(shot) = turret.update(dt, &mut world.log) {
            world.spawn_projectile(id, shot.position, shot.velocity);
        }
    }
}

fn step_players<G: GroundProbe + ?Sized>(world: &mut World, ground: &G) {
    for id in live_ids(&world.players, world) {
        if let Some(player) = world.players.get_mut(&id) {
            player.fixed_step(ground, &mut world.log);
        }
    }
}

fn integrate_projectiles(world: &mut World) {
    for id in live_ids(&world.projectiles, world) {
        if let Some(projectile) = world.projectile_mut(id) {
            projectile.integrate();
        }
    }
}

fn resolve_contacts<F: OverlapFeed + ?Sized>(
    world: &mut World,
    overlaps: &mut F,
) -> Vec<(Contact, ContactOutcome)> {
    let contacts = overlaps.contacts(world);
    contacts
        .into_iter()
        .map(|contact| (contact, resolve_contact(world, contact)))
        .collect()
}

/// Re-run recorded inputs for `tick_count` ticks.
///
/// Each recording supplies its player's input for every tick; ticks past the
/// end of a recording use its last frame. Returns all events.
pub fn replay<G, F>(
    world: &mut World,
    recordings: &[InputRecording],
    ground: &G,
    overlaps: &mut F,
    tick_count: u32,
) -> Vec<GameEvent>
where
    G: GroundProbe + ?Sized,
    F: OverlapFeed + ?Sized,
{
    let mut all_events = Vec::new();

    for _ in 0..tick_count {
        let next_tick = world.tick + 1;
        let tick_inputs: BTreeMap<EntityId, InputFrame> = recordings
            .iter()
            .map(|rec| (rec.player_id, rec.get_input_at(next_tick)))
            .collect();

        let result = tick(world, &tick_inputs, ground, overlaps);
        all_events.extend(result.events);
    }

    all_events
}
