//! World State
//!
//! Entity registry for a scene: players, turrets and projectiles keyed by
//! handle. Uses BTreeMap for deterministic iteration order.
//!
//! Destruction is two-step. `destroy` marks the entity dead immediately, so
//! every later phase of the same tick skips it; `purge_destroyed` removes the
//! marked entities at the end of the tick.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SceneConfig;
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::vec2::FixedVec2;
use crate::game::events::{DestroyReason, EventLog, GameEventData};
use crate::game::player::Player;
use crate::game::projectile::Projectile;
use crate::game::turret::Turret;

// =============================================================================
// ENTITY ID
// =============================================================================

/// Entity handle. Monotonic, never reused within a world.
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discriminates what an entity is, for contact resolution and presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EntityKind {
    /// Controllable character
    Player = 0,
    /// Stationary shooter
    Turret = 1,
    /// Turret shot
    Projectile = 2,
}

// =============================================================================
// WORLD
// =============================================================================

/// Complete state of a scene.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct World {
    /// Last simulated tick (0 before the first tick)
    pub tick: u32,

    /// Tunables every entity was spawned with
    pub config: SceneConfig,

    /// All players (BTreeMap for deterministic iteration)
    pub players: BTreeMap<EntityId, Player>,

    /// All turrets
    pub turrets: BTreeMap<EntityId, Turret>,

    /// All projectiles in flight
    pub projectiles: BTreeMap<EntityId, Projectile>,

    /// Next handle to hand out
    next_id: u32,

    /// Destroyed this tick, removed by `purge_destroyed`
    destroyed: BTreeSet<EntityId>,

    /// Events generated this tick (drained by the tick loop)
    #[serde(skip)]
    pub log: EventLog,
}

impl World {
    /// Create an empty world. The config is assumed to be validated.
    pub fn new(config: SceneConfig) -> Self {
        Self {
            tick: 0,
            config,
            players: BTreeMap::new(),
            turrets: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            next_id: 1,
            destroyed: BTreeSet::new(),
            log: EventLog::new(),
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn announce_spawn(&mut self, entity: EntityId, kind: EntityKind, position: FixedVec2, velocity: FixedVec2) {
        debug!(entity = entity.0, ?kind, position = %position, "spawned");
        self.log.push(GameEventData::Spawned {
            entity,
            kind,
            position,
            velocity,
        });
    }

    // =========================================================================
    // Spawning
    // =========================================================================

    /// Spawn a player standing at `position`.
    pub fn spawn_player(&mut self, position: FixedVec2) -> EntityId {
        let id = self.allocate_id();
        let player = Player::new(id, position, self.config.player.clone(), self.config.gravity);
        self.players.insert(id, player);
        self.announce_spawn(id, EntityKind::Player, position, FixedVec2::ZERO);
        id
    }

    /// Spawn a turret at `position`.
    pub fn spawn_turret(&mut self, position: FixedVec2) -> EntityId {
        let id = self.allocate_id();
        let turret = Turret::new(
            id,
            position,
            self.config.turret.clone(),
            self.config.projectile.speed,
        );
        self.turrets.insert(id, turret);
        self.announce_spawn(id, EntityKind::Turret, position, FixedVec2::ZERO);
        id
    }

    /// Spawn a projectile fired by `owner`.
    pub fn spawn_projectile(&mut self, owner: EntityId, position: FixedVec2, velocity: FixedVec2) -> EntityId {
        let id = self.allocate_id();
        let projectile = Projectile::new(id, owner, position, velocity, self.config.projectile.lifespan);
        self.projectiles.insert(id, projectile);
        self.announce_spawn(id, EntityKind::Projectile, position, velocity);
        id
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// What kind of entity `id` is, if it exists (alive or not yet purged).
    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        if self.players.contains_key(&id) {
            Some(EntityKind::Player)
        } else if self.turrets.contains_key(&id) {
            Some(EntityKind::Turret)
        } else if self.projectiles.contains_key(&id) {
            Some(EntityKind::Projectile)
        } else {
            None
        }
    }

    /// Entity exists and has not been destroyed.
    pub fn is_alive(&self, id: EntityId) -> bool {
        !self.destroyed.contains(&id) && self.kind_of(id).is_some()
    }

    /// Live player by handle.
    pub fn player(&self, id: EntityId) -> Option<&Player> {
        self.players.get(&id).filter(|_| !self.destroyed.contains(&id))
    }

    /// Live turret by handle.
    pub fn turret(&self, id: EntityId) -> Option<&Turret> {
        self.turrets.get(&id).filter(|_| !self.destroyed.contains(&id))
    }

    /// Live projectile by handle.
    pub fn projectile(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles.get(&id).filter(|_| !self.destroyed.contains(&id))
    }

    /// Live projectile by handle, mutably.
    pub fn projectile_mut(&mut self, id: EntityId) -> Option<&mut Projectile> {
        if self.destroyed.contains(&id) {
            return None;
        }
        self.projectiles.get_mut(&id)
    }

    // =========================================================================
    // Destruction
    // =========================================================================

    /// Mark an entity destroyed.
    ///
    /// Destroying an unknown or already-destroyed entity is a programming
    /// error: it asserts in debug builds and is ignored otherwise.
    pub fn destroy(&mut self, id: EntityId, reason: DestroyReason) {
        let alive = self.is_alive(id);
        debug_assert!(alive, "destroy of dead or unknown entity {id}");
        if !alive {
            return;
        }

        self.destroyed.insert(id);
        self.log.push(GameEventData::Destroyed { entity: id, reason });
        debug!(entity = id.0, ?reason, "destroyed");
    }

    /// External kill of a turret. Ignores handles that are not live turrets.
    pub fn kill_turret(&mut self, id: EntityId) -> bool {
        if self.turret(id).is_none() {
            return false;
        }
        self.destroy(id, DestroyReason::Killed);
        true
    }

    /// Remove every entity destroyed since the last purge.
    ///
    /// Returns the number removed.
    pub fn purge_destroyed(&mut self) -> usize {
        let count = self.destroyed.len();
        for id in std::mem::take(&mut self.destroyed) {
            self.players.remove(&id);
            self.turrets.remove(&id);
            self.projectiles.remove(&id);
        }
        count
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.players.len() + self.turrets.len() + self.projectiles.len() - self.destroyed.len()
    }

    // =========================================================================
    // Verification
    // =========================================================================

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, |hasher| {
            hasher.update_u32(self.next_id);

            // BTreeMap iteration is sorted by handle
            for player in self.players.values() {
                player.hash_into(hasher);
            }
            for turret in self.turrets.values() {
                turret.hash_into(hasher);
            }
            for projectile in self.projectiles.values() {
                projectile.hash_into(hasher);
            }
            for id in &self.destroyed {
                hasher.update_u32(id.0);
            }
        })
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_monotonic() {
        let mut world = World::default();
        let p = world.spawn_player(FixedVec2::ZERO);
        let t = world.spawn_turret(FixedVec2::ZERO);
        let b = world.spawn_projectile(t, FixedVec2::ZERO, FixedVec2::ZERO);

        assert!(p < t && t < b);
        assert_eq!(world.kind_of(p), Some(EntityKind::Player));
        assert_eq!(world.kind_of(t), Some(EntityKind::Turret));
        assert_eq!(world.kind_of(b), Some(EntityKind::Projectile));

        world.destroy(b, DestroyReason::Expired);
        world.purge_destroyed();
        let next = world.spawn_projectile(t, FixedVec2::ZERO, FixedVec2::ZERO);
        assert!(next > b, "handles are never reused");
    }

    #[test]
    fn test_spawn_emits_event() {
        let mut world = World::default();
        let t = world.spawn_turret(FixedVec2::from_ints(0, 1));
        let velocity = FixedVec2::from_ints(3, 0);
        let b = world.spawn_projectile(t, FixedVec2::from_ints(1, 1), velocity);

        let events = world.log.take();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1].data,
            GameEventData::Spawned {
                entity: b,
                kind: EntityKind::Projectile,
                position: FixedVec2::from_ints(1, 1),
                velocity,
            }
        );
        assert_eq!(world.projectile(b).map(|p| p.owner), Some(t));
    }

    #[test]
    fn test_destroy_hides_until_purge() {
        let mut world = World::default();
        let t = world.spawn_turret(FixedVec2::ZERO);
        let b = world.spawn_projectile(t, FixedVec2::ZERO, FixedVec2::ZERO);

        world.destroy(b, DestroyReason::HitPlayer);
        assert!(!world.is_alive(b));
        assert!(world.projectile(b).is_none());
        assert!(world.projectile_mut(b).is_none());
        assert!(world.projectiles.contains_key(&b));
        assert_eq!(world.entity_count(), 1);

        assert_eq!(world.purge_destroyed(), 1);
        assert!(!world.projectiles.contains_key(&b));
        assert_eq!(world.kind_of(b), None);
    }

    #[test]
    fn test_kill_turret() {
        let mut world = World::default();
        let p = world.spawn_player(FixedVec2::ZERO);
        let t = world.spawn_turret(FixedVec2::ZERO);

        assert!(!world.kill_turret(p));
        assert!(world.is_alive(p));

        assert!(world.kill_turret(t));
        assert!(!world.is_alive(t));
        assert!(!world.kill_turret(t));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "destroy of dead or unknown entity")]
    fn test_double_destroy_asserts() {
        let mut world = World::default();
        let t = world.spawn_turret(FixedVec2::ZERO);
        world.destroy(t, DestroyReason::Killed);
        world.destroy(t, DestroyReason::Killed);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "destroy of dead or unknown entity")]
    fn test_destroy_unknown_asserts() {
        let mut world = World::default();
        world.destroy(EntityId(99), DestroyReason::Expired);
    }

    #[test]
    fn test_world_hash_determinism() {
        let build = || {
            let mut world = World::default();
            world.spawn_player(FixedVec2::from_ints(2, 0));
            world.spawn_turret(FixedVec2::from_ints(-4, 0));
            world
        };
        let a = build();
        let mut b = build();
        assert_eq!(a.compute_hash(), b.compute_hash());

        b.tick = 1;
        assert_ne!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_btreemap_iteration_order() {
        let mut world = World::default();
        for x in [5, 1, 9, 3] {
            world.spawn_player(FixedVec2::from_ints(x, 0));
        }

        let iterated: Vec<_> = world.players.keys().copied().collect();
        let mut sorted = iterated.clone();
        sorted.sort();
        assert_eq!(iterated, sorted);
    }
}
