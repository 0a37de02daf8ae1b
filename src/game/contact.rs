//! Contact Resolution
//!
//! Projectile contacts arrive from an `OverlapFeed` and are resolved
//! synchronously, one at a time, in feed order:
//!
//! | Projectile  | Other  | Condition         | Outcome                          |
//! |-------------|--------|-------------------|----------------------------------|
//! | unreflected | player | `can_reflect()`   | reflect, `activate_parry`        |
//! | unreflected | player | otherwise         | `take_damage`, destroy projectile|
//! | reflected   | player | -                 | ignored                          |
//! | reflected   | turret | -                 | `stun`, destroy projectile       |
//! | unreflected | turret | -                 | ignored                          |
//!
//! Contacts naming an entity destroyed earlier in the tick are ignored.

use std::collections::BTreeSet;

use tracing::trace;

use crate::config::ColliderRadii;
use crate::core::fixed::{fixed_sq_wide, Fixed};
use crate::core::vec2::FixedVec2;
use crate::game::events::{DestroyReason, GameEventData};
use crate::game::world::{EntityId, World};

/// Check if two circles overlap.
#[inline]
pub fn circles_overlap(
    pos_a: FixedVec2,
    radius_a: Fixed,
    pos_b: FixedVec2,
    radius_b: Fixed,
) -> bool {
    let combined_radius = radius_a.saturating_add(radius_b);
    pos_a.distance_squared_wide(pos_b) <= fixed_sq_wide(combined_radius)
}

/// The non-projectile side of a contact, tagged with what it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collider {
    /// A player body
    Player(EntityId),
    /// A turret body
    Turret(EntityId),
}

impl Collider {
    /// Handle of the collider.
    pub fn id(self) -> EntityId {
        match self {
            Collider::Player(id) | Collider::Turret(id) => id,
        }
    }
}

/// A projectile started overlapping something this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Contact {
    /// The projectile that entered the overlap
    pub projectile: EntityId,
    /// What it overlapped
    pub other: Collider,
}

/// What resolving a contact did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Player deflected the projectile
    Reflected,
    /// Player was hit, projectile destroyed
    PlayerDamaged,
    /// Reflected projectile stunned a turret and was destroyed
    TurretStunned,
    /// No effect
    Ignored,
}

/// Source of projectile contacts for a tick.
pub trait OverlapFeed {
    /// Contacts that began this tick between live entities, in resolution order.
    fn contacts(&mut self, world: &World) -> Vec<Contact>;
}

/// Circle-vs-circle overlap feed with trigger-enter semantics: a pair is
/// reported on the tick it starts overlapping, then not again until it has
/// separated.
#[derive(Clone, Debug, Default)]
pub struct CircleOverlapFeed {
    radii: ColliderRadii,
    touching: BTreeSet<Contact>,
}

impl CircleOverlapFeed {
    /// Feed using the given contact radii.
    pub fn new(radii: ColliderRadii) -> Self {
        Self {
            radii,
            touching: BTreeSet::new(),
        }
    }

    fn overlapping(&self, world: &World) -> BTreeSet<Contact> {
        let mut current = BTreeSet::new();
        let r_shot = self.radii.projectile;

        for shot in world.projectiles.values() {
            if !world.is_alive(shot.id) {
                continue;
            }

            for player in world.players.values() {
                if world.is_alive(player.id)
                    && circles_overlap(shot.position, r_shot, player.position, self.radii.player)
                {
                    current.insert(Contact {
                        projectile: shot.id,
                        other: Collider::Player(player.id),
                    });
                }
            }

            for turret in world.turrets.values() {
                if world.is_alive(turret.id)
                    && circles_overlap(shot.position, r_shot, turret.position, self.radii.turret)
                {
                    current.insert(Contact {
                        projectile: shot.id,
                        other: Collider::Turret(turret.id),
                    });
                }
            }
        }

        current
    }
}

impl OverlapFeed for CircleOverlapFeed {
    fn contacts(&mut self, world: &World) -> Vec<Contact> {
        let current = self.overlapping(world);
        let entered: Vec<Contact> = current.difference(&self.touching).copied().collect();
        self.touching = current;
        entered
    }
}

/// Resolve one contact against the world.
pub fn resolve_contact(world: &mut World, contact: Contact) -> ContactOutcome {
    let projectile_id = contact.projectile;
    let other_id = contact.other.id();
    if !world.is_alive(projectile_id) || !world.is_alive(other_id) {
        return ContactOutcome::Ignored;
    }
    let Some(parried) = world.projectile(projectile_id).map(|p| p.parried) else {
        return ContactOutcome::Ignored;
    };

    let outcome = match contact.other {
        Collider::Player(player_id) if !parried => {
            let Some(can_reflect) = world.player(player_id).map(|p| p.can_reflect()) else {
                return ContactOutcome::Ignored;
            };
            if can_reflect {
                reflect_off_player(world, projectile_id, player_id)
            } else {
                damage_player(world, projectile_id, player_id)
            }
        }
        Collider::Turret(turret_id) if parried => stun_turret(world, projectile_id, turret_id),
        _ => ContactOutcome::Ignored,
    };

    trace!(projectile = projectile_id.0, other = other_id.0, ?outcome, "contact resolved");
    outcome
}

fn reflect_off_player(world: &mut World, projectile_id: EntityId, player_id: EntityId) -> ContactOutcome {
    let Some(projectile) = world.projectiles.get_mut(&projectile_id) else {
        return ContactOutcome::Ignored;
    };
    projectile.reflect();
    let velocity = projectile.velocity;

    if let Some(player) = world.players.get_mut(&player_id) {
        player.activate_parry(&mut world.log);
    }
    world.log.push(GameEventData::ProjectileReflected {
        projectile: projectile_id,
        player: player_id,
        velocity,
    });
    ContactOutcome::Reflected
}

fn damage_player(world: &mut World, projectile_id: EntityId, player_id: EntityId) -> ContactOutcome {
    if let Some(player) = world.players.get_mut(&player_id) {
        player.take_damage(&mut world.log);
    }
    world.log.push(GameEventData::PlayerDamaged {
        player: player_id,
        projectile: projectile_id,
    });
    world.destroy(projectile_id, DestroyReason::HitPlayer);
    ContactOutcome::PlayerDamaged
}

fn stun_turret(world: &mut World, projectile_id: EntityId, turret_id: EntityId) -> ContactOutcome {
    if let Some(turret) = world.turrets.get_mut(&turret_id) {
        turret.stun(&mut world.log);
    }
    world.log.push(GameEventData::TurretStunned {
        turret: turret_id,
        projectile: projectile_id,
    });
    world.destroy(projectile_id, DestroyReason::HitTurret);
    ContactOutcome::TurretStunned
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::{to_fixed, FIXED_ONE};
    use crate::game::events::VisualState;
    use crate::game::input::InputFrame;

    #[test]
    fn test_circles_overlap() {
        let a = FixedVec2::ZERO;
        let b = FixedVec2::new(FIXED_ONE, 0);
        assert!(circles_overlap(a, FIXED_ONE / 2, b, FIXED_ONE / 2)); // touching
        assert!(!circles_overlap(a, FIXED_ONE / 4, b, FIXED_ONE / 4));
    }

    /// Player at the origin, turret to the left, one projectile on the player.
    fn scene() -> (World, EntityId, EntityId, EntityId) {
        let mut world = World::default();
        let player = world.spawn_player(FixedVec2::ZERO);
        let turret = world.spawn_turret(FixedVec2::from_ints(-10, 0));
        let shot = world.spawn_projectile(turret, FixedVec2::ZERO, FixedVec2::new(to_fixed(5.0), 0));
        world.log.take();
        (world, player, turret, shot)
    }

    fn hit_player(shot: EntityId, player: EntityId) -> Contact {
        Contact { projectile: shot, other: Collider::Player(player) }
    }

    fn hit_turret(shot: EntityId, turret: EntityId) -> Contact {
        Contact { projectile: shot, other: Collider::Turret(turret) }
    }

    #[test]
    fn test_unarmed_player_takes_damage() {
        let (mut world, player, _, shot) = scene();
        if let Some(p) = world.players.get_mut(&player) {
            p.velocity = FixedVec2::from_ints(3, 0);
        }

        assert_eq!(resolve_contact(&mut world, hit_player(shot, player)), ContactOutcome::PlayerDamaged);

        let p = world.player(player).expect("player alive");
        assert!(p.is_damaged());
        assert_eq!(p.velocity, FixedVec2::ZERO);
        assert_eq!(p.visual, VisualState::Hurt);
        assert!(!world.is_alive(shot));
    }

    #[test]
    fn test_parry_window_reflects() {
        let (mut world, player, _, shot) = scene();
        let dt = to_fixed(0.1);
        {
            let log = &mut world.log;
            let p = world.players.get_mut(&player).expect("player");
            p.update(InputFrame::parry(), dt, log); // t = 0
            p.update(InputFrame::new(), dt, log); // t = 0.1
        }

        assert_eq!(resolve_contact(&mut world, hit_player(shot, player)), ContactOutcome::Reflected);

        let b = world.projectile(shot).expect("reflected shot keeps flying");
        assert!(b.parried);
        assert_eq!(b.velocity, FixedVec2::new(to_fixed(-10.0), 0));

        let p = world.player(player).expect("player");
        assert_eq!(p.parry_timer, p.tuning.parry_total());
        assert!(!p.is_damaged());
        assert!(world
            .log
            .events()
            .iter()
            .any(|e| matches!(e.data, GameEventData::ProjectileReflected { .. })));
    }

    #[test]
    fn test_parried_projectile_ignores_player() {
        let (mut world, player, _, shot) = scene();
        if let Some(b) = world.projectiles.get_mut(&shot) {
            b.reflect();
        }

        assert_eq!(resolve_contact(&mut world, hit_player(shot, player)), ContactOutcome::Ignored);
        assert!(world.is_alive(shot));
        assert!(!world.player(player).map_or(true, |p| p.is_damaged()));
    }

    #[test]
    fn test_parried_projectile_stuns_turret() {
        let (mut world, _, turret, shot) = scene();
        if let Some(b) = world.projectiles.get_mut(&shot) {
            b.reflect();
        }

        assert_eq!(resolve_contact(&mut world, hit_turret(shot, turret)), ContactOutcome::TurretStunned);
        assert!(world.turret(turret).map_or(false, |t| t.stunned));
        assert!(!world.is_alive(shot));
    }

    #[test]
    fn test_turret_immune_to_unreflected_projectile() {
        let (mut world, _, turret, shot) = scene();
        let before = world.turret(turret).cloned();

        assert_eq!(resolve_contact(&mut world, hit_turret(shot, turret)), ContactOutcome::Ignored);
        assert_eq!(world.turret(turret).cloned(), before);
        assert!(world.is_alive(shot));
        assert!(world.log.events().is_empty());
    }

    #[test]
    fn test_destroyed_projectile_is_skipped() {
        let (mut world, player, _, shot) = scene();
        world.destroy(shot, DestroyReason::Expired);

        assert_eq!(resolve_contact(&mut world, hit_player(shot, player)), ContactOutcome::Ignored);
        assert!(!world.player(player).map_or(true, |p| p.is_damaged()));
    }

    #[test]
    fn test_second_contact_same_tick_after_destroy() {
        let (mut world, player, turret, shot) = scene();

        // Damage destroys the projectile; a later contact in the same tick is dropped
        resolve_contact(&mut world, hit_player(shot, player));
        assert_eq!(resolve_contact(&mut world, hit_turret(shot, turret)), ContactOutcome::Ignored);
    }

    #[test]
    fn test_feed_reports_enter_only() {
        let (mut world, player, _, shot) = scene();
        let mut feed = CircleOverlapFeed::new(world.config.colliders.clone());

        assert_eq!(feed.contacts(&world), vec![hit_player(shot, player)]);
        assert!(feed.contacts(&world).is_empty(), "still touching, not re-reported");

        // Separate, then overlap again
        if let Some(b) = world.projectiles.get_mut(&shot) {
            b.position = FixedVec2::from_ints(5, 0);
        }
        assert!(feed.contacts(&world).is_empty());
        if let Some(b) = world.projectiles.get_mut(&shot) {
            b.position = FixedVec2::ZERO;
        }
        assert_eq!(feed.contacts(&world), vec![hit_player(shot, player)]);
    }

    #[test]
    fn test_feed_skips_destroyed() {
        let (mut world, _, _, shot) = scene();
        let mut feed = CircleOverlapFeed::new(world.config.colliders.clone());
        world.destroy(shot, DestroyReason::Expired);

        assert!(feed.contacts(&world).is_empty());
    }

    #[test]
    fn test_far_apart_entities_do_not_touch() {
        let mut world = World::default();
        let turret = world.spawn_turret(FixedVec2::from_ints(-100, 0));
        let player = world.spawn_player(FixedVec2::from_ints(200, 0));
        let shot = world.spawn_projectile(turret, FixedVec2::from_ints(1, 0), FixedVec2::ZERO);
        let mut feed = CircleOverlapFeed::new(world.config.colliders.clone());

        assert!(feed.contacts(&world).is_empty());
        assert!(!world.player(player).map_or(true, |p| p.is_damaged()));
        assert!(world.is_alive(shot));

        assert!(!circles_overlap(
            FixedVec2::from_ints(-20000, 0),
            FIXED_ONE,
            FixedVec2::from_ints(20000, 0),
            FIXED_ONE,
        ));
    }

    #[test]
    fn test_collider_tags() {
        let c = Collider::Turret(EntityId(4));
        assert_eq!(c.id(), EntityId(4));
        assert_eq!(Collider::Player(EntityId(2)).id(), EntityId(2));
    }
}
