//! Entity collections mutated once per tick.
//!
//! Records are flagged for removal while systems iterate and only dropped by
//! [`EntityStore::cull`] once every system has run for the tick, so iteration
//! order stays stable within a tick.

use std::collections::VecDeque;

use neon_arcade_core::{
    CellCoord, DamageKind, EmplacementId, EmplacementKind, EnemyCategory, EnemyId, Vec2, Vitals,
};

/// Emplacement standing on a lane cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Emplacement {
    /// Identifier assigned at construction.
    pub id: EmplacementId,
    /// Cell the emplacement occupies.
    pub cell: CellCoord,
    /// Kind selecting the combat profile.
    pub kind: EmplacementKind,
    /// Frame of the most recent shot.
    pub last_fired: u64,
}

/// Mobile enemy actor shared by both games.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    /// Identifier assigned at spawn.
    pub id: EnemyId,
    /// Category tag.
    pub category: EnemyCategory,
    /// Position in world units.
    pub position: Vec2,
    /// Hit points, shield and armor.
    pub vitals: Vitals,
    /// Movement speed in world units per frame.
    pub speed: f32,
    /// Collision radius.
    pub radius: f32,
    /// Currency or experience granted on death.
    pub reward: u32,
    /// Damage dealt to the survivor avatar on contact.
    pub contact_damage: f32,
    /// Cells still to visit; lane enemies only.
    pub path: VecDeque<CellCoord>,
    /// Set once the enemy leaked or died.
    pub removed: bool,
}

impl Enemy {
    /// Reports whether the enemy can still be targeted and hit.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.removed && !self.vitals.is_depleted()
    }
}

/// Blueprint for a new enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySpawn {
    /// Category tag.
    pub category: EnemyCategory,
    /// Entry position in world units.
    pub position: Vec2,
    /// Scale applied to the category's base hit points.
    pub hit_point_scale: f32,
    /// Route to follow; empty for free-roaming enemies.
    pub path: Vec<CellCoord>,
}

/// How a projectile travels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectileMotion {
    /// Steers towards a target every frame and hits on arrival.
    Homing {
        /// Enemy being chased.
        target: EnemyId,
        /// Travel speed in world units per frame.
        speed: f32,
    },
    /// Flies in a straight line until it hits something or expires.
    Ballistic {
        /// Displacement per frame.
        velocity: Vec2,
        /// Frames left before expiry.
        life: u32,
    },
}

/// Projectile in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    /// Position in world units.
    pub position: Vec2,
    /// Travel behaviour.
    pub motion: ProjectileMotion,
    /// Damage carried.
    pub damage: f32,
    /// Damage category used by the shield and armor rules.
    pub damage_kind: DamageKind,
    /// Collision radius.
    pub radius: f32,
    /// Set when a homing projectile reached its target this frame.
    pub arrived: bool,
    /// Set once the projectile hit or expired.
    pub removed: bool,
}

/// Experience gem dropped by a dead horde enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct Pickup {
    /// Position in world units.
    pub position: Vec2,
    /// Experience granted on collection.
    pub value: u32,
    /// Collision radius.
    pub radius: f32,
    /// Set once collected.
    pub removed: bool,
}

/// Cosmetic spark emitted when an enemy dies.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Position in world units.
    pub position: Vec2,
    /// Displacement per frame.
    pub velocity: Vec2,
    /// Remaining life in `[0, 1]`.
    pub life: f32,
    /// Drawn size.
    pub size: f32,
}

/// Counts of records dropped by a cull.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CullReport {
    /// Enemies dropped.
    pub enemies: usize,
    /// Projectiles dropped.
    pub projectiles: usize,
    /// Pickups dropped.
    pub pickups: usize,
    /// Particles dropped.
    pub particles: usize,
}

/// Owns every entity collection of one game.
#[derive(Clone, Debug, Default)]
pub struct EntityStore {
    emplacements: Vec<Emplacement>,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    pickups: Vec<Pickup>,
    particles: Vec<Particle>,
    next_enemy: u32,
    next_emplacement: u32,
}

impl EntityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an enemy from its category profile and appends it.
    pub fn spawn_enemy(&mut self, spawn: EnemySpawn) -> EnemyId {
        let id = EnemyId::new(self.next_enemy);
        self.next_enemy = self.next_enemy.wrapping_add(1);
        let profile = spawn.category.profile();
        self.enemies.push(Enemy {
            id,
            category: spawn.category,
            position: spawn.position,
            vitals: profile.vitals(spawn.hit_point_scale),
            speed: profile.speed,
            radius: profile.radius,
            reward: profile.reward,
            contact_damage: profile.contact_damage,
            path: spawn.path.into(),
            removed: false,
        });
        id
    }

    /// Appends an emplacement on the provided cell.
    pub fn add_emplacement(&mut self, cell: CellCoord, kind: EmplacementKind) -> EmplacementId {
        let id = EmplacementId::new(self.next_emplacement);
        self.next_emplacement = self.next_emplacement.wrapping_add(1);
        self.emplacements.push(Emplacement {
            id,
            cell,
            kind,
            last_fired: 0,
        });
        id
    }

    /// Drops the emplacement standing on the cell.
    ///
    /// Only called between ticks, so removal happens immediately.
    pub fn remove_emplacement_at(&mut self, cell: CellCoord) -> Option<Emplacement> {
        let index = self
            .emplacements
            .iter()
            .position(|emplacement| emplacement.cell == cell)?;
        Some(self.emplacements.remove(index))
    }

    /// Appends a projectile.
    pub fn push_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    /// Appends a pickup.
    pub fn push_pickup(&mut self, pickup: Pickup) {
        self.pickups.push(pickup);
    }

    /// Appends a particle.
    pub fn push_particle(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Emplacements in construction order.
    #[must_use]
    pub fn emplacements(&self) -> &[Emplacement] {
        &self.emplacements
    }

    /// Mutable emplacements in construction order.
    pub fn emplacements_mut(&mut self) -> &mut [Emplacement] {
        &mut self.emplacements
    }

    /// Enemies in spawn order.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Mutable enemies in spawn order.
    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    /// Looks up an enemy by identifier.
    #[must_use]
    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    /// Looks up a mutable enemy by identifier.
    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|enemy| enemy.id == id)
    }

    /// Number of enemies that have neither died nor leaked.
    #[must_use]
    pub fn live_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|enemy| enemy.is_alive()).count()
    }

    /// Projectiles in firing order.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Mutable projectiles in firing order.
    pub fn projectiles_mut(&mut self) -> &mut [Projectile] {
        &mut self.projectiles
    }

    /// Pickups in drop order.
    #[must_use]
    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    /// Mutable pickups in drop order.
    pub fn pickups_mut(&mut self) -> &mut [Pickup] {
        &mut self.pickups
    }

    /// Particles in emission order.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable particles in emission order.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Drops every record flagged for removal, keeping survivor order.
    ///
    /// Enemies whose hit points ran out are dropped even if no system flagged
    /// them, so a dead enemy never survives into the next tick.
    pub fn cull(&mut self) -> CullReport {
        let before = (
            self.enemies.len(),
            self.projectiles.len(),
            self.pickups.len(),
            self.particles.len(),
        );
        self.enemies.retain(Enemy::is_alive);
        self.projectiles.retain(|projectile| !projectile.removed);
        self.pickups.retain(|pickup| !pickup.removed);
        self.particles.retain(|particle| particle.life > 0.0);
        CullReport {
            enemies: before.0 - self.enemies.len(),
            projectiles: before.1 - self.projectiles.len(),
            pickups: before.2 - self.pickups.len(),
            particles: before.3 - self.particles.len(),
        }
    }

    /// Empties every collection and restarts identifier allocation.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neon_arcade_core::{HordeCategory, LaneCategory};

    fn grunt_at(x: f32) -> EnemySpawn {
        EnemySpawn {
            category: EnemyCategory::Horde(HordeCategory::Grunt),
            position: Vec2::new(x, 0.0),
            hit_point_scale: 1.0,
            path: Vec::new(),
        }
    }

    #[test]
    fn spawned_enemies_take_profile_stats() {
        let mut store = EntityStore::new();
        let id = store.spawn_enemy(EnemySpawn {
            category: EnemyCategory::Lane(LaneCategory::Swarm),
            position: Vec2::ZERO,
            hit_point_scale: 1.2,
            path: vec![CellCoord::new(0, 0), CellCoord::new(1, 0)],
        });
        let enemy = store.enemy(id).expect("enemy exists");
        assert!((enemy.vitals.hit_points - 24.0).abs() < 1e-4);
        assert_eq!(enemy.vitals.shield, 2.0);
        assert_eq!(enemy.path.len(), 2);
        assert_eq!(enemy.speed, 2.5);
    }

    #[test]
    fn identifiers_are_allocated_sequentially() {
        let mut store = EntityStore::new();
        let first = store.spawn_enemy(grunt_at(0.0));
        let second = store.spawn_enemy(grunt_at(1.0));
        assert_eq!(first.get() + 1, second.get());
    }

    #[test]
    fn cull_drops_flagged_and_dead_records_in_order() {
        let mut store = EntityStore::new();
        let ids: Vec<_> = (0..4).map(|i| store.spawn_enemy(grunt_at(i as f32))).collect();
        store.enemies_mut()[1].removed = true;
        store.enemies_mut()[2].vitals.hit_points = 0.0;
        store.push_particle(Particle {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            life: 0.0,
            size: 1.0,
        });

        let report = store.cull();

        assert_eq!(report.enemies, 2);
        assert_eq!(report.particles, 1);
        let remaining: Vec<_> = store.enemies().iter().map(|enemy| enemy.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[3]]);
    }

    #[test]
    fn removing_an_emplacement_by_cell() {
        let mut store = EntityStore::new();
        let cell = CellCoord::new(3, 3);
        let _ = store.add_emplacement(cell, EmplacementKind::Sniper);
        assert_eq!(
            store.remove_emplacement_at(cell).map(|e| e.kind),
            Some(EmplacementKind::Sniper)
        );
        assert!(store.remove_emplacement_at(cell).is_none());
        assert!(store.emplacements().is_empty());
    }
}
