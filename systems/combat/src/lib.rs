#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Targeting, firing and hit resolution for both arcade games.
//!
//! Firing scans the store and collects new projectiles before appending
//! them. Hit resolution flags spent projectiles and dead enemies, then drops
//! loot for every kill once the scan completes.

pub mod damage;
pub mod targeting;

use std::f32::consts::TAU;

use neon_arcade_core::{DamageKind, Dice, EnemyCategory, EnemyId, Event, Vec2, BULLET_CONTACT_SLACK};
use neon_arcade_world::{Avatar, EntityStore, Particle, Pickup, Projectile, ProjectileMotion};
use tracing::debug;

use crate::{damage::apply_hit, targeting::nearest_in_range};

/// Tunable constants of combat resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Particles emitted per kill.
    pub burst_particles: u32,
    /// Lowest particle speed in world units per frame.
    pub particle_speed_min: f32,
    /// Highest particle speed in world units per frame.
    pub particle_speed_max: f32,
    /// Smallest particle size.
    pub particle_size_min: f32,
    /// Largest particle size.
    pub particle_size_max: f32,
    /// Collision radius of dropped pickups.
    pub pickup_radius: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            burst_particles: 8,
            particle_speed_min: 1.0,
            particle_speed_max: 3.0,
            particle_size_min: 1.0,
            particle_size_max: 3.0,
            pickup_radius: 4.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Kill {
    enemy: EnemyId,
    category: EnemyCategory,
    reward: u32,
    position: Vec2,
}

/// Stateless combat step parameterized by [`Config`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Combat {
    config: Config,
}

impl Combat {
    /// Creates a combat step with the provided tuning.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fires every emplacement whose cooldown elapsed at the nearest live
    /// enemy in range.
    pub fn fire_emplacements(
        &self,
        store: &mut EntityStore,
        frame: u64,
        cell_size: f32,
        out: &mut Vec<Event>,
    ) {
        let mut shots = Vec::new();
        for (index, emplacement) in store.emplacements().iter().enumerate() {
            let stats = emplacement.kind.stats();
            if frame.saturating_sub(emplacement.last_fired) <= stats.cooldown_frames {
                continue;
            }
            let origin = emplacement.cell.center(cell_size);
            let range = stats.range_in_units(cell_size);
            let Some(target) = nearest_in_range(origin, range * range, store.enemies()) else {
                continue;
            };
            let target = store.enemies()[target].id;
            shots.push((
                index,
                Projectile {
                    position: origin,
                    motion: ProjectileMotion::Homing {
                        target,
                        speed: stats.projectile_speed,
                    },
                    damage: stats.damage,
                    damage_kind: stats.damage_kind,
                    radius: 0.0,
                    arrived: false,
                    removed: false,
                },
            ));
        }

        for (index, projectile) in shots {
            if let Some(emplacement) = store.emplacements_mut().get_mut(index) {
                emplacement.last_fired = frame;
            }
            out.push(Event::ProjectileFired {
                origin: projectile.position,
                target: match projectile.motion {
                    ProjectileMotion::Homing { target, .. } => Some(target),
                    ProjectileMotion::Ballistic { .. } => None,
                },
                damage_kind: projectile.damage_kind,
            });
            store.push_projectile(projectile);
        }
    }

    /// Fires the avatar's weapon at the nearest enemy once its interval elapsed.
    ///
    /// A volley of `projectile_count` bullets fans out evenly around the aim
    /// line, `spread` radians apart.
    pub fn fire_weapon(
        &self,
        avatar: &mut Avatar,
        store: &mut EntityStore,
        frame: u64,
        out: &mut Vec<Event>,
    ) {
        let weapon = &mut avatar.weapon;
        if frame.saturating_sub(weapon.last_fired) as f32 <= weapon.fire_interval {
            return;
        }
        let Some(target) = nearest_in_range(avatar.position, weapon.range_squared, store.enemies())
        else {
            return;
        };

        let aim = store.enemies()[target].position - avatar.position;
        let heading = aim.y.atan2(aim.x);
        let count = weapon.projectile_count.max(1);
        let centre = (count - 1) as f32 / 2.0;
        for shot in 0..count {
            let angle = heading + (shot as f32 - centre) * weapon.spread;
            store.push_projectile(Projectile {
                position: avatar.position,
                motion: ProjectileMotion::Ballistic {
                    velocity: Vec2::new(angle.cos(), angle.sin()) * weapon.projectile_speed,
                    life: weapon.projectile_life,
                },
                damage: weapon.damage,
                damage_kind: weapon.damage_kind,
                radius: weapon.projectile_radius,
                arrived: false,
                removed: false,
            });
            out.push(Event::ProjectileFired {
                origin: avatar.position,
                target: None,
                damage_kind: weapon.damage_kind,
            });
        }
        weapon.last_fired = frame;
    }

    /// Resolves homing projectiles that arrived at their target this frame.
    pub fn resolve_homing_impacts(
        &self,
        store: &mut EntityStore,
        dice: &mut dyn Dice,
        out: &mut Vec<Event>,
    ) {
        let mut kills = Vec::new();
        for index in 0..store.projectiles().len() {
            let projectile = &store.projectiles()[index];
            if projectile.removed || !projectile.arrived {
                continue;
            }
            let ProjectileMotion::Homing { target, .. } = projectile.motion else {
                continue;
            };
            let (damage, kind) = (projectile.damage, projectile.damage_kind);
            store.projectiles_mut()[index].removed = true;

            let Some(enemy) = store.enemy_mut(target) else {
                continue;
            };
            if !enemy.is_alive() {
                continue;
            }
            let outcome = apply_hit(&mut enemy.vitals, damage, kind);
            out.push(Event::EnemyHit {
                enemy: enemy.id,
                damage: outcome.damage,
                shield_drained: outcome.shield_drained,
                position: enemy.position,
            });
            if outcome.killed {
                kills.push(Kill {
                    enemy: enemy.id,
                    category: enemy.category,
                    reward: enemy.reward,
                    position: enemy.position,
                });
            }
        }
        self.resolve_kills(store, &kills, dice, out);
    }

    /// Resolves bullets touching enemies.
    ///
    /// Each bullet hits at most one enemy and an enemy stops absorbing bullets
    /// as soon as it dies.
    pub fn resolve_bullet_contacts(
        &self,
        store: &mut EntityStore,
        dice: &mut dyn Dice,
        out: &mut Vec<Event>,
    ) {
        let bullets: Vec<(Vec2, f32, f32, DamageKind)> = store
            .projectiles()
            .iter()
            .map(|projectile| {
                (
                    projectile.position,
                    projectile.radius,
                    projectile.damage,
                    projectile.damage_kind,
                )
            })
            .collect();
        let mut spent: Vec<bool> = store
            .projectiles()
            .iter()
            .map(|projectile| {
                projectile.removed
                    || !matches!(projectile.motion, ProjectileMotion::Ballistic { .. })
            })
            .collect();

        let mut kills = Vec::new();
        for enemy in store.enemies_mut() {
            for (index, &(position, radius, damage, kind)) in bullets.iter().enumerate() {
                if !enemy.is_alive() {
                    break;
                }
                if spent[index] {
                    continue;
                }
                let reach = enemy.radius + radius + BULLET_CONTACT_SLACK;
                if enemy.position.distance_squared(position) >= reach * reach {
                    continue;
                }
                spent[index] = true;
                let outcome = apply_hit(&mut enemy.vitals, damage, kind);
                out.push(Event::EnemyHit {
                    enemy: enemy.id,
                    damage: outcome.damage,
                    shield_drained: outcome.shield_drained,
                    position: enemy.position,
                });
                if outcome.killed {
                    kills.push(Kill {
                        enemy: enemy.id,
                        category: enemy.category,
                        reward: enemy.reward,
                        position: enemy.position,
                    });
                }
            }
        }

        for (projectile, spent) in store.projectiles_mut().iter_mut().zip(spent) {
            if spent && matches!(projectile.motion, ProjectileMotion::Ballistic { .. }) {
                projectile.removed = true;
            }
        }
        self.resolve_kills(store, &kills, dice, out);
    }

    fn resolve_kills(
        &self,
        store: &mut EntityStore,
        kills: &[Kill],
        dice: &mut dyn Dice,
        out: &mut Vec<Event>,
    ) {
        for kill in kills {
            debug!(enemy = kill.enemy.get(), reward = kill.reward, "enemy killed");
            if let EnemyCategory::Horde(_) = kill.category {
                store.push_pickup(Pickup {
                    position: kill.position,
                    value: kill.reward,
                    radius: self.config.pickup_radius,
                    removed: false,
                });
            }
            self.burst(store, kill.position, dice);
            out.push(Event::EnemyKilled {
                enemy: kill.enemy,
                category: kill.category,
                reward: kill.reward,
                position: kill.position,
            });
        }
    }

    fn burst(&self, store: &mut EntityStore, position: Vec2, dice: &mut dyn Dice) {
        for _ in 0..self.config.burst_particles {
            let angle = dice.range(0.0, TAU);
            let speed = dice.range(self.config.particle_speed_min, self.config.particle_speed_max);
            let size = dice.range(self.config.particle_size_min, self.config.particle_size_max);
            store.push_particle(Particle {
                position,
                velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                size,
            });
        }
    }
}
