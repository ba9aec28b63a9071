#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement integration and overlap resolution for both arcade games.
//!
//! Every step here moves entities or tests overlaps; none of them remove
//! records. Actors that leave play are flagged and the store culls them once
//! the tick has been fully resolved.

pub mod collision;

use neon_arcade_core::{EnemyCategory, Event, Vec2};
use neon_arcade_world::{Arena, Avatar, Bounds, EntityStore, ProjectileMotion};
use tracing::debug;

use crate::collision::{circles_overlap, within};

/// Tunable constants of the physics step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Distance each overlapping neighbour pushes a horde enemy per frame.
    pub separation_nudge: f32,
    /// Fraction of the remaining distance a magnetized pickup covers per frame.
    pub magnet_pull: f32,
    /// Contact damage only lands on frames divisible by this interval.
    pub contact_interval: u64,
    /// Life removed from each particle per frame.
    pub particle_decay: f32,
    /// Factor applied to particle size per frame.
    pub particle_shrink: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            separation_nudge: 0.5,
            magnet_pull: 0.15,
            contact_interval: 30,
            particle_decay: 0.02,
            particle_shrink: 0.95,
        }
    }
}

/// Stateless physics step parameterized by [`Config`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Physics {
    config: Config,
}

impl Physics {
    /// Creates a physics step with the provided tuning.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Tuning in use.
    #[must_use]
    pub const fn config(&self) -> Config {
        self.config
    }

    /// Moves lane enemies along their routes and homing projectiles towards
    /// their targets.
    ///
    /// Enemies that exhaust their route are flagged as leaked.
    pub fn advance_lane(&self, store: &mut EntityStore, cell_size: f32, out: &mut Vec<Event>) {
        for enemy in store.enemies_mut() {
            if !enemy.is_alive() {
                continue;
            }
            let Some(next) = enemy.path.front().copied() else {
                enemy.removed = true;
                debug!(enemy = enemy.id.get(), "enemy reached the target");
                out.push(Event::EnemyLeaked { enemy: enemy.id });
                continue;
            };
            let waypoint = next.center(cell_size);
            if within(enemy.position, waypoint, enemy.speed) {
                enemy.position = waypoint;
                let _ = enemy.path.pop_front();
            } else {
                enemy.position += (waypoint - enemy.position).normalize_or_zero() * enemy.speed;
            }
        }

        advance_homing(store);
        self.advance_particles(store);
    }

    /// Moves the avatar, bullets, horde enemies and particles of an arena.
    ///
    /// `axis` is the movement direction requested by held keys.
    pub fn advance_arena(&self, arena: &mut Arena, axis: Vec2) {
        let bounds = arena.bounds();
        let (avatar, store) = arena.parts_mut();
        integrate_avatar(avatar, axis, bounds);
        advance_ballistic(store);
        chase(store, avatar.position);
        self.separate(store);
        self.advance_particles(store);
    }

    /// Applies contact damage from overlapping horde enemies to the avatar.
    ///
    /// Damage only lands on frames divisible by the contact interval, which
    /// gives the avatar brief invulnerability between hits.
    pub fn resolve_contacts(&self, arena: &mut Arena, out: &mut Vec<Event>) {
        let interval = self.config.contact_interval.max(1);
        if arena.frame() % interval != 0 {
            return;
        }
        let (avatar, store) = arena.parts_mut();
        for enemy in store.enemies() {
            if !enemy.is_alive() {
                continue;
            }
            if circles_overlap(enemy.position, enemy.radius, avatar.position, avatar.radius, 0.0) {
                avatar.vitals.hit_points -= enemy.contact_damage;
                out.push(Event::AvatarDamaged {
                    amount: enemy.contact_damage,
                    remaining: avatar.vitals.hit_points.max(0.0),
                });
            }
        }
    }

    /// Draws nearby pickups towards the avatar and collects touching ones.
    ///
    /// Collection is tested against the distance before this frame's pull.
    pub fn collect_pickups(&self, arena: &mut Arena, out: &mut Vec<Event>) {
        let (avatar, store) = arena.parts_mut();
        let reach = avatar.movement.pickup_radius;
        for pickup in store.pickups_mut() {
            if pickup.removed || !within(pickup.position, avatar.position, reach) {
                continue;
            }
            let touching = circles_overlap(
                pickup.position,
                pickup.radius,
                avatar.position,
                avatar.radius,
                0.0,
            );
            pickup.position += (avatar.position - pickup.position) * self.config.magnet_pull;
            if touching {
                pickup.removed = true;
                out.push(Event::PickupCollected {
                    value: pickup.value,
                });
            }
        }
    }

    /// Pushes overlapping horde enemies apart.
    ///
    /// Every push is computed from the positions at the start of the pass and
    /// applied afterwards, so the result does not depend on iteration order.
    pub fn separate(&self, store: &mut EntityStore) {
        let bodies: Vec<(Vec2, f32, bool)> = store
            .enemies()
            .iter()
            .map(|enemy| {
                let crowding = enemy.is_alive() && matches!(enemy.category, EnemyCategory::Horde(_));
                (enemy.position, enemy.radius, crowding)
            })
            .collect();

        let mut pushes = vec![Vec2::ZERO; bodies.len()];
        for (index, &(position, radius, crowding)) in bodies.iter().enumerate() {
            if !crowding {
                continue;
            }
            for (other, &(other_position, other_radius, other_crowding)) in
                bodies.iter().enumerate()
            {
                if other == index || !other_crowding {
                    continue;
                }
                if !circles_overlap(position, radius, other_position, other_radius, 0.0) {
                    continue;
                }
                let away = (position - other_position).normalize_or_zero();
                let away = if away == Vec2::ZERO {
                    if index < other {
                        Vec2::X
                    } else {
                        Vec2::NEG_X
                    }
                } else {
                    away
                };
                pushes[index] += away * self.config.separation_nudge;
            }
        }

        for (enemy, push) in store.enemies_mut().iter_mut().zip(pushes) {
            enemy.position += push;
        }
    }

    fn advance_particles(&self, store: &mut EntityStore) {
        for particle in store.particles_mut() {
            particle.position += particle.velocity;
            particle.life -= self.config.particle_decay;
            particle.size *= self.config.particle_shrink;
        }
    }
}

/// Integrates avatar velocity from the requested direction.
///
/// The step runs `velocity += axis * acceleration`, then
/// `velocity *= friction`, then `position += velocity`, so one frame from
/// rest moves `acceleration * friction`. With bounds, the avatar bounces off
/// the walls keeping `restitution` of its speed.
pub fn integrate_avatar(avatar: &mut Avatar, axis: Vec2, bounds: Option<Bounds>) {
    avatar.velocity += axis * avatar.movement.acceleration;
    avatar.velocity *= avatar.movement.friction;
    avatar.position += avatar.velocity;

    let Some(bounds) = bounds else {
        return;
    };
    let low = bounds.min + Vec2::splat(avatar.radius);
    let high = bounds.max - Vec2::splat(avatar.radius);
    if avatar.position.x < low.x {
        avatar.position.x = low.x;
        avatar.velocity.x = -avatar.velocity.x * bounds.restitution;
    } else if avatar.position.x > high.x {
        avatar.position.x = high.x;
        avatar.velocity.x = -avatar.velocity.x * bounds.restitution;
    }
    if avatar.position.y < low.y {
        avatar.position.y = low.y;
        avatar.velocity.y = -avatar.velocity.y * bounds.restitution;
    } else if avatar.position.y > high.y {
        avatar.position.y = high.y;
        avatar.velocity.y = -avatar.velocity.y * bounds.restitution;
    }
}

/// Steers horde enemies straight at the target position.
pub fn chase(store: &mut EntityStore, target: Vec2) {
    for enemy in store.enemies_mut() {
        if !enemy.is_alive() || !matches!(enemy.category, EnemyCategory::Horde(_)) {
            continue;
        }
        enemy.position += (target - enemy.position).normalize_or_zero() * enemy.speed;
    }
}

/// Moves straight-flying projectiles and expires them when their life runs out.
pub fn advance_ballistic(store: &mut EntityStore) {
    for projectile in store.projectiles_mut() {
        if projectile.removed {
            continue;
        }
        if let ProjectileMotion::Ballistic { velocity, life } = &mut projectile.motion {
            projectile.position += *velocity;
            *life = life.saturating_sub(1);
            if *life == 0 {
                projectile.removed = true;
            }
        }
    }
}

/// Steers homing projectiles towards their targets.
///
/// A projectile whose remaining distance is below its speed snaps onto the
/// target and is marked as arrived. Projectiles whose target is gone are
/// dropped.
pub fn advance_homing(store: &mut EntityStore) {
    let targets: Vec<Option<Vec2>> = store
        .projectiles()
        .iter()
        .map(|projectile| match projectile.motion {
            ProjectileMotion::Homing { target, .. } => store
                .enemy(target)
                .filter(|enemy| enemy.is_alive())
                .map(|enemy| enemy.position),
            ProjectileMotion::Ballistic { .. } => None,
        })
        .collect();

    for (projectile, target) in store.projectiles_mut().iter_mut().zip(targets) {
        let ProjectileMotion::Homing { speed, .. } = projectile.motion else {
            continue;
        };
        if projectile.removed || projectile.arrived {
            continue;
        }
        match target {
            None => projectile.removed = true,
            Some(goal) if within(projectile.position, goal, speed) => {
                projectile.position = goal;
                projectile.arrived = true;
            }
            Some(goal) => {
                projectile.position += (goal - projectile.position).normalize_or_zero() * speed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neon_arcade_core::{HordeCategory, Vitals};
    use neon_arcade_world::{ArenaRules, EnemySpawn, MovementStats, WeaponStats};

    fn avatar() -> Avatar {
        Avatar {
            position: Vec2::new(100.0, 100.0),
            velocity: Vec2::ZERO,
            radius: 12.0,
            vitals: Vitals::new(100.0, 0.0, 0.0),
            experience: 0,
            experience_threshold: 100,
            level: 1,
            weapon: WeaponStats::default(),
            movement: MovementStats::default(),
        }
    }

    #[test]
    fn avatar_accelerates_then_damps_before_moving() {
        let mut avatar = avatar();
        integrate_avatar(&mut avatar, Vec2::new(1.0, 0.0), None);
        assert!((avatar.velocity.x - 0.46).abs() < 1e-6);
        assert!((avatar.position.x - 100.46).abs() < 1e-4);

        integrate_avatar(&mut avatar, Vec2::ZERO, None);
        assert!((avatar.velocity.x - 0.4232).abs() < 1e-6);
    }

    #[test]
    fn walls_reflect_with_restitution() {
        let mut avatar = avatar();
        avatar.position = Vec2::new(15.0, 50.0);
        avatar.velocity = Vec2::new(-10.0, 0.0);
        avatar.movement.friction = 1.0;
        let bounds = Bounds {
            min: Vec2::ZERO,
            max: Vec2::new(200.0, 200.0),
            restitution: 0.5,
        };
        integrate_avatar(&mut avatar, Vec2::ZERO, Some(bounds));
        assert_eq!(avatar.position.x, 12.0);
        assert_eq!(avatar.velocity.x, 5.0);
    }

    #[test]
    fn coincident_enemies_split_in_opposite_directions() {
        let mut arena = Arena::new(ArenaRules::default());
        for _ in 0..2 {
            let _ = arena.store_mut().spawn_enemy(EnemySpawn {
                category: EnemyCategory::Horde(HordeCategory::Grunt),
                position: Vec2::new(50.0, 50.0),
                hit_point_scale: 1.0,
                path: Vec::new(),
            });
        }
        Physics::default().separate(arena.store_mut());
        let enemies = arena.store().enemies();
        assert_eq!(enemies[0].position, Vec2::new(50.5, 50.0));
        assert_eq!(enemies[1].position, Vec2::new(49.5, 50.0));
    }
}
