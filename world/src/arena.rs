//! Open arena state for the survivor game.

use neon_arcade_core::{DamageKind, Vec2, Vitals};

use crate::store::EntityStore;

/// Auto-fire weapon carried by the avatar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponStats {
    /// Frames that must elapse between volleys; fractional after upgrades.
    pub fire_interval: f32,
    /// Damage per projectile.
    pub damage: f32,
    /// Projectile speed in world units per frame.
    pub projectile_speed: f32,
    /// Projectiles per volley.
    pub projectile_count: u32,
    /// Frames a projectile lives.
    pub projectile_life: u32,
    /// Projectile collision radius.
    pub projectile_radius: f32,
    /// Angle between neighbouring projectiles of a volley, in radians.
    pub spread: f32,
    /// Squared distance inside which enemies are engaged.
    pub range_squared: f32,
    /// Damage category of fired projectiles.
    pub damage_kind: DamageKind,
    /// Frame of the most recent volley.
    pub last_fired: u64,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            fire_interval: 20.0,
            damage: 25.0,
            projectile_speed: 10.0,
            projectile_count: 1,
            projectile_life: 60,
            projectile_radius: 4.0,
            spread: 0.2,
            range_squared: 400_000.0,
            damage_kind: DamageKind::Kinetic,
            last_fired: 0,
        }
    }
}

/// Movement tuning of the avatar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementStats {
    /// Velocity added per frame for each held direction.
    pub acceleration: f32,
    /// Fraction of velocity kept each frame.
    pub friction: f32,
    /// Distance inside which pickups drift towards the avatar.
    pub pickup_radius: f32,
}

impl Default for MovementStats {
    fn default() -> Self {
        Self {
            acceleration: 0.5,
            friction: 0.92,
            pickup_radius: 150.0,
        }
    }
}

/// Axis-aligned walls the avatar bounces off.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Upper-left corner.
    pub min: Vec2,
    /// Lower-right corner.
    pub max: Vec2,
    /// Fraction of speed kept after a bounce.
    pub restitution: f32,
}

/// Starting configuration of an arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArenaRules {
    /// Avatar spawn position.
    pub start: Vec2,
    /// Avatar collision radius.
    pub avatar_radius: f32,
    /// Avatar starting hit points.
    pub avatar_hit_points: f32,
    /// Experience required for the first level-up.
    pub first_threshold: u32,
    /// Starting weapon.
    pub weapon: WeaponStats,
    /// Starting movement tuning.
    pub movement: MovementStats,
    /// Optional walls; the arena is unbounded without them.
    pub bounds: Option<Bounds>,
}

impl Default for ArenaRules {
    fn default() -> Self {
        Self {
            start: Vec2::new(400.0, 300.0),
            avatar_radius: 12.0,
            avatar_hit_points: 100.0,
            first_threshold: 100,
            weapon: WeaponStats::default(),
            movement: MovementStats::default(),
            bounds: None,
        }
    }
}

/// Player-controlled actor of the survivor game.
#[derive(Clone, Debug, PartialEq)]
pub struct Avatar {
    /// Position in world units.
    pub position: Vec2,
    /// Displacement per frame.
    pub velocity: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Hit points; shield and armor stay at zero.
    pub vitals: Vitals,
    /// Experience collected towards the next level.
    pub experience: u32,
    /// Experience required for the next level.
    pub experience_threshold: u32,
    /// Current level, starting at one.
    pub level: u32,
    /// Weapon block.
    pub weapon: WeaponStats,
    /// Movement block.
    pub movement: MovementStats,
}

impl Avatar {
    fn from_rules(rules: &ArenaRules) -> Self {
        Self {
            position: rules.start,
            velocity: Vec2::ZERO,
            radius: rules.avatar_radius,
            vitals: Vitals::new(rules.avatar_hit_points, 0.0, 0.0),
            experience: 0,
            experience_threshold: rules.first_threshold,
            level: 1,
            weapon: rules.weapon,
            movement: rules.movement,
        }
    }
}

/// Complete state of one survivor run.
#[derive(Clone, Debug)]
pub struct Arena {
    rules: ArenaRules,
    store: EntityStore,
    avatar: Avatar,
    frame: u64,
    score: u64,
}

impl Arena {
    /// Creates a fresh arena.
    #[must_use]
    pub fn new(rules: ArenaRules) -> Self {
        Self {
            avatar: Avatar::from_rules(&rules),
            rules,
            store: EntityStore::new(),
            frame: 0,
            score: 0,
        }
    }

    /// Rules the arena was built from.
    #[must_use]
    pub fn rules(&self) -> &ArenaRules {
        &self.rules
    }

    /// Walls surrounding the arena, if any.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.rules.bounds
    }

    /// Entity collections.
    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Mutable entity collections.
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    /// The player avatar.
    #[must_use]
    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    /// The mutable player avatar.
    pub fn avatar_mut(&mut self) -> &mut Avatar {
        &mut self.avatar
    }

    /// Splits the arena into its avatar and store for simultaneous mutation.
    pub fn parts_mut(&mut self) -> (&mut Avatar, &mut EntityStore) {
        (&mut self.avatar, &mut self.store)
    }

    /// Frames simulated so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Advances the frame counter and returns the new frame.
    pub fn advance_frame(&mut self) -> u64 {
        self.frame += 1;
        self.frame
    }

    /// Accumulated score.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Adds to the score.
    pub fn add_score(&mut self, amount: u64) {
        self.score = self.score.saturating_add(amount);
    }

    /// Re-initializes every field from the stored rules.
    pub fn reset(&mut self) {
        *self = Self::new(self.rules);
    }
}
