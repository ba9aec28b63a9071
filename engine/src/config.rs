//! Engine configuration loaded from TOML.
//!
//! Every table is optional; missing keys fall back to the arcade defaults.

use std::{fs, path::Path, path::PathBuf};

use neon_arcade_core::{CellCoord, Vec2};
use neon_arcade_system_combat as combat;
use neon_arcade_system_physics as physics;
use neon_arcade_system_progression as progression;
use neon_arcade_system_spawning::HordeSpawner;
use neon_arcade_world::{ArenaRules, Bounds, Grid, LaneRules, MovementStats, WeaponStats};
use serde::Deserialize;
use thiserror::Error;

/// Failures raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration from {}", path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
    /// A value is outside its permitted range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Complete configuration of both games.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for every random draw.
    pub seed: u64,
    /// Lane-defense settings.
    pub lane: LaneConfig,
    /// Survivor settings.
    pub survivor: SurvivorConfig,
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks every value against its permitted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lane.validate()?;
        self.survivor.validate()
    }
}

/// Lane-defense settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    /// Grid columns.
    pub columns: u32,
    /// Grid rows.
    pub rows: u32,
    /// Cell edge length in world units.
    pub cell_size: f32,
    /// Entry cell as `[column, row]`.
    pub source: [u32; 2],
    /// Exit cell as `[column, row]`.
    pub target: [u32; 2],
    /// Currency held at the start.
    pub starting_money: u32,
    /// Lives held at the start.
    pub starting_lives: u32,
    /// Particles emitted per kill.
    pub particles_per_kill: u32,
}

impl Default for LaneConfig {
    fn default() -> Self {
        let rules = LaneRules::default();
        Self {
            columns: rules.columns,
            rows: rules.rows,
            cell_size: rules.cell_size,
            source: [rules.source.column(), rules.source.row()],
            target: [rules.target.column(), rules.target.row()],
            starting_money: rules.starting_money,
            starting_lives: rules.starting_lives,
            particles_per_kill: combat::Config::default().burst_particles,
        }
    }
}

impl LaneConfig {
    /// World rules described by this configuration.
    #[must_use]
    pub fn rules(&self) -> LaneRules {
        LaneRules {
            columns: self.columns,
            rows: self.rows,
            cell_size: self.cell_size,
            source: CellCoord::new(self.source[0], self.source[1]),
            target: CellCoord::new(self.target[0], self.target[1]),
            starting_money: self.starting_money,
            starting_lives: self.starting_lives,
        }
    }

    /// Combat tuning described by this configuration.
    #[must_use]
    pub fn combat(&self) -> combat::Config {
        combat::Config {
            burst_particles: self.particles_per_kill,
            ..combat::Config::default()
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "lane.cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        let rules = self.rules();
        let _ = Grid::new(rules.columns, rules.rows, rules.source, rules.target)
            .map_err(|error| ConfigError::Invalid(format!("lane grid: {error}")))?;
        Ok(())
    }
}

/// Optional walls around the survivor arena.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoundsConfig {
    /// Arena width in world units.
    pub width: f32,
    /// Arena height in world units.
    pub height: f32,
    /// Fraction of speed kept after bouncing off a wall.
    pub restitution: f32,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            restitution: 0.5,
        }
    }
}

/// Survivor settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SurvivorConfig {
    /// Avatar spawn position as `[x, y]`.
    pub start: [f32; 2],
    /// Avatar collision radius.
    pub avatar_radius: f32,
    /// Avatar starting hit points.
    pub avatar_hit_points: f32,
    /// Experience required for the first level-up.
    pub first_threshold: u32,
    /// Multiplier applied to the threshold at each level-up.
    pub threshold_growth: f32,
    /// Upgrades offered per level-up.
    pub offers: usize,
    /// Velocity gained per held direction per frame.
    pub acceleration: f32,
    /// Fraction of velocity kept each frame.
    pub friction: f32,
    /// Magnet radius for pickups.
    pub pickup_radius: f32,
    /// Frames between weapon volleys.
    pub fire_interval: f32,
    /// Weapon damage per projectile.
    pub damage: f32,
    /// Projectile speed.
    pub projectile_speed: f32,
    /// Visible area as `[width, height]`; enemies spawn just outside it.
    pub view: [f32; 2],
    /// Extra distance beyond the visible area at which enemies spawn.
    pub spawn_margin: f32,
    /// Frames between spawns at level zero.
    pub spawn_interval: u64,
    /// Shortest spawn interval at high levels.
    pub min_spawn_interval: u64,
    /// Separation push per overlapping neighbour.
    pub separation_nudge: f32,
    /// Frames between contact damage ticks.
    pub contact_interval: u64,
    /// Particles emitted per kill.
    pub particles_per_kill: u32,
    /// Optional walls; the arena is unbounded without them.
    pub bounds: Option<BoundsConfig>,
}

impl Default for SurvivorConfig {
    fn default() -> Self {
        let rules = ArenaRules::default();
        let physics = physics::Config::default();
        let progression = progression::Config::default();
        Self {
            start: rules.start.to_array(),
            avatar_radius: rules.avatar_radius,
            avatar_hit_points: rules.avatar_hit_points,
            first_threshold: rules.first_threshold,
            threshold_growth: progression.threshold_growth,
            offers: progression.offers,
            acceleration: rules.movement.acceleration,
            friction: rules.movement.friction,
            pickup_radius: rules.movement.pickup_radius,
            fire_interval: rules.weapon.fire_interval,
            damage: rules.weapon.damage,
            projectile_speed: rules.weapon.projectile_speed,
            view: [800.0, 600.0],
            spawn_margin: 100.0,
            spawn_interval: 60,
            min_spawn_interval: 10,
            separation_nudge: physics.separation_nudge,
            contact_interval: physics.contact_interval,
            particles_per_kill: combat::Config::default().burst_particles,
            bounds: None,
        }
    }
}

impl SurvivorConfig {
    /// Arena rules described by this configuration.
    #[must_use]
    pub fn rules(&self) -> ArenaRules {
        ArenaRules {
            start: Vec2::from_array(self.start),
            avatar_radius: self.avatar_radius,
            avatar_hit_points: self.avatar_hit_points,
            first_threshold: self.first_threshold,
            weapon: WeaponStats {
                fire_interval: self.fire_interval,
                damage: self.damage,
                projectile_speed: self.projectile_speed,
                ..WeaponStats::default()
            },
            movement: MovementStats {
                acceleration: self.acceleration,
                friction: self.friction,
                pickup_radius: self.pickup_radius,
            },
            bounds: self.bounds.as_ref().map(|bounds| Bounds {
                min: Vec2::ZERO,
                max: Vec2::new(bounds.width, bounds.height),
                restitution: bounds.restitution,
            }),
        }
    }

    /// Horde spawner described by this configuration.
    #[must_use]
    pub fn spawner(&self) -> HordeSpawner {
        HordeSpawner::new(
            self.spawn_interval,
            self.min_spawn_interval,
            Vec2::from_array(self.view),
            self.spawn_margin,
        )
    }

    /// Physics tuning described by this configuration.
    #[must_use]
    pub fn physics(&self) -> physics::Config {
        physics::Config {
            separation_nudge: self.separation_nudge,
            contact_interval: self.contact_interval,
            ..physics::Config::default()
        }
    }

    /// Combat tuning described by this configuration.
    #[must_use]
    pub fn combat(&self) -> combat::Config {
        combat::Config {
            burst_particles: self.particles_per_kill,
            ..combat::Config::default()
        }
    }

    /// Progression tuning described by this configuration.
    #[must_use]
    pub fn progression(&self) -> progression::Config {
        progression::Config {
            threshold_growth: self.threshold_growth,
            offers: self.offers,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "survivor.friction must lie in (0, 1], got {}",
                self.friction
            )));
        }
        if !(self.threshold_growth >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "survivor.threshold_growth must be at least 1, got {}",
                self.threshold_growth
            )));
        }
        if self.first_threshold == 0 || self.offers == 0 {
            return Err(ConfigError::Invalid(
                "survivor.first_threshold and survivor.offers must be positive".to_owned(),
            ));
        }
        if let Some(bounds) = &self.bounds {
            let span = 2.0 * self.avatar_radius;
            if !(bounds.width > span && bounds.height > span) {
                return Err(ConfigError::Invalid(
                    "survivor.bounds must be larger than the avatar".to_owned(),
                ));
            }
        }
        Ok(())
    }
}
