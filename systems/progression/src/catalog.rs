//! Upgrades offered at level-up and the stat changes they declare.

use neon_arcade_core::UpgradeKind;
use neon_arcade_world::Avatar;

/// Fire interval never drops below this many frames.
pub const MIN_FIRE_INTERVAL: f32 = 5.0;

/// Avatar statistic an upgrade can change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stat {
    /// Weapon damage per projectile.
    Damage,
    /// Frames between volleys.
    FireInterval,
    /// Velocity gained per held direction.
    Acceleration,
    /// Maximum hit points.
    MaxHitPoints,
    /// Projectiles per volley.
    ProjectileCount,
}

/// One declared stat change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StatEffect {
    /// Multiplies the stat.
    Scale {
        /// Stat to change.
        stat: Stat,
        /// Multiplier.
        factor: f32,
    },
    /// Adds to the stat.
    Offset {
        /// Stat to change.
        stat: Stat,
        /// Amount added.
        amount: f32,
    },
    /// Restores a fraction of maximum hit points, capped at the maximum.
    Heal {
        /// Fraction of maximum hit points restored.
        fraction: f32,
    },
}

impl StatEffect {
    /// Applies the effect to the avatar.
    pub fn apply(&self, avatar: &mut Avatar) {
        match *self {
            Self::Scale { stat, factor } => {
                let value = read(avatar, stat) * factor;
                write(avatar, stat, value);
            }
            Self::Offset { stat, amount } => {
                let value = read(avatar, stat) + amount;
                write(avatar, stat, value);
            }
            Self::Heal { fraction } => {
                let vitals = &mut avatar.vitals;
                vitals.hit_points =
                    (vitals.hit_points + vitals.max_hit_points * fraction).min(vitals.max_hit_points);
            }
        }
    }
}

fn read(avatar: &Avatar, stat: Stat) -> f32 {
    match stat {
        Stat::Damage => avatar.weapon.damage,
        Stat::FireInterval => avatar.weapon.fire_interval,
        Stat::Acceleration => avatar.movement.acceleration,
        Stat::MaxHitPoints => avatar.vitals.max_hit_points,
        Stat::ProjectileCount => avatar.weapon.projectile_count as f32,
    }
}

fn write(avatar: &mut Avatar, stat: Stat, value: f32) {
    match stat {
        Stat::Damage => avatar.weapon.damage = value,
        Stat::FireInterval => avatar.weapon.fire_interval = value.max(MIN_FIRE_INTERVAL),
        Stat::Acceleration => avatar.movement.acceleration = value,
        Stat::MaxHitPoints => avatar.vitals.max_hit_points = value,
        Stat::ProjectileCount => avatar.weapon.projectile_count = value.round().max(1.0) as u32,
    }
}

/// Catalog entry describing one upgrade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Upgrade {
    /// Identifier of the upgrade.
    pub kind: UpgradeKind,
    /// Display name.
    pub name: &'static str,
    /// One-line summary for the choice screen.
    pub description: &'static str,
    /// Changes applied in order when chosen.
    pub effects: &'static [StatEffect],
}

impl Upgrade {
    /// Applies every effect of the upgrade to the avatar.
    pub fn apply(&self, avatar: &mut Avatar) {
        for effect in self.effects {
            effect.apply(avatar);
        }
    }
}

/// Every upgrade in the order of [`UpgradeKind::ALL`].
pub static CATALOG: [Upgrade; 5] = [
    Upgrade {
        kind: UpgradeKind::Damage,
        name: "High Voltage",
        description: "+25% damage",
        effects: &[StatEffect::Scale {
            stat: Stat::Damage,
            factor: 1.25,
        }],
    },
    Upgrade {
        kind: UpgradeKind::FireRate,
        name: "Overclock",
        description: "+20% fire rate",
        effects: &[StatEffect::Scale {
            stat: Stat::FireInterval,
            factor: 0.8,
        }],
    },
    Upgrade {
        kind: UpgradeKind::MoveSpeed,
        name: "Light Speed",
        description: "+15% move speed",
        effects: &[StatEffect::Scale {
            stat: Stat::Acceleration,
            factor: 1.15,
        }],
    },
    Upgrade {
        kind: UpgradeKind::Hull,
        name: "Reinforced Hull",
        description: "+20 max hp, heal 50%",
        effects: &[
            StatEffect::Offset {
                stat: Stat::MaxHitPoints,
                amount: 20.0,
            },
            StatEffect::Heal { fraction: 0.5 },
        ],
    },
    Upgrade {
        kind: UpgradeKind::Multishot,
        name: "Split Threading",
        description: "+1 projectile",
        effects: &[StatEffect::Offset {
            stat: Stat::ProjectileCount,
            amount: 1.0,
        }],
    },
];

/// Looks up the catalog entry of an upgrade.
#[must_use]
pub fn upgrade(kind: UpgradeKind) -> &'static Upgrade {
    match kind {
        UpgradeKind::Damage => &CATALOG[0],
        UpgradeKind::FireRate => &CATALOG[1],
        UpgradeKind::MoveSpeed => &CATALOG[2],
        UpgradeKind::Hull => &CATALOG[3],
        UpgradeKind::Multishot => &CATALOG[4],
    }
}
