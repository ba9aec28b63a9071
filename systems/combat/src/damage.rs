//! Shield and armor interaction matrix.

use neon_arcade_core::{DamageKind, Vitals, ENERGY_SHIELD_DRAIN};

/// Result of resolving one hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitOutcome {
    /// Hit points removed.
    pub damage: f32,
    /// Shield points removed.
    pub shield_drained: f32,
    /// Whether the hit took the last hit points.
    pub killed: bool,
}

/// Applies one hit to `vitals`.
///
/// While shield remains, energy hits drain [`ENERGY_SHIELD_DRAIN`] shield and
/// still deal full damage, and any other hit drains exactly one shield point
/// and deals nothing. Damage that gets through is then reduced by armor:
/// explosive hits ignore it, energy hits subtract all of it and kinetic hits
/// subtract half, never dropping below one point.
pub fn apply_hit(vitals: &mut Vitals, damage: f32, kind: DamageKind) -> HitOutcome {
    let was_alive = !vitals.is_depleted();
    let mut dealt = damage;
    let mut shield_drained = 0.0;

    if vitals.shield > 0.0 {
        let drain = match kind {
            DamageKind::Energy => ENERGY_SHIELD_DRAIN.min(vitals.shield),
            DamageKind::Kinetic | DamageKind::Explosive => {
                dealt = 0.0;
                1.0_f32.min(vitals.shield)
            }
        };
        vitals.shield -= drain;
        shield_drained = drain;
    }

    if dealt > 0.0 && vitals.armor > 0.0 {
        dealt = match kind {
            DamageKind::Explosive => dealt,
            DamageKind::Energy => (dealt - vitals.armor).max(1.0),
            DamageKind::Kinetic => (dealt - vitals.armor / 2.0).max(1.0),
        };
    }

    vitals.hit_points -= dealt;
    HitOutcome {
        damage: dealt,
        shield_drained,
        killed: was_alive && vitals.is_depleted(),
    }
}
