//! Damage and healing of units.

use hecs::World;
use tracing::info;

use tileworld_core::components::{Mover, UnitInfo, Vitals};
use tileworld_core::enums::UnitStatus;
use tileworld_core::error::{Result, WorldError};
use tileworld_core::events::GameEvent;
use tileworld_core::types::UnitId;

use crate::systems::units::UnitIndex;

/// Result of a hit on a living unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Wounded { dealt: i32, remaining: i32 },
    Killed { dealt: i32 },
}

/// Damage that gets through armour. Always at least 1.
pub fn damage_after_defense(damage: i32, defense: i32) -> i32 {
    damage.saturating_sub(defense).max(1)
}

/// Apply a hit to living vitals.
pub fn apply_damage(vitals: &mut Vitals, damage: i32) -> DamageOutcome {
    let dealt = damage_after_defense(damage, vitals.current.defense);
    vitals.current.health = vitals.current.health.saturating_sub(dealt);

    if vitals.current.health <= 0 {
        vitals.current.health = 0;
        vitals.alive = false;
        DamageOutcome::Killed { dealt }
    } else {
        DamageOutcome::Wounded {
            dealt,
            remaining: vitals.current.health,
        }
    }
}

/// Restore health up to the maximum. Returns the new health.
/// Negative amounts heal nothing.
pub fn apply_heal(vitals: &mut Vitals, amount: i32) -> i32 {
    vitals.current.health = vitals
        .current
        .health
        .saturating_add(amount.max(0))
        .min(vitals.max.health);
    vitals.current.health
}

/// Current over max health, 0 when max health is 0.
pub fn health_fraction(vitals: &Vitals) -> f64 {
    if vitals.max.health == 0 {
        return 0.0;
    }
    vitals.current.health as f64 / vitals.max.health as f64
}

pub fn is_healthy(vitals: &Vitals) -> bool {
    vitals.current.health >= vitals.max.health
}

/// Hit a unit. A killed unit stops where it is and keeps its tile.
pub fn damage_unit(
    world: &mut World,
    index: &UnitIndex,
    id: UnitId,
    amount: i32,
    events: &mut Vec<GameEvent>,
) -> Result<DamageOutcome> {
    let entity = index.entity(id).ok_or(WorldError::UnitNotFound(id))?;
    let (info, vitals, mover) = world
        .query_one_mut::<(&mut UnitInfo, &mut Vitals, &mut Mover)>(entity)
        .map_err(|_| WorldError::UnitNotFound(id))?;

    if !vitals.alive {
        return Err(WorldError::UnitDead(id));
    }

    let outcome = apply_damage(vitals, amount);
    match outcome {
        DamageOutcome::Wounded { dealt, remaining } => {
            events.push(GameEvent::UnitDamaged {
                unit_id: id,
                amount: dealt,
                remaining,
            });
        }
        DamageOutcome::Killed { dealt } => {
            info.status = UnitStatus::Dead;
            mover.moving = false;
            mover.path = None;
            mover.path_step = 0;
            events.push(GameEvent::UnitDamaged {
                unit_id: id,
                amount: dealt,
                remaining: 0,
            });
            events.push(GameEvent::UnitDied { unit_id: id });
            info!(%id, "unit died");
        }
    }
    Ok(outcome)
}

/// Heal a living unit. Returns its new health.
pub fn heal_unit(
    world: &mut World,
    index: &UnitIndex,
    id: UnitId,
    amount: i32,
    events: &mut Vec<GameEvent>,
) -> Result<i32> {
    if amount < 0 {
        return Err(WorldError::NegativeHeal(amount));
    }
    let entity = index.entity(id).ok_or(WorldError::UnitNotFound(id))?;
    let vitals = world
        .query_one_mut::<&mut Vitals>(entity)
        .map_err(|_| WorldError::UnitNotFound(id))?;

    if !vitals.alive {
        return Err(WorldError::UnitDead(id));
    }

    let health = apply_heal(vitals, amount);
    events.push(GameEvent::UnitHealed {
        unit_id: id,
        amount,
        health,
    });
    Ok(health)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileworld_core::types::UnitStats;

    fn vitals(health: i32, defense: i32) -> Vitals {
        let stats = UnitStats {
            health,
            damage: 10,
            speed: 2,
            defense,
        };
        Vitals {
            current: stats,
            max: stats,
            alive: true,
        }
    }

    #[test]
    fn test_damage_after_defense() {
        assert_eq!(damage_after_defense(25, 15), 10);
        assert_eq!(damage_after_defense(10, 15), 1, "Armour never blocks everything");
        assert_eq!(damage_after_defense(0, 0), 1);
        assert_eq!(damage_after_defense(i32::MIN, 15), 1);
        assert_eq!(damage_after_defense(i32::MAX, -5), i32::MAX);
    }

    #[test]
    fn test_apply_damage_wounds_then_kills() {
        let mut v = vitals(30, 3);
        assert_eq!(
            apply_damage(&mut v, 13),
            DamageOutcome::Wounded {
                dealt: 10,
                remaining: 20
            }
        );
        assert!(v.alive);

        assert_eq!(apply_damage(&mut v, 100), DamageOutcome::Killed { dealt: 97 });
        assert_eq!(v.current.health, 0, "Health floors at zero");
        assert!(!v.alive);
    }

    #[test]
    fn test_apply_heal_caps_at_max() {
        let mut v = vitals(60, 5);
        v.current.health = 20;
        assert_eq!(apply_heal(&mut v, 15), 35);
        assert_eq!(apply_heal(&mut v, 500), 60);
        assert!(is_healthy(&v));

        v.current.health = 20;
        assert_eq!(apply_heal(&mut v, i32::MAX), 60);
        assert_eq!(apply_heal(&mut v, -500), 60, "Negative heal is a no-op");
    }

    #[test]
    fn test_health_fraction() {
        let mut v = vitals(40, 2);
        v.current.health = 10;
        assert!((health_fraction(&v) - 0.25).abs() < 1e-12);
        assert!(!is_healthy(&v));

        let empty = vitals(0, 0);
        assert_eq!(health_fraction(&empty), 0.0);
    }
}
