//! Hitscan resolution: ray hit → HitResult → Trace
//!
//! HitResult создаётся ровно один раз на принятый выстрел и дальше
//! живёт внутри Trace (destruction notification на прибытии).

use bevy::prelude::*;

use crate::components::Destructible;
use crate::physics::{RayCaster, RayFilter, RayHit, UNBOUNDED_RANGE};
use super::trace::Trace;
use super::weapon::{HitscanIntent, HitscanResolved, HitscanWeapon, WeaponFired};

/// Результат hit test
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct HitResult {
    /// Луч во что-то попал
    pub hit: bool,
    /// Impact point (или fallback точка при промахе)
    pub point: Vec3,
    /// Destructible цель (None — промах или не destructible collider)
    pub target: Option<Entity>,
}

impl HitResult {
    /// Промах: точка на `fallback_range` вдоль направления выстрела
    pub fn miss(origin: Vec3, direction: Vec3, fallback_range: f32) -> Self {
        Self {
            hit: false,
            point: origin + direction * fallback_range,
            target: None,
        }
    }

    pub fn resolve(
        origin: Vec3,
        direction: Vec3,
        hit: Option<RayHit>,
        fallback_range: f32,
        is_destructible: impl Fn(Entity) -> bool,
    ) -> Self {
        match hit {
            Some(hit) => Self {
                hit: true,
                point: hit.point,
                target: hit.entity.filter(|entity| is_destructible(*entity)),
            },
            None => Self::miss(origin, direction, fallback_range),
        }
    }
}

/// Синхронный выстрел: cooldown gate + ray cast + HitResult
///
/// `None` — запрос дропнут (cooldown).
pub fn fire_hitscan(
    weapon: &mut HitscanWeapon,
    origin: Vec3,
    direction: Vec3,
    caster: &impl RayCaster,
    is_destructible: impl Fn(Entity) -> bool,
) -> Option<HitResult> {
    if !weapon.try_fire() {
        return None;
    }

    let direction = direction.normalize_or_zero();
    let hit = caster.cast_ray(origin, direction, UNBOUNDED_RANGE, RayFilter::solid_only());
    Some(HitResult::resolve(
        origin,
        direction,
        hit,
        weapon.fallback_range,
        is_destructible,
    ))
}

/// Helper для physics provider'ов: intents → resolved
///
/// `caster == None` (physics недоступна) → все intents резолвятся промахом.
pub fn resolve_hitscan_intents(
    caster: Option<&impl RayCaster>,
    intents: &mut EventReader<HitscanIntent>,
    resolved: &mut EventWriter<HitscanResolved>,
) {
    for intent in intents.read() {
        let hit = caster.and_then(|caster| {
            caster.cast_ray(
                intent.origin,
                intent.direction,
                UNBOUNDED_RANGE,
                RayFilter::solid_only().excluding(intent.weapon),
            )
        });

        resolved.write(HitscanResolved {
            weapon: intent.weapon,
            origin: intent.origin,
            direction: intent.direction,
            hit,
        });
    }
}

/// System: HitscanResolved → Trace entity + WeaponFired
///
/// Trace не блокирует следующий выстрел (cooldown идёт независимо).
pub fn spawn_traces(
    mut commands: Commands,
    mut resolved: EventReader<HitscanResolved>,
    weapons: Query<&HitscanWeapon>,
    destructibles: Query<(), With<Destructible>>,
    mut fired: EventWriter<WeaponFired>,
) {
    for shot in resolved.read() {
        let Ok(weapon) = weapons.get(shot.weapon) else {
            crate::logger::log_warning(&format!(
                "HitscanResolved: weapon {:?} despawned before trace",
                shot.weapon
            ));
            continue;
        };

        let result = HitResult::resolve(
            shot.origin,
            shot.direction,
            shot.hit,
            weapon.fallback_range,
            |entity| destructibles.contains(entity),
        );

        let trace = Trace::new(
            shot.weapon,
            shot.origin,
            result.point,
            weapon.trace_speed,
            weapon.trace_lifetime,
            result.target,
        );
        commands.spawn((trace, Transform::from_translation(shot.origin)));

        fired.write(WeaponFired {
            weapon: shot.weapon,
            origin: shot.origin,
            result,
        });

        if let Some(target) = result.target {
            crate::logger::log(&format!("🎯 Weapon {:?} hit {:?}", shot.weapon, target));
        }
    }
}
