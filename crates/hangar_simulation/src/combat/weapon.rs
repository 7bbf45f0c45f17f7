//! Hitscan weapon + rate limiter
//!
//! Ready → (fire) → Cooldown → (cooldown_duration истёк) → Ready.
//! Fire в Cooldown — дроп (никакой очереди).
//!
//! Архитектура (intent-based, как у tactical/strategic split):
//! 1. ECS: FireRequest → cooldown check → HitscanIntent
//! 2. Physics provider: HitscanIntent → ray cast → HitscanResolved
//! 3. ECS: HitscanResolved → HitResult → Trace + WeaponFired

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::physics::RayHit;
use super::hitscan::HitResult;

/// Дальность fallback точки, когда луч ни во что не попал
pub const FALLBACK_RANGE: f32 = 100.0;

/// Конфиг оружия (serde — часть SimulationConfig)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    /// Время между выстрелами (секунды)
    pub cooldown_duration: f32,
    /// Скорость визуального trace (м/с)
    pub trace_speed: f32,
    /// Дистанция fallback точки при промахе
    pub fallback_range: f32,
    /// Сколько trace остаётся в мире после прибытия (trail time)
    pub trace_lifetime: f32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            cooldown_duration: 0.25,
            trace_speed: 20.0,
            fallback_range: FALLBACK_RANGE,
            trace_lifetime: 0.1,
        }
    }
}

/// Hitscan weapon component
///
/// Muzzle = Transform entity (origin + forward).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
#[require(WeaponTrigger, Transform)]
pub struct HitscanWeapon {
    pub cooldown_duration: f32,
    /// Текущий cooldown timer (уменьшается до 0)
    pub cooldown_timer: f32,
    pub trace_speed: f32,
    pub fallback_range: f32,
    pub trace_lifetime: f32,
}

impl Default for HitscanWeapon {
    fn default() -> Self {
        Self::from_config(&WeaponConfig::default())
    }
}

impl HitscanWeapon {
    pub fn from_config(config: &WeaponConfig) -> Self {
        Self {
            cooldown_duration: config.cooldown_duration,
            cooldown_timer: 0.0,
            trace_speed: config.trace_speed,
            fallback_range: config.fallback_range,
            trace_lifetime: config.trace_lifetime,
        }
    }

    /// Ready (cooldown == 0)
    pub fn is_ready(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    /// Принять fire request: `true` → cooldown запущен, `false` → дроп
    pub fn try_fire(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.cooldown_timer = self.cooldown_duration;
        true
    }

    pub fn tick(&mut self, delta: f32) {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - delta).max(0.0);
        }
    }
}

/// Состояние grab + trigger (пишет host XR interaction bridge)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct WeaponTrigger {
    /// Оружие в руке (grab interactable selected)
    pub held: bool,
    /// Trigger зажат
    pub pressed: bool,
}

/// Event: явный Fire() (host UI, AI, тесты)
#[derive(Event, Debug, Clone, Copy)]
pub struct FireRequest {
    pub weapon: Entity,
}

/// Event: принятый выстрел ждёт ray cast (ECS → physics provider)
#[derive(Event, Debug, Clone, Copy)]
pub struct HitscanIntent {
    pub weapon: Entity,
    pub origin: Vec3,
    /// Нормализованный forward muzzle
    pub direction: Vec3,
}

/// Event: ray cast выполнен (physics provider → ECS)
#[derive(Event, Debug, Clone, Copy)]
pub struct HitscanResolved {
    pub weapon: Entity,
    pub origin: Vec3,
    pub direction: Vec3,
    pub hit: Option<RayHit>,
}

/// Event: выстрел состоялся (host: muzzle flash, звук)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct WeaponFired {
    pub weapon: Entity,
    pub origin: Vec3,
    pub result: HitResult,
}

/// Event: trace долетел до destructible цели
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EntityDestroyed {
    pub entity: Entity,
    pub weapon: Entity,
}

/// System: обновление weapon cooldowns
pub fn update_weapon_cooldowns(mut weapons: Query<&mut HitscanWeapon>, time: Res<Time>) {
    let delta = time.delta_secs();

    for mut weapon in weapons.iter_mut() {
        if !weapon.is_ready() {
            weapon.tick(delta);
        }
    }
}

/// System: зажатый trigger на оружии в руке → FireRequest каждый tick
///
/// Cooldown сам ограничивает темп (auto-fire).
pub fn poll_weapon_triggers(
    weapons: Query<(Entity, &HitscanWeapon, &WeaponTrigger)>,
    mut requests: EventWriter<FireRequest>,
) {
    for (entity, weapon, trigger) in weapons.iter() {
        if trigger.held && trigger.pressed && weapon.is_ready() {
            requests.write(FireRequest { weapon: entity });
        }
    }
}

/// Мировой transform entity: локальные `Transform` по цепочке `ChildOf`
///
/// Не зависит от propagation `GlobalTransform` (headless app без TransformPlugin).
pub fn world_transform(
    entity: Entity,
    transforms: &Query<(&Transform, Option<&ChildOf>)>,
) -> Option<Transform> {
    let (local, mut parent) = transforms.get(entity).ok()?;
    let mut world = *local;

    while let Some(child_of) = parent {
        let Ok((parent_transform, next)) = transforms.get(child_of.parent()) else {
            break;
        };
        world = parent_transform.mul_transform(world);
        parent = next;
    }

    Some(world)
}

/// System: FireRequest → cooldown gate → HitscanIntent
///
/// Muzzle может быть child (оружие в руке) — origin/forward в мировых координатах.
pub fn accept_fire_requests(
    mut requests: EventReader<FireRequest>,
    mut weapons: Query<&mut HitscanWeapon>,
    transforms: Query<(&Transform, Option<&ChildOf>)>,
    mut intents: EventWriter<HitscanIntent>,
) {
    for request in requests.read() {
        let Ok(mut weapon) = weapons.get_mut(request.weapon) else {
            continue;
        };
        let Some(muzzle) = world_transform(request.weapon, &transforms) else {
            continue;
        };

        if !weapon.try_fire() {
            // Cooldown — дроп без очереди
            continue;
        }

        intents.write(HitscanIntent {
            weapon: request.weapon,
            origin: muzzle.translation,
            direction: muzzle.forward().as_vec3(),
        });

        crate::logger::log(&format!("Weapon {:?} fired (intent generated)", request.weapon));
    }
}
