//! Physics query provider interface (ray casts)

use bevy::prelude::*;

/// "Бесконечная" дальность луча (hitscan weapon)
pub const UNBOUNDED_RANGE: f32 = f32::MAX;

/// Результат ray cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Collider entity (None = статичная геометрия без entity, например ground plane)
    pub entity: Option<Entity>,
    /// Точка попадания (world space)
    pub point: Vec3,
    /// Дистанция от origin до точки
    pub distance: f32,
}

/// Фильтр ray cast
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RayFilter {
    /// Пропускать trigger-only colliders (sensors)
    pub ignore_triggers: bool,
    /// Не попадать в эту entity (сам стреляющий / сам vehicle)
    pub exclude: Option<Entity>,
}

impl RayFilter {
    pub fn solid_only() -> Self {
        Self {
            ignore_triggers: true,
            exclude: None,
        }
    }

    pub fn excluding(mut self, entity: Entity) -> Self {
        self.exclude = Some(entity);
        self
    }
}

/// Physics query provider
///
/// `direction` должен быть нормализован. Возвращает ближайшее попадание
/// в пределах `max_distance` или `None`.
pub trait RayCaster {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: RayFilter,
    ) -> Option<RayHit>;
}
