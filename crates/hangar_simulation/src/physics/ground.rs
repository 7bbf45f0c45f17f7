//! Ground probe + altitude gating
//!
//! Ground probe = луч вниз из центра vehicle длиной
//! `half_height + GROUND_PROBE_MARGIN`. Попал → vehicle на земле.
//!
//! Gating (только aircraft):
//! - спуск запрещён на земле
//! - подъём запрещён на высоте ≥ max_altitude
//! - выход из vehicle разрешён только на земле

use bevy::prelude::*;
use super::raycast::{RayCaster, RayFilter};

/// Запас длины луча сверх половины высоты collider'а
pub const GROUND_PROBE_MARGIN: f32 = 0.5;

/// Параметры ground probe (half_height = bounds.extents.y collider'а)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct GroundProbe {
    pub half_height: f32,
}

impl Default for GroundProbe {
    fn default() -> Self {
        Self { half_height: 0.5 }
    }
}

impl GroundProbe {
    pub fn length(&self) -> f32 {
        self.half_height + GROUND_PROBE_MARGIN
    }
}

/// Результат последнего ground probe (пишется physics provider'ом)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct GroundContact {
    pub grounded: bool,
}

/// Луч вниз из `origin`, сам vehicle исключён
pub fn probe_ground(
    caster: &impl RayCaster,
    origin: Vec3,
    probe: &GroundProbe,
    vehicle: Entity,
) -> bool {
    caster
        .cast_ray(
            origin,
            Vec3::NEG_Y,
            probe.length(),
            RayFilter::default().excluding(vehicle),
        )
        .is_some()
}

/// Подъём разрешён строго ниже потолка
pub fn can_ascend(altitude: f32, max_altitude: f32) -> bool {
    altitude < max_altitude
}

/// Спуск разрешён только в воздухе
pub fn can_descend(grounded: bool) -> bool {
    !grounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::HeadlessScene;

    #[test]
    fn test_probe_length_adds_margin() {
        let probe = GroundProbe { half_height: 1.5 };
        assert_eq!(probe.length(), 2.0);
    }

    #[test]
    fn test_probe_hits_ground_within_length() {
        let scene = HeadlessScene::new(Some(0.0));
        let probe = GroundProbe { half_height: 1.0 };
        let vehicle = Entity::from_raw(1);

        // Стоит на земле: центр на половине высоты
        assert!(probe_ground(&scene, Vec3::new(0.0, 1.0, 0.0), &probe, vehicle));
        // Ровно на длине луча — ещё земля
        assert!(probe_ground(&scene, Vec3::new(0.0, 1.5, 0.0), &probe, vehicle));
        // Выше — в воздухе
        assert!(!probe_ground(&scene, Vec3::new(0.0, 1.6, 0.0), &probe, vehicle));
    }

    #[test]
    fn test_ascend_suppressed_at_ceiling() {
        let max_altitude = 30.0;
        assert!(!can_ascend(max_altitude, max_altitude));
        assert!(can_ascend(max_altitude - 0.001, max_altitude));
        assert!(!can_ascend(max_altitude + 1.0, max_altitude));
    }

    #[test]
    fn test_descend_suppressed_on_ground() {
        assert!(!can_descend(true));
        assert!(can_descend(false));
    }
}
