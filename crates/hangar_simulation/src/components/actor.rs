//! Rider / player / destructible компоненты
//!
//! Rider = XR rig игрока. Пока rider пилотирует, его собственная
//! locomotion выключена, а input перенаправляется в vehicle.

use bevy::prelude::*;

/// Маркер: XR rig игрока (цель для pursuit agent)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerRig;

/// Rider — entity, которая может садиться в vehicle
///
/// Инвариант: `vehicle.is_some()` ⇔ `!locomotion_enabled`
/// (host engine читает `locomotion_enabled` и включает/выключает
/// character controller + locomotion system)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(RiderInput, Transform)]
pub struct Rider {
    /// Независимая locomotion (teleport/continuous move) включена
    pub locomotion_enabled: bool,
    /// Vehicle, которым rider сейчас управляет
    pub vehicle: Option<Entity>,
}

impl Default for Rider {
    fn default() -> Self {
        Self {
            locomotion_enabled: true,
            vehicle: None,
        }
    }
}

impl Rider {
    pub fn is_seated(&self) -> bool {
        self.vehicle.is_some()
    }

    pub fn seat(&mut self, vehicle: Entity) {
        self.vehicle = Some(vehicle);
        self.locomotion_enabled = false;
    }

    pub fn unseat(&mut self) {
        self.vehicle = None;
        self.locomotion_enabled = true;
    }
}

/// Сэмпл контроллеров rider'а (пишется host input bridge каждый tick)
///
/// - `move_axis`: x = lateral (поворот/страф), y = longitudinal
/// - `lift_axis`: y = вверх/вниз (только vehicles с lift)
/// - `exit_pressed` / `fire_pressed`: текущее состояние кнопок
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct RiderInput {
    pub move_axis: Vec2,
    pub lift_axis: Vec2,
    pub exit_pressed: bool,
    pub fire_pressed: bool,
}

/// Маркер: entity можно уничтожить выстрелом (получает `EntityDestroyed`)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Destructible;

/// Маркер: destruction notification уже получена
///
/// Деспавн не автоматический — host проигрывает death animation сам.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Destroyed;

/// Spawn helper: XR rig игрока (rider + pursuit target)
pub fn spawn_player_rig(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            Rider::default(),
            PlayerRig,
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rider_seat_toggles_locomotion() {
        let mut rider = Rider::default();
        assert!(rider.locomotion_enabled);
        assert!(!rider.is_seated());

        let vehicle = Entity::from_raw(7);
        rider.seat(vehicle);
        assert!(!rider.locomotion_enabled);
        assert_eq!(rider.vehicle, Some(vehicle));

        rider.unseat();
        assert!(rider.locomotion_enabled);
        assert!(!rider.is_seated());
    }
}
