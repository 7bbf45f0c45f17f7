//! Vehicle mode FSM: Grounded ↔ Piloting
//!
//! Инвариант: не больше одного rider'а в Piloting на vehicle.
//! Переходы только по явным enter/exit запросам; отклонённый запрос —
//! no-op без ошибки.

use bevy::prelude::*;
use bevy_rapier3d::prelude::ExternalForce;
use serde::{Deserialize, Serialize};

use crate::components::AnimationParams;
use crate::physics::{GroundContact, GroundProbe};
use super::motion::{Heading, MotionInput};

/// Режим vehicle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum VehicleMode {
    /// Никто не управляет, rider ходит сам
    #[default]
    Grounded,
    /// Rider внутри, input идёт в vehicle
    Piloting,
}

/// Тип vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum VehicleKind {
    Aircraft,
    Tank,
}

/// Поведение, которое отличается между типами vehicle
///
/// Асимметрия exit gating (aircraft — только на земле, tank — всегда)
/// сохранена явным флагом.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct VehiclePolicy {
    /// ExitVehicle только при ground contact
    pub exit_requires_ground: bool,
    /// Поворот/тяга только в воздухе
    pub drive_requires_airborne: bool,
    /// Вертикальная тяга (lift)
    pub has_lift: bool,
    /// Piloting выключает gravity на rigid body
    pub disables_gravity: bool,
    /// Rider копирует rotation pilot anchor'а каждый tick (иначе только position)
    pub pins_rider_rotation: bool,
    /// Fire control шлёт VehicleFireRequested (tank cannon)
    pub emits_fire_request: bool,
}

impl VehicleKind {
    pub fn policy(&self) -> VehiclePolicy {
        match self {
            VehicleKind::Aircraft => VehiclePolicy {
                exit_requires_ground: true,
                drive_requires_airborne: true,
                has_lift: true,
                disables_gravity: true,
                pins_rider_rotation: true,
                emits_fire_request: false,
            },
            VehicleKind::Tank => VehiclePolicy {
                exit_requires_ground: false,
                drive_requires_airborne: false,
                has_lift: false,
                disables_gravity: false,
                pins_rider_rotation: false,
                emits_fire_request: true,
            },
        }
    }
}

/// Vehicle state component
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
#[require(
    MotionInput,
    Heading,
    GroundProbe,
    GroundContact,
    VehicleAnchors,
    AnimationParams,
    ExternalForce,
    Transform
)]
pub struct VehicleState {
    pub kind: VehicleKind,
    pub mode: VehicleMode,
    /// Rider в режиме Piloting (None в Grounded)
    pub rider: Option<Entity>,
}

impl VehicleState {
    pub fn new(kind: VehicleKind) -> Self {
        Self {
            kind,
            mode: VehicleMode::Grounded,
            rider: None,
        }
    }

    pub fn policy(&self) -> VehiclePolicy {
        self.kind.policy()
    }

    pub fn is_piloting(&self) -> bool {
        self.mode == VehicleMode::Piloting
    }

    /// Grounded → Piloting. `false` если vehicle уже занят.
    pub fn try_enter(&mut self, rider: Entity) -> bool {
        if self.is_piloting() {
            return false;
        }

        self.mode = VehicleMode::Piloting;
        self.rider = Some(rider);
        true
    }

    /// Piloting → Grounded. Возвращает rider'а, который вышел.
    ///
    /// `None` если vehicle не в Piloting или exit gated по ground contact.
    pub fn try_exit(&mut self, grounded: bool) -> Option<Entity> {
        if !self.is_piloting() {
            return None;
        }
        if self.policy().exit_requires_ground && !grounded {
            return None;
        }

        self.mode = VehicleMode::Grounded;
        self.rider.take()
    }
}

/// Pilot/exit anchors (local space vehicle)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct VehicleAnchors {
    /// Куда ставится rider при посадке и где держится пока Piloting
    pub pilot: Transform,
    /// Куда ставится rider при выходе
    pub exit: Transform,
}

impl Default for VehicleAnchors {
    fn default() -> Self {
        Self {
            pilot: Transform::IDENTITY,
            exit: Transform::from_xyz(2.0, 0.0, 0.0),
        }
    }
}

impl VehicleAnchors {
    pub fn pilot_world(&self, vehicle: &Transform) -> Transform {
        vehicle.mul_transform(self.pilot)
    }

    pub fn exit_world(&self, vehicle: &Transform) -> Transform {
        vehicle.mul_transform(self.exit)
    }
}

/// Scoped input listener: существует ровно пока vehicle в Piloting
///
/// Вставляется при enter, удаляется при exit. Одна подписка на vehicle —
/// повторная регистрация обработчиков невозможна по построению.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct InputSubscription {
    pub rider: Entity,
    /// Состояние exit кнопки на прошлом tick (edge detection)
    pub exit_was_pressed: bool,
    /// Состояние fire кнопки на прошлом tick (edge detection)
    pub fire_was_pressed: bool,
}

impl InputSubscription {
    pub fn new(rider: Entity) -> Self {
        Self {
            rider,
            exit_was_pressed: false,
            fire_was_pressed: false,
        }
    }
}

/// Engine sound pitch (tank), audio mixing делает host
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EnginePitch(pub f32);

impl Default for EnginePitch {
    fn default() -> Self {
        Self(1.0)
    }
}
