//! Force-based motion model
//!
//! Каждый fixed tick (только Piloting):
//! 1. planar input ниже dead zone → ни поворота, ни тяги
//! 2. yaw += lateral * rotate_speed * dt (градусы)
//! 3. force = rot_y(yaw) * (lateral, 0, longitudinal) * move_speed
//! 4. aircraft: + (0, vertical, 0) * lift_speed (ground/altitude gating)
//!
//! Force непрерывная (не impulse) и действует только этот tick —
//! `ExternalForce` переписывается каждый tick, без input обнуляется.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ExternalForce, Velocity};
use serde::{Deserialize, Serialize};

use crate::physics::{can_ascend, can_descend, GroundContact};
use super::state::{EnginePitch, VehiclePolicy, VehicleState};

/// Dead zone для analog stick (квадрат длины)
pub const INPUT_DEAD_ZONE_SQ: f32 = 0.01;

/// Диапазон engine pitch
pub const ENGINE_PITCH_MIN: f32 = 1.0;
pub const ENGINE_PITCH_MAX: f32 = 1.3;

/// Input vehicle на текущий tick (заполняется из RiderInput)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MotionInput {
    pub lateral: f32,
    pub longitudinal: f32,
    /// Только vehicles с lift
    pub vertical: f32,
}

impl MotionInput {
    pub fn planar_active(&self) -> bool {
        self.lateral * self.lateral + self.longitudinal * self.longitudinal >= INPUT_DEAD_ZONE_SQ
    }

    pub fn lift_active(&self) -> bool {
        self.vertical * self.vertical >= INPUT_DEAD_ZONE_SQ
    }
}

/// Скоростные константы типа vehicle
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct MotionConstants {
    /// Множитель горизонтальной силы
    pub move_speed: f32,
    /// Градусов поворота в секунду при полном lateral
    pub rotate_speed: f32,
    /// Множитель вертикальной силы
    pub lift_speed: f32,
    /// Потолок (world Y)
    pub max_altitude: f32,
}

impl MotionConstants {
    pub fn aircraft() -> Self {
        Self {
            move_speed: 4.0,
            rotate_speed: 60.0,
            lift_speed: 12.0,
            max_altitude: 30.0,
        }
    }

    pub fn tank() -> Self {
        Self {
            move_speed: 6.0,
            rotate_speed: 45.0,
            lift_speed: 0.0,
            max_altitude: f32::MAX,
        }
    }
}

/// Накопленный yaw vehicle (градусы)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Heading {
    pub yaw_degrees: f32,
}

impl Heading {
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw_degrees.to_radians())
    }
}

/// Результат motion model на один tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionPlan {
    /// Новый yaw (None = поворота не было)
    pub yaw_degrees: Option<f32>,
    /// Сила на этот tick (ZERO = ничего не прикладываем)
    pub force: Vec3,
}

impl MotionPlan {
    pub const IDLE: Self = Self {
        yaw_degrees: None,
        force: Vec3::ZERO,
    };
}

/// Поворот + горизонтальная сила
pub fn plan_drive(
    input: &MotionInput,
    constants: &MotionConstants,
    heading: Heading,
    delta: f32,
) -> Option<(f32, Vec3)> {
    if !input.planar_active() {
        return None;
    }

    let yaw = heading.yaw_degrees + input.lateral * constants.rotate_speed * delta;
    let direction = Heading { yaw_degrees: yaw }.rotation() * Vec3::new(input.lateral, 0.0, input.longitudinal);
    Some((yaw, direction * constants.move_speed))
}

/// Вертикальная сила (aircraft) с ground/altitude gating
pub fn plan_lift(
    input: &MotionInput,
    constants: &MotionConstants,
    grounded: bool,
    altitude: f32,
) -> Option<Vec3> {
    if !input.lift_active() {
        return None;
    }
    if input.vertical < 0.0 && !can_descend(grounded) {
        return None;
    }
    if input.vertical > 0.0 && !can_ascend(altitude, constants.max_altitude) {
        return None;
    }

    Some(Vec3::new(0.0, input.vertical, 0.0) * constants.lift_speed)
}

/// Полный план на tick с учётом policy типа vehicle
pub fn plan_motion(
    policy: &VehiclePolicy,
    input: &MotionInput,
    constants: &MotionConstants,
    heading: Heading,
    grounded: bool,
    altitude: f32,
    delta: f32,
) -> MotionPlan {
    let mut plan = MotionPlan::IDLE;

    let drive_allowed = !(policy.drive_requires_airborne && grounded);
    if drive_allowed {
        if let Some((yaw, force)) = plan_drive(input, constants, heading, delta) {
            plan.yaw_degrees = Some(yaw);
            plan.force += force;
        }
    }

    if policy.has_lift {
        if let Some(lift) = plan_lift(input, constants, grounded, altitude) {
            plan.force += lift;
        }
    }

    plan
}

/// Pitch двигателя от скорости: clamp(|v|², 1.0, 1.3)
pub fn engine_pitch(velocity: Vec3) -> f32 {
    velocity.length_squared().clamp(ENGINE_PITCH_MIN, ENGINE_PITCH_MAX)
}

/// System: motion model → ExternalForce + yaw
pub fn apply_vehicle_motion(
    mut vehicles: Query<(
        &VehicleState,
        &MotionInput,
        &MotionConstants,
        &GroundContact,
        &mut Heading,
        &mut Transform,
        &mut ExternalForce,
    )>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (state, input, constants, contact, mut heading, mut transform, mut external) in vehicles.iter_mut() {
        let plan = if state.is_piloting() {
            plan_motion(
                &state.policy(),
                input,
                constants,
                *heading,
                contact.grounded,
                transform.translation.y,
                delta,
            )
        } else {
            MotionPlan::IDLE
        };

        if let Some(yaw) = plan.yaw_degrees {
            heading.yaw_degrees = yaw;
            transform.rotation = heading.rotation();
        }

        if external.force != plan.force {
            external.force = plan.force;
        }
    }
}

/// System: engine pitch от текущей скорости rigid body (только под пилотом)
pub fn update_engine_pitch(mut vehicles: Query<(&VehicleState, &Velocity, &mut EnginePitch)>) {
    for (state, velocity, mut pitch) in vehicles.iter_mut() {
        if !state.is_piloting() {
            continue;
        }
        let value = engine_pitch(velocity.linvel);
        if pitch.0 != value {
            pitch.0 = value;
        }
    }
}
