//! Vehicle module: aircraft + tank
//!
//! ECS ответственность:
//! - Mode FSM (Grounded ↔ Piloting), rider ownership, input subscription
//! - Motion model (force + yaw), ground/altitude gating
//! - Events: VehicleEntered / VehicleExited / VehicleFireRequested
//!
//! Host ответственность:
//! - Rapier step (ExternalForce → движение), XR rig rendering
//! - Material swap, audio, input binding (пишет RiderInput)

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, GravityScale, RigidBody, Velocity};

pub mod events;
pub mod motion;
pub mod state;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod motion_tests;

// Re-export основных типов
pub use events::{
    EnterVehicleRequest, ExitVehicleRequest, VehicleEntered, VehicleExited, VehicleFireRequested,
};
pub use motion::{
    apply_vehicle_motion, engine_pitch, plan_drive, plan_lift, plan_motion, update_engine_pitch,
    Heading, MotionConstants, MotionInput, MotionPlan, INPUT_DEAD_ZONE_SQ,
};
pub use state::{
    EnginePitch, InputSubscription, VehicleAnchors, VehicleKind, VehicleMode, VehiclePolicy,
    VehicleState,
};
pub use systems::{
    pin_riders_to_pilot_anchor, process_enter_requests, process_exit_requests, route_rider_input,
};

use crate::physics::GroundProbe;
use crate::SimulationSet;

/// Vehicle Plugin
///
/// Регистрирует vehicle системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. (Sensors) ground probe — physics provider plugin
/// 2. (Control) route_rider_input → enter → exit → pin riders
/// 3. (Motion) apply_vehicle_motion → update_engine_pitch
pub struct VehiclePlugin;

impl Plugin for VehiclePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EnterVehicleRequest>()
            .add_event::<ExitVehicleRequest>()
            .add_event::<VehicleEntered>()
            .add_event::<VehicleExited>()
            .add_event::<VehicleFireRequested>();

        crate::configure_simulation_sets(app);

        app.add_systems(
            FixedUpdate,
            (
                (
                    route_rider_input,
                    process_enter_requests,
                    process_exit_requests,
                    pin_riders_to_pilot_anchor,
                )
                    .chain()
                    .in_set(SimulationSet::Control),
                (apply_vehicle_motion, update_engine_pitch)
                    .chain()
                    .in_set(SimulationSet::Motion),
            ),
        );
    }
}

/// Spawn helper: aircraft (dynamic rigid body, gravity пока Grounded)
///
/// `half_extents` — половина размеров box collider'а; ground probe
/// использует `half_extents.y`.
pub fn spawn_aircraft(
    commands: &mut Commands,
    position: Vec3,
    half_extents: Vec3,
    constants: MotionConstants,
) -> Entity {
    let pilot = Transform::from_xyz(0.0, half_extents.y, 0.0);
    // Rider выходит сбоку, развёрнутым на 90° относительно кабины
    let exit = Transform::from_xyz(half_extents.x + 1.5, 0.0, 0.0)
        .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2) * pilot.rotation);

    commands
        .spawn((
            Transform::from_translation(position),
            VehicleState::new(VehicleKind::Aircraft),
            constants,
            VehicleAnchors { pilot, exit },
            GroundProbe {
                half_height: half_extents.y,
            },
            // Rapier physics
            RigidBody::Dynamic,
            Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
            GravityScale(1.0),
            Velocity::default(),
        ))
        .id()
}

/// Spawn helper: tank (exit без ground gating, без lift)
pub fn spawn_tank(
    commands: &mut Commands,
    position: Vec3,
    half_extents: Vec3,
    constants: MotionConstants,
) -> Entity {
    let anchors = VehicleAnchors {
        pilot: Transform::from_xyz(0.0, half_extents.y, 0.0),
        exit: Transform::from_xyz(0.0, 0.0, -(half_extents.z + 1.5)),
    };

    commands
        .spawn((
            Transform::from_translation(position),
            VehicleState::new(VehicleKind::Tank),
            constants,
            anchors,
            GroundProbe {
                half_height: half_extents.y,
            },
            EnginePitch::default(),
            // Rapier physics
            RigidBody::Dynamic,
            Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
            Velocity::default(),
        ))
        .id()
}
