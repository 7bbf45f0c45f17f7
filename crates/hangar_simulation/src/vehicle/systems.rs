//! Vehicle systems (FixedUpdate)
//!
//! Порядок (SimulationSet::Control, chain):
//! 1. route_rider_input — RiderInput → MotionInput / exit / fire (только подписанные vehicles)
//! 2. process_enter_requests — Grounded → Piloting
//! 3. process_exit_requests — Piloting → Grounded (ground gating по policy)
//! 4. pin_riders_to_pilot_anchor — rider держится на pilot anchor

use bevy::prelude::*;
use bevy_rapier3d::prelude::GravityScale;

use crate::components::{AnimationParams, Rider, RiderInput, PARAM_USE_AIR};
use crate::physics::GroundContact;
use super::events::{
    EnterVehicleRequest, ExitVehicleRequest, VehicleEntered, VehicleExited, VehicleFireRequested,
};
use super::motion::MotionInput;
use super::state::{InputSubscription, VehicleAnchors, VehicleState};

/// System: input подписанного rider'а → vehicle
///
/// Exit/fire — по нажатию (rising edge), один запрос на нажатие.
pub fn route_rider_input(
    mut vehicles: Query<(Entity, &VehicleState, &mut InputSubscription, &mut MotionInput)>,
    riders: Query<&RiderInput>,
    mut exit_requests: EventWriter<ExitVehicleRequest>,
    mut fire_requests: EventWriter<VehicleFireRequested>,
) {
    for (vehicle, state, mut subscription, mut motion) in vehicles.iter_mut() {
        let Ok(input) = riders.get(subscription.rider) else {
            continue;
        };

        let policy = state.policy();
        let has_lift = policy.has_lift;
        let routed = MotionInput {
            lateral: input.move_axis.x,
            longitudinal: input.move_axis.y,
            vertical: if has_lift { input.lift_axis.y } else { 0.0 },
        };
        if *motion != routed {
            *motion = routed;
        }

        if input.exit_pressed && !subscription.exit_was_pressed {
            exit_requests.write(ExitVehicleRequest { vehicle });
        }
        if policy.emits_fire_request && input.fire_pressed && !subscription.fire_was_pressed {
            fire_requests.write(VehicleFireRequested { vehicle });
            crate::logger::log(&format!("Vehicle {:?}: fire requested by pilot", vehicle));
        }

        subscription.exit_was_pressed = input.exit_pressed;
        subscription.fire_was_pressed = input.fire_pressed;
    }
}

/// System: EnterVehicleRequest → Piloting
///
/// Side effects: locomotion rider'а выключена, rider на pilot anchor,
/// input subscription, gravity/animation для aircraft, VehicleEntered.
pub fn process_enter_requests(
    mut commands: Commands,
    mut requests: EventReader<EnterVehicleRequest>,
    mut vehicles: Query<
        (
            &mut VehicleState,
            &Transform,
            &VehicleAnchors,
            &mut AnimationParams,
            Option<&mut GravityScale>,
        ),
        Without<Rider>,
    >,
    mut riders: Query<(&mut Rider, &mut Transform), Without<VehicleState>>,
    mut entered: EventWriter<VehicleEntered>,
) {
    for request in requests.read() {
        let Ok((mut state, vehicle_transform, anchors, mut animation, gravity)) =
            vehicles.get_mut(request.vehicle)
        else {
            crate::logger::log_warning(&format!(
                "EnterVehicleRequest: {:?} не vehicle",
                request.vehicle
            ));
            continue;
        };

        let Ok((mut rider, mut rider_transform)) = riders.get_mut(request.rider) else {
            crate::logger::log_warning(&format!(
                "EnterVehicleRequest: {:?} не rider",
                request.rider
            ));
            continue;
        };

        // Rider уже пилотирует другой vehicle
        if rider.is_seated() {
            continue;
        }

        if !state.try_enter(request.rider) {
            continue;
        }

        let policy = state.policy();
        if policy.disables_gravity {
            if let Some(mut gravity) = gravity {
                gravity.0 = 0.0;
            }
        }
        if policy.has_lift {
            animation.set_bool(PARAM_USE_AIR, true);
        }

        rider.seat(request.vehicle);
        *rider_transform = anchors.pilot_world(vehicle_transform);

        commands
            .entity(request.vehicle)
            .insert(InputSubscription::new(request.rider));

        entered.write(VehicleEntered {
            vehicle: request.vehicle,
            rider: request.rider,
            kind: state.kind,
        });

        crate::logger::log_info(&format!(
            "🚁 Rider {:?} entered {:?} {:?}",
            request.rider, state.kind, request.vehicle
        ));
    }
}

/// System: ExitVehicleRequest → Grounded
///
/// Aircraft: запрос игнорируется пока нет ground contact (ошибки нет).
pub fn process_exit_requests(
    mut commands: Commands,
    mut requests: EventReader<ExitVehicleRequest>,
    mut vehicles: Query<
        (
            &mut VehicleState,
            &Transform,
            &VehicleAnchors,
            &GroundContact,
            &mut MotionInput,
            &mut AnimationParams,
            Option<&mut GravityScale>,
        ),
        Without<Rider>,
    >,
    mut riders: Query<(&mut Rider, &mut Transform), Without<VehicleState>>,
    mut exited: EventWriter<VehicleExited>,
) {
    for request in requests.read() {
        let Ok((mut state, vehicle_transform, anchors, contact, mut motion, mut animation, gravity)) =
            vehicles.get_mut(request.vehicle)
        else {
            continue;
        };

        let Some(rider_entity) = state.try_exit(contact.grounded) else {
            if state.is_piloting() {
                crate::logger::log(&format!(
                    "Exit from {:?} ignored: no ground contact",
                    request.vehicle
                ));
            }
            continue;
        };

        let policy = state.policy();
        if policy.disables_gravity {
            if let Some(mut gravity) = gravity {
                gravity.0 = 1.0;
            }
        }
        if policy.has_lift {
            animation.set_bool(PARAM_USE_AIR, false);
        }
        *motion = MotionInput::default();

        if let Ok((mut rider, mut rider_transform)) = riders.get_mut(rider_entity) {
            rider.unseat();
            *rider_transform = anchors.exit_world(vehicle_transform);
        }

        commands.entity(request.vehicle).remove::<InputSubscription>();

        exited.write(VehicleExited {
            vehicle: request.vehicle,
            rider: rider_entity,
            kind: state.kind,
        });

        crate::logger::log_info(&format!(
            "Rider {:?} exited {:?} {:?}",
            rider_entity, state.kind, request.vehicle
        ));
    }
}

/// System: пока Piloting — rider на pilot anchor каждый tick
pub fn pin_riders_to_pilot_anchor(
    vehicles: Query<(&VehicleState, &Transform, &VehicleAnchors), Without<Rider>>,
    mut riders: Query<&mut Transform, (With<Rider>, Without<VehicleState>)>,
) {
    for (state, vehicle_transform, anchors) in vehicles.iter() {
        let Some(rider) = state.rider else {
            continue;
        };
        let Ok(mut rider_transform) = riders.get_mut(rider) else {
            continue;
        };

        let anchor = anchors.pilot_world(vehicle_transform);
        rider_transform.translation = anchor.translation;
        if state.policy().pins_rider_rotation {
            rider_transform.rotation = anchor.rotation;
        }
    }
}
