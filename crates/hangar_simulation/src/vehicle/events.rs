//! Vehicle events
//!
//! Requests (host → ECS): EnterVehicleRequest, ExitVehicleRequest
//! Notifications (ECS → host): VehicleEntered, VehicleExited, VehicleFireRequested

use bevy::prelude::*;
use super::state::VehicleKind;

/// Запрос: rider хочет сесть в vehicle (XR interactable select)
#[derive(Event, Debug, Clone, Copy)]
pub struct EnterVehicleRequest {
    pub vehicle: Entity,
    pub rider: Entity,
}

/// Запрос: выйти из vehicle (exit action или host UI)
#[derive(Event, Debug, Clone, Copy)]
pub struct ExitVehicleRequest {
    pub vehicle: Entity,
}

/// Rider сел в vehicle (host: material swap, HUD, audio)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct VehicleEntered {
    pub vehicle: Entity,
    pub rider: Entity,
    pub kind: VehicleKind,
}

/// Rider вышел из vehicle
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct VehicleExited {
    pub vehicle: Entity,
    pub rider: Entity,
    pub kind: VehicleKind,
}

/// Pilot нажал fire внутри vehicle без собственного оружия (tank cannon)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct VehicleFireRequested {
    pub vehicle: Entity,
}
