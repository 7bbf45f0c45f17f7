//! Combat module: hitscan weapon + visual traces
//!
//! ECS ответственность:
//! - Rate limiter (cooldown), trigger polling, fire requests
//! - HitResult, trace state object, destruction notification
//! - Events: WeaponFired, EntityDestroyed
//!
//! Host ответственность:
//! - Ray cast (через physics provider plugin: Rapier bridge / headless)
//! - Trail rendering, muzzle flash, audio, death animation

use bevy::prelude::*;

pub mod aim;
pub mod hitscan;
pub mod trace;
pub mod weapon;


// Re-export основных типов
pub use aim::{update_held_weapon_aim, HeldWeaponAim};
pub use hitscan::{fire_hitscan, resolve_hitscan_intents, spawn_traces, HitResult};
pub use trace::{advance_traces, mark_destroyed, Trace, TracePhase, TraceStep};
pub use weapon::{
    accept_fire_requests, poll_weapon_triggers, update_weapon_cooldowns, EntityDestroyed,
    FireRequest, HitscanIntent, HitscanResolved, HitscanWeapon, WeaponConfig, WeaponFired,
    WeaponTrigger, FALLBACK_RANGE,
};

use crate::SimulationSet;

/// Combat Plugin
///
/// FixedUpdate:
/// 1. (Control) cooldowns → trigger polling → fire requests → HitscanIntent
/// 2. (Resolve) ray cast — physics provider plugin
/// 3. (Effects) HitscanResolved → Trace + WeaponFired
///
/// Update (frame-rate):
/// - held weapon aim
/// - traces → EntityDestroyed → Destroyed marker
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<FireRequest>()
            .add_event::<HitscanIntent>()
            .add_event::<HitscanResolved>()
            .add_event::<WeaponFired>()
            .add_event::<EntityDestroyed>();

        crate::configure_simulation_sets(app);

        app.add_systems(
            FixedUpdate,
            (
                (
                    update_weapon_cooldowns,
                    poll_weapon_triggers,
                    accept_fire_requests,
                )
                    .chain()
                    .in_set(SimulationSet::Control),
                spawn_traces.in_set(SimulationSet::Effects),
            ),
        );

        app.add_systems(
            Update,
            (
                update_held_weapon_aim,
                (advance_traces, mark_destroyed).chain(),
            ),
        );
    }
}

/// Spawn helper: hitscan weapon (muzzle = transform)
pub fn spawn_hitscan_weapon(
    commands: &mut Commands,
    muzzle: Transform,
    config: &WeaponConfig,
) -> Entity {
    commands
        .spawn((muzzle, HitscanWeapon::from_config(config)))
        .id()
}
