//! AI module: pursuit agent
//!
//! Detection volume (host) → TargetDetected → pursuit FSM → PathAgent
//! destination + animation params. NavMesh pathfinding делает host.

use bevy::prelude::*;

pub mod events;
pub mod pursuit;

#[cfg(test)]
mod pursuit_tests;

// Re-export основных типов
pub use events::TargetDetected;
pub use pursuit::{
    acquire_targets, disable_destroyed_agents, evaluate_pursuit, flat_look_target,
    pursue_targets, PathAgent, PursuitAgent, PursuitConfig, PursuitState, PursuitTarget,
};

use crate::components::Destructible;

/// AI Plugin
///
/// Update (frame-rate, как host NavMesh agent):
/// 1. acquire_targets — detection → Pursuing
/// 2. pursue_targets — destination / look-at / gunPlay
/// 3. disable_destroyed_agents — после destruction notification traces
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TargetDetected>()
            .add_event::<crate::combat::EntityDestroyed>();

        app.add_systems(
            Update,
            (
                acquire_targets,
                pursue_targets,
                disable_destroyed_agents.after(crate::combat::advance_traces),
            )
                .chain(),
        );
    }
}

/// Spawn helper: enemy pursuit agent (можно застрелить)
pub fn spawn_pursuit_agent(commands: &mut Commands, position: Vec3, config: &PursuitConfig) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            PursuitAgent,
            PathAgent::from_config(config),
            Destructible,
        ))
        .id()
}
