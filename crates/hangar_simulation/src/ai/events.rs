//! AI events — detection volume callbacks от host engine

use bevy::prelude::*;

/// Кто-то вошёл в detection volume агента (host trigger → ECS)
///
/// `target` может быть любым collider'ом; pursuit принимает только
/// player rig.
#[derive(Event, Debug, Clone, Copy)]
pub struct TargetDetected {
    /// Entity наблюдателя (владелец detection volume)
    pub agent: Entity,
    /// Entity, которая вошла в volume
    pub target: Entity,
}
