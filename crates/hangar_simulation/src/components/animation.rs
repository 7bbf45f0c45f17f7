//! Animation parameter sink
//!
//! ECS пишет bool/trigger параметры по имени, host Animator читает
//! и применяет (blending — ответственность host engine).

use bevy::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Имена параметров, которые пишет симуляция
pub const PARAM_USE_AIR: &str = "useAir";
pub const PARAM_GUN_PLAY: &str = "gunPlay";
pub const PARAM_PLAYER_FOUND: &str = "playerFound";

#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct AnimationParams {
    bools: BTreeMap<String, bool>,
    /// Triggers, которые host ещё не забрал (повторный set — тот же trigger)
    pending_triggers: BTreeSet<String>,
}

impl AnimationParams {
    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.bools.insert(name.to_string(), value);
    }

    /// Значение bool параметра (`false` если ни разу не писали)
    pub fn get_bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    pub fn set_trigger(&mut self, name: &str) {
        self.pending_triggers.insert(name.to_string());
    }

    pub fn has_trigger(&self, name: &str) -> bool {
        self.pending_triggers.contains(name)
    }

    /// Host забирает triggers (consumed один раз)
    pub fn take_triggers(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_triggers).into_iter().collect()
    }
}
