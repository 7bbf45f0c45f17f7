//! Pursuit agent FSM
//!
//! Idle → Pursuing (detection volume поймал player rig)
//! Pursuing ↔ Engaging (по stopping distance path agent'а)
//!
//! Возврата в Idle нет: target запоминается навсегда. Единственный
//! выход — destruction агента (path agent выключается).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::EntityDestroyed;
use crate::components::{
    AnimationParams, Destroyed, PlayerRig, PARAM_GUN_PLAY, PARAM_PLAYER_FOUND,
};
use super::events::TargetDetected;

/// Pursuit FSM состояния
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum PursuitState {
    /// Ждём пока кто-то войдёт в detection volume
    #[default]
    Idle,
    /// Идём к target
    Pursuing,
    /// В радиусе stopping distance — смотрим на target, gun play
    Engaging,
}

/// Последняя известная цель
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PursuitTarget {
    pub entity: Option<Entity>,
    /// Обновляется каждый tick пока target entity существует
    pub position: Vec3,
}

impl PursuitTarget {
    pub fn is_present(&self) -> bool {
        self.entity.is_some()
    }
}

/// Path planner sink (NavMesh agent живёт в host engine)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PathAgent {
    pub enabled: bool,
    /// Engagement range
    pub stopping_distance: f32,
    pub destination: Option<Vec3>,
}

impl Default for PathAgent {
    fn default() -> Self {
        Self::from_config(&PursuitConfig::default())
    }
}

impl PathAgent {
    pub fn from_config(config: &PursuitConfig) -> Self {
        Self {
            enabled: true,
            stopping_distance: config.stopping_distance,
            destination: None,
        }
    }
}

/// Конфиг pursuit (serde — часть SimulationConfig)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PursuitConfig {
    pub stopping_distance: f32,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            stopping_distance: 10.0,
        }
    }
}

/// Маркер: enemy с pursuit behaviour
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(PursuitState, PursuitTarget, PathAgent, AnimationParams, Transform)]
pub struct PursuitAgent;

/// Pursuing или Engaging по дистанции до target
pub fn evaluate_pursuit(agent: Vec3, target: Vec3, stopping_distance: f32) -> PursuitState {
    if agent.distance(target) < stopping_distance {
        PursuitState::Engaging
    } else {
        PursuitState::Pursuing
    }
}

/// Точка для look-at без вертикального наклона (высота агента)
pub fn flat_look_target(agent: Vec3, target: Vec3) -> Vec3 {
    Vec3::new(target.x, agent.y, target.z)
}

/// System: TargetDetected → Pursuing (только player rig)
pub fn acquire_targets(
    mut detections: EventReader<TargetDetected>,
    mut agents: Query<
        (&mut PursuitState, &mut PursuitTarget, &mut AnimationParams),
        (With<PursuitAgent>, Without<Destroyed>),
    >,
    players: Query<&Transform, With<PlayerRig>>,
) {
    for detection in detections.read() {
        let Ok(target_transform) = players.get(detection.target) else {
            // Не player rig — игнор
            continue;
        };
        let Ok((mut state, mut target, mut animation)) = agents.get_mut(detection.agent) else {
            continue;
        };

        target.entity = Some(detection.target);
        target.position = target_transform.translation;
        animation.set_trigger(PARAM_PLAYER_FOUND);

        if *state == PursuitState::Idle {
            *state = PursuitState::Pursuing;
            crate::logger::log_info(&format!(
                "👁 Agent {:?} spotted player {:?}",
                detection.agent, detection.target
            ));
        }
    }
}

/// System: каждый tick — destination = target, look-at + gunPlay в радиусе
pub fn pursue_targets(
    mut agents: Query<
        (
            &mut PursuitState,
            &mut PursuitTarget,
            &mut PathAgent,
            &mut Transform,
            &mut AnimationParams,
        ),
        (With<PursuitAgent>, Without<Destroyed>),
    >,
    targets: Query<&Transform, Without<PursuitAgent>>,
) {
    for (mut state, mut target, mut path, mut transform, mut animation) in agents.iter_mut() {
        let Some(target_entity) = target.entity else {
            continue;
        };
        if !path.enabled {
            continue;
        }

        // Target пропал — идём к последней известной позиции
        if let Ok(target_transform) = targets.get(target_entity) {
            target.position = target_transform.translation;
        }

        path.destination = Some(target.position);

        let next = evaluate_pursuit(transform.translation, target.position, path.stopping_distance);
        if next == PursuitState::Engaging {
            let look = flat_look_target(transform.translation, target.position);
            if look.distance_squared(transform.translation) > f32::EPSILON {
                transform.look_at(look, Vec3::Y);
            }
        }
        animation.set_bool(PARAM_GUN_PLAY, next == PursuitState::Engaging);

        if *state != next {
            *state = next;
        }
    }
}

/// System: агент уничтожен → path agent выключен, pursuit остановлен
pub fn disable_destroyed_agents(
    mut destroyed: EventReader<EntityDestroyed>,
    mut agents: Query<&mut PathAgent, With<PursuitAgent>>,
) {
    for event in destroyed.read() {
        let Ok(mut path) = agents.get_mut(event.entity) else {
            continue;
        };

        path.enabled = false;
        path.destination = None;
        crate::logger::log(&format!("Agent {:?} path agent disabled", event.entity));
    }
}
