//! Visual trace (bullet trail) — explicit state object
//!
//! Travelling: каждый frame `position = lerp(start, end, 1 - remaining / distance)`,
//! `remaining -= speed * dt`. Прибытие — position ровно `end`,
//! destruction notification (если есть target), дальше trail висит
//! `linger` секунд и деспавнится.

use bevy::prelude::*;

use crate::components::Destroyed;
use super::weapon::EntityDestroyed;

/// Фаза trace
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum TracePhase {
    Travelling,
    /// Прибыл, trail ещё виден (секунд осталось)
    Lingering(f32),
    Expired,
}

/// Результат одного шага
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraceStep {
    /// Новая позиция trail
    Travelling(Vec3),
    /// Прибыл в этот шаг (target для destruction notification)
    Arrived(Option<Entity>),
    Lingering,
    /// Trail пора деспавнить
    Expired,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Trace {
    pub weapon: Entity,
    pub start: Vec3,
    pub end: Vec3,
    pub distance: f32,
    /// Сколько пути осталось пройти
    pub remaining: f32,
    pub speed: f32,
    pub position: Vec3,
    pub target: Option<Entity>,
    pub linger: f32,
    pub phase: TracePhase,
}

impl Trace {
    pub fn new(
        weapon: Entity,
        start: Vec3,
        end: Vec3,
        speed: f32,
        linger: f32,
        target: Option<Entity>,
    ) -> Self {
        let distance = start.distance(end);
        Self {
            weapon,
            start,
            end,
            distance,
            remaining: distance,
            speed,
            position: start,
            target,
            linger,
            phase: TracePhase::Travelling,
        }
    }

    pub fn has_arrived(&self) -> bool {
        self.phase != TracePhase::Travelling
    }

    /// Один frame. `Arrived` возвращается ровно один раз за жизнь trace.
    pub fn advance(&mut self, delta: f32) -> TraceStep {
        match self.phase {
            TracePhase::Travelling => self.travel(delta),
            TracePhase::Lingering(left) => {
                let left = left - delta;
                if left > 0.0 {
                    self.phase = TracePhase::Lingering(left);
                    TraceStep::Lingering
                } else {
                    self.phase = TracePhase::Expired;
                    TraceStep::Expired
                }
            }
            TracePhase::Expired => TraceStep::Expired,
        }
    }

    fn travel(&mut self, delta: f32) -> TraceStep {
        // Нулевая дистанция или скорость — прибытие сразу
        if self.remaining > 0.0 && self.speed > 0.0 && self.distance > 0.0 {
            let t = 1.0 - self.remaining / self.distance;
            self.position = self.start.lerp(self.end, t);
            self.remaining -= self.speed * delta;

            if self.remaining > 0.0 {
                return TraceStep::Travelling(self.position);
            }
        }

        self.position = self.end;
        self.remaining = 0.0;
        self.phase = TracePhase::Lingering(self.linger);
        TraceStep::Arrived(self.target)
    }
}

/// System: продвинуть traces (Update, frame-rate)
pub fn advance_traces(
    mut commands: Commands,
    mut traces: Query<(Entity, &mut Trace, &mut Transform)>,
    time: Res<Time>,
    mut destroyed: EventWriter<EntityDestroyed>,
) {
    let delta = time.delta_secs();

    for (entity, mut trace, mut transform) in traces.iter_mut() {
        match trace.advance(delta) {
            TraceStep::Travelling(position) => {
                transform.translation = position;
            }
            TraceStep::Arrived(target) => {
                transform.translation = trace.end;
                if let Some(target) = target {
                    destroyed.write(EntityDestroyed {
                        entity: target,
                        weapon: trace.weapon,
                    });
                }
            }
            TraceStep::Lingering => {}
            TraceStep::Expired => {
                commands.entity(entity).despawn();
            }
        }
    }
}

/// System: EntityDestroyed → Destroyed marker
///
/// Target мог быть уже деспавнен host'ом — try_insert.
pub fn mark_destroyed(mut commands: Commands, mut destroyed: EventReader<EntityDestroyed>) {
    for event in destroyed.read() {
        let Ok(mut target) = commands.get_entity(event.entity) else {
            continue;
        };
        target.try_insert(Destroyed);
        crate::logger::log_info(&format!(
            "💀 Entity {:?} destroyed by weapon {:?}",
            event.entity, event.weapon
        ));
    }
}
