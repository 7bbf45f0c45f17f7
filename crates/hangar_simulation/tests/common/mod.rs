//! Общие helpers для headless integration тестов

#![allow(dead_code)]

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use hangar_simulation::*;

/// Один frame = ровно один FixedUpdate tick (50Hz)
pub const FIXED_STEP: Duration = Duration::from_millis(20);

/// Все события типа `E`, прочитанные за тест
#[derive(Resource)]
pub struct Recorded<E: Event>(pub Vec<E>);

impl<E: Event> Default for Recorded<E> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

fn record<E: Event + Clone>(mut reader: EventReader<E>, mut recorded: ResMut<Recorded<E>>) {
    recorded.0.extend(reader.read().cloned());
}

pub fn record_events<E: Event + Clone>(app: &mut App) {
    app.init_resource::<Recorded<E>>()
        .add_systems(PostUpdate, record::<E>);
}

pub fn recorded<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world().resource::<Recorded<E>>().0.clone()
}

/// Headless app: SimulationPlugin + HeadlessPhysicsPlugin, ручное время
pub fn simulation_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins((SimulationPlugin, HeadlessPhysicsPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(FIXED_STEP));

    // Первый update — нулевой delta
    app.update();
    app
}

/// Spawn через Commands + немедленный flush
pub fn spawn_with<R>(app: &mut App, spawn: impl FnOnce(&mut Commands) -> R) -> R {
    let world = app.world_mut();
    let mut commands = world.commands();
    let result = spawn(&mut commands);
    world.flush();
    result
}

pub fn step(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

pub fn get<T: Component + Clone>(app: &App, entity: Entity) -> T {
    app.world()
        .get::<T>(entity)
        .cloned()
        .unwrap_or_else(|| panic!("{entity:?} has no {}", std::any::type_name::<T>()))
}
