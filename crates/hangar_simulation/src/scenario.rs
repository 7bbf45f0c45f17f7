//! Scripted headless scenario
//!
//! Сцена: player rig, aircraft, tank, оружие в руке игрока, enemy с
//! pursuit AI и оружием в руке. Input скриптуется по номеру frame'а,
//! frame time — base + seeded jitter (ChaCha8), поэтому один и тот же
//! seed даёт побитово одинаковый результат.
//!
//! Сценарий:
//! 1. Enemy замечает игрока
//! 2. Игрок стреляет в enemy (trace летит ~2s → EntityDestroyed)
//! 3. Игрок садится в aircraft, взлетает, летит, пробует выйти в воздухе
//!    (игнор), садится, выходит
//! 4. Игрок садится в tank, едет, жмёт fire, выходит

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::Rng;

use crate::ai::{spawn_pursuit_agent, TargetDetected};
use crate::combat::{spawn_hitscan_weapon, EntityDestroyed, HeldWeaponAim, WeaponFired, WeaponTrigger};
use crate::components::{spawn_player_rig, RiderInput};
use crate::physics::{HeadlessPhysicsPlugin, SphereCollider};
use crate::vehicle::{
    spawn_aircraft, spawn_tank, EnterVehicleRequest, VehicleEntered, VehicleExited,
    VehicleFireRequested, VehicleState,
};
use crate::{
    create_headless_app_with_config, world_snapshot, DeterministicRng, SimulationConfig,
    SimulationPlugin,
};

/// Frames по умолчанию (~10s при 60 FPS)
pub const SCENARIO_FRAMES: usize = 600;
/// Базовый frame time (60 FPS)
pub const BASE_FRAME_SECS: f32 = 1.0 / 60.0;
/// Максимальный jitter frame time (±)
pub const MAX_FRAME_JITTER_SECS: f32 = 0.004;

/// Entities сцены
#[derive(Debug, Clone, Copy)]
pub struct ScenarioEntities {
    pub player: Entity,
    pub aircraft: Entity,
    pub tank: Entity,
    pub player_weapon: Entity,
    pub enemy: Entity,
    pub enemy_hand: Entity,
    pub enemy_weapon: Entity,
}

/// Журнал событий сценария (собирается в PostUpdate)
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ScenarioLog {
    pub lines: Vec<String>,
    pub entered: usize,
    pub exited: usize,
    pub shots: usize,
    pub destroyed: usize,
    pub vehicle_fire_requests: usize,
}

/// Итог прогона
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub seed: u64,
    pub frames: usize,
    pub log: ScenarioLog,
    /// Transform всех entities (сортировка по index)
    pub snapshot: Vec<String>,
}

fn record_scenario_events(
    mut log: ResMut<ScenarioLog>,
    mut entered: EventReader<VehicleEntered>,
    mut exited: EventReader<VehicleExited>,
    mut fired: EventReader<WeaponFired>,
    mut destroyed: EventReader<EntityDestroyed>,
    mut fire_requests: EventReader<VehicleFireRequested>,
) {
    for event in entered.read() {
        log.entered += 1;
        log.lines
            .push(format!("entered {:?} {:?} by {:?}", event.kind, event.vehicle, event.rider));
    }
    for event in exited.read() {
        log.exited += 1;
        log.lines
            .push(format!("exited {:?} {:?} by {:?}", event.kind, event.vehicle, event.rider));
    }
    for event in fired.read() {
        log.shots += 1;
        log.lines.push(format!(
            "fired {:?}: hit={} point={:?} target={:?}",
            event.weapon, event.result.hit, event.result.point, event.result.target
        ));
    }
    for event in destroyed.read() {
        log.destroyed += 1;
        log.lines
            .push(format!("destroyed {:?} by {:?}", event.entity, event.weapon));
    }
    for event in fire_requests.read() {
        log.vehicle_fire_requests += 1;
        log.lines.push(format!("vehicle fire {:?}", event.vehicle));
    }
}

/// Headless app со всеми plugins + заспавненная сцена
pub fn build_scenario_app(seed: u64, config: SimulationConfig) -> (App, ScenarioEntities) {
    let mut app = create_headless_app_with_config(seed, config.clone());
    app.add_plugins((SimulationPlugin, HeadlessPhysicsPlugin))
        .init_resource::<ScenarioLog>()
        .add_systems(PostUpdate, record_scenario_events);

    let world = app.world_mut();
    let mut commands = world.commands();

    let player = spawn_player_rig(&mut commands, Vec3::new(4.0, 0.0, 0.0));
    let aircraft = spawn_aircraft(
        &mut commands,
        Vec3::new(0.0, 1.0, 8.0),
        Vec3::new(1.5, 1.0, 2.5),
        config.aircraft,
    );
    let tank = spawn_tank(
        &mut commands,
        Vec3::new(12.0, 1.0, 0.0),
        Vec3::new(1.5, 1.0, 3.0),
        config.tank,
    );

    // Оружие игрока смотрит на enemy
    let muzzle = Transform::from_xyz(4.0, 1.5, 0.0).looking_at(Vec3::new(4.0, 1.5, -40.0), Vec3::Y);
    let player_weapon = spawn_hitscan_weapon(&mut commands, muzzle, &config.weapon);
    commands.entity(player_weapon).insert(WeaponTrigger {
        held: true,
        pressed: false,
    });

    let enemy = spawn_pursuit_agent(&mut commands, Vec3::new(4.0, 1.5, -40.0), &config.pursuit);
    commands.entity(enemy).insert(SphereCollider::solid(0.5));

    let enemy_hand = commands
        .spawn(Transform::from_xyz(4.5, 1.2, -39.6))
        .id();
    let enemy_weapon = commands
        .spawn((
            Transform::from_xyz(4.5, 1.2, -39.6),
            HeldWeaponAim::new(enemy_hand, Quat::from_rotation_x(-0.1)),
        ))
        .id();

    world.flush();

    let entities = ScenarioEntities {
        player,
        aircraft,
        tank,
        player_weapon,
        enemy,
        enemy_hand,
        enemy_weapon,
    };
    (app, entities)
}

/// Скрипт input'а на конкретный frame
fn script_frame(app: &mut App, entities: &ScenarioEntities, frame: usize) {
    let world = app.world_mut();

    match frame {
        5 => {
            world.send_event(TargetDetected {
                agent: entities.enemy,
                target: entities.player,
            });
        }
        10 => {
            world.send_event(EnterVehicleRequest {
                vehicle: entities.aircraft,
                rider: entities.player,
            });
        }
        470 => {
            world.send_event(EnterVehicleRequest {
                vehicle: entities.tank,
                rider: entities.player,
            });
        }
        _ => {}
    }

    if let Some(mut trigger) = world.get_mut::<WeaponTrigger>(entities.player_weapon) {
        trigger.pressed = (50..56).contains(&frame);
    }

    if let Some(mut hand) = world.get_mut::<Transform>(entities.enemy_hand) {
        hand.rotation = Quat::from_rotation_y(frame as f32 * 0.01);
    }

    let Some(mut input) = world.get_mut::<RiderInput>(entities.player) else {
        return;
    };

    let (move_axis, lift) = match frame {
        // Aircraft: взлёт → полёт → снижение
        20..140 => (Vec2::ZERO, 1.0),
        140..240 => (Vec2::new(0.5, 1.0), 0.0),
        250..450 => (Vec2::ZERO, -1.0),
        // Tank: вперёд
        480..540 => (Vec2::new(0.0, 1.0), 0.0),
        _ => (Vec2::ZERO, 0.0),
    };
    input.move_axis = move_axis;
    input.lift_axis = Vec2::new(0.0, lift);

    // Кнопки держим несколько frames — fixed tick (20ms) длиннее frame
    input.exit_pressed = (240..243).contains(&frame)
        || (460..463).contains(&frame)
        || (545..548).contains(&frame);
    input.fire_pressed = (500..503).contains(&frame);
}

/// Следующий frame time: base + seeded jitter
fn next_frame_time(app: &mut App) -> Duration {
    let jitter = app
        .world_mut()
        .resource_mut::<DeterministicRng>()
        .rng
        .gen_range(-MAX_FRAME_JITTER_SECS..MAX_FRAME_JITTER_SECS);
    Duration::from_secs_f32(BASE_FRAME_SECS + jitter)
}

/// Прогнать сценарий `frames` frames
pub fn run_scenario(seed: u64, frames: usize, config: SimulationConfig) -> ScenarioReport {
    let (mut app, entities) = build_scenario_app(seed, config);

    for frame in 0..frames {
        script_frame(&mut app, &entities, frame);

        let frame_time = next_frame_time(&mut app);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(frame_time));
        app.update();

        if frame % 100 == 0 {
            let world = app.world();
            let mode = world
                .get::<VehicleState>(entities.aircraft)
                .map(|state| state.mode);
            crate::logger::log(&format!(
                "Frame {}: {} entities, aircraft {:?}",
                frame,
                world.entities().len(),
                mode
            ));
        }
    }

    let log = app.world().resource::<ScenarioLog>().clone();
    let snapshot = world_snapshot::<Transform>(app.world_mut());

    ScenarioReport {
        seed,
        frames,
        log,
        snapshot,
    }
}
