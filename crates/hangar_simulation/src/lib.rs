//! HANGAR Simulation Core
//!
//! ECS-симуляция на Bevy 0.16 (strategic layer): vehicles, hitscan
//! combat, pursuit AI.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = game state, vehicle FSM, motion model, combat rules, AI
//! - Host engine = physics step (Rapier), rendering, XR input, NavMesh, audio
//!
//! Физика подключается отдельным provider plugin'ом:
//! `RapierBridgePlugin` (production) или `HeadlessPhysicsPlugin`
//! (тесты, headless runner).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod physics;
pub mod scenario;
pub mod vehicle;

// Re-export базовых компонентов для удобства
pub use ai::{AIPlugin, PathAgent, PursuitAgent, PursuitState, PursuitTarget, TargetDetected};
pub use combat::{
    CombatPlugin, EntityDestroyed, FireRequest, HeldWeaponAim, HitResult, HitscanWeapon, Trace,
    WeaponFired, WeaponTrigger,
};
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use physics::{GroundContact, HeadlessPhysicsPlugin, RapierBridgePlugin, RayCaster};
pub use vehicle::{
    EnterVehicleRequest, ExitVehicleRequest, MotionConstants, VehicleEntered, VehicleExited,
    VehicleFireRequested, VehicleKind, VehicleMode, VehiclePlugin, VehicleState,
};

/// Фазы FixedUpdate tick (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Physics queries до решений (ground probe)
    Sensors,
    /// Input routing, vehicle FSM, fire requests
    Control,
    /// Physics provider резолвит ray casts
    Resolve,
    /// Реакция на результаты (traces, notifications)
    Effects,
    /// Motion model → force sink
    Motion,
}

/// Порядок SimulationSet в FixedUpdate (каждый plugin вызывает сам,
/// повторная конфигурация безвредна)
pub fn configure_simulation_sets(app: &mut App) {
    app.configure_sets(
        FixedUpdate,
        (
            SimulationSet::Sensors,
            SimulationSet::Control,
            SimulationSet::Resolve,
            SimulationSet::Effects,
            SimulationSet::Motion,
        )
            .chain(),
    );
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Physics provider не включён — добавляется отдельно.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep для simulation tick (default 50Hz)
            .insert_resource(Time::<Fixed>::from_hz(config.fixed_hz))
            .insert_resource(config)
            // Подсистемы (ECS strategic layer)
            .add_plugins((VehiclePlugin, CombatPlugin, AIPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Только MinimalPlugins + resources; SimulationPlugin и physics
/// provider добавляет вызывающий.
pub fn create_headless_app(seed: u64) -> App {
    create_headless_app_with_config(seed, SimulationConfig::default())
}

pub fn create_headless_app_with_config(seed: u64, config: SimulationConfig) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(config.fixed_hz))
        .insert_resource(config);

    app
}

/// Snapshot мира для сравнения детерминизма
///
/// Одна строка на entity с компонентом `T`, отсортировано по Entity index.
pub fn world_snapshot<T>(world: &mut World) -> Vec<String>
where
    T: Component + std::fmt::Debug,
{
    let mut query = world.query::<(Entity, &T)>();
    let mut entries: Vec<_> = query
        .iter(world)
        .map(|(entity, component)| (entity.index(), format!("{component:?}")))
        .collect();

    entries.sort_by_key(|(index, _)| *index);

    entries
        .into_iter()
        .map(|(index, component)| format!("{index}: {component}"))
        .collect()
}
