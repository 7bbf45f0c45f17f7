//! Physics collaborator layer
//!
//! Физику симулирует host engine (Rapier в production). Здесь только:
//! - `RayCaster` — интерфейс physics query provider
//! - ground probe + altitude gating (чистые функции)
//! - два provider'а: Rapier bridge и headless scene (тесты, headless runner)

pub mod ground;
pub mod headless;
pub mod rapier_bridge;
pub mod raycast;

// Re-export основных типов
pub use ground::{can_ascend, can_descend, probe_ground, GroundContact, GroundProbe, GROUND_PROBE_MARGIN};
pub use headless::{
    integrate_headless_bodies, GroundPlane, HeadlessPhysicsPlugin, HeadlessScene, SphereCollider,
    HEADLESS_GRAVITY,
};
pub use rapier_bridge::RapierBridgePlugin;
pub use raycast::{RayCaster, RayFilter, RayHit, UNBOUNDED_RANGE};
