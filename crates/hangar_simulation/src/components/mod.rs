//! ECS Components, общие для нескольких доменов
//!
//! Организация:
//! - actor: rider (XR rig), player marker, destructible targets
//! - animation: animation parameter sink (host Animator читает)

pub mod actor;
pub mod animation;

// Re-exports для удобного импорта
pub use actor::*;
pub use animation::*;
