//! Rapier bridge — production physics query provider
//!
//! Rapier (host) владеет simulation step. Bridge только:
//! - ground probe для vehicles (`GroundContact`)
//! - resolve `HitscanIntent` → `HitscanResolved`
//!
//! Force sink (`ExternalForce`), gravity flag (`GravityScale`) и velocity
//! (`Velocity`) — обычные Rapier компоненты, vehicle системы пишут их
//! напрямую. `RapierPhysicsPlugin` добавляет host, не этот plugin.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::ground::{probe_ground, GroundContact, GroundProbe};
use super::raycast::{RayCaster, RayFilter, RayHit};
use crate::combat::{resolve_hitscan_intents, HitscanIntent, HitscanResolved};
use crate::SimulationSet;

impl RayCaster for RapierContext<'_> {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: RayFilter,
    ) -> Option<RayHit> {
        let mut query_filter = QueryFilter::default();
        if filter.ignore_triggers {
            query_filter = query_filter.exclude_sensors();
        }
        if let Some(entity) = filter.exclude {
            query_filter = query_filter.exclude_rigid_body(entity);
        }

        self.with_query_pipeline(query_filter, |pipeline| {
            pipeline.cast_ray_and_get_normal(origin, direction, max_distance, true)
        })
        .map(|(entity, intersection)| RayHit {
            entity: Some(entity),
            point: intersection.point,
            distance: intersection.time_of_impact,
        })
    }
}

/// System: ground probe через Rapier query pipeline
pub fn sense_ground_rapier(
    rapier_context: ReadRapierContext,
    mut vehicles: Query<(Entity, &Transform, &GroundProbe, &mut GroundContact)>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    for (entity, transform, probe, mut contact) in vehicles.iter_mut() {
        let grounded = probe_ground(&context, transform.translation, probe, entity);
        if contact.grounded != grounded {
            contact.grounded = grounded;
        }
    }
}

/// System: hitscan intents → Rapier ray cast
///
/// Без Rapier context все выстрелы резолвятся как промахи
/// (intent не должен зависнуть — cooldown уже запущен).
pub fn resolve_hitscan_rapier(
    rapier_context: ReadRapierContext,
    mut intents: EventReader<HitscanIntent>,
    mut resolved: EventWriter<HitscanResolved>,
) {
    if intents.is_empty() {
        return;
    }

    let context = rapier_context.single().ok();
    if context.is_none() {
        crate::logger::log_warning("resolve_hitscan_rapier: RapierContext не найден, выстрелы = промахи");
    }

    resolve_hitscan_intents(context.as_ref(), &mut intents, &mut resolved);
}

/// Production physics provider (Rapier)
pub struct RapierBridgePlugin;

impl Plugin for RapierBridgePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HitscanIntent>()
            .add_event::<HitscanResolved>();

        crate::configure_simulation_sets(app);

        app.add_systems(
            FixedUpdate,
            (
                sense_ground_rapier.in_set(SimulationSet::Sensors),
                resolve_hitscan_rapier.in_set(SimulationSet::Resolve),
            ),
        );
    }
}
