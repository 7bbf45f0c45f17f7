//! Headless physics query provider
//!
//! Без Rapier: ground plane (y = height) + sphere colliders.
//! Используется headless runner'ом и тестами — тот же `RayCaster`
//! контракт, что и у Rapier bridge.
//!
//! Плюс простая интеграция ExternalForce → Velocity → Transform
//! (unit mass, linear damping, пол = ground plane).

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ExternalForce, GravityScale, RigidBody, Velocity};

use super::ground::{probe_ground, GroundContact, GroundProbe};
use super::raycast::{RayCaster, RayFilter, RayHit};
use crate::combat::{resolve_hitscan_intents, HitscanIntent, HitscanResolved};
use crate::SimulationSet;

/// Бесконечная горизонтальная плоскость земли
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct GroundPlane {
    pub height: f32,
}

/// Sphere collider (центр = Transform.translation)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct SphereCollider {
    pub radius: f32,
    /// Trigger-only (detection volume) — hitscan его игнорирует
    pub is_trigger: bool,
}

impl SphereCollider {
    pub fn solid(radius: f32) -> Self {
        Self {
            radius,
            is_trigger: false,
        }
    }

    pub fn trigger(radius: f32) -> Self {
        Self {
            radius,
            is_trigger: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SceneSphere {
    entity: Entity,
    center: Vec3,
    radius: f32,
    is_trigger: bool,
}

/// Snapshot сцены на момент query
#[derive(Debug, Clone, Default)]
pub struct HeadlessScene {
    ground_height: Option<f32>,
    spheres: Vec<SceneSphere>,
}

impl HeadlessScene {
    pub fn new(ground_height: Option<f32>) -> Self {
        Self {
            ground_height,
            spheres: Vec::new(),
        }
    }

    pub fn with_sphere(mut self, entity: Entity, center: Vec3, collider: SphereCollider) -> Self {
        self.push_sphere(entity, center, collider);
        self
    }

    pub fn push_sphere(&mut self, entity: Entity, center: Vec3, collider: SphereCollider) {
        self.spheres.push(SceneSphere {
            entity,
            center,
            radius: collider.radius,
            is_trigger: collider.is_trigger,
        });
    }

    fn from_world<'a>(
        ground: Option<&GroundPlane>,
        spheres: impl Iterator<Item = (Entity, &'a Transform, &'a SphereCollider)>,
    ) -> Self {
        let mut scene = Self::new(ground.map(|plane| plane.height));
        for (entity, transform, collider) in spheres {
            scene.push_sphere(entity, transform.translation, *collider);
        }
        scene
    }

    fn ground_hit(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        let height = self.ground_height?;
        if direction.y >= 0.0 || origin.y < height {
            return None;
        }

        let distance = (origin.y - height) / -direction.y;
        Some(RayHit {
            entity: None,
            point: origin + direction * distance,
            distance,
        })
    }

    /// Ray/sphere: ближайшее пересечение снаружи сферы
    ///
    /// Origin внутри сферы → попадания нет (collider "изнутри" не виден).
    fn sphere_hit(sphere: &SceneSphere, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        let offset = origin - sphere.center;
        let c = offset.length_squared() - sphere.radius * sphere.radius;
        if c <= 0.0 {
            return None;
        }

        let b = offset.dot(direction);
        let discriminant = b * b - c;
        if b > 0.0 || discriminant < 0.0 {
            return None;
        }

        let distance = -b - discriminant.sqrt();
        Some(RayHit {
            entity: Some(sphere.entity),
            point: origin + direction * distance,
            distance,
        })
    }
}

impl RayCaster for HeadlessScene {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: RayFilter,
    ) -> Option<RayHit> {
        let sphere_hits = self
            .spheres
            .iter()
            .filter(|sphere| !(filter.ignore_triggers && sphere.is_trigger))
            .filter(|sphere| filter.exclude != Some(sphere.entity))
            .filter_map(|sphere| Self::sphere_hit(sphere, origin, direction));

        sphere_hits
            .chain(self.ground_hit(origin, direction))
            .filter(|hit| hit.distance <= max_distance)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// System: ground probe через headless сцену
pub fn sense_ground_headless(
    ground: Option<Res<GroundPlane>>,
    colliders: Query<(Entity, &Transform, &SphereCollider)>,
    mut vehicles: Query<(Entity, &Transform, &GroundProbe, &mut GroundContact)>,
) {
    let scene = HeadlessScene::from_world(ground.as_deref(), colliders.iter());

    for (entity, transform, probe, mut contact) in vehicles.iter_mut() {
        let grounded = probe_ground(&scene, transform.translation, probe, entity);
        if contact.grounded != grounded {
            contact.grounded = grounded;
        }
    }
}

/// System: hitscan intents → ray cast через headless сцену
pub fn resolve_hitscan_headless(
    ground: Option<Res<GroundPlane>>,
    colliders: Query<(Entity, &Transform, &SphereCollider)>,
    mut intents: EventReader<HitscanIntent>,
    mut resolved: EventWriter<HitscanResolved>,
) {
    if intents.is_empty() {
        return;
    }

    let scene = HeadlessScene::from_world(ground.as_deref(), colliders.iter());
    resolve_hitscan_intents(Some(&scene), &mut intents, &mut resolved);
}

/// Ускорение свободного падения (m/s²)
pub const HEADLESS_GRAVITY: f32 = -9.81;
/// Linear damping, чтобы тело без тяги останавливалось
pub const HEADLESS_LINEAR_DAMPING: f32 = 1.0;

/// System: ExternalForce + gravity → velocity → position (headless режим)
///
/// Тело не проваливается ниже `ground + half_height`.
pub fn integrate_headless_bodies(
    ground: Option<Res<GroundPlane>>,
    mut bodies: Query<
        (
            &ExternalForce,
            Option<&GravityScale>,
            &GroundProbe,
            &mut Velocity,
            &mut Transform,
        ),
        With<RigidBody>,
    >,
    time: Res<Time>,
) {
    let delta = time.delta_secs();
    let ground_height = ground.map(|plane| plane.height);

    for (force, gravity_scale, probe, mut velocity, mut transform) in bodies.iter_mut() {
        let gravity = HEADLESS_GRAVITY * gravity_scale.map_or(1.0, |scale| scale.0);
        let acceleration = force.force + Vec3::Y * gravity;

        velocity.linvel += acceleration * delta;
        velocity.linvel /= 1.0 + delta * HEADLESS_LINEAR_DAMPING;
        transform.translation += velocity.linvel * delta;

        if let Some(height) = ground_height {
            let floor = height + probe.half_height;
            if transform.translation.y < floor {
                transform.translation.y = floor;
                velocity.linvel.y = velocity.linvel.y.max(0.0);
            }
        }
    }
}

/// Headless physics provider (без Rapier)
pub struct HeadlessPhysicsPlugin;

impl Plugin for HeadlessPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GroundPlane>()
            .add_event::<HitscanIntent>()
            .add_event::<HitscanResolved>();

        crate::configure_simulation_sets(app);

        app.add_systems(
            FixedUpdate,
            (
                sense_ground_headless.in_set(SimulationSet::Sensors),
                resolve_hitscan_headless.in_set(SimulationSet::Resolve),
                integrate_headless_bodies.after(SimulationSet::Motion),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::UNBOUNDED_RANGE;

    #[test]
    fn test_ray_hits_nearest_sphere() {
        let near = Entity::from_raw(1);
        let far = Entity::from_raw(2);
        let scene = HeadlessScene::new(None)
            .with_sphere(far, Vec3::new(0.0, 0.0, 20.0), SphereCollider::solid(1.0))
            .with_sphere(near, Vec3::new(0.0, 0.0, 10.0), SphereCollider::solid(1.0));

        let hit = scene
            .cast_ray(Vec3::ZERO, Vec3::Z, UNBOUNDED_RANGE, RayFilter::solid_only())
            .expect("ray should hit");

        assert_eq!(hit.entity, Some(near));
        assert!((hit.point - Vec3::new(0.0, 0.0, 9.0)).length() < 1e-4);
        assert!((hit.distance - 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_triggers_ignored_when_filtered() {
        let volume = Entity::from_raw(3);
        let scene = HeadlessScene::new(None)
            .with_sphere(volume, Vec3::new(0.0, 0.0, 5.0), SphereCollider::trigger(2.0));

        assert!(scene
            .cast_ray(Vec3::ZERO, Vec3::Z, UNBOUNDED_RANGE, RayFilter::solid_only())
            .is_none());
        assert!(scene
            .cast_ray(Vec3::ZERO, Vec3::Z, UNBOUNDED_RANGE, RayFilter::default())
            .is_some());
    }

    #[test]
    fn test_excluded_entity_and_spheres_behind_are_skipped() {
        let own = Entity::from_raw(4);
        let behind = Entity::from_raw(5);
        let scene = HeadlessScene::new(None)
            .with_sphere(own, Vec3::new(0.0, 0.0, 3.0), SphereCollider::solid(1.0))
            .with_sphere(behind, Vec3::new(0.0, 0.0, -10.0), SphereCollider::solid(1.0));

        let filter = RayFilter::solid_only().excluding(own);
        assert!(scene.cast_ray(Vec3::ZERO, Vec3::Z, UNBOUNDED_RANGE, filter).is_none());
    }

    #[test]
    fn test_integration_rests_on_ground_and_lifts_off() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<GroundPlane>()
            .add_systems(Update, integrate_headless_bodies);

        let body = app
            .world_mut()
            .spawn((
                Transform::from_xyz(0.0, 2.0, 0.0),
                GroundProbe { half_height: 1.0 },
                ExternalForce::default(),
                GravityScale(1.0),
                Velocity::default(),
                RigidBody::Dynamic,
            ))
            .id();

        for _ in 0..100 {
            app.world_mut()
                .resource_mut::<Time>()
                .advance_by(std::time::Duration::from_millis(20));
            app.world_mut().run_schedule(Update);
        }
        let rest = app.world().get::<Transform>(body).unwrap().translation.y;
        assert!((rest - 1.0).abs() < 1e-4, "body should rest on ground, y = {rest}");

        app.world_mut().get_mut::<GravityScale>(body).unwrap().0 = 0.0;
        app.world_mut().get_mut::<ExternalForce>(body).unwrap().force = Vec3::Y * 12.0;
        for _ in 0..50 {
            app.world_mut()
                .resource_mut::<Time>()
                .advance_by(std::time::Duration::from_millis(20));
            app.world_mut().run_schedule(Update);
        }
        assert!(app.world().get::<Transform>(body).unwrap().translation.y > 2.0);
    }

    #[test]
    fn test_ground_plane_respects_max_distance() {
        let scene = HeadlessScene::new(Some(0.0));

        let hit = scene.cast_ray(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y, 3.0, RayFilter::default());
        assert_eq!(hit.map(|h| h.entity), Some(None));

        let miss = scene.cast_ray(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y, 3.0, RayFilter::default());
        assert!(miss.is_none());

        // Луч вверх землю не видит
        let up = scene.cast_ray(Vec3::new(0.0, 2.0, 0.0), Vec3::Y, 100.0, RayFilter::default());
        assert!(up.is_none());
    }
}
