//! Tests for pursuit FSM.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use super::super::events::TargetDetected;
    use super::super::pursuit::*;
    use crate::combat::EntityDestroyed;
    use crate::components::{AnimationParams, PlayerRig, PARAM_GUN_PLAY, PARAM_PLAYER_FOUND};

    fn pursuit_app() -> App {
        let mut app = App::new();
        app.add_event::<TargetDetected>()
            .add_event::<EntityDestroyed>()
            .add_systems(
                Update,
                (acquire_targets, pursue_targets, disable_destroyed_agents).chain(),
            );
        app
    }

    fn spawn_agent(app: &mut App, position: Vec3) -> Entity {
        app.world_mut()
            .spawn((Transform::from_translation(position), PursuitAgent))
            .id()
    }

    #[test]
    fn test_evaluate_pursuit_threshold() {
        assert_eq!(evaluate_pursuit(Vec3::ZERO, Vec3::new(0.0, 0.0, 20.0), 10.0), PursuitState::Pursuing);
        assert_eq!(evaluate_pursuit(Vec3::ZERO, Vec3::new(0.0, 0.0, 9.9), 10.0), PursuitState::Engaging);
        // Ровно на границе — ещё Pursuing (strict <)
        assert_eq!(evaluate_pursuit(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 10.0), PursuitState::Pursuing);
    }

    #[test]
    fn test_flat_look_target_keeps_agent_height() {
        let look = flat_look_target(Vec3::new(1.0, 2.0, 3.0), Vec3::new(5.0, 9.0, -4.0));
        assert_eq!(look, Vec3::new(5.0, 2.0, -4.0));
    }

    #[test]
    fn test_non_player_detection_ignored() {
        let mut app = pursuit_app();
        let agent = spawn_agent(&mut app, Vec3::ZERO);
        let crate_prop = app.world_mut().spawn(Transform::from_xyz(0.0, 0.0, 5.0)).id();

        app.world_mut().send_event(TargetDetected {
            agent,
            target: crate_prop,
        });
        app.update();

        let world = app.world();
        assert_eq!(*world.get::<PursuitState>(agent).unwrap(), PursuitState::Idle);
        assert!(!world.get::<PursuitTarget>(agent).unwrap().is_present());
        assert_eq!(world.get::<PathAgent>(agent).unwrap().destination, None);
    }

    #[test]
    fn test_player_detection_starts_pursuit() {
        let mut app = pursuit_app();
        let agent = spawn_agent(&mut app, Vec3::ZERO);
        let player = app
            .world_mut()
            .spawn((Transform::from_xyz(0.0, 1.5, 30.0), PlayerRig))
            .id();

        app.world_mut().send_event(TargetDetected { agent, target: player });
        app.update();

        let world = app.world();
        assert_eq!(*world.get::<PursuitState>(agent).unwrap(), PursuitState::Pursuing);
        assert_eq!(
            world.get::<PathAgent>(agent).unwrap().destination,
            Some(Vec3::new(0.0, 1.5, 30.0))
        );

        let animation = world.get::<AnimationParams>(agent).unwrap();
        assert!(animation.has_trigger(PARAM_PLAYER_FOUND));
        assert!(!animation.get_bool(PARAM_GUN_PLAY));
    }

    #[test]
    fn test_repeated_detection_keeps_single_trigger() {
        let mut app = pursuit_app();
        let agent = spawn_agent(&mut app, Vec3::ZERO);
        let player = app
            .world_mut()
            .spawn((Transform::from_xyz(0.0, 0.0, 30.0), PlayerRig))
            .id();

        for _ in 0..500 {
            app.world_mut().send_event(TargetDetected { agent, target: player });
            app.update();
        }

        let mut animation = app.world_mut().get_mut::<AnimationParams>(agent).unwrap();
        assert_eq!(animation.take_triggers(), vec![PARAM_PLAYER_FOUND.to_string()]);
    }

    #[test]
    fn test_engaging_faces_target_and_tracks_movement() {
        let mut app = pursuit_app();
        let agent = spawn_agent(&mut app, Vec3::ZERO);
        let player = app
            .world_mut()
            .spawn((Transform::from_xyz(20.0, 3.0, 0.0), PlayerRig))
            .id();

        app.world_mut().send_event(TargetDetected { agent, target: player });
        app.update();
        assert_eq!(*app.world().get::<PursuitState>(agent).unwrap(), PursuitState::Pursuing);

        // Игрок подошёл в радиус stopping distance
        app.world_mut().get_mut::<Transform>(player).unwrap().translation = Vec3::new(5.0, 3.0, 0.0);
        app.update();

        let world = app.world();
        assert_eq!(*world.get::<PursuitState>(agent).unwrap(), PursuitState::Engaging);
        assert!(world.get::<AnimationParams>(agent).unwrap().get_bool(PARAM_GUN_PLAY));
        assert_eq!(
            world.get::<PathAgent>(agent).unwrap().destination,
            Some(Vec3::new(5.0, 3.0, 0.0))
        );

        // Forward агента смотрит на игрока в горизонтальной плоскости
        let forward = world.get::<Transform>(agent).unwrap().forward();
        assert!((forward.as_vec3() - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn test_target_lost_keeps_pursuing_last_position() {
        let mut app = pursuit_app();
        let agent = spawn_agent(&mut app, Vec3::ZERO);
        let player = app
            .world_mut()
            .spawn((Transform::from_xyz(0.0, 0.0, 40.0), PlayerRig))
            .id();

        app.world_mut().send_event(TargetDetected { agent, target: player });
        app.update();
        app.world_mut().despawn(player);
        app.update();

        let world = app.world();
        assert_eq!(*world.get::<PursuitState>(agent).unwrap(), PursuitState::Pursuing);
        assert_eq!(
            world.get::<PathAgent>(agent).unwrap().destination,
            Some(Vec3::new(0.0, 0.0, 40.0))
        );
    }

    #[test]
    fn test_destroyed_agent_stops_pursuit() {
        let mut app = pursuit_app();
        let agent = spawn_agent(&mut app, Vec3::ZERO);
        let player = app
            .world_mut()
            .spawn((Transform::from_xyz(0.0, 0.0, 40.0), PlayerRig))
            .id();

        app.world_mut().send_event(TargetDetected { agent, target: player });
        app.update();

        app.world_mut().send_event(EntityDestroyed {
            entity: agent,
            weapon: Entity::PLACEHOLDER,
        });
        app.update();

        app.world_mut().get_mut::<Transform>(player).unwrap().translation = Vec3::new(0.0, 0.0, 2.0);
        app.update();

        let path = app.world().get::<PathAgent>(agent).unwrap();
        assert!(!path.enabled);
        assert_eq!(path.destination, None);
        assert_eq!(*app.world().get::<PursuitState>(agent).unwrap(), PursuitState::Pursuing);
    }
}
