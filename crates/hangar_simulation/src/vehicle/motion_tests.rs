//! Tests for force-based motion model.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use super::super::motion::*;
    use super::super::state::{EnginePitch, VehicleKind, VehicleState};
    use bevy_rapier3d::prelude::Velocity;

    const DT: f32 = 0.02;

    fn input(lateral: f32, longitudinal: f32, vertical: f32) -> MotionInput {
        MotionInput {
            lateral,
            longitudinal,
            vertical,
        }
    }

    #[test]
    fn test_dead_zone_input_produces_no_update() {
        let constants = MotionConstants::tank();
        let heading = Heading { yaw_degrees: 15.0 };

        for sample in [
            input(0.0, 0.0, 0.0),
            input(0.05, 0.05, 0.0),
            input(-0.07, 0.07, 0.0),
            input(0.0, -0.099, 0.0),
        ] {
            assert!(plan_drive(&sample, &constants, heading, DT).is_none());

            let plan = plan_motion(&VehicleKind::Tank.policy(), &sample, &constants, heading, true, 0.0, DT);
            assert_eq!(plan, MotionPlan::IDLE);
        }
    }

    #[test]
    fn test_forward_input_pushes_along_heading() {
        let constants = MotionConstants::tank();
        let (yaw, force) = plan_drive(&input(0.0, 1.0, 0.0), &constants, Heading::default(), DT)
            .expect("forward input is above dead zone");

        assert_eq!(yaw, 0.0);
        assert!((force - Vec3::new(0.0, 0.0, constants.move_speed)).length() < 1e-5);
    }

    #[test]
    fn test_lateral_input_accumulates_yaw() {
        let constants = MotionConstants::tank();
        let heading = Heading { yaw_degrees: 10.0 };
        let (yaw, _) = plan_drive(&input(1.0, 0.0, 0.0), &constants, heading, DT).unwrap();

        assert!((yaw - (10.0 + constants.rotate_speed * DT)).abs() < 1e-5);
    }

    #[test]
    fn test_force_rotates_with_heading() {
        let constants = MotionConstants::tank();
        // rotate_speed = 0 → yaw не меняется, проверяем чистый поворот вектора
        let constants = MotionConstants {
            rotate_speed: 0.0,
            ..constants
        };
        let heading = Heading { yaw_degrees: 90.0 };
        let (_, force) = plan_drive(&input(0.0, 1.0, 0.0), &constants, heading, DT).unwrap();

        // Forward (+Z) повёрнутый на 90° вокруг Y → +X
        assert!((force - Vec3::new(constants.move_speed, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_aircraft_cannot_drive_on_ground() {
        let policy = VehicleKind::Aircraft.policy();
        let constants = MotionConstants::aircraft();
        let plan = plan_motion(&policy, &input(1.0, 1.0, 0.0), &constants, Heading::default(), true, 0.0, DT);

        assert_eq!(plan, MotionPlan::IDLE);

        let airborne = plan_motion(&policy, &input(1.0, 1.0, 0.0), &constants, Heading::default(), false, 10.0, DT);
        assert!(airborne.yaw_degrees.is_some());
        assert_ne!(airborne.force, Vec3::ZERO);
    }

    #[test]
    fn test_lift_gating() {
        let constants = MotionConstants::aircraft();

        // Спуск на земле подавлен
        assert!(plan_lift(&input(0.0, 0.0, -1.0), &constants, true, 0.0).is_none());
        // Подъём с земли разрешён
        assert_eq!(
            plan_lift(&input(0.0, 0.0, 1.0), &constants, true, 0.0),
            Some(Vec3::new(0.0, constants.lift_speed, 0.0))
        );
        // Подъём на потолке подавлен, чуть ниже — разрешён
        assert!(plan_lift(&input(0.0, 0.0, 1.0), &constants, false, constants.max_altitude).is_none());
        assert!(plan_lift(&input(0.0, 0.0, 1.0), &constants, false, constants.max_altitude - 0.001).is_some());
        // Спуск с потолка разрешён
        assert!(plan_lift(&input(0.0, 0.0, -1.0), &constants, false, constants.max_altitude).is_some());
    }

    #[test]
    fn test_tank_ignores_vertical_input() {
        let plan = plan_motion(
            &VehicleKind::Tank.policy(),
            &input(0.0, 0.0, 1.0),
            &MotionConstants::tank(),
            Heading::default(),
            true,
            0.0,
            DT,
        );
        assert_eq!(plan, MotionPlan::IDLE);
    }

    #[test]
    fn test_lift_adds_to_drive_force() {
        let constants = MotionConstants::aircraft();
        let plan = plan_motion(
            &VehicleKind::Aircraft.policy(),
            &input(0.0, 1.0, 1.0),
            &constants,
            Heading::default(),
            false,
            5.0,
            DT,
        );

        let expected = Vec3::new(0.0, constants.lift_speed, constants.move_speed);
        assert!((plan.force - expected).length() < 1e-5);
    }

    #[test]
    fn test_engine_pitch_clamped() {
        assert_eq!(engine_pitch(Vec3::ZERO), 1.0);
        assert!((engine_pitch(Vec3::new(1.1, 0.0, 0.0)) - 1.21).abs() < 1e-5);
        assert_eq!(engine_pitch(Vec3::new(10.0, 0.0, 0.0)), 1.3);
    }

    #[test]
    fn test_engine_pitch_updates_only_while_piloted() {
        let mut app = App::new();
        app.add_systems(Update, update_engine_pitch);

        let velocity = Velocity::linear(Vec3::new(1.1, 0.0, 0.0));
        let empty = app
            .world_mut()
            .spawn((VehicleState::new(VehicleKind::Tank), velocity, EnginePitch::default()))
            .id();
        let mut piloted_state = VehicleState::new(VehicleKind::Tank);
        let rider = app.world_mut().spawn_empty().id();
        assert!(piloted_state.try_enter(rider));
        let piloted = app
            .world_mut()
            .spawn((piloted_state, velocity, EnginePitch::default()))
            .id();

        app.update();

        assert_eq!(app.world().get::<EnginePitch>(empty).unwrap().0, 1.0);
        assert!((app.world().get::<EnginePitch>(piloted).unwrap().0 - 1.21).abs() < 1e-5);
    }
}
