//! Held weapon aim: оружие в руке enemy повторяет rotation руки

use bevy::prelude::*;

/// Weapon держится рукой `hand`; `offset` — фиксированный доворот
/// модели оружия относительно кисти
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HeldWeaponAim {
    pub hand: Entity,
    pub offset: Quat,
}

impl HeldWeaponAim {
    pub fn new(hand: Entity, offset: Quat) -> Self {
        Self { hand, offset }
    }

    pub fn aim_rotation(&self, hand_rotation: Quat) -> Quat {
        hand_rotation * self.offset
    }
}

/// System: каждый frame rotation = hand.rotation * offset
pub fn update_held_weapon_aim(
    mut weapons: Query<(&HeldWeaponAim, &mut Transform)>,
    hands: Query<&Transform, Without<HeldWeaponAim>>,
) {
    for (aim, mut transform) in weapons.iter_mut() {
        let Ok(hand) = hands.get(aim.hand) else {
            continue;
        };

        transform.rotation = aim.aim_rotation(hand.rotation);
    }
}
