use bevy_ecs::component::Component;
use bevy_ecs::query::Without;
use bevy_ecs::system::{Query, Res};
use glam::Vec2;

use crate::systems::components::{DeltaTime, WorldBounds};
use crate::systems::projectile::Projectile;

/// World-space position in pixels, `+Y` down.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Position(pub Vec2);

/// Pixels per second.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub Vec2);

impl Velocity {
    pub fn halt(&mut self) {
        self.0 = Vec2::ZERO;
    }
}

/// Integrates velocity and keeps bodies inside the world. Projectiles move on their own.
pub fn movement_system(
    delta_time: Res<DeltaTime>,
    bounds: Res<WorldBounds>,
    mut entities: Query<(&mut Position, &Velocity), Without<Projectile>>,
) {
    let dt = delta_time.seconds();
    for (mut position, velocity) in entities.iter_mut() {
        if velocity.0 == Vec2::ZERO {
            continue;
        }
        position.0 = bounds.clamp(position.0 + velocity.0 * dt);
    }
}
