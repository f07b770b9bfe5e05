use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;
use bevy_ecs::event::EventWriter;
use bevy_ecs::query::{With, Without};
use bevy_ecs::system::{Commands, Query, Res};
use glam::Vec2;
use tracing::trace;

use crate::config::ProjectileConfig;
use crate::systems::combat::DamageRequest;
use crate::systems::components::{Collider, CollisionLayer, DeltaTime, Enemy, Lifecycle};
use crate::systems::movement::{Position, Velocity};

/// A bullet in flight. Expires on its first hit or after travelling `max_distance`.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub damage: u32,
    pub origin: Vec2,
    pub max_distance: f32,
}

impl Projectile {
    pub fn travelled(&self, position: Vec2) -> f32 {
        self.origin.distance(position)
    }

    pub fn is_spent(&self, position: Vec2) -> bool {
        self.travelled(position) >= self.max_distance
    }
}

/// Spawns a projectile at `origin` heading toward `aim`.
///
/// Aiming at the origin itself fires along `fallback`, so a shot is never lost.
pub fn spawn_projectile(commands: &mut Commands, config: &ProjectileConfig, damage: u32, origin: Vec2, aim: Vec2, fallback: Vec2) -> Entity {
    let heading = (aim - origin).try_normalize().unwrap_or(fallback);
    commands
        .spawn((
            Projectile {
                damage,
                origin,
                max_distance: config.max_distance,
            },
            Position(origin),
            Velocity(heading * config.speed),
            Collider {
                radius: config.collision_radius,
            },
            CollisionLayer::BULLET,
        ))
        .id()
}

/// Moves projectiles, resolves hits against the first live enemy whose collider touches theirs, and expires spent ones.
pub fn projectile_system(
    mut commands: Commands,
    delta_time: Res<DeltaTime>,
    mut projectiles: Query<(Entity, &Projectile, &mut Position, &Velocity, &Collider)>,
    enemies: Query<(Entity, &Position, &Collider, &Lifecycle), (With<Enemy>, Without<Projectile>)>,
    mut damage: EventWriter<DamageRequest>,
) {
    let dt = delta_time.seconds();
    for (entity, projectile, mut position, velocity, bullet) in projectiles.iter_mut() {
        position.0 += velocity.0 * dt;

        let hit = enemies
            .iter()
            .find(|(_, enemy_position, collider, lifecycle)| {
                lifecycle.is_alive() && bullet.overlaps(position.0, collider, enemy_position.0)
            })
            .map(|(enemy, ..)| enemy);

        if let Some(enemy) = hit {
            trace!(projectile = ?entity, enemy = ?enemy, damage = projectile.damage, "Projectile hit");
            damage.write(DamageRequest {
                target: enemy,
                amount: projectile.damage,
            });
            commands.entity(entity).despawn();
        } else if projectile.is_spent(position.0) {
            trace!(projectile = ?entity, "Projectile expired");
            commands.entity(entity).despawn();
        }
    }
}
