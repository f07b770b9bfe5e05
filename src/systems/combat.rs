//! Damage application and death sequencing.
//!
//! Anything that wants to hurt an entity writes a [`DamageRequest`]; requests are
//! resolved in one place, in order, so a window granted by the first hit of a
//! tick already protects against the second.

use bevy_ecs::entity::Entity;
use bevy_ecs::event::{Event, EventReader, EventWriter};
use bevy_ecs::query::{Has, With, Without};
use bevy_ecs::system::{Query, Res, ResMut};
use tracing::{debug, info, trace};

use crate::animation::{AnimState, AnimationLibrary, AnimationPlayer, PlayOutcome};
use crate::constants::DAMAGE_FLASH_MS;
use crate::direction::Direction;
use crate::events::GameEvent;
use crate::systems::components::{
    Collider, Enemy, Facing, GameClock, GameOutcome, Health, Lifecycle, PlayerControlled, SharedConfig,
};
use crate::systems::deferred::{DeferredAction, PendingActions};
use crate::systems::enemy::EnemyStats;
use crate::systems::movement::{Position, Velocity};
use crate::systems::timers::{DamageFlash, Invulnerability};

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The target was already dead or is invulnerable right now.
    Ignored,
    Damaged { remaining: u32 },
    /// Health reached zero with this hit; happens at most once per entity.
    Killed,
}

/// Subtracts `amount` from `health`, never below zero, unless the target cannot be hurt at `now`.
pub fn apply_damage(
    health: &mut Health,
    lifecycle: &mut Lifecycle,
    invulnerability: Option<&Invulnerability>,
    amount: u32,
    now: u64,
) -> DamageOutcome {
    if !lifecycle.is_alive() || invulnerability.is_some_and(|window| window.is_active(now)) {
        return DamageOutcome::Ignored;
    }

    health.current = health.current.saturating_sub(amount);
    if health.current == 0 {
        *lifecycle = Lifecycle::Dead;
        DamageOutcome::Killed
    } else {
        DamageOutcome::Damaged {
            remaining: health.current,
        }
    }
}

/// Halts the entity and plays its death animation.
///
/// With `remove` set, a despawn is scheduled once the animation has played, or
/// immediately when there is no death animation. Returns when the despawn is due.
pub fn enter_death(
    library: &AnimationLibrary,
    velocity: &mut Velocity,
    animation: &mut AnimationPlayer,
    pending: &mut PendingActions,
    facing: Direction,
    now: u64,
    remove: bool,
) -> Option<u64> {
    velocity.halt();
    let delay = match animation.play(library, AnimState::Death, facing) {
        PlayOutcome::Changed(_) => animation.current().map_or(0, |c| c.descriptor.duration_ms()),
        _ => 0,
    };

    remove.then(|| {
        pending.schedule(now + delay, DeferredAction::Despawn);
        now + delay
    })
}

#[allow(clippy::type_complexity)]
pub fn damage_system(
    clock: Res<GameClock>,
    config: Res<SharedConfig>,
    library: Res<AnimationLibrary>,
    mut requests: EventReader<DamageRequest>,
    mut events: EventWriter<GameEvent>,
    mut outcome: ResMut<GameOutcome>,
    mut targets: Query<(
        &mut Health,
        &mut Lifecycle,
        &mut Velocity,
        &mut AnimationPlayer,
        &Facing,
        &mut PendingActions,
        Option<&mut Invulnerability>,
        Option<&mut DamageFlash>,
        Has<PlayerControlled>,
    )>,
) {
    let now = clock.now_ms;
    for request in requests.read() {
        let Ok((mut health, mut lifecycle, mut velocity, mut animation, facing, mut pending, mut invulnerability, mut flash, is_player)) =
            targets.get_mut(request.target)
        else {
            trace!(target = ?request.target, "Damage request for a missing entity");
            continue;
        };

        match apply_damage(&mut health, &mut lifecycle, invulnerability.as_deref(), request.amount, now) {
            DamageOutcome::Ignored => {
                trace!(target = ?request.target, amount = request.amount, "Damage ignored");
            }
            DamageOutcome::Damaged { remaining } => {
                debug!(target = ?request.target, amount = request.amount, remaining, "Damage applied");
                if let Some(window) = invulnerability.as_deref_mut() {
                    window.grant(now, config.0.player.invulnerability_duration);
                }
                if let Some(flash) = flash.as_deref_mut() {
                    flash.trigger(now, DAMAGE_FLASH_MS);
                }
                animation.play(&library, AnimState::Hit, facing.0);
                events.write(GameEvent::Damaged {
                    target: request.target,
                    amount: request.amount,
                    remaining,
                });
            }
            DamageOutcome::Killed => {
                events.write(GameEvent::Damaged {
                    target: request.target,
                    amount: request.amount,
                    remaining: 0,
                });
                let despawn_at = enter_death(
                    &library,
                    &mut velocity,
                    &mut animation,
                    &mut pending,
                    facing.0,
                    now,
                    !is_player,
                );
                info!(entity = ?request.target, class = %animation.class(), despawn_at = ?despawn_at, "Entity died");
                events.write(GameEvent::Died {
                    entity: request.target,
                    class: animation.class().clone(),
                });

                if is_player {
                    *outcome = GameOutcome::GameOver;
                    events.write(GameEvent::GameOver);
                    info!("Game over");
                }
            }
        }
    }
}

/// Live enemies overlapping the player deal their damage on contact.
pub fn contact_damage_system(
    player: Query<(Entity, &Position, &Collider, &Lifecycle), With<PlayerControlled>>,
    enemies: Query<(&Position, &Collider, &Lifecycle, &EnemyStats), (With<Enemy>, Without<PlayerControlled>)>,
    mut damage: EventWriter<DamageRequest>,
) {
    let Ok((player, player_position, player_collider, player_lifecycle)) = player.single() else {
        return;
    };
    if !player_lifecycle.is_alive() {
        return;
    }

    for (position, collider, lifecycle, stats) in enemies.iter() {
        if lifecycle.is_alive() && collider.overlaps(position.0, player_collider, player_position.0) {
            damage.write(DamageRequest {
                target: player,
                amount: stats.damage,
            });
        }
    }
}
