use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;
use bevy_ecs::event::EventWriter;
use bevy_ecs::query::{With, Without};
use bevy_ecs::system::{Query, Res};
use tracing::{debug, trace};

use crate::animation::{AnimState, AnimationLibrary, AnimationPlayer, PlayOutcome};
use crate::config::EnemyConfig;
use crate::direction::Direction;
use crate::systems::combat::DamageRequest;
use crate::systems::components::{Enemy, Facing, GameClock, Lifecycle, PlayerControlled};
use crate::systems::deferred::{DeferredAction, PendingActions};
use crate::systems::movement::{Position, Velocity};
use crate::systems::timers::{Cooldown, Invulnerability};

/// Per-enemy tuning copied from its class at spawn.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub speed: f32,
    pub damage: u32,
    pub attack_range: f32,
    pub vision_range: f32,
}

impl From<&EnemyConfig> for EnemyStats {
    fn from(config: &EnemyConfig) -> Self {
        Self {
            speed: config.speed,
            damage: config.damage,
            attack_range: config.attack_range,
            vision_range: config.vision_range,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnemyMode {
    #[default]
    Idle,
    Pursuing,
    /// Committed to an attack animation; no branching until it completes.
    Attacking,
}

#[derive(Component, Debug, Clone)]
pub struct EnemyBrain {
    pub mode: EnemyMode,
    pub attack_cooldown: Cooldown,
}

impl EnemyBrain {
    pub fn new(attack_cooldown_ms: u64) -> Self {
        Self {
            mode: EnemyMode::Idle,
            attack_cooldown: Cooldown::new(attack_cooldown_ms),
        }
    }
}

/// What an enemy wants to do given its distance to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Idle,
    Pursue,
    Attack,
}

pub fn perceive(distance: f32, stats: &EnemyStats) -> Intent {
    if distance > stats.vision_range {
        Intent::Idle
    } else if distance > stats.attack_range {
        Intent::Pursue
    } else {
        Intent::Attack
    }
}

#[allow(clippy::type_complexity)]
pub fn enemy_ai_system(
    clock: Res<GameClock>,
    library: Res<AnimationLibrary>,
    player: Query<(Entity, &Position, &Lifecycle, Option<&Invulnerability>), With<PlayerControlled>>,
    mut enemies: Query<
        (
            Entity,
            &Position,
            &mut Velocity,
            &mut Facing,
            &mut EnemyBrain,
            &mut AnimationPlayer,
            &mut PendingActions,
            &Lifecycle,
            &EnemyStats,
        ),
        (With<Enemy>, Without<PlayerControlled>),
    >,
    mut damage: EventWriter<DamageRequest>,
) {
    let now = clock.now_ms;
    let target = player
        .single()
        .ok()
        .filter(|(_, _, lifecycle, _)| lifecycle.is_alive())
        .map(|(entity, position, _, shield)| (entity, position.0, shield.is_some_and(|s| s.is_active(now))));

    for (entity, position, mut velocity, mut facing, mut brain, mut animation, mut pending, lifecycle, stats) in
        enemies.iter_mut()
    {
        if !lifecycle.is_alive() || brain.mode == EnemyMode::Attacking {
            continue;
        }

        let Some((player, player_position, player_invulnerable)) = target else {
            velocity.halt();
            brain.mode = EnemyMode::Idle;
            animation.play(&library, AnimState::Idle, facing.0);
            continue;
        };

        let offset = player_position - position.0;
        match perceive(offset.length(), stats) {
            Intent::Idle => {
                velocity.halt();
                brain.mode = EnemyMode::Idle;
                animation.play(&library, AnimState::Idle, facing.0);
            }
            Intent::Pursue => {
                velocity.0 = offset.normalize_or_zero() * stats.speed;
                if let Some(direction) = Direction::from_vector(offset) {
                    facing.0 = direction;
                }
                if brain.mode != EnemyMode::Pursuing {
                    trace!(enemy = ?entity, "Pursuing player");
                }
                brain.mode = EnemyMode::Pursuing;
                animation.play(&library, AnimState::Move, facing.0);
            }
            Intent::Attack => {
                velocity.halt();
                if let Some(direction) = Direction::from_vector(offset) {
                    facing.0 = direction;
                }
                if brain.attack_cooldown.try_fire(now).is_err() {
                    brain.mode = EnemyMode::Idle;
                    animation.play(&library, AnimState::Idle, facing.0);
                    continue;
                }
                // The swing is spent, but an invulnerable player is not attacked at all.
                if player_invulnerable {
                    trace!(enemy = ?entity, "Player invulnerable, attack skipped");
                    brain.mode = EnemyMode::Idle;
                    animation.play(&library, AnimState::Idle, facing.0);
                    continue;
                }

                damage.write(DamageRequest {
                    target: player,
                    amount: stats.damage,
                });
                // Missing attack art still applies damage, it just does not suspend the AI.
                if let PlayOutcome::Changed(_) = animation.play(&library, AnimState::Attack1, facing.0) {
                    let duration = animation.current().map_or(0, |c| c.descriptor.duration_ms());
                    brain.mode = EnemyMode::Attacking;
                    pending.schedule(now + duration, DeferredAction::EndEnemyAttack);
                    debug!(enemy = ?entity, duration, "Enemy attack started");
                } else {
                    brain.mode = EnemyMode::Idle;
                }
            }
        }
    }
}
