//! Per-entity deferred actions.
//!
//! Each entity owns its queue, so despawning it drops everything it had pending.
//! An action only fires if the entity is still in the state it was scheduled for.

use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;
use bevy_ecs::query::With;
use bevy_ecs::system::{Commands, Query, Res};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::animation::{AnimState, AnimationLibrary, AnimationPlayer};
use crate::direction::Direction;
use crate::systems::components::{Facing, GameClock, Lifecycle, MovementInput, PlayerControlled};
use crate::systems::enemy::{perceive, EnemyBrain, EnemyMode, EnemyStats, Intent};
use crate::systems::movement::Position;
use crate::systems::player::PlayerAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// The attack started at `attack_started_at` is over: play move or idle depending on input at that moment.
    ReturnToLocomotion { attack_started_at: u64 },
    /// An enemy's attack animation completed: move if the player is out of reach, otherwise idle.
    EndEnemyAttack,
    /// Remove the entity once its death animation has played.
    Despawn,
}

#[derive(Component, Debug, Clone, Default)]
pub struct PendingActions {
    entries: SmallVec<[(u64, DeferredAction); 4]>,
}

impl PendingActions {
    pub fn schedule(&mut self, at_ms: u64, action: DeferredAction) {
        self.entries.push((at_ms, action));
    }

    /// Removes and returns every action due at `now`, earliest first.
    pub fn drain_due(&mut self, now: u64) -> SmallVec<[DeferredAction; 4]> {
        let mut due: SmallVec<[(u64, DeferredAction); 4]> = SmallVec::new();
        self.entries.retain(|entry| {
            if entry.0 <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, action)| action).collect()
    }

    pub fn contains(&self, action: DeferredAction) -> bool {
        self.entries.iter().any(|(_, a)| *a == action)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[allow(clippy::type_complexity)]
pub fn deferred_action_system(
    mut commands: Commands,
    clock: Res<GameClock>,
    input: Res<MovementInput>,
    library: Res<AnimationLibrary>,
    player: Query<(&Position, &Lifecycle), With<PlayerControlled>>,
    mut entities: Query<(
        Entity,
        &mut PendingActions,
        &Lifecycle,
        &Position,
        &mut Facing,
        &mut AnimationPlayer,
        Option<&mut PlayerAction>,
        Option<&mut EnemyBrain>,
        Option<&EnemyStats>,
    )>,
) {
    let target = player
        .single()
        .ok()
        .filter(|(_, lifecycle)| lifecycle.is_alive())
        .map(|(position, _)| position.0);

    for (entity, mut pending, lifecycle, position, mut facing, mut animation, mut action, mut brain, stats) in
        entities.iter_mut()
    {
        if pending.is_empty() {
            continue;
        }

        for deferred in pending.drain_due(clock.now_ms) {
            match deferred {
                DeferredAction::Despawn => {
                    debug!(entity = ?entity, "Despawning entity");
                    commands.entity(entity).despawn();
                }
                _ if !lifecycle.is_alive() => {
                    trace!(entity = ?entity, action = ?deferred, "Skipping deferred action on dead entity");
                }
                DeferredAction::ReturnToLocomotion { attack_started_at } => match action.as_deref_mut() {
                    Some(action) if *action == (PlayerAction::Attacking { started_at: attack_started_at }) => {
                        *action = PlayerAction::Free;
                        let state = if input.is_moving() { AnimState::Move } else { AnimState::Idle };
                        animation.play(&library, state, facing.0);
                    }
                    other => {
                        trace!(entity = ?entity, state = ?other, attack_started_at, "Stale return to locomotion");
                    }
                },
                DeferredAction::EndEnemyAttack => match brain.as_deref_mut() {
                    Some(brain) if brain.mode == EnemyMode::Attacking => {
                        let offset = target.map(|player| player - position.0);
                        let intent = match (offset, stats) {
                            (Some(offset), Some(stats)) => perceive(offset.length(), stats),
                            _ => Intent::Idle,
                        };

                        if intent == Intent::Pursue {
                            if let Some(direction) = offset.and_then(Direction::from_vector) {
                                facing.0 = direction;
                            }
                            brain.mode = EnemyMode::Pursuing;
                            animation.play(&library, AnimState::Move, facing.0);
                        } else {
                            brain.mode = EnemyMode::Idle;
                            animation.play(&library, AnimState::Idle, facing.0);
                        }
                        debug!(entity = ?entity, intent = ?intent, "Enemy attack ended");
                    }
                    other => {
                        trace!(entity = ?entity, brain = ?other, "Stale end of enemy attack");
                    }
                },
            }
        }
    }
}
