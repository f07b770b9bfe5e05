use bevy_ecs::{
    component::Component,
    entity::Entity,
    event::{EventReader, EventWriter},
    query::{With, Without},
    system::{Commands, Query, Res, ResMut},
};
use glam::Vec2;
use tracing::{debug, info, trace};

use crate::{
    animation::{AnimState, AnimationLibrary, AnimationPlayer},
    config::{WeaponConfig, WeaponKind},
    constants::{DASH_INVULNERABILITY_TAIL_MS, DIAGONAL_FACTOR, RANGED_RECOVERY_MS},
    direction::Direction,
    error::GameError,
    events::{GameCommand, GameEvent},
    systems::{
        combat::DamageRequest,
        components::{Enemy, Facing, GameClock, Lifecycle, MovementInput, PlayerControlled, SharedConfig},
        deferred::{DeferredAction, PendingActions},
        movement::{Position, Velocity},
        projectile::spawn_projectile,
        timers::{Cooldown, CooldownActive, DashAbility, Invulnerability},
    },
};

/// What the player is committed to right now. Locomotion animations only play while `Free`.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlayerAction {
    #[default]
    Free,
    /// Tagged with the start time, so a recovery scheduled for an earlier attack can tell it is stale.
    Attacking { started_at: u64 },
    Dashing,
}

/// The ordered weapon list and a single attack cooldown shared by all of them.
#[derive(Component, Debug, Clone)]
pub struct Arsenal {
    weapons: Vec<WeaponConfig>,
    current: usize,
    cooldown: Cooldown,
}

impl Arsenal {
    /// Equips `starting` if present in `weapons`, otherwise the first weapon.
    pub fn new(weapons: Vec<WeaponConfig>, starting: &str) -> Self {
        let current = weapons.iter().position(|w| w.name == starting).unwrap_or(0);
        let cooldown = Cooldown::new(weapons.get(current).map_or(0, |w| w.cooldown));
        Self {
            weapons,
            current,
            cooldown,
        }
    }

    pub fn current(&self) -> Option<&WeaponConfig> {
        self.weapons.get(self.current)
    }

    /// Equips the next weapon, wrapping around. The attack cooldown keeps running.
    pub fn cycle(&mut self) -> Option<&WeaponConfig> {
        if self.weapons.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.weapons.len();
        let weapon = &self.weapons[self.current];
        self.cooldown.set_cooldown(weapon.cooldown);
        Some(weapon)
    }

    pub fn try_attack(&mut self, now: u64) -> Result<(), CooldownActive> {
        self.cooldown.try_fire(now)
    }

    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }
}

/// Ordered attack states, stepped once per initiated attack.
#[derive(Component, Debug, Clone)]
pub struct AttackVariantCycle {
    variants: Vec<AnimState>,
    index: usize,
    alternate: bool,
}

impl AttackVariantCycle {
    pub fn new(variants: Vec<AnimState>, alternate: bool) -> Self {
        Self {
            variants,
            index: 0,
            alternate,
        }
    }

    /// The variant for this attack. Advances only when alternation is on and there is a choice.
    pub fn next_variant(&mut self) -> AnimState {
        let state = self.variants.get(self.index).copied().unwrap_or(AnimState::Attack1);
        if self.alternate && self.variants.len() > 1 {
            self.index = (self.index + 1) % self.variants.len();
        }
        state
    }

    pub fn peek(&self) -> AnimState {
        self.variants.get(self.index).copied().unwrap_or(AnimState::Attack1)
    }
}

fn locomotion_state(input: &MovementInput) -> AnimState {
    if input.is_moving() {
        AnimState::Move
    } else {
        AnimState::Idle
    }
}

/// Applies queued player commands: attacks, dashes, movement input and weapon switches.
#[allow(clippy::type_complexity)]
pub fn player_command_system(
    mut commands: Commands,
    mut events: EventReader<GameEvent>,
    clock: Res<GameClock>,
    config: Res<SharedConfig>,
    library: Res<AnimationLibrary>,
    mut input: ResMut<MovementInput>,
    mut players: Query<
        (
            &Position,
            &mut Facing,
            &mut PlayerAction,
            &mut Arsenal,
            &mut AttackVariantCycle,
            &mut DashAbility,
            &mut Invulnerability,
            &mut AnimationPlayer,
            &mut PendingActions,
            &Lifecycle,
        ),
        With<PlayerControlled>,
    >,
    enemies: Query<(Entity, &Position, &Lifecycle), (With<Enemy>, Without<PlayerControlled>)>,
    mut damage: EventWriter<DamageRequest>,
    mut errors: EventWriter<GameError>,
) {
    let (position, mut facing, mut action, mut arsenal, mut variants, mut dash, mut invulnerability, mut animation, mut pending, lifecycle) =
        match players.single_mut() {
            Ok(tuple) => tuple,
            Err(e) => {
                errors.write(GameError::InvalidState(format!(
                    "No/multiple entities queried for player system: {}",
                    e
                )));
                return;
            }
        };

    let now = clock.now_ms;
    for event in events.read() {
        let GameEvent::Command(command) = event else {
            continue;
        };

        match command {
            GameCommand::Move(raw) => {
                input.0 = raw.clamp(Vec2::NEG_ONE, Vec2::ONE);
            }
            GameCommand::SwitchWeapon => {
                if let Some(weapon) = arsenal.cycle() {
                    info!(weapon = %weapon.name, "Weapon switched");
                }
            }
            _ if !lifecycle.is_alive() => {
                trace!(command = ?command, "Ignoring command from dead player");
            }
            GameCommand::Dash => {
                if let Err(CooldownActive { remaining_ms }) = dash.try_start(now) {
                    trace!(remaining_ms, "Dash not ready");
                    continue;
                }

                let direction = Direction::from_vector(input.0).unwrap_or(facing.0);
                facing.0 = direction;
                dash.velocity = direction.as_vec2() * config.0.player.speed * dash.speed_multiplier;
                invulnerability.grant(now, dash.duration_ms() + DASH_INVULNERABILITY_TAIL_MS);
                *action = PlayerAction::Dashing;
                animation.play(&library, AnimState::Dash, direction);
                debug!(direction = ?direction, "Dash started");
            }
            GameCommand::Attack(aim) => {
                if *action == PlayerAction::Dashing {
                    trace!("Cannot attack while dashing");
                    continue;
                }
                if let Err(CooldownActive { remaining_ms }) = arsenal.try_attack(now) {
                    trace!(remaining_ms, "Attack on cooldown");
                    continue;
                }
                let Some(weapon) = arsenal.current() else {
                    continue;
                };

                let state = variants.next_variant();
                *action = PlayerAction::Attacking { started_at: now };
                animation.play(&library, state, facing.0);

                let recovery = match &weapon.kind {
                    WeaponKind::Melee { range, attack_duration } => {
                        let mut hits = 0;
                        for (enemy, enemy_position, enemy_lifecycle) in enemies.iter() {
                            if enemy_lifecycle.is_alive() && position.0.distance(enemy_position.0) <= *range {
                                damage.write(DamageRequest {
                                    target: enemy,
                                    amount: weapon.damage,
                                });
                                hits += 1;
                            }
                        }
                        debug!(weapon = %weapon.name, variant = %state, hits, "Melee attack");
                        *attack_duration
                    }
                    WeaponKind::Ranged { projectile } => {
                        let bullet = spawn_projectile(&mut commands, projectile, weapon.damage, position.0, *aim, facing.0.as_vec2());
                        debug!(weapon = %weapon.name, variant = %state, projectile = ?bullet, "Ranged attack");
                        RANGED_RECOVERY_MS
                    }
                };
                pending.schedule(now + recovery, DeferredAction::ReturnToLocomotion { attack_started_at: now });
            }
        }
    }
}

/// Turns movement input into velocity and facing, ends expired dashes and keeps locomotion animations current.
#[allow(clippy::type_complexity)]
pub fn player_movement_system(
    clock: Res<GameClock>,
    config: Res<SharedConfig>,
    library: Res<AnimationLibrary>,
    input: Res<MovementInput>,
    mut players: Query<
        (
            &mut Velocity,
            &mut Facing,
            &mut PlayerAction,
            &mut DashAbility,
            &mut AnimationPlayer,
            &Lifecycle,
        ),
        With<PlayerControlled>,
    >,
) {
    let now = clock.now_ms;
    for (mut velocity, mut facing, mut action, mut dash, mut animation, lifecycle) in players.iter_mut() {
        if !lifecycle.is_alive() {
            velocity.halt();
            continue;
        }

        if *action == PlayerAction::Dashing {
            if !dash.expired(now) {
                velocity.0 = dash.velocity;
                continue;
            }
            dash.end();
            *action = PlayerAction::Free;
            debug!("Dash ended");
        }

        let mut movement = input.0;
        if movement.x != 0.0 && movement.y != 0.0 {
            movement *= DIAGONAL_FACTOR;
        }
        velocity.0 = movement * config.0.player.speed;
        if let Some(direction) = Direction::from_vector(movement) {
            facing.0 = direction;
        }

        if *action == PlayerAction::Free && !animation.is_playing(AnimState::Hit) {
            animation.play(&library, locomotion_state(&input), facing.0);
        }
    }
}
