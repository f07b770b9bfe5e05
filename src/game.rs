//! This module contains the main game logic and state.

use std::sync::Arc;

use bevy_ecs::entity::Entity;
use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::query::With;
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::system::{Res, ResMut};
use bevy_ecs::world::World;
use glam::Vec2;
use tracing::{debug, info};

use crate::animation::{AnimState, AnimationLibrary, AnimationPlayer, ClassId};
use crate::asset::AssetProbe;
use crate::config::GameConfig;
use crate::direction::Direction;
use crate::error::{GameError, GameResult};
use crate::events::{GameCommand, GameEvent};
use crate::formatter;
use crate::systems::animation::animation_system;
use crate::systems::combat::{contact_damage_system, damage_system, DamageRequest};
use crate::systems::deferred::{deferred_action_system, PendingActions};
use crate::systems::enemy::{enemy_ai_system, EnemyBrain, EnemyStats};
use crate::systems::hud::hud_system;
use crate::systems::movement::{movement_system, Position, Velocity};
use crate::systems::player::{player_command_system, player_movement_system, Arsenal, AttackVariantCycle, PlayerAction};
use crate::systems::projectile::projectile_system;
use crate::systems::timers::{DamageFlash, DashAbility, Invulnerability};
use crate::systems::{
    error_log_system, game_running, maintain_events, Collider, CollisionLayer, DeltaTime, Enemy, EnemyBundle, Facing,
    GameClock, GameOutcome, Health, HudSnapshot, Lifecycle, MovementInput, PlayerBundle, PlayerControlled, SharedConfig,
    WorldBounds,
};

/// System set for all gameplay systems to ensure they run after input processing
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum GameplaySet {
    /// Advances the clock and rotates event buffers
    Clock,
    /// Gameplay systems that process inputs
    Input,
    /// Gameplay systems that update the game state
    Update,
    /// Gameplay systems that respond to events
    Respond,
}

/// System set for everything that runs after gameplay logic, even once the game is over
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum PresentSet {
    Animation,
    Snapshot,
}

/// Core game state manager built on the Bevy ECS architecture.
///
/// Orchestrates all game systems through a centralized `World` containing entities,
/// components, and resources, while a `Schedule` defines system execution order.
/// The game never draws; a renderer reads [`AnimationPlayer`] components and the
/// [`HudSnapshot`] resource after each tick.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
    config: Arc<GameConfig>,
}

impl Game {
    /// Validates the configuration, builds every animation registry and spawns the initial entities.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Config` for invalid tuning or content data.
    pub fn new(config: GameConfig, probe: &dyn AssetProbe) -> GameResult<Game> {
        info!("Starting game initialization");
        config.validate()?;

        debug!("Building animation library");
        let classes = config.animation_classes();
        let library = AnimationLibrary::build(&classes, probe)?;

        Self::assemble(Arc::new(config), library)
    }

    fn assemble(config: Arc<GameConfig>, library: AnimationLibrary) -> GameResult<Game> {
        let mut world = World::default();
        let mut schedule = Schedule::default();

        Self::setup_resources(&mut world, &config, library);
        Self::setup_ecs(&mut schedule);
        Self::spawn_player(&mut world, &config)?;
        Self::spawn_enemies(&mut world, &config)?;

        info!(enemies = config.spawns.len(), "Game initialized");
        Ok(Game { world, schedule, config })
    }

    fn setup_resources(world: &mut World, config: &Arc<GameConfig>, library: AnimationLibrary) {
        EventRegistry::register_event::<GameError>(world);
        EventRegistry::register_event::<GameEvent>(world);
        EventRegistry::register_event::<DamageRequest>(world);

        world.insert_resource(SharedConfig(Arc::clone(config)));
        world.insert_resource(library);
        world.insert_resource(GameClock::default());
        world.insert_resource(DeltaTime::default());
        world.insert_resource(MovementInput::default());
        world.insert_resource(GameOutcome::default());
        world.insert_resource(WorldBounds::new(config.world.width, config.world.height));
        world.insert_resource(HudSnapshot::default());
    }

    fn setup_ecs(schedule: &mut Schedule) {
        schedule
            .add_systems((
                (
                    clock_system,
                    maintain_events::<GameEvent>,
                    maintain_events::<GameError>,
                    maintain_events::<DamageRequest>,
                )
                    .chain()
                    .in_set(GameplaySet::Clock),
                player_command_system.in_set(GameplaySet::Input),
                (
                    player_movement_system,
                    enemy_ai_system,
                    movement_system,
                    projectile_system,
                    contact_damage_system,
                )
                    .chain()
                    .in_set(GameplaySet::Update),
                (damage_system, deferred_action_system).chain().in_set(GameplaySet::Respond),
                animation_system.in_set(PresentSet::Animation),
                (hud_system, error_log_system).chain().in_set(PresentSet::Snapshot),
            ))
            .configure_sets(
                (
                    GameplaySet::Clock,
                    GameplaySet::Input.run_if(game_running),
                    GameplaySet::Update.run_if(game_running),
                    GameplaySet::Respond.run_if(game_running),
                    PresentSet::Animation,
                    PresentSet::Snapshot,
                )
                    .chain(),
            );
    }

    fn spawn_player(world: &mut World, config: &GameConfig) -> GameResult<()> {
        let player = &config.player;
        let class = config.player_class();
        let position = player.spawn.map_or_else(|| config.world.center(), Vec2::from);

        let mut animation = AnimationPlayer::new(class.id.clone());
        animation.play(world.resource::<AnimationLibrary>(), AnimState::Idle, Direction::Down);

        let arsenal = Arsenal::new(config.weapons.clone(), &player.starting_weapon);
        if arsenal.current().is_none() {
            return Err(GameError::InvalidState("player spawned without a weapon".to_string()));
        }

        let entity = world
            .spawn(PlayerBundle {
                player: PlayerControlled,
                position: Position(position),
                velocity: Velocity::default(),
                facing: Facing(Direction::Down),
                health: Health::new(player.health),
                lifecycle: Lifecycle::Alive,
                collider: Collider {
                    radius: player.collision_radius,
                },
                layer: CollisionLayer::PLAYER,
                animation,
                action: PlayerAction::Free,
                arsenal,
                variants: AttackVariantCycle::new(
                    player.sprite_sheet.attack_variants.clone(),
                    player.sprite_sheet.attack_alternate,
                ),
                dash: DashAbility::new(player.dash.duration, player.dash.cooldown, player.dash.speed_multiplier),
                invulnerability: Invulnerability::default(),
                flash: DamageFlash::default(),
                pending: PendingActions::default(),
            })
            .id();

        debug!(entity = ?entity, position = ?position, "Spawned player");
        Ok(())
    }

    fn spawn_enemies(world: &mut World, config: &GameConfig) -> GameResult<()> {
        for spawn in &config.spawns {
            let class = config
                .enemies
                .get(&spawn.class)
                .ok_or_else(|| GameError::InvalidState(format!("unknown enemy class '{}'", spawn.class)))?;

            let mut animation = AnimationPlayer::new(ClassId::new(spawn.class.as_str()));
            animation.play(world.resource::<AnimationLibrary>(), AnimState::Idle, Direction::Down);

            let entity = world
                .spawn(EnemyBundle {
                    enemy: Enemy,
                    position: Position(Vec2::from(spawn.position)),
                    velocity: Velocity::default(),
                    facing: Facing(Direction::Down),
                    health: Health::new(class.health),
                    lifecycle: Lifecycle::Alive,
                    collider: Collider {
                        radius: class.collision_radius,
                    },
                    layer: CollisionLayer::ENEMY,
                    animation,
                    stats: EnemyStats::from(class),
                    brain: EnemyBrain::new(class.attack_cooldown),
                    pending: PendingActions::default(),
                })
                .id();

            debug!(entity = ?entity, class = %spawn.class, "Spawned enemy");
        }
        Ok(())
    }

    /// Advances the game by `delta_ms` milliseconds of game time.
    ///
    /// Returns `false` once the game is over.
    pub fn tick(&mut self, delta_ms: u64) -> bool {
        self.world.insert_resource(DeltaTime { ms: delta_ms });
        self.schedule.run(&mut self.world);
        !self.is_game_over()
    }

    fn send(&mut self, command: GameCommand) {
        self.world.send_event(GameEvent::from(command));
    }

    /// Attacks toward a world-space aim point on the next tick.
    pub fn on_attack_input(&mut self, aim: Vec2) {
        self.send(GameCommand::Attack(aim));
    }

    pub fn on_dash_input(&mut self) {
        self.send(GameCommand::Dash);
    }

    /// Reports the current directional input; each component should be -1, 0 or 1.
    pub fn on_movement_input_changed(&mut self, input: Vec2) {
        self.send(GameCommand::Move(input));
    }

    pub fn switch_weapon(&mut self) {
        self.send(GameCommand::SwitchWeapon);
    }

    /// Starts a fresh run with the same configuration and animation library.
    pub fn restart(&mut self) -> GameResult<()> {
        info!("Restarting game");
        let library = self.world.resource::<AnimationLibrary>().clone();
        *self = Self::assemble(Arc::clone(&self.config), library)?;
        Ok(())
    }

    /// Re-probes every class and swaps in the new registries. On error nothing changes.
    pub fn rebuild_animations(&mut self, probe: &dyn AssetProbe) -> GameResult<()> {
        let library = AnimationLibrary::build(&self.config.animation_classes(), probe)?;
        self.world.insert_resource(library);
        Ok(())
    }

    pub fn hud(&self) -> HudSnapshot {
        self.world.get_resource::<HudSnapshot>().cloned().unwrap_or_default()
    }

    pub fn now_ms(&self) -> u64 {
        self.world.get_resource::<GameClock>().map_or(0, |clock| clock.now_ms)
    }

    pub fn is_game_over(&self) -> bool {
        self.world
            .get_resource::<GameOutcome>()
            .is_some_and(|outcome| !outcome.is_running())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&mut self) -> Option<Entity> {
        self.world
            .query_filtered::<Entity, With<PlayerControlled>>()
            .iter(&self.world)
            .next()
    }

    /// Events emitted since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.world
            .get_resource_mut::<Events<GameEvent>>()
            .map(|mut events| events.drain().filter(|e| !matches!(e, GameEvent::Command(_))).collect())
            .unwrap_or_default()
    }
}

/// Advances the game clock and publishes it to the log formatter.
pub fn clock_system(delta_time: Res<DeltaTime>, mut clock: ResMut<GameClock>) {
    clock.now_ms += delta_time.ms;
    formatter::set_game_clock(clock.now_ms);
}
