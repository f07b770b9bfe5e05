#![allow(dead_code)]

use bevy_ecs::{
    entity::Entity,
    event::{Event, Events},
    query::With,
    world::World,
};
use brawler::{
    animation::{AnimState, AnimationLibrary, AnimationPlayer, ClassId},
    asset::{image_key, AssetCatalog},
    config::GameConfig,
    direction::Direction,
    events::GameEvent,
    game::Game,
    systems::{
        deferred::PendingActions,
        enemy::{EnemyBrain, EnemyStats},
        movement::{Position, Velocity},
        Collider, CollisionLayer, Enemy, EnemyBundle, Facing, GameClock, Health, Lifecycle, PlayerControlled,
    },
};
use glam::Vec2;

/// Registers a correctly sized strip for every image `config` can ask for.
pub fn full_catalog(config: &GameConfig) -> AssetCatalog {
    let mut catalog = AssetCatalog::new();
    for class in config.animation_classes() {
        let mut states = class.states.clone();
        states.extend(class.sheet.attack_variants.iter().copied());
        for state in states {
            let frames = class.sheet.frame_counts.get(&state).copied().unwrap_or(1);
            let (width, height) = class.sheet.frame_size.map_or((64, 64), |s| (s.width, s.height));
            catalog.insert(image_key(&class.prefix, state, None), width * frames, height);
            for &direction in &class.directions {
                catalog.insert(image_key(&class.prefix, state, Some(direction)), width * frames, height);
            }
        }
    }
    catalog
}

/// Default tuning with no enemy spawns, so tests place enemies themselves.
pub fn test_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.spawns.clear();
    config
}

pub fn create_test_game() -> Game {
    let config = test_config();
    let catalog = full_catalog(&config);
    Game::new(config, &catalog).expect("Test game should build")
}

/// A world with every game resource and a player at the world center.
pub fn create_test_world() -> World {
    create_test_game().world
}

pub fn player_entity(world: &mut World) -> Entity {
    world
        .query_filtered::<Entity, With<PlayerControlled>>()
        .single(world)
        .expect("Player should exist")
}

/// Spawns a moose at `position`, using the default moose tuning.
pub fn spawn_test_enemy(world: &mut World, position: Vec2) -> Entity {
    let config = GameConfig::default();
    let moose = config.enemies.get("moose1").expect("moose1 should be configured");

    let mut animation = AnimationPlayer::new(ClassId::new("moose1"));
    animation.play(world.resource::<AnimationLibrary>(), AnimState::Idle, Direction::Down);

    world
        .spawn(EnemyBundle {
            enemy: Enemy,
            position: Position(position),
            velocity: Velocity::default(),
            facing: Facing(Direction::Down),
            health: Health::new(moose.health),
            lifecycle: Lifecycle::Alive,
            collider: Collider {
                radius: moose.collision_radius,
            },
            layer: CollisionLayer::ENEMY,
            animation,
            stats: EnemyStats::from(moose),
            brain: EnemyBrain::new(moose.attack_cooldown),
            pending: PendingActions::default(),
        })
        .id()
}

pub fn set_clock(world: &mut World, now_ms: u64) {
    world.resource_mut::<GameClock>().now_ms = now_ms;
}

pub fn set_position(world: &mut World, entity: Entity, position: Vec2) {
    world.get_mut::<Position>(entity).expect("Entity should have a position").0 = position;
}

pub fn send_game_event(world: &mut World, event: GameEvent) {
    world.send_event(event);
}

/// Removes and returns every pending event of type `E`.
pub fn drain_events<E: Event>(world: &mut World) -> Vec<E> {
    world.resource_mut::<Events<E>>().drain().collect()
}

pub fn current_key(world: &World, entity: Entity) -> Option<String> {
    world
        .get::<AnimationPlayer>(entity)
        .and_then(|player| player.current_key().map(str::to_string))
}
