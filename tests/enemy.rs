use bevy_ecs::{entity::Entity, system::RunSystemOnce, world::World};
use brawler::{
    direction::Direction,
    game::Game,
    systems::{
        combat::DamageRequest,
        deferred::{deferred_action_system, DeferredAction, PendingActions},
        enemy::{enemy_ai_system, perceive, EnemyBrain, EnemyMode, EnemyStats, Intent},
        movement::{Position, Velocity},
        timers::Invulnerability,
        Facing, Lifecycle,
    },
};
use glam::Vec2;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

fn run_ai(world: &mut World) -> Vec<DamageRequest> {
    world.run_system_once(enemy_ai_system).expect("System should run successfully");
    common::drain_events::<DamageRequest>(world)
}

/// A world with the player at the center and one moose `offset` away from it.
fn setup(offset: Vec2) -> (World, Entity, Entity) {
    let mut world = common::create_test_world();
    let player = common::player_entity(&mut world);
    let origin = world.get::<Position>(player).unwrap().0;
    let enemy = common::spawn_test_enemy(&mut world, origin + offset);
    (world, player, enemy)
}

fn mode(world: &World, enemy: Entity) -> EnemyMode {
    world.get::<EnemyBrain>(enemy).unwrap().mode
}

#[test]
fn test_perception_bands() {
    let stats = EnemyStats {
        speed: 60.0,
        damage: 15,
        attack_range: 60.0,
        vision_range: 350.0,
    };

    assert_eq!(perceive(400.0, &stats), Intent::Idle);
    assert_eq!(perceive(350.0, &stats), Intent::Pursue);
    assert_eq!(perceive(61.0, &stats), Intent::Pursue);
    assert_eq!(perceive(60.0, &stats), Intent::Attack);
    assert_eq!(perceive(0.0, &stats), Intent::Attack);
}

#[test]
fn test_pursues_player_in_sight() {
    let (mut world, _, enemy) = setup(Vec2::new(200.0, 0.0));

    let requests = run_ai(&mut world);

    assert_that(&requests).is_empty();
    assert_eq!(world.get::<Velocity>(enemy).unwrap().0, Vec2::new(-60.0, 0.0));
    assert_eq!(world.get::<Facing>(enemy).unwrap().0, Direction::Left);
    assert_eq!(mode(&world, enemy), EnemyMode::Pursuing);
    assert_eq!(common::current_key(&world, enemy), Some("move".to_string()));
}

#[test]
fn test_idles_when_player_out_of_sight() {
    let (mut world, _, enemy) = setup(Vec2::new(0.0, 351.0));
    world.get_mut::<Velocity>(enemy).unwrap().0 = Vec2::new(10.0, 10.0);

    run_ai(&mut world);

    assert_eq!(world.get::<Velocity>(enemy).unwrap().0, Vec2::ZERO);
    assert_eq!(mode(&world, enemy), EnemyMode::Idle);
    assert_eq!(common::current_key(&world, enemy), Some("idle".to_string()));
}

#[test]
fn test_attack_suspends_until_animation_ends() {
    let (mut world, player, enemy) = setup(Vec2::new(50.0, 0.0));
    common::set_clock(&mut world, 1000);

    let requests = run_ai(&mut world);

    assert_eq!(requests, vec![DamageRequest { target: player, amount: 15 }]);
    assert_eq!(mode(&world, enemy), EnemyMode::Attacking);
    assert_eq!(world.get::<Velocity>(enemy).unwrap().0, Vec2::ZERO);
    assert_eq!(common::current_key(&world, enemy), Some("attack1".to_string()));
    assert_that(&world.get::<PendingActions>(enemy).unwrap().contains(DeferredAction::EndEnemyAttack)).is_true();

    // Mid-attack the enemy does not branch, even with the player gone from reach.
    common::set_position(&mut world, player, Vec2::new(1200.0, 700.0));
    common::set_clock(&mut world, 2000);
    assert_that(&run_ai(&mut world)).is_empty();
    assert_eq!(mode(&world, enemy), EnemyMode::Attacking);
    assert_eq!(common::current_key(&world, enemy), Some("attack1".to_string()));

    // 30 frames at 15 fps.
    common::set_clock(&mut world, 2999);
    world
        .run_system_once(deferred_action_system)
        .expect("System should run successfully");
    assert_eq!(mode(&world, enemy), EnemyMode::Attacking);

    common::set_clock(&mut world, 3000);
    world
        .run_system_once(deferred_action_system)
        .expect("System should run successfully");
    assert_eq!(mode(&world, enemy), EnemyMode::Idle);
    assert_eq!(common::current_key(&world, enemy), Some("idle".to_string()));
}

#[test]
fn test_attack_end_resumes_pursuit_when_player_backs_off() {
    let (mut world, player, enemy) = setup(Vec2::new(50.0, 0.0));
    let enemy_position = world.get::<Position>(enemy).unwrap().0;
    common::set_clock(&mut world, 0);
    run_ai(&mut world);
    assert_eq!(mode(&world, enemy), EnemyMode::Attacking);

    // Inside vision, outside attack reach.
    common::set_position(&mut world, player, enemy_position + Vec2::new(0.0, 200.0));
    common::set_clock(&mut world, 2000);
    world
        .run_system_once(deferred_action_system)
        .expect("System should run successfully");

    assert_eq!(mode(&world, enemy), EnemyMode::Pursuing);
    assert_eq!(world.get::<Facing>(enemy).unwrap().0, Direction::Down);
    assert_eq!(common::current_key(&world, enemy), Some("move".to_string()));
}

#[test]
fn test_invulnerable_player_is_not_attacked() {
    let (mut world, player, enemy) = setup(Vec2::new(50.0, 0.0));
    world.get_mut::<Invulnerability>(player).unwrap().grant(0, 500);
    common::set_clock(&mut world, 100);

    assert_that(&run_ai(&mut world)).is_empty();

    assert_eq!(mode(&world, enemy), EnemyMode::Idle);
    assert_eq!(common::current_key(&world, enemy), Some("idle".to_string()));
    assert_that(&world.get::<PendingActions>(enemy).unwrap().is_empty()).is_true();
    // The cooldown was still consumed.
    assert_eq!(world.get::<EnemyBrain>(enemy).unwrap().attack_cooldown.last_fired_at(), Some(100));

    common::set_clock(&mut world, 600);
    assert_that(&run_ai(&mut world)).is_empty();
    common::set_clock(&mut world, 3100);
    assert_eq!(run_ai(&mut world), vec![DamageRequest { target: player, amount: 15 }]);
}

#[test]
fn test_attack_respects_cooldown() {
    let (mut world, player, enemy) = setup(Vec2::new(0.0, 40.0));
    common::set_clock(&mut world, 0);
    assert_eq!(run_ai(&mut world).len(), 1);

    world.get_mut::<EnemyBrain>(enemy).unwrap().mode = EnemyMode::Idle;
    common::set_clock(&mut world, 2999);
    assert_that(&run_ai(&mut world)).is_empty();
    assert_eq!(common::current_key(&world, enemy), Some("idle".to_string()));
    assert_eq!(world.get::<Facing>(enemy).unwrap().0, Direction::Up);

    common::set_clock(&mut world, 3000);
    assert_eq!(run_ai(&mut world), vec![DamageRequest { target: player, amount: 15 }]);
}

#[test]
fn test_idles_once_player_is_dead() {
    let (mut world, player, enemy) = setup(Vec2::new(100.0, 0.0));
    *world.get_mut::<Lifecycle>(player).unwrap() = Lifecycle::Dead;
    world.get_mut::<Velocity>(enemy).unwrap().0 = Vec2::new(-60.0, 0.0);

    assert_that(&run_ai(&mut world)).is_empty();

    assert_eq!(world.get::<Velocity>(enemy).unwrap().0, Vec2::ZERO);
    assert_eq!(common::current_key(&world, enemy), Some("idle".to_string()));
}

#[test]
fn test_dead_enemy_does_nothing() {
    let (mut world, _, enemy) = setup(Vec2::new(30.0, 0.0));
    *world.get_mut::<Lifecycle>(enemy).unwrap() = Lifecycle::Dead;

    assert_that(&run_ai(&mut world)).is_empty();
    assert_eq!(mode(&world, enemy), EnemyMode::Idle);
}

#[test]
fn test_attack_without_animation_does_not_suspend() {
    let config = common::test_config();
    let mut catalog = common::full_catalog(&config);
    catalog.remove("moose1_attack1");
    let mut world = Game::new(config, &catalog).expect("Test game should build").world;
    let player = common::player_entity(&mut world);
    let origin = world.get::<Position>(player).unwrap().0;
    let enemy = common::spawn_test_enemy(&mut world, origin + Vec2::new(50.0, 0.0));

    let requests = run_ai(&mut world);

    assert_eq!(requests, vec![DamageRequest { target: player, amount: 15 }]);
    assert_eq!(mode(&world, enemy), EnemyMode::Idle);
    assert_that(&world.get::<PendingActions>(enemy).unwrap().is_empty()).is_true();
}
