use bevy_ecs::{entity::Entity, system::RunSystemOnce, world::World};
use brawler::{
    animation::AnimationPlayer,
    events::GameEvent,
    game::Game,
    systems::{
        combat::{apply_damage, contact_damage_system, damage_system, DamageOutcome, DamageRequest},
        deferred::{DeferredAction, PendingActions},
        movement::{Position, Velocity},
        timers::{DamageFlash, Invulnerability},
        GameOutcome, Health, Lifecycle,
    },
};
use glam::Vec2;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

fn request(world: &mut World, target: Entity, amount: u32) {
    world.send_event(DamageRequest { target, amount });
    world.run_system_once(damage_system).expect("System should run successfully");
    common::drain_events::<DamageRequest>(world);
}

#[test]
fn test_damage_is_monotonic_with_single_death() {
    let mut health = Health::new(50);
    let mut lifecycle = Lifecycle::Alive;
    let mut outcomes = Vec::new();
    let mut previous = health.current;

    for now in 0..6 {
        outcomes.push(apply_damage(&mut health, &mut lifecycle, None, 12, now));
        assert_that(&health.current).is_less_than_or_equal_to(previous);
        previous = health.current;
    }

    assert_eq!(health.current, 0);
    assert_eq!(outcomes.iter().filter(|o| **o == DamageOutcome::Killed).count(), 1);
    assert_eq!(outcomes[4], DamageOutcome::Killed);
    assert_eq!(outcomes[5], DamageOutcome::Ignored);
}

#[test]
fn test_invulnerable_target_is_untouched() {
    let mut health = Health::new(100);
    let mut lifecycle = Lifecycle::Alive;
    let mut window = Invulnerability::default();
    window.grant(0, 1000);

    assert_eq!(apply_damage(&mut health, &mut lifecycle, Some(&window), 10, 500), DamageOutcome::Ignored);
    assert_eq!(health.current, 100);
    assert_eq!(
        apply_damage(&mut health, &mut lifecycle, Some(&window), 10, 1000),
        DamageOutcome::Damaged { remaining: 90 }
    );
}

#[test]
fn test_player_invulnerability_window() {
    let mut world = common::create_test_world();
    let player = common::player_entity(&mut world);

    common::set_clock(&mut world, 0);
    request(&mut world, player, 10);
    assert_eq!(world.get::<Health>(player).unwrap().current, 90);
    assert_that(&world.get::<DamageFlash>(player).unwrap().is_active(100)).is_true();

    common::set_clock(&mut world, 500);
    request(&mut world, player, 10);
    assert_eq!(world.get::<Health>(player).unwrap().current, 90);

    common::set_clock(&mut world, 1200);
    request(&mut world, player, 10);
    assert_eq!(world.get::<Health>(player).unwrap().current, 80);
}

#[test]
fn test_two_hits_in_one_tick_only_land_once() {
    let mut world = common::create_test_world();
    let player = common::player_entity(&mut world);

    world.send_event(DamageRequest { target: player, amount: 15 });
    world.send_event(DamageRequest { target: player, amount: 15 });
    world.run_system_once(damage_system).expect("System should run successfully");

    assert_eq!(world.get::<Health>(player).unwrap().current, 85);
}

#[test]
fn test_hit_plays_hit_animation() {
    let mut world = common::create_test_world();
    let enemy = common::spawn_test_enemy(&mut world, Vec2::new(100.0, 100.0));

    request(&mut world, enemy, 10);

    assert_eq!(common::current_key(&world, enemy), Some("hit".to_string()));
    assert_eq!(world.get::<Health>(enemy).unwrap().current, 40);
}

#[test]
fn test_enemy_death_schedules_removal_after_animation() {
    let mut world = common::create_test_world();
    let enemy = common::spawn_test_enemy(&mut world, Vec2::new(100.0, 100.0));
    world.get_mut::<Velocity>(enemy).unwrap().0 = Vec2::new(30.0, 0.0);
    common::set_clock(&mut world, 1000);

    request(&mut world, enemy, 500);

    assert_eq!(*world.get::<Lifecycle>(enemy).unwrap(), Lifecycle::Dead);
    assert_eq!(world.get::<Velocity>(enemy).unwrap().0, Vec2::ZERO);
    assert_eq!(common::current_key(&world, enemy), Some("death".to_string()));

    // 15 frames at 8 fps.
    let mut pending = world.get_mut::<PendingActions>(enemy).unwrap();
    assert_that(&pending.drain_due(2874).is_empty()).is_true();
    assert_eq!(pending.drain_due(2875).to_vec(), vec![DeferredAction::Despawn]);

    let died = common::drain_events::<GameEvent>(&mut world)
        .into_iter()
        .filter(|e| matches!(e, GameEvent::Died { .. }))
        .count();
    assert_eq!(died, 1);
}

#[test]
fn test_death_without_animation_removes_immediately() {
    let config = common::test_config();
    let mut catalog = common::full_catalog(&config);
    catalog.remove("moose1_death");
    let mut world = Game::new(config, &catalog).expect("Test game should build").world;
    let enemy = common::spawn_test_enemy(&mut world, Vec2::new(100.0, 100.0));
    common::set_clock(&mut world, 700);

    request(&mut world, enemy, 500);

    let mut pending = world.get_mut::<PendingActions>(enemy).unwrap();
    assert_eq!(pending.drain_due(700).to_vec(), vec![DeferredAction::Despawn]);
    assert_eq!(common::current_key(&world, enemy), Some("idle".to_string()));
}

#[test]
fn test_player_death_ends_the_game() {
    let mut world = common::create_test_world();
    let player = common::player_entity(&mut world);

    request(&mut world, player, 1000);

    assert_eq!(*world.resource::<GameOutcome>(), GameOutcome::GameOver);
    assert_that(&world.get::<AnimationPlayer>(player).unwrap().is_terminal()).is_true();
    // The player stays in the world to show its death animation.
    assert_that(&world.get::<PendingActions>(player).unwrap().is_empty()).is_true();

    let events = common::drain_events::<GameEvent>(&mut world);
    assert_that(&events.contains(&GameEvent::GameOver)).is_true();
}

#[test]
fn test_dead_target_takes_no_damage() {
    let mut world = common::create_test_world();
    let enemy = common::spawn_test_enemy(&mut world, Vec2::new(100.0, 100.0));
    request(&mut world, enemy, 500);
    common::drain_events::<GameEvent>(&mut world);

    request(&mut world, enemy, 10);

    assert_eq!(world.get::<Health>(enemy).unwrap().current, 0);
    assert_that(&common::drain_events::<GameEvent>(&mut world).is_empty()).is_true();
}

#[test]
fn test_contact_damage_on_overlap() {
    let mut world = common::create_test_world();
    let player = common::player_entity(&mut world);
    let player_position = world.get::<Position>(player).unwrap().0;

    // Player radius 40 plus moose radius 40.
    common::spawn_test_enemy(&mut world, player_position + Vec2::new(80.0, 0.0));
    common::spawn_test_enemy(&mut world, player_position + Vec2::new(0.0, 81.0));

    world.run_system_once(contact_damage_system).expect("System should run successfully");

    let requests = common::drain_events::<DamageRequest>(&mut world);
    assert_eq!(requests, vec![DamageRequest { target: player, amount: 15 }]);
}
