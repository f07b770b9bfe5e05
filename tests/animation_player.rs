use brawler::{
    animation::{AnimState, AnimationLibrary, AnimationPlayer, ClassId, PlayOutcome},
    asset::AssetCatalog,
    config::{AnimationClass, SpriteSheetConfig},
    direction::Direction,
};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

fn library(catalog: &AssetCatalog) -> AnimationLibrary {
    let class = AnimationClass {
        id: ClassId::new("hero"),
        prefix: "hero".to_string(),
        states: vec![AnimState::Idle, AnimState::Move, AnimState::Hit, AnimState::Death],
        directions: vec![Direction::Left, Direction::Right],
        sheet: SpriteSheetConfig {
            frame_counts: [(AnimState::Idle, 4), (AnimState::Move, 6), (AnimState::Hit, 2), (AnimState::Death, 4)]
                .into_iter()
                .collect(),
            ..SpriteSheetConfig::default()
        },
    };
    AnimationLibrary::build([&class], catalog).expect("library should build")
}

fn full_catalog() -> AssetCatalog {
    AssetCatalog::new()
        .with_image("hero_idle_left", 256, 64)
        .with_image("hero_idle_right", 256, 64)
        .with_image("hero_move", 384, 64)
        .with_image("hero_hit", 128, 64)
        .with_image("hero_death", 256, 64)
}

#[test]
fn test_repeated_play_is_idempotent() {
    let library = library(&full_catalog());
    let mut player = AnimationPlayer::new(ClassId::new("hero"));

    assert_eq!(
        player.play(&library, AnimState::Idle, Direction::Left),
        PlayOutcome::Changed("idle_left".to_string())
    );
    player.tick(300);
    let frame = player.frame();

    for _ in 0..10 {
        assert_eq!(player.play(&library, AnimState::Idle, Direction::Left), PlayOutcome::Unchanged);
    }
    assert_eq!(player.changes(), 1);
    assert_eq!(player.frame(), frame);
}

#[test]
fn test_new_direction_is_a_new_request() {
    let library = library(&full_catalog());
    let mut player = AnimationPlayer::new(ClassId::new("hero"));

    player.play(&library, AnimState::Idle, Direction::Left);
    let outcome = player.play(&library, AnimState::Idle, Direction::Right);

    assert_eq!(outcome, PlayOutcome::Changed("idle_right".to_string()));
    assert_eq!(player.changes(), 2);
}

#[test]
fn test_facing_change_keeps_non_directional_visual() {
    let library = library(&full_catalog());
    let mut player = AnimationPlayer::new(ClassId::new("hero"));

    assert_eq!(
        player.play(&library, AnimState::Move, Direction::Left),
        PlayOutcome::Changed("move".to_string())
    );
    player.tick(83 * 3);
    let frame = player.frame();

    assert_eq!(player.play(&library, AnimState::Move, Direction::Right), PlayOutcome::Unchanged);
    assert_eq!(player.requested_key(), Some("move_right"));
    assert_eq!(player.frame(), frame);
    assert_eq!(player.changes(), 1);
}

#[test]
fn test_finished_visual_restarts_on_new_request() {
    let library = library(&full_catalog());
    let mut player = AnimationPlayer::new(ClassId::new("hero"));

    player.play(&library, AnimState::Hit, Direction::Left);
    player.tick(500);
    assert_that(&player.is_finished()).is_true();

    assert_eq!(
        player.play(&library, AnimState::Hit, Direction::Right),
        PlayOutcome::Changed("hit".to_string())
    );
    assert_eq!(player.frame(), 0);
}

#[test]
fn test_missing_hit_does_not_restart_locomotion() {
    let catalog = AssetCatalog::new().with_image("hero_move", 384, 64);
    let library = library(&catalog);
    let mut player = AnimationPlayer::new(ClassId::new("hero"));

    player.play(&library, AnimState::Move, Direction::Left);
    player.tick(83 * 2);
    let frame = player.frame();

    assert!(matches!(player.play(&library, AnimState::Hit, Direction::Left), PlayOutcome::Missing(_)));
    assert_eq!(player.play(&library, AnimState::Move, Direction::Left), PlayOutcome::Unchanged);
    assert_eq!(player.frame(), frame);
    assert_eq!(player.changes(), 1);
}

#[test]
fn test_missing_asset_reported_once_per_request() {
    let library = library(&AssetCatalog::new().with_image("hero_idle_left", 256, 64));
    let mut player = AnimationPlayer::new(ClassId::new("hero"));
    player.play(&library, AnimState::Idle, Direction::Left);

    assert!(matches!(player.play(&library, AnimState::Hit, Direction::Left), PlayOutcome::Missing(_)));
    assert_eq!(player.play(&library, AnimState::Hit, Direction::Left), PlayOutcome::Unchanged);
    assert_eq!(player.current_key(), Some("idle_left"));
    assert_eq!(player.requested_state(), AnimState::Hit);
}

#[test]
fn test_dead_entity_only_accepts_death() {
    let library = library(&full_catalog());
    let mut player = AnimationPlayer::new(ClassId::new("hero"));

    player.play(&library, AnimState::Death, Direction::Right);
    assert_that(&player.is_terminal()).is_true();

    assert_eq!(player.play(&library, AnimState::Idle, Direction::Right), PlayOutcome::Locked);
    assert_eq!(player.play(&library, AnimState::Hit, Direction::Left), PlayOutcome::Locked);
    assert_eq!(player.current_key(), Some("death"));
}

#[test]
fn test_looping_animation_wraps() {
    let library = library(&full_catalog());
    let mut player = AnimationPlayer::new(ClassId::new("hero"));
    player.play(&library, AnimState::Move, Direction::Left);

    // 6 frames at 12 fps is 83 ms per frame.
    player.tick(83 * 7);
    assert_eq!(player.frame(), 1);
    assert_that(&player.is_finished()).is_false();
}

#[test]
fn test_play_once_holds_last_frame() {
    let library = library(&full_catalog());
    let mut player = AnimationPlayer::new(ClassId::new("hero"));
    player.play(&library, AnimState::Hit, Direction::Left);

    player.tick(100);
    assert_that(&player.is_playing(AnimState::Hit)).is_true();

    player.tick(500);
    assert_eq!(player.frame(), 1);
    assert_that(&player.is_finished()).is_true();
    assert_that(&player.is_playing(AnimState::Hit)).is_false();
}

#[test]
fn test_unknown_class_is_missing() {
    let library = library(&full_catalog());
    let mut player = AnimationPlayer::new(ClassId::new("bat"));

    assert!(matches!(player.play(&library, AnimState::Idle, Direction::Left), PlayOutcome::Missing(_)));
    assert_that(&player.current()).is_none();
}
