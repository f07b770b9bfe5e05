#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

use std::env;
use std::fs;

use anyhow::Context;
use brawler::animation::AnimState;
use brawler::asset::{image_key, AssetCatalog};
use brawler::config::GameConfig;
use brawler::constants::LOOP_TIME;
use brawler::formatter;
use brawler::game::Game;
use glam::Vec2;
use tracing::info;

/// Number of 60 Hz ticks the scripted demo runs for.
const DEMO_TICKS: u32 = 600;

/// Registers a horizontal strip for every image the configuration can ask for.
fn demo_catalog(config: &GameConfig) -> AssetCatalog {
    let mut catalog = AssetCatalog::new();
    for class in config.animation_classes() {
        let states = class.states.iter().chain(&class.sheet.attack_variants).copied();
        for state in states.collect::<Vec<AnimState>>() {
            let frames = class.sheet.frame_counts.get(&state).copied().unwrap_or(1);
            let (width, height) = class
                .sheet
                .frame_size
                .map_or((64, 64), |size| (size.width, size.height));

            catalog.insert(image_key(&class.prefix, state, None), width * frames, height);
            for &direction in &class.directions {
                catalog.insert(image_key(&class.prefix, state, Some(direction)), width * frames, height);
            }
        }
    }
    catalog
}

fn load_config() -> anyhow::Result<GameConfig> {
    match env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            GameConfig::from_json_str(&json).with_context(|| format!("parsing {path}"))
        }
        None => Ok(GameConfig::default()),
    }
}

/// Scripted input: walk toward the first enemy, swing, dash away, then shoot.
fn scripted_input(game: &mut Game, tick: u32) {
    match tick {
        0 => game.on_movement_input_changed(Vec2::new(-1.0, -1.0)),
        90 => game.on_movement_input_changed(Vec2::ZERO),
        91 | 130 | 170 => game.on_attack_input(Vec2::new(200.0, 200.0)),
        200 => {
            game.on_movement_input_changed(Vec2::new(1.0, 0.0));
            game.on_dash_input();
        }
        260 => {
            game.on_movement_input_changed(Vec2::ZERO);
            game.switch_weapon();
        }
        t if t > 270 && t % 30 == 0 => game.on_attack_input(Vec2::new(450.0, 350.0)),
        _ => {}
    }
}

fn main() -> anyhow::Result<()> {
    formatter::init_logging().context("installing tracing subscriber")?;

    let config = load_config()?;
    let catalog = demo_catalog(&config);
    info!(images = catalog.len(), "Asset catalog ready");

    let mut game = Game::new(config, &catalog)?;
    let delta_ms = LOOP_TIME.as_millis() as u64;

    for tick in 0..DEMO_TICKS {
        scripted_input(&mut game, tick);
        if !game.tick(delta_ms) {
            info!(tick, "Game over");
            break;
        }
        if tick % 60 == 0 {
            let hud = game.hud();
            info!(
                health = hud.health,
                weapon = %hud.weapon,
                animation = ?hud.animation_key,
                enemies = hud.enemies_alive,
                "HUD"
            );
        }
    }

    let hud = game.hud();
    info!(now_ms = game.now_ms(), health = hud.health, enemies = hud.enemies_alive, game_over = hud.game_over, "Demo finished");
    Ok(())
}
