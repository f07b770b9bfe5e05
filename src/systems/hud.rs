use bevy_ecs::query::With;
use bevy_ecs::system::{Query, Res, ResMut};

use crate::animation::AnimationPlayer;
use crate::systems::components::{Enemy, GameOutcome, Health, HudSnapshot, Lifecycle, PlayerControlled};
use crate::systems::player::Arsenal;

/// Copies the values the HUD displays into [`HudSnapshot`].
pub fn hud_system(
    outcome: Res<GameOutcome>,
    mut hud: ResMut<HudSnapshot>,
    player: Query<(&Health, &Lifecycle, &Arsenal, &AnimationPlayer), With<PlayerControlled>>,
    enemies: Query<&Lifecycle, With<Enemy>>,
) {
    let Ok((health, lifecycle, arsenal, animation)) = player.single() else {
        return;
    };

    let weapon = arsenal.current();
    let snapshot = HudSnapshot {
        health: health.current,
        max_health: health.max,
        weapon: weapon.map(|w| w.name.clone()).unwrap_or_default(),
        attack_range: weapon.and_then(|w| w.melee_range()).unwrap_or(0.0),
        animation_key: animation.current_key().map(str::to_string),
        player_dead: !lifecycle.is_alive(),
        game_over: !outcome.is_running(),
        enemies_alive: enemies.iter().filter(|l| l.is_alive()).count(),
    };

    if *hud != snapshot {
        *hud = snapshot;
    }
}
