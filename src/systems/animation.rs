use bevy_ecs::system::{Query, Res};

use crate::animation::AnimationPlayer;
use crate::systems::components::DeltaTime;

/// Advances the frame of every entity's current animation.
pub fn animation_system(delta_time: Res<DeltaTime>, mut players: Query<&mut AnimationPlayer>) {
    if delta_time.ms == 0 {
        return;
    }
    for mut player in players.iter_mut() {
        player.tick(delta_time.ms);
    }
}
