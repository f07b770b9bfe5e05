//! The Entity-Component-System (ECS) module.
//!
//! This module contains all the ECS-related logic, including components, systems,
//! and resources.

use bevy_ecs::event::{Event, EventReader, Events};
use bevy_ecs::system::{Res, ResMut};
use tracing::error;

use crate::error::GameError;

pub mod animation;
pub mod combat;
pub mod components;
pub mod deferred;
pub mod enemy;
pub mod hud;
pub mod movement;
pub mod player;
pub mod projectile;
pub mod timers;

pub use self::components::*;

/// Run condition: gameplay systems only run until the game is over.
pub fn game_running(outcome: Res<GameOutcome>) -> bool {
    outcome.is_running()
}

/// Swaps the event buffers once per tick, so unread events live for exactly two ticks.
pub fn maintain_events<E: Event>(mut events: ResMut<Events<E>>) {
    events.update();
}

/// Logs every error raised by systems this tick.
pub fn error_log_system(mut errors: EventReader<GameError>) {
    for err in errors.read() {
        error!(error = %err, "System error");
    }
}
