//! Centralized error types for the game core.
//!
//! Configuration faults are fatal and surface while the game is being built.
//! Everything that can go wrong while ticking is either absorbed locally or
//! written to the ECS error channel and logged, so the loop keeps running.

use bevy_ecs::event::Event;

use crate::animation::AnimState;
use crate::direction::Direction;

/// Main error type for the game core.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Animation error: {0}")]
    Animation(#[from] AnimationError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Faults in tuning and content data. These indicate a content bug, never a runtime condition.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors related to animation lookup.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    #[error("No animation or image for {class}: {state} ({})", .direction.map_or("any direction", Direction::name))]
    MissingAsset {
        class: String,
        state: AnimState,
        direction: Option<Direction>,
    },

    #[error("Unknown animation class: {0}")]
    UnknownClass(String),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
