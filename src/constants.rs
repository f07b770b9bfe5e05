//! This module contains all the constants used by the game core.

use std::time::Duration;

/// Target duration of a single tick for the headless loop (60 Hz).
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// Upper bound for frame counts derived from image dimensions.
pub const MAX_ESTIMATED_FRAMES: u32 = 8;

/// Delay before a ranged attack hands the player back to locomotion, in milliseconds.
pub const RANGED_RECOVERY_MS: u64 = 200;

/// How long dash invulnerability outlives the dash itself, in milliseconds.
pub const DASH_INVULNERABILITY_TAIL_MS: u64 = 200;

/// Duration of the red flash shown on the player after taking damage, in milliseconds.
pub const DAMAGE_FLASH_MS: u64 = 200;

/// Frame edge used when a class declares no explicit frame size and no image is available.
pub const DEFAULT_FRAME_EDGE: u32 = 64;

/// Diagonal movement is scaled by this factor so that speed stays constant.
pub const DIAGONAL_FACTOR: f32 = std::f32::consts::FRAC_1_SQRT_2;

pub mod playback {
    //! Per-state playback rates (frames per second).

    pub const IDLE_FPS: u32 = 8;
    pub const MOVE_FPS: u32 = 12;
    pub const ATTACK_FPS: u32 = 15;
    pub const HIT_FPS: u32 = 10;
    pub const DEATH_FPS: u32 = 8;
    pub const DASH_FPS: u32 = 20;
}

pub mod estimate {
    //! Minimum frame counts the estimator assumes for each state.

    pub const IDLE_MIN_FRAMES: u32 = 1;
    pub const MOVE_MIN_FRAMES: u32 = 2;
    pub const ATTACK_MIN_FRAMES: u32 = 3;
    pub const HIT_MIN_FRAMES: u32 = 2;
    pub const DEATH_MIN_FRAMES: u32 = 4;
    pub const DASH_MIN_FRAMES: u32 = 2;
}
