use serde::Deserialize;
use strum_macros::{AsRefStr, Display, EnumIter, IntoStaticStr};

use crate::constants::{estimate, playback};

/// A named logical action an entity can be shown performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, IntoStaticStr, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AnimState {
    Idle,
    Move,
    Attack1,
    Attack2,
    Hit,
    Death,
    Dash,
}

/// Whether an animation restarts after its last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPolicy {
    Infinite,
    Once,
}

impl AnimState {
    pub fn is_attack(self) -> bool {
        matches!(self, AnimState::Attack1 | AnimState::Attack2)
    }

    /// Playback rate in frames per second.
    pub const fn fps(self) -> u32 {
        match self {
            AnimState::Idle => playback::IDLE_FPS,
            AnimState::Move => playback::MOVE_FPS,
            AnimState::Attack1 | AnimState::Attack2 => playback::ATTACK_FPS,
            AnimState::Hit => playback::HIT_FPS,
            AnimState::Death => playback::DEATH_FPS,
            AnimState::Dash => playback::DASH_FPS,
        }
    }

    pub const fn loop_policy(self) -> LoopPolicy {
        match self {
            AnimState::Idle | AnimState::Move => LoopPolicy::Infinite,
            _ => LoopPolicy::Once,
        }
    }

    /// The smallest frame count the estimator will report for this state.
    pub const fn min_estimated_frames(self) -> u32 {
        match self {
            AnimState::Idle => estimate::IDLE_MIN_FRAMES,
            AnimState::Move => estimate::MOVE_MIN_FRAMES,
            AnimState::Attack1 | AnimState::Attack2 => estimate::ATTACK_MIN_FRAMES,
            AnimState::Hit => estimate::HIT_MIN_FRAMES,
            AnimState::Death => estimate::DEATH_MIN_FRAMES,
            AnimState::Dash => estimate::DASH_MIN_FRAMES,
        }
    }
}
