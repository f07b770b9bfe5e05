use bevy_ecs::component::Component;
use tracing::{debug, trace, warn};

use crate::animation::{animation_key, resolve, AnimState, AnimationLibrary, ClassId, LoopPolicy, ResolvedAnimation};
use crate::direction::Direction;
use crate::error::AnimationError;

/// What a [`AnimationPlayer::play`] request did.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayOutcome {
    /// Same request as last time; nothing restarted.
    Unchanged,
    /// A new visual started, identified by its animation key.
    Changed(String),
    /// Nothing could be resolved; the previous visual stays.
    Missing(AnimationError),
    /// The entity is dead and only accepts `death`.
    Locked,
}

/// Per-entity animation state: the last request, the current visual and its frame.
#[derive(Component, Debug, Clone)]
pub struct AnimationPlayer {
    class: ClassId,
    requested_state: AnimState,
    requested_key: Option<String>,
    current: Option<ResolvedAnimation>,
    current_frame: u32,
    elapsed_ms: u64,
    finished: bool,
    terminal: bool,
    changes: u32,
}

impl AnimationPlayer {
    pub fn new(class: ClassId) -> Self {
        Self {
            class,
            requested_state: AnimState::Idle,
            requested_key: None,
            current: None,
            current_frame: 0,
            elapsed_ms: 0,
            finished: false,
            terminal: false,
            changes: 0,
        }
    }

    /// Requests `state` facing `direction`.
    ///
    /// Repeating the previous request never restarts the animation, and neither does a
    /// new request that resolves to the visual already playing, such as a facing change
    /// on a class with only non-directional art. The request is remembered even when
    /// it cannot be resolved, so a missing asset is reported once per change of request.
    pub fn play(&mut self, library: &AnimationLibrary, state: AnimState, direction: Direction) -> PlayOutcome {
        if self.terminal && state != AnimState::Death {
            return PlayOutcome::Locked;
        }

        let key = animation_key(state, Some(direction));
        if self.requested_key.as_deref() == Some(key.as_str()) {
            return PlayOutcome::Unchanged;
        }
        self.requested_key = Some(key);
        self.requested_state = state;
        if state == AnimState::Death {
            self.terminal = true;
        }

        let resolved = library
            .get(&self.class)
            .ok_or_else(|| AnimationError::UnknownClass(self.class.to_string()))
            .and_then(|registry| resolve(registry, state, Some(direction)));

        match resolved {
            Ok(resolved) if !self.finished && self.current_key() == Some(resolved.key.as_str()) => {
                trace!(class = %self.class, key = %resolved.key, "Already playing");
                PlayOutcome::Unchanged
            }
            Ok(resolved) => {
                debug!(class = %self.class, key = %resolved.key, "Animation changed");
                let key = resolved.key.clone();
                self.current = Some(resolved);
                self.current_frame = 0;
                self.elapsed_ms = 0;
                self.finished = false;
                self.changes += 1;
                PlayOutcome::Changed(key)
            }
            Err(error) => {
                warn!(class = %self.class, state = %state, direction = ?direction, "{error}");
                PlayOutcome::Missing(error)
            }
        }
    }

    /// Advances the frame index. Looping animations wrap; the others hold their last frame.
    pub fn tick(&mut self, delta_ms: u64) {
        let Some(current) = &self.current else {
            return;
        };
        if self.finished {
            return;
        }

        let descriptor = &current.descriptor;
        self.elapsed_ms += delta_ms;
        let frames_elapsed = self.elapsed_ms / descriptor.frame_duration_ms().max(1);
        let frame_count = u64::from(descriptor.frame_count.max(1));

        match descriptor.loop_policy {
            LoopPolicy::Infinite => {
                self.current_frame = (frames_elapsed % frame_count) as u32;
            }
            LoopPolicy::Once if frames_elapsed >= frame_count => {
                self.current_frame = descriptor.frame_count.saturating_sub(1);
                self.finished = true;
                trace!(class = %self.class, key = %current.key, "Animation finished");
            }
            LoopPolicy::Once => {
                self.current_frame = frames_elapsed as u32;
            }
        }
    }

    pub fn class(&self) -> &ClassId {
        &self.class
    }

    /// The state of the last accepted request, whether or not it resolved.
    pub fn requested_state(&self) -> AnimState {
        self.requested_state
    }

    pub fn requested_key(&self) -> Option<&str> {
        self.requested_key.as_deref()
    }

    pub fn current(&self) -> Option<&ResolvedAnimation> {
        self.current.as_ref()
    }

    pub fn current_key(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.key.as_str())
    }

    pub fn frame(&self) -> u32 {
        self.current_frame
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True while the visual being shown was resolved for `state` and has not completed.
    pub fn is_playing(&self, state: AnimState) -> bool {
        !self.finished && self.current.as_ref().is_some_and(|c| c.descriptor.state == state)
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Number of times the visual actually changed.
    pub fn changes(&self) -> u32 {
        self.changes
    }
}
