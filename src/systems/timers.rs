//! Cooldowns and duration windows, all measured against the game clock.

use bevy_ecs::component::Component;
use glam::Vec2;

/// The gate has not reopened yet. A normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownActive {
    pub remaining_ms: u64,
}

/// Fires at most once per `cooldown_ms`. A cooldown that never fired is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    cooldown_ms: u64,
    last_fired_at: Option<u64>,
}

impl Cooldown {
    pub fn new(cooldown_ms: u64) -> Self {
        Self {
            cooldown_ms,
            last_fired_at: None,
        }
    }

    pub fn remaining(&self, now: u64) -> u64 {
        self.last_fired_at
            .map_or(0, |at| (at + self.cooldown_ms).saturating_sub(now))
    }

    pub fn is_ready(&self, now: u64) -> bool {
        self.remaining(now) == 0
    }

    /// Records `now` as the firing time if the cooldown has elapsed.
    pub fn try_fire(&mut self, now: u64) -> Result<(), CooldownActive> {
        match self.remaining(now) {
            0 => {
                self.last_fired_at = Some(now);
                Ok(())
            }
            remaining_ms => Err(CooldownActive { remaining_ms }),
        }
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    /// Changes the gate length; the last firing time is kept.
    pub fn set_cooldown(&mut self, cooldown_ms: u64) {
        self.cooldown_ms = cooldown_ms;
    }

    pub fn last_fired_at(&self) -> Option<u64> {
        self.last_fired_at
    }
}

/// A short burst of movement gated by a cooldown.
#[derive(Component, Debug, Clone, Copy)]
pub struct DashAbility {
    cooldown: Cooldown,
    duration_ms: u64,
    pub speed_multiplier: f32,
    started_at: Option<u64>,
    /// Velocity held for the whole dash.
    pub velocity: Vec2,
}

impl DashAbility {
    pub fn new(duration_ms: u64, cooldown_ms: u64, speed_multiplier: f32) -> Self {
        Self {
            cooldown: Cooldown::new(cooldown_ms),
            duration_ms,
            speed_multiplier,
            started_at: None,
            velocity: Vec2::ZERO,
        }
    }

    /// Fails while a dash is running or while the cooldown has not elapsed.
    pub fn try_start(&mut self, now: u64) -> Result<(), CooldownActive> {
        if let Some(started_at) = self.started_at {
            return Err(CooldownActive {
                remaining_ms: (started_at + self.duration_ms).saturating_sub(now).max(1),
            });
        }
        self.cooldown.try_fire(now)?;
        self.started_at = Some(now);
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// True once the active window has run its full duration.
    pub fn expired(&self, now: u64) -> bool {
        self.started_at
            .is_some_and(|started_at| now.saturating_sub(started_at) >= self.duration_ms)
    }

    pub fn end(&mut self) {
        self.started_at = None;
        self.velocity = Vec2::ZERO;
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }
}

/// Damage immunity, stored as an expiry timestamp.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Invulnerability {
    expires_at: u64,
}

impl Invulnerability {
    /// Extends immunity to at least `now + duration_ms`. Never shortens an existing window.
    pub fn grant(&mut self, now: u64, duration_ms: u64) {
        self.expires_at = self.expires_at.max(now + duration_ms);
    }

    pub fn is_active(&self, now: u64) -> bool {
        now < self.expires_at
    }

    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }
}

/// The renderer tints the entity red while this is active.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageFlash {
    until: u64,
}

impl DamageFlash {
    pub fn trigger(&mut self, now: u64, duration_ms: u64) {
        self.until = now + duration_ms;
    }

    pub fn is_active(&self, now: u64) -> bool {
        now < self.until
    }
}
