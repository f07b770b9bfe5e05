use std::sync::Arc;

use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use bitflags::bitflags;
use glam::Vec2;

use crate::animation::AnimationPlayer;
use crate::config::GameConfig;
use crate::direction::Direction;
use crate::systems::deferred::PendingActions;
use crate::systems::enemy::{EnemyBrain, EnemyStats};
use crate::systems::movement::{Position, Velocity};
use crate::systems::player::{Arsenal, AttackVariantCycle, PlayerAction};
use crate::systems::timers::{DamageFlash, DashAbility, Invulnerability};

/// A tag component for entities that are controlled by the player.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// A tag component for hostile entities driven by the enemy AI.
#[derive(Default, Component)]
pub struct Enemy;

/// The cardinal direction an entity is facing.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Facing(pub Direction);

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }
}

/// Whether an entity still takes part in gameplay. `Dead` is terminal.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Alive,
    Dead,
}

impl Lifecycle {
    pub fn is_alive(self) -> bool {
        self == Lifecycle::Alive
    }
}

bitflags! {
    #[derive(Component, Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct CollisionLayer: u8 {
        const PLAYER = 1 << 0;
        const ENEMY = 1 << 1;
        const BULLET = 1 << 2;
        const WALL = 1 << 3;
    }
}

/// Circular collision body.
#[derive(Component, Debug, Clone, Copy)]
pub struct Collider {
    pub radius: f32,
}

impl Collider {
    pub fn overlaps(&self, a: Vec2, other: &Collider, b: Vec2) -> bool {
        a.distance(b) <= self.radius + other.radius
    }
}

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: PlayerControlled,
    pub position: Position,
    pub velocity: Velocity,
    pub facing: Facing,
    pub health: Health,
    pub lifecycle: Lifecycle,
    pub collider: Collider,
    pub layer: CollisionLayer,
    pub animation: AnimationPlayer,
    pub action: PlayerAction,
    pub arsenal: Arsenal,
    pub variants: AttackVariantCycle,
    pub dash: DashAbility,
    pub invulnerability: Invulnerability,
    pub flash: DamageFlash,
    pub pending: PendingActions,
}

#[derive(Bundle)]
pub struct EnemyBundle {
    pub enemy: Enemy,
    pub position: Position,
    pub velocity: Velocity,
    pub facing: Facing,
    pub health: Health,
    pub lifecycle: Lifecycle,
    pub collider: Collider,
    pub layer: CollisionLayer,
    pub animation: AnimationPlayer,
    pub stats: EnemyStats,
    pub brain: EnemyBrain,
    pub pending: PendingActions,
}

/// The accumulated game clock, in milliseconds. The only source of `now`.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameClock {
    pub now_ms: u64,
}

/// Time elapsed since the previous tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeltaTime {
    pub ms: u64,
}

impl DeltaTime {
    pub fn seconds(&self) -> f32 {
        self.ms as f32 / 1000.0
    }
}

/// Raw directional input as last reported; each component is -1, 0 or 1.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementInput(pub Vec2);

impl MovementInput {
    pub fn is_moving(&self) -> bool {
        self.0 != Vec2::ZERO
    }
}

/// Whether the run is still in progress.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameOutcome {
    #[default]
    Running,
    GameOver,
}

impl GameOutcome {
    pub fn is_running(&self) -> bool {
        *self == GameOutcome::Running
    }
}

/// The playable rectangle; everything except projectiles is kept inside it.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl WorldBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

/// Read-only tuning shared with every system.
#[derive(Resource, Debug, Clone)]
pub struct SharedConfig(pub Arc<GameConfig>);

/// What the HUD shows, refreshed at the end of every tick.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct HudSnapshot {
    pub health: u32,
    pub max_health: u32,
    pub weapon: String,
    /// Radius of the attack-range indicator; zero for ranged weapons.
    pub attack_range: f32,
    pub animation_key: Option<String>,
    pub player_dead: bool,
    pub game_over: bool,
    pub enemies_alive: usize,
}
