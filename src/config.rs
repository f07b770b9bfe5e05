//! Tuning and content configuration.
//!
//! The configuration is loaded once, validated, and then shared read-only. No
//! system mutates it; per-entity copies of the values they need are taken at spawn.

use std::collections::HashMap;

use glam::{UVec2, Vec2};
use serde::Deserialize;

use crate::animation::{AnimState, ClassId};
use crate::direction::Direction;
use crate::error::ConfigError;

/// The registry-facing part of an entity class: how its images are named and cut.
#[derive(Debug, Clone)]
pub struct AnimationClass {
    pub id: ClassId,
    pub prefix: String,
    pub states: Vec<AnimState>,
    pub directions: Vec<Direction>,
    pub sheet: SpriteSheetConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl From<FrameSize> for UVec2 {
    fn from(size: FrameSize) -> Self {
        UVec2::new(size.width, size.height)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpriteSheetConfig {
    /// Explicit frame counts; these always win over estimation.
    pub frame_counts: HashMap<AnimState, u32>,
    /// Explicit frame size; when absent the source width is split evenly.
    pub frame_size: Option<FrameSize>,
    /// Estimate missing frame counts from image proportions instead of assuming one frame.
    pub auto_detect_frames: bool,
    pub attack_variants: Vec<AnimState>,
    pub attack_alternate: bool,
}

impl Default for SpriteSheetConfig {
    fn default() -> Self {
        Self {
            frame_counts: HashMap::new(),
            frame_size: None,
            auto_detect_frames: false,
            attack_variants: vec![AnimState::Attack1],
            attack_alternate: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl WorldConfig {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub speed_multiplier: f32,
    /// Active window, in milliseconds.
    pub duration: u64,
    /// Re-trigger gate, in milliseconds.
    pub cooldown: u64,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 2.5,
            duration: 225,
            cooldown: 800,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub health: u32,
    /// Pixels per second.
    pub speed: f32,
    pub dash: DashConfig,
    pub asset_prefix: String,
    /// Milliseconds of invulnerability after taking damage.
    pub invulnerability_duration: u64,
    pub collision_radius: f32,
    pub sprite_sheet: SpriteSheetConfig,
    /// Weapon equipped at spawn; must name an entry in [`GameConfig::weapons`].
    pub starting_weapon: String,
    /// `None` spawns the player at the world center.
    pub spawn: Option<[f32; 2]>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            health: 100,
            speed: 200.0,
            dash: DashConfig::default(),
            asset_prefix: "player".to_string(),
            invulnerability_duration: 1000,
            collision_radius: 40.0,
            sprite_sheet: SpriteSheetConfig {
                frame_counts: HashMap::from([
                    (AnimState::Idle, 8),
                    (AnimState::Move, 8),
                    (AnimState::Attack1, 8),
                    (AnimState::Attack2, 8),
                    (AnimState::Hit, 4),
                    (AnimState::Death, 7),
                    (AnimState::Dash, 7),
                ]),
                frame_size: Some(FrameSize { width: 64, height: 64 }),
                auto_detect_frames: true,
                attack_variants: vec![AnimState::Attack1, AnimState::Attack2],
                attack_alternate: true,
            },
            starting_weapon: "sword".to_string(),
            spawn: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectileConfig {
    /// Pixels per second.
    pub speed: f32,
    pub max_distance: f32,
    pub collision_radius: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WeaponKind {
    Melee {
        range: f32,
        /// Milliseconds before the player returns to locomotion.
        attack_duration: u64,
    },
    Ranged {
        projectile: ProjectileConfig,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeaponConfig {
    pub name: String,
    pub damage: u32,
    /// Milliseconds between attacks.
    pub cooldown: u64,
    #[serde(flatten)]
    pub kind: WeaponKind,
}

impl WeaponConfig {
    /// The melee reach, if this is a melee weapon.
    pub fn melee_range(&self) -> Option<f32> {
        match self.kind {
            WeaponKind::Melee { range, .. } => Some(range),
            WeaponKind::Ranged { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnemyConfig {
    pub health: u32,
    pub speed: f32,
    pub damage: u32,
    pub attack_range: f32,
    pub vision_range: f32,
    /// Milliseconds between attacks.
    pub attack_cooldown: u64,
    pub asset_prefix: String,
    #[serde(default = "EnemyConfig::default_collision_radius")]
    pub collision_radius: f32,
    #[serde(default)]
    pub directions: Vec<Direction>,
    #[serde(default)]
    pub sprite_sheet: SpriteSheetConfig,
}

impl EnemyConfig {
    fn default_collision_radius() -> f32 {
        40.0
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnemySpawn {
    pub class: String,
    pub position: [f32; 2],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    /// Ordered; weapon switching cycles through this list.
    pub weapons: Vec<WeaponConfig>,
    pub enemies: HashMap<String, EnemyConfig>,
    pub spawns: Vec<EnemySpawn>,
    /// States every class is probed for.
    pub animation_states: Vec<AnimState>,
    /// Facings the player is probed for.
    pub directions: Vec<Direction>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let moose = EnemyConfig {
            health: 50,
            speed: 60.0,
            damage: 15,
            attack_range: 60.0,
            vision_range: 350.0,
            attack_cooldown: 3000,
            asset_prefix: "moose1".to_string(),
            collision_radius: EnemyConfig::default_collision_radius(),
            directions: Vec::new(),
            sprite_sheet: SpriteSheetConfig {
                frame_counts: HashMap::from([
                    (AnimState::Idle, 8),
                    (AnimState::Move, 8),
                    (AnimState::Attack1, 30),
                    (AnimState::Hit, 6),
                    (AnimState::Death, 15),
                ]),
                frame_size: Some(FrameSize { width: 57, height: 192 }),
                auto_detect_frames: false,
                attack_variants: vec![AnimState::Attack1],
                attack_alternate: false,
            },
        };

        Self {
            world: WorldConfig::default(),
            player: PlayerConfig::default(),
            weapons: vec![
                WeaponConfig {
                    name: "sword".to_string(),
                    damage: 20,
                    cooldown: 500,
                    kind: WeaponKind::Melee {
                        range: 80.0,
                        attack_duration: 200,
                    },
                },
                WeaponConfig {
                    name: "pistol".to_string(),
                    damage: 12,
                    cooldown: 400,
                    kind: WeaponKind::Ranged {
                        projectile: ProjectileConfig {
                            speed: 600.0,
                            max_distance: 500.0,
                            collision_radius: 8.0,
                        },
                    },
                },
            ],
            enemies: HashMap::from([("moose1".to_string(), moose)]),
            spawns: vec![
                EnemySpawn {
                    class: "moose1".to_string(),
                    position: [200.0, 200.0],
                },
                EnemySpawn {
                    class: "moose1".to_string(),
                    position: [450.0, 350.0],
                },
            ],
            animation_states: vec![
                AnimState::Idle,
                AnimState::Move,
                AnimState::Attack1,
                AnimState::Hit,
                AnimState::Death,
                AnimState::Dash,
            ],
            directions: Direction::DIRECTIONS.to_vec(),
        }
    }
}

impl GameConfig {
    /// Parses a JSON document; missing sections fall back to defaults. The result is validated.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects content that would otherwise fail at an arbitrary point during play.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::InvalidConfiguration(msg));

        if self.world.width <= 0.0 || self.world.height <= 0.0 {
            return invalid(format!("world size must be positive, got {}x{}", self.world.width, self.world.height));
        }
        if self.player.health == 0 {
            return invalid("player health must be positive".to_string());
        }
        if self.player.speed <= 0.0 || self.player.dash.speed_multiplier <= 0.0 {
            return invalid("player speed and dash multiplier must be positive".to_string());
        }
        validate_sheet("player", &self.player.sprite_sheet)?;

        if self.weapons.is_empty() {
            return invalid("at least one weapon must be configured".to_string());
        }
        for weapon in &self.weapons {
            match &weapon.kind {
                WeaponKind::Melee { range, .. } if *range <= 0.0 => {
                    return invalid(format!("weapon '{}' has a non-positive range", weapon.name));
                }
                WeaponKind::Ranged { projectile } if projectile.speed <= 0.0 || projectile.max_distance <= 0.0 => {
                    return invalid(format!("weapon '{}' has a non-positive projectile speed or distance", weapon.name));
                }
                _ => {}
            }
        }
        if self.weapon(&self.player.starting_weapon).is_none() {
            return invalid(format!("starting weapon '{}' is not configured", self.player.starting_weapon));
        }

        for (name, enemy) in &self.enemies {
            if enemy.health == 0 {
                return invalid(format!("enemy '{name}' health must be positive"));
            }
            if enemy.attack_range <= 0.0 || enemy.vision_range < enemy.attack_range {
                return invalid(format!(
                    "enemy '{name}' needs 0 < attack range ({}) <= vision range ({})",
                    enemy.attack_range, enemy.vision_range
                ));
            }
            validate_sheet(name, &enemy.sprite_sheet)?;
        }
        for spawn in &self.spawns {
            if !self.enemies.contains_key(&spawn.class) {
                return invalid(format!("spawn references unknown enemy class '{}'", spawn.class));
            }
        }

        Ok(())
    }

    pub fn weapon(&self, name: &str) -> Option<&WeaponConfig> {
        self.weapons.iter().find(|w| w.name == name)
    }

    pub fn player_class(&self) -> AnimationClass {
        AnimationClass {
            id: ClassId::new(self.player.asset_prefix.as_str()),
            prefix: self.player.asset_prefix.clone(),
            states: self.animation_states.clone(),
            directions: self.directions.clone(),
            sheet: self.player.sprite_sheet.clone(),
        }
    }

    pub fn enemy_class(&self, name: &str) -> Option<AnimationClass> {
        self.enemies.get(name).map(|enemy| AnimationClass {
            id: ClassId::new(name),
            prefix: enemy.asset_prefix.clone(),
            states: self.animation_states.clone(),
            directions: enemy.directions.clone(),
            sheet: enemy.sprite_sheet.clone(),
        })
    }

    /// Every class the animation library must know about.
    pub fn animation_classes(&self) -> Vec<AnimationClass> {
        let mut names: Vec<&String> = self.enemies.keys().collect();
        names.sort();

        std::iter::once(self.player_class())
            .chain(names.into_iter().filter_map(|name| self.enemy_class(name)))
            .collect()
    }
}

fn validate_sheet(owner: &str, sheet: &SpriteSheetConfig) -> Result<(), ConfigError> {
    if sheet.attack_alternate && sheet.attack_variants.is_empty() {
        return Err(ConfigError::InvalidConfiguration(format!(
            "'{owner}' enables attack alternation with no attack variants"
        )));
    }
    if let Some(state) = sheet.attack_variants.iter().find(|s| !s.is_attack()) {
        return Err(ConfigError::InvalidConfiguration(format!(
            "'{owner}' lists '{state}' as an attack variant"
        )));
    }
    if let Some((state, _)) = sheet.frame_counts.iter().find(|(_, count)| **count == 0) {
        return Err(ConfigError::InvalidConfiguration(format!(
            "'{owner}' declares zero frames for '{state}'"
        )));
    }
    if let Some(size) = sheet.frame_size {
        if size.width == 0 || size.height == 0 {
            return Err(ConfigError::InvalidConfiguration(format!(
                "'{owner}' declares an empty frame size"
            )));
        }
    }
    Ok(())
}
