use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::animation::ClassId;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameCommand {
    /// Attack toward a world-space aim point.
    Attack(Vec2),
    Dash,
    /// The raw movement input changed; components may be any of -1, 0 or 1.
    Move(Vec2),
    SwitchWeapon,
}

#[derive(Event, Clone, Debug, PartialEq)]
pub enum GameEvent {
    Command(GameCommand),
    Damaged { target: Entity, amount: u32, remaining: u32 },
    Died { entity: Entity, class: ClassId },
    GameOver,
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}
