use macroquad::math::{vec2, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction an entity is facing, used to pick directional animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceDirection {
    Undefined,
    Down,
    Left,
    Right,
    Up,
}

impl Default for FaceDirection {
    fn default() -> Self {
        FaceDirection::Down
    }
}

impl FaceDirection {
    /// The four real facings, in the order animation tables list them
    pub const ALL: [FaceDirection; 4] = [
        FaceDirection::Left,
        FaceDirection::Right,
        FaceDirection::Down,
        FaceDirection::Up,
    ];
}

impl fmt::Display for FaceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaceDirection::Undefined => "Undefined",
            FaceDirection::Down => "Down",
            FaceDirection::Left => "Left",
            FaceDirection::Right => "Right",
            FaceDirection::Up => "Up",
        };
        f.write_str(name)
    }
}

impl FromStr for FaceDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Down" | "down" => Ok(FaceDirection::Down),
            "Left" | "left" => Ok(FaceDirection::Left),
            "Right" | "right" => Ok(FaceDirection::Right),
            "Up" | "up" => Ok(FaceDirection::Up),
            "Undefined" | "undefined" => Ok(FaceDirection::Undefined),
            other => Err(format!("'{}' is not a face direction", other)),
        }
    }
}

/// Direction of travel carried by a start-move event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MoveDirection {
    #[default]
    None,
    Down,
    Left,
    Right,
    Up,
}

impl MoveDirection {
    pub fn to_face_direction(self) -> FaceDirection {
        match self {
            MoveDirection::Down => FaceDirection::Down,
            MoveDirection::Left => FaceDirection::Left,
            MoveDirection::Right => FaceDirection::Right,
            MoveDirection::Up => FaceDirection::Up,
            MoveDirection::None => FaceDirection::Undefined,
        }
    }

    pub fn from_face_direction(dir: FaceDirection) -> Self {
        match dir {
            FaceDirection::Down => MoveDirection::Down,
            FaceDirection::Left => MoveDirection::Left,
            FaceDirection::Right => MoveDirection::Right,
            FaceDirection::Up => MoveDirection::Up,
            FaceDirection::Undefined => MoveDirection::None,
        }
    }

    /// Screen-space unit vector (y grows downwards)
    pub fn unit_vector(self) -> Vec2 {
        match self {
            MoveDirection::Down => vec2(0.0, 1.0),
            MoveDirection::Up => vec2(0.0, -1.0),
            MoveDirection::Left => vec2(-1.0, 0.0),
            MoveDirection::Right => vec2(1.0, 0.0),
            MoveDirection::None => Vec2::ZERO,
        }
    }
}

/// Position and rotation of an entity in world pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Body {
    pub position: Vec2,
    pub rotation: f32,
}

impl Body {
    pub fn new(position: Vec2) -> Self {
        Self { position, rotation: 0.0 }
    }
}
