pub mod direction;
pub mod tilemap;

pub use direction::{Body, FaceDirection, MoveDirection};
pub use tilemap::{LayerType, Tilemap};
