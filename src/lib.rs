//! Kinetic Terrain library - procedural height-field terrain generation

pub mod camera;
pub mod cli;
pub mod params;
pub mod rendering;
pub mod terrain;
pub mod texture;
