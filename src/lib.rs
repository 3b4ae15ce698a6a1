//! Schelling - residential segregation on a square grid

pub mod core;
pub mod renderer;
pub mod simulation;
pub mod spatial;
