//! Spatial indexing: coordinate mapping, neighborhoods and cell sets

pub mod cell_set;
pub mod neighborhood;

pub use cell_set::CellSet;
