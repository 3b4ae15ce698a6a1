//! A single grid slot

use serde::{Deserialize, Serialize};

use crate::core::types::{CellId, Color};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    pub x: usize,
    pub y: usize,
    pub state: Color,
    /// Cached verdict of the happiness rule; always true for Empty
    pub is_happy: bool,
}

impl Cell {
    /// New cell with coordinates derived from its row-major index
    ///
    /// Occupied cells start unhappy until their first evaluation.
    pub fn new(id: CellId, size: usize, state: Color) -> Self {
        Self {
            id,
            x: id.index() / size,
            y: id.index() % size,
            state,
            is_happy: state.is_empty(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

/// Map a draw in `[0, 1)` onto a color
///
/// `TypeA` below `white_rate`, `TypeB` below `white_rate + black_rate`,
/// Empty otherwise.
pub fn assign_color(draw: f64, white_rate: f64, black_rate: f64) -> Color {
    if draw < white_rate {
        Color::TypeA
    } else if draw < white_rate + black_rate {
        Color::TypeB
    } else {
        Color::Empty
    }
}
