//! Coordinate mapping and Moore-neighborhood lookup on a square grid

use crate::core::types::{CellId, EdgePolicy};

/// Offsets of the 8 Moore neighbors
pub const MOORE_OFFSETS: [(i64, i64); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// `(x, y)` of a row-major index: `x = id / size`, `y = id % size`
#[inline]
pub fn coords(cell: CellId, size: usize) -> (usize, usize) {
    (cell.index() / size, cell.index() % size)
}

#[inline]
pub fn cell_at(x: usize, y: usize, size: usize) -> CellId {
    CellId(x * size + y)
}

/// Resolve possibly out-of-range coordinates under the edge policy
///
/// `None` means the coordinate is off the grid and reads as Empty.
#[inline]
pub fn resolve(x: i64, y: i64, size: usize, edges: EdgePolicy) -> Option<CellId> {
    let side = size as i64;
    match edges {
        EdgePolicy::Bounded => {
            if x < 0 || y < 0 || x >= side || y >= side {
                None
            } else {
                Some(cell_at(x as usize, y as usize, size))
            }
        }
        EdgePolicy::Toroidal => Some(cell_at(
            x.rem_euclid(side) as usize,
            y.rem_euclid(side) as usize,
            size,
        )),
    }
}

/// The 8 neighbor slots of a cell, `None` for off-grid slots
pub fn moore_neighbors(cell: CellId, size: usize, edges: EdgePolicy) -> [Option<CellId>; 8] {
    let (x, y) = coords(cell, size);
    let (x, y) = (x as i64, y as i64);
    MOORE_OFFSETS.map(|(dx, dy)| resolve(x + dx, y + dy, size, edges))
}
