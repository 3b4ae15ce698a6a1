//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};

/// Row-major index of a cell in the grid (`x * size + y`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub usize);

impl CellId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Simulation tick counter
pub type Tick = u64;

/// State of a single grid slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    #[default]
    Empty,
    TypeA,
    TypeB,
}

impl Color {
    pub fn is_empty(self) -> bool {
        self == Color::Empty
    }

    /// Name used by the text log ("white" / "black" / "empty")
    pub fn label(self) -> &'static str {
        match self {
            Color::Empty => "empty",
            Color::TypeA => "white",
            Color::TypeB => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the same-type neighbor count is compared with `happiness_cup`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// `count >= cup`
    #[default]
    AtLeast,
    /// `count > cup`
    Exceeds,
}

impl ThresholdPolicy {
    #[inline]
    pub fn satisfied(self, same_type: u32, cup: u32) -> bool {
        match self {
            ThresholdPolicy::AtLeast => same_type >= cup,
            ThresholdPolicy::Exceeds => same_type > cup,
        }
    }
}

/// Treatment of neighbor coordinates that fall outside the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Out-of-bounds neighbors (negative or `>= size`) read as Empty
    #[default]
    Bounded,
    /// Coordinates wrap around both axes
    Toroidal,
}

/// What happens to the two cells involved in a move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelocationPolicy {
    /// Agent and empty slot trade places; the agent is re-evaluated at its destination
    #[default]
    Swap,
    /// Color is copied to the empty slot; both slots are marked happy without evaluation
    ColorTransfer,
}

/// Loop reaction to a tick where unhappy cells exist but no empty cell does
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StallPolicy {
    /// Count the tick and keep going until the budget runs out
    #[default]
    Skip,
    /// Stop immediately in `LoopState::Stalled`
    Halt,
}
