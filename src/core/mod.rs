pub mod config;
pub mod error;
pub mod types;

pub use config::{OutputConfig, RunConfig, SimulationConfig};
pub use error::{Result, SimError};
pub use types::{CellId, Color, EdgePolicy, RelocationPolicy, StallPolicy, ThresholdPolicy, Tick};
