//! Backtesting engine — the bar-by-bar simulator and its run output.
//!
//! Per bar: read the close, ask the strategy, apply the all-in/all-out
//! transition at the close, then append the equity record.

pub mod simulator;
pub mod state;

pub use simulator::{simulate, SimulationError, Simulator};
pub use state::SimulationOutput;
