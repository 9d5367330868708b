//! Domain types for barsim

pub mod bar;
pub mod equity;
pub mod position;
pub mod signal;
pub mod trade;

pub use bar::Bar;
pub use equity::{equity_curve, EquityRecord};
pub use position::PositionState;
pub use signal::Signal;
pub use trade::{pair_round_trips, RoundTrip, Trade, TradeSide};
