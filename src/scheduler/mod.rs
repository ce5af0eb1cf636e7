//! Chime scheduling module.
//!
//! Provides the tick-driven decision engine, its clock sources, and the
//! background ticker that drives it.

pub mod chime;
pub mod clock;
pub mod ticker;

// Re-export commonly used items
pub use chime::{ChimeScheduler, IntervalSwitches, TickOutcome};
pub use clock::{Clock, ManualClock, SystemClock};
pub use ticker::Ticker;
