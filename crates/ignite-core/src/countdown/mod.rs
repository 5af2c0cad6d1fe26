mod clock;
mod display;
mod driver;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use display::{title, Remaining};
pub use driver::{CountdownDriver, DriverHandle, DriverState, TickOutcome, DEFAULT_TICK_PERIOD};
