//! # Ignite Timer Core Library
//!
//! This library provides the core logic for the Ignite countdown timer.
//! Front-ends (the `ignite-cli` binary, or any other view layer) hold a
//! [`CycleContext`] and render from its snapshots; they never mutate cycle
//! state directly.
//!
//! ## Architecture
//!
//! - **Cycle Store**: the single source of truth for cycle history, the active
//!   cycle and the elapsed-seconds counter
//! - **Countdown Driver**: a clock-derived state machine that is ticked once
//!   per period while a cycle is active, detecting completion
//! - **Context**: a shared, cloneable handle over the store that publishes the
//!   active cycle so the driver can start and cancel its tick
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`CycleStore`]: Cycle state and transitions
//! - [`CountdownDriver`]: Tick state machine and its tokio task
//! - [`CycleContext`]: Shared store handle
//! - [`Config`]: Application configuration management

pub mod context;
pub mod countdown;
pub mod cycle;
pub mod error;
pub mod events;
pub mod storage;

pub use context::{CycleContext, Snapshot};
pub use countdown::{
    Clock, CountdownDriver, DriverHandle, DriverState, ManualClock, MonotonicClock, Remaining,
    TickOutcome,
};
pub use cycle::{CreatePolicy, Cycle, CycleId, CycleStatus, CycleStore, NewCycle};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use storage::Config;
