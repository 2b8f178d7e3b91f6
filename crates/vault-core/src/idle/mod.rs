//! Inactivity handling.
//!
//! - `deadline`: single owned cancellable deadline (`Deadline`)
//! - `monitor`: idle-timeout sign-out (`InactivityMonitor`)

mod deadline;
mod monitor;

pub use deadline::Deadline;
pub use monitor::{ActivityKind, InactivityMonitor, SuppressionPolicy, INACTIVITY_TIMEOUT};
