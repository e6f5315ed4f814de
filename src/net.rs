//! Background worker for view-initiated backend calls.
//!
//! The UI thread never blocks on the network: it sends a [`NetCmd`] and
//! later drains the matching [`NetEvent`]. Each request carries the epoch
//! of the issuing view so completions that arrive after a navigation or a
//! newer request are dropped instead of acting on a stale view.

mod types;
mod worker;

pub use types::*;
pub use worker::*;
