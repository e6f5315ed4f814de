//! HTTP client for the MusicBox backend.
//!
//! The backend owns conversion, storage and audio serving; this module is
//! the only place that knows its endpoints and wire formats.

mod client;
mod format;
mod types;

pub use client::*;
pub use format::*;
pub use types::*;

#[cfg(test)]
mod tests;
