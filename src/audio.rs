//! Media transport: a dedicated thread that owns the rodio output stream
//! and plays audio fetched from the server.
//!
//! The playback controller drives this module over an mpsc channel and
//! observes progress through the shared [`PlaybackHandle`].

mod player;
mod source;
mod thread;
mod types;

pub use player::*;
pub use types::*;

#[cfg(test)]
mod tests;
