//! Playback controller: the single authoritative owner of "what is
//! playing and where".
//!
//! Views emit intents (row selections, transport commands); the controller
//! mutates its own snapshot and drives the audio transport. Nothing else
//! writes playback state.

mod model;

pub use model::*;
