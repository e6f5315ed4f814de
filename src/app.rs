//! Application model: routes, view state and the playback controller.
//!
//! Views emit intents; the model is the sole mutator of its state and
//! answers each intent with the network command to issue, if any. The
//! event loop forwards those commands to the net worker and feeds the
//! completions back through [`App::apply_net_event`].

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
