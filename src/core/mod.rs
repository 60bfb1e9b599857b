//! Core logic – document model, easing math, and the drift state machine.
//!
//! Nothing in this module depends on any TUI or rendering crate, and
//! nothing here reads the clock — callers pass `Instant`s in.

pub mod autoscroll;
pub mod document;
pub mod easing;
