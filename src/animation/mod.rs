//! # Assembly Animation
//!
//! Timed reveal of build components: easing curves, per-style reveal
//! interpolation, and the step sequencer driven by the engine tick.

pub mod easing;
pub mod reveal;
pub mod sequencer;

pub use easing::Easing;
pub use reveal::RevealParams;
pub use sequencer::{AssemblySequencer, SequencerEvent, SequencerState};
