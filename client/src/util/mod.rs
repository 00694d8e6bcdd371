//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Browser APIs (Cache Storage, audio playback, the clock) are wrapped here so
//! state and components stay testable on native targets.

pub mod audio;
pub mod clock;
