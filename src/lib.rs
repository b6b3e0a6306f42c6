//! Dialogue Voice: game dialogue preparation for speech synthesis.
//!
//! Turns templated script lines into text a TTS engine can speak: engine
//! placeholder tokens are resolved, non-verbal vocalizations are detected and
//! respelled, and each line is given an emotion setting from manual labels,
//! per-speaker presets or keyword inference. Planning is deterministic and
//! does no audio work.

pub mod config;
pub mod core;
pub mod schema;
