//! Core of the aeroread RSVP reader.
//!
//! Everything here is clock-free: hosts pass `now_ms` into each frame.

pub mod engine;
pub mod error;
pub mod input;
pub mod pacing;
pub mod ramp;
pub mod reader;
pub mod render;
pub mod session;
pub mod settings;
pub mod text;
