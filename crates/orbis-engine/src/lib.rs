//! Orbis engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the viewer:
//! window loop, input translation, frame timing, and the wgpu device layer.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
