//! GPU rendering subsystem.
//!
//! Renderers live in the application crate and issue GPU commands via wgpu;
//! this module provides the renderer-facing context and target handles.

mod ctx;

pub use ctx::{RenderCtx, RenderTarget, Viewport};
