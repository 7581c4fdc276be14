//! Rendering seam
//!
//! The scene graph hands `(world transform, model)` pairs to a
//! [`RenderBackend`]. Per-frame values travel in an explicit
//! [`RenderContext`] instead of process-wide state.

use thiserror::Error;

use crate::foundation::math::Mat4;

pub mod backend;
pub mod mesh_buffers;

pub use backend::{render_scene, BackendResult, RenderBackend};
pub use mesh_buffers::MeshBuffers;

/// Per-frame values shared by every draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    /// Camera view matrix, used as the parent of the scene root
    pub view: Mat4,
    /// Frame counter, starting at zero
    pub frame: u64,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(Mat4::identity())
    }
}

impl RenderContext {
    /// Context for frame zero with the given view
    pub fn new(view: Mat4) -> Self {
        Self { view, frame: 0 }
    }

    /// Move the camera
    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
    }

    /// Step to the next frame
    pub fn advance_frame(&mut self) {
        self.frame += 1;
    }
}

/// Rendering errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Backend initialization failed
    #[error("Failed to initialize renderer: {0}")]
    InitializationFailed(String),

    /// A draw could not be issued
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// Resource creation failed
    #[error("Failed to create resource: {0}")]
    ResourceCreationFailed(String),
}
