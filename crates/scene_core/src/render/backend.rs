//! Backend abstraction for drawing placed models
//!
//! The scene only decides *what* is drawn and *where*; a backend decides how.

use super::{RenderContext, RenderError};
use crate::assets::{Model, ModelState};
use crate::foundation::math::Mat4;
use crate::scene::SceneGraph;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Draws one model at a time
pub trait RenderBackend {
    /// Draw a ready model with its accumulated world transform
    fn draw_model(&mut self, ctx: &RenderContext, world: &Mat4, model: &Model) -> BackendResult<()>;
}

/// Draw every ready model placed in `scene`
///
/// The traversal starts from `ctx.view`. Models still loading are skipped
/// and picked up on a later frame; failed models are skipped with a warning.
/// Returns the number of draws issued.
pub fn render_scene<B: RenderBackend + ?Sized>(
    scene: &SceneGraph,
    ctx: &RenderContext,
    backend: &mut B,
) -> BackendResult<usize> {
    let mut draws = 0;
    for (world, handle) in scene.traverse(ctx.view) {
        handle.with_model(|model| match model.state() {
            ModelState::Ready => {
                backend.draw_model(ctx, &world, model)?;
                draws += 1;
                Ok(())
            }
            ModelState::Loading => {
                log::debug!("Frame {}: {} still loading", ctx.frame, model.source().geometry);
                Ok(())
            }
            ModelState::Failed(err) => {
                log::warn!("Frame {}: skipping {}: {}", ctx.frame, model.source().geometry, err);
                Ok(())
            }
        })?;
    }
    Ok(draws)
}
