//! A render backend that reports draws to the log instead of a GPU

use scene_core::assets::Model;
use scene_core::foundation::math::Mat4;
use scene_core::render::{BackendResult, MeshBuffers, RenderBackend, RenderContext, RenderError};

/// Logs every draw with its triangle count and world position
#[derive(Debug, Default)]
pub struct LoggingBackend {
    draws: usize,
    uploaded_bytes: usize,
}

impl LoggingBackend {
    /// Total draws across all frames
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Total vertex data that would have been uploaded
    pub fn uploaded_bytes(&self) -> usize {
        self.uploaded_bytes
    }
}

impl RenderBackend for LoggingBackend {
    fn draw_model(&mut self, ctx: &RenderContext, world: &Mat4, model: &Model) -> BackendResult<()> {
        let buffers = MeshBuffers::from_model(model).map_err(|e| RenderError::ResourceCreationFailed(e.to_string()))?;
        let bytes = buffers.position_bytes().len()
            + buffers.normal_bytes().len()
            + buffers.tex_coord_bytes().len()
            + buffers.color_bytes().len();
        let textured = model
            .texture_path()
            .map_err(|e| RenderError::ResourceCreationFailed(e.to_string()))?;

        log::info!(
            "Frame {}: {} ({} triangles, {} bytes{}) at ({:.3}, {:.3}, {:.3})",
            ctx.frame,
            model.source().geometry,
            buffers.vertex_count() / 3,
            bytes,
            textured.map(|path| format!(", texture {}", path)).unwrap_or_default(),
            world[(0, 3)],
            world[(1, 3)],
            world[(2, 3)],
        );

        self.draws += 1;
        self.uploaded_bytes += bytes;
        Ok(())
    }
}
