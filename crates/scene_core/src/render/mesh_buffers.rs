//! Flattened per-model vertex streams
//!
//! Concatenates every face of a model into one array per attribute plus a
//! per-vertex diffuse color, in the layout a vertex buffer upload expects.

use crate::assets::face::{COMPONENTS_PER_TEX_COORD, COMPONENTS_PER_VERTEX};
use crate::assets::{Color, Face, LoadError, Model};

/// Floats per vertex in the color array
pub const COMPONENTS_PER_COLOR: usize = 4;

/// Vertex streams for a whole model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    /// xyz per vertex
    pub positions: Vec<f32>,
    /// xyz per vertex, or empty when no face has normals
    pub normals: Vec<f32>,
    /// uv per vertex, or empty when no face has texture coordinates
    pub tex_coords: Vec<f32>,
    /// rgba diffuse color per vertex
    pub colors: Vec<f32>,
}

impl MeshBuffers {
    /// Flatten a ready model
    ///
    /// Faces without a material, or whose material has no `Kd`, are white.
    /// When only some faces carry normals or texture coordinates, the others
    /// are zero-filled so every stream stays aligned with `positions`.
    pub fn from_model(model: &Model) -> Result<Self, LoadError> {
        let faces = model.faces()?;
        let materials = model.materials()?;
        let any_normals = faces.iter().any(Face::has_normals);
        let any_tex_coords = faces.iter().any(Face::has_tex_coords);

        let mut buffers = Self::default();
        for face in faces {
            let vertices = face.vertex_count();
            buffers.positions.extend_from_slice(face.positions());

            if any_normals {
                extend_or_zero(&mut buffers.normals, face.normals(), vertices * COMPONENTS_PER_VERTEX);
            }
            if any_tex_coords {
                extend_or_zero(&mut buffers.tex_coords, face.tex_coords(), vertices * COMPONENTS_PER_TEX_COORD);
            }

            let color = face
                .material()
                .and_then(|name| materials.diffuse(name))
                .unwrap_or(Color::WHITE);
            for _ in 0..vertices {
                buffers.colors.extend_from_slice(&color.to_array());
            }
        }

        Ok(buffers)
    }

    /// Number of vertices (three per triangle)
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / COMPONENTS_PER_VERTEX
    }

    /// Position stream as bytes
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normal stream as bytes
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Texture coordinate stream as bytes
    pub fn tex_coord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tex_coords)
    }

    /// Color stream as bytes
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}

fn extend_or_zero(stream: &mut Vec<f32>, data: &[f32], len: usize) {
    if data.is_empty() {
        stream.resize(stream.len() + len, 0.0);
    } else {
        stream.extend_from_slice(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ModelSource;
    use crate::core::config::AssetConfig;

    fn ready_model(obj: &str, mtl: &str) -> Model {
        let mut model = Model::new(ModelSource::new("m.obj", "m.mtl"), AssetConfig::default());
        model.load_geometry(obj).unwrap();
        model.load_materials(mtl).unwrap();
        model
    }

    #[test]
    fn test_streams_follow_faces_and_materials() {
        let obj = r#"
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
usemtl red
f 1 2 3
usemtl unknown
f 2 4 3
f 1 2 4 3
"#;
        let model = ready_model(obj, "newmtl red\nKd 1 0 0\n");
        let buffers = MeshBuffers::from_model(&model).unwrap();

        assert_eq!(buffers.vertex_count(), 3 + 3 + 6);
        assert_eq!(buffers.colors.len(), buffers.vertex_count() * 4);
        assert_eq!(&buffers.colors[0..4], &[1.0, 0.0, 0.0, 1.0]);
        assert_eq!(&buffers.colors[12..16], &[1.0, 1.0, 1.0, 1.0]);
        assert!(buffers.normals.is_empty());
        assert!(buffers.tex_coords.is_empty());
        assert_eq!(buffers.position_bytes().len(), buffers.positions.len() * 4);
    }

    #[test]
    fn test_partial_normals_are_zero_filled() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\nf 1 2 3\n";
        let buffers = MeshBuffers::from_model(&ready_model(obj, "")).unwrap();

        assert_eq!(buffers.normals.len(), buffers.positions.len());
        assert_eq!(&buffers.normals[0..3], &[0.0, 0.0, 1.0]);
        assert!(buffers.normals[9..].iter().all(|&n| n == 0.0));
    }

    #[test]
    fn test_requires_ready_model() {
        let model = Model::new(ModelSource::new("m.obj", "m.mtl"), AssetConfig::default());
        assert_eq!(MeshBuffers::from_model(&model), Err(LoadError::NotReady));
    }
}
