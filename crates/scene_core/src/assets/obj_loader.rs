//! OBJ file loader for 3D models
//!
//! Reads `v`, `vn`, `vt`, `usemtl` and `f` statements and produces one
//! triangulated [`Face`] per `f` line.

use super::error::ParseError;
use super::face::{Face, FaceIndices, VertexData};
use super::sanitize::sanitize_lines;
use crate::foundation::math::{Vec2, Vec4};

/// OBJ geometry parser
pub struct ObjLoader;

impl ObjLoader {
    /// Parse OBJ text into faces
    ///
    /// Indices may only refer to vertex data declared above the face line.
    pub fn parse(contents: &str) -> Result<Vec<Face>, ParseError> {
        let mut positions: Vec<Vec4> = Vec::new();
        let mut normals: Vec<Vec4> = Vec::new();
        let mut uvs: Vec<Vec2> = Vec::new();
        let mut current_material: Option<String> = None;
        let mut faces = Vec::new();

        for line in sanitize_lines(contents) {
            // Whole-token keywords, so `vn`/`vt` can never be read as `v`
            match line.keyword() {
                "vn" => {
                    let [x, y, z] = line.floats::<3>()?;
                    normals.push(Vec4::new(x, y, z, 0.0));
                }
                "vt" => {
                    // Flip v for the backend's top-left texture origin
                    let [u, v] = line.floats::<2>()?;
                    uvs.push(Vec2::new(u, 1.0 - v));
                }
                "v" => {
                    let [x, y, z] = line.floats::<3>()?;
                    positions.push(Vec4::new(x, y, z, 1.0));
                }
                "usemtl" => {
                    let name = line.rest();
                    current_material = (!name.is_empty()).then(|| name.to_string());
                }
                "f" => {
                    let indices = FaceIndices::parse(line.values(), line.number)?;
                    let data = VertexData {
                        positions: &positions,
                        normals: &normals,
                        uvs: &uvs,
                    };
                    faces.push(Face::triangulate(&indices, data, current_material.clone(), line.number)?);
                }
                _ => {
                    // Ignore other commands
                }
            }
        }

        log::debug!(
            "Parsed {} position(s), {} normal(s), {} uv(s) into {} face(s)",
            positions.len(),
            normals.len(),
            uvs.len(),
            faces.len()
        );

        Ok(faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::error::Attribute;
    use approx::assert_relative_eq;

    #[test]
    fn test_index_resolves_to_declared_position() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 7 8 9\nf 4 2 3\n";
        let faces = ObjLoader::parse(obj).unwrap();

        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].triangle(0), Some([[7.0, 8.0, 9.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]));
    }

    #[test]
    fn test_uv_v_component_is_flipped() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0.2 0.3\nf 1/1 2/1 3/1\n";
        let faces = ObjLoader::parse(obj).unwrap();

        let uv = &faces[0].tex_coords()[0..2];
        assert_relative_eq!(uv[0], 0.2, epsilon = 1e-6);
        assert_relative_eq!(uv[1], 0.7, epsilon = 1e-6);
    }

    #[test]
    fn test_normals_and_uvs_with_quad() {
        let obj = r#"
# quad
v -1 -1 0
v  1 -1 0
v  1  1 0
v -1  1 0
vn 0 0 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
"#;
        let faces = ObjLoader::parse(obj).unwrap();
        let face = &faces[0];

        assert_eq!(face.triangle_count(), 2);
        assert_eq!(face.normals().len(), face.positions().len());
        assert_eq!(face.tex_coords().len(), face.vertex_count() * 2);
        assert!(face.normals().chunks_exact(3).all(|n| n == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_usemtl_assigns_material_to_following_faces() {
        let obj = r#"
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
usemtl red
f 1 2 3
usemtl blue
f 3 2 1
"#;
        let faces = ObjLoader::parse(obj).unwrap();
        let materials: Vec<_> = faces.iter().map(Face::material).collect();
        assert_eq!(materials, vec![None, Some("red"), Some("blue")]);
    }

    #[test]
    fn test_unknown_statements_are_ignored() {
        let obj = "mtllib scene.mtl\no Cube\ns off\ng group\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        assert_eq!(ObjLoader::parse(obj).unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_coordinate_fails() {
        let err = ObjLoader::parse("v 0 0 0\nv 1 x 0\n").unwrap_err();
        assert_eq!(err, ParseError::MalformedNumber { line: 2, token: "x".to_string() });
    }

    #[test]
    fn test_forward_reference_is_out_of_range() {
        let err = ObjLoader::parse("v 0 0 0\nv 1 0 0\nf 1 2 3\nv 0 1 0\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::IndexOutOfRange { line: 3, attribute: Attribute::Position, index: 3, available: 2 }
        );
    }

    #[test]
    fn test_position_only_face_leaves_attributes_empty() {
        let faces = ObjLoader::parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nv 0 2 0\nf 1 2 3 4 5\n").unwrap();
        assert_eq!(faces[0].triangle_count(), 3);
        assert!(!faces[0].has_normals());
        assert!(!faces[0].has_tex_coords());
    }
}
