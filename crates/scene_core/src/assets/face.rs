//! Faces and fan triangulation
//!
//! An `f` line is classified once into one of four index patterns, then
//! triangulated as a fan anchored at its first vertex. The result is stored
//! as flat `f32` arrays ready for upload.

use std::fmt;
use std::num::IntErrorKind;

use super::error::{Attribute, ParseError};
use crate::foundation::math::{Vec2, Vec4};

/// Floats per vertex in the position and normal arrays
pub const COMPONENTS_PER_VERTEX: usize = 3;

/// Floats per vertex in the texture coordinate array
pub const COMPONENTS_PER_TEX_COORD: usize = 2;

/// The four supported index group forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexPattern {
    /// `p`
    Position,
    /// `p/t`
    PositionUv,
    /// `p/t/n`
    PositionUvNormal,
    /// `p//n`
    PositionNormal,
}

impl IndexPattern {
    /// Whether groups of this pattern reference a texture coordinate
    pub fn has_uv(self) -> bool {
        matches!(self, Self::PositionUv | Self::PositionUvNormal)
    }

    /// Whether groups of this pattern reference a normal
    pub fn has_normal(self) -> bool {
        matches!(self, Self::PositionNormal | Self::PositionUvNormal)
    }
}

impl fmt::Display for IndexPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = match self {
            Self::Position => "p",
            Self::PositionUv => "p/t",
            Self::PositionUvNormal => "p/t/n",
            Self::PositionNormal => "p//n",
        };
        f.write_str(form)
    }
}

/// One parsed index group, with 1-based indices as written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexGroup {
    /// Position index
    pub position: usize,
    /// Texture coordinate index
    pub uv: Option<usize>,
    /// Normal index
    pub normal: Option<usize>,
}

impl IndexGroup {
    /// Parse a single `p`, `p/t`, `p//n` or `p/t/n` token
    pub fn parse(token: &str, line: usize) -> Result<Self, ParseError> {
        let malformed = || ParseError::MalformedIndexGroup {
            line,
            group: token.to_string(),
        };
        let parts: Vec<&str> = token.split('/').collect();
        let (position, uv, normal) = match parts.as_slice() {
            [p] => (*p, None, None),
            [p, t] if !t.is_empty() => (*p, Some(*t), None),
            [p, t, n] if !n.is_empty() => (*p, (!t.is_empty()).then_some(*t), Some(*n)),
            _ => return Err(malformed()),
        };
        if position.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            position: parse_index(position, line)?,
            uv: uv.map(|t| parse_index(t, line)).transpose()?,
            normal: normal.map(|n| parse_index(n, line)).transpose()?,
        })
    }

    /// The pattern this group was written in
    pub fn pattern(&self) -> IndexPattern {
        match (self.uv.is_some(), self.normal.is_some()) {
            (false, false) => IndexPattern::Position,
            (true, false) => IndexPattern::PositionUv,
            (true, true) => IndexPattern::PositionUvNormal,
            (false, true) => IndexPattern::PositionNormal,
        }
    }
}

/// Parse a 1-based index; digits too large for `usize` saturate so the range check rejects them
fn parse_index(token: &str, line: usize) -> Result<usize, ParseError> {
    match token.parse::<usize>() {
        Ok(index) => Ok(index),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => Ok(usize::MAX),
        Err(_) => Err(ParseError::MalformedNumber {
            line,
            token: token.to_string(),
        }),
    }
}

/// The index groups of one face, tagged by their shared pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaceIndices {
    /// Position indices
    Position(Vec<usize>),
    /// (position, uv) indices
    PositionUv(Vec<(usize, usize)>),
    /// (position, uv, normal) indices
    PositionUvNormal(Vec<(usize, usize, usize)>),
    /// (position, normal) indices
    PositionNormal(Vec<(usize, usize)>),
}

impl FaceIndices {
    /// Parse the index groups of an `f` line
    ///
    /// The first group fixes the pattern; every other group must match it.
    pub fn parse<'a>(groups: impl IntoIterator<Item = &'a str>, line: usize) -> Result<Self, ParseError> {
        let groups = groups
            .into_iter()
            .map(|token| IndexGroup::parse(token, line).map(|group| (token, group)))
            .collect::<Result<Vec<_>, _>>()?;

        if groups.len() < 3 {
            return Err(ParseError::DegenerateFace {
                line,
                vertices: groups.len(),
            });
        }

        let expected = groups[0].1.pattern();
        if let Some((token, group)) = groups.iter().find(|(_, group)| group.pattern() != expected) {
            return Err(ParseError::InconsistentIndexPattern {
                line,
                expected,
                found: group.pattern(),
                group: (*token).to_string(),
            });
        }

        // Patterns are uniform past this point, so the Option fields are all Some or all None
        let groups = groups.into_iter().map(|(_, group)| group);
        Ok(match expected {
            IndexPattern::Position => Self::Position(groups.map(|g| g.position).collect()),
            IndexPattern::PositionUv => Self::PositionUv(
                groups.map(|g| (g.position, g.uv.unwrap_or_default())).collect(),
            ),
            IndexPattern::PositionUvNormal => Self::PositionUvNormal(
                groups
                    .map(|g| (g.position, g.uv.unwrap_or_default(), g.normal.unwrap_or_default()))
                    .collect(),
            ),
            IndexPattern::PositionNormal => Self::PositionNormal(
                groups.map(|g| (g.position, g.normal.unwrap_or_default())).collect(),
            ),
        })
    }

    /// The pattern shared by every group
    pub fn pattern(&self) -> IndexPattern {
        match self {
            Self::Position(_) => IndexPattern::Position,
            Self::PositionUv(_) => IndexPattern::PositionUv,
            Self::PositionUvNormal(_) => IndexPattern::PositionUvNormal,
            Self::PositionNormal(_) => IndexPattern::PositionNormal,
        }
    }

    /// Number of polygon vertices
    pub fn len(&self) -> usize {
        match self {
            Self::Position(groups) => groups.len(),
            Self::PositionUv(groups) | Self::PositionNormal(groups) => groups.len(),
            Self::PositionUvNormal(groups) => groups.len(),
        }
    }

    /// Whether the face has no vertices
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Vertex data declared so far in a geometry file
#[derive(Debug, Clone, Copy)]
pub struct VertexData<'a> {
    /// `v` entries, w = 1
    pub positions: &'a [Vec4],
    /// `vn` entries, w = 0
    pub normals: &'a [Vec4],
    /// `vt` entries, v already flipped
    pub uvs: &'a [Vec2],
}

impl VertexData<'_> {
    fn position(&self, index: usize, line: usize) -> Result<Vec4, ParseError> {
        lookup(self.positions, index, Attribute::Position, line)
    }

    fn normal(&self, index: usize, line: usize) -> Result<Vec4, ParseError> {
        lookup(self.normals, index, Attribute::Normal, line)
    }

    fn uv(&self, index: usize, line: usize) -> Result<Vec2, ParseError> {
        lookup(self.uvs, index, Attribute::TexCoord, line)
    }
}

/// Resolve a 1-based index; 0 and past-the-end are both out of range
fn lookup<T: Copy>(list: &[T], index: usize, attribute: Attribute, line: usize) -> Result<T, ParseError> {
    index
        .checked_sub(1)
        .and_then(|i| list.get(i))
        .copied()
        .ok_or(ParseError::IndexOutOfRange {
            line,
            attribute,
            index,
            available: list.len(),
        })
}

/// A triangulated polygon with flattened attribute arrays
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Face {
    positions: Vec<f32>,
    normals: Vec<f32>,
    tex_coords: Vec<f32>,
    material: Option<String>,
}

impl Face {
    /// Fan-triangulate a polygon
    ///
    /// Emits triangles `(0, i, i + 1)` for `i` in `1..=n-2`. Attributes the
    /// pattern does not reference are left empty.
    pub fn triangulate(
        indices: &FaceIndices,
        data: VertexData<'_>,
        material: Option<String>,
        line: usize,
    ) -> Result<Self, ParseError> {
        let mut positions = Vec::with_capacity(indices.len());
        let mut normals = Vec::new();
        let mut uvs = Vec::new();

        match indices {
            FaceIndices::Position(groups) => {
                for &p in groups {
                    positions.push(data.position(p, line)?);
                }
            }
            FaceIndices::PositionUv(groups) => {
                for &(p, t) in groups {
                    positions.push(data.position(p, line)?);
                    uvs.push(data.uv(t, line)?);
                }
            }
            FaceIndices::PositionUvNormal(groups) => {
                for &(p, t, n) in groups {
                    positions.push(data.position(p, line)?);
                    uvs.push(data.uv(t, line)?);
                    normals.push(data.normal(n, line)?);
                }
            }
            FaceIndices::PositionNormal(groups) => {
                for &(p, n) in groups {
                    positions.push(data.position(p, line)?);
                    normals.push(data.normal(n, line)?);
                }
            }
        }

        let triangles = positions.len().saturating_sub(2);
        let mut face = Self {
            positions: Vec::with_capacity(triangles * 3 * COMPONENTS_PER_VERTEX),
            normals: Vec::with_capacity(if normals.is_empty() { 0 } else { triangles * 3 * COMPONENTS_PER_VERTEX }),
            tex_coords: Vec::with_capacity(if uvs.is_empty() { 0 } else { triangles * 3 * COMPONENTS_PER_TEX_COORD }),
            material,
        };

        for i in 1..positions.len().saturating_sub(1) {
            for corner in [0, i, i + 1] {
                let p = positions[corner];
                face.positions.extend_from_slice(&[p.x, p.y, p.z]);
                if let Some(n) = normals.get(corner) {
                    face.normals.extend_from_slice(&[n.x, n.y, n.z]);
                }
                if let Some(uv) = uvs.get(corner) {
                    face.tex_coords.extend_from_slice(&[uv.x, uv.y]);
                }
            }
        }

        Ok(face)
    }

    /// Flattened xyz positions, 9 floats per triangle
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flattened xyz normals, empty when the face has none
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    /// Flattened uv pairs, empty when the face has none
    pub fn tex_coords(&self) -> &[f32] {
        &self.tex_coords
    }

    /// Name of the material active when the face was declared
    pub fn material(&self) -> Option<&str> {
        self.material.as_deref()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / (3 * COMPONENTS_PER_VERTEX)
    }

    /// Number of emitted vertices (three per triangle)
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / COMPONENTS_PER_VERTEX
    }

    /// Whether normals were supplied
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    /// Whether texture coordinates were supplied
    pub fn has_tex_coords(&self) -> bool {
        !self.tex_coords.is_empty()
    }

    /// Positions as homogeneous points (w = 1)
    pub fn homogeneous_positions(&self) -> impl Iterator<Item = Vec4> + '_ {
        self.positions
            .chunks_exact(COMPONENTS_PER_VERTEX)
            .map(|p| Vec4::new(p[0], p[1], p[2], 1.0))
    }

    /// The three corner positions of triangle `index`
    pub fn triangle(&self, index: usize) -> Option<[[f32; 3]; 3]> {
        let stride = 3 * COMPONENTS_PER_VERTEX;
        let start = index.checked_mul(stride)?;
        let corners = self.positions.get(start..start + stride)?;
        Some([
            [corners[0], corners[1], corners[2]],
            [corners[3], corners[4], corners[5]],
            [corners[6], corners[7], corners[8]],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polygon(n: usize) -> Vec<Vec4> {
        (0..n).map(|i| Vec4::new(i as f32, (i * 10) as f32, (i * 100) as f32, 1.0)).collect()
    }

    fn data<'a>(positions: &'a [Vec4], normals: &'a [Vec4], uvs: &'a [Vec2]) -> VertexData<'a> {
        VertexData { positions, normals, uvs }
    }

    fn corner(i: usize) -> [f32; 3] {
        [i as f32, (i * 10) as f32, (i * 100) as f32]
    }

    #[test]
    fn test_fan_triangulation_counts_and_corners() {
        for n in 3..=8 {
            let positions = polygon(n);
            let tokens: Vec<String> = (1..=n).map(|i| i.to_string()).collect();
            let indices = FaceIndices::parse(tokens.iter().map(String::as_str), 1).unwrap();
            let face = Face::triangulate(&indices, data(&positions, &[], &[]), None, 1).unwrap();

            assert_eq!(face.triangle_count(), n - 2);
            assert_eq!(face.positions().len(), (n - 2) * 9);
            for i in 1..=n - 2 {
                assert_eq!(face.triangle(i - 1), Some([corner(0), corner(i), corner(i + 1)]));
            }
            assert!(face.normals().is_empty());
            assert!(face.tex_coords().is_empty());
        }
    }

    #[test]
    fn test_pattern_detection() {
        let cases = [
            ("1/1/1 2/2/2 3/3/3", IndexPattern::PositionUvNormal),
            ("1//1 2//2 3//3", IndexPattern::PositionNormal),
            ("1/1 2/2 3/3", IndexPattern::PositionUv),
            ("1 2 3", IndexPattern::Position),
        ];
        for (line, expected) in cases {
            let indices = FaceIndices::parse(line.split_whitespace(), 1).unwrap();
            assert_eq!(indices.pattern(), expected, "pattern of '{}'", line);
        }
    }

    #[test]
    fn test_mixed_patterns_rejected() {
        let err = FaceIndices::parse("1/1/1 2//2 3/3/3".split_whitespace(), 4).unwrap_err();
        assert_eq!(
            err,
            ParseError::InconsistentIndexPattern {
                line: 4,
                expected: IndexPattern::PositionUvNormal,
                found: IndexPattern::PositionNormal,
                group: "2//2".to_string(),
            }
        );

        let err = FaceIndices::parse("1 2/2 3".split_whitespace(), 5).unwrap_err();
        assert!(matches!(err, ParseError::InconsistentIndexPattern { line: 5, .. }));
    }

    #[test]
    fn test_malformed_groups() {
        for group in ["/1", "1/", "1/2/", "1/2/3/4", "//3", ""] {
            let err = IndexGroup::parse(group, 2).unwrap_err();
            assert!(
                matches!(err, ParseError::MalformedIndexGroup { line: 2, .. }),
                "'{}' gave {:?}",
                group,
                err
            );
        }

        assert_eq!(
            IndexGroup::parse("1/x", 3),
            Err(ParseError::MalformedNumber { line: 3, token: "x".to_string() })
        );
        assert_eq!(
            IndexGroup::parse("-1", 3),
            Err(ParseError::MalformedNumber { line: 3, token: "-1".to_string() })
        );
    }

    #[test]
    fn test_degenerate_face() {
        let err = FaceIndices::parse("1 2".split_whitespace(), 9).unwrap_err();
        assert_eq!(err, ParseError::DegenerateFace { line: 9, vertices: 2 });
    }

    #[test]
    fn test_index_out_of_range_including_zero() {
        let positions = polygon(3);
        let zero = FaceIndices::parse("0 1 2".split_whitespace(), 1).unwrap();
        assert_eq!(
            Face::triangulate(&zero, data(&positions, &[], &[]), None, 1),
            Err(ParseError::IndexOutOfRange { line: 1, attribute: Attribute::Position, index: 0, available: 3 })
        );

        let past_end = FaceIndices::parse("1//4 2//1 3//1".split_whitespace(), 2).unwrap();
        let normals = [Vec4::new(0.0, 0.0, 1.0, 0.0)];
        assert_eq!(
            Face::triangulate(&past_end, data(&positions, &normals, &[]), None, 2),
            Err(ParseError::IndexOutOfRange { line: 2, attribute: Attribute::Normal, index: 4, available: 1 })
        );

        let bad_normal = FaceIndices::parse("1//1 2//2 3//1".split_whitespace(), 3).unwrap();
        assert_eq!(
            Face::triangulate(&bad_normal, data(&positions, &normals, &[]), None, 3),
            Err(ParseError::IndexOutOfRange { line: 3, attribute: Attribute::Normal, index: 2, available: 1 })
        );

        let uvs = [Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0)];
        let bad_uv = FaceIndices::parse("1/1 2/2 3/3".split_whitespace(), 4).unwrap();
        assert_eq!(
            Face::triangulate(&bad_uv, data(&positions, &[], &uvs), None, 4),
            Err(ParseError::IndexOutOfRange { line: 4, attribute: Attribute::TexCoord, index: 3, available: 2 })
        );
    }

    #[test]
    fn test_oversized_index_is_out_of_range() {
        let positions = polygon(3);
        let huge = FaceIndices::parse("1 2 99999999999999999999999".split_whitespace(), 6).unwrap();
        assert_eq!(
            Face::triangulate(&huge, data(&positions, &[], &[]), None, 6),
            Err(ParseError::IndexOutOfRange { line: 6, attribute: Attribute::Position, index: usize::MAX, available: 3 })
        );

        // still a parse error when it is not a number at all
        assert_eq!(
            IndexGroup::parse("1/99999999999999999999999x", 6),
            Err(ParseError::MalformedNumber { line: 6, token: "99999999999999999999999x".to_string() })
        );
    }

    #[test]
    fn test_full_pattern_fills_all_arrays_in_step() {
        let positions = polygon(4);
        let normals = [Vec4::new(0.0, 0.0, 1.0, 0.0), Vec4::new(0.0, 1.0, 0.0, 0.0)];
        let uvs = [Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0)];
        let indices = FaceIndices::parse("1/1/1 2/2/1 3/3/2 4/4/2".split_whitespace(), 1).unwrap();

        let face = Face::triangulate(&indices, data(&positions, &normals, &uvs), Some("red".into()), 1).unwrap();

        assert_eq!(face.triangle_count(), 2);
        assert_eq!(face.normals().len(), face.positions().len());
        assert_eq!(face.tex_coords().len() / 2, face.vertex_count());
        assert_eq!(face.material(), Some("red"));
        // second triangle is (0, 2, 3)
        assert_eq!(&face.tex_coords()[6..12], &[0.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(&face.normals()[9..18], &[0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_homogeneous_positions_restore_w() {
        let positions = polygon(3);
        let indices = FaceIndices::parse("1 2 3".split_whitespace(), 1).unwrap();
        let face = Face::triangulate(&indices, data(&positions, &[], &[]), None, 1).unwrap();

        let points: Vec<_> = face.homogeneous_positions().collect();
        assert_eq!(points, positions);
    }
}
