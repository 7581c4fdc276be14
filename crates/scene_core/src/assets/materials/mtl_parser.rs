//! MTL (Material Template Library) file parser
//!
//! Reads the subset of Wavefront .mtl used by the loaders: `newmtl`, `Kd`,
//! `Ks` and `map_Kd`. Everything else is skipped.

use std::collections::HashMap;

use crate::assets::error::ParseError;
use crate::assets::sanitize::{sanitize_lines, SourceLine};
use crate::core::config::AssetConfig;

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque white, used when a face has no resolvable material
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Build a color from four components
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color (alpha 1.0)
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Components as `[r, g, b, a]`
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Parsed material file: name -> diffuse, name -> specular, and the single texture
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialSet {
    diffuse: HashMap<String, Color>,
    specular: HashMap<String, Color>,
    texture_path: Option<String>,
}

impl MaterialSet {
    /// Diffuse (`Kd`) color of a material
    pub fn diffuse(&self, name: &str) -> Option<Color> {
        self.diffuse.get(name).copied()
    }

    /// Specular (`Ks`) color of a material
    pub fn specular(&self, name: &str) -> Option<Color> {
        self.specular.get(name).copied()
    }

    /// The diffuse map
    pub fn diffuse_map(&self) -> &HashMap<String, Color> {
        &self.diffuse
    }

    /// The specular map
    pub fn specular_map(&self) -> &HashMap<String, Color> {
        &self.specular
    }

    /// Resolved `map_Kd` texture path
    pub fn texture_path(&self) -> Option<&str> {
        self.texture_path.as_deref()
    }

    /// Whether a `map_Kd` line was seen
    pub fn is_textured(&self) -> bool {
        self.texture_path.is_some()
    }
}

/// MTL file parser
pub struct MtlParser;

impl MtlParser {
    /// Parse MTL file contents
    ///
    /// # Arguments
    /// * `contents` - The text contents of the MTL file
    /// * `config` - Supplies the base location `map_Kd` paths are resolved against
    ///
    /// # Returns
    /// The diffuse/specular maps and texture path, or the first error met
    pub fn parse(contents: &str, config: &AssetConfig) -> Result<MaterialSet, ParseError> {
        let mut materials = MaterialSet::default();
        let mut current_material: Option<String> = None;

        for line in sanitize_lines(contents) {
            match line.keyword() {
                "newmtl" => {
                    current_material = Some(Self::parse_name(&line)?);
                },

                "Kd" => {
                    let name = Self::require_material(&current_material, &line)?;
                    let color = Self::parse_color(&line)?;
                    materials.diffuse.insert(name.to_string(), color);
                },

                "Ks" => {
                    let name = Self::require_material(&current_material, &line)?;
                    let color = Self::parse_color(&line)?;
                    materials.specular.insert(name.to_string(), color);
                },

                "map_Kd" => {
                    // At most one textured material per mesh; a later line wins
                    let relative = Self::parse_name(&line)?;
                    let resolved = config.resolve(&relative);
                    if let Some(previous) = materials.texture_path.replace(resolved) {
                        log::debug!("line {}: map_Kd replaces earlier texture {}", line.number, previous);
                    }
                },

                // Ignore unknown commands silently
                _ => {}
            }
        }

        log::debug!(
            "Parsed {} diffuse / {} specular material(s), textured: {}",
            materials.diffuse.len(),
            materials.specular.len(),
            materials.is_textured()
        );

        Ok(materials)
    }

    fn require_material<'m>(current: &'m Option<String>, line: &SourceLine<'_>) -> Result<&'m str, ParseError> {
        current.as_deref().ok_or_else(|| ParseError::UndefinedMaterialReference {
            line: line.number,
            keyword: line.keyword().to_string(),
        })
    }

    /// Parse an RGB triple into an opaque color
    fn parse_color(line: &SourceLine<'_>) -> Result<Color, ParseError> {
        let [r, g, b] = line.floats::<3>()?;
        Ok(Color::rgb(r, g, b))
    }

    /// Material names and texture paths may contain spaces, take rest of line
    fn parse_name(line: &SourceLine<'_>) -> Result<String, ParseError> {
        let rest = line.rest();
        if rest.is_empty() {
            return Err(ParseError::MissingValues {
                line: line.number,
                keyword: line.keyword().to_string(),
                expected: 1,
                found: 0,
            });
        }
        Ok(rest.to_string())
    }
}
