//! Model: faces plus materials for one mesh
//!
//! A model is filled in by two independent parses, geometry (OBJ) and
//! materials (MTL), which may finish in either order. It is usable only once
//! both have succeeded. Until then every data accessor returns
//! [`LoadError::NotReady`]; after a failure they return the stored error.

use super::error::{LoadError, ParseError, Phase};
use super::face::Face;
use super::materials::{Color, MaterialSet, MtlParser};
use super::obj_loader::ObjLoader;
use crate::core::config::AssetConfig;

/// Where a model's two source files live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSource {
    /// Location of the OBJ file
    pub geometry: String,
    /// Location of the MTL file
    pub material: String,
}

impl ModelSource {
    /// Create a source pair
    pub fn new(geometry: impl Into<String>, material: impl Into<String>) -> Self {
        Self {
            geometry: geometry.into(),
            material: material.into(),
        }
    }

    /// Location for one phase
    pub fn location(&self, phase: Phase) -> &str {
        match phase {
            Phase::Geometry => &self.geometry,
            Phase::Material => &self.material,
        }
    }
}

/// Overall load state of a model
#[derive(Debug, Clone, PartialEq)]
pub enum ModelState {
    /// At least one phase has not finished
    Loading,
    /// Both phases finished successfully
    Ready,
    /// A phase failed; the model will never become ready
    Failed(LoadError),
}

#[derive(Debug, Clone, PartialEq)]
enum PhaseState {
    Pending,
    Ready,
    Failed(LoadError),
}

/// A mesh with its resolved materials
#[derive(Debug, Clone)]
pub struct Model {
    source: ModelSource,
    config: AssetConfig,
    faces: Vec<Face>,
    materials: MaterialSet,
    geometry: PhaseState,
    material: PhaseState,
}

impl Model {
    /// Create an empty, loading model
    ///
    /// `config` supplies the base location `map_Kd` paths resolve against.
    pub fn new(source: ModelSource, config: AssetConfig) -> Self {
        Self {
            source,
            config,
            faces: Vec::new(),
            materials: MaterialSet::default(),
            geometry: PhaseState::Pending,
            material: PhaseState::Pending,
        }
    }

    /// Asset configuration `map_Kd` paths resolve against
    pub fn config(&self) -> &AssetConfig {
        &self.config
    }

    /// Source locations this model was created with
    pub fn source(&self) -> &ModelSource {
        &self.source
    }

    /// Whether the geometry parse finished successfully
    pub fn geometry_ready(&self) -> bool {
        self.geometry == PhaseState::Ready
    }

    /// Whether the material parse finished successfully
    pub fn material_ready(&self) -> bool {
        self.material == PhaseState::Ready
    }

    /// Whether both parses finished successfully
    pub fn is_ready(&self) -> bool {
        self.geometry_ready() && self.material_ready()
    }

    /// Current load state; a geometry failure is reported ahead of a material one
    pub fn state(&self) -> ModelState {
        match (&self.geometry, &self.material) {
            (PhaseState::Failed(err), _) | (_, PhaseState::Failed(err)) => ModelState::Failed(err.clone()),
            (PhaseState::Ready, PhaseState::Ready) => ModelState::Ready,
            _ => ModelState::Loading,
        }
    }

    /// Parse OBJ text and store its faces
    ///
    /// On error the geometry phase is marked failed and no faces are kept.
    pub fn load_geometry(&mut self, contents: &str) -> Result<(), LoadError> {
        self.ensure_pending(Phase::Geometry)?;
        self.commit_geometry(ObjLoader::parse(contents))
    }

    /// Parse MTL text and store the material maps
    ///
    /// On error the material phase is marked failed and no materials are kept.
    pub fn load_materials(&mut self, contents: &str) -> Result<(), LoadError> {
        self.ensure_pending(Phase::Material)?;
        let parsed = MtlParser::parse(contents, &self.config);
        self.commit_materials(parsed)
    }

    /// Store the outcome of a geometry parse run elsewhere
    pub fn commit_geometry(&mut self, parsed: Result<Vec<Face>, ParseError>) -> Result<(), LoadError> {
        self.ensure_pending(Phase::Geometry)?;
        match parsed {
            Ok(faces) => {
                // Data lands before the flag flips
                self.faces = faces;
                self.geometry = PhaseState::Ready;
                Ok(())
            }
            Err(source) => Err(self.record_failure(Phase::Geometry, LoadError::Parse { phase: Phase::Geometry, source })),
        }
    }

    /// Store the outcome of a material parse run elsewhere
    pub fn commit_materials(&mut self, parsed: Result<MaterialSet, ParseError>) -> Result<(), LoadError> {
        self.ensure_pending(Phase::Material)?;
        match parsed {
            Ok(materials) => {
                self.materials = materials;
                self.material = PhaseState::Ready;
                Ok(())
            }
            Err(source) => Err(self.record_failure(Phase::Material, LoadError::Parse { phase: Phase::Material, source })),
        }
    }

    /// Mark a phase as failed, e.g. because its source could not be fetched
    pub fn fail(&mut self, phase: Phase, error: LoadError) -> Result<(), LoadError> {
        self.ensure_pending(phase)?;
        self.record_failure(phase, error);
        Ok(())
    }

    /// Triangulated faces in file order
    pub fn faces(&self) -> Result<&[Face], LoadError> {
        self.ensure_ready()?;
        Ok(&self.faces)
    }

    /// Parsed material maps
    pub fn materials(&self) -> Result<&MaterialSet, LoadError> {
        self.ensure_ready()?;
        Ok(&self.materials)
    }

    /// Diffuse color of a material
    pub fn diffuse_color(&self, name: &str) -> Result<Option<Color>, LoadError> {
        Ok(self.materials()?.diffuse(name))
    }

    /// Specular color of a material
    pub fn specular_color(&self, name: &str) -> Result<Option<Color>, LoadError> {
        Ok(self.materials()?.specular(name))
    }

    /// Whether the material file named a texture
    pub fn is_textured(&self) -> Result<bool, LoadError> {
        Ok(self.materials()?.is_textured())
    }

    /// Resolved texture location, if any
    pub fn texture_path(&self) -> Result<Option<&str>, LoadError> {
        Ok(self.materials()?.texture_path())
    }

    /// Total triangles across all faces
    pub fn triangle_count(&self) -> Result<usize, LoadError> {
        Ok(self.faces()?.iter().map(Face::triangle_count).sum())
    }

    fn ensure_ready(&self) -> Result<(), LoadError> {
        match self.state() {
            ModelState::Ready => Ok(()),
            ModelState::Loading => Err(LoadError::NotReady),
            ModelState::Failed(err) => Err(err),
        }
    }

    fn ensure_pending(&self, phase: Phase) -> Result<(), LoadError> {
        let state = match phase {
            Phase::Geometry => &self.geometry,
            Phase::Material => &self.material,
        };
        match state {
            PhaseState::Pending => Ok(()),
            _ => Err(LoadError::PhaseAlreadyComplete(phase)),
        }
    }

    fn record_failure(&mut self, phase: Phase, error: LoadError) -> LoadError {
        log::warn!("Failed to load {} for {}: {}", phase, self.source.location(phase), error);
        let slot = match phase {
            Phase::Geometry => &mut self.geometry,
            Phase::Material => &mut self.material,
        };
        *slot = PhaseState::Failed(error.clone());
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl red\nf 1 2 3\n";
    const RED_MTL: &str = "newmtl red\nKd 1 0 0\nmap_Kd red.png\n";

    fn model() -> Model {
        Model::new(ModelSource::new("tri.obj", "tri.mtl"), AssetConfig::new("assets"))
    }

    #[test]
    fn test_not_ready_until_both_phases_complete_geometry_first() {
        let mut model = model();
        assert_eq!(model.state(), ModelState::Loading);
        assert_eq!(model.faces(), Err(LoadError::NotReady));

        model.load_geometry(TRIANGLE_OBJ).unwrap();
        assert!(model.geometry_ready());
        assert!(!model.is_ready());
        assert_eq!(model.faces().unwrap_err(), LoadError::NotReady);

        model.load_materials(RED_MTL).unwrap();
        assert!(model.is_ready());
        assert_eq!(model.faces().unwrap().len(), 1);
    }

    #[test]
    fn test_not_ready_until_both_phases_complete_material_first() {
        let mut model = model();

        model.load_materials(RED_MTL).unwrap();
        assert!(model.material_ready());
        assert!(!model.is_ready());
        assert_eq!(model.materials().unwrap_err(), LoadError::NotReady);

        model.load_geometry(TRIANGLE_OBJ).unwrap();
        assert!(model.is_ready());
        assert_eq!(model.diffuse_color("red"), Ok(Some(Color::rgb(1.0, 0.0, 0.0))));
        assert_eq!(model.texture_path(), Ok(Some("assets/red.png")));
        assert_eq!(model.is_textured(), Ok(true));
    }

    #[test]
    fn test_readiness_is_idempotent_and_faces_frozen() {
        let mut model = model();
        model.load_geometry(TRIANGLE_OBJ).unwrap();
        model.load_materials(RED_MTL).unwrap();

        assert_eq!(
            model.load_geometry("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nf 3 2 1\n"),
            Err(LoadError::PhaseAlreadyComplete(Phase::Geometry))
        );
        assert!(model.is_ready());
        assert!(model.is_ready());
        assert_eq!(model.triangle_count(), Ok(1));
    }

    #[test]
    fn test_parse_failure_is_distinct_from_not_ready() {
        let mut model = model();
        model.load_materials(RED_MTL).unwrap();

        let err = model.load_geometry("v 0 0 0\nv 1 nope 0\n").unwrap_err();
        let expected = LoadError::Parse {
            phase: Phase::Geometry,
            source: ParseError::MalformedNumber { line: 2, token: "nope".to_string() },
        };
        assert_eq!(err, expected);
        assert_eq!(model.state(), ModelState::Failed(expected.clone()));
        assert_eq!(model.faces(), Err(expected));
        // material data is untouched
        assert!(model.material_ready());
    }

    #[test]
    fn test_source_failure_marks_model_failed() {
        let mut model = model();
        let error = LoadError::unavailable("tri.mtl", "404 Not Found");

        model.fail(Phase::Material, error.clone()).unwrap();
        model.load_geometry(TRIANGLE_OBJ).unwrap();

        assert!(!model.is_ready());
        assert_eq!(model.state(), ModelState::Failed(error));
        assert_eq!(
            model.fail(Phase::Material, LoadError::Abandoned),
            Err(LoadError::PhaseAlreadyComplete(Phase::Material))
        );
    }
}
