//! Model loading
//!
//! Text in, triangulated faces and material colors out:
//!
//! ```text
//! source text -> sanitize -> ObjLoader / MtlParser -> Face -> Model
//! ```
//!
//! The geometry and material files of a model load independently; see
//! [`ModelHandle`] and [`ModelLoader`].

pub mod error;
pub mod sanitize;
pub mod face;
pub mod obj_loader;
pub mod materials;
pub mod model;
pub mod model_handle;
pub mod fetch;
pub mod loader;

pub use error::{Attribute, LoadError, ParseError, Phase};
pub use sanitize::{sanitize_lines, SourceLine};
pub use face::{Face, FaceIndices, IndexGroup, IndexPattern, VertexData};
pub use obj_loader::ObjLoader;
pub use materials::{Color, MaterialSet, MtlParser};
pub use model::{Model, ModelSource, ModelState};
pub use model_handle::ModelHandle;
pub use fetch::{FileFetcher, MemoryFetcher, SourceFetcher};
pub use loader::{LoadTasks, ModelLoader};
