//! # Scene Core
//!
//! Loads Wavefront OBJ/MTL models into triangulated, draw-ready faces and
//! places them in a scene hierarchy.
//!
//! ## Features
//!
//! - **OBJ geometry**: positions, normals and texture coordinates with fan triangulation
//! - **MTL materials**: diffuse and specular colors plus diffuse texture paths
//! - **Independent loading**: geometry and materials arrive in any order
//! - **Scene graph**: local transforms compose into world transforms during traversal
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_core::prelude::*;
//!
//! let loader = ModelLoader::new(FileFetcher::new("resources/models"), AssetConfig::default());
//! let car = pollster::block_on(loader.load(ModelSource::new("car.obj", "car.mtl")));
//!
//! let scene = SceneGraph::new(Node::with_model(Mat4::translation(0.5, -1.0, -1.0), car));
//! for (world, model) in scene.traverse(Mat4::identity()) {
//!     println!("{:?} at {}", model.state(), world);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod assets;
pub mod scene;
pub mod render;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        core::{AssetConfig, Config, ConfigError},
        foundation::math::{Mat4, Mat4Ext, Transform, Vec2, Vec3, Vec4},
        assets::{
            Color, Face, FileFetcher, LoadError, LoadTasks, MaterialSet, MemoryFetcher, Model,
            ModelHandle, ModelLoader, ModelSource, ModelState, ParseError, Phase, SourceFetcher,
        },
        scene::{Node, SceneGraph},
        render::{render_scene, MeshBuffers, RenderBackend, RenderContext, RenderError},
    };
}
