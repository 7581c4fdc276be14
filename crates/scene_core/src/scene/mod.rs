//! Scene management
//!
//! Places independently loaded models in a shared coordinate space.
//!
//! ```text
//! root (R)
//!  ├── child (C)        world = P * R * C
//!  │    └── leaf (L)    world = P * R * C * L
//!  └── child (D)        world = P * R * D
//! ```
//!
//! `P` is the transform handed to the traversal, usually the camera view.

mod scene_graph;

pub use scene_graph::{traverse, Node, SceneGraph, Traversal};
