//! Material parsing
//!
//! Turns MTL text into a `MaterialSet` of diffuse and specular colors keyed by
//! material name.

pub mod mtl_parser;

pub use mtl_parser::{Color, MaterialSet, MtlParser};
