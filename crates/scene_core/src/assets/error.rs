//! Error types for model loading

use std::fmt;

use thiserror::Error;

use super::face::IndexPattern;

/// The two independently loaded halves of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The OBJ geometry file
    Geometry,
    /// The MTL material file
    Material,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry => f.write_str("geometry"),
            Self::Material => f.write_str("material"),
        }
    }
}

/// Vertex attribute referenced by a face index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// `v` entry
    Position,
    /// `vt` entry
    TexCoord,
    /// `vn` entry
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position => f.write_str("position"),
            Self::TexCoord => f.write_str("texture coordinate"),
            Self::Normal => f.write_str("normal"),
        }
    }
}

/// Errors raised while parsing OBJ or MTL text
///
/// Every variant carries the 1-based line number of the offending line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A numeric token could not be parsed (or was not finite)
    #[error("line {line}: malformed number '{token}'")]
    MalformedNumber {
        /// Source line
        line: usize,
        /// The token as written
        token: String,
    },

    /// A statement had fewer values than it needs
    #[error("line {line}: '{keyword}' expects {expected} values, found {found}")]
    MissingValues {
        /// Source line
        line: usize,
        /// Statement keyword
        keyword: String,
        /// Required value count
        expected: usize,
        /// Values actually present
        found: usize,
    },

    /// An index group matched none of `p`, `p/t`, `p//n`, `p/t/n`
    #[error("line {line}: malformed index group '{group}'")]
    MalformedIndexGroup {
        /// Source line
        line: usize,
        /// The index group as written
        group: String,
    },

    /// Index groups of one face use different patterns
    #[error("line {line}: index group '{group}' is {found}, but the face started as {expected}")]
    InconsistentIndexPattern {
        /// Source line
        line: usize,
        /// Pattern of the face's first group
        expected: IndexPattern,
        /// Pattern of the offending group
        found: IndexPattern,
        /// The offending group as written
        group: String,
    },

    /// An index is zero or points past the end of its list
    #[error("line {line}: {attribute} index {index} out of range (1..={available})")]
    IndexOutOfRange {
        /// Source line
        line: usize,
        /// Which list the index refers to
        attribute: Attribute,
        /// The 1-based index as written (`usize::MAX` if it overflowed)
        index: usize,
        /// Number of entries declared so far
        available: usize,
    },

    /// A face with fewer than three vertices
    #[error("line {line}: face needs at least 3 vertices, found {vertices}")]
    DegenerateFace {
        /// Source line
        line: usize,
        /// Number of index groups on the line
        vertices: usize,
    },

    /// `Kd`/`Ks` before any `newmtl`
    #[error("line {line}: '{keyword}' appears before any newmtl")]
    UndefinedMaterialReference {
        /// Source line
        line: usize,
        /// Statement keyword
        keyword: String,
    },
}

impl ParseError {
    /// Line number the error was raised on
    pub fn line(&self) -> usize {
        match self {
            Self::MalformedNumber { line, .. }
            | Self::MissingValues { line, .. }
            | Self::MalformedIndexGroup { line, .. }
            | Self::InconsistentIndexPattern { line, .. }
            | Self::IndexOutOfRange { line, .. }
            | Self::DegenerateFace { line, .. }
            | Self::UndefinedMaterialReference { line, .. } => *line,
        }
    }
}

/// Errors surfaced by a model and its loaders
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// One of the source files failed to parse
    #[error("{phase} parse failed: {source}")]
    Parse {
        /// Which file failed
        phase: Phase,
        /// Underlying parse error
        #[source]
        source: ParseError,
    },

    /// The source text could not be retrieved
    #[error("source '{location}' unavailable: {reason}")]
    SourceUnavailable {
        /// Location that was requested
        location: String,
        /// Reason reported by the fetch layer
        reason: String,
    },

    /// A geometry or material accessor was called before both halves loaded
    #[error("model is not ready yet")]
    NotReady,

    /// A phase was completed twice
    #[error("{0} data was already loaded")]
    PhaseAlreadyComplete(Phase),

    /// Every handle to the model was dropped while someone was waiting on it
    #[error("model was dropped before loading finished")]
    Abandoned,
}

impl LoadError {
    /// Build a `SourceUnavailable` error
    pub fn unavailable(location: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::SourceUnavailable {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}
