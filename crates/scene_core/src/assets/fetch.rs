//! Source retrieval
//!
//! The loaders only need text for a location. Where that text comes from
//! (disk, network, an archive) is behind [`SourceFetcher`].

use std::collections::HashMap;
use std::path::PathBuf;

use futures::channel::oneshot;
use futures::future::{self, BoxFuture, FutureExt};

use super::error::LoadError;
use crate::core::config::AssetConfig;

/// Asynchronous provider of source text
pub trait SourceFetcher: Send + Sync {
    /// Retrieve the text stored at `location`
    ///
    /// Failures must come back as [`LoadError::SourceUnavailable`].
    fn fetch<'a>(&'a self, location: &'a str) -> BoxFuture<'a, Result<String, LoadError>>;
}

/// Reads sources from a directory on disk
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    /// Fetch relative to `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Fetch relative to the configured base resource location
    pub fn from_config(config: &AssetConfig) -> Self {
        Self::new(&config.base_resource_location)
    }
}

impl SourceFetcher for FileFetcher {
    /// The read happens on its own thread, so awaiting it never blocks the
    /// executor driving the load tasks.
    fn fetch<'a>(&'a self, location: &'a str) -> BoxFuture<'a, Result<String, LoadError>> {
        let path = self.root.join(location);
        let (sender, receiver) = oneshot::channel();
        let spawned = std::thread::Builder::new()
            .name("source-read".to_string())
            .spawn(move || {
                log::debug!("Reading {}", path.display());
                // The receiver may be gone if the load was dropped
                let _ = sender.send(std::fs::read_to_string(&path));
            });

        async move {
            spawned.map_err(|e| LoadError::unavailable(location, e))?;
            receiver
                .await
                .map_err(|_| LoadError::unavailable(location, "read thread exited"))?
                .map_err(|e| LoadError::unavailable(location, e))
        }
        .boxed()
    }
}

/// Serves sources from memory
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    sources: HashMap<String, String>,
}

impl MemoryFetcher {
    /// Create an empty fetcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: add a source
    pub fn with_source(mut self, location: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(location, contents);
        self
    }

    /// Add or replace a source
    pub fn insert(&mut self, location: impl Into<String>, contents: impl Into<String>) {
        self.sources.insert(location.into(), contents.into());
    }
}

impl SourceFetcher for MemoryFetcher {
    fn fetch<'a>(&'a self, location: &'a str) -> BoxFuture<'a, Result<String, LoadError>> {
        let result = self
            .sources
            .get(location)
            .cloned()
            .ok_or_else(|| LoadError::unavailable(location, "not found"));
        future::ready(result).boxed()
    }
}
