//! Model loader
//!
//! Starts the geometry and material fetch-and-parse tasks for a model. The
//! two tasks are independent futures; they can be joined, spawned on an
//! executor, or driven one at a time.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use super::error::Phase;
use super::fetch::SourceFetcher;
use super::model::{Model, ModelSource};
use super::model_handle::ModelHandle;
use crate::core::config::AssetConfig;

/// A model together with the two tasks that will fill it in
pub struct LoadTasks {
    /// Handle to the model being loaded
    pub handle: ModelHandle,
    /// Fetches and parses the OBJ file
    pub geometry: BoxFuture<'static, ()>,
    /// Fetches and parses the MTL file
    pub material: BoxFuture<'static, ()>,
}

impl LoadTasks {
    /// Drive both tasks concurrently to completion
    pub async fn run(self) -> ModelHandle {
        futures::join!(self.geometry, self.material);
        self.handle
    }
}

/// Creates models and their load tasks from a source fetcher
pub struct ModelLoader<F> {
    fetcher: Arc<F>,
    config: AssetConfig,
}

impl<F: SourceFetcher + 'static> ModelLoader<F> {
    /// Create a loader
    pub fn new(fetcher: F, config: AssetConfig) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            config,
        }
    }

    /// Asset configuration handed to every model
    pub fn config(&self) -> &AssetConfig {
        &self.config
    }

    /// Create a loading model and its two independent tasks
    pub fn begin(&self, source: ModelSource) -> LoadTasks {
        let handle = ModelHandle::new(Model::new(source.clone(), self.config.clone()));
        log::info!("Loading model {} / {}", source.geometry, source.material);

        LoadTasks {
            geometry: self.phase_task(&handle, Phase::Geometry, source.geometry),
            material: self.phase_task(&handle, Phase::Material, source.material),
            handle,
        }
    }

    /// Load a model, returning once both phases have settled
    ///
    /// Check [`ModelHandle::state`] (or await `wait_ready`) for the outcome.
    pub async fn load(&self, source: ModelSource) -> ModelHandle {
        self.begin(source).run().await
    }

    fn phase_task(&self, handle: &ModelHandle, phase: Phase, location: String) -> BoxFuture<'static, ()> {
        let fetcher = Arc::clone(&self.fetcher);
        let handle = handle.clone();
        async move {
            let fetched = fetcher.fetch(&location).await;
            // The outcome is recorded on the model; waiters see it there
            if let Err(err) = handle.complete(phase, fetched) {
                log::debug!("{} task for {} ended with: {}", phase, location, err);
            }
        }
        .boxed()
    }
}
