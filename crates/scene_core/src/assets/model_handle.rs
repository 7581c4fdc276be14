//! Shared, thread-safe access to a loading model
//!
//! The geometry and material parses complete through a [`ModelHandle`] from
//! whichever task finishes them. The text is parsed outside the lock; each
//! completion then writes its data and flips its flag under one lock. Consumers await [`ModelHandle::wait_ready`], which is
//! resolved through a one-shot channel when the model settles.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::channel::oneshot;

use super::error::{LoadError, Phase};
use super::materials::MtlParser;
use super::model::{Model, ModelState};
use super::obj_loader::ObjLoader;

type Waiter = oneshot::Sender<Result<(), LoadError>>;

enum Wait {
    Settled(Result<(), LoadError>),
    Pending(oneshot::Receiver<Result<(), LoadError>>),
}

#[derive(Debug)]
struct Shared {
    model: Model,
    waiters: Vec<Waiter>,
}

impl Shared {
    /// Wake every waiter once the model is ready or failed
    fn notify_if_settled(&mut self) {
        let outcome = match self.model.state() {
            ModelState::Loading => return,
            ModelState::Ready => Ok(()),
            ModelState::Failed(err) => Err(err),
        };
        for waiter in self.waiters.drain(..) {
            // A dropped receiver just means nobody is listening anymore
            let _ = waiter.send(outcome.clone());
        }
    }
}

/// Cloneable reference to a model shared between loaders, scene nodes and renderers
#[derive(Debug, Clone)]
pub struct ModelHandle {
    inner: Arc<Mutex<Shared>>,
}

impl ModelHandle {
    /// Wrap a model for shared use
    pub fn new(model: Model) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Shared {
                model,
                waiters: Vec::new(),
            })),
        }
    }

    /// Parse and store the geometry half
    ///
    /// Parsing runs without the lock; it is taken only to publish the faces.
    pub fn complete_geometry(&self, contents: &str) -> Result<(), LoadError> {
        let parsed = ObjLoader::parse(contents);
        self.update(Phase::Geometry, |model| model.commit_geometry(parsed))
    }

    /// Parse and store the material half
    ///
    /// Parsing runs without the lock; it is taken only to publish the materials.
    pub fn complete_materials(&self, contents: &str) -> Result<(), LoadError> {
        let config = self.lock().model.config().clone();
        let parsed = MtlParser::parse(contents, &config);
        self.update(Phase::Material, |model| model.commit_materials(parsed))
    }

    /// Record that a phase could not be completed
    pub fn fail(&self, phase: Phase, error: LoadError) -> Result<(), LoadError> {
        self.update(phase, |model| model.fail(phase, error))
    }

    /// Complete a phase with fetched text, or fail it with the fetch error
    pub fn complete(&self, phase: Phase, fetched: Result<String, LoadError>) -> Result<(), LoadError> {
        match (phase, fetched) {
            (Phase::Geometry, Ok(text)) => self.complete_geometry(&text),
            (Phase::Material, Ok(text)) => self.complete_materials(&text),
            (_, Err(error)) => {
                self.fail(phase, error.clone())?;
                Err(error)
            }
        }
    }

    /// Current load state
    pub fn state(&self) -> ModelState {
        self.lock().model.state()
    }

    /// Whether both halves loaded successfully
    pub fn is_ready(&self) -> bool {
        self.lock().model.is_ready()
    }

    /// Run `f` with shared access to the model
    ///
    /// The lock is held for the duration of `f`; keep it short.
    pub fn with_model<R>(&self, f: impl FnOnce(&Model) -> R) -> R {
        f(&self.lock().model)
    }

    /// Resolve once the model is ready or has failed
    ///
    /// Never polls: a pending call parks a one-shot receiver that the
    /// completing phase resolves.
    pub fn wait_ready(&self) -> impl Future<Output = Result<(), LoadError>> + Send + 'static {
        let wait = {
            let mut shared = self.lock();
            match shared.model.state() {
                ModelState::Ready => Wait::Settled(Ok(())),
                ModelState::Failed(err) => Wait::Settled(Err(err)),
                ModelState::Loading => {
                    let (sender, receiver) = oneshot::channel();
                    shared.waiters.push(sender);
                    Wait::Pending(receiver)
                }
            }
        };

        async move {
            match wait {
                Wait::Settled(outcome) => outcome,
                Wait::Pending(receiver) => receiver.await.unwrap_or(Err(LoadError::Abandoned)),
            }
        }
    }

    /// Whether two handles refer to the same model
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn update(&self, phase: Phase, f: impl FnOnce(&mut Model) -> Result<(), LoadError>) -> Result<(), LoadError> {
        let mut shared = self.lock();
        let result = f(&mut shared.model);
        if result.is_ok() {
            log::debug!("{} phase settled for {}", phase, shared.model.source().location(phase));
            if shared.model.is_ready() {
                log::info!(
                    "Model {} ready, waking {} waiter(s)",
                    shared.model.source().geometry,
                    shared.waiters.len()
                );
            }
        }
        shared.notify_if_settled();
        result
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        // Model updates never leave partial state behind, so a poisoned lock is still usable
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::model::ModelSource;
    use crate::core::config::AssetConfig;

    const OBJ: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
    const MTL: &str = "newmtl m\nKd 0.5 0.5 0.5\n";

    fn handle() -> ModelHandle {
        ModelHandle::new(Model::new(ModelSource::new("a.obj", "a.mtl"), AssetConfig::default()))
    }

    #[test]
    fn test_wait_ready_resolves_after_both_phases_in_either_order() {
        for material_first in [false, true] {
            let handle = handle();
            let waiting = handle.wait_ready();

            if material_first {
                handle.complete_materials(MTL).unwrap();
            } else {
                handle.complete_geometry(OBJ).unwrap();
            }
            assert!(!handle.is_ready());

            if material_first {
                handle.complete_geometry(OBJ).unwrap();
            } else {
                handle.complete_materials(MTL).unwrap();
            }

            assert_eq!(pollster::block_on(waiting), Ok(()));
            assert!(handle.is_ready());
            // Waiting again on a ready model resolves immediately
            assert_eq!(pollster::block_on(handle.wait_ready()), Ok(()));
        }
    }

    #[test]
    fn test_wait_ready_surfaces_source_failure() {
        let handle = handle();
        let waiting = handle.wait_ready();
        let error = LoadError::unavailable("a.obj", "connection refused");

        assert_eq!(handle.complete(Phase::Geometry, Err(error.clone())), Err(error.clone()));
        assert_eq!(pollster::block_on(waiting), Err(error.clone()));
        assert_eq!(handle.state(), ModelState::Failed(error));
    }

    #[test]
    fn test_dropped_handle_abandons_waiter() {
        let handle = handle();
        let waiting = handle.wait_ready();
        drop(handle);
        assert_eq!(pollster::block_on(waiting), Err(LoadError::Abandoned));
    }

    #[test]
    fn test_phases_complete_from_separate_threads() {
        let handle = handle();
        let waiting = handle.wait_ready();

        let geometry = {
            let handle = handle.clone();
            std::thread::spawn(move || handle.complete_geometry(OBJ))
        };
        let material = {
            let handle = handle.clone();
            std::thread::spawn(move || handle.complete_materials(MTL))
        };

        assert_eq!(pollster::block_on(waiting), Ok(()));
        geometry.join().unwrap().unwrap();
        material.join().unwrap().unwrap();
        assert_eq!(handle.with_model(|model| model.faces().map(<[_]>::len)), Ok(1));
    }

    #[test]
    fn test_clones_share_one_model() {
        let a = handle();
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&handle()));

        b.complete_geometry(OBJ).unwrap();
        assert!(a.with_model(Model::geometry_ready));
    }

    #[test]
    fn test_slow_geometry_parse_does_not_block_materials_or_readers() {
        use std::fmt::Write;
        use std::sync::Barrier;

        let mut large = String::new();
        for i in 0..60_000 {
            let _ = writeln!(large, "v {} 0 0\nv {} 1 0\nv {} 0 1", i, i, i);
            let base = i * 3 + 1;
            let _ = writeln!(large, "f {} {} {}", base, base + 1, base + 2);
        }

        let handle = handle();
        let start = Arc::new(Barrier::new(2));
        let geometry = {
            let handle = handle.clone();
            let start = Arc::clone(&start);
            std::thread::spawn(move || {
                start.wait();
                handle.complete_geometry(&large)
            })
        };

        start.wait();
        handle.complete_materials(MTL).unwrap();
        // the material phase and readers got through while geometry was still parsing
        assert!(handle.with_model(|model| model.material_ready() && !model.geometry_ready()));
        assert_eq!(handle.state(), ModelState::Loading);

        geometry.join().unwrap().unwrap();
        assert_eq!(handle.with_model(Model::triangle_count), Ok(60_000));
    }

    #[test]
    fn test_second_completion_of_a_phase_is_rejected() {
        let handle = handle();
        handle.complete_geometry(OBJ).unwrap();
        assert_eq!(
            handle.complete_geometry(OBJ),
            Err(LoadError::PhaseAlreadyComplete(Phase::Geometry))
        );
        assert!(!handle.is_ready());
    }
}
