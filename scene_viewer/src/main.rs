//! Scene viewer
//!
//! Loads the models named in a scene description, arranges them in a
//! hierarchy and renders a few animated frames through a logging backend.
//!
//! ```text
//! scene_viewer [scene.toml | scene.ron]
//! ```

mod logging_backend;
mod scene_builder;
mod viewer_config;

use std::collections::HashMap;

use scene_core::assets::{FileFetcher, ModelHandle, ModelLoader, ModelSource, ModelState};
use scene_core::core::Config;
use scene_core::foundation::logging;
use scene_core::render::{render_scene, RenderContext};

use logging_backend::LoggingBackend;
use viewer_config::ViewerConfig;

const DEFAULT_SCENE: &str = "scene.toml";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_SCENE.to_string());
    let config = ViewerConfig::load_or_default(&path)?;
    log::info!(
        "Scene: {} models, {} nodes, {} frames, assets from {}",
        config.models.len(),
        config.nodes.len(),
        config.frames,
        config.assets.base_resource_location
    );

    let models = load_models(&config);
    scene_builder::validate(&config.nodes, &models)?;

    let mut backend = LoggingBackend::default();
    let mut ctx = RenderContext::new(config.view());
    for _ in 0..config.frames {
        let scene = scene_builder::build(&config.nodes, &models, ctx.frame);
        let draws = render_scene(&scene, &ctx, &mut backend)?;
        log::debug!("Frame {} issued {} draw(s)", ctx.frame, draws);
        ctx.advance_frame();
    }

    log::info!(
        "Rendered {} frame(s): {} draw(s), {} byte(s) of vertex data",
        config.frames,
        backend.draws(),
        backend.uploaded_bytes()
    );
    Ok(())
}

/// Load every configured model concurrently
///
/// Failed models stay in the map; the renderer skips them.
fn load_models(config: &ViewerConfig) -> HashMap<String, ModelHandle> {
    let loader = ModelLoader::new(FileFetcher::from_config(&config.assets), config.assets.clone());
    let loads = config.models.iter().map(|entry| {
        let tasks = loader.begin(ModelSource::new(entry.geometry.clone(), entry.material.clone()));
        let name = entry.name.clone();
        async move { (name, tasks.run().await) }
    });
    let models: HashMap<String, ModelHandle> = pollster::block_on(futures::future::join_all(loads))
        .into_iter()
        .collect();

    for (name, model) in &models {
        if let ModelState::Failed(err) = model.state() {
            log::error!("Model {} failed to load: {}", name, err);
        }
    }
    models
}
