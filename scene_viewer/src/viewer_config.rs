//! Scene description loaded from `scene.toml` / `scene.ron`

use serde::{Deserialize, Serialize};

use scene_core::core::{AssetConfig, Config};
use scene_core::foundation::math::{utils::deg_to_rad, Mat4, Mat4Ext, Quat, Transform, Vec3};

/// A model to load: geometry and material file names under the asset base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    pub geometry: String,
    pub material: String,
}

impl ModelEntry {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            geometry: format!("{}.obj", name),
            material: format!("{}.mtl", name),
        }
    }
}

/// A node in the hierarchy
///
/// The local transform at frame `n` is
/// `translate(translation + drift * n) * rotate_z(rotation_z_degrees + spin_degrees * n)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeEntry {
    pub name: String,
    pub parent: Option<String>,
    pub model: Option<String>,
    pub translation: [f32; 3],
    pub rotation_z_degrees: f32,
    pub spin_degrees: f32,
    pub drift: [f32; 3],
}

impl Default for NodeEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            parent: None,
            model: None,
            translation: [0.0; 3],
            rotation_z_degrees: 0.0,
            spin_degrees: 0.0,
            drift: [0.0; 3],
        }
    }
}

impl NodeEntry {
    /// Local transform for a given frame
    pub fn local_transform(&self, frame: u64) -> Mat4 {
        #[allow(clippy::cast_precision_loss)]
        let n = frame as f32;
        let [x, y, z] = self.translation;
        let [dx, dy, dz] = self.drift;
        let angle = deg_to_rad(self.rotation_z_degrees + self.spin_degrees * n);
        Transform::from_position_rotation(
            Vec3::new(x + dx * n, y + dy * n, z + dz * n),
            Quat::from_axis_angle(&Vec3::z_axis(), angle),
        )
        .into()
    }
}

/// Viewer settings and scene description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub assets: AssetConfig,
    /// Number of frames to render before exiting
    pub frames: u64,
    /// Camera position; the view looks down -Z from here
    pub eye: [f32; 3],
    pub models: Vec<ModelEntry>,
    pub nodes: Vec<NodeEntry>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let spinning = |name: &str| NodeEntry {
            name: name.to_string(),
            model: Some(name.to_string()),
            spin_degrees: 0.5,
            ..NodeEntry::default()
        };

        Self {
            assets: AssetConfig::default(),
            frames: 3,
            eye: [0.0, 0.0, 4.0],
            models: ["stopsign", "lamp", "car", "street", "bunny"]
                .into_iter()
                .map(ModelEntry::named)
                .collect(),
            nodes: vec![
                NodeEntry {
                    name: "car".to_string(),
                    model: Some("car".to_string()),
                    translation: [0.0, -1.0, -1.0],
                    drift: [0.005, 0.0, 0.0],
                    ..NodeEntry::default()
                },
                NodeEntry {
                    parent: Some("car".to_string()),
                    ..spinning("bunny")
                },
                spinning("stopsign"),
                NodeEntry {
                    name: "lamp".to_string(),
                    model: Some("lamp".to_string()),
                    translation: [1.0, 1.0, 1.0],
                    ..NodeEntry::default()
                },
                spinning("street"),
            ],
        }
    }
}

impl Config for ViewerConfig {}

impl ViewerConfig {
    /// View matrix for the configured eye position
    pub fn view(&self) -> Mat4 {
        let [x, y, z] = self.eye;
        Mat4::translation(-x, -y, -z)
    }
}
