//! Builds the scene graph for a frame from the configured node list

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use scene_core::assets::ModelHandle;
use scene_core::foundation::math::Mat4;
use scene_core::scene::{Node, SceneGraph};

use crate::viewer_config::NodeEntry;

/// Problems in the configured hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("Duplicate node name: {0}")]
    DuplicateNode(String),

    #[error("Node {node} references unknown model {model}")]
    UnknownModel { node: String, model: String },

    #[error("Node {node} references unknown parent {parent}")]
    UnknownParent { node: String, parent: String },

    #[error("Node {0} is part of a parent cycle")]
    Cycle(String),
}

/// Check names, references and parent links once, before any frame is built
pub fn validate(nodes: &[NodeEntry], models: &HashMap<String, ModelHandle>) -> Result<(), SceneError> {
    let mut names = HashSet::new();
    for node in nodes {
        if !names.insert(node.name.as_str()) {
            return Err(SceneError::DuplicateNode(node.name.clone()));
        }
    }

    for node in nodes {
        if let Some(model) = &node.model {
            if !models.contains_key(model) {
                return Err(SceneError::UnknownModel {
                    node: node.name.clone(),
                    model: model.clone(),
                });
            }
        }
        if let Some(parent) = &node.parent {
            if !names.contains(parent.as_str()) {
                return Err(SceneError::UnknownParent {
                    node: node.name.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    // Every node must reach a root by following parents
    let parents: HashMap<&str, Option<&str>> = nodes
        .iter()
        .map(|node| (node.name.as_str(), node.parent.as_deref()))
        .collect();
    for node in nodes {
        let mut current = node.parent.as_deref();
        let mut steps = 0;
        while let Some(name) = current {
            steps += 1;
            if steps > nodes.len() {
                return Err(SceneError::Cycle(node.name.clone()));
            }
            current = parents.get(name).copied().flatten();
        }
    }

    Ok(())
}

/// Build the scene for `frame` from validated nodes
///
/// Parentless nodes hang off an identity root, in configuration order.
pub fn build(nodes: &[NodeEntry], models: &HashMap<String, ModelHandle>, frame: u64) -> SceneGraph {
    let mut root = Node::new(Mat4::identity());
    for entry in nodes.iter().filter(|entry| entry.parent.is_none()) {
        root.add_child(build_node(entry, nodes, models, frame));
    }
    SceneGraph::new(root)
}

fn build_node(entry: &NodeEntry, nodes: &[NodeEntry], models: &HashMap<String, ModelHandle>, frame: u64) -> Node {
    let mut node = Node::new(entry.local_transform(frame));
    node.set_model(entry.model.as_ref().and_then(|name| models.get(name)).cloned());
    for child in nodes.iter().filter(|n| n.parent.as_deref() == Some(entry.name.as_str())) {
        node.add_child(build_node(child, nodes, models, frame));
    }
    node
}
