//! Scene graph hierarchy
//!
//! A tree of nodes, each with a local transform and an optional model.
//! Nodes own their children by value, so a node can only ever sit under one
//! parent and the graph cannot contain cycles.

use crate::assets::ModelHandle;
use crate::foundation::math::Mat4;

/// A node in the scene hierarchy
#[derive(Debug, Clone)]
pub struct Node {
    local: Mat4,
    model: Option<ModelHandle>,
    children: Vec<Node>,
}

impl Default for Node {
    fn default() -> Self {
        Self::new(Mat4::identity())
    }
}

impl Node {
    /// Create a node without a model
    pub fn new(local: impl Into<Mat4>) -> Self {
        Self {
            local: local.into(),
            model: None,
            children: Vec::new(),
        }
    }

    /// Create a node placing `model`
    pub fn with_model(local: impl Into<Mat4>, model: ModelHandle) -> Self {
        Self {
            model: Some(model),
            ..Self::new(local)
        }
    }

    /// Builder pattern: append a child
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child and return it for further building
    pub fn add_child(&mut self, child: Node) -> &mut Node {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Transform relative to the parent
    pub fn local_transform(&self) -> &Mat4 {
        &self.local
    }

    /// Replace the transform relative to the parent
    pub fn set_local_transform(&mut self, local: impl Into<Mat4>) {
        self.local = local.into();
    }

    /// Model placed by this node
    pub fn model(&self) -> Option<&ModelHandle> {
        self.model.as_ref()
    }

    /// Attach or detach a model
    pub fn set_model(&mut self, model: Option<ModelHandle>) {
        self.model = model;
    }

    /// Children in insertion order
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Mutable children, e.g. to animate transforms between frames
    pub fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }
}

/// Walk a hierarchy, yielding `(world transform, model)` for every node with a model
///
/// `world = parent_world * local`, in pre-order depth-first order with
/// children visited in insertion order. The walk is lazy and has no side
/// effects, so it can be restarted freely.
pub fn traverse(root: &Node, parent_world: Mat4) -> Traversal<'_> {
    Traversal {
        stack: vec![(parent_world, root)],
    }
}

/// Iterator returned by [`traverse`]
#[derive(Debug, Clone)]
pub struct Traversal<'a> {
    stack: Vec<(Mat4, &'a Node)>,
}

impl<'a> Iterator for Traversal<'a> {
    type Item = (Mat4, &'a ModelHandle);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((parent_world, node)) = self.stack.pop() {
            let world = parent_world * node.local;
            // Reverse so the first child is popped first
            self.stack.extend(node.children.iter().rev().map(|child| (world, child)));
            if let Some(model) = &node.model {
                return Some((world, model));
            }
        }
        None
    }
}

/// A scene: one root node and everything below it
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    root: Node,
}

impl SceneGraph {
    /// Create a scene from its root
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// The root node
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Mutable root, for building or animating the tree between traversals
    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Walk the whole scene under `parent_world`
    pub fn traverse(&self, parent_world: Mat4) -> Traversal<'_> {
        traverse(&self.root, parent_world)
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }
}
