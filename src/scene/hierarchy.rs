//! # Transform Hierarchy
//!
//! A fixed tree of nodes stored in an arena. Every node draws the same shared
//! mesh and owns a local transform relative to its parent, either a constant
//! matrix or a function of the current [`AnimationState`].
//!
//! Evaluation walks the tree depth-first in pre-order, so a node's global
//! transform is always computed from an already-computed parent global:
//!
//! ```text
//! global(root)  = placement * local(root)
//! global(child) = global(parent) * local(child)
//! ```
//!
//! Nodes can only be attached to parents that already exist, so the arena can
//! never contain a cycle.

use cgmath::Matrix4;

use crate::math::transform::{compose, identity};

use super::animation::AnimationState;

/// Index of a node inside its [`Hierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Handle of a mesh uploaded by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MeshHandle(pub usize);

impl MeshHandle {
    /// The single mesh shared by every node in both rigs
    pub const SHARED: MeshHandle = MeshHandle(0);
}

/// A node's transform relative to its parent.
#[derive(Clone, Copy)]
pub enum LocalTransform {
    Fixed(Matrix4<f32>),
    Animated(fn(&AnimationState) -> Matrix4<f32>),
}

impl LocalTransform {
    pub fn evaluate(&self, state: &AnimationState) -> Matrix4<f32> {
        match self {
            LocalTransform::Fixed(matrix) => *matrix,
            LocalTransform::Animated(f) => f(state),
        }
    }
}

impl std::fmt::Debug for LocalTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocalTransform::Fixed(matrix) => f.debug_tuple("Fixed").field(matrix).finish(),
            LocalTransform::Animated(_) => f.write_str("Animated(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: &'static str,
    pub parent: Option<NodeId>,
    pub local: LocalTransform,
    children: Vec<NodeId>,
}

impl Node {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// One mesh draw with its world transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawInstance {
    pub node: NodeId,
    pub name: &'static str,
    pub mesh: MeshHandle,
    pub global: Matrix4<f32>,
}

/// An arena-backed tree of transform nodes.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    name: &'static str,
    placement: Matrix4<f32>,
    mesh: MeshHandle,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Hierarchy {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            placement: identity(),
            mesh: MeshHandle::SHARED,
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Sets the world-space offset applied above the roots (builder pattern)
    pub fn with_placement(mut self, placement: Matrix4<f32>) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshHandle) -> Self {
        self.mesh = mesh;
        self
    }

    /// Adds a node and returns its id.
    ///
    /// # Panics
    /// Panics if `parent` does not name a node already in this hierarchy.
    pub fn add_node(
        &mut self,
        name: &'static str,
        parent: Option<NodeId>,
        local: LocalTransform,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());

        match parent {
            Some(parent_id) => {
                assert!(
                    parent_id.0 < self.nodes.len(),
                    "node '{}' attached to unknown parent {:?} in hierarchy '{}'",
                    name,
                    parent_id,
                    self.name
                );
                self.nodes[parent_id.0].children.push(id);
            }
            None => self.roots.push(id),
        }

        self.nodes.push(Node {
            name,
            parent,
            local,
            children: Vec::new(),
        });
        id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn placement(&self) -> Matrix4<f32> {
        self.placement
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Finds a node by name
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(NodeId)
    }

    pub fn local_transform(&self, id: NodeId, state: &AnimationState) -> Matrix4<f32> {
        self.nodes[id.0].local.evaluate(state)
    }

    /// Number of edges between `id` and its root
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent.0].parent;
        }
        depth
    }

    /// Evaluates every node for `state` in depth-first pre-order.
    pub fn evaluate(&self, state: &AnimationState) -> Vec<DrawInstance> {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.evaluate_into(state, &mut out);
        out
    }

    /// Same as [`Hierarchy::evaluate`] but appends to `out`, so the caller can
    /// reuse one buffer across frames and hierarchies.
    pub fn evaluate_into(&self, state: &AnimationState, out: &mut Vec<DrawInstance>) {
        out.reserve(self.nodes.len());

        // Stack entries carry the parent's global so each node is composed
        // only after its parent has been emitted
        let mut stack: Vec<(NodeId, Matrix4<f32>)> = self
            .roots
            .iter()
            .rev()
            .map(|&root| (root, self.placement))
            .collect();

        while let Some((id, parent_global)) = stack.pop() {
            let node = &self.nodes[id.0];
            let global = compose(parent_global, node.local.evaluate(state));

            out.push(DrawInstance {
                node: id,
                name: node.name,
                mesh: self.mesh,
                global,
            });

            stack.extend(node.children.iter().rev().map(|&child| (child, global)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::transform::{rotate_z, translate};
    use cgmath::{assert_abs_diff_eq, Vector3};

    fn bent(state: &AnimationState) -> Matrix4<f32> {
        rotate_z(state.spine_bend)
    }

    fn chain() -> (Hierarchy, [NodeId; 3]) {
        let mut h = Hierarchy::new("chain").with_placement(translate(Vector3::new(1.0, 0.0, 0.0)));
        let root = h.add_node(
            "root",
            None,
            LocalTransform::Fixed(translate(Vector3::new(0.0, 2.0, 0.0))),
        );
        let a = h.add_node("a", Some(root), LocalTransform::Animated(bent));
        let b = h.add_node(
            "b",
            Some(a),
            LocalTransform::Fixed(translate(Vector3::new(3.0, 0.0, 0.0))),
        );
        (h, [root, a, b])
    }

    #[test]
    fn test_three_deep_chain() {
        let (h, [root, a, b]) = chain();
        let state = AnimationState {
            spine_bend: 30.0,
            ..Default::default()
        };

        let out = h.evaluate(&state);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].node, root);
        assert_eq!(out[1].node, a);
        assert_eq!(out[2].node, b);

        let l_root = h.local_transform(root, &state);
        let l_a = h.local_transform(a, &state);
        let l_b = h.local_transform(b, &state);

        let expected = compose(compose(h.placement(), l_root), compose(l_a, l_b));
        assert_abs_diff_eq!(out[2].global, expected, epsilon = 1e-4);
    }

    #[test]
    fn test_global_is_parent_global_times_local() {
        let (h, _) = chain();
        let state = AnimationState {
            spine_bend: -45.0,
            ..Default::default()
        };
        let out = h.evaluate(&state);

        for instance in &out {
            let parent_global = match h.parent(instance.node) {
                Some(parent) => {
                    out.iter()
                        .find(|i| i.node == parent)
                        .expect("parent emitted")
                        .global
                }
                None => h.placement(),
            };
            let local = h.local_transform(instance.node, &state);
            assert_abs_diff_eq!(instance.global, compose(parent_global, local), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_parent_emitted_before_child() {
        let (h, _) = chain();
        let out = h.evaluate(&AnimationState::default());
        for (i, instance) in out.iter().enumerate() {
            if let Some(parent) = h.parent(instance.node) {
                let parent_pos = out.iter().position(|p| p.node == parent).unwrap();
                assert!(parent_pos < i);
            }
        }
    }

    #[test]
    fn test_pre_order_with_siblings() {
        let mut h = Hierarchy::new("tree");
        let fixed = LocalTransform::Fixed(identity());
        let r = h.add_node("r", None, fixed);
        let x = h.add_node("x", Some(r), fixed);
        let _y = h.add_node("y", Some(r), fixed);
        let _x1 = h.add_node("x1", Some(x), fixed);

        let names: Vec<_> = h
            .evaluate(&AnimationState::default())
            .iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, ["r", "x", "x1", "y"]);
        assert_eq!(h.find("x1").map(|id| h.depth(id)), Some(2));
        assert_eq!(h.node(r).children().len(), 2);
    }

    #[test]
    fn test_evaluate_into_appends() {
        let (h, _) = chain();
        let mut out = Vec::new();
        h.evaluate_into(&AnimationState::default(), &mut out);
        h.evaluate_into(&AnimationState::default(), &mut out);
        assert_eq!(out.len(), 6);
        assert_eq!(out[0], out[3]);
    }

    #[test]
    #[should_panic(expected = "unknown parent")]
    fn test_unknown_parent_panics() {
        let mut h = Hierarchy::new("broken");
        let mut other = Hierarchy::new("other");
        other.add_node("a", None, LocalTransform::Fixed(identity()));
        let foreign = other.add_node("b", other.find("a"), LocalTransform::Fixed(identity()));
        h.add_node("orphan", Some(foreign), LocalTransform::Fixed(identity()));
    }
}
