//=========================================================================
// Scene Graph
//=========================================================================
//
// Arena-backed node tree owned by a single screen state.
//
// Architecture:
//   SceneGraph
//     ├─ nodes: Vec<Node>        (arena, indexed by NodeId)
//     └─ roots: Vec<NodeId>      (top-level insertion order)
//
// Node kinds are a closed enum. Mesh nodes are the only ones carrying a
// `Material`; callers resolve the material-bearing nodes of a subtree once
// (`material_nodes`) and reuse that list every frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use glam::{EulerRot, Mat4, Quat, Vec3};

//=== Internal Dependencies ===============================================

use super::geometry::{Geometry, Ray};
use super::material::{Color, Material};

//=== NodeId ==============================================================

/// Handle to a node inside one `SceneGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

//=== Transform ===========================================================

/// Local translation, Euler rotation (radians, XYZ order) and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::IDENTITY }
    }

    /// Local-to-parent matrix.
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

//=== Node ================================================================

/// Drawable surface: optional geometry plus material.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: Option<Arc<Geometry>>,
    pub material: Material,
}

/// What a node contributes to the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Pure transform parent.
    Group,

    /// Uniform light applied to every surface.
    AmbientLight { color: Color, intensity: f32 },

    /// Drawable surface with a material.
    Mesh(Mesh),
}

/// One entry in the scene graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn group(name: &str) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    pub fn ambient_light(color: Color, intensity: f32) -> Self {
        Self::with_kind("ambient_light", NodeKind::AmbientLight { color, intensity })
    }

    pub fn mesh(name: &str, geometry: Option<Arc<Geometry>>, material: Material) -> Self {
        Self::with_kind(name, NodeKind::Mesh(Mesh { geometry, material }))
    }

    fn with_kind(name: &str, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::IDENTITY,
            kind,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

//=== Model ===============================================================

/// Loaded model template, instantiated into a graph as a group of meshes.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    pub parts: Vec<ModelPart>,
}

/// One mesh of a model template.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPart {
    pub name: String,
    pub geometry: Option<Arc<Geometry>>,
    pub material: Material,
    pub transform: Transform,
}

//=== HitRecord ===========================================================

/// One ray/mesh intersection in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    pub node: NodeId,
    /// World-space distance from the ray origin.
    pub distance: f32,
    pub point: Vec3,
    /// Triangle index within the node's geometry.
    pub face: usize,
}

//=== SceneGraph ==========================================================

/// Node arena with parent/child links.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Insertion --------------------------------------------------------

    /// Adds a top-level node.
    pub fn add(&mut self, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = None;
        node.children.clear();
        self.nodes.push(node);
        self.roots.push(id);
        id
    }

    /// Adds `node` under `parent`. Returns `None` if `parent` does not exist.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> Option<NodeId> {
        if parent.0 >= self.nodes.len() {
            return None;
        }

        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Some(id)
    }

    /// Inserts a model as a top-level group with one mesh child per part.
    pub fn instantiate(&mut self, model: &Model) -> NodeId {
        let root = self.add(Node::group(&model.name));

        for part in &model.parts {
            let node = Node::mesh(&part.name, part.geometry.clone(), part.material.clone())
                .with_transform(part.transform);
            // Parent was just inserted
            let _ = self.add_child(root, node);
        }

        root
    }

    /// Drops every node. Outstanding `NodeId`s become dangling.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }

    //--- Access -----------------------------------------------------------

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.nodes.get_mut(id.0).map(|node| &mut node.transform)
    }

    /// Material of a mesh node; `None` for other kinds.
    pub fn material_mut(&mut self, id: NodeId) -> Option<&mut Material> {
        match self.nodes.get_mut(id.0).map(|node| &mut node.kind) {
            Some(NodeKind::Mesh(mesh)) => Some(&mut mesh.material),
            _ => None,
        }
    }

    /// `root` and all of its descendants, depth-first pre-order.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.node(root).is_none() {
            return out;
        }

        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Mesh nodes (material-bearing) in the subtree rooted at `root`.
    pub fn material_nodes(&self, root: NodeId) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| matches!(self.node(*id).map(|n| &n.kind), Some(NodeKind::Mesh(_))))
            .collect()
    }

    /// Whether the node and all its ancestors are visible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.node(node_id) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Local-to-world matrix (identity for unknown nodes).
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);

        while let Some(node_id) = current {
            let Some(node) = self.node(node_id) else { break };
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }

        matrix
    }

    //--- Spatial Query ----------------------------------------------------

    /// Intersects `ray` with every mesh in the subtree at `root`.
    ///
    /// Results are sorted nearest first; ties keep traversal order. Nodes
    /// without geometry or with a singular world matrix contribute nothing.
    pub fn raycast(&self, root: NodeId, ray: &Ray) -> Vec<HitRecord> {
        let mut hits = Vec::new();

        for id in self.descendants(root) {
            let Some(Node { kind: NodeKind::Mesh(mesh), .. }) = self.node(id) else {
                continue;
            };
            let Some(geometry) = mesh.geometry.as_deref() else {
                continue;
            };
            if geometry.is_empty() {
                continue;
            }

            let world = self.world_matrix(id);
            let det = world.determinant();
            if det == 0.0 || !det.is_finite() {
                continue;
            }
            let inverse = world.inverse();
            if !inverse.is_finite() {
                continue;
            }
            let local_ray = ray.transformed(&inverse);

            for (t, face) in geometry.intersect_local(&local_ray) {
                let point = world.transform_point3(local_ray.at(t));
                hits.push(HitRecord {
                    node: id,
                    distance: point.distance(ray.origin),
                    point,
                    face,
                });
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
