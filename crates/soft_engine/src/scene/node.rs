//! Scene graph nodes
//!
//! A node owns a local transform, an ordered list of children, and one of a
//! closed set of payloads (group, mesh, light). Traversal composes world
//! matrices parent-then-child and drives the per-node callback hooks that
//! gameplay code (physics steppers, particle emitters, orbit animations)
//! attaches.

use std::fmt;

use crate::foundation::math::{Mat4, Point3, Vec3};
use crate::scene::render_list::{ClipFlags, ScreenVertex};
use crate::scene::{Camera, Geometry, Light, Perspective, Style, Viewport};

/// Read-only scene context handed to transform hooks
pub struct FrameContext<'a> {
    /// The scene's camera
    pub camera: &'a Camera,
    /// The scene's projection settings
    pub perspective: &'a Perspective,
    /// The scene's output viewport
    pub viewport: &'a Viewport,
    /// Current animation time in seconds
    pub time: f32,
}

/// Callback invoked before a node's world matrix is composed
///
/// May mutate the node's local transform, payload, or children. Hooks run
/// synchronously in registration order.
pub type BeforeTransformHook = Box<dyn FnMut(&mut SceneNode, &FrameContext<'_>)>;

/// Callback invoked after a node's world matrix is composed
///
/// Receives the just-computed world matrix; used by positional entities to
/// record world state and by emitters to spawn or expire children.
pub type AfterTransformHook = Box<dyn FnMut(&mut SceneNode, &Mat4, &FrameContext<'_>)>;

/// The closed set of node payloads
#[derive(Debug)]
pub enum NodeKind {
    /// Pure transform node with no drawable payload
    Group,
    /// Drawable mesh with its rendering style
    Mesh {
        /// Immutable mesh data
        geometry: Geometry,
        /// Rendering style
        style: Style,
    },
    /// Light source carried through the graph transform
    Light(Light),
}

/// Per-frame transient state written by the pipeline
///
/// Buffers are cleared and refilled every frame; capacity is retained so
/// steady-state frames do not allocate.
pub(crate) struct NodeFrame {
    pub world_matrix: Mat4,
    pub coords: Vec<ScreenVertex>,
    pub world_coords: Vec<Point3>,
    pub clip: Vec<ClipFlags>,
}

impl Default for NodeFrame {
    fn default() -> Self {
        Self {
            world_matrix: Mat4::identity(),
            coords: Vec::new(),
            world_coords: Vec::new(),
            clip: Vec::new(),
        }
    }
}

/// A transformable entity in the scene graph
pub struct SceneNode {
    /// Optional unique lookup key
    pub id: Option<String>,
    /// Transform relative to the parent node
    pub local_transform: Mat4,
    /// The node's payload
    pub kind: NodeKind,
    /// Disabled nodes are skipped along with their entire subtree
    pub enabled: bool,
    /// Owned children, traversed in array order
    pub children: Vec<SceneNode>,
    /// Record the node's world-space origin each frame when set
    pub track_world_position: bool,
    /// World-space origin captured during the last traversal, if tracked
    pub world_position: Option<Vec3>,
    before_hooks: Vec<BeforeTransformHook>,
    after_hooks: Vec<AfterTransformHook>,
    pub(crate) frame: NodeFrame,
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("enabled", &self.enabled)
            .field("children", &self.children)
            .field("before_hooks", &self.before_hooks.len())
            .field("after_hooks", &self.after_hooks.len())
            .finish_non_exhaustive()
    }
}

impl SceneNode {
    fn with_kind(kind: NodeKind) -> Self {
        Self {
            id: None,
            local_transform: Mat4::identity(),
            kind,
            enabled: true,
            children: Vec::new(),
            track_world_position: false,
            world_position: None,
            before_hooks: Vec::new(),
            after_hooks: Vec::new(),
            frame: NodeFrame::default(),
        }
    }

    /// Create a pure transform node
    pub fn group() -> Self {
        Self::with_kind(NodeKind::Group)
    }

    /// Create a drawable mesh node
    pub fn mesh(geometry: Geometry, style: Style) -> Self {
        Self::with_kind(NodeKind::Mesh { geometry, style })
    }

    /// Create a light node
    pub fn light(light: Light) -> Self {
        Self::with_kind(NodeKind::Light(light))
    }

    /// Builder pattern: set the lookup id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder pattern: set the local transform
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.local_transform = transform;
        self
    }

    /// Builder pattern: append a child
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Builder pattern: record the node's world position every frame
    pub fn with_world_position_tracking(mut self) -> Self {
        self.track_world_position = true;
        self
    }

    /// Register a hook to run before this node's world matrix is composed
    pub fn on_before_transform(
        mut self,
        hook: impl FnMut(&mut SceneNode, &FrameContext<'_>) + 'static,
    ) -> Self {
        self.before_hooks.push(Box::new(hook));
        self
    }

    /// Register a hook to run after this node's world matrix is composed
    pub fn on_after_transform(
        mut self,
        hook: impl FnMut(&mut SceneNode, &Mat4, &FrameContext<'_>) + 'static,
    ) -> Self {
        self.after_hooks.push(Box::new(hook));
        self
    }

    /// The node's mesh data, if it is a mesh node
    pub fn geometry(&self) -> Option<&Geometry> {
        match &self.kind {
            NodeKind::Mesh { geometry, .. } => Some(geometry),
            _ => None,
        }
    }

    /// The node's style, if it is a mesh node
    pub fn style(&self) -> Option<&Style> {
        match &self.kind {
            NodeKind::Mesh { style, .. } => Some(style),
            _ => None,
        }
    }

    /// The world matrix composed during the most recent traversal
    pub fn world_matrix(&self) -> &Mat4 {
        &self.frame.world_matrix
    }

    /// Find a node by id in this subtree
    pub fn find_node(&self, id: &str) -> Option<&SceneNode> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_node(id))
    }

    /// Find a node by id in this subtree, mutably
    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut SceneNode> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_node_mut(id))
    }

    /// Walk this subtree: run hooks, compose world matrices, and hand every
    /// enabled node to `capture` for transient coordinate processing.
    ///
    /// Hooks may add or remove children of their own node; the child loop
    /// re-checks the length each step so the traversal tolerates mid-frame
    /// structure changes. Hooks registered from inside a hook take effect on
    /// the next frame.
    pub(crate) fn update_recursive(
        &mut self,
        parent_world: &Mat4,
        ctx: &FrameContext<'_>,
        capture: &mut dyn FnMut(&mut SceneNode),
    ) {
        if !self.enabled {
            return;
        }

        // The hook list is detached while running so hooks can borrow the
        // node itself; hooks pushed meanwhile are re-appended afterwards.
        let mut hooks = std::mem::take(&mut self.before_hooks);
        for hook in &mut hooks {
            hook(self, ctx);
        }
        hooks.append(&mut self.before_hooks);
        self.before_hooks = hooks;

        let world = parent_world * self.local_transform;
        self.frame.world_matrix = world;

        let mut hooks = std::mem::take(&mut self.after_hooks);
        for hook in &mut hooks {
            hook(self, &world, ctx);
        }
        hooks.append(&mut self.after_hooks);
        self.after_hooks = hooks;

        if self.track_world_position {
            self.world_position = Some(world.transform_point(&Point3::origin()).coords);
        }

        capture(self);

        let mut i = 0;
        while i < self.children.len() {
            self.children[i].update_recursive(&world, ctx, capture);
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4Ext;
    use approx::assert_relative_eq;

    fn run_traversal(root: &mut SceneNode) {
        let camera = Camera::default();
        let perspective = Perspective::default();
        let viewport = Viewport::new(64, 64);
        let ctx = FrameContext {
            camera: &camera,
            perspective: &perspective,
            viewport: &viewport,
            time: 0.0,
        };
        root.update_recursive(&Mat4::identity(), &ctx, &mut |_| {});
    }

    #[test]
    fn test_world_matrix_is_chained_ancestor_product() {
        let child_local = Mat4::rotation_y(0.5);
        let parent_local = Mat4::new_translation(&Vec3::new(3.0, 0.0, 0.0));

        let mut root = SceneNode::group()
            .with_transform(parent_local)
            .with_child(
                SceneNode::group()
                    .with_id("inner")
                    .with_transform(child_local),
            );
        run_traversal(&mut root);

        let expected = parent_local * child_local;
        let inner = root.find_node("inner").unwrap();
        assert_relative_eq!(*inner.world_matrix(), expected, epsilon = 1.0e-6);
        assert_relative_eq!(
            inner.world_matrix().determinant(),
            expected.determinant(),
            epsilon = 1.0e-6
        );

        // The composed matrix maps points exactly like the explicit product
        let probe = Point3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(
            inner.world_matrix().transform_point(&probe),
            expected.transform_point(&probe),
            epsilon = 1.0e-5
        );
    }

    #[test]
    fn test_disabled_node_skips_subtree_and_hooks() {
        use std::cell::Cell;
        use std::rc::Rc;

        let fired = Rc::new(Cell::new(0u32));
        let inner_fired = fired.clone();
        let mut disabled = SceneNode::group()
            .with_child(SceneNode::group().on_before_transform(move |_, _| {
                inner_fired.set(inner_fired.get() + 1);
            }));
        disabled.enabled = false;

        let mut root = SceneNode::group().with_child(disabled);
        run_traversal(&mut root);
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_before_hook_mutates_local_transform_before_composition() {
        let mut root = SceneNode::group()
            .with_id("animated")
            .on_before_transform(|node, ctx| {
                node.local_transform = Mat4::new_translation(&Vec3::new(ctx.time, 0.0, 0.0));
            });

        let camera = Camera::default();
        let perspective = Perspective::default();
        let viewport = Viewport::new(64, 64);
        let ctx = FrameContext {
            camera: &camera,
            perspective: &perspective,
            viewport: &viewport,
            time: 2.5,
        };
        root.update_recursive(&Mat4::identity(), &ctx, &mut |_| {});

        let moved = root.world_matrix().transform_point(&Point3::origin());
        assert_relative_eq!(moved.x, 2.5, epsilon = 1.0e-6);
    }

    #[test]
    fn test_emitter_hook_spawns_children_traversed_same_frame() {
        let mut root = SceneNode::group().on_after_transform(|node, _, _| {
            // Emitter-style: one new child per frame, expire the oldest
            // beyond a cap of two
            node.children.push(SceneNode::group());
            if node.children.len() > 2 {
                node.children.remove(0);
            }
        });

        run_traversal(&mut root);
        assert_eq!(root.children.len(), 1);
        run_traversal(&mut root);
        assert_eq!(root.children.len(), 2);
        run_traversal(&mut root);
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn test_world_position_tracking() {
        let mut root = SceneNode::group()
            .with_transform(Mat4::new_translation(&Vec3::new(0.0, 4.0, -1.0)))
            .with_world_position_tracking();
        run_traversal(&mut root);
        let position = root.world_position.expect("position tracked");
        assert_relative_eq!(position, Vec3::new(0.0, 4.0, -1.0), epsilon = 1.0e-6);
    }

    #[test]
    fn test_find_node_walks_depth_first() {
        let root = SceneNode::group()
            .with_id("root")
            .with_child(SceneNode::group().with_id("a"))
            .with_child(SceneNode::group().with_child(SceneNode::group().with_id("deep")));
        assert!(root.find_node("a").is_some());
        assert!(root.find_node("deep").is_some());
        assert!(root.find_node("missing").is_none());
    }
}
