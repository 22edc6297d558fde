//! # Scene Module
//!
//! Everything the renderer needs each frame: the animation state, the two
//! rigs it drives, and the fixed camera.
//!
//! ## Key Components
//!
//! - [`Hierarchy`] - arena of transform nodes evaluated depth-first
//! - [`rigs`] - the figure (16 nodes) and ball (5 nodes) topologies
//! - [`Animator`] - the two-phase scripted ball animation
//! - [`CameraRig`] - fixed field-of-view projection with identity view
//!
//! ## Usage
//!
//! ```no_run
//! use teapot_rig::scene::{InputEvent, Scene};
//!
//! let mut scene = Scene::default();
//! scene.handle_input(InputEvent::Step);
//! for instance in scene.evaluate() {
//!     println!("{} -> {:?}", instance.name, instance.global);
//! }
//! ```

pub mod animation;
pub mod camera;
pub mod hierarchy;
pub mod rigs;

pub use animation::{AnimationConfig, AnimationState, Animator, InputEvent, Phase};
pub use camera::{CameraRig, CameraUniform};
pub use hierarchy::{DrawInstance, Hierarchy, LocalTransform, MeshHandle, NodeId};

/// The animated scene: both rigs plus the state that drives them.
pub struct Scene {
    animator: Animator,
    camera: CameraRig,
    figure: Hierarchy,
    ball: Hierarchy,
    instances: Vec<DrawInstance>,
}

impl Scene {
    pub fn new(config: AnimationConfig, camera: CameraRig) -> Self {
        let figure = rigs::figure(MeshHandle::SHARED);
        let ball = rigs::ball(MeshHandle::SHARED);
        let capacity = figure.node_count() + ball.node_count();

        log::info!(
            "Scene built: '{}' ({} nodes), '{}' ({} nodes)",
            figure.name(),
            figure.node_count(),
            ball.name(),
            ball.node_count()
        );

        Self {
            animator: Animator::new(config),
            camera,
            figure,
            ball,
            instances: Vec::with_capacity(capacity),
        }
    }

    /// Routes a discrete input event to the animation.
    pub fn handle_input(&mut self, event: InputEvent) {
        self.animator.handle(event);
    }

    /// Evaluates both rigs for the current animation state.
    ///
    /// The figure's instances come first, then the ball's.
    pub fn evaluate(&mut self) -> &[DrawInstance] {
        self.instances.clear();
        let state = self.animator.state();
        self.figure.evaluate_into(state, &mut self.instances);
        self.ball.evaluate_into(state, &mut self.instances);
        &self.instances
    }

    /// Instances produced by the last [`Scene::evaluate`]
    pub fn instances(&self) -> &[DrawInstance] {
        &self.instances
    }

    /// Total number of nodes across both rigs
    pub fn instance_capacity(&self) -> usize {
        self.figure.node_count() + self.ball.node_count()
    }

    pub fn camera_uniform(&self, width: u32, height: u32) -> CameraUniform {
        self.camera.uniform(width, height)
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn state(&self) -> &AnimationState {
        self.animator.state()
    }

    pub fn figure(&self) -> &Hierarchy {
        &self.figure
    }

    pub fn ball(&self) -> &Hierarchy {
        &self.ball
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(AnimationConfig::default(), CameraRig::default())
    }
}
