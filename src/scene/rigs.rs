//! The two fixed rigs drawn every frame
//!
//! The figure is a torso with a two-segment spine carrying shoulders and arms,
//! and two five-segment legs hanging from the torso. The fourth segment of the
//! right leg is the knee driven by [`AnimationState::spine_bend`].
//!
//! The ball is a root with four limb stubs; its root follows the scripted
//! spin, roll and fall values.

use cgmath::{Matrix4, Vector3};

use crate::math::transform::{compose, rotate_z, scale, translate};

use super::{
    animation::AnimationState,
    hierarchy::{Hierarchy, LocalTransform, MeshHandle, NodeId},
};

/// Depth of the scene along -Z shared by both rigs
pub const SCENE_DEPTH: f32 = -80.0;

/// World-space offset of the figure's torso
pub const FIGURE_PLACEMENT: Vector3<f32> = Vector3::new(-50.0, 0.0, SCENE_DEPTH);

/// Uniform scale of the ball root relative to the figure
pub const BALL_SCALE: f32 = 0.75;

pub const LEG_SEGMENTS: usize = 5;

fn offset(x: f32, y: f32, z: f32) -> LocalTransform {
    LocalTransform::Fixed(translate(Vector3::new(x, y, z)))
}

fn knee(state: &AnimationState) -> Matrix4<f32> {
    compose(
        rotate_z(state.spine_bend),
        translate(Vector3::new(5.0, -10.0, 0.0)),
    )
}

fn ball_root(state: &AnimationState) -> Matrix4<f32> {
    compose(
        compose(
            translate(Vector3::new(state.ball_roll, state.ball_fall, 0.0)),
            scale(Vector3::new(BALL_SCALE, BALL_SCALE, BALL_SCALE)),
        ),
        rotate_z(state.ball_spin),
    )
}

/// Appends a chain of leg segments under `hip_parent` and returns the ids
/// from hip to foot.
fn add_leg(
    rig: &mut Hierarchy,
    names: [&'static str; LEG_SEGMENTS],
    hip_parent: NodeId,
    segments: [LocalTransform; LEG_SEGMENTS],
) -> [NodeId; LEG_SEGMENTS] {
    let mut ids = [hip_parent; LEG_SEGMENTS];
    let mut parent = hip_parent;
    for (i, (name, local)) in names.into_iter().zip(segments).enumerate() {
        parent = rig.add_node(name, Some(parent), local);
        ids[i] = parent;
    }
    ids
}

/// Builds the 16-node articulated figure.
pub fn figure(mesh: MeshHandle) -> Hierarchy {
    let mut rig = Hierarchy::new("figure")
        .with_placement(translate(FIGURE_PLACEMENT))
        .with_mesh(mesh);

    let torso = rig.add_node("torso", None, LocalTransform::Fixed(rotate_z(0.0)));

    let spine_lower = rig.add_node("spine_lower", Some(torso), offset(0.0, 10.0, 0.0));
    let spine_upper = rig.add_node("spine_upper", Some(spine_lower), offset(0.0, 10.0, 0.0));
    rig.add_node("shoulders", Some(spine_upper), offset(0.0, 20.0, 0.0));
    rig.add_node("arm_right", Some(spine_upper), offset(20.0, 0.0, 0.0));
    rig.add_node("arm_left", Some(spine_upper), offset(-20.0, 0.0, 0.0));

    let hip_right = offset(5.0, -10.0, 0.0);
    add_leg(
        &mut rig,
        [
            "leg_right_1",
            "leg_right_2",
            "leg_right_3",
            "leg_right_4",
            "leg_right_5",
        ],
        torso,
        [
            hip_right,
            hip_right,
            hip_right,
            LocalTransform::Animated(knee),
            offset(10.0, -20.0, 0.0),
        ],
    );

    let hip_left = offset(-5.0, -10.0, 0.0);
    add_leg(
        &mut rig,
        [
            "leg_left_1",
            "leg_left_2",
            "leg_left_3",
            "leg_left_4",
            "leg_left_5",
        ],
        torso,
        [hip_left; LEG_SEGMENTS],
    );

    rig
}

/// Builds the 5-node ball with its four limb stubs.
pub fn ball(mesh: MeshHandle) -> Hierarchy {
    let mut rig = Hierarchy::new("ball")
        .with_placement(translate(Vector3::new(0.0, 0.0, SCENE_DEPTH)))
        .with_mesh(mesh);

    let root = rig.add_node("ball", None, LocalTransform::Animated(ball_root));
    rig.add_node("limb_down", Some(root), offset(0.0, -10.0, 0.0));
    rig.add_node("limb_up", Some(root), offset(0.0, 10.0, 0.0));
    rig.add_node("limb_right", Some(root), offset(10.0, 0.0, 0.0));
    rig.add_node("limb_left", Some(root), offset(-10.0, 0.0, 0.0));

    rig
}
