use bevy::{
    math::{EulerRot, Quat, Vec3},
    reflect::Reflect,
    transform::components::Transform,
};

use crate::{
    retarget::TargetPose,
    skeleton::{BoneId, Skeleton},
};

/// Mutable pose state of one animated skeleton instance.
///
/// Created at the rest pose; re-posed by committing one [`TargetPose`] per
/// frame. The skeleton definition itself is shared and immutable — many
/// runtimes can reference one [`Skeleton`], each with its own pose.
///
/// World transforms are memoized lazily: the cache is dropped on every
/// commit and each bone's transform is computed on first query by walking
/// up the parent chain, O(depth) amortized per distinct bone.
#[derive(Reflect, Clone, Debug)]
pub struct JointRuntime {
    local: TargetPose,
    world: Vec<Option<Transform>>,
}

impl JointRuntime {
    /// Creates a runtime bound to the skeleton's rest pose.
    pub fn new(skeleton: &Skeleton) -> Self {
        Self {
            local: TargetPose::rest(skeleton),
            world: vec![None; skeleton.num_bones()],
        }
    }

    /// Replaces all local joint rotations and the root translation in one
    /// step, invalidating every cached world transform.
    pub fn commit_pose(&mut self, pose: TargetPose) {
        debug_assert_eq!(pose.rotations.len(), self.world.len());
        self.local = pose;
        self.world.fill(None);
    }

    pub fn local_pose(&self) -> &TargetPose {
        &self.local
    }

    /// Local transform of a bone under the committed pose: the rest offset
    /// (plus the committed translation on the root) and the rest rotation
    /// composed with the committed Euler rotation, intrinsic XYZ
    /// (`qx * qy * qz`, each axis in the frame left by the previous).
    ///
    /// Angles are stored in degrees; the conversion to radians happens only
    /// here, at the math boundary.
    pub fn local_transform(&self, skeleton: &Skeleton, id: BoneId) -> Transform {
        let bone = skeleton.bone(id);
        let euler = self.local.rotation(id);
        let rotation = bone.rest_rotation
            * Quat::from_euler(
                EulerRot::XYZ,
                euler.x.to_radians(),
                euler.y.to_radians(),
                euler.z.to_radians(),
            );

        let mut translation = bone.rest_offset;
        if bone.parent.is_none() {
            translation += self.local.root_translation;
        }

        Transform {
            translation,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// World transform of a bone: the parent's world transform composed
    /// with this bone's local transform. Memoized until the next commit.
    pub fn world_transform(&mut self, skeleton: &Skeleton, id: BoneId) -> Transform {
        if let Some(cached) = self.world[id.index()] {
            return cached;
        }

        let local = self.local_transform(skeleton, id);
        let world = match skeleton.parent(id) {
            Some(parent) => self.world_transform(skeleton, parent) * local,
            None => local,
        };
        self.world[id.index()] = Some(world);
        world
    }
}
