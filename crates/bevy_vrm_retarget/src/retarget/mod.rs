use bevy::{
    log::debug,
    math::Vec3,
    reflect::{Reflect, std_traits::ReflectDefault},
};
use serde::{Deserialize, Serialize};

use crate::{
    motion::{AngleUnit, MotionFrame},
    skeleton::{BoneId, Skeleton},
};

/// Fully resolved local pose for a target skeleton: one rotation per bone
/// as XYZ Euler angles in degrees, plus the root translation. Rotations are
/// offsets from the rest orientation; a rest pose is all zeros.
#[derive(Reflect, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[reflect(Default)]
pub struct TargetPose {
    pub rotations: Vec<Vec3>,
    pub root_translation: Vec3,
}

impl TargetPose {
    pub fn rest(skeleton: &Skeleton) -> Self {
        Self {
            rotations: vec![Vec3::ZERO; skeleton.num_bones()],
            root_translation: Vec3::ZERO,
        }
    }

    pub fn rotation(&self, bone: BoneId) -> Vec3 {
        self.rotations[bone.index()]
    }
}

/// Maps motion-source frames onto a target skeleton.
///
/// One code path for every source dialect: rig variations are handled by
/// the skeleton's alias table, not by per-source logic.
pub struct Retargeter<'a> {
    skeleton: &'a Skeleton,
}

impl<'a> Retargeter<'a> {
    pub fn new(skeleton: &'a Skeleton) -> Self {
        Self { skeleton }
    }

    /// Produces the target pose for one frame.
    ///
    /// Starts from the rest pose, so bones with no source channel stay at
    /// rest. Channels whose bone name does not resolve through the alias
    /// table are skipped; rotation channels accumulate per axis and are
    /// composed downstream in fixed intrinsic X, Y, Z order. After accumulation every
    /// bone's rotation is clamped per-axis into its authored limits. Root
    /// position channels pass through unclamped; position channels on any
    /// other bone are ignored, since non-root bones never translate beyond
    /// their rest offset.
    pub fn retarget_frame(&self, frame: &MotionFrame, units: AngleUnit) -> TargetPose {
        let mut pose = TargetPose::rest(self.skeleton);

        if self.accumulate_channels(frame, units, &mut pose) == 0 {
            debug!("no motion channels resolved for this frame; committing rest pose");
        }

        for (bone, rotation) in self
            .skeleton
            .bones()
            .map(|(_, bone)| bone)
            .zip(pose.rotations.iter_mut())
        {
            *rotation = bone.limits.clamp(*rotation);
        }

        pose
    }

    /// Accumulates one frame's channels into `pose`, returning how many
    /// resolved through the alias table. A resolved non-root position
    /// channel counts even though it contributes nothing to the pose.
    fn accumulate_channels(
        &self,
        frame: &MotionFrame,
        units: AngleUnit,
        pose: &mut TargetPose,
    ) -> usize {
        let root = self.skeleton.root();

        let mut resolved = 0usize;
        for sample in &frame.channels {
            let Some(bone) = self.skeleton.resolve_alias(&sample.bone) else {
                continue;
            };
            resolved += 1;
            let axis = sample.channel.axis();
            if sample.channel.is_rotation() {
                pose.rotations[bone.index()][axis] += units.to_degrees(sample.value);
            } else if bone == root {
                pose.root_translation[axis] += sample.value;
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{ChannelSample, MotionChannel};

    fn frame(samples: Vec<ChannelSample>) -> MotionFrame {
        MotionFrame { channels: samples }
    }

    #[test]
    fn empty_frame_yields_rest_pose() {
        let skeleton = Skeleton::vrm_humanoid();
        let retargeter = Retargeter::new(&skeleton);

        let pose = retargeter.retarget_frame(&frame(vec![]), AngleUnit::Degrees);
        assert_eq!(pose, TargetPose::rest(&skeleton));
    }

    #[test]
    fn frame_with_only_unresolvable_channels_yields_rest_pose() {
        let skeleton = Skeleton::vrm_humanoid();
        let retargeter = Retargeter::new(&skeleton);

        let pose = retargeter.retarget_frame(
            &frame(vec![
                ChannelSample::new("CC_Base_L_Finger00", MotionChannel::RotationX, 45.0),
                ChannelSample::new("LeftToeBase", MotionChannel::RotationZ, 10.0),
            ]),
            AngleUnit::Degrees,
        );
        assert_eq!(pose, TargetPose::rest(&skeleton));
    }

    #[test]
    fn in_range_rotation_passes_through_alias_unchanged() {
        let skeleton = Skeleton::vrm_humanoid();
        let retargeter = Retargeter::new(&skeleton);

        let pose = retargeter.retarget_frame(
            &frame(vec![ChannelSample::new(
                "CC_Base_L_Upperarm",
                MotionChannel::RotationX,
                10.0,
            )]),
            AngleUnit::Degrees,
        );

        let left_upper_arm = skeleton.bone_id("leftUpperArm").unwrap();
        assert_eq!(pose.rotation(left_upper_arm), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn out_of_range_rotation_is_clamped_not_wrapped() {
        let skeleton = Skeleton::vrm_humanoid();
        let retargeter = Retargeter::new(&skeleton);

        let pose = retargeter.retarget_frame(
            &frame(vec![ChannelSample::new(
                "LeftArm",
                MotionChannel::RotationX,
                200.0,
            )]),
            AngleUnit::Degrees,
        );

        let left_upper_arm = skeleton.bone_id("leftUpperArm").unwrap();
        assert_eq!(pose.rotation(left_upper_arm), Vec3::new(180.0, 0.0, 0.0));
    }

    #[test]
    fn every_axis_stays_within_authored_limits() {
        let skeleton = Skeleton::vrm_humanoid();
        let retargeter = Retargeter::new(&skeleton);

        let mut samples = vec![];
        for (_, bone) in skeleton.bones() {
            for channel in [
                MotionChannel::RotationX,
                MotionChannel::RotationY,
                MotionChannel::RotationZ,
            ] {
                samples.push(ChannelSample::new(bone.name.clone(), channel, 720.0));
            }
        }
        let pose = retargeter.retarget_frame(&frame(samples), AngleUnit::Degrees);

        for (id, bone) in skeleton.bones() {
            let rotation = pose.rotation(id);
            assert!(rotation.cmpge(bone.limits.lower).all());
            assert!(rotation.cmple(bone.limits.upper).all());
        }
    }

    #[test]
    fn radian_sources_are_converted_before_clamping() {
        let skeleton = Skeleton::vrm_humanoid();
        let retargeter = Retargeter::new(&skeleton);

        let pose = retargeter.retarget_frame(
            &frame(vec![ChannelSample::new(
                "Neck",
                MotionChannel::RotationY,
                std::f32::consts::FRAC_PI_4,
            )]),
            AngleUnit::Radians,
        );

        let neck = skeleton.bone_id("neck").unwrap();
        assert!((pose.rotation(neck).y - 45.0).abs() < 1e-3);
    }

    #[test]
    fn root_translation_is_copied_unclamped() {
        let skeleton = Skeleton::vrm_humanoid();
        let retargeter = Retargeter::new(&skeleton);

        let pose = retargeter.retarget_frame(
            &frame(vec![
                ChannelSample::new("Hips", MotionChannel::PositionX, 3.0),
                ChannelSample::new("Hips", MotionChannel::PositionZ, -250.0),
            ]),
            AngleUnit::Degrees,
        );

        assert_eq!(pose.root_translation, Vec3::new(3.0, 0.0, -250.0));
    }

    #[test]
    fn non_root_position_channels_are_ignored() {
        let skeleton = Skeleton::vrm_humanoid();
        let retargeter = Retargeter::new(&skeleton);

        let pose = retargeter.retarget_frame(
            &frame(vec![ChannelSample::new(
                "Head",
                MotionChannel::PositionZ,
                2.0,
            )]),
            AngleUnit::Degrees,
        );

        assert_eq!(pose, TargetPose::rest(&skeleton));
    }

    #[test]
    fn ignored_position_channels_still_count_as_resolved() {
        let skeleton = Skeleton::vrm_humanoid();
        let retargeter = Retargeter::new(&skeleton);

        let mut pose = TargetPose::rest(&skeleton);
        let resolved = retargeter.accumulate_channels(
            &frame(vec![
                ChannelSample::new("Head", MotionChannel::PositionZ, 2.0),
                ChannelSample::new("CC_Base_L_Finger00", MotionChannel::RotationX, 45.0),
            ]),
            AngleUnit::Degrees,
            &mut pose,
        );

        // Only the head sample resolves; it is ignored but not unresolved.
        assert_eq!(resolved, 1);
        assert_eq!(pose, TargetPose::rest(&skeleton));
    }
}
