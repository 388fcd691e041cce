use bevy::math::Vec3;

use super::serial::{BoneSerial, SkeletonSerial};
use super::{JointDof, RotationLimits, Skeleton};

struct HumanoidBone {
    name: &'static str,
    parent: Option<&'static str>,
    position: [f32; 3],
    lower: [f32; 3],
    upper: [f32; 3],
    aliases: &'static [&'static str],
}

/// The standard VRM humanoid rig: root, spine chain, two arm chains and two
/// leg chains, with rest offsets and per-axis limits in meters/degrees and
/// the alias dialects seen in common BVH and Character Creator exports.
///
/// The root carries full ±180° limits here even though it is often welded
/// in physics rigs; animation-side clamping must not freeze root rotation.
const HUMANOID_BONES: &[HumanoidBone] = &[
    HumanoidBone {
        name: "hips",
        parent: None,
        position: [0.0, 0.0, 0.9],
        lower: [-180.0, -180.0, -180.0],
        upper: [180.0, 180.0, 180.0],
        aliases: &["Hips", "CC_Base_Hip", "CC_Base_Pelvis", "pelvis", "root"],
    },
    HumanoidBone {
        name: "spine",
        parent: Some("hips"),
        position: [0.0, 0.0, 0.15],
        lower: [-30.0, -45.0, -30.0],
        upper: [30.0, 45.0, 30.0],
        aliases: &["Spine", "CC_Base_Spine01", "spine1"],
    },
    HumanoidBone {
        name: "chest",
        parent: Some("spine"),
        position: [0.0, 0.0, 0.2],
        lower: [-20.0, -30.0, -20.0],
        upper: [20.0, 30.0, 20.0],
        aliases: &["Chest", "Spine1", "CC_Base_Spine02", "upperChest"],
    },
    HumanoidBone {
        name: "neck",
        parent: Some("chest"),
        position: [0.0, 0.0, 0.2],
        lower: [-45.0, -60.0, -45.0],
        upper: [45.0, 60.0, 45.0],
        aliases: &["Neck", "CC_Base_Neck"],
    },
    HumanoidBone {
        name: "head",
        parent: Some("neck"),
        position: [0.0, 0.0, 0.15],
        lower: [-30.0, -45.0, -30.0],
        upper: [30.0, 45.0, 30.0],
        aliases: &["Head", "CC_Base_Head"],
    },
    HumanoidBone {
        name: "leftShoulder",
        parent: Some("chest"),
        position: [-0.15, 0.0, 0.1],
        lower: [-30.0, -30.0, -90.0],
        upper: [30.0, 30.0, 90.0],
        aliases: &["LeftShoulder", "CC_Base_L_Clavicle", "LeftCollar"],
    },
    HumanoidBone {
        name: "leftUpperArm",
        parent: Some("leftShoulder"),
        position: [-0.15, 0.0, -0.1],
        lower: [-180.0, -90.0, -45.0],
        upper: [180.0, 180.0, 180.0],
        aliases: &["LeftArm", "LeftUpperArm", "CC_Base_L_Upperarm"],
    },
    HumanoidBone {
        name: "leftLowerArm",
        parent: Some("leftUpperArm"),
        position: [0.0, 0.0, -0.3],
        lower: [-135.0, -90.0, -90.0],
        upper: [0.0, 90.0, 90.0],
        aliases: &["LeftForeArm", "LeftLowerArm", "CC_Base_L_Forearm"],
    },
    HumanoidBone {
        name: "leftHand",
        parent: Some("leftLowerArm"),
        position: [0.0, 0.0, -0.25],
        lower: [-90.0, -45.0, -45.0],
        upper: [90.0, 45.0, 45.0],
        aliases: &["LeftHand", "CC_Base_L_Hand"],
    },
    HumanoidBone {
        name: "rightShoulder",
        parent: Some("chest"),
        position: [0.15, 0.0, 0.1],
        lower: [-30.0, -30.0, -90.0],
        upper: [30.0, 30.0, 90.0],
        aliases: &["RightShoulder", "CC_Base_R_Clavicle", "RightCollar"],
    },
    HumanoidBone {
        name: "rightUpperArm",
        parent: Some("rightShoulder"),
        position: [0.15, 0.0, -0.1],
        lower: [-180.0, -180.0, -180.0],
        upper: [180.0, 90.0, 45.0],
        aliases: &["RightArm", "RightUpperArm", "CC_Base_R_Upperarm"],
    },
    HumanoidBone {
        name: "rightLowerArm",
        parent: Some("rightUpperArm"),
        position: [0.0, 0.0, -0.3],
        lower: [-135.0, -90.0, -90.0],
        upper: [0.0, 90.0, 90.0],
        aliases: &["RightForeArm", "RightLowerArm", "CC_Base_R_Forearm"],
    },
    HumanoidBone {
        name: "rightHand",
        parent: Some("rightLowerArm"),
        position: [0.0, 0.0, -0.25],
        lower: [-90.0, -45.0, -45.0],
        upper: [90.0, 45.0, 45.0],
        aliases: &["RightHand", "CC_Base_R_Hand"],
    },
    HumanoidBone {
        name: "leftUpperLeg",
        parent: Some("hips"),
        position: [-0.1, 0.0, -0.1],
        lower: [-120.0, -45.0, -45.0],
        upper: [30.0, 45.0, 45.0],
        aliases: &["LeftUpLeg", "LeftThigh", "CC_Base_L_Thigh"],
    },
    HumanoidBone {
        name: "leftLowerLeg",
        parent: Some("leftUpperLeg"),
        position: [0.0, 0.0, -0.4],
        lower: [-135.0, -10.0, -10.0],
        upper: [0.0, 10.0, 10.0],
        aliases: &["LeftLeg", "LeftShin", "CC_Base_L_Calf"],
    },
    HumanoidBone {
        name: "leftFoot",
        parent: Some("leftLowerLeg"),
        position: [0.0, 0.0, -0.4],
        lower: [-45.0, -30.0, -30.0],
        upper: [45.0, 30.0, 30.0],
        aliases: &["LeftFoot", "CC_Base_L_Foot"],
    },
    HumanoidBone {
        name: "rightUpperLeg",
        parent: Some("hips"),
        position: [0.1, 0.0, -0.1],
        lower: [-120.0, -45.0, -45.0],
        upper: [30.0, 45.0, 45.0],
        aliases: &["RightUpLeg", "RightThigh", "CC_Base_R_Thigh"],
    },
    HumanoidBone {
        name: "rightLowerLeg",
        parent: Some("rightUpperLeg"),
        position: [0.0, 0.0, -0.4],
        lower: [-135.0, -10.0, -10.0],
        upper: [0.0, 10.0, 10.0],
        aliases: &["RightLeg", "RightShin", "CC_Base_R_Calf"],
    },
    HumanoidBone {
        name: "rightFoot",
        parent: Some("rightLowerLeg"),
        position: [0.0, 0.0, -0.4],
        lower: [-45.0, -30.0, -30.0],
        upper: [45.0, 30.0, 30.0],
        aliases: &["RightFoot", "CC_Base_R_Foot"],
    },
];

impl Skeleton {
    /// Builds the built-in VRM humanoid skeleton.
    ///
    /// The table is statically valid; construction cannot fail.
    pub fn vrm_humanoid() -> Skeleton {
        let mut serial = SkeletonSerial::default();
        for bone in HUMANOID_BONES {
            serial.bones.insert(
                bone.name.to_string(),
                BoneSerial {
                    parent: bone.parent.map(str::to_string),
                    position: Vec3::from_array(bone.position),
                    limits: RotationLimits::new(
                        Vec3::from_array(bone.lower),
                        Vec3::from_array(bone.upper),
                    ),
                    dof: if bone.parent.is_none() {
                        JointDof::Free
                    } else {
                        JointDof::Ball
                    },
                    aliases: bone.aliases.iter().map(|alias| alias.to_string()).collect(),
                    ..Default::default()
                },
            );
        }

        Skeleton::from_serial(serial).expect("the built-in humanoid table is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanoid_has_expected_shape() {
        let skeleton = Skeleton::vrm_humanoid();

        assert_eq!(skeleton.num_bones(), 19);
        assert_eq!(skeleton.bone(skeleton.root()).name, "hips");
        assert_eq!(skeleton.bone(skeleton.root()).dof, JointDof::Free);

        // Total degrees of freedom: 6 for the root, 3 for each other joint.
        let dof: u32 = skeleton.bones().map(|(_, bone)| bone.dof.count()).sum();
        assert_eq!(dof, 6 + 18 * 3);
    }

    #[test]
    fn character_creator_aliases_resolve() {
        let skeleton = Skeleton::vrm_humanoid();

        let left_upper_arm = skeleton.bone_id("leftUpperArm").unwrap();
        assert_eq!(
            skeleton.resolve_alias("CC_Base_L_Upperarm"),
            Some(left_upper_arm)
        );
        assert_eq!(skeleton.resolve_alias("LeftArm"), Some(left_upper_arm));

        let hips = skeleton.bone_id("hips").unwrap();
        assert_eq!(skeleton.resolve_alias("Hips"), Some(hips));
        assert_eq!(skeleton.resolve_alias("CC_Base_Pelvis"), Some(hips));

        // Finger and twist bones from capture rigs have no counterpart.
        assert_eq!(skeleton.resolve_alias("CC_Base_L_Finger00"), None);
    }
}
