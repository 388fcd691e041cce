use bevy::math::{Quat, Vec3};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, de::MapAccess, de::Visitor};

use super::{JointDof, RotationLimits, Skeleton};
use crate::errors::SkeletonError;

/// Serial form of a [`Skeleton`], as found in `*.skl.ron` assets. Bone
/// declaration order is preserved and is semantic: it fixes bone ids and
/// the ordering of children lists.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SkeletonSerial {
    #[serde(deserialize_with = "bone_table")]
    pub bones: IndexMap<String, BoneSerial>,
}

/// Deserializes the bone table rejecting repeated names. A plain map
/// deserialize would silently keep the last definition of a duplicated
/// key, losing a bone with no error.
fn bone_table<'de, D>(deserializer: D) -> Result<IndexMap<String, BoneSerial>, D::Error>
where
    D: Deserializer<'de>,
{
    struct BoneTableVisitor;

    impl<'de> Visitor<'de> for BoneTableVisitor {
        type Value = IndexMap<String, BoneSerial>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("a map of bone names to bone definitions")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut bones = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((name, bone)) = access.next_entry::<String, BoneSerial>()? {
                if bones.insert(name.clone(), bone).is_some() {
                    return Err(serde::de::Error::custom(SkeletonError::DuplicateBone {
                        name,
                    }));
                }
            }
            Ok(bones)
        }
    }

    deserializer.deserialize_map(BoneTableVisitor)
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BoneSerial {
    /// Canonical name of the parent bone. Omitted only for the root.
    #[serde(default)]
    pub parent: Option<String>,
    /// Rest-pose offset relative to the parent's frame.
    #[serde(default)]
    pub position: Vec3,
    /// Rest-pose orientation relative to the parent.
    #[serde(default = "identity_rotation")]
    pub rotation: Quat,
    #[serde(default)]
    pub limits: RotationLimits,
    #[serde(default)]
    pub dof: JointDof,
    #[serde(default)]
    pub aliases: Vec<String>,
}

fn identity_rotation() -> Quat {
    Quat::IDENTITY
}

impl Default for BoneSerial {
    fn default() -> Self {
        Self {
            parent: None,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            limits: RotationLimits::default(),
            dof: JointDof::default(),
            aliases: vec![],
        }
    }
}

impl SkeletonSerial {
    pub fn from_value(skeleton: &Skeleton) -> Self {
        let mut bones = IndexMap::new();
        for (id, bone) in skeleton.bones() {
            bones.insert(
                bone.name.clone(),
                BoneSerial {
                    parent: skeleton
                        .parent(id)
                        .map(|parent| skeleton.bone(parent).name.clone()),
                    position: bone.rest_offset,
                    rotation: bone.rest_rotation,
                    limits: bone.limits,
                    dof: bone.dof,
                    aliases: bone.aliases.clone(),
                },
            );
        }
        Self { bones }
    }
}
