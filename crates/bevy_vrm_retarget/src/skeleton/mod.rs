use bevy::{
    asset::Asset,
    math::{Quat, Vec3},
    platform::collections::HashMap,
    reflect::{Reflect, std_traits::ReflectDefault},
};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::SkeletonError;

use self::serial::SkeletonSerial;

mod humanoid;
pub mod loader;
pub mod serial;

/// Stable index of a bone within its [`Skeleton`]. All hot-path state
/// (poses, the FK cache, binding records) is keyed by `BoneId`; bone name
/// strings only appear at load and bind boundaries.
#[derive(
    Reflect, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
    Debug,
)]
#[reflect(Default)]
pub struct BoneId(usize);

impl BoneId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Per-axis rotation bounds in degrees. A retargeted pose is clamped into
/// this box before being committed.
#[derive(Reflect, Clone, Copy, Serialize, Deserialize, PartialEq, Debug)]
#[reflect(Default)]
pub struct RotationLimits {
    pub lower: Vec3,
    pub upper: Vec3,
}

impl Default for RotationLimits {
    fn default() -> Self {
        Self {
            lower: Vec3::splat(-180.0),
            upper: Vec3::splat(180.0),
        }
    }
}

impl RotationLimits {
    pub fn new(lower: Vec3, upper: Vec3) -> Self {
        Self { lower, upper }
    }

    /// Independent per-axis min/max clamp. This is not a joint-space
    /// projection: the clamped orientation is only guaranteed to stay
    /// within the authored range on each axis.
    pub fn clamp(&self, angles: Vec3) -> Vec3 {
        angles.clamp(self.lower, self.upper)
    }
}

/// Degree-of-freedom class of a joint.
#[derive(Reflect, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Debug)]
#[reflect(Default)]
pub enum JointDof {
    /// Ball/Euler joint, three rotational degrees of freedom.
    #[default]
    Ball,
    /// Rotation plus translation. Only valid for the root bone.
    Free,
}

impl JointDof {
    pub fn count(self) -> u32 {
        match self {
            JointDof::Ball => 3,
            JointDof::Free => 6,
        }
    }
}

/// One joint of the canonical skeleton. Immutable after load; pose state
/// lives in [`JointRuntime`](crate::runtime::JointRuntime), never here.
#[derive(Reflect, Clone, Debug)]
pub struct Bone {
    pub name: String,
    pub parent: Option<BoneId>,
    /// Translation of this bone's origin relative to its parent's frame in
    /// the rest pose.
    pub rest_offset: Vec3,
    /// Default orientation relative to the parent.
    pub rest_rotation: Quat,
    pub limits: RotationLimits,
    pub dof: JointDof,
    /// Known synonyms from motion-source naming conventions. The canonical
    /// name always resolves as well.
    pub aliases: Vec<String>,
}

/// Immutable humanoid joint hierarchy plus the alias table mapping source
/// bone-naming dialects onto canonical bones.
///
/// Bones are stored in declaration order in an arena; the same skeleton
/// asset is shared by any number of animated instances.
#[derive(Asset, Reflect, Clone, Default)]
pub struct Skeleton {
    bones: Vec<Bone>,
    names: HashMap<String, BoneId>,
    aliases: HashMap<String, BoneId>,
    children: Vec<Vec<BoneId>>,
    root: BoneId,
}

impl Skeleton {
    /// Builds and validates a skeleton from its serial description.
    ///
    /// Fails without constructing anything if the hierarchy is malformed:
    /// a parent that is not declared, more than one root, no root at all,
    /// a parent cycle, or an alias claiming two different bones.
    pub fn from_serial(serial: SkeletonSerial) -> Result<Self, SkeletonError> {
        let count = serial.bones.len();

        let mut names: HashMap<String, BoneId> = HashMap::default();
        for (index, name) in serial.bones.keys().enumerate() {
            names.insert(name.clone(), BoneId::new(index));
        }

        let mut bones: Vec<Bone> = Vec::with_capacity(count);
        let mut root: Option<BoneId> = None;
        for (name, bone) in serial.bones.iter() {
            let parent = match &bone.parent {
                Some(parent_name) => {
                    Some(
                        names
                            .get(parent_name)
                            .copied()
                            .ok_or_else(|| SkeletonError::UnknownParent {
                                bone: name.clone(),
                                parent: parent_name.clone(),
                            })?,
                    )
                }
                None => {
                    if let Some(existing) = root {
                        // The first root was pushed before this bone.
                        return Err(SkeletonError::MultipleRoots {
                            first: bones[existing.index()].name.clone(),
                            second: name.clone(),
                        });
                    }
                    root = Some(BoneId::new(bones.len()));
                    None
                }
            };

            bones.push(Bone {
                name: name.clone(),
                parent,
                rest_offset: bone.position,
                rest_rotation: bone.rotation,
                limits: bone.limits,
                dof: bone.dof,
                aliases: bone.aliases.clone(),
            });
        }

        let Some(root) = root else {
            return Err(SkeletonError::MissingRoot);
        };

        // Walking more parent pointers than there are bones without reaching
        // the root means the chain loops.
        for bone in &bones {
            let mut current = bone.parent;
            let mut steps = 0;
            while let Some(parent) = current {
                steps += 1;
                if steps > count {
                    return Err(SkeletonError::CycleDetected {
                        bone: bone.name.clone(),
                    });
                }
                current = bones[parent.index()].parent;
            }
        }

        let mut children: Vec<Vec<BoneId>> = vec![Vec::new(); count];
        for (index, bone) in bones.iter().enumerate() {
            if let Some(parent) = bone.parent {
                children[parent.index()].push(BoneId::new(index));
            }
        }

        let mut aliases: HashMap<String, BoneId> = HashMap::default();
        for (index, bone) in bones.iter().enumerate() {
            let id = BoneId::new(index);
            for alias in std::iter::once(&bone.name).chain(bone.aliases.iter()) {
                if let Some(&existing) = aliases.get(alias) {
                    if existing != id {
                        return Err(SkeletonError::DuplicateAlias {
                            alias: alias.clone(),
                            first: bones[existing.index()].name.clone(),
                            second: bone.name.clone(),
                        });
                    }
                } else {
                    aliases.insert(alias.clone(), id);
                }
            }
        }

        Ok(Self {
            bones,
            names,
            aliases,
            children,
            root,
        })
    }

    pub fn root(&self) -> BoneId {
        self.root
    }

    pub fn num_bones(&self) -> usize {
        self.bones.len()
    }

    pub fn bone(&self, id: BoneId) -> &Bone {
        &self.bones[id.index()]
    }

    pub fn parent(&self, id: BoneId) -> Option<BoneId> {
        self.bones[id.index()].parent
    }

    /// Children of a bone, in declaration order.
    pub fn children(&self, id: BoneId) -> &[BoneId] {
        &self.children[id.index()]
    }

    /// Looks up a bone by its canonical name.
    pub fn bone_id(&self, name: &str) -> Option<BoneId> {
        self.names.get(name).copied()
    }

    /// Translates a source bone name in an arbitrary naming convention into
    /// the canonical bone id. Exact, case-sensitive matching only; `None`
    /// is not an error for callers, since motion-capture rigs routinely
    /// carry bones the target skeleton does not model.
    pub fn resolve_alias(&self, source_name: &str) -> Option<BoneId> {
        self.aliases.get(source_name).copied()
    }

    pub fn bones(&self) -> impl Iterator<Item = (BoneId, &Bone)> {
        self.bones
            .iter()
            .enumerate()
            .map(|(index, bone)| (BoneId::new(index), bone))
    }

    fn indent(f: &mut std::fmt::Formatter<'_>, level: u32) -> std::fmt::Result {
        if level == 0 {
            return Ok(());
        }
        for _ in 0..(level - 1) {
            write!(f, "┃ ")?;
        }
        write!(f, "┣━")?;
        Ok(())
    }

    fn fmt_level(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        level: u32,
        bone: BoneId,
    ) -> std::fmt::Result {
        Self::indent(f, level)?;
        writeln!(f, "🦴 {} [{:?}]", self.bone(bone).name, bone)?;
        for &child in self.children(bone) {
            self.fmt_level(f, level + 1, child)?;
        }
        Ok(())
    }
}

impl Debug for Skeleton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Skeleton hierarchy:")?;
        self.fmt_level(f, 0, self.root)
    }
}
