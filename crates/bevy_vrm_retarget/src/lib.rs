//! # Bevy VRM Retarget
//!
//! Humanoid skeleton retargeting and rigid mesh binding for
//! [Bevy](https://bevyengine.org/): plays back motion-capture channel data
//! authored for one rig (BVH-style naming, Character Creator exports, ...)
//! on a canonical VRM-style humanoid skeleton, and keeps externally owned
//! mesh entities rigidly attached to the animated joints.
//!
//! The pipeline per tick is fixed: sample a frame from the motion source,
//! resolve its channels through the skeleton's alias table, clamp the
//! result into the authored per-joint limits, commit the pose to the
//! instance's joint runtime, then reposition every bound mesh from the
//! forward-kinematics output. Unmapped source bones (fingers, twist bones)
//! are ignored per channel; a frame that resolves nothing plays the rest
//! pose rather than interrupting playback.
//!
//! Two asset types are introduced:
//! - [`Skeleton`], defined in `*.skl.ron` files: the bone hierarchy with
//!   rest offsets, per-axis rotation limits in degrees and alias tables.
//!   Declaration order is meaningful (it fixes bone ids and children
//!   ordering). For example:
//!   ```ron
//!   (
//!       bones: {
//!           "hips": (dof: Free, position: (0.0, 0.0, 0.9), aliases: ["Hips"]),
//!           "spine": (
//!               parent: Some("hips"),
//!               position: (0.0, 0.0, 0.15),
//!               limits: (lower: (-30.0, -45.0, -30.0), upper: (30.0, 45.0, 30.0)),
//!               aliases: ["Spine", "CC_Base_Spine01"],
//!           ),
//!       },
//!   )
//!   ```
//!   The standard 19-bone VRM humanoid is also built in as
//!   [`Skeleton::vrm_humanoid`].
//! - [`MotionClip`], defined in `*.mclip.ron` files: a finite sequence of
//!   frames, each a list of per-axis channel samples keyed by the source
//!   rig's bone names. Byte-level BVH parsing belongs to the producer of
//!   these assets, not to this crate. For example:
//!   ```ron
//!   (
//!       frame_time: 0.033333335,
//!       frames: [
//!           (channels: [
//!               (bone: "Hips", channel: PositionZ, value: 0.9),
//!               (bone: "LeftArm", channel: RotationX, value: 10.0),
//!           ]),
//!       ],
//!   )
//!   ```
//!
//! Spawn a [`RetargetPlayer`] with handles to both assets, queue mesh
//! bindings with [`RetargetPlayer::bind_mesh`], and add
//! [`VrmRetargetPlugin`] to the app; the playback systems run in
//! `PostUpdate` before transform propagation.
//!
//! [`Skeleton`]: crate::skeleton::Skeleton
//! [`Skeleton::vrm_humanoid`]: crate::skeleton::Skeleton::vrm_humanoid
//! [`MotionClip`]: crate::motion::MotionClip
//! [`RetargetPlayer`]: crate::player::RetargetPlayer
//! [`RetargetPlayer::bind_mesh`]: crate::player::RetargetPlayer::bind_mesh
//! [`VrmRetargetPlugin`]: crate::plugin::VrmRetargetPlugin

pub mod binding;
pub mod errors;
pub mod motion;
pub mod player;
pub mod plugin;
pub mod retarget;
pub mod runtime;
pub mod skeleton;
pub mod systems;

pub mod prelude {
    pub use super::binding::{BindingRecord, BindingTarget, MeshBinder};
    pub use super::errors::{AssetLoaderError, BindingError, SkeletonError};
    pub use super::motion::{
        AngleUnit, ChannelSample, MotionChannel, MotionClip, MotionFrame, MotionSource,
    };
    pub use super::player::RetargetPlayer;
    pub use super::plugin::{RetargetSet, VrmRetargetPlugin};
    pub use super::retarget::{Retargeter, TargetPose};
    pub use super::runtime::JointRuntime;
    pub use super::skeleton::{Bone, BoneId, JointDof, RotationLimits, Skeleton};
}
