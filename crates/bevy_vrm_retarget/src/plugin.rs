use bevy::{
    app::{App, Plugin, PostUpdate},
    asset::AssetApp,
    ecs::schedule::{IntoScheduleConfigs, SystemSet},
    transform::TransformSystems,
};

use crate::{
    binding::BindingRecord,
    motion::{AngleUnit, ChannelSample, MotionChannel, MotionClip, MotionFrame,
        loader::MotionClipLoader},
    player::{PendingBinding, RetargetPlayer},
    retarget::TargetPose,
    skeleton::{Bone, BoneId, JointDof, RotationLimits, Skeleton, loader::SkeletonLoader},
    systems::{advance_players, apply_bindings},
};

/// System sets of the per-tick pipeline. The ordering is strict: a pose is
/// always committed before bindings read it, and bound transforms are
/// written before Bevy propagates transforms.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, SystemSet)]
pub enum RetargetSet {
    /// Motion sampling, retargeting and pose commit.
    Advance,
    /// Writing bound mesh entities' transforms from the committed pose.
    ApplyBindings,
}

/// Adds humanoid retargeting support to an app.
#[derive(Default)]
pub struct VrmRetargetPlugin;

impl Plugin for VrmRetargetPlugin {
    fn build(&self, app: &mut App) {
        self.register_assets(app);
        self.register_types(app);

        app.configure_sets(
            PostUpdate,
            (RetargetSet::Advance, RetargetSet::ApplyBindings).chain(),
        );
        app.configure_sets(
            PostUpdate,
            RetargetSet::ApplyBindings.before(TransformSystems::Propagate),
        );

        app.add_systems(
            PostUpdate,
            (
                advance_players.in_set(RetargetSet::Advance),
                apply_bindings.in_set(RetargetSet::ApplyBindings),
            ),
        );
    }
}

impl VrmRetargetPlugin {
    /// Registers asset types and their loaders
    fn register_assets(&self, app: &mut App) {
        app.init_asset::<Skeleton>()
            .init_asset_loader::<SkeletonLoader>()
            .register_asset_reflect::<Skeleton>();
        app.init_asset::<MotionClip>()
            .init_asset_loader::<MotionClipLoader>()
            .register_asset_reflect::<MotionClip>();
    }

    /// "Other" reflect registrations
    fn register_types(&self, app: &mut App) {
        app //
            .register_type::<BoneId>()
            .register_type::<Bone>()
            .register_type::<RotationLimits>()
            .register_type::<JointDof>()
            .register_type::<MotionChannel>()
            .register_type::<ChannelSample>()
            .register_type::<MotionFrame>()
            .register_type::<AngleUnit>()
            .register_type::<TargetPose>()
            .register_type::<BindingRecord>()
            .register_type::<PendingBinding>()
            .register_type::<RetargetPlayer>();
    }
}
