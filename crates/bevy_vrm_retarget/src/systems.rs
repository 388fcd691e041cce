use bevy::{
    asset::Assets,
    ecs::{entity::Entity, system::{Query, Res}},
    log::warn,
    time::Time,
    transform::components::Transform,
};

use crate::{
    binding::BindingTarget,
    motion::{MotionClip, MotionSource},
    player::RetargetPlayer,
    retarget::Retargeter,
    runtime::JointRuntime,
    skeleton::Skeleton,
};

/// Advances every player by one tick: initializes the instance runtime once
/// the skeleton asset is available, resolves queued mesh bindings, then
/// samples the current clip frame, retargets it and commits the pose.
///
/// Per-frame conditions (missing assets, empty clips) skip the instance for
/// this tick; playback is never aborted.
pub fn advance_players(
    time: Res<Time>,
    skeletons: Res<Assets<Skeleton>>,
    clips: Res<Assets<MotionClip>>,
    mut players: Query<&mut RetargetPlayer>,
) {
    for mut player in players.iter_mut() {
        let Some(skeleton) = skeletons.get(&player.skeleton) else {
            continue;
        };
        let player = &mut *player;

        if player.runtime.is_none() {
            player.runtime = Some(JointRuntime::new(skeleton));
        }

        if !player.pending_bindings.is_empty() {
            for pending in std::mem::take(&mut player.pending_bindings) {
                if let Err(err) =
                    player
                        .binder
                        .bind(skeleton, pending.entity, &pending.bone, pending.offset)
                {
                    warn!("dropping mesh binding for {:?}: {err}", pending.entity);
                }
            }
        }

        if !player.playing {
            continue;
        }
        let Some(clip) = player.clip.as_ref().and_then(|handle| clips.get(handle)) else {
            continue;
        };
        if clip.frame_count() == 0 {
            continue;
        }

        player.elapsed += time.delta_secs();

        let mut index = (player.elapsed / clip.frame_time()) as usize;
        if player.looping {
            // Looping replays from frame 0; it is playback policy, not a
            // property of the motion source.
            index %= clip.frame_count();
        } else {
            index = index.min(clip.frame_count() - 1);
        }
        let Some(frame) = clip.frame(index) else {
            continue;
        };

        let pose = Retargeter::new(skeleton).retarget_frame(frame, clip.units());
        if let Some(runtime) = player.runtime.as_mut() {
            runtime.commit_pose(pose);
        }
    }
}

struct EcsBindingTarget<'w, 's, 'a> {
    transforms: &'a mut Query<'w, 's, &'static mut Transform>,
}

impl BindingTarget for EcsBindingTarget<'_, '_, '_> {
    fn set_world_transform(&mut self, entity: Entity, transform: Transform) {
        if let Ok(mut target) = self.transforms.get_mut(entity) {
            *target = transform;
        } else {
            warn!("bound mesh entity {entity:?} has no Transform to write");
        }
    }
}

/// Pushes the committed pose out to bound mesh entities. Runs after
/// [`advance_players`] within the same tick, before transform propagation.
pub fn apply_bindings(
    skeletons: Res<Assets<Skeleton>>,
    mut players: Query<&mut RetargetPlayer>,
    mut transforms: Query<&'static mut Transform>,
) {
    for mut player in players.iter_mut() {
        let Some(skeleton) = skeletons.get(&player.skeleton) else {
            continue;
        };
        let player = &mut *player;
        let Some(runtime) = player.runtime.as_mut() else {
            continue;
        };

        let mut target = EcsBindingTarget {
            transforms: &mut transforms,
        };
        player.binder.update_all(runtime, skeleton, &mut target);
    }
}
