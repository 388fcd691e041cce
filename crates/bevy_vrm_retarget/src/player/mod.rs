use bevy::{
    asset::Handle,
    ecs::{component::Component, entity::Entity, reflect::ReflectComponent},
    reflect::Reflect,
    transform::components::Transform,
};

use crate::{binding::MeshBinder, motion::MotionClip, runtime::JointRuntime, skeleton::Skeleton};

/// Drives one animated avatar instance: a shared skeleton asset, an
/// optional motion clip, and the instance-local pose and mesh bindings.
///
/// Each instance owns its [`JointRuntime`] and [`MeshBinder`]; instances
/// never share mutable state and are advanced independently, one commit
/// per tick in the order retarget → commit → binding update.
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct RetargetPlayer {
    pub(crate) skeleton: Handle<Skeleton>,
    pub(crate) clip: Option<Handle<MotionClip>>,
    pub(crate) playing: bool,
    pub(crate) looping: bool,
    pub(crate) elapsed: f32,
    pub(crate) runtime: Option<JointRuntime>,
    pub(crate) binder: MeshBinder,
    /// Mesh bindings requested before the skeleton asset finished loading.
    /// Resolved (and validated) by the playback system on first use.
    pub(crate) pending_bindings: Vec<PendingBinding>,
}

#[derive(Reflect, Clone, Debug)]
pub struct PendingBinding {
    pub entity: Entity,
    pub bone: String,
    pub offset: Transform,
}

impl RetargetPlayer {
    /// Creates a player at rest, with no clip playing.
    pub fn new(skeleton: Handle<Skeleton>) -> Self {
        Self {
            skeleton,
            looping: true,
            ..Default::default()
        }
    }

    pub fn with_clip(mut self, clip: Handle<MotionClip>) -> Self {
        self.clip = Some(clip);
        self.playing = true;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Starts playing a clip from its first frame.
    pub fn play(&mut self, clip: Handle<MotionClip>) {
        self.clip = Some(clip);
        self.elapsed = 0.0;
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn resume(&mut self) {
        self.playing = true;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn skeleton(&self) -> &Handle<Skeleton> {
        &self.skeleton
    }

    /// Queues a mesh binding. Validation against the skeleton happens once
    /// the asset is available; a binding to an unknown bone is dropped with
    /// a logged warning, without affecting other bindings.
    pub fn bind_mesh(&mut self, entity: Entity, bone: impl Into<String>, offset: Transform) {
        self.pending_bindings.push(PendingBinding {
            entity,
            bone: bone.into(),
            offset,
        });
    }

    pub fn binder(&self) -> &MeshBinder {
        &self.binder
    }

    pub fn binder_mut(&mut self) -> &mut MeshBinder {
        &mut self.binder
    }

    /// Pose state of this instance, if the skeleton asset has loaded.
    pub fn runtime(&self) -> Option<&JointRuntime> {
        self.runtime.as_ref()
    }
}
