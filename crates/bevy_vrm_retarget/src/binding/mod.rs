use bevy::{ecs::entity::Entity, reflect::Reflect, transform::components::Transform};

use crate::{
    errors::BindingError,
    runtime::JointRuntime,
    skeleton::{BoneId, Skeleton},
};

/// Collaborator interface of the external mesh/entity system: accepts a
/// rigid world transform per entity. The renderer owns the entities; this
/// crate only pushes transforms through this seam.
pub trait BindingTarget {
    fn set_world_transform(&mut self, entity: Entity, transform: Transform);
}

/// Fixed association between one externally-owned mesh entity and one
/// target bone, with a constant local offset from the bone's frame.
#[derive(Reflect, Clone, Copy, Debug)]
pub struct BindingRecord {
    pub entity: Entity,
    pub bone: BoneId,
    pub offset: Transform,
}

/// Keeps renderable mesh entities rigidly attached to their bound joints.
///
/// Bindings are registered once at avatar-assembly time; several records
/// may follow the same bone. Rebinding to a different joint is a rare
/// reconfiguration, not steady-state mutation.
#[derive(Reflect, Clone, Debug, Default)]
pub struct MeshBinder {
    bindings: Vec<BindingRecord>,
}

impl MeshBinder {
    /// Registers a binding of `entity` to the bone named `bone`.
    ///
    /// Fails with [`BindingError::UnknownBone`] if the bone does not exist
    /// in the skeleton in use; other bindings are unaffected.
    pub fn bind(
        &mut self,
        skeleton: &Skeleton,
        entity: Entity,
        bone: &str,
        offset: Transform,
    ) -> Result<(), BindingError> {
        let Some(id) = skeleton.bone_id(bone) else {
            return Err(BindingError::UnknownBone(bone.to_string()));
        };
        self.bindings.push(BindingRecord {
            entity,
            bone: id,
            offset,
        });
        Ok(())
    }

    /// Moves all of an entity's bindings to a different bone. The next
    /// [`update_all`](Self::update_all) call uses the new joint; nothing is
    /// carried over from the previous binding.
    pub fn rebind(
        &mut self,
        skeleton: &Skeleton,
        entity: Entity,
        bone: &str,
    ) -> Result<(), BindingError> {
        let Some(id) = skeleton.bone_id(bone) else {
            return Err(BindingError::UnknownBone(bone.to_string()));
        };
        let mut found = false;
        for record in self.bindings.iter_mut().filter(|r| r.entity == entity) {
            record.bone = id;
            found = true;
        }
        if found {
            Ok(())
        } else {
            Err(BindingError::NotBound(entity))
        }
    }

    pub fn unbind(&mut self, entity: Entity) {
        self.bindings.retain(|record| record.entity != entity);
    }

    pub fn bindings(&self) -> &[BindingRecord] {
        &self.bindings
    }

    /// Repositions every bound mesh from the committed pose: each record's
    /// new world transform is the bound bone's world transform composed
    /// with the record's fixed offset. Call once per frame, after
    /// [`JointRuntime::commit_pose`], before rendering.
    pub fn update_all(
        &self,
        runtime: &mut JointRuntime,
        skeleton: &Skeleton,
        target: &mut impl BindingTarget,
    ) {
        for record in &self.bindings {
            let world = runtime.world_transform(skeleton, record.bone);
            target.set_world_transform(record.entity, world * record.offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::{ecs::world::World, math::Vec3, platform::collections::HashMap};

    #[derive(Default)]
    struct RecordingTarget {
        transforms: HashMap<Entity, Transform>,
    }

    impl BindingTarget for RecordingTarget {
        fn set_world_transform(&mut self, entity: Entity, transform: Transform) {
            self.transforms.insert(entity, transform);
        }
    }

    fn spawn_entities(world: &mut World, count: usize) -> Vec<Entity> {
        (0..count).map(|_| world.spawn_empty().id()).collect()
    }

    #[test]
    fn binding_an_unknown_bone_fails_without_affecting_others() {
        let skeleton = Skeleton::vrm_humanoid();
        let mut world = World::new();
        let entities = spawn_entities(&mut world, 2);
        let mut binder = MeshBinder::default();

        binder
            .bind(&skeleton, entities[0], "head", Transform::IDENTITY)
            .unwrap();
        assert_eq!(
            binder
                .bind(&skeleton, entities[1], "tail", Transform::IDENTITY)
                .unwrap_err(),
            BindingError::UnknownBone("tail".into())
        );

        assert_eq!(binder.bindings().len(), 1);
    }

    #[test]
    fn two_bindings_on_one_bone_differ_exactly_by_their_offsets() {
        let skeleton = Skeleton::vrm_humanoid();
        let mut world = World::new();
        let entities = spawn_entities(&mut world, 2);

        let mut binder = MeshBinder::default();
        let offset_a = Transform::from_translation(Vec3::new(0.0, 0.0, -0.3));
        let offset_b = Transform::from_translation(Vec3::new(0.1, 0.0, 0.0));
        binder.bind(&skeleton, entities[0], "chest", offset_a).unwrap();
        binder.bind(&skeleton, entities[1], "chest", offset_b).unwrap();

        let mut runtime = JointRuntime::new(&skeleton);
        let mut target = RecordingTarget::default();
        binder.update_all(&mut runtime, &skeleton, &mut target);

        let a = target.transforms[&entities[0]];
        let b = target.transforms[&entities[1]];
        assert_eq!(
            b.translation - a.translation,
            offset_b.translation - offset_a.translation
        );
    }

    #[test]
    fn rebinding_takes_effect_on_the_next_update() {
        let skeleton = Skeleton::vrm_humanoid();
        let mut world = World::new();
        let entities = spawn_entities(&mut world, 1);

        let mut binder = MeshBinder::default();
        binder
            .bind(&skeleton, entities[0], "leftHand", Transform::IDENTITY)
            .unwrap();

        let mut runtime = JointRuntime::new(&skeleton);
        let mut target = RecordingTarget::default();
        binder.update_all(&mut runtime, &skeleton, &mut target);
        let left = target.transforms[&entities[0]];

        binder.rebind(&skeleton, entities[0], "rightHand").unwrap();
        binder.update_all(&mut runtime, &skeleton, &mut target);
        let right = target.transforms[&entities[0]];

        let right_hand = skeleton.bone_id("rightHand").unwrap();
        assert_eq!(right, runtime.world_transform(&skeleton, right_hand));
        assert_ne!(left.translation.x, right.translation.x);
    }

    #[test]
    fn unbinding_removes_every_record_for_the_entity() {
        let skeleton = Skeleton::vrm_humanoid();
        let mut world = World::new();
        let entities = spawn_entities(&mut world, 2);

        let mut binder = MeshBinder::default();
        binder
            .bind(&skeleton, entities[0], "head", Transform::IDENTITY)
            .unwrap();
        binder
            .bind(&skeleton, entities[0], "chest", Transform::IDENTITY)
            .unwrap();
        binder
            .bind(&skeleton, entities[1], "chest", Transform::IDENTITY)
            .unwrap();

        binder.unbind(entities[0]);

        let mut runtime = JointRuntime::new(&skeleton);
        let mut target = RecordingTarget::default();
        binder.update_all(&mut runtime, &skeleton, &mut target);

        assert_eq!(binder.bindings().len(), 1);
        assert!(!target.transforms.contains_key(&entities[0]));
        assert!(target.transforms.contains_key(&entities[1]));
    }

    #[test]
    fn rebinding_an_unbound_entity_fails() {
        let skeleton = Skeleton::vrm_humanoid();
        let mut world = World::new();
        let entities = spawn_entities(&mut world, 1);
        let mut binder = MeshBinder::default();

        assert_eq!(
            binder.rebind(&skeleton, entities[0], "head").unwrap_err(),
            BindingError::NotBound(entities[0])
        );
    }
}
