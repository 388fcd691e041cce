use bevy::{
    asset::Asset,
    reflect::{Reflect, std_traits::ReflectDefault},
};
use serde::{Deserialize, Serialize};

pub mod loader;

/// Default playback rate when a clip does not declare one.
pub const DEFAULT_FRAME_TIME: f32 = 1.0 / 30.0;

/// Semantic channel types carried by a motion source, following the BVH
/// channel vocabulary. Position channels are only meaningful on the root.
#[derive(Reflect, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MotionChannel {
    RotationX,
    RotationY,
    RotationZ,
    PositionX,
    PositionY,
    PositionZ,
}

impl MotionChannel {
    pub fn is_rotation(self) -> bool {
        matches!(
            self,
            MotionChannel::RotationX | MotionChannel::RotationY | MotionChannel::RotationZ
        )
    }

    /// Component index of the axis this channel drives (0 = X, 1 = Y, 2 = Z).
    pub fn axis(self) -> usize {
        match self {
            MotionChannel::RotationX | MotionChannel::PositionX => 0,
            MotionChannel::RotationY | MotionChannel::PositionY => 1,
            MotionChannel::RotationZ | MotionChannel::PositionZ => 2,
        }
    }
}

/// One channel value of one frame, keyed by the source rig's bone name
/// (pre-alias-resolution).
#[derive(Reflect, Serialize, Deserialize, Clone, Debug)]
pub struct ChannelSample {
    pub bone: String,
    pub channel: MotionChannel,
    pub value: f32,
}

impl ChannelSample {
    pub fn new(bone: impl Into<String>, channel: MotionChannel, value: f32) -> Self {
        Self {
            bone: bone.into(),
            channel,
            value,
        }
    }
}

/// One timestep of animation data. Read-only once produced.
#[derive(Reflect, Serialize, Deserialize, Clone, Debug, Default)]
#[reflect(Default)]
pub struct MotionFrame {
    pub channels: Vec<ChannelSample>,
}

/// Angle unit a motion source delivers its rotation channels in. Everything
/// is converted to degrees before composition and limit clamping.
#[derive(Reflect, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Debug)]
#[reflect(Default)]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    pub fn to_degrees(self, value: f32) -> f32 {
        match self {
            AngleUnit::Degrees => value,
            AngleUnit::Radians => value.to_degrees(),
        }
    }
}

/// A finite, ordered, replayable sequence of motion frames.
///
/// Frames are delivered in increasing time order and the length is
/// queryable up front. Looping is caller policy, implemented by replaying
/// from frame 0, never inside the source.
pub trait MotionSource {
    fn frame_count(&self) -> usize;

    /// Seconds per frame.
    fn frame_time(&self) -> f32;

    fn frame(&self, index: usize) -> Option<&MotionFrame>;

    fn duration(&self) -> f32 {
        self.frame_count() as f32 * self.frame_time()
    }
}

/// In-memory motion clip: the already-decoded channel stream of an
/// animation file. Byte-level BVH/VRM parsing is a producer concern and
/// stays outside this crate.
#[derive(Asset, Reflect, Serialize, Deserialize, Clone, Debug)]
pub struct MotionClip {
    frames: Vec<MotionFrame>,
    frame_time: f32,
    units: AngleUnit,
}

impl Default for MotionClip {
    fn default() -> Self {
        Self {
            frames: vec![],
            frame_time: DEFAULT_FRAME_TIME,
            units: AngleUnit::default(),
        }
    }
}

impl MotionClip {
    pub fn new(frames: Vec<MotionFrame>, frame_time: f32) -> Self {
        Self {
            frames,
            frame_time,
            units: AngleUnit::default(),
        }
    }

    pub fn with_units(mut self, units: AngleUnit) -> Self {
        self.units = units;
        self
    }

    pub fn units(&self) -> AngleUnit {
        self.units
    }
}

impl MotionSource for MotionClip {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn frame_time(&self) -> f32 {
        self.frame_time
    }

    fn frame(&self, index: usize) -> Option<&MotionFrame> {
        self.frames.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_duration_is_queryable_up_front() {
        let frames = vec![MotionFrame::default(); 90];
        let clip = MotionClip::new(frames, DEFAULT_FRAME_TIME);

        assert_eq!(clip.frame_count(), 90);
        assert!((clip.duration() - 3.0).abs() < 1e-5);
        assert!(clip.frame(89).is_some());
        assert!(clip.frame(90).is_none());
    }

    #[test]
    fn angle_units_convert_to_degrees() {
        assert_eq!(AngleUnit::Degrees.to_degrees(90.0), 90.0);
        assert!((AngleUnit::Radians.to_degrees(std::f32::consts::PI) - 180.0).abs() < 1e-4);
    }
}
