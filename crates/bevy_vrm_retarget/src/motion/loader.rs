use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    reflect::TypePath,
};
use serde::{Deserialize, Serialize};

use super::{AngleUnit, DEFAULT_FRAME_TIME, MotionClip, MotionFrame};
use crate::errors::AssetLoaderError;

#[derive(Default, TypePath)]
pub struct MotionClipLoader;

impl AssetLoader for MotionClipLoader {
    type Asset = MotionClip;
    type Settings = ();
    type Error = AssetLoaderError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = vec![];
        reader.read_to_end(&mut bytes).await?;
        let MotionClipSerial {
            frame_time,
            units,
            frames,
        } = ron::de::from_bytes(&bytes)?;

        Ok(MotionClip::new(frames, frame_time).with_units(units))
    }

    fn extensions(&self) -> &[&str] {
        &["mclip.ron"]
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MotionClipSerial {
    #[serde(default = "default_frame_time")]
    pub frame_time: f32,
    #[serde(default)]
    pub units: AngleUnit,
    pub frames: Vec<MotionFrame>,
}

fn default_frame_time() -> f32 {
    DEFAULT_FRAME_TIME
}
