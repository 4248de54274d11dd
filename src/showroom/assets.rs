//=========================================================================
// Procedural Assets
//=========================================================================
//
// Synthesizes the showroom bundle on the loader thread: a boxy car model,
// a checker paint texture and two tones for the startup and engine sounds.
//
//=========================================================================

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use glam::Vec3;
use log::debug;

use super::{CAR_ENGINE_SOUND, CAR_MODEL, CAR_STARTUP_SOUND, CAR_TEXTURE};
use crate::core::assets::{AssetBundle, AssetLoader};
use crate::core::audio::SoundBuffer;
use crate::core::render::{Color, Geometry, Material, Model, ModelPart, Texture, Transform};
use crate::error::AssetError;

const SAMPLE_RATE: u32 = 22_050;

//=== ProceduralAssets ====================================================

/// [`AssetLoader`] producing the showroom bundle, optionally after a delay.
#[derive(Debug, Clone, Default)]
pub struct ProceduralAssets {
    delay: Duration,
}

impl ProceduralAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleeps for `delay` before producing the bundle.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Builds the bundle immediately on the calling thread.
    pub fn bundle() -> AssetBundle {
        AssetBundle::new()
            .with_model(CAR_MODEL, car_model())
            .with_texture(CAR_TEXTURE, Texture::checker(CAR_TEXTURE, 64, 8, [200, 30, 30, 255], [240, 240, 240, 255]))
            .with_sound(CAR_STARTUP_SOUND, SoundBuffer::tone(CAR_STARTUP_SOUND, 220.0, 0.8, SAMPLE_RATE))
            .with_sound(CAR_ENGINE_SOUND, SoundBuffer::tone(CAR_ENGINE_SOUND, 55.0, 1.0, SAMPLE_RATE))
    }
}

impl AssetLoader for ProceduralAssets {
    fn load(&mut self) -> Result<AssetBundle, AssetError> {
        if !self.delay.is_zero() {
            debug!("Procedural assets: waiting {:?}", self.delay);
            thread::sleep(self.delay);
        }
        Ok(Self::bundle())
    }
}

//=== Car Model ===========================================================

fn part(name: &str, size: Vec3, position: Vec3) -> ModelPart {
    ModelPart {
        name: name.to_string(),
        geometry: Some(Arc::new(Geometry::cuboid(size.x, size.y, size.z))),
        material: Material::with_color(Color::WHITE),
        transform: Transform::from_position(position),
    }
}

/// Body, cabin and four wheels, resting on y = 0, nose toward -z.
fn car_model() -> Model {
    let wheel = Vec3::new(0.3, 0.6, 0.6);
    let mut parts = vec![
        part("body", Vec3::new(2.0, 0.8, 4.0), Vec3::new(0.0, 0.7, 0.0)),
        part("cabin", Vec3::new(1.6, 0.6, 2.0), Vec3::new(0.0, 1.4, 0.3)),
    ];

    for (name, x, z) in [
        ("wheel_fl", -1.05, -1.3),
        ("wheel_fr", 1.05, -1.3),
        ("wheel_rl", -1.05, 1.3),
        ("wheel_rr", 1.05, 1.3),
    ] {
        parts.push(part(name, wheel, Vec3::new(x, 0.3, z)));
    }

    Model {
        name: CAR_MODEL.to_string(),
        parts,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
