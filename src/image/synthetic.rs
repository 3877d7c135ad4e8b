//! Placeholder raster shown when a file has nothing renderable
//!
//! Noise texture around 128 with a bright disc in the middle and a dark
//! spot up and to the left. The shape is fixed; only the noise depends on
//! the random source.

use super::encode::{PersistedImage, encode};
use crate::error::EncodeError;
use image::{GrayImage, Luma};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use std::path::Path;
use tracing::info;

pub const SYNTHETIC_SIZE: u32 = 512;

const NOISE_MEAN: f64 = 128.0;
const NOISE_STD_DEV: f64 = 30.0;

/// Circular region whose samples are shifted by `delta`, saturating at 0/255
struct Disc {
    center: (i64, i64),
    radius: i64,
    delta: i16,
}

impl Disc {
    #[inline]
    fn contains(&self, x: u32, y: u32) -> bool {
        let dx = i64::from(x) - self.center.0;
        let dy = i64::from(y) - self.center.1;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    fn apply(&self, image: &mut GrayImage) {
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            if self.contains(x, y) {
                pixel[0] = (i16::from(pixel[0]) + self.delta).clamp(0, 255) as u8;
            }
        }
    }
}

fn discs() -> [Disc; 2] {
    let c = i64::from(SYNTHETIC_SIZE / 2);
    [
        Disc {
            center: (c, c),
            radius: 80,
            delta: 60,
        },
        Disc {
            center: (c - 120, c - 120),
            radius: 30,
            delta: -40,
        },
    ]
}

/// Build the 512×512 placeholder in memory
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> GrayImage {
    let mut image = GrayImage::from_fn(SYNTHETIC_SIZE, SYNTHETIC_SIZE, |_, _| {
        let z: f64 = StandardNormal.sample(rng);
        Luma([z.mul_add(NOISE_STD_DEV, NOISE_MEAN).clamp(0.0, 255.0) as u8])
    });

    for disc in discs() {
        disc.apply(&mut image);
    }

    image
}

/// Generate the placeholder and write it to `path`
pub fn synthesize<R: Rng + ?Sized>(path: &Path, rng: &mut R) -> Result<PersistedImage, EncodeError> {
    let persisted = encode(&generate(rng), path)?;
    info!(path = %path.display(), "Synthetic image created");
    Ok(persisted)
}
