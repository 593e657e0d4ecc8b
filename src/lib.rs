// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Content-aware image resizing: seam carving, with masks that keep
//! seams away from the parts of a picture that have to survive.

mod ternary;

pub mod config;
pub mod energy;
pub mod error;
pub mod loader;
pub mod mask;
pub mod pixelpairs;
pub mod regions;
pub mod seam;
pub mod seamcarver;
pub mod seamfinder;
pub mod twodmap;
#[cfg(feature = "threaded")]
pub mod worker;

pub use config::{CarveConfig, RegionConfig, Settings};
pub use energy::{calculate_energy, energy_to_image, EnergyField};
pub use error::{CarveError, Result};
pub use loader::{encode_png, load_pixel_buffer, ImageSource};
pub use mask::{protect_text_regions, ProtectionMask};
pub use regions::{filter_noise, merge_nearby_regions, TextRegion};
pub use seam::{Orientation, Seam};
pub use seamcarver::{remove_seam, CancelToken, SeamCarver};
pub use seamfinder::{energy_to_horizontal_seam, energy_to_vertical_seam, SeamFinder};
#[cfg(feature = "threaded")]
pub use worker::{spawn_carve, CarveJob};

use image::{GenericImageView, ImageBuffer, Pixel, Primitive};

/// Shrink `image` to `width` x `height` by removing the cheapest seams,
/// all the vertical ones first, steering around whatever `mask`
/// protects.  `on_progress` hears the percentage done after every
/// seam; a carve that has nothing to remove returns a copy of the
/// image without calling it at all.
pub fn resize_image_content_aware<I, P, S, F>(
    image: &I,
    width: u32,
    height: u32,
    on_progress: F,
    mask: Option<&ProtectionMask>,
) -> Result<ImageBuffer<P, Vec<S>>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
    F: FnMut(u8),
{
    SeamCarver::new(image)
        .with_mask(mask)
        .carve(width, height, on_progress)
}
