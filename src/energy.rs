// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of an image
//!
//! Given an image and the orientation of the seam we want next,
//! calculate the energy field for that image: the gradient of every
//! pixel against the two neighbours a seam of that orientation would
//! pull together.  Protected pixels get a surcharge large enough that
//! no seam crosses one while an unprotected path exists.
//!
//! The field is rebuilt from scratch before every removal.  Taking a
//! seam out changes the neighbours of every pixel in each row (or
//! column) it passed through, so nothing survives to be cached.

use crate::cq;
use crate::mask::ProtectionMask;
use crate::pixelpairs::squared_rgb_distance;
use crate::seam::Orientation;
use crate::twodmap::TwoDimensionalMap;
use image::{GenericImageView, GrayImage, Luma, Pixel, Primitive};
use itertools::iproduct;

/// A same-shaped grid of non-negative importance values.
pub type EnergyField = TwoDimensionalMap<f64>;

/// Compute the energy of every pixel in an image.
///
/// For a vertical seam the neighbours are left and right; for a
/// horizontal one, above and below.  A neighbour that falls off the
/// edge of the image contributes nothing.  The energy is the Euclidean
/// norm of both RGB differences taken together, plus
/// `protection_energy` if the mask marks the pixel.
pub fn calculate_energy<I, P, S>(
    image: &I,
    orientation: Orientation,
    mask: Option<&ProtectionMask>,
    protection_energy: f64,
) -> EnergyField
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    let mut emap = EnergyField::new(width, height);

    for (y, x) in iproduct!(0..height, 0..width) {
        let current_pixel = image.get_pixel(x, y);
        let (before, after) = match orientation {
            Orientation::Vertical => (
                cq!(x == 0, None, Some((x - 1, y))),
                cq!(x + 1 >= width, None, Some((x + 1, y))),
            ),
            Orientation::Horizontal => (
                cq!(y == 0, None, Some((x, y - 1))),
                cq!(y + 1 >= height, None, Some((x, y + 1))),
            ),
        };
        let gradient: f64 = [before, after]
            .iter()
            .flatten()
            .map(|(nx, ny)| squared_rgb_distance(&image.get_pixel(*nx, *ny), &current_pixel))
            .sum();
        let protected = mask.map_or(false, |m| m.is_protected(x, y));
        emap[(x, y)] = gradient.sqrt() + cq!(protected, protection_energy, 0.0);
    }
    emap
}

/// Render an energy field as a greyscale image, scaled so the most
/// energetic pixel is white.  A flat field renders black.
pub fn energy_to_image(energy: &EnergyField) -> GrayImage {
    let (width, height) = energy.dimensions();
    let factor = energy.values().iter().cloned().fold(0.0, f64::max);
    GrayImage::from_fn(width, height, |x, y| {
        let e = energy[(x, y)];
        Luma([cq!(factor > 0.0, (e * 255.0 / factor).round().min(255.0) as u8, 0)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    // One row: black, white, black.
    fn stripe() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(3, 1, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
        img
    }

    #[test]
    fn vertical_energy_uses_left_and_right() {
        let energy = calculate_energy(&stripe(), Orientation::Vertical, None, 0.0);
        let one_side = (3.0f64 * 255.0 * 255.0).sqrt();
        let both_sides = (2.0f64 * 3.0 * 255.0 * 255.0).sqrt();
        assert!((energy[(0, 0)] - one_side).abs() < 1e-9);
        assert!((energy[(1, 0)] - both_sides).abs() < 1e-9);
        assert!((energy[(2, 0)] - one_side).abs() < 1e-9);
    }

    #[test]
    fn horizontal_energy_ignores_left_and_right() {
        let energy = calculate_energy(&stripe(), Orientation::Horizontal, None, 0.0);
        assert_eq!(energy.values(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn alpha_differences_carry_no_energy() {
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]));
        img.put_pixel(0, 0, Rgba([9, 9, 9, 0]));
        let energy = calculate_energy(&img, Orientation::Vertical, None, 0.0);
        assert!(energy.values().iter().all(|e| *e == 0.0));
    }

    #[test]
    fn protection_adds_the_surcharge() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]));
        let mut mask = ProtectionMask::new(2, 2);
        mask.protect(1, 1);
        let energy = calculate_energy(&img, Orientation::Horizontal, Some(&mask), 1_000_000.0);
        assert_eq!(energy[(1, 1)], 1_000_000.0);
        assert_eq!(energy[(0, 1)], 0.0);
    }

    #[test]
    fn single_pixel_has_no_neighbours() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([200, 0, 0, 255]));
        let energy = calculate_energy(&img, Orientation::Vertical, None, 0.0);
        assert_eq!(energy.values(), &[0.0]);
    }

    #[test]
    fn energy_image_is_normalised() {
        let energy = calculate_energy(&stripe(), Orientation::Vertical, None, 0.0);
        let img = energy_to_image(&energy);
        assert_eq!(img.get_pixel(1, 0)[0], 255);
        assert!(img.get_pixel(0, 0)[0] < 255);

        let flat = EnergyField::new(2, 2);
        assert!(energy_to_image(&flat).pixels().all(|p| p[0] == 0));
    }
}
