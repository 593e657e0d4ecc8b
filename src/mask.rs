// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Protection masks
//!
//! A mask marks the pixels a carve should route around.  It comes
//! either from strokes painted on a drawing surface or from the text
//! regions an OCR pass found, and it shrinks in lockstep with the image
//! as seams come out, so a protected pixel stays protected wherever the
//! removals shift it to.

use crate::config::RegionConfig;
use crate::cq;
use crate::error::{CarveError, Result};
use crate::pixelpairs::is_painted;
use crate::regions::{filter_noise, merge_nearby_regions, TextRegion};
use crate::seam::{Orientation, Seam};
use crate::twodmap::TwoDimensionalMap;
use image::{GenericImageView, Pixel, Primitive};
use itertools::iproduct;

#[derive(Debug, Clone, PartialEq)]
pub struct ProtectionMask {
    map: TwoDimensionalMap<bool>,
}

impl ProtectionMask {
    /// An all-clear mask.
    pub fn new(width: u32, height: u32) -> Self {
        ProtectionMask {
            map: TwoDimensionalMap::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.map.width
    }

    pub fn height(&self) -> u32 {
        self.map.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.map.dimensions()
    }

    pub fn is_protected(&self, x: u32, y: u32) -> bool {
        self.map[(x, y)]
    }

    pub fn protect(&mut self, x: u32, y: u32) {
        self.map[(x, y)] = true;
    }

    pub fn protected_count(&self) -> usize {
        self.map.values().iter().filter(|p| **p).count()
    }

    pub fn is_clear(&self) -> bool {
        self.protected_count() == 0
    }

    /// Build a mask from a drawing surface: any pixel with non-zero
    /// opacity is protected (any non-black pixel, on a surface without
    /// alpha).  An entirely transparent surface yields
    /// no mask at all, so carving can skip protection altogether.
    pub fn from_drawing_surface<I, P, S>(surface: &I) -> Option<Self>
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel<Subpixel = S> + 'static,
        S: Primitive + 'static,
    {
        let (width, height) = surface.dimensions();
        let mut mask = ProtectionMask::new(width, height);
        for (y, x) in iproduct!(0..height, 0..width) {
            if is_painted(&surface.get_pixel(x, y)) {
                mask.protect(x, y);
            }
        }
        cq!(mask.is_clear(), None, Some(mask))
    }

    /// As `from_drawing_surface`, but insists the surface is the same
    /// size as the image it is meant to protect.
    pub fn from_drawing_surface_for<I, P, S>(
        surface: &I,
        width: u32,
        height: u32,
    ) -> Result<Option<Self>>
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel<Subpixel = S> + 'static,
        S: Primitive + 'static,
    {
        let (mask_width, mask_height) = surface.dimensions();
        if (mask_width, mask_height) != (width, height) {
            return Err(CarveError::MaskMismatch {
                mask_width,
                mask_height,
                width,
                height,
            });
        }
        Ok(Self::from_drawing_surface(surface))
    }

    /// Paint a rectangle, grown by `padding` on every side and clamped
    /// to the canvas.
    pub fn paint_region(&mut self, region: &TextRegion, padding: u32) {
        let left = region.left.saturating_sub(padding);
        let top = region.top.saturating_sub(padding);
        let right = region.right().saturating_add(padding).min(self.width());
        let bottom = region.bottom().saturating_add(padding).min(self.height());
        for (y, x) in iproduct!(top..bottom, left..right) {
            self.protect(x, y);
        }
    }

    /// Paint every region as given, no filtering or merging.
    pub fn from_regions(width: u32, height: u32, regions: &[TextRegion], padding: u32) -> Self {
        let mut mask = ProtectionMask::new(width, height);
        regions.iter().for_each(|r| mask.paint_region(r, padding));
        mask
    }

    /// Return a mask with the seam's cells removed, matching the image
    /// that results from removing the same seam.
    pub fn without_seam(&self, seam: &Seam) -> Self {
        let map = match seam.orientation() {
            Orientation::Vertical => self.map.without_vertical_seam(seam.offsets()),
            Orientation::Horizontal => self.map.without_horizontal_seam(seam.offsets()),
        };
        ProtectionMask { map }
    }
}

/// The OCR path in full: throw away noise, merge neighbouring lines,
/// and paint the padded result.  If nothing survives the filter there
/// is nothing to protect, and no mask is returned.
pub fn protect_text_regions(
    width: u32,
    height: u32,
    regions: &[TextRegion],
    config: &RegionConfig,
) -> Option<ProtectionMask> {
    let kept = filter_noise(regions, config);
    if kept.is_empty() {
        return None;
    }
    let merged = merge_nearby_regions(&kept, config.merge_threshold);
    Some(ProtectionMask::from_regions(width, height, &merged, config.padding))
}
