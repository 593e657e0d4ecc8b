// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - The main function
//!
//! The main seamcarver routine, with helpers for the horizontal and
//! vertical removals.  Width is resolved completely before height;
//! every removal produces a fresh image and a fresh mask, never an
//! in-place edit, so a failed or cancelled carve leaves nothing
//! half-done behind it.

use crate::config::CarveConfig;
use crate::cq;
use crate::error::{CarveError, Result};
use crate::mask::ProtectionMask;
use crate::seam::{Orientation, Seam};
use crate::seamfinder::{ProtectedEnergy, SeamFinder};
use image::{GenericImageView, ImageBuffer, Pixel, Primitive};
use log::{debug, info, trace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Copy every pixel except the one at `seam[y]` in each row.  Channels
/// are copied verbatim.
pub fn remove_vertical_seam<I, P, S>(image: &I, seam: &[u32]) -> ImageBuffer<P, Vec<S>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    let mut imgbuf = ImageBuffer::new(width - 1, height);
    for y in 0..height {
        let skip = seam[y as usize];
        for x in (0..width).filter(|x| *x != skip) {
            imgbuf.put_pixel(cq!(x < skip, x, x - 1), y, image.get_pixel(x, y));
        }
    }
    imgbuf
}

/// Copy every pixel except the one at `seam[x]` in each column.
pub fn remove_horizontal_seam<I, P, S>(image: &I, seam: &[u32]) -> ImageBuffer<P, Vec<S>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    let mut imgbuf = ImageBuffer::new(width, height - 1);
    for x in 0..width {
        let skip = seam[x as usize];
        for y in (0..height).filter(|y| *y != skip) {
            imgbuf.put_pixel(x, cq!(y < skip, y, y - 1), image.get_pixel(x, y));
        }
    }
    imgbuf
}

/// Remove a seam of either orientation.
pub fn remove_seam<I, P, S>(image: &I, seam: &Seam) -> ImageBuffer<P, Vec<S>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    match seam.orientation() {
        Orientation::Vertical => remove_vertical_seam(image, seam.offsets()),
        Orientation::Horizontal => remove_horizontal_seam(image, seam.offsets()),
    }
}

/// A shared flag a caller can raise to stop a carve in flight.  The
/// carver looks at it every `yield_interval` seams.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A struct for holding the image to be carved, and everything the
/// carve needs besides the target size.
pub struct SeamCarver<'a, I, P, S>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    image: &'a I,
    mask: Option<&'a ProtectionMask>,
    config: CarveConfig,
    cancel: Option<CancelToken>,
}

impl<'a, I, P, S> SeamCarver<'a, I, P, S>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    /// Creates a new SeamCarver with an image to be carved.
    pub fn new(image: &'a I) -> Self {
        Self {
            image,
            mask: None,
            config: CarveConfig::default(),
            cancel: None,
        }
    }

    pub fn with_mask(mut self, mask: Option<&'a ProtectionMask>) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_config(mut self, config: CarveConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    // This is absurdly inefficient, as the entire energy field and
    // seam digraph is recalculated for every seam.  It has to be:
    // every removal changes the neighbours of every pixel it passed.

    /// Given a desired new width and height, repeatedly carve seams
    /// out of the image, reporting progress as a percentage after
    /// every seam.
    pub fn carve<F>(
        &self,
        newwidth: u32,
        newheight: u32,
        mut progress: F,
    ) -> Result<ImageBuffer<P, Vec<S>>>
    where
        F: FnMut(u8),
    {
        let (width, height) = self.image.dimensions();
        if width < newwidth || height < newheight {
            return Err(CarveError::InvalidDimension {
                width,
                height,
                target_width: newwidth,
                target_height: newheight,
            });
        }
        if let Some(mask) = self.mask {
            let (mask_width, mask_height) = mask.dimensions();
            if (mask_width, mask_height) != (width, height) {
                return Err(CarveError::MaskMismatch {
                    mask_width,
                    mask_height,
                    width,
                    height,
                });
            }
        }

        // Initialize the scratch space.
        let mut scratch = ImageBuffer::<P, Vec<S>>::new(width, height);
        self.image.pixels().for_each(|p| scratch.put_pixel(p.0, p.1, p.2));

        let (vertical, horizontal) = (width - newwidth, height - newheight);
        let total = vertical + horizontal;
        if total == 0 {
            return Ok(scratch);
        }
        // Nothing can carve down to an empty image.
        if newwidth == 0 || newheight == 0 {
            return Err(CarveError::InvalidDimension {
                width,
                height,
                target_width: newwidth,
                target_height: newheight,
            });
        }

        let mut mask = self.mask.cloned();
        let mut removed = 0;
        for (orientation, count) in [
            (Orientation::Vertical, vertical),
            (Orientation::Horizontal, horizontal),
        ]
        .iter()
        {
            debug!("removing {} {:?} seams", count, orientation);
            for n in 1..=*count {
                let finder =
                    ProtectedEnergy::new(&scratch, mask.as_ref(), self.config.protection_energy);
                let seam = finder.find_seam(*orientation);
                scratch = remove_seam(&scratch, &seam);
                mask = mask.map(|m| m.without_seam(&seam));
                debug_assert!(mask
                    .as_ref()
                    .map_or(true, |m| m.dimensions() == scratch.dimensions()));
                removed += 1;
                trace!("{:?} seam {}: now {:?}", orientation, n, scratch.dimensions());
                progress(percent(removed, total));
                if self.config.yield_interval > 0 && n % self.config.yield_interval == 0 {
                    self.pause()?;
                }
            }
        }

        info!(
            "carved {}x{} to {}x{} ({} seams)",
            width,
            height,
            newwidth,
            newheight,
            total
        );
        Ok(scratch)
    }

    // The only suspension point: let other threads run, then see if
    // anyone has asked us to stop.
    fn pause(&self) -> Result<()> {
        thread::yield_now();
        match &self.cancel {
            Some(token) if token.is_cancelled() => {
                debug!("carve cancelled");
                Err(CarveError::Cancelled)
            }
            _ => Ok(()),
        }
    }
}

fn percent(done: u32, total: u32) -> u8 {
    (100.0 * f64::from(done) / f64::from(total)).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn numbered(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn vertical_removal_skips_one_pixel_per_row() {
        let img = numbered(3, 2);
        let out = remove_vertical_seam(&img, &[1, 2]);
        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(out.get_pixel(1, 0)[0], 2);
        assert_eq!(out.get_pixel(1, 1)[0], 1);
        assert_eq!(out.get_pixel(0, 1)[0], 0);
    }

    #[test]
    fn horizontal_removal_skips_one_pixel_per_column() {
        let img = numbered(2, 3);
        let out = remove_horizontal_seam(&img, &[0, 2]);
        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(out.get_pixel(0, 0)[1], 1);
        assert_eq!(out.get_pixel(0, 1)[1], 2);
        assert_eq!(out.get_pixel(1, 1)[1], 1);
    }

    #[test]
    fn rgba_is_copied_verbatim() {
        let mut img = RgbaImage::from_pixel(3, 1, Rgba([1, 2, 3, 4]));
        img.put_pixel(2, 0, Rgba([5, 6, 7, 8]));
        let out = remove_vertical_seam(&img, &[0]);
        assert_eq!(out.get_pixel(1, 0), &Rgba([5, 6, 7, 8]));
    }

    #[test]
    fn seamcarver_cannot_upscale() {
        let img = numbered(4, 4);
        let result = SeamCarver::new(&img).carve(5, 4, |_| {});
        assert!(matches!(result, Err(CarveError::InvalidDimension { .. })));
        let result = SeamCarver::new(&img).carve(0, 4, |_| {});
        assert!(matches!(result, Err(CarveError::InvalidDimension { .. })));
    }

    #[test]
    fn empty_image_to_its_own_size_is_a_copy() {
        let img = RgbaImage::new(0, 0);
        let mut calls = 0;
        let out = SeamCarver::new(&img).carve(0, 0, |_| calls += 1).unwrap();
        assert_eq!(out.dimensions(), (0, 0));
        assert_eq!(calls, 0);
        let result = SeamCarver::new(&numbered(3, 0)).carve(2, 0, |_| {});
        assert!(matches!(result, Err(CarveError::InvalidDimension { .. })));
    }

    #[test]
    fn mismatched_mask_is_rejected() {
        let img = numbered(4, 4);
        let mask = ProtectionMask::new(4, 3);
        let result = SeamCarver::new(&img).with_mask(Some(&mask)).carve(3, 3, |_| {});
        assert!(matches!(result, Err(CarveError::MaskMismatch { .. })));
    }

    #[test]
    fn carves_both_dimensions() {
        let img = numbered(12, 9);
        let mut calls = Vec::new();
        let out = SeamCarver::new(&img).carve(7, 5, |p| calls.push(p)).unwrap();
        assert_eq!(out.dimensions(), (7, 5));
        assert_eq!(calls.len(), 9);
        assert!(calls.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(calls.last(), Some(&100));
    }

    #[test]
    fn cancellation_is_seen_at_the_yield_point() {
        let img = numbered(30, 4);
        let token = CancelToken::new();
        token.cancel();
        let mut calls = 0;
        let result = SeamCarver::new(&img)
            .with_cancel(token)
            .carve(5, 4, |_| calls += 1);
        assert!(matches!(result, Err(CarveError::Cancelled)));
        assert_eq!(calls, 10);
    }

    #[test]
    fn cancel_cadence_restarts_for_rows() {
        // 3 columns never reach a yield point; the 10th row does.
        let img = numbered(6, 16);
        let token = CancelToken::new();
        token.cancel();
        let mut calls = 0;
        let result = SeamCarver::new(&img)
            .with_cancel(token)
            .carve(3, 4, |_| calls += 1);
        assert!(matches!(result, Err(CarveError::Cancelled)));
        assert_eq!(calls, 13);
    }

    #[test]
    fn percent_rounds() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(3, 3), 100);
    }
}
