// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Find the cheapest seam through an energy field
//!
//! The classic dynamic program: every cell of a cumulative table holds
//! the cheapest cost of any connected path reaching it, plus a pointer
//! to the neighbour that path came through.  The cheapest cell of the
//! final row (or column) is the end of the seam; the back pointers
//! walk it home.

use crate::cq;
use crate::energy::{calculate_energy, EnergyField};
use crate::mask::ProtectionMask;
use crate::seam::{Orientation, Seam};
use crate::twodmap::{EnergyAndBackPointer, TwoDimensionalMap};
use image::{GenericImageView, Pixel, Primitive};
use std::cmp::Ordering;

/// This trait defines how we will return seams from an image.  It's a
/// primitive interface, just enough to make room for multiple energy
/// functions behind the same carver.
pub trait SeamFinder {
    /// Once a SeamFinder has an image (or whatever it needs to make a
    /// rational decision), request a horizontal seam.
    fn find_horizontal_seam(&self) -> Seam;

    /// Request a vertical seam.
    fn find_vertical_seam(&self) -> Seam;

    fn find_seam(&self, orientation: Orientation) -> Seam {
        match orientation {
            Orientation::Vertical => self.find_vertical_seam(),
            Orientation::Horizontal => self.find_horizontal_seam(),
        }
    }
}

type CostTable = TwoDimensionalMap<EnergyAndBackPointer<f64>>;

// The first minimum wins, so candidates must be offered in the
// preferred order: diagonal-before, straight, diagonal-after.
fn cheapest<F>(candidates: impl Iterator<Item = u32>, cost: F) -> Option<u32>
where
    F: Fn(u32) -> f64,
{
    candidates.min_by(|a, b| cost(*a).partial_cmp(&cost(*b)).unwrap_or(Ordering::Equal))
}

/// Given an energy field, return the seam whose x-coordinates, one per
/// row from the top, add up to the least energy.
pub fn energy_to_vertical_seam(energy: &EnergyField) -> Seam {
    let (width, height) = energy.dimensions();
    let mut target = CostTable::new(width, height);

    // Populate the first row with their native energies.
    for x in 0..width {
        target[(x, 0)].energy = energy[(x, 0)];
    }

    let maxwidth = width.saturating_sub(1);
    // For every subsequent row, populate the target cell with the sum
    // of the *lowest adjacent upper energy* and the *x coordinate of
    // that energy*
    for y in 1..height {
        for x in 0..width {
            let range = cq!(x == 0, 0, x - 1)..=cq!(x == maxwidth, maxwidth, x + 1);
            let parent_x = cheapest(range, |px| target[(px, y - 1)].energy).unwrap_or(x);
            target[(x, y)] = EnergyAndBackPointer {
                energy: energy[(x, y)] + target[(parent_x, y - 1)].energy,
                parent: parent_x,
            };
        }
    }

    // Find the x coordinate of the bottommost cell with the least energy.
    let last = height.saturating_sub(1);
    let mut seam_col = cheapest(0..width, |x| target[(x, last)].energy).unwrap_or(0);
    // Working backwards, collect the x coordinates that map to the
    // seam, reverse and return.
    let mut offsets: Vec<u32> = (0..height)
        .rev()
        .map(|y| {
            let x = seam_col;
            seam_col = target[(x, y)].parent;
            x
        })
        .collect();
    offsets.reverse();
    Seam::new(Orientation::Vertical, offsets)
}

/// Given an energy field, return the seam whose y-coordinates, one per
/// column from the left, add up to the least energy.
pub fn energy_to_horizontal_seam(energy: &EnergyField) -> Seam {
    let (width, height) = energy.dimensions();
    let mut target = CostTable::new(width, height);

    // Populate the first column with their native energies.
    for y in 0..height {
        target[(0, y)].energy = energy[(0, y)];
    }

    let maxheight = height.saturating_sub(1);
    // For every subsequent column, populate the target cell with the
    // sum of the *lowest adjacent leftward energy* and the *y
    // coordinate of that energy*
    for x in 1..width {
        for y in 0..height {
            let range = cq!(y == 0, 0, y - 1)..=cq!(y == maxheight, maxheight, y + 1);
            let parent_y = cheapest(range, |py| target[(x - 1, py)].energy).unwrap_or(y);
            target[(x, y)] = EnergyAndBackPointer {
                energy: energy[(x, y)] + target[(x - 1, parent_y)].energy,
                parent: parent_y,
            };
        }
    }

    // Find the y coordinate of the rightmost cell with the least
    // energy.
    let last = width.saturating_sub(1);
    let mut seam_row = cheapest(0..height, |y| target[(last, y)].energy).unwrap_or(0);
    let mut offsets: Vec<u32> = (0..width)
        .rev()
        .map(|x| {
            let y = seam_row;
            seam_row = target[(x, y)].parent;
            y
        })
        .collect();
    offsets.reverse();
    Seam::new(Orientation::Horizontal, offsets)
}

/// The seam engine: an image, the mask protecting parts of it, and the
/// surcharge the mask carries.  Every request rebuilds the energy
/// field from the image as it stands.
pub struct ProtectedEnergy<'a, I, P, S>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    image: &'a I,
    mask: Option<&'a ProtectionMask>,
    protection_energy: f64,
}

impl<'a, I, P, S> ProtectedEnergy<'a, I, P, S>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    /// Takes a reference to an image and its mask, and holds onto them.
    pub fn new(image: &'a I, mask: Option<&'a ProtectionMask>, protection_energy: f64) -> Self {
        ProtectedEnergy {
            image,
            mask,
            protection_energy,
        }
    }

    pub fn energy(&self, orientation: Orientation) -> EnergyField {
        calculate_energy(self.image, orientation, self.mask, self.protection_energy)
    }
}

impl<'a, I, P, S> SeamFinder for ProtectedEnergy<'a, I, P, S>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    fn find_horizontal_seam(&self) -> Seam {
        energy_to_horizontal_seam(&self.energy(Orientation::Horizontal))
    }

    fn find_vertical_seam(&self) -> Seam {
        energy_to_vertical_seam(&self.energy(Orientation::Vertical))
    }
}
