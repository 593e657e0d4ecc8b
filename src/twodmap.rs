use crate::cq;
use std::ops::{Index, IndexMut};

/// Defines the basic two-dimensional map: An addressable field
/// containing one of several possible objects during processing: an
/// f64 for the energy field, a bool for the protection mask, or an
/// energy + parent address for the seam digraph.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoDimensionalMap<P: Default + Copy> {
    pub width: u32,
    pub height: u32,
    values: Vec<P>,
}

impl<P: Default + Copy> TwoDimensionalMap<P> {
    /// Define a new (abstract) map.  The content type must implement
    /// the Default trait.
    pub fn new(width: u32, height: u32) -> Self {
        TwoDimensionalMap {
            width,
            height,
            values: vec![P::default(); width as usize * height as usize],
        }
    }

    /// Wrap an existing row-major vector.  Returns None if the vector
    /// is not exactly `width * height` long.
    pub fn from_vec(width: u32, height: u32, values: Vec<P>) -> Option<Self> {
        if values.len() != width as usize * height as usize {
            return None;
        }
        Some(TwoDimensionalMap {
            width,
            height,
            values,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The raw row-major contents.
    pub fn values(&self) -> &[P] {
        &self.values
    }

    // Absolutely, the number one name of this game is keep the index
    // math in a singular location and never, ever mess with it.  This
    // particular variant is the same one used in image.rs.
    fn get_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Return a new map one column narrower, skipping the cell at
    /// `seam[y]` in every row.
    pub fn without_vertical_seam(&self, seam: &[u32]) -> Self {
        let mut values = Vec::with_capacity(self.values.len() - self.height as usize);
        for (y, row) in self.values.chunks(self.width as usize).enumerate() {
            let skip = seam[y] as usize;
            values.extend_from_slice(&row[..skip]);
            values.extend_from_slice(&row[skip + 1..]);
        }
        TwoDimensionalMap {
            width: self.width - 1,
            height: self.height,
            values,
        }
    }

    /// Return a new map one row shorter, skipping the cell at
    /// `seam[x]` in every column.
    pub fn without_horizontal_seam(&self, seam: &[u32]) -> Self {
        let mut target = TwoDimensionalMap::new(self.width, self.height - 1);
        for x in 0..self.width {
            let skip = seam[x as usize];
            for y in (0..self.height).filter(|y| *y != skip) {
                target[(x, cq!(y < skip, y, y - 1))] = self[(x, y)];
            }
        }
        target
    }
}

impl<P: Default + Copy> Index<(u32, u32)> for TwoDimensionalMap<P> {
    type Output = P;

    /// A convenience addressing mode for getting values.
    fn index(&self, (x, y): (u32, u32)) -> &P {
        let index = self.get_index(x, y);
        &self.values[index]
    }
}

impl<P: Default + Copy> IndexMut<(u32, u32)> for TwoDimensionalMap<P> {
    /// A convenience addressing mode for setting values.
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.values[index]
    }
}

#[derive(Default, Debug, Copy, Clone)]
pub(crate) struct EnergyAndBackPointer<P: Default + Copy> {
    pub energy: P,
    pub parent: u32,
}
