// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seams and the direction they run in.

/// Which way a seam runs.  A vertical seam runs top to bottom and
/// narrows the image; a horizontal seam runs left to right and
/// shortens it.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// A connected, monotonic path of pixels: one x-coordinate per row for
/// a vertical seam, one y-coordinate per column for a horizontal one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seam {
    orientation: Orientation,
    offsets: Vec<u32>,
}

impl Seam {
    pub fn new(orientation: Orientation, offsets: Vec<u32>) -> Self {
        Seam {
            orientation,
            offsets,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The varying coordinate at each step along the seam.
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// The (x, y) address of every pixel on the seam, in path order.
    pub fn points(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let orientation = self.orientation;
        self.offsets
            .iter()
            .enumerate()
            .map(move |(step, offset)| match orientation {
                Orientation::Vertical => (*offset, step as u32),
                Orientation::Horizontal => (step as u32, *offset),
            })
    }

    /// True if every step moves at most one pixel sideways.
    pub fn is_connected(&self) -> bool {
        self.offsets
            .windows(2)
            .all(|w| (i64::from(w[0]) - i64::from(w[1])).abs() <= 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_follow_orientation() {
        let vertical = Seam::new(Orientation::Vertical, vec![2, 3, 3]);
        assert_eq!(
            vertical.points().collect::<Vec<_>>(),
            vec![(2, 0), (3, 1), (3, 2)]
        );
        let horizontal = Seam::new(Orientation::Horizontal, vec![1, 0]);
        assert_eq!(horizontal.points().collect::<Vec<_>>(), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn connectivity() {
        assert!(Seam::new(Orientation::Vertical, vec![0, 1, 2, 1]).is_connected());
        assert!(!Seam::new(Orientation::Vertical, vec![0, 2]).is_connected());
    }
}
