// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy contribution of a pixel pair
//!
//! Given two pixels, the contribution between them is the squared
//! distance between the colors that make them up, the classic
//! d(R)² + d(G)² + d(B)².  Alpha never counts.  The channels are read
//! straight off the pixel, so greyscale images work too: their one
//! luma channel is the whole colour.

use crate::cq;
use image::{Pixel, Primitive};
use num_traits::{ToPrimitive, Zero};

// Every colour model image knows ("RGBA", "YA", ...) names its alpha
// channel last.
fn has_alpha<P: Pixel>() -> bool {
    P::COLOR_MODEL.ends_with('A')
}

/// The colour channels of a pixel, alpha left off.
#[inline]
pub fn color_channels<P, S>(p: &P) -> &[S]
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let channels = p.channels();
    let count = cq!(has_alpha::<P>(), channels.len() - 1, channels.len());
    &channels[..count]
}

/// Whether a pixel on a drawing surface has been painted: any opacity
/// at all if the surface has alpha, any non-black value if it does not.
pub fn is_painted<P, S>(p: &P) -> bool
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let channels = p.channels();
    if has_alpha::<P>() {
        channels.last().map_or(false, |a| !a.is_zero())
    } else {
        channels.iter().any(|c| !c.is_zero())
    }
}

/// (Pixel, Pixel) -> squared RGB distance
#[inline]
pub fn squared_rgb_distance<P, S>(p1: &P, p2: &P) -> f64
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    color_channels(p1)
        .iter()
        .zip(color_channels(p2).iter())
        .map(|(a, b)| {
            let d = a.to_f64().unwrap_or(0.0) - b.to_f64().unwrap_or(0.0);
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, LumaA, Rgb, Rgba};

    #[test]
    fn alpha_is_ignored() {
        let a = Rgba([10u8, 20, 30, 0]);
        let b = Rgba([10u8, 20, 30, 255]);
        assert_eq!(squared_rgb_distance(&a, &b), 0.0);
        assert_eq!(squared_rgb_distance(&LumaA([7u8, 0]), &LumaA([7u8, 9])), 0.0);
    }

    #[test]
    fn channels_sum_squared() {
        let a = Rgba([0u8, 0, 0, 255]);
        let b = Rgba([3u8, 4, 0, 255]);
        assert_eq!(squared_rgb_distance(&a, &b), 25.0);
        assert_eq!(squared_rgb_distance(&Rgb([0u8, 0, 0]), &Rgb([3u8, 4, 0])), 25.0);
        assert_eq!(squared_rgb_distance(&Luma([2u16]), &Luma([5u16])), 9.0);
    }

    #[test]
    fn painted_means_opaque_or_non_black() {
        assert!(!is_painted(&Rgba([255u8, 255, 255, 0])));
        assert!(is_painted(&Rgba([0u8, 0, 0, 1])));
        assert!(!is_painted(&Rgb([0u8, 0, 0])));
        assert!(is_painted(&Luma([1u8])));
    }
}
