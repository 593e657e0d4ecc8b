// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong while carving.  Nothing here is ever
//! retried; errors travel straight back to whoever asked for the carve.

use failure::Fail;

#[derive(Debug, Fail)]
pub enum CarveError {
    #[fail(
        display = "cannot carve a {}x{} image to {}x{}: seam carving only shrinks, and never to zero",
        width, height, target_width, target_height
    )]
    InvalidDimension {
        width: u32,
        height: u32,
        target_width: u32,
        target_height: u32,
    },

    #[fail(
        display = "protection mask is {}x{} but the image is {}x{}",
        mask_width, mask_height, width, height
    )]
    MaskMismatch {
        mask_width: u32,
        mask_height: u32,
        width: u32,
        height: u32,
    },

    #[fail(display = "failed to decode image: {}", _0)]
    Decode(#[cause] image::ImageError),

    #[fail(display = "failed to encode image: {}", _0)]
    Encode(#[cause] image::ImageError),

    #[fail(display = "I/O error: {}", _0)]
    Io(#[cause] std::io::Error),

    #[fail(display = "malformed JSON: {}", _0)]
    Json(#[cause] serde_json::Error),

    #[fail(display = "carve cancelled")]
    Cancelled,
}

impl From<std::io::Error> for CarveError {
    fn from(e: std::io::Error) -> Self {
        CarveError::Io(e)
    }
}

impl From<serde_json::Error> for CarveError {
    fn from(e: serde_json::Error) -> Self {
        CarveError::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, CarveError>;
