// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Getting pixels in and out.
//!
//! The engine itself only ever sees decoded RGBA grids.  These are the
//! thin edges where an encoded image becomes one, and where the result
//! is encoded again for whoever stores or uploads it.

use crate::error::{CarveError, Result};
use image::{ImageOutputFormat, RgbaImage};
use std::io::Cursor;
use std::path::PathBuf;

/// Where an image comes from: a file on disk, or bytes already in
/// memory (a fetched upload, a clipboard paste).
#[derive(Debug, Clone)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<&std::path::Path> for ImageSource {
    fn from(path: &std::path::Path) -> Self {
        ImageSource::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

/// Decode a source into an RGBA pixel buffer.  Failures are reported
/// as they are, with no retry.
pub fn load_pixel_buffer<T: Into<ImageSource>>(source: T) -> Result<RgbaImage> {
    let decoded = match source.into() {
        ImageSource::Path(path) => image::open(&path),
        ImageSource::Bytes(bytes) => image::load_from_memory(&bytes),
    };
    decoded.map(|img| img.to_rgba8()).map_err(CarveError::Decode)
}

/// Encode a pixel buffer as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageOutputFormat::Png)
        .map_err(CarveError::Encode)?;
    Ok(bytes.into_inner())
}
