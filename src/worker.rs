// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Carving off the caller's thread.
//!
//! A carve can take a while on a large image.  `spawn_carve` moves the
//! image and its mask onto a thread of their own and hands back a job:
//! progress arrives on a channel, the finished image (or the error) at
//! `wait`, and `cancel` stops the carve at its next yield point.

use crate::config::CarveConfig;
use crate::error::Result;
use crate::mask::ProtectionMask;
use crate::seamcarver::{CancelToken, SeamCarver};
use crossbeam::channel::{unbounded, Receiver};
use image::RgbaImage;
use log::debug;
use std::thread::{self, JoinHandle};

pub struct CarveJob {
    progress: Receiver<u8>,
    cancel: CancelToken,
    handle: JoinHandle<Result<RgbaImage>>,
}

impl CarveJob {
    /// Progress percentages, in order.  The channel closes when the
    /// carve ends, however it ends.
    pub fn progress(&self) -> &Receiver<u8> {
        &self.progress
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Block until the carve finishes.  A panic on the carving thread
    /// is resumed here.
    pub fn wait(self) -> Result<RgbaImage> {
        match self.handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

pub fn spawn_carve(
    image: RgbaImage,
    width: u32,
    height: u32,
    mask: Option<ProtectionMask>,
    config: CarveConfig,
) -> CarveJob {
    let (sender, progress) = unbounded();
    let cancel = CancelToken::new();
    let token = cancel.clone();
    let handle = thread::spawn(move || {
        debug!("carve thread started");
        SeamCarver::new(&image)
            .with_mask(mask.as_ref())
            .with_config(config)
            .with_cancel(token)
            .carve(width, height, |p| {
                // Nobody listening is not our problem.
                let _ = sender.send(p);
            })
    });
    CarveJob {
        progress,
        cancel,
        handle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CarveError;
    use image::Rgba;

    #[test]
    fn progress_arrives_over_the_channel() {
        let img = RgbaImage::from_pixel(20, 10, Rgba([128, 128, 128, 255]));
        let job = spawn_carve(img, 15, 10, None, CarveConfig::default());
        let seen: Vec<u8> = job.progress().iter().collect();
        assert_eq!(seen, vec![20, 40, 60, 80, 100]);
        assert_eq!(job.wait().unwrap().dimensions(), (15, 10));
    }

    #[test]
    fn cancelled_job_returns_no_image() {
        let img = RgbaImage::from_pixel(200, 20, Rgba([0, 0, 0, 255]));
        let job = spawn_carve(img, 10, 20, None, CarveConfig::default());
        job.cancel();
        assert!(matches!(job.wait(), Err(CarveError::Cancelled)));
    }
}
