// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! OCR text regions
//!
//! An OCR collaborator hands us a list of rectangles with the text it
//! read inside them.  Before they become a protection mask, the
//! obvious noise is thrown away and lines of a paragraph that sit
//! close together are merged, so the mask covers the block as a whole
//! rather than a comb of separate strips that a seam could slip
//! between.

use crate::config::RegionConfig;
use log::debug;
use serde::{Deserialize, Serialize};

/// An axis-aligned box of recognised text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRegion {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub confidence: f32,
}

impl TextRegion {
    pub fn new(left: u32, top: u32, width: u32, height: u32, text: &str, confidence: f32) -> Self {
        TextRegion {
            left,
            top,
            width,
            height,
            text: text.to_string(),
            confidence,
        }
    }

    /// Right edge, exclusive.  Boxes that run past `u32::MAX` stop there.
    pub fn right(&self) -> u32 {
        self.left.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    // Union of the two boxes, texts joined in reading order.
    fn absorb(&mut self, next: &TextRegion) {
        let (left, top) = (self.left.min(next.left), self.top.min(next.top));
        let (right, bottom) = (self.right().max(next.right()), self.bottom().max(next.bottom()));
        self.left = left;
        self.top = top;
        self.width = right - left;
        self.height = bottom - top;
        self.text = format!("{} {}", self.text, next.text);
        self.confidence = (self.confidence + next.confidence) / 2.0;
    }
}

/// Drop regions too small, or with too little text, to be anything but
/// OCR noise.  Confidence plays no part.
pub fn filter_noise(regions: &[TextRegion], config: &RegionConfig) -> Vec<TextRegion> {
    regions
        .iter()
        .filter(|r| r.area() >= config.min_area)
        .filter(|r| r.text.chars().filter(|c| !c.is_whitespace()).count() >= config.min_text_chars)
        .cloned()
        .collect()
}

/// Merge regions whose vertical gap is less than `threshold` pixels.
///
/// Regions are walked in order of their top edge.  The running
/// accumulator swallows the next region whenever the gap between its
/// bottom and that region's top is under the threshold (overlapping
/// regions have a negative gap, and always merge); otherwise the
/// accumulator is emitted and the next region starts a new one.
pub fn merge_nearby_regions(regions: &[TextRegion], threshold: u32) -> Vec<TextRegion> {
    let mut sorted = regions.to_vec();
    sorted.sort_by_key(|r| r.top);

    let mut merged = Vec::with_capacity(sorted.len());
    let mut sorted = sorted.into_iter();
    let mut current = match sorted.next() {
        Some(first) => first,
        None => return merged,
    };

    for next in sorted {
        let gap = i64::from(next.top) - i64::from(current.bottom());
        if gap < i64::from(threshold) {
            current.absorb(&next);
        } else {
            merged.push(std::mem::replace(&mut current, next));
        }
    }
    merged.push(current);

    debug!(
        "merged {} text regions into {}",
        regions.len(),
        merged.len()
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_lines_merge() {
        let regions = [
            TextRegion::new(0, 0, 50, 10, "A", 90.0),
            TextRegion::new(0, 12, 50, 10, "B", 90.0),
        ];
        let merged = merge_nearby_regions(&regions, 15);
        assert_eq!(merged.len(), 1);
        let m = &merged[0];
        assert_eq!((m.left, m.top, m.width, m.bottom()), (0, 0, 50, 22));
        assert_eq!(m.text, "A B");
        assert_eq!(m.confidence, 90.0);
    }

    #[test]
    fn distant_lines_stay_apart() {
        let regions = [
            TextRegion::new(0, 100, 50, 10, "far", 80.0),
            TextRegion::new(0, 0, 50, 10, "near", 60.0),
        ];
        let merged = merge_nearby_regions(&regions, 15);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "near");
        assert_eq!(merged[1].text, "far");
    }

    #[test]
    fn merge_averages_confidence_and_unions_width() {
        let regions = [
            TextRegion::new(10, 0, 20, 10, "left", 80.0),
            TextRegion::new(0, 5, 60, 10, "wide", 40.0),
        ];
        let merged = merge_nearby_regions(&regions, 15);
        assert_eq!(merged.len(), 1);
        assert_eq!((merged[0].left, merged[0].right()), (0, 60));
        assert_eq!(merged[0].bottom(), 15);
        assert_eq!(merged[0].confidence, 60.0);
    }

    #[test]
    fn empty_input_merges_to_nothing() {
        assert!(merge_nearby_regions(&[], 15).is_empty());
    }

    #[test]
    fn tiny_regions_are_noise() {
        let config = RegionConfig::default();
        let regions = [
            TextRegion::new(0, 0, 5, 5, "confident", 99.0),
            TextRegion::new(0, 0, 40, 10, "ok", 10.0),
        ];
        let kept = filter_noise(&regions, &config);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "ok");
    }

    #[test]
    fn edges_saturate_at_the_end_of_the_range() {
        let region = TextRegion::new(u32::MAX - 5, u32::MAX - 1, 40, 40, "far out", 90.0);
        assert_eq!(region.right(), u32::MAX);
        assert_eq!(region.bottom(), u32::MAX);
        let merged = merge_nearby_regions(&[region.clone(), region], 15);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].width, 5);
    }

    #[test]
    fn single_characters_are_noise() {
        let config = RegionConfig::default();
        let regions = [
            TextRegion::new(0, 0, 40, 40, " x ", 99.0),
            TextRegion::new(0, 0, 40, 40, "x y", 99.0),
        ];
        let kept = filter_noise(&regions, &config);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "x y");
    }
}
