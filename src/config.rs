// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tunables for carving and for turning text regions into masks.

use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Energy added to every protected pixel.  It must dwarf the sum of
/// gradient energies along any full-length seam, so the search only
/// crosses protection when nothing else is left.
pub const PROTECTION_ENERGY: f64 = 1_000_000.0;

/// Seams removed, per orientation, between cooperative yields.
pub const YIELD_INTERVAL: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CarveConfig {
    pub protection_energy: f64,
    pub yield_interval: u32,
}

impl Default for CarveConfig {
    fn default() -> Self {
        CarveConfig {
            protection_energy: PROTECTION_ENERGY,
            yield_interval: YIELD_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Largest vertical gap, exclusive, across which regions merge.
    pub merge_threshold: u32,
    /// Pixels added on every side of a merged region before painting.
    pub padding: u32,
    /// Regions with a smaller area in square pixels are noise.
    pub min_area: u64,
    /// Regions with fewer non-whitespace characters are noise.
    pub min_text_chars: usize,
}

impl Default for RegionConfig {
    fn default() -> Self {
        RegionConfig {
            merge_threshold: 15,
            padding: 20,
            min_area: 400,
            min_text_chars: 2,
        }
    }
}

/// The on-disk configuration file: a JSON object with optional
/// `carve` and `regions` sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub carve: CarveConfig,
    pub regions: RegionConfig,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let settings = Settings::from_json(r#"{"regions": {"padding": 4}}"#).unwrap();
        assert_eq!(settings.carve, CarveConfig::default());
        assert_eq!(settings.regions.padding, 4);
        assert_eq!(settings.regions.merge_threshold, 15);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Settings::from_json("{carve").is_err());
    }
}
