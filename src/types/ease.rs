// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;

/// Scale of the fixed-point representation: one unit is 1/4096.
pub const UNIT: u32 = 4096;

/// 2.5 in fixed point, the SM-2 starting ease.
const DEFAULT_RAW: u32 = 10240;

/// 1.3 in fixed point, the SM-2 floor.
const MIN_RAW: u32 = 5324;

/// An SM-2 ease factor. Stored as a fixed-point integer so that load/save
/// cycles never drift; the raw integer is what goes into the deck file.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct EaseFactor(u32);

impl EaseFactor {
    pub fn from_raw(raw: u32) -> Self {
        EaseFactor(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    /// Apply the SM-2 ease adjustment for a quality score in [0, 5] and
    /// clamp to the 1.3 floor.
    pub fn adjusted(self, score: u8) -> Self {
        let q = (5 - score) as f32;
        let delta = (0.1 - q * (0.08 + 0.02 * q)) * UNIT as f32;
        let raw = (self.0 as f32 + delta).max(0.0) as u32;
        EaseFactor(raw.max(MIN_RAW))
    }

    /// Multiply an interval in days by the ease factor, rounding up and
    /// saturating at `u32::MAX`.
    pub fn stretch(self, interval: u32) -> u32 {
        let unit = UNIT as u64;
        let stretched = (interval as u64 * self.0 as u64 + (unit - 1)) / unit;
        u32::try_from(stretched).unwrap_or(u32::MAX)
    }
}

impl Default for EaseFactor {
    fn default() -> Self {
        EaseFactor(DEFAULT_RAW)
    }
}

impl Display for EaseFactor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
