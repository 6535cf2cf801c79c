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

use std::ops::Range;

use crate::types::ease::EaseFactor;

/// A single flashcard with its scheduling state. The body is not stored
/// here: it is a byte range into the owning deck's buffer, which outlives
/// every card parsed from it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Flashcard {
    pub ease: EaseFactor,
    /// Days between reviews. 0 means the card has never been successfully
    /// reviewed.
    pub interval: u32,
    /// Unix timestamp of the next scheduled review.
    pub due_ts: i64,
    /// Byte range of the card body within the owning deck's buffer.
    pub body: Range<usize>,
}

impl Flashcard {
    /// A card with default scheduling state, due at `due_ts`. Used for
    /// entries whose header is missing or malformed.
    pub fn fresh(due_ts: i64, body: Range<usize>) -> Self {
        Flashcard {
            ease: EaseFactor::default(),
            interval: 0,
            due_ts,
            body,
        }
    }

    pub fn is_new(&self) -> bool {
        self.interval == 0
    }
}
