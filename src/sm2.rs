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

//! An SM-2 variant with a same-session "learn until correct" loop on top.
//!
//! The long-term schedule (ease factor, interval, due date) moves at most
//! once per run, on the first grading of a card. Later gradings of the same
//! card within the run drill it again without touching the ease factor, so
//! repeated same-day failures cannot corrupt the long-term state.

use crate::card::Flashcard;
use crate::types::clock::SessionClock;

/// A recall quality score in [0, 5].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Score(u8);

impl Score {
    /// Map a key byte to a score. Backtick doubles as zero, since it sits
    /// next to the digit keys.
    pub fn from_key(byte: u8) -> Option<Score> {
        match byte {
            b'`' => Some(Score(0)),
            b'0'..=b'5' => Some(Score(byte - b'0')),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Scores below 4 send the card into the next pass of the session.
    pub fn needs_repeat(self) -> bool {
        self.0 < 4
    }

    /// Scores below 3 reset the card's interval.
    fn is_failing(self) -> bool {
        self.0 < 3
    }
}

/// Whether a card is a candidate for today's session.
pub fn is_due(card: &Flashcard, clock: &SessionClock) -> bool {
    clock.day_of(card.due_ts) <= clock.today()
}

/// Push a new card past today's cap to tomorrow. It stays new.
pub fn defer_to_tomorrow(card: &mut Flashcard, clock: &SessionClock) {
    card.due_ts = clock.ts_after_days(1);
}

/// Apply one review outcome to a card.
///
/// `first_grading` is true during the first pass of the run. On a repeat
/// grading the ease factor is left alone, and a successful answer on an
/// already-scheduled card changes nothing: its schedule was extended when it
/// was first graded this run.
pub fn apply_review(card: &mut Flashcard, score: Score, first_grading: bool, clock: &SessionClock) {
    // The interval stretch uses the ease factor as it was before this
    // review's adjustment.
    let stretched = card.ease.stretch(card.interval);
    if first_grading {
        card.ease = card.ease.adjusted(score.value());
    }
    if score.is_failing() || card.interval == 0 {
        card.interval = 1;
    } else if first_grading {
        card.interval = if card.interval == 1 { 6 } else { stretched };
    } else {
        return;
    }
    card.due_ts = clock.ts_after_days(card.interval);
}
