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

use std::io::Write;

use crate::deck::Deck;
use crate::error::Fallible;
use crate::input::ByteInput;
use crate::render::render_body;
use crate::rng::TinyRng;
use crate::rng::shuffle;
use crate::sm2;
use crate::sm2::Score;
use crate::types::clock::SessionClock;

/// Position of a card within the deck collection. Due-lists hold these
/// instead of references, so they never borrow from the decks they index.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CardRef {
    pub deck: usize,
    pub card: usize,
}

/// How a run ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    /// The first due-list was already empty.
    NothingDue,
    /// Every card eventually scored 4 or better.
    Finished { passes: u32 },
}

/// Select today's due cards across all decks, in parse order.
///
/// New cards (interval 0) are admitted up to `new_card_limit` across all
/// decks combined; new candidates past the cap are pushed to tomorrow and
/// left out of the session. Previously reviewed cards are never capped.
pub fn collect_due(decks: &mut [Deck], clock: &SessionClock, new_card_limit: usize) -> Vec<CardRef> {
    let mut due = Vec::new();
    let mut new_cards = 0;
    for (deck_idx, deck) in decks.iter_mut().enumerate() {
        for (card_idx, card) in deck.cards.iter_mut().enumerate() {
            if !sm2::is_due(card, clock) {
                continue;
            }
            if card.is_new() {
                if new_cards == new_card_limit {
                    sm2::defer_to_tomorrow(card, clock);
                    continue;
                }
                new_cards += 1;
            }
            due.push(CardRef {
                deck: deck_idx,
                card: card_idx,
            });
        }
    }
    due
}

/// Drives one interactive run: select, shuffle, present, grade, and repeat
/// every card that scored below 4 until a pass comes back clean.
pub struct Session<'a, I, W> {
    decks: &'a mut [Deck],
    clock: &'a SessionClock,
    input: I,
    out: W,
    rng: TinyRng,
}

impl<'a, I: ByteInput, W: Write> Session<'a, I, W> {
    pub fn new(decks: &'a mut [Deck], clock: &'a SessionClock, input: I, out: W) -> Self {
        Session {
            decks,
            clock,
            input,
            out,
            rng: TinyRng::from_seed(clock.seed()),
        }
    }

    pub fn run(&mut self, new_card_limit: usize) -> Fallible<Outcome> {
        let mut due = collect_due(self.decks, self.clock, new_card_limit);
        if due.is_empty() {
            return Ok(Outcome::NothingDue);
        }
        log::debug!("{} cards due", due.len());

        let mut passes = 0;
        let mut first_grading = true;
        while !due.is_empty() {
            shuffle(&mut due, &mut self.rng);
            self.clear_screen()?;

            let mut next_pass = Vec::new();
            for card_ref in due {
                if self.review_card(card_ref, first_grading)? {
                    next_pass.push(card_ref);
                }
            }

            passes += 1;
            log::debug!("pass {passes}: {} cards to repeat", next_pass.len());
            first_grading = false;
            due = next_pass;
        }
        Ok(Outcome::Finished { passes })
    }

    /// Present one card and apply its review outcome. Returns whether the
    /// card goes into the next pass.
    fn review_card(&mut self, card_ref: CardRef, first_grading: bool) -> Fallible<bool> {
        let deck = &self.decks[card_ref.deck];
        render_body(deck.body(card_ref.card), &mut self.out, &mut self.input)?;
        let score = self.read_score()?;
        let card = &mut self.decks[card_ref.deck].cards[card_ref.card];
        sm2::apply_review(card, score, first_grading, self.clock);
        Ok(score.needs_repeat())
    }

    /// Prompt for a score and wait for a valid score key. Anything else is
    /// swallowed without re-prompting. The accepted score is echoed back.
    fn read_score(&mut self) -> Fallible<Score> {
        write!(self.out, "\x1b[1mScore: \x1b[0m")?;
        self.out.flush()?;
        let score = loop {
            if let Some(score) = Score::from_key(self.input.read_byte()?) {
                break score;
            }
        };
        writeln!(self.out, "\x1b[1m{}\x1b[0m", score.value())?;
        Ok(score)
    }

    fn clear_screen(&mut self) -> Fallible<()> {
        write!(self.out, "\x1b[1;1H\x1b[2J")?;
        Ok(())
    }
}
