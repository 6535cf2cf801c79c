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

use std::path::PathBuf;

use clap::Parser;

use crate::deck::Deck;
use crate::error::Fallible;
use crate::input::TerminalInput;
use crate::session::Outcome;
use crate::session::Session;
use crate::types::clock::SessionClock;

/// Review due flashcards from plain text decks.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Paths to the deck files to review.
    #[arg(required = true)]
    decks: Vec<PathBuf>,
    /// Maximum number of new cards to introduce per run, across all decks.
    #[arg(long, default_value_t = 8)]
    new_card_limit: usize,
}

pub fn entrypoint() -> Fallible<()> {
    let cli = Cli::parse();
    let clock = SessionClock::start();

    // Loading is all-or-nothing: a deck that cannot be opened or read
    // aborts the run before anything is reviewed or written.
    let mut decks = Vec::new();
    for path in &cli.decks {
        decks.push(Deck::load(path, &clock)?);
    }

    let outcome = Session::new(&mut decks, &clock, TerminalInput, std::io::stdout())
        .run(cli.new_card_limit)?;
    match outcome {
        Outcome::NothingDue => println!("No flashcards due for review"),
        Outcome::Finished { passes } => log::debug!("session finished after {passes} passes"),
    }

    // Decks are written even when nothing was reviewed: new cards past the
    // daily cap had their due dates pushed to tomorrow, and entries with
    // missing or malformed headers now carry defaults.
    for deck in &mut decks {
        deck.write();
    }
    Ok(())
}
