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

use std::fs::File;
use std::fs::OpenOptions;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::card::Flashcard;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::parser::parse_cards;
use crate::types::clock::SessionClock;

/// One deck file: the open handle, the raw content buffer, and the parsed
/// cards whose bodies are byte ranges into that buffer. The handle is held
/// read-write for the life of the process; nothing locks the file, so two
/// concurrent runs against the same deck are unsynchronized.
pub struct Deck {
    path: PathBuf,
    file: File,
    buf: Vec<u8>,
    pub cards: Vec<Flashcard>,
}

impl Deck {
    /// Open a deck read-write and parse it. Any failure to open or read is
    /// fatal for the whole run.
    pub fn load(path: &Path, clock: &SessionClock) -> Fallible<Deck> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| ErrorReport::for_path(path, e))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .map_err(|e| ErrorReport::for_path(path, e))?;
        // The last entry is delimited by a trailing newline, which the
        // source file may lack. Synthesize one in memory; it reaches disk
        // at serialization time.
        if buf.last().is_some_and(|&b| b != b'\n') {
            buf.push(b'\n');
        }
        let cards = parse_cards(&buf, clock.now_ts());
        log::debug!("{}: {} cards", path.display(), cards.len());
        Ok(Deck {
            path: path.to_path_buf(),
            file,
            buf,
            cards,
        })
    }

    pub fn body(&self, card: usize) -> &[u8] {
        &self.buf[self.cards[card].body.clone()]
    }

    /// Write every card back in parse order: canonical header line, then
    /// the body bytes verbatim. The ease factor is written as its raw
    /// fixed-point integer.
    ///
    /// Serialization is best-effort: a failed write for one card is
    /// reported and the rest of the deck is still attempted.
    pub fn write(&mut self) {
        if let Err(e) = self.file.seek(SeekFrom::Start(0)) {
            eprintln!("{}: {e}", self.path.display());
            return;
        }
        for card in &self.cards {
            let header = format!("%{}%{}%{}\n", card.ease.raw(), card.interval, card.due_ts);
            let body = &self.buf[card.body.clone()];
            let result = self
                .file
                .write_all(header.as_bytes())
                .and_then(|_| self.file.write_all(body));
            if let Err(e) = result {
                eprintln!("{}: {e}", self.path.display());
            }
        }
        // Drop whatever tail is left over from the previous contents.
        let truncated = self
            .file
            .stream_position()
            .and_then(|pos| self.file.set_len(pos));
        if let Err(e) = truncated {
            eprintln!("{}: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::read;
    use std::fs::write;

    use chrono::Local;
    use chrono::TimeZone;
    use tempfile::tempdir;

    use super::*;

    fn make_clock() -> SessionClock {
        SessionClock::at(Local.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let clock = make_clock();
        let result = Deck::load(Path::new("./no-such-deck"), &clock);
        assert!(result.is_err());
        let message = result.err().unwrap().to_string();
        assert!(message.contains("no-such-deck"));
    }

    #[test]
    fn test_unreviewed_round_trip_is_byte_identical() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("deck");
        let content = b"%10240%6%1700000000\nfoo\nbar\n%5324%1%1700086400\nbaz\n";
        write(&path, content)?;

        let clock = make_clock();
        let mut deck = Deck::load(&path, &clock)?;
        deck.write();

        assert_eq!(read(&path)?, content);
        Ok(())
    }

    #[test]
    fn test_headerless_entry_gains_canonical_header() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("deck");
        // No header, no trailing newline.
        write(&path, b"plain body")?;

        let clock = make_clock();
        let mut deck = Deck::load(&path, &clock)?;
        deck.write();

        let expected = format!("%10240%0%{}\nplain body\n", clock.now_ts());
        assert_eq!(read(&path)?, expected.as_bytes());
        Ok(())
    }

    #[test]
    fn test_write_truncates_stale_tail() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("deck");
        // A malformed header line longer than its canonical replacement.
        write(&path, b"%10240%6%999999999999999999999x\nbody\n")?;

        let clock = make_clock();
        let mut deck = Deck::load(&path, &clock)?;
        deck.cards[0].due_ts = 1;
        deck.cards[0].ease = crate::types::ease::EaseFactor::from_raw(1);
        deck.write();

        assert_eq!(read(&path)?, b"%1%0%1\nbody\n");
        Ok(())
    }

    #[test]
    fn test_empty_file_round_trips_empty() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("deck");
        write(&path, b"")?;

        let clock = make_clock();
        let mut deck = Deck::load(&path, &clock)?;
        assert!(deck.cards.is_empty());
        deck.write();
        assert_eq!(read(&path)?, b"");
        Ok(())
    }
}
