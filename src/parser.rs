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

use crate::card::Flashcard;
use crate::types::ease::EaseFactor;

/// Parse a deck buffer into cards.
///
/// The buffer is a sequence of entries. An entry optionally starts with a
/// header line `%<ease>%<interval>%<unix_ts>\n` of unsigned decimal fields.
/// The body is everything up to the next entry, which begins at a `%` that
/// immediately follows a newline. A missing or malformed header is not an
/// error: the card gets default state and is due at `default_due`.
///
/// The caller must normalize the buffer to end with a newline (see
/// `Deck::load`), otherwise the last entry is not delimited.
pub fn parse_cards(buf: &[u8], default_due: i64) -> Vec<Flashcard> {
    let mut cards = Vec::new();
    let mut pos = 0;
    while pos < buf.len() {
        let (header, body_start) = parse_header(buf, pos);
        let mut end = body_start;
        while end < buf.len() && !(end > 0 && buf[end - 1] == b'\n' && buf[end] == b'%') {
            end += 1;
        }
        let card = match header {
            Some(header) => Flashcard {
                ease: EaseFactor::from_raw(header.ease),
                interval: header.interval,
                due_ts: header.due_ts,
                body: body_start..end,
            },
            None => Flashcard::fresh(default_due, body_start..end),
        };
        cards.push(card);
        pos = end;
    }
    cards
}

struct Header {
    ease: u32,
    interval: u32,
    due_ts: i64,
}

/// Try to parse a header line starting at `pos`. Returns the parsed fields
/// (or `None` if the line deviates from the format in any way) and the
/// offset of the first body byte. A malformed header line is still skipped
/// in full, so parsing resynchronizes at the next entry boundary.
fn parse_header(buf: &[u8], pos: usize) -> (Option<Header>, usize) {
    if buf.get(pos) != Some(&b'%') {
        return (None, pos);
    }
    let mut cur = pos + 1;
    let ease = parse_uint(buf, &mut cur) as u32;
    if buf.get(cur) != Some(&b'%') {
        return (None, skip_line(buf, cur));
    }
    cur += 1;
    let interval = parse_uint(buf, &mut cur) as u32;
    if buf.get(cur) != Some(&b'%') {
        return (None, skip_line(buf, cur));
    }
    cur += 1;
    let due_ts = parse_uint(buf, &mut cur) as i64;
    if buf.get(cur) != Some(&b'\n') {
        return (None, skip_line(buf, cur));
    }
    let header = Header {
        ease,
        interval,
        due_ts,
    };
    (Some(header), cur + 1)
}

/// Consume a run of decimal digits. An empty run parses as zero.
fn parse_uint(buf: &[u8], cur: &mut usize) -> u64 {
    let mut n: u64 = 0;
    while let Some(digit) = buf.get(*cur).filter(|b| b.is_ascii_digit()) {
        n = n.wrapping_mul(10).wrapping_add((digit - b'0') as u64);
        *cur += 1;
    }
    n
}

/// The offset just past the next newline.
fn skip_line(buf: &[u8], mut cur: usize) -> usize {
    while cur < buf.len() && buf[cur] != b'\n' {
        cur += 1;
    }
    (cur + 1).min(buf.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_DUE: i64 = 1700000000;

    fn body_of<'a>(buf: &'a [u8], card: &Flashcard) -> &'a [u8] {
        &buf[card.body.clone()]
    }

    #[test]
    fn test_empty_buffer() {
        assert_eq!(parse_cards(b"", DEFAULT_DUE).len(), 0);
    }

    #[test]
    fn test_well_formed_header() {
        let buf = b"%10240%6%1700000000\nfoo\nbar\n";
        let cards = parse_cards(buf, 0);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].ease.raw(), 10240);
        assert_eq!(cards[0].interval, 6);
        assert_eq!(cards[0].due_ts, 1700000000);
        assert_eq!(body_of(buf, &cards[0]), b"foo\nbar\n");
    }

    #[test]
    fn test_two_entries() {
        let buf = b"%1%2%3\nalpha\n%4%5%6\nbeta\n";
        let cards = parse_cards(buf, DEFAULT_DUE);
        assert_eq!(cards.len(), 2);
        assert_eq!(body_of(buf, &cards[0]), b"alpha\n");
        assert_eq!(cards[0].due_ts, 3);
        assert_eq!(body_of(buf, &cards[1]), b"beta\n");
        assert_eq!(cards[1].ease.raw(), 4);
    }

    #[test]
    fn test_headerless_entry_gets_defaults() {
        let buf = b"just a body\n";
        let cards = parse_cards(buf, DEFAULT_DUE);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].ease, EaseFactor::default());
        assert_eq!(cards[0].interval, 0);
        assert_eq!(cards[0].due_ts, DEFAULT_DUE);
        assert_eq!(body_of(buf, &cards[0]), b"just a body\n");
    }

    #[test]
    fn test_malformed_third_field_is_discarded() {
        let buf = b"%10240%6%abc\nbody\n%1%2%3\nnext\n";
        let cards = parse_cards(buf, DEFAULT_DUE);
        assert_eq!(cards.len(), 2);
        // The whole header is discarded, not just the bad field.
        assert_eq!(cards[0].ease, EaseFactor::default());
        assert_eq!(cards[0].interval, 0);
        assert_eq!(cards[0].due_ts, DEFAULT_DUE);
        assert_eq!(body_of(buf, &cards[0]), b"body\n");
        // Parsing resumed at the following entry boundary.
        assert_eq!(cards[1].interval, 2);
        assert_eq!(body_of(buf, &cards[1]), b"next\n");
    }

    #[test]
    fn test_header_missing_fields_is_discarded() {
        let buf = b"%10240\nbody\n";
        let cards = parse_cards(buf, DEFAULT_DUE);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].ease, EaseFactor::default());
        assert_eq!(body_of(buf, &cards[0]), b"body\n");
    }

    #[test]
    fn test_empty_numeric_field_parses_as_zero() {
        let buf = b"%%2%3\nbody\n";
        let cards = parse_cards(buf, DEFAULT_DUE);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].ease.raw(), 0);
        assert_eq!(cards[0].interval, 2);
    }

    #[test]
    fn test_empty_body() {
        let buf = b"%1%2%3\n%4%5%6\nx\n";
        let cards = parse_cards(buf, DEFAULT_DUE);
        assert_eq!(cards.len(), 2);
        assert_eq!(body_of(buf, &cards[0]), b"");
        assert_eq!(body_of(buf, &cards[1]), b"x\n");
    }

    #[test]
    fn test_percent_mid_line_is_not_a_boundary() {
        let buf = b"%1%2%3\na%b\nc\n";
        let cards = parse_cards(buf, DEFAULT_DUE);
        assert_eq!(cards.len(), 1);
        assert_eq!(body_of(buf, &cards[0]), b"a%b\nc\n");
    }

    #[test]
    fn test_headerless_first_entry_followed_by_header() {
        let buf = b"plain\n%1%2%3\nscheduled\n";
        let cards = parse_cards(buf, DEFAULT_DUE);
        assert_eq!(cards.len(), 2);
        assert_eq!(body_of(buf, &cards[0]), b"plain\n");
        assert_eq!(cards[0].interval, 0);
        assert_eq!(cards[1].interval, 2);
    }
}
