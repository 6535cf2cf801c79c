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

use std::time::Duration;

use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::poll;
use crossterm::event::read;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;

use crate::error::Fallible;

/// The one capability the review loop needs from the outside world: read a
/// single byte from the interactive input device, blocking until one is
/// available.
pub trait ByteInput {
    fn read_byte(&mut self) -> Fallible<u8>;
}

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Reads single keypresses from the terminal. Raw mode is enabled only for
/// the duration of each read and restored immediately after, so regular
/// output happens in cooked mode.
pub struct TerminalInput;

impl ByteInput for TerminalInput {
    fn read_byte(&mut self) -> Fallible<u8> {
        enable_raw_mode()?;
        let result = read_key();
        let restored = disable_raw_mode();
        let byte = result?;
        restored?;
        Ok(byte)
    }
}

fn read_key() -> Fallible<u8> {
    loop {
        if !poll(POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            {
                continue;
            }
            match key.code {
                KeyCode::Char(c) if c.is_ascii() => return Ok(c as u8),
                KeyCode::Enter => return Ok(b'\n'),
                KeyCode::Tab => return Ok(b'\t'),
                _ => {}
            }
        }
    }
}

/// A canned byte feed for driving the review loop in tests.
#[cfg(test)]
pub struct ScriptedInput {
    bytes: std::collections::VecDeque<u8>,
}

#[cfg(test)]
impl ScriptedInput {
    pub fn new(bytes: &[u8]) -> Self {
        ScriptedInput {
            bytes: bytes.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
impl ByteInput for ScriptedInput {
    fn read_byte(&mut self) -> Fallible<u8> {
        match self.bytes.pop_front() {
            Some(byte) => Ok(byte),
            None => Err(crate::error::ErrorReport::new("scripted input exhausted")),
        }
    }
}
