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

use crate::error::Fallible;
use crate::input::ByteInput;

/// Emit a card body byte by byte.
///
/// `\` escapes the following byte, emitting it literally. An unescaped `|`
/// is a reveal marker: it emits nothing, and output pauses until the input
/// device produces a space, after which scanning resumes past the marker.
/// Every other byte is emitted as-is.
pub fn render_body(body: &[u8], out: &mut impl Write, input: &mut impl ByteInput) -> Fallible<()> {
    let mut i = 0;
    while i < body.len() {
        match body[i] {
            b'|' => {
                out.flush()?;
                while input.read_byte()? != b' ' {}
            }
            b'\\' => {
                i += 1;
                if let Some(&escaped) = body.get(i) {
                    out.write_all(&[escaped])?;
                }
            }
            byte => out.write_all(&[byte])?,
        }
        i += 1;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScriptedInput;

    fn render(body: &[u8], feed: &[u8]) -> Fallible<Vec<u8>> {
        let mut out = Vec::new();
        let mut input = ScriptedInput::new(feed);
        render_body(body, &mut out, &mut input)?;
        Ok(out)
    }

    #[test]
    fn test_plain_passthrough() -> Fallible<()> {
        assert_eq!(render(b"hello\nworld\n", b"")?, b"hello\nworld\n");
        Ok(())
    }

    #[test]
    fn test_escapes_and_marker() -> Fallible<()> {
        // An escaped pipe is literal, a bare pipe blocks until space, and
        // an escaped backslash emits one backslash.
        assert_eq!(render(br"a\|b|c\\d", b" ")?, br"a|bc\d");
        Ok(())
    }

    #[test]
    fn test_marker_swallows_non_space_bytes() -> Fallible<()> {
        assert_eq!(render(b"q|a", b"zzz ")?, b"qa");
        Ok(())
    }

    #[test]
    fn test_multiple_markers() -> Fallible<()> {
        assert_eq!(render(b"a|b|c", b"  ")?, b"abc");
        Ok(())
    }

    #[test]
    fn test_trailing_backslash() -> Fallible<()> {
        assert_eq!(render(b"ab\\", b"")?, b"ab");
        Ok(())
    }

    #[test]
    fn test_marker_without_input_is_an_error() {
        assert!(render(b"a|b", b"").is_err());
    }
}
