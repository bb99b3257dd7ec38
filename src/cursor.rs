use crate::reader::Reader;

/// A source position: 1-based line, 0-based column.
///
/// The column counts consumed *bytes*, not Unicode scalar values or grapheme clusters, matching
/// the byte-oriented state machine in [`crate::machine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 0-based column number.
    pub column: usize,
}

/// Input cursor: advances a [`Reader`] one byte at a time, tracks source position, and supports
/// reconsuming the last byte exactly once.
///
/// This type does not itself know about HTML; it is the `~10%` of the tokenizer described in the
/// system overview, shared by every state in [`crate::machine`].
pub(crate) struct Cursor<R: Reader> {
    reader: R,
    last: Option<u8>,
    reconsume: bool,
    eof_hit: bool,
    line: usize,
    column: usize,
}

impl<R: Reader> Cursor<R> {
    pub(crate) fn new(reader: R) -> Self {
        Cursor {
            reader,
            last: None,
            reconsume: false,
            eof_hit: false,
            line: 1,
            column: 0,
        }
    }

    /// The position at which the next byte would be reported.
    pub(crate) fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    /// Read and consume the next byte. Honors a pending reconsume.
    pub(crate) fn next(&mut self) -> Result<Option<u8>, R::Error> {
        if self.reconsume {
            self.reconsume = false;
            return Ok(self.last);
        }

        let byte = self.reader.read_byte()?;
        self.last = byte;

        match byte {
            Some(b'\n') => {
                self.line += 1;
                self.column = 0;
            }
            Some(_) => self.column += 1,
            None => self.eof_hit = true,
        }

        Ok(byte)
    }

    /// The last byte returned by [`Cursor::next`].
    pub(crate) fn current(&self) -> Option<u8> {
        self.last
    }

    /// The byte [`Cursor::next`] would return, without consuming it.
    pub(crate) fn peek(&self) -> Option<u8> {
        if self.reconsume {
            self.last
        } else {
            self.reader.peek_n(1).first().copied()
        }
    }

    /// Up to `n` bytes starting at the next position, truncated at end of source.
    ///
    /// Must not be called while a reconsume is pending; every call site in [`crate::machine`]
    /// only peeks ahead right after consuming real input.
    pub(crate) fn peek_n(&self, n: usize) -> &[u8] {
        debug_assert!(
            !self.reconsume,
            "peek_n must not be called with a pending reconsume"
        );
        self.reader.peek_n(n)
    }

    /// Mark the last-returned byte to be returned again by the next call to [`Cursor::next`].
    pub(crate) fn reconsume(&mut self) {
        self.reconsume = true;
    }

    /// True once [`Cursor::next`] has returned `Ok(None)` at least once.
    pub(crate) fn eof(&self) -> bool {
        self.eof_hit
    }

    /// Attempt to consume the ASCII literal `s` from the input, case (in)sensitively.
    ///
    /// On success the matched bytes are consumed and `true` is returned; on failure nothing is
    /// consumed.
    pub(crate) fn try_read_string(
        &mut self,
        s: &str,
        case_sensitive: bool,
    ) -> Result<bool, R::Error> {
        debug_assert!(!s.is_empty());
        debug_assert!(!self.reconsume);

        let needle = s.as_bytes();
        let candidate = self.reader.peek_n(needle.len());
        if candidate.len() != needle.len() {
            return Ok(false);
        }

        let matched = if case_sensitive {
            candidate == needle
        } else {
            candidate.eq_ignore_ascii_case(needle)
        };

        if matched {
            for _ in 0..needle.len() {
                self.next()?;
            }
        }

        Ok(matched)
    }

    /// Having just read `first` via [`Cursor::next`], decode the full Unicode scalar value that
    /// begins with it, reading any UTF-8 continuation bytes directly off the cursor.
    ///
    /// ASCII never reaches this path from the state machine (every ASCII byte is a discriminator
    /// handled inline); this exists for the "anything else" arms of the textual states, which
    /// must pass non-ASCII input through as a single `Character` token (see §4.1).
    pub(crate) fn decode_scalar(&mut self, first: u8) -> Result<char, R::Error> {
        if first < 0x80 {
            return Ok(first as char);
        }

        let len = utf8_sequence_len(first);
        let mut buf = [0_u8; 4];
        buf[0] = first;
        for slot in buf.iter_mut().take(len).skip(1) {
            *slot = self.next()?.unwrap_or(0);
        }

        Ok(std::str::from_utf8(&buf[..len])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or('\u{FFFD}'))
    }
}

fn utf8_sequence_len(first_byte: u8) -> usize {
    if first_byte & 0b1110_0000 == 0b1100_0000 {
        2
    } else if first_byte & 0b1111_0000 == 0b1110_0000 {
        3
    } else if first_byte & 0b1111_1000 == 0b1111_0000 {
        4
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{Readable, StringReader};

    fn cursor_for(s: &str) -> Cursor<StringReader<'_>> {
        Cursor::new(s.to_reader())
    }

    #[test]
    fn reconsume_replays_last_byte() {
        let mut c = cursor_for("ab");
        assert_eq!(c.next().unwrap(), Some(b'a'));
        c.reconsume();
        assert_eq!(c.next().unwrap(), Some(b'a'));
        assert_eq!(c.next().unwrap(), Some(b'b'));
        assert_eq!(c.next().unwrap(), None);
    }

    #[test]
    fn reconsume_at_eof_is_idempotent() {
        let mut c = cursor_for("a");
        assert_eq!(c.next().unwrap(), Some(b'a'));
        assert_eq!(c.next().unwrap(), None);
        assert!(c.eof());
        c.reconsume();
        assert_eq!(c.next().unwrap(), None);
        assert!(c.eof());
    }

    #[test]
    fn line_and_column_track_newlines() {
        let mut c = cursor_for("ab\ncd");
        assert_eq!(c.position(), Position { line: 1, column: 0 });
        c.next().unwrap();
        assert_eq!(c.position(), Position { line: 1, column: 1 });
        c.next().unwrap();
        assert_eq!(c.position(), Position { line: 1, column: 2 });
        c.next().unwrap(); // consumes '\n'
        assert_eq!(c.position(), Position { line: 2, column: 0 });
        c.next().unwrap();
        assert_eq!(c.position(), Position { line: 2, column: 1 });
    }

    #[test]
    fn peek_n_truncates_at_end_of_source() {
        let c = cursor_for("hi");
        assert_eq!(c.peek_n(5), b"hi");
    }

    #[test]
    fn try_read_string_is_all_or_nothing() {
        let mut c = cursor_for("DOCTYPE html");
        assert!(!c.try_read_string("doctypeX", false).unwrap());
        // failing match must not consume anything
        assert!(c.try_read_string("doctype", false).unwrap());
        assert_eq!(c.next().unwrap(), Some(b' '));
    }

    #[test]
    fn decode_scalar_handles_multibyte_utf8() {
        let mut c = cursor_for("é");
        let first = c.next().unwrap().unwrap();
        assert_eq!(c.decode_scalar(first).unwrap(), 'é');
    }
}
