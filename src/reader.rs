use crate::never::Never;

/// A source of raw bytes for the tokenizer.
///
/// The state machine is defined over bytes: every discriminator it branches on (ASCII letters,
/// digits, punctuation, `U+0000`) fits in a single byte, and non-ASCII bytes are passed through
/// into character tokens unchanged (see [`crate::cursor::Cursor`]). Implement this trait to feed
/// the tokenizer from something other than a resident string, e.g. a streaming `io::Read`-backed
/// adapter that can fail partway through.
pub trait Reader {
    /// The I/O failure type this reader can surface. Use [`Never`] for sources that can't fail.
    type Error: std::fmt::Debug;

    /// Return the next byte, advancing the reader by one byte. Returns `Ok(None)` once exhausted.
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Return up to `n` bytes starting at the current position, without consuming them.
    ///
    /// The returned slice is truncated if fewer than `n` bytes remain. Peeking never fails: a
    /// reader that needs to do fallible I/O to look ahead should do so eagerly and buffer it.
    fn peek_n(&self, n: usize) -> &[u8];
}

/// An object that can be converted into a [`Reader`].
///
/// This lets [`crate::Tokenizer::new`] accept `&str` or `&String` directly, the way the rest of
/// this crate's constructors do.
pub trait Readable<'a> {
    /// The reader type this value converts into.
    type Reader: Reader + 'a;

    /// Convert `self` into a [`Reader`].
    fn to_reader(self) -> Self::Reader;
}

/// A [`Reader`] over an in-memory UTF-8 string. Reading from it can never fail.
pub struct StringReader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> StringReader<'a> {
    fn new(input: &'a str) -> Self {
        StringReader {
            input: input.as_bytes(),
            pos: 0,
        }
    }
}

impl<'a> Reader for StringReader<'a> {
    type Error = Never;

    fn read_byte(&mut self) -> Result<Option<u8>, Never> {
        let b = match self.input.get(self.pos) {
            Some(&b) => b,
            None => return Ok(None),
        };
        self.pos += 1;
        Ok(Some(b))
    }

    fn peek_n(&self, n: usize) -> &[u8] {
        let end = (self.pos + n).min(self.input.len());
        &self.input[self.pos..end]
    }
}

impl<'a> Readable<'a> for &'a str {
    type Reader = StringReader<'a>;

    fn to_reader(self) -> Self::Reader {
        StringReader::new(self)
    }
}

impl<'a> Readable<'a> for &'a String {
    type Reader = StringReader<'a>;

    fn to_reader(self) -> Self::Reader {
        StringReader::new(self.as_str())
    }
}
