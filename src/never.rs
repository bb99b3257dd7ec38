//! An uninhabited error type for sources that cannot fail.

/// A value of this type can never be constructed.
///
/// In-memory readers like [`crate::reader::StringReader`] use this as their
/// [`crate::reader::Reader::Error`], so that [`crate::Tokenizer::next_token`]'s `Result` is
/// statically known to always be `Ok` for them. [`crate::Tokenizer::infallible`] uses that fact
/// to offer a plain iterator instead of one yielding `Result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Never {}

impl std::fmt::Display for Never {
    fn fmt(&self, _f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {}
    }
}

impl std::error::Error for Never {}
