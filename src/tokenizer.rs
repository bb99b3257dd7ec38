use std::collections::VecDeque;

use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::reader::{Readable, Reader};
use crate::state::Internal;
#[cfg(feature = "integration-tests")]
use crate::state::State;
use crate::token::TokenBuilder;
use crate::token::Token;

/// A streaming HTML5 tokenizer.
///
/// Construct one with [`Tokenizer::new`], drive it by calling [`Tokenizer::next_token`]
/// repeatedly, and drain [`Tokenizer::take_error`] between calls for conformance-grade parse
/// error reporting. A full tree constructor drives state transitions itself (via the
/// `integration-tests`-gated `set_state`/`set_last_start_tag`); callers without one can instead
/// opt into [`Tokenizer::switch_states`] for a best-effort approximation.
pub struct Tokenizer<R: Reader> {
    pub(crate) cursor: Cursor<R>,
    pub(crate) state: Internal,
    pub(crate) return_state: Internal,
    pub(crate) builder: TokenBuilder,
    pub(crate) temp_buffer: String,
    pub(crate) char_ref_code: u32,
    pub(crate) errors: VecDeque<ParseError>,
    pub(crate) tokens: VecDeque<Token>,
    pub(crate) emitted_eof: bool,
    pub(crate) auto_switch_states: bool,
}

impl<'a, R: Readable<'a>> Tokenizer<R::Reader> {
    /// Build a tokenizer over an in-memory `&str`/`&String`.
    #[must_use]
    pub fn new(input: R) -> Self {
        Tokenizer::from_reader(input.to_reader())
    }
}

impl<R: Reader> Tokenizer<R> {
    /// Build a tokenizer directly from a [`Reader`], for sources other than a resident string.
    #[must_use]
    pub fn from_reader(reader: R) -> Self {
        Tokenizer {
            cursor: Cursor::new(reader),
            state: Internal::Data,
            return_state: Internal::Data,
            builder: TokenBuilder::new(),
            temp_buffer: String::new(),
            char_ref_code: 0,
            errors: VecDeque::new(),
            tokens: VecDeque::new(),
            emitted_eof: false,
            auto_switch_states: false,
        }
    }

    /// Opt into automatically switching state after every start tag using
    /// [`crate::naive_next_state`], for callers that don't want to hand-write a full tree
    /// constructor just to get `<script>`/`<textarea>`/`<style>` content tokenized correctly.
    ///
    /// Off by default. This is an approximation, documented on [`crate::naive_next_state`]
    /// itself; callers implementing real tree construction should leave this off and drive state
    /// transitions themselves via the `integration-tests`-gated `set_state`.
    pub fn switch_states(&mut self, yes: bool) {
        self.auto_switch_states = yes;
    }

    /// Switch the tokenizer's start state, as a tree constructor does before consuming the
    /// content of `<script>`, `<textarea>`, `<style>` and similar elements.
    ///
    /// Only available with the `integration-tests` feature, which is not public API: it exists
    /// so the html5lib-tests harness under `tests/` can drive the tokenizer into states a real
    /// tree constructor would reach through tag names this crate never sees directly.
    #[cfg(feature = "integration-tests")]
    pub fn set_state(&mut self, state: State) {
        self.state = state.into();
    }

    /// Overwrite the name used by the "appropriate end tag token" test.
    ///
    /// `next_token` already updates this automatically whenever a start tag is emitted; this is
    /// for callers driving fragment parsing, where the relevant context element never passes
    /// through this tokenizer as a literal start tag.
    ///
    /// Only available with the `integration-tests` feature, which is not public API.
    #[cfg(feature = "integration-tests")]
    pub fn set_last_start_tag(&mut self, name: Option<&str>) {
        self.builder.set_last_start_tag_name(name.map(String::from));
    }

    /// 1-based current line number.
    #[must_use]
    pub fn line(&self) -> usize {
        self.cursor.position().line
    }

    /// 0-based current column number.
    #[must_use]
    pub fn column(&self) -> usize {
        self.cursor.position().column
    }

    /// Advance the state machine until a token is ready and return it.
    ///
    /// Parse errors detected while producing that token are queued, not returned here: call
    /// [`Tokenizer::take_error`] in a loop right after this call to drain every error that was
    /// emitted during the step that produced the token it just returned. Once the end-of-file
    /// token has been produced, every subsequent call returns it again.
    pub fn next_token(&mut self) -> Result<Token, R::Error> {
        loop {
            if let Some(token) = self.tokens.pop_front() {
                return Ok(token);
            }
            if self.emitted_eof {
                return Ok(Token::EndOfFile);
            }
            self.step()?;
        }
    }

    /// Pop the next queued parse error, if any.
    #[must_use]
    pub fn take_error(&mut self) -> Option<ParseError> {
        self.errors.pop_front()
    }
}

impl<'a, R: Readable<'a>> Tokenizer<R::Reader>
where
    R::Reader: Reader<Error = crate::never::Never>,
{
    /// Wrap this tokenizer so it can be driven as a plain iterator, for sources that cannot
    /// fail.
    #[must_use]
    pub fn infallible(self) -> InfallibleTokenizer<R::Reader> {
        InfallibleTokenizer { inner: self }
    }
}

/// An iterator adapter over [`Tokenizer::next_token`] for readers whose [`Reader::Error`] is
/// [`crate::never::Never`], so the fallible API can be driven without `?` noise.
pub struct InfallibleTokenizer<R: Reader<Error = crate::never::Never>> {
    inner: Tokenizer<R>,
}

impl<R: Reader<Error = crate::never::Never>> Iterator for InfallibleTokenizer<R> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        match self.inner.next_token() {
            Ok(token) => Some(token),
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_character_tokens_per_scalar_value() {
        let mut t = Tokenizer::new("ab");
        assert_eq!(t.next_token().unwrap(), Token::Character('a'));
        assert_eq!(t.next_token().unwrap(), Token::Character('b'));
        assert_eq!(t.next_token().unwrap(), Token::EndOfFile);
    }

    #[test]
    fn eof_token_repeats_on_further_calls() {
        let mut t = Tokenizer::new("");
        assert_eq!(t.next_token().unwrap(), Token::EndOfFile);
        assert_eq!(t.next_token().unwrap(), Token::EndOfFile);
    }

    #[test]
    fn infallible_iterator_yields_tokens_directly() {
        let tokens: Vec<_> = Tokenizer::new("x").infallible().collect();
        assert_eq!(tokens, vec![Token::Character('x'), Token::EndOfFile]);
    }

    #[test]
    fn switch_states_enters_rawtext_for_style() {
        let mut t = Tokenizer::new("<style><p></style>");
        t.switch_states(true);
        assert_eq!(
            t.next_token().unwrap(),
            Token::StartTag(crate::token::StartTag {
                name: "style".into(),
                self_closing: false,
                attributes: Default::default(),
            })
        );
        // Without the switch this would have been a StartTag('p'); in RAWTEXT it's literal text.
        assert_eq!(t.next_token().unwrap(), Token::Character('<'));
    }
}
