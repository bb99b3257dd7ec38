//! The tokenization state machine: one method per state in the WHATWG tokenization algorithm,
//! dispatched by [`Tokenizer::step`].
//!
//! Every method consumes exactly the input its corresponding spec state consumes and leaves the
//! cursor positioned exactly where that state would. `Cursor::reconsume` plus a state switch
//! stands in for the spec's "reconsume in the X state" wording throughout.

use crate::entities;
use crate::error::ErrorKind;
use crate::reader::Reader;
use crate::state::Internal;
use crate::token::{TagKind, Token, TokenBuilder};
use crate::tokenizer::Tokenizer;

fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | 0x0c | b'\r' | b' ')
}

fn is_surrogate(code: u32) -> bool {
    (0xD800..=0xDFFF).contains(&code)
}

fn is_noncharacter(code: u32) -> bool {
    (0xFDD0..=0xFDEF).contains(&code) || matches!(code & 0xFFFF, 0xFFFE | 0xFFFF)
}

fn is_flagged_control(code: u32) -> bool {
    let is_control =
        (0x00..=0x1F).contains(&code) || code == 0x7F || (0x80..=0x9F).contains(&code);
    is_control && !matches!(code, 0x09 | 0x0A | 0x0C)
}

/// The legacy Windows-1252 remapping applied to the C1 control range by the numeric character
/// reference end state.
fn remap_c1_control(code: u32) -> Option<u32> {
    Some(match code {
        0x80 => 0x20AC,
        0x82 => 0x201A,
        0x83 => 0x0192,
        0x84 => 0x201E,
        0x85 => 0x2026,
        0x86 => 0x2020,
        0x87 => 0x2021,
        0x88 => 0x02C6,
        0x89 => 0x2030,
        0x8A => 0x0160,
        0x8B => 0x2039,
        0x8C => 0x0152,
        0x8E => 0x017D,
        0x91 => 0x2018,
        0x92 => 0x2019,
        0x93 => 0x201C,
        0x94 => 0x201D,
        0x95 => 0x2022,
        0x96 => 0x2013,
        0x97 => 0x2014,
        0x98 => 0x02DC,
        0x99 => 0x2122,
        0x9A => 0x0161,
        0x9B => 0x203A,
        0x9C => 0x0153,
        0x9E => 0x017E,
        0x9F => 0x0178,
        _ => return None,
    })
}

impl<R: Reader> Tokenizer<R> {
    pub(crate) fn step(&mut self) -> Result<(), R::Error> {
        match self.state {
            Internal::Data => self.data_state(),
            Internal::RcData => self.rcdata_state(),
            Internal::RawText => self.rawtext_state(),
            Internal::ScriptData => self.script_data_state(),
            Internal::PlainText => self.plaintext_state(),
            Internal::TagOpen => self.tag_open_state(),
            Internal::EndTagOpen => self.end_tag_open_state(),
            Internal::TagName => self.tag_name_state(),
            Internal::RcDataLessThanSign => self.rcdata_less_than_sign_state(),
            Internal::RcDataEndTagOpen => self.rcdata_end_tag_open_state(),
            Internal::RcDataEndTagName => self.rcdata_end_tag_name_state(),
            Internal::RawTextLessThanSign => self.rawtext_less_than_sign_state(),
            Internal::RawTextEndTagOpen => self.rawtext_end_tag_open_state(),
            Internal::RawTextEndTagName => self.rawtext_end_tag_name_state(),
            Internal::ScriptDataLessThanSign => self.script_data_less_than_sign_state(),
            Internal::ScriptDataEndTagOpen => self.script_data_end_tag_open_state(),
            Internal::ScriptDataEndTagName => self.script_data_end_tag_name_state(),
            Internal::ScriptDataEscapeStart => self.script_data_escape_start_state(),
            Internal::ScriptDataEscapeStartDash => self.script_data_escape_start_dash_state(),
            Internal::ScriptDataEscaped => self.script_data_escaped_state(),
            Internal::ScriptDataEscapedDash => self.script_data_escaped_dash_state(),
            Internal::ScriptDataEscapedDashDash => self.script_data_escaped_dash_dash_state(),
            Internal::ScriptDataEscapedLessThanSign => {
                self.script_data_escaped_less_than_sign_state()
            }
            Internal::ScriptDataEscapedEndTagOpen => {
                self.script_data_escaped_end_tag_open_state()
            }
            Internal::ScriptDataEscapedEndTagName => {
                self.script_data_escaped_end_tag_name_state()
            }
            Internal::ScriptDataDoubleEscapeStart => {
                self.script_data_double_escape_start_state()
            }
            Internal::ScriptDataDoubleEscaped => self.script_data_double_escaped_state(),
            Internal::ScriptDataDoubleEscapedDash => {
                self.script_data_double_escaped_dash_state()
            }
            Internal::ScriptDataDoubleEscapedDashDash => {
                self.script_data_double_escaped_dash_dash_state()
            }
            Internal::ScriptDataDoubleEscapedLessThanSign => {
                self.script_data_double_escaped_less_than_sign_state()
            }
            Internal::ScriptDataDoubleEscapeEnd => self.script_data_double_escape_end_state(),
            Internal::BeforeAttributeName => self.before_attribute_name_state(),
            Internal::AttributeName => self.attribute_name_state(),
            Internal::AfterAttributeName => self.after_attribute_name_state(),
            Internal::BeforeAttributeValue => self.before_attribute_value_state(),
            Internal::AttributeValueDoubleQuoted => self.attribute_value_double_quoted_state(),
            Internal::AttributeValueSingleQuoted => self.attribute_value_single_quoted_state(),
            Internal::AttributeValueUnquoted => self.attribute_value_unquoted_state(),
            Internal::AfterAttributeValueQuoted => self.after_attribute_value_quoted_state(),
            Internal::SelfClosingStartTag => self.self_closing_start_tag_state(),
            Internal::BogusComment => self.bogus_comment_state(),
            Internal::MarkupDeclarationOpen => self.markup_declaration_open_state(),
            Internal::CommentStart => self.comment_start_state(),
            Internal::CommentStartDash => self.comment_start_dash_state(),
            Internal::Comment => self.comment_state(),
            Internal::CommentLessThanSign => self.comment_less_than_sign_state(),
            Internal::CommentLessThanSignBang => self.comment_less_than_sign_bang_state(),
            Internal::CommentLessThanSignBangDash => {
                self.comment_less_than_sign_bang_dash_state()
            }
            Internal::CommentLessThanSignBangDashDash => {
                self.comment_less_than_sign_bang_dash_dash_state()
            }
            Internal::CommentEndDash => self.comment_end_dash_state(),
            Internal::CommentEnd => self.comment_end_state(),
            Internal::CommentEndBang => self.comment_end_bang_state(),
            Internal::Doctype => self.doctype_state(),
            Internal::BeforeDoctypeName => self.before_doctype_name_state(),
            Internal::DoctypeName => self.doctype_name_state(),
            Internal::AfterDoctypeName => self.after_doctype_name_state(),
            Internal::AfterDoctypePublicKeyword => self.after_doctype_public_keyword_state(),
            Internal::BeforeDoctypePublicIdentifier => {
                self.before_doctype_public_identifier_state()
            }
            Internal::DoctypePublicIdentifierDoubleQuoted => {
                self.doctype_public_identifier_double_quoted_state()
            }
            Internal::DoctypePublicIdentifierSingleQuoted => {
                self.doctype_public_identifier_single_quoted_state()
            }
            Internal::AfterDoctypePublicIdentifier => {
                self.after_doctype_public_identifier_state()
            }
            Internal::BetweenDoctypePublicAndSystemIdentifiers => {
                self.between_doctype_public_and_system_identifiers_state()
            }
            Internal::AfterDoctypeSystemKeyword => self.after_doctype_system_keyword_state(),
            Internal::BeforeDoctypeSystemIdentifier => {
                self.before_doctype_system_identifier_state()
            }
            Internal::DoctypeSystemIdentifierDoubleQuoted => {
                self.doctype_system_identifier_double_quoted_state()
            }
            Internal::DoctypeSystemIdentifierSingleQuoted => {
                self.doctype_system_identifier_single_quoted_state()
            }
            Internal::AfterDoctypeSystemIdentifier => {
                self.after_doctype_system_identifier_state()
            }
            Internal::BogusDoctype => self.bogus_doctype_state(),
            Internal::CdataSection => self.cdata_section_state(),
            Internal::CdataSectionBracket => self.cdata_section_bracket_state(),
            Internal::CdataSectionEnd => self.cdata_section_end_state(),
            Internal::CharacterReference => self.character_reference_state(),
            Internal::NamedCharacterReference => self.named_character_reference_state(),
            Internal::AmbiguousAmpersand => self.ambiguous_ampersand_state(),
            Internal::NumericCharacterReference => self.numeric_character_reference_state(),
            Internal::HexadecimalCharacterReferenceStart => {
                self.hexadecimal_character_reference_start_state()
            }
            Internal::DecimalCharacterReferenceStart => {
                self.decimal_character_reference_start_state()
            }
            Internal::HexadecimalCharacterReference => {
                self.hexadecimal_character_reference_state()
            }
            Internal::DecimalCharacterReference => self.decimal_character_reference_state(),
            Internal::NumericCharacterReferenceEnd => {
                self.numeric_character_reference_end_state()
            }
        }
    }

    // -- shared helpers -----------------------------------------------------

    fn emit_error(&mut self, kind: ErrorKind) {
        let position = self.cursor.position();
        self.errors
            .push_back(crate::error::ParseError::new(kind, position));
    }

    fn emit_char(&mut self, c: char) {
        self.tokens.push_back(Token::Character(c));
    }

    fn emit_token(&mut self, token: Token) {
        self.tokens.push_back(token);
    }

    fn emit_eof(&mut self) {
        self.emitted_eof = true;
        self.emit_token(Token::EndOfFile);
    }

    fn emit_tag(&mut self) {
        self.finish_attribute();
        if self.builder.is_end_tag_with_attributes() {
            self.emit_error(ErrorKind::EndTagWithAttributes);
        }
        if self.builder.is_end_tag_with_trailing_solidus() {
            self.emit_error(ErrorKind::EndTagWithTrailingSolidus);
        }
        let token = self.builder.complete_tag();
        if self.auto_switch_states {
            if let Token::StartTag(ref tag) = token {
                if let Some(next) = crate::state::naive_next_state(&tag.name) {
                    self.state = next.into();
                }
            }
        }
        self.emit_token(token);
    }

    fn emit_comment(&mut self) {
        let token = self.builder.complete_comment();
        self.emit_token(token);
    }

    fn emit_doctype(&mut self) {
        let token = self.builder.complete_doctype();
        self.emit_token(token);
    }

    fn switch_to(&mut self, state: Internal) {
        crate::trace::trace_log(&format!("switch_to {state:?}"));
        self.state = state;
    }

    fn reconsume_in(&mut self, state: Internal) {
        crate::trace::trace_log(&format!("reconsume_in {state:?}"));
        self.cursor.reconsume();
        self.state = state;
    }

    fn finish_attribute(&mut self) {
        if let Some(true) = self.builder.flush_attribute() {
            self.emit_error(ErrorKind::DuplicateAttribute);
        }
    }

    fn is_appropriate_end_tag(&self) -> bool {
        self.builder.is_appropriate_end_tag()
    }

    fn is_part_of_attribute(&self) -> bool {
        matches!(
            self.return_state,
            Internal::AttributeValueDoubleQuoted
                | Internal::AttributeValueSingleQuoted
                | Internal::AttributeValueUnquoted
        )
    }

    fn flush_temp_buffer_as_characters(&mut self) {
        let buf = std::mem::take(&mut self.temp_buffer);
        for c in buf.chars() {
            self.emit_char(c);
        }
    }

    fn flush_code_points_consumed_as_character_reference(&mut self) {
        if self.is_part_of_attribute() {
            let buf = std::mem::take(&mut self.temp_buffer);
            for c in buf.chars() {
                self.builder.push_attribute_value(c);
            }
        } else {
            self.flush_temp_buffer_as_characters();
        }
    }

    /// Check whether `word` (with `first` as its already-consumed first byte) matches the bytes
    /// ahead, ASCII case-insensitively; consumes the rest of `word` on success.
    fn match_ahead_ci(&mut self, first: u8, word: &[u8]) -> Result<bool, R::Error> {
        if !first.eq_ignore_ascii_case(&word[0]) {
            return Ok(false);
        }
        let rest_len = word.len() - 1;
        let matches = {
            let candidate = self.cursor.peek_n(rest_len);
            candidate.len() == rest_len && candidate.eq_ignore_ascii_case(&word[1..])
        };
        if matches {
            for _ in 0..rest_len {
                self.cursor.next()?;
            }
        }
        Ok(matches)
    }

    // -- text content states --------------------------------------------------

    fn data_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'&') => {
                self.return_state = Internal::Data;
                self.switch_to(Internal::CharacterReference);
            }
            Some(b'<') => self.switch_to(Internal::TagOpen),
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.emit_char('\u{0000}');
            }
            None => self.emit_eof(),
            Some(b) => {
                let c = self.cursor.decode_scalar(b)?;
                self.emit_char(c);
            }
        }
        Ok(())
    }

    fn rcdata_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'&') => {
                self.return_state = Internal::RcData;
                self.switch_to(Internal::CharacterReference);
            }
            Some(b'<') => self.switch_to(Internal::RcDataLessThanSign),
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.emit_char('\u{FFFD}');
            }
            None => self.emit_eof(),
            Some(b) => {
                let c = self.cursor.decode_scalar(b)?;
                self.emit_char(c);
            }
        }
        Ok(())
    }

    fn rawtext_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'<') => self.switch_to(Internal::RawTextLessThanSign),
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.emit_char('\u{FFFD}');
            }
            None => self.emit_eof(),
            Some(b) => {
                let c = self.cursor.decode_scalar(b)?;
                self.emit_char(c);
            }
        }
        Ok(())
    }

    fn script_data_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'<') => self.switch_to(Internal::ScriptDataLessThanSign),
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.emit_char('\u{FFFD}');
            }
            None => self.emit_eof(),
            Some(b) => {
                let c = self.cursor.decode_scalar(b)?;
                self.emit_char(c);
            }
        }
        Ok(())
    }

    fn plaintext_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.emit_char('\u{FFFD}');
            }
            None => self.emit_eof(),
            Some(b) => {
                let c = self.cursor.decode_scalar(b)?;
                self.emit_char(c);
            }
        }
        Ok(())
    }

    // -- tag open / name states ----------------------------------------------

    fn tag_open_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'!') => self.switch_to(Internal::MarkupDeclarationOpen),
            Some(b'/') => self.switch_to(Internal::EndTagOpen),
            Some(b) if b.is_ascii_alphabetic() => {
                self.builder.init_tag(TagKind::Start);
                self.reconsume_in(Internal::TagName);
            }
            Some(b'?') => {
                self.emit_error(ErrorKind::UnexpectedQuestionMarkInsteadOfTagName);
                self.builder.init_comment();
                self.reconsume_in(Internal::BogusComment);
            }
            None => {
                self.emit_error(ErrorKind::EofBeforeTagName);
                self.emit_char('<');
                self.emit_eof();
            }
            Some(_) => {
                self.emit_error(ErrorKind::InvalidFirstCharacterOfTagName);
                self.emit_char('<');
                self.reconsume_in(Internal::Data);
            }
        }
        Ok(())
    }

    fn end_tag_open_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if b.is_ascii_alphabetic() => {
                self.builder.init_tag(TagKind::End);
                self.reconsume_in(Internal::TagName);
            }
            Some(b'>') => {
                self.emit_error(ErrorKind::MissingEndTagName);
                self.switch_to(Internal::Data);
            }
            None => {
                self.emit_error(ErrorKind::EofBeforeTagName);
                self.emit_char('<');
                self.emit_char('/');
                self.emit_eof();
            }
            Some(_) => {
                self.emit_error(ErrorKind::InvalidFirstCharacterOfTagName);
                self.builder.init_comment();
                self.reconsume_in(Internal::BogusComment);
            }
        }
        Ok(())
    }

    fn tag_name_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => self.switch_to(Internal::BeforeAttributeName),
            Some(b'/') => self.switch_to(Internal::SelfClosingStartTag),
            Some(b'>') => {
                self.switch_to(Internal::Data);
                self.emit_tag();
            }
            Some(b) if b.is_ascii_uppercase() => {
                self.builder.push_tag_name(b.to_ascii_lowercase() as char);
            }
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.builder.push_tag_name('\u{FFFD}');
            }
            None => {
                self.emit_error(ErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(b) => {
                let c = self.cursor.decode_scalar(b)?;
                self.builder.push_tag_name(c);
            }
        }
        Ok(())
    }

    // -- RCDATA / RAWTEXT / script data less-than-sign & end tag machinery ---

    fn generic_less_than_sign_state(
        &mut self,
        end_tag_open_state: Internal,
        fallback_state: Internal,
    ) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'/') => {
                self.temp_buffer.clear();
                self.switch_to(end_tag_open_state);
            }
            _ => {
                self.emit_char('<');
                self.reconsume_in(fallback_state);
            }
        }
        Ok(())
    }

    fn generic_end_tag_open_state(
        &mut self,
        end_tag_name_state: Internal,
        fallback_state: Internal,
    ) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if b.is_ascii_alphabetic() => {
                self.builder.init_tag(TagKind::End);
                self.reconsume_in(end_tag_name_state);
            }
            _ => {
                self.emit_char('<');
                self.emit_char('/');
                self.reconsume_in(fallback_state);
            }
        }
        Ok(())
    }

    fn anything_else_end_tag_name(&mut self, fallback_state: Internal) {
        self.emit_char('<');
        self.emit_char('/');
        self.flush_temp_buffer_as_characters();
        self.reconsume_in(fallback_state);
    }

    fn generic_end_tag_name_state(&mut self, fallback_state: Internal) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => {
                if self.is_appropriate_end_tag() {
                    self.switch_to(Internal::BeforeAttributeName);
                } else {
                    self.anything_else_end_tag_name(fallback_state);
                }
            }
            Some(b'/') => {
                if self.is_appropriate_end_tag() {
                    self.switch_to(Internal::SelfClosingStartTag);
                } else {
                    self.anything_else_end_tag_name(fallback_state);
                }
            }
            Some(b'>') => {
                if self.is_appropriate_end_tag() {
                    self.switch_to(Internal::Data);
                    self.emit_tag();
                } else {
                    self.anything_else_end_tag_name(fallback_state);
                }
            }
            Some(b) if b.is_ascii_uppercase() => {
                self.builder.push_tag_name(b.to_ascii_lowercase() as char);
                self.temp_buffer.push(b as char);
            }
            Some(b) if b.is_ascii_lowercase() => {
                self.builder.push_tag_name(b as char);
                self.temp_buffer.push(b as char);
            }
            _ => self.anything_else_end_tag_name(fallback_state),
        }
        Ok(())
    }

    fn rcdata_less_than_sign_state(&mut self) -> Result<(), R::Error> {
        self.generic_less_than_sign_state(Internal::RcDataEndTagOpen, Internal::RcData)
    }

    fn rcdata_end_tag_open_state(&mut self) -> Result<(), R::Error> {
        self.generic_end_tag_open_state(Internal::RcDataEndTagName, Internal::RcData)
    }

    fn rcdata_end_tag_name_state(&mut self) -> Result<(), R::Error> {
        self.generic_end_tag_name_state(Internal::RcData)
    }

    fn rawtext_less_than_sign_state(&mut self) -> Result<(), R::Error> {
        self.generic_less_than_sign_state(Internal::RawTextEndTagOpen, Internal::RawText)
    }

    fn rawtext_end_tag_open_state(&mut self) -> Result<(), R::Error> {
        self.generic_end_tag_open_state(Internal::RawTextEndTagName, Internal::RawText)
    }

    fn rawtext_end_tag_name_state(&mut self) -> Result<(), R::Error> {
        self.generic_end_tag_name_state(Internal::RawText)
    }

    fn script_data_end_tag_open_state(&mut self) -> Result<(), R::Error> {
        self.generic_end_tag_open_state(Internal::ScriptDataEndTagName, Internal::ScriptData)
    }

    fn script_data_end_tag_name_state(&mut self) -> Result<(), R::Error> {
        self.generic_end_tag_name_state(Internal::ScriptData)
    }

    fn script_data_escaped_end_tag_open_state(&mut self) -> Result<(), R::Error> {
        self.generic_end_tag_open_state(
            Internal::ScriptDataEscapedEndTagName,
            Internal::ScriptDataEscaped,
        )
    }

    fn script_data_escaped_end_tag_name_state(&mut self) -> Result<(), R::Error> {
        self.generic_end_tag_name_state(Internal::ScriptDataEscaped)
    }

    fn script_data_less_than_sign_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'/') => {
                self.temp_buffer.clear();
                self.switch_to(Internal::ScriptDataEndTagOpen);
            }
            Some(b'!') => {
                self.switch_to(Internal::ScriptDataEscapeStart);
                self.emit_char('<');
                self.emit_char('!');
            }
            _ => {
                self.emit_char('<');
                self.reconsume_in(Internal::ScriptData);
            }
        }
        Ok(())
    }

    // -- script data escape / double-escape chain ----------------------------

    fn script_data_escape_start_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'-') => {
                self.switch_to(Internal::ScriptDataEscapeStartDash);
                self.emit_char('-');
            }
            _ => self.reconsume_in(Internal::ScriptData),
        }
        Ok(())
    }

    fn script_data_escape_start_dash_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'-') => {
                self.switch_to(Internal::ScriptDataEscapedDashDash);
                self.emit_char('-');
            }
            _ => self.reconsume_in(Internal::ScriptData),
        }
        Ok(())
    }

    fn script_data_escaped_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'-') => {
                self.switch_to(Internal::ScriptDataEscapedDash);
                self.emit_char('-');
            }
            Some(b'<') => self.switch_to(Internal::ScriptDataEscapedLessThanSign),
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.emit_char('\u{FFFD}');
            }
            None => {
                self.emit_error(ErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
            Some(b) => {
                let c = self.cursor.decode_scalar(b)?;
                self.emit_char(c);
            }
        }
        Ok(())
    }

    fn script_data_escaped_dash_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'-') => {
                self.switch_to(Internal::ScriptDataEscapedDashDash);
                self.emit_char('-');
            }
            Some(b'<') => self.switch_to(Internal::ScriptDataEscapedLessThanSign),
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.switch_to(Internal::ScriptDataEscaped);
                self.emit_char('\u{FFFD}');
            }
            None => {
                self.emit_error(ErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
            Some(b) => {
                self.switch_to(Internal::ScriptDataEscaped);
                let c = self.cursor.decode_scalar(b)?;
                self.emit_char(c);
            }
        }
        Ok(())
    }

    fn script_data_escaped_dash_dash_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'-') => self.emit_char('-'),
            Some(b'<') => self.switch_to(Internal::ScriptDataEscapedLessThanSign),
            Some(b'>') => {
                self.switch_to(Internal::ScriptData);
                self.emit_char('>');
            }
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.switch_to(Internal::ScriptDataEscaped);
                self.emit_char('\u{FFFD}');
            }
            None => {
                self.emit_error(ErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
            Some(b) => {
                self.switch_to(Internal::ScriptDataEscaped);
                let c = self.cursor.decode_scalar(b)?;
                self.emit_char(c);
            }
        }
        Ok(())
    }

    fn script_data_escaped_less_than_sign_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'/') => {
                self.temp_buffer.clear();
                self.switch_to(Internal::ScriptDataEscapedEndTagOpen);
            }
            Some(b) if b.is_ascii_alphabetic() => {
                self.temp_buffer.clear();
                self.emit_char('<');
                self.reconsume_in(Internal::ScriptDataDoubleEscapeStart);
            }
            _ => {
                self.emit_char('<');
                self.reconsume_in(Internal::ScriptDataEscaped);
            }
        }
        Ok(())
    }

    fn script_data_double_escape_start_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) || b == b'/' || b == b'>' => {
                if self.temp_buffer == "script" {
                    self.switch_to(Internal::ScriptDataDoubleEscaped);
                } else {
                    self.switch_to(Internal::ScriptDataEscaped);
                }
                self.emit_char(b as char);
            }
            Some(b) if b.is_ascii_uppercase() => {
                self.temp_buffer.push(b.to_ascii_lowercase() as char);
                self.emit_char(b as char);
            }
            Some(b) if b.is_ascii_lowercase() => {
                self.temp_buffer.push(b as char);
                self.emit_char(b as char);
            }
            _ => self.reconsume_in(Internal::ScriptDataEscaped),
        }
        Ok(())
    }

    fn script_data_double_escaped_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'-') => {
                self.switch_to(Internal::ScriptDataDoubleEscapedDash);
                self.emit_char('-');
            }
            Some(b'<') => {
                self.switch_to(Internal::ScriptDataDoubleEscapedLessThanSign);
                self.emit_char('<');
            }
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.emit_char('\u{FFFD}');
            }
            None => {
                self.emit_error(ErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
            Some(b) => {
                let c = self.cursor.decode_scalar(b)?;
                self.emit_char(c);
            }
        }
        Ok(())
    }

    fn script_data_double_escaped_dash_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'-') => {
                self.switch_to(Internal::ScriptDataDoubleEscapedDashDash);
                self.emit_char('-');
            }
            Some(b'<') => {
                self.switch_to(Internal::ScriptDataDoubleEscapedLessThanSign);
                self.emit_char('<');
            }
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.switch_to(Internal::ScriptDataDoubleEscaped);
                self.emit_char('\u{FFFD}');
            }
            None => {
                self.emit_error(ErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
            Some(b) => {
                self.switch_to(Internal::ScriptDataDoubleEscaped);
                let c = self.cursor.decode_scalar(b)?;
                self.emit_char(c);
            }
        }
        Ok(())
    }

    fn script_data_double_escaped_dash_dash_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'-') => self.emit_char('-'),
            Some(b'<') => {
                self.switch_to(Internal::ScriptDataDoubleEscapedLessThanSign);
                self.emit_char('<');
            }
            Some(b'>') => {
                self.switch_to(Internal::ScriptData);
                self.emit_char('>');
            }
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.switch_to(Internal::ScriptDataDoubleEscaped);
                self.emit_char('\u{FFFD}');
            }
            None => {
                self.emit_error(ErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
            Some(b) => {
                self.switch_to(Internal::ScriptDataDoubleEscaped);
                let c = self.cursor.decode_scalar(b)?;
                self.emit_char(c);
            }
        }
        Ok(())
    }

    fn script_data_double_escaped_less_than_sign_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'/') => {
                self.temp_buffer.clear();
                self.switch_to(Internal::ScriptDataDoubleEscapeEnd);
                self.emit_char('/');
            }
            _ => self.reconsume_in(Internal::ScriptDataDoubleEscaped),
        }
        Ok(())
    }

    fn script_data_double_escape_end_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) || b == b'/' || b == b'>' => {
                if self.temp_buffer == "script" {
                    self.switch_to(Internal::ScriptDataEscaped);
                } else {
                    self.switch_to(Internal::ScriptDataDoubleEscaped);
                }
                self.emit_char(b as char);
            }
            Some(b) if b.is_ascii_uppercase() => {
                self.temp_buffer.push(b.to_ascii_lowercase() as char);
                self.emit_char(b as char);
            }
            Some(b) if b.is_ascii_lowercase() => {
                self.temp_buffer.push(b as char);
                self.emit_char(b as char);
            }
            _ => self.reconsume_in(Internal::ScriptDataDoubleEscaped),
        }
        Ok(())
    }

    // -- attribute states -----------------------------------------------------

    fn before_attribute_name_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => {}
            Some(b'/') | Some(b'>') | None => {
                self.reconsume_in(Internal::AfterAttributeName);
            }
            Some(b'=') => {
                self.emit_error(ErrorKind::UnexpectedEqualsSignBeforeAttributeName);
                self.builder.start_attribute();
                self.builder.push_attribute_name('=');
                self.switch_to(Internal::AttributeName);
            }
            Some(_) => {
                self.builder.start_attribute();
                self.reconsume_in(Internal::AttributeName);
            }
        }
        Ok(())
    }

    fn attribute_name_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) || b == b'/' || b == b'>' => {
                self.finish_attribute();
                self.reconsume_in(Internal::AfterAttributeName);
            }
            None => {
                self.finish_attribute();
                self.reconsume_in(Internal::AfterAttributeName);
            }
            Some(b'=') => self.switch_to(Internal::BeforeAttributeValue),
            Some(b) if b.is_ascii_uppercase() => {
                self.builder.push_attribute_name(b.to_ascii_lowercase() as char);
            }
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.builder.push_attribute_name('\u{FFFD}');
            }
            Some(b @ (b'"' | b'\'' | b'<')) => {
                self.emit_error(ErrorKind::UnexpectedCharacterInAttributeName);
                self.builder.push_attribute_name(b as char);
            }
            Some(b) => {
                let c = self.cursor.decode_scalar(b)?;
                self.builder.push_attribute_name(c);
            }
        }
        Ok(())
    }

    fn after_attribute_name_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => {}
            Some(b'/') => self.switch_to(Internal::SelfClosingStartTag),
            Some(b'=') => self.switch_to(Internal::BeforeAttributeValue),
            Some(b'>') => {
                self.switch_to(Internal::Data);
                self.emit_tag();
            }
            None => {
                self.emit_error(ErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(_) => {
                self.builder.start_attribute();
                self.reconsume_in(Internal::AttributeName);
            }
        }
        Ok(())
    }

    fn before_attribute_value_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => {}
            Some(b'"') => self.switch_to(Internal::AttributeValueDoubleQuoted),
            Some(b'\'') => self.switch_to(Internal::AttributeValueSingleQuoted),
            Some(b'>') => {
                self.emit_error(ErrorKind::MissingAttributeValue);
                self.switch_to(Internal::Data);
                self.emit_tag();
            }
            _ => self.reconsume_in(Internal::AttributeValueUnquoted),
        }
        Ok(())
    }

    fn generic_attribute_value_quoted_state(
        &mut self,
        quote: u8,
        success_state: Internal,
    ) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if b == quote => self.switch_to(success_state),
            Some(b'&') => {
                self.return_state = if quote == b'"' {
                    Internal::AttributeValueDoubleQuoted
                } else {
                    Internal::AttributeValueSingleQuoted
                };
                self.switch_to(Internal::CharacterReference);
            }
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.builder.push_attribute_value('\u{FFFD}');
            }
            None => {
                self.emit_error(ErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(b) => {
                let c = self.cursor.decode_scalar(b)?;
                self.builder.push_attribute_value(c);
            }
        }
        Ok(())
    }

    fn attribute_value_double_quoted_state(&mut self) -> Result<(), R::Error> {
        self.generic_attribute_value_quoted_state(b'"', Internal::AfterAttributeValueQuoted)
    }

    fn attribute_value_single_quoted_state(&mut self) -> Result<(), R::Error> {
        self.generic_attribute_value_quoted_state(b'\'', Internal::AfterAttributeValueQuoted)
    }

    fn attribute_value_unquoted_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => {
                self.finish_attribute();
                self.switch_to(Internal::BeforeAttributeName);
            }
            Some(b'&') => {
                self.return_state = Internal::AttributeValueUnquoted;
                self.switch_to(Internal::CharacterReference);
            }
            Some(b'>') => {
                self.switch_to(Internal::Data);
                self.emit_tag();
            }
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.builder.push_attribute_value('\u{FFFD}');
            }
            Some(b @ (b'"' | b'\'' | b'<' | b'=' | b'`')) => {
                self.emit_error(ErrorKind::UnexpectedCharacterInUnquotedAttributeValue);
                self.builder.push_attribute_value(b as char);
            }
            None => {
                self.emit_error(ErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(b) => {
                let c = self.cursor.decode_scalar(b)?;
                self.builder.push_attribute_value(c);
            }
        }
        Ok(())
    }

    fn after_attribute_value_quoted_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => self.switch_to(Internal::BeforeAttributeName),
            Some(b'/') => self.switch_to(Internal::SelfClosingStartTag),
            Some(b'>') => {
                self.switch_to(Internal::Data);
                self.emit_tag();
            }
            None => {
                self.emit_error(ErrorKind::EofInTag);
                self.emit_eof();
            }
            _ => {
                self.emit_error(ErrorKind::MissingWhitespaceBetweenAttributes);
                self.reconsume_in(Internal::BeforeAttributeName);
            }
        }
        Ok(())
    }

    fn self_closing_start_tag_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'>') => {
                self.builder.set_self_closing();
                self.switch_to(Internal::Data);
                self.emit_tag();
            }
            None => {
                self.emit_error(ErrorKind::EofInTag);
                self.emit_eof();
            }
            _ => {
                self.emit_error(ErrorKind::UnexpectedSolidusInTag);
                self.reconsume_in(Internal::BeforeAttributeName);
            }
        }
        Ok(())
    }

    // -- comments ---------------------------------------------------------------

    fn bogus_comment_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'>') => {
                self.switch_to(Internal::Data);
                self.emit_comment();
            }
            None => {
                self.emit_comment();
                self.emit_eof();
            }
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.builder.push_comment('\u{FFFD}');
            }
            Some(b) => {
                let c = self.cursor.decode_scalar(b)?;
                self.builder.push_comment(c);
            }
        }
        Ok(())
    }

    fn markup_declaration_open_state(&mut self) -> Result<(), R::Error> {
        if self.cursor.try_read_string("--", true)? {
            self.builder.init_comment();
            self.switch_to(Internal::CommentStart);
        } else if self.cursor.try_read_string("doctype", false)? {
            self.switch_to(Internal::Doctype);
        } else if self.cursor.try_read_string("[CDATA[", true)? {
            // A real tree constructor only takes this branch outside HTML content; this
            // tokenizer has no namespace context, so it always treats it as HTML content.
            self.emit_error(ErrorKind::CdataInHtmlContent);
            self.builder.init_comment();
            self.builder.push_comment_str("[CDATA[");
            self.switch_to(Internal::BogusComment);
        } else {
            self.emit_error(ErrorKind::IncorrectlyOpenedComment);
            self.builder.init_comment();
            self.switch_to(Internal::BogusComment);
        }
        Ok(())
    }

    fn comment_start_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'-') => self.switch_to(Internal::CommentStartDash),
            Some(b'>') => {
                self.emit_error(ErrorKind::AbruptClosingOfEmptyComment);
                self.switch_to(Internal::Data);
                self.emit_comment();
            }
            _ => self.reconsume_in(Internal::Comment),
        }
        Ok(())
    }

    fn comment_start_dash_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'-') => self.switch_to(Internal::CommentEnd),
            Some(b'>') => {
                self.emit_error(ErrorKind::AbruptClosingOfEmptyComment);
                self.switch_to(Internal::Data);
                self.emit_comment();
            }
            None => {
                self.emit_error(ErrorKind::EofInComment);
                self.emit_comment();
                self.emit_eof();
            }
            _ => {
                self.builder.push_comment('-');
                self.reconsume_in(Internal::Comment);
            }
        }
        Ok(())
    }

    fn comment_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'<') => {
                self.builder.push_comment('<');
                self.switch_to(Internal::CommentLessThanSign);
            }
            Some(b'-') => self.switch_to(Internal::CommentEndDash),
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.builder.push_comment('\u{FFFD}');
            }
            None => {
                self.emit_error(ErrorKind::EofInComment);
                self.emit_comment();
                self.emit_eof();
            }
            Some(b) => {
                let c = self.cursor.decode_scalar(b)?;
                self.builder.push_comment(c);
            }
        }
        Ok(())
    }

    fn comment_less_than_sign_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'!') => {
                self.builder.push_comment('!');
                self.switch_to(Internal::CommentLessThanSignBang);
            }
            Some(b'<') => self.builder.push_comment('<'),
            _ => self.reconsume_in(Internal::Comment),
        }
        Ok(())
    }

    fn comment_less_than_sign_bang_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'-') => self.switch_to(Internal::CommentLessThanSignBangDash),
            _ => self.reconsume_in(Internal::Comment),
        }
        Ok(())
    }

    fn comment_less_than_sign_bang_dash_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'-') => self.switch_to(Internal::CommentLessThanSignBangDashDash),
            _ => self.reconsume_in(Internal::CommentEndDash),
        }
        Ok(())
    }

    fn comment_less_than_sign_bang_dash_dash_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'>') | None => self.reconsume_in(Internal::CommentEnd),
            _ => {
                self.emit_error(ErrorKind::NestedComment);
                self.reconsume_in(Internal::CommentEnd);
            }
        }
        Ok(())
    }

    fn comment_end_dash_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'-') => self.switch_to(Internal::CommentEnd),
            None => {
                self.emit_error(ErrorKind::EofInComment);
                self.emit_comment();
                self.emit_eof();
            }
            _ => {
                self.builder.push_comment('-');
                self.reconsume_in(Internal::Comment);
            }
        }
        Ok(())
    }

    fn comment_end_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'>') => {
                self.switch_to(Internal::Data);
                self.emit_comment();
            }
            Some(b'!') => self.switch_to(Internal::CommentEndBang),
            Some(b'-') => self.builder.push_comment('-'),
            None => {
                self.emit_error(ErrorKind::EofInComment);
                self.emit_comment();
                self.emit_eof();
            }
            _ => {
                self.builder.push_comment_str("--");
                self.reconsume_in(Internal::Comment);
            }
        }
        Ok(())
    }

    fn comment_end_bang_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'-') => {
                self.builder.push_comment_str("--!");
                self.switch_to(Internal::CommentEndDash);
            }
            Some(b'>') => {
                self.emit_error(ErrorKind::IncorrectlyClosedComment);
                self.switch_to(Internal::Data);
                self.emit_comment();
            }
            None => {
                self.emit_error(ErrorKind::EofInComment);
                self.emit_comment();
                self.emit_eof();
            }
            _ => {
                self.builder.push_comment_str("--!");
                self.reconsume_in(Internal::Comment);
            }
        }
        Ok(())
    }

    // -- DOCTYPE ------------------------------------------------------------

    fn doctype_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => self.switch_to(Internal::BeforeDoctypeName),
            Some(b'>') => self.reconsume_in(Internal::BeforeDoctypeName),
            None => {
                self.emit_error(ErrorKind::EofInDoctype);
                self.builder.init_doctype();
                self.builder.set_force_quirks();
                self.emit_doctype();
                self.emit_eof();
            }
            _ => {
                self.emit_error(ErrorKind::MissingWhitespaceBeforeDoctypeName);
                self.reconsume_in(Internal::BeforeDoctypeName);
            }
        }
        Ok(())
    }

    fn before_doctype_name_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => {}
            Some(b) if b.is_ascii_uppercase() => {
                self.builder.init_doctype();
                self.builder.push_doctype_name(b.to_ascii_lowercase() as char);
                self.switch_to(Internal::DoctypeName);
            }
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.builder.init_doctype();
                self.builder.push_doctype_name('\u{FFFD}');
                self.switch_to(Internal::DoctypeName);
            }
            Some(b'>') => {
                self.emit_error(ErrorKind::MissingDoctypeName);
                self.builder.init_doctype();
                self.builder.set_force_quirks();
                self.switch_to(Internal::Data);
                self.emit_doctype();
            }
            None => {
                self.emit_error(ErrorKind::EofInDoctype);
                self.builder.init_doctype();
                self.builder.set_force_quirks();
                self.emit_doctype();
                self.emit_eof();
            }
            Some(b) => {
                self.builder.init_doctype();
                let c = self.cursor.decode_scalar(b)?;
                self.builder.push_doctype_name(c);
                self.switch_to(Internal::DoctypeName);
            }
        }
        Ok(())
    }

    fn doctype_name_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => self.switch_to(Internal::AfterDoctypeName),
            Some(b'>') => {
                self.switch_to(Internal::Data);
                self.emit_doctype();
            }
            Some(b) if b.is_ascii_uppercase() => {
                self.builder.push_doctype_name(b.to_ascii_lowercase() as char);
            }
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                self.builder.push_doctype_name('\u{FFFD}');
            }
            None => {
                self.emit_error(ErrorKind::EofInDoctype);
                self.builder.set_force_quirks();
                self.emit_doctype();
                self.emit_eof();
            }
            Some(b) => {
                let c = self.cursor.decode_scalar(b)?;
                self.builder.push_doctype_name(c);
            }
        }
        Ok(())
    }

    fn after_doctype_name_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => {}
            Some(b'>') => {
                self.switch_to(Internal::Data);
                self.emit_doctype();
            }
            None => {
                self.emit_error(ErrorKind::EofInDoctype);
                self.builder.set_force_quirks();
                self.emit_doctype();
                self.emit_eof();
            }
            Some(c) => {
                if self.match_ahead_ci(c, b"PUBLIC")? {
                    self.switch_to(Internal::AfterDoctypePublicKeyword);
                } else if self.match_ahead_ci(c, b"SYSTEM")? {
                    self.switch_to(Internal::AfterDoctypeSystemKeyword);
                } else {
                    self.emit_error(ErrorKind::InvalidCharacterSequenceAfterDoctypeName);
                    self.builder.set_force_quirks();
                    self.reconsume_in(Internal::BogusDoctype);
                }
            }
        }
        Ok(())
    }

    fn after_doctype_public_keyword_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => self.switch_to(Internal::BeforeDoctypePublicIdentifier),
            Some(b'"') => {
                self.emit_error(ErrorKind::MissingWhitespaceAfterDoctypePublicKeyword);
                self.builder.set_doctype_public_id_present();
                self.switch_to(Internal::DoctypePublicIdentifierDoubleQuoted);
            }
            Some(b'\'') => {
                self.emit_error(ErrorKind::MissingWhitespaceAfterDoctypePublicKeyword);
                self.builder.set_doctype_public_id_present();
                self.switch_to(Internal::DoctypePublicIdentifierSingleQuoted);
            }
            Some(b'>') => {
                self.emit_error(ErrorKind::MissingDoctypePublicIdentifier);
                self.builder.set_force_quirks();
                self.switch_to(Internal::Data);
                self.emit_doctype();
            }
            None => {
                self.emit_error(ErrorKind::EofInDoctype);
                self.builder.set_force_quirks();
                self.emit_doctype();
                self.emit_eof();
            }
            _ => {
                self.emit_error(ErrorKind::MissingQuoteBeforeDoctypePublicIdentifier);
                self.builder.set_force_quirks();
                self.reconsume_in(Internal::BogusDoctype);
            }
        }
        Ok(())
    }

    fn before_doctype_public_identifier_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => {}
            Some(b'"') => {
                self.builder.set_doctype_public_id_present();
                self.switch_to(Internal::DoctypePublicIdentifierDoubleQuoted);
            }
            Some(b'\'') => {
                self.builder.set_doctype_public_id_present();
                self.switch_to(Internal::DoctypePublicIdentifierSingleQuoted);
            }
            Some(b'>') => {
                self.emit_error(ErrorKind::MissingDoctypePublicIdentifier);
                self.builder.set_force_quirks();
                self.switch_to(Internal::Data);
                self.emit_doctype();
            }
            None => {
                self.emit_error(ErrorKind::EofInDoctype);
                self.builder.set_force_quirks();
                self.emit_doctype();
                self.emit_eof();
            }
            _ => {
                self.emit_error(ErrorKind::MissingQuoteBeforeDoctypePublicIdentifier);
                self.builder.set_force_quirks();
                self.reconsume_in(Internal::BogusDoctype);
            }
        }
        Ok(())
    }

    fn generic_doctype_identifier_quoted_state(
        &mut self,
        quote: u8,
        success_state: Internal,
        abrupt_error: ErrorKind,
        push: fn(&mut TokenBuilder, char),
    ) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if b == quote => self.switch_to(success_state),
            Some(0) => {
                self.emit_error(ErrorKind::UnexpectedNullCharacter);
                push(&mut self.builder, '\u{FFFD}');
            }
            Some(b'>') => {
                self.emit_error(abrupt_error);
                self.builder.set_force_quirks();
                self.switch_to(Internal::Data);
                self.emit_doctype();
            }
            None => {
                self.emit_error(ErrorKind::EofInDoctype);
                self.builder.set_force_quirks();
                self.emit_doctype();
                self.emit_eof();
            }
            Some(b) => {
                let c = self.cursor.decode_scalar(b)?;
                push(&mut self.builder, c);
            }
        }
        Ok(())
    }

    fn doctype_public_identifier_double_quoted_state(&mut self) -> Result<(), R::Error> {
        self.generic_doctype_identifier_quoted_state(
            b'"',
            Internal::AfterDoctypePublicIdentifier,
            ErrorKind::AbruptDoctypePublicIdentifier,
            TokenBuilder::push_doctype_public_id,
        )
    }

    fn doctype_public_identifier_single_quoted_state(&mut self) -> Result<(), R::Error> {
        self.generic_doctype_identifier_quoted_state(
            b'\'',
            Internal::AfterDoctypePublicIdentifier,
            ErrorKind::AbruptDoctypePublicIdentifier,
            TokenBuilder::push_doctype_public_id,
        )
    }

    fn doctype_system_identifier_double_quoted_state(&mut self) -> Result<(), R::Error> {
        self.generic_doctype_identifier_quoted_state(
            b'"',
            Internal::AfterDoctypeSystemIdentifier,
            ErrorKind::AbruptDoctypeSystemIdentifier,
            TokenBuilder::push_doctype_system_id,
        )
    }

    fn doctype_system_identifier_single_quoted_state(&mut self) -> Result<(), R::Error> {
        self.generic_doctype_identifier_quoted_state(
            b'\'',
            Internal::AfterDoctypeSystemIdentifier,
            ErrorKind::AbruptDoctypeSystemIdentifier,
            TokenBuilder::push_doctype_system_id,
        )
    }

    fn after_doctype_public_identifier_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => {
                self.switch_to(Internal::BetweenDoctypePublicAndSystemIdentifiers)
            }
            Some(b'>') => {
                self.switch_to(Internal::Data);
                self.emit_doctype();
            }
            Some(b'"') => {
                self.emit_error(
                    ErrorKind::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                );
                self.builder.set_doctype_system_id_present();
                self.switch_to(Internal::DoctypeSystemIdentifierDoubleQuoted);
            }
            Some(b'\'') => {
                self.emit_error(
                    ErrorKind::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                );
                self.builder.set_doctype_system_id_present();
                self.switch_to(Internal::DoctypeSystemIdentifierSingleQuoted);
            }
            None => {
                self.emit_error(ErrorKind::EofInDoctype);
                self.builder.set_force_quirks();
                self.emit_doctype();
                self.emit_eof();
            }
            _ => {
                self.emit_error(ErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.builder.set_force_quirks();
                self.reconsume_in(Internal::BogusDoctype);
            }
        }
        Ok(())
    }

    fn between_doctype_public_and_system_identifiers_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => {}
            Some(b'>') => {
                self.switch_to(Internal::Data);
                self.emit_doctype();
            }
            Some(b'"') => {
                self.builder.set_doctype_system_id_present();
                self.switch_to(Internal::DoctypeSystemIdentifierDoubleQuoted);
            }
            Some(b'\'') => {
                self.builder.set_doctype_system_id_present();
                self.switch_to(Internal::DoctypeSystemIdentifierSingleQuoted);
            }
            None => {
                self.emit_error(ErrorKind::EofInDoctype);
                self.builder.set_force_quirks();
                self.emit_doctype();
                self.emit_eof();
            }
            _ => {
                self.emit_error(ErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.builder.set_force_quirks();
                self.reconsume_in(Internal::BogusDoctype);
            }
        }
        Ok(())
    }

    fn after_doctype_system_keyword_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => self.switch_to(Internal::BeforeDoctypeSystemIdentifier),
            Some(b'"') => {
                self.emit_error(ErrorKind::MissingWhitespaceAfterDoctypeSystemKeyword);
                self.builder.set_doctype_system_id_present();
                self.switch_to(Internal::DoctypeSystemIdentifierDoubleQuoted);
            }
            Some(b'\'') => {
                self.emit_error(ErrorKind::MissingWhitespaceAfterDoctypeSystemKeyword);
                self.builder.set_doctype_system_id_present();
                self.switch_to(Internal::DoctypeSystemIdentifierSingleQuoted);
            }
            Some(b'>') => {
                self.emit_error(ErrorKind::MissingDoctypeSystemIdentifier);
                self.builder.set_force_quirks();
                self.switch_to(Internal::Data);
                self.emit_doctype();
            }
            None => {
                self.emit_error(ErrorKind::EofInDoctype);
                self.builder.set_force_quirks();
                self.emit_doctype();
                self.emit_eof();
            }
            _ => {
                self.emit_error(ErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.builder.set_force_quirks();
                self.reconsume_in(Internal::BogusDoctype);
            }
        }
        Ok(())
    }

    fn before_doctype_system_identifier_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => {}
            Some(b'"') => {
                self.builder.set_doctype_system_id_present();
                self.switch_to(Internal::DoctypeSystemIdentifierDoubleQuoted);
            }
            Some(b'\'') => {
                self.builder.set_doctype_system_id_present();
                self.switch_to(Internal::DoctypeSystemIdentifierSingleQuoted);
            }
            Some(b'>') => {
                self.emit_error(ErrorKind::MissingDoctypeSystemIdentifier);
                self.builder.set_force_quirks();
                self.switch_to(Internal::Data);
                self.emit_doctype();
            }
            None => {
                self.emit_error(ErrorKind::EofInDoctype);
                self.builder.set_force_quirks();
                self.emit_doctype();
                self.emit_eof();
            }
            _ => {
                self.emit_error(ErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.builder.set_force_quirks();
                self.reconsume_in(Internal::BogusDoctype);
            }
        }
        Ok(())
    }

    fn after_doctype_system_identifier_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if is_whitespace(b) => {}
            Some(b'>') => {
                self.switch_to(Internal::Data);
                self.emit_doctype();
            }
            None => {
                self.emit_error(ErrorKind::EofInDoctype);
                self.builder.set_force_quirks();
                self.emit_doctype();
                self.emit_eof();
            }
            _ => {
                self.emit_error(ErrorKind::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                self.reconsume_in(Internal::BogusDoctype);
            }
        }
        Ok(())
    }

    fn bogus_doctype_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b'>') => {
                self.switch_to(Internal::Data);
                self.emit_doctype();
            }
            Some(0) => self.emit_error(ErrorKind::UnexpectedNullCharacter),
            None => {
                self.emit_doctype();
                self.emit_eof();
            }
            _ => {}
        }
        Ok(())
    }

    // -- CDATA sections -------------------------------------------------------

    fn cdata_section_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b']') => self.switch_to(Internal::CdataSectionBracket),
            None => {
                self.emit_error(ErrorKind::EofInCdata);
                self.emit_eof();
            }
            Some(b) => {
                let c = self.cursor.decode_scalar(b)?;
                self.emit_char(c);
            }
        }
        Ok(())
    }

    fn cdata_section_bracket_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b']') => self.switch_to(Internal::CdataSectionEnd),
            _ => {
                self.emit_char(']');
                self.reconsume_in(Internal::CdataSection);
            }
        }
        Ok(())
    }

    fn cdata_section_end_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b']') => self.emit_char(']'),
            Some(b'>') => self.switch_to(Internal::Data),
            _ => {
                self.emit_char(']');
                self.emit_char(']');
                self.reconsume_in(Internal::CdataSection);
            }
        }
        Ok(())
    }

    // -- character references ------------------------------------------------

    fn character_reference_state(&mut self) -> Result<(), R::Error> {
        self.temp_buffer.clear();
        self.temp_buffer.push('&');
        match self.cursor.next()? {
            Some(b) if b.is_ascii_alphanumeric() => {
                self.reconsume_in(Internal::NamedCharacterReference);
            }
            Some(b'#') => {
                self.temp_buffer.push('#');
                self.switch_to(Internal::NumericCharacterReference);
            }
            _ => {
                let rs = self.return_state;
                self.flush_code_points_consumed_as_character_reference();
                self.reconsume_in(rs);
            }
        }
        Ok(())
    }

    fn named_character_reference_state(&mut self) -> Result<(), R::Error> {
        // character_reference_state left the first byte of the candidate reconsumed rather than
        // consumed; take it for real before peeking ahead, so the candidate and the later
        // consume loop agree on what's already been read.
        let first = self
            .cursor
            .next()?
            .expect("reconsumed byte is always present here");
        let rest = self.cursor.peek_n(entities::MAX_ENTITY_NAME_LEN - 1);
        let ascii_len = rest.iter().take_while(|b| b.is_ascii()).count();
        let mut candidate = String::with_capacity(1 + ascii_len);
        candidate.push(first as char);
        candidate.push_str(std::str::from_utf8(&rest[..ascii_len]).unwrap_or(""));

        match entities::longest_prefix_match(&candidate) {
            Some(entity) => {
                let matched = entity.name;
                self.temp_buffer.push(first as char);
                for _ in 0..matched.len() - 1 {
                    let b = self.cursor.next()?.expect("matched bytes were just peeked");
                    self.temp_buffer.push(b as char);
                }

                let ends_with_semicolon = matched.ends_with(';');
                if !ends_with_semicolon {
                    let next = self.cursor.peek();
                    let next_continues_name =
                        next == Some(b'=') || next.map_or(false, |b| b.is_ascii_alphanumeric());
                    if self.is_part_of_attribute() && next_continues_name {
                        let rs = self.return_state;
                        self.flush_code_points_consumed_as_character_reference();
                        self.switch_to(rs);
                        return Ok(());
                    }
                    self.emit_error(ErrorKind::MissingSemicolonAfterCharacterReference);
                }

                self.temp_buffer.clear();
                self.temp_buffer.push_str(entity.characters);
                let rs = self.return_state;
                self.flush_code_points_consumed_as_character_reference();
                self.switch_to(rs);
            }
            // No entity name is a prefix of the candidate: nothing beyond `first` was actually
            // matched, so put `first` back for the ambiguous ampersand state to reprocess.
            None => self.reconsume_in(Internal::AmbiguousAmpersand),
        }
        Ok(())
    }

    fn ambiguous_ampersand_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if b.is_ascii_alphanumeric() => {
                if self.is_part_of_attribute() {
                    self.builder.push_attribute_value(b as char);
                } else {
                    self.emit_char(b as char);
                }
            }
            Some(b';') => {
                self.emit_error(ErrorKind::UnknownNamedCharacterReference);
                let rs = self.return_state;
                self.reconsume_in(rs);
            }
            _ => {
                let rs = self.return_state;
                self.reconsume_in(rs);
            }
        }
        Ok(())
    }

    fn numeric_character_reference_state(&mut self) -> Result<(), R::Error> {
        self.char_ref_code = 0;
        match self.cursor.next()? {
            Some(b @ (b'x' | b'X')) => {
                self.temp_buffer.push(b as char);
                self.switch_to(Internal::HexadecimalCharacterReferenceStart);
            }
            _ => self.reconsume_in(Internal::DecimalCharacterReferenceStart),
        }
        Ok(())
    }

    fn hexadecimal_character_reference_start_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if b.is_ascii_hexdigit() => {
                self.reconsume_in(Internal::HexadecimalCharacterReference);
            }
            _ => {
                self.emit_error(ErrorKind::AbsenceOfDigitsInNumericCharacterReference);
                let rs = self.return_state;
                self.flush_code_points_consumed_as_character_reference();
                self.reconsume_in(rs);
            }
        }
        Ok(())
    }

    fn decimal_character_reference_start_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if b.is_ascii_digit() => {
                self.reconsume_in(Internal::DecimalCharacterReference);
            }
            _ => {
                self.emit_error(ErrorKind::AbsenceOfDigitsInNumericCharacterReference);
                let rs = self.return_state;
                self.flush_code_points_consumed_as_character_reference();
                self.reconsume_in(rs);
            }
        }
        Ok(())
    }

    /// Fold another digit into `char_ref_code`. On overflow, clamp to a value already past the
    /// valid Unicode range so `numeric_character_reference_end_state` reports it as such, rather
    /// than panicking on an enormous reference like `&#99999999999;`.
    fn mutate_char_ref_code(&mut self, radix: u32, digit: u32) {
        self.char_ref_code = self
            .char_ref_code
            .checked_mul(radix)
            .and_then(|code| code.checked_add(digit))
            .unwrap_or(0x0011_0000);
    }

    fn hexadecimal_character_reference_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if b.is_ascii_digit() => {
                self.mutate_char_ref_code(16, u32::from(b - b'0'));
            }
            Some(b) if b.is_ascii_uppercase() && b.is_ascii_hexdigit() => {
                self.mutate_char_ref_code(16, u32::from(b - b'A' + 10));
            }
            Some(b) if b.is_ascii_lowercase() && b.is_ascii_hexdigit() => {
                self.mutate_char_ref_code(16, u32::from(b - b'a' + 10));
            }
            Some(b';') => self.switch_to(Internal::NumericCharacterReferenceEnd),
            _ => {
                self.emit_error(ErrorKind::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(Internal::NumericCharacterReferenceEnd);
            }
        }
        Ok(())
    }

    fn decimal_character_reference_state(&mut self) -> Result<(), R::Error> {
        match self.cursor.next()? {
            Some(b) if b.is_ascii_digit() => {
                self.mutate_char_ref_code(10, u32::from(b - b'0'));
            }
            Some(b';') => self.switch_to(Internal::NumericCharacterReferenceEnd),
            _ => {
                self.emit_error(ErrorKind::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(Internal::NumericCharacterReferenceEnd);
            }
        }
        Ok(())
    }

    fn numeric_character_reference_end_state(&mut self) -> Result<(), R::Error> {
        let mut code = self.char_ref_code;

        if code == 0 {
            self.emit_error(ErrorKind::NullCharacterReference);
            code = 0xFFFD;
        } else if code > 0x10FFFF {
            self.emit_error(ErrorKind::CharacterReferenceOutsideUnicodeRange);
            code = 0xFFFD;
        } else if is_surrogate(code) {
            self.emit_error(ErrorKind::SurrogateCharacterReference);
            code = 0xFFFD;
        } else if is_noncharacter(code) {
            self.emit_error(ErrorKind::NoncharacterCharacterReference);
        } else if is_flagged_control(code) {
            self.emit_error(ErrorKind::ControlCharacterReference);
            if let Some(remapped) = remap_c1_control(code) {
                code = remapped;
            }
        }

        self.temp_buffer.clear();
        self.temp_buffer
            .push(char::from_u32(code).unwrap_or('\u{FFFD}'));

        let rs = self.return_state;
        self.flush_code_points_consumed_as_character_reference();
        self.switch_to(rs);
        Ok(())
    }
}
