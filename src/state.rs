//! The tokenizer's internal states, and the small subset of them a caller is allowed to switch
//! into directly.

/// A tokenizer start state a tree constructor may switch into before the next tag, to parse
/// `<script>`, `<textarea>`, `<title>`, `<style>`, `<xmp>` and similar elements' content
/// correctly.
///
/// This is deliberately a small, closed set: it mirrors the states the HTML parsing algorithm
/// itself is ever told to "switch the tokenizer to" from outside the tokenizer (see
/// [`crate::Tokenizer::set_state`]). The other ~74 states exist only inside [`crate::machine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum State {
    /// Ordinary text content.
    Data,
    /// `<textarea>`, `<title>`: text content in which character references are recognized but
    /// tags are not.
    RcData,
    /// `<style>`, `<xmp>`, `<iframe>`, `<noembed>`, `<noframes>`: text content in which neither
    /// character references nor tags are recognized, only the matching end tag.
    RawText,
    /// `<script>`: like raw text, but with its own escape/double-escape sub-machine.
    ScriptData,
    /// Used only for the synthetic "plaintext" element: once entered, never exited.
    PlainText,
    /// `<![CDATA[ ... ]]>` sections, used only in foreign (SVG/MathML) content.
    CdataSection,
}

impl Default for State {
    fn default() -> Self {
        State::Data
    }
}

/// The complete internal state machine, a superset of the public [`State`].
///
/// This has exactly one variant per state named in the WHATWG tokenization algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Internal {
    Data,
    RcData,
    RawText,
    ScriptData,
    PlainText,
    TagOpen,
    EndTagOpen,
    TagName,
    RcDataLessThanSign,
    RcDataEndTagOpen,
    RcDataEndTagName,
    RawTextLessThanSign,
    RawTextEndTagOpen,
    RawTextEndTagName,
    ScriptDataLessThanSign,
    ScriptDataEndTagOpen,
    ScriptDataEndTagName,
    ScriptDataEscapeStart,
    ScriptDataEscapeStartDash,
    ScriptDataEscaped,
    ScriptDataEscapedDash,
    ScriptDataEscapedDashDash,
    ScriptDataEscapedLessThanSign,
    ScriptDataEscapedEndTagOpen,
    ScriptDataEscapedEndTagName,
    ScriptDataDoubleEscapeStart,
    ScriptDataDoubleEscaped,
    ScriptDataDoubleEscapedDash,
    ScriptDataDoubleEscapedDashDash,
    ScriptDataDoubleEscapedLessThanSign,
    ScriptDataDoubleEscapeEnd,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueDoubleQuoted,
    AttributeValueSingleQuoted,
    AttributeValueUnquoted,
    AfterAttributeValueQuoted,
    SelfClosingStartTag,
    BogusComment,
    MarkupDeclarationOpen,
    CommentStart,
    CommentStartDash,
    Comment,
    CommentLessThanSign,
    CommentLessThanSignBang,
    CommentLessThanSignBangDash,
    CommentLessThanSignBangDashDash,
    CommentEndDash,
    CommentEnd,
    CommentEndBang,
    Doctype,
    BeforeDoctypeName,
    DoctypeName,
    AfterDoctypeName,
    AfterDoctypePublicKeyword,
    BeforeDoctypePublicIdentifier,
    DoctypePublicIdentifierDoubleQuoted,
    DoctypePublicIdentifierSingleQuoted,
    AfterDoctypePublicIdentifier,
    BetweenDoctypePublicAndSystemIdentifiers,
    AfterDoctypeSystemKeyword,
    BeforeDoctypeSystemIdentifier,
    DoctypeSystemIdentifierDoubleQuoted,
    DoctypeSystemIdentifierSingleQuoted,
    AfterDoctypeSystemIdentifier,
    BogusDoctype,
    CdataSection,
    CdataSectionBracket,
    CdataSectionEnd,
    CharacterReference,
    NamedCharacterReference,
    AmbiguousAmpersand,
    NumericCharacterReference,
    HexadecimalCharacterReferenceStart,
    DecimalCharacterReferenceStart,
    HexadecimalCharacterReference,
    DecimalCharacterReference,
    NumericCharacterReferenceEnd,
}

impl From<State> for Internal {
    fn from(s: State) -> Self {
        match s {
            State::Data => Internal::Data,
            State::RcData => Internal::RcData,
            State::RawText => Internal::RawText,
            State::ScriptData => Internal::ScriptData,
            State::PlainText => Internal::PlainText,
            State::CdataSection => Internal::CdataSection,
        }
    }
}

/// Best-effort mapping from a just-emitted start tag name to the state the tokenizer should
/// probably switch to next, for callers that don't want to hand-write a full tree constructor.
///
/// This approximates, rather than replaces, the tree construction stage's decision (which also
/// depends on namespace and open-elements context); it is documented and opt-in for exactly that
/// reason.
#[must_use]
pub fn naive_next_state(tag_name: &str) -> Option<State> {
    Some(match tag_name {
        "title" | "textarea" => State::RcData,
        "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => State::RawText,
        "script" => State::ScriptData,
        "plaintext" => State::PlainText,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_next_state_covers_common_raw_text_elements() {
        assert_eq!(naive_next_state("script"), Some(State::ScriptData));
        assert_eq!(naive_next_state("textarea"), Some(State::RcData));
        assert_eq!(naive_next_state("style"), Some(State::RawText));
        assert_eq!(naive_next_state("div"), None);
    }
}
