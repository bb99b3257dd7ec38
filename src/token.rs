//! Tokens produced by the tokenizer, and the scratch buffers used to build them incrementally.

/// A DOCTYPE token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Doctype {
    /// The DOCTYPE name, e.g. `html`. Absent if the tokenizer never saw one.
    pub name: Option<String>,
    /// The public identifier, if any.
    pub public_id: Option<String>,
    /// The system identifier, if any.
    pub system_id: Option<String>,
    /// Whether the tree constructor should be told to operate in quirks mode.
    pub force_quirks: bool,
}

/// A start tag token, e.g. `<div class="a">`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StartTag {
    /// The tag name, lowercased per the state machine's case-folding rule.
    pub name: String,
    /// Whether the tag was closed with `/>`.
    pub self_closing: bool,
    /// The tag's attributes, in source order, first-value-wins on duplicates.
    pub attributes: Attributes,
}

/// An end tag token, e.g. `</div>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EndTag {
    /// The tag name, lowercased per the state machine's case-folding rule.
    pub name: String,
}

/// A single tokenizer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A `<!DOCTYPE ...>` token.
    Doctype(Doctype),
    /// A start tag token.
    StartTag(StartTag),
    /// An end tag token.
    EndTag(EndTag),
    /// A comment token, `<!-- ... -->`.
    Comment(String),
    /// A single Unicode scalar value of character data.
    ///
    /// Unlike emitters that coalesce runs of character data into strings, this tokenizer emits
    /// one token per scalar value, matching the state machine's "emit the current input
    /// character as a character token" wording literally.
    Character(char),
    /// The end-of-file token. Once emitted, every subsequent call to
    /// [`crate::Tokenizer::next_token`] emits it again.
    EndOfFile,
}

/// An ordered attribute list: source order is preserved, and the first occurrence of a given
/// name wins on duplicates (per the state machine's duplicate-attribute rule).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub(crate) fn new() -> Self {
        Attributes {
            entries: Vec::new(),
        }
    }

    /// Insert `name`/`value` unless `name` is already present. Returns `true` if `name` was
    /// already present (a duplicate attribute, which the caller should report as a parse error
    /// and whose value must be discarded).
    pub(crate) fn insert(&mut self, name: String, value: String) -> bool {
        if self.entries.iter().any(|(n, _)| *n == name) {
            true
        } else {
            self.entries.push((name, value));
            false
        }
    }

    /// The value for `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The number of distinct attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl From<Vec<(String, String)>> for Attributes {
    /// Build an attribute list directly from `(name, value)` pairs, first-wins on duplicate
    /// names. Used by the test fixture harness to construct expected-output tokens; the
    /// tokenizer itself always builds `Attributes` incrementally via `insert`.
    fn from(pairs: Vec<(String, String)>) -> Self {
        let mut attrs = Attributes::new();
        for (name, value) in pairs {
            attrs.insert(name, value);
        }
        attrs
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Which kind of token is currently under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagKind {
    Start,
    End,
}

/// Accumulates the partial fields of the token currently being built, and flushes them into a
/// complete [`Token`] on [`TokenBuilder::complete_tag`] / [`TokenBuilder::complete_doctype`] /
/// [`TokenBuilder::complete_comment`].
///
/// One `TokenBuilder` is owned by the tokenizer for its whole lifetime; it also remembers the
/// name of the last emitted start tag, needed to answer "is this an appropriate end tag token".
pub(crate) struct TokenBuilder {
    tag_kind: TagKind,
    tag_name: String,
    self_closing: bool,
    attributes: Attributes,
    current_attr_name: String,
    current_attr_value: String,
    have_current_attr: bool,

    comment: String,

    doctype_name: Option<String>,
    doctype_public_id: Option<String>,
    doctype_system_id: Option<String>,
    force_quirks: bool,

    last_start_tag_name: Option<String>,
}

impl TokenBuilder {
    pub(crate) fn new() -> Self {
        TokenBuilder {
            tag_kind: TagKind::Start,
            tag_name: String::new(),
            self_closing: false,
            attributes: Attributes::new(),
            current_attr_name: String::new(),
            current_attr_value: String::new(),
            have_current_attr: false,
            comment: String::new(),
            doctype_name: None,
            doctype_public_id: None,
            doctype_system_id: None,
            force_quirks: false,
            last_start_tag_name: None,
        }
    }

    // -- tag construction -------------------------------------------------

    pub(crate) fn init_tag(&mut self, kind: TagKind) {
        self.tag_kind = kind;
        self.tag_name.clear();
        self.self_closing = false;
        self.attributes = Attributes::new();
        self.have_current_attr = false;
    }

    pub(crate) fn push_tag_name(&mut self, c: char) {
        self.tag_name.push(c);
    }

    pub(crate) fn set_self_closing(&mut self) {
        self.self_closing = true;
    }

    /// Start accumulating a new attribute. Any in-progress attribute is flushed first.
    pub(crate) fn start_attribute(&mut self) {
        self.flush_attribute();
        self.current_attr_name.clear();
        self.current_attr_value.clear();
        self.have_current_attr = true;
    }

    pub(crate) fn push_attribute_name(&mut self, c: char) {
        self.current_attr_name.push(c);
    }

    pub(crate) fn push_attribute_value(&mut self, c: char) {
        self.current_attr_value.push(c);
    }

    /// Move the in-progress attribute into the attribute list, reporting whether its name
    /// duplicated an earlier one (in which case its value is discarded, per the state machine).
    pub(crate) fn flush_attribute(&mut self) -> Option<bool> {
        if !self.have_current_attr {
            return None;
        }
        self.have_current_attr = false;
        let name = std::mem::take(&mut self.current_attr_name);
        let value = std::mem::take(&mut self.current_attr_value);
        Some(self.attributes.insert(name, value))
    }

    #[must_use]
    pub(crate) fn is_appropriate_end_tag(&self) -> bool {
        self.tag_kind == TagKind::End
            && self.last_start_tag_name.as_deref() == Some(self.tag_name.as_str())
    }

    /// Whether the tag under construction is an end tag carrying at least one attribute, a
    /// construct the tree constructor must see but which conformance checkers flag.
    #[must_use]
    pub(crate) fn is_end_tag_with_attributes(&self) -> bool {
        self.tag_kind == TagKind::End && !self.attributes.is_empty()
    }

    /// Whether the tag under construction is an end tag marked self-closing with a trailing `/`.
    #[must_use]
    pub(crate) fn is_end_tag_with_trailing_solidus(&self) -> bool {
        self.tag_kind == TagKind::End && self.self_closing
    }

    pub(crate) fn complete_tag(&mut self) -> Token {
        self.flush_attribute();
        let name = std::mem::take(&mut self.tag_name);
        let attributes = std::mem::replace(&mut self.attributes, Attributes::new());
        match self.tag_kind {
            TagKind::Start => {
                self.last_start_tag_name = Some(name.clone());
                Token::StartTag(StartTag {
                    name,
                    self_closing: self.self_closing,
                    attributes,
                })
            }
            TagKind::End => Token::EndTag(EndTag { name }),
        }
    }

    // -- comment construction ----------------------------------------------

    pub(crate) fn init_comment(&mut self) {
        self.comment.clear();
    }

    pub(crate) fn push_comment(&mut self, c: char) {
        self.comment.push(c);
    }

    pub(crate) fn push_comment_str(&mut self, s: &str) {
        self.comment.push_str(s);
    }

    pub(crate) fn complete_comment(&mut self) -> Token {
        Token::Comment(std::mem::take(&mut self.comment))
    }

    // -- doctype construction -----------------------------------------------

    pub(crate) fn init_doctype(&mut self) {
        self.doctype_name = None;
        self.doctype_public_id = None;
        self.doctype_system_id = None;
        self.force_quirks = false;
    }

    pub(crate) fn push_doctype_name(&mut self, c: char) {
        self.doctype_name.get_or_insert_with(String::new).push(c);
    }

    pub(crate) fn set_doctype_public_id_present(&mut self) {
        self.doctype_public_id.get_or_insert_with(String::new);
    }

    pub(crate) fn push_doctype_public_id(&mut self, c: char) {
        self.doctype_public_id
            .get_or_insert_with(String::new)
            .push(c);
    }

    pub(crate) fn set_doctype_system_id_present(&mut self) {
        self.doctype_system_id.get_or_insert_with(String::new);
    }

    pub(crate) fn push_doctype_system_id(&mut self, c: char) {
        self.doctype_system_id
            .get_or_insert_with(String::new)
            .push(c);
    }

    pub(crate) fn set_force_quirks(&mut self) {
        self.force_quirks = true;
    }

    pub(crate) fn complete_doctype(&mut self) -> Token {
        Token::Doctype(Doctype {
            name: self.doctype_name.take(),
            public_id: self.doctype_public_id.take(),
            system_id: self.doctype_system_id.take(),
            force_quirks: self.force_quirks,
        })
    }

    pub(crate) fn set_last_start_tag_name(&mut self, name: Option<String>) {
        self.last_start_tag_name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_preserve_insertion_order() {
        let mut attrs = Attributes::new();
        assert!(!attrs.insert("b".into(), "2".into()));
        assert!(!attrs.insert("a".into(), "1".into()));
        let names: Vec<_> = attrs.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn attributes_first_value_wins_on_duplicate() {
        let mut attrs = Attributes::new();
        assert!(!attrs.insert("class".into(), "first".into()));
        assert!(attrs.insert("class".into(), "second".into()));
        assert_eq!(attrs.get("class"), Some("first"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn appropriate_end_tag_matches_last_start_tag() {
        let mut b = TokenBuilder::new();
        b.init_tag(TagKind::Start);
        b.push_tag_name('a');
        b.complete_tag();

        b.init_tag(TagKind::End);
        b.push_tag_name('a');
        assert!(b.is_appropriate_end_tag());

        b.init_tag(TagKind::End);
        b.push_tag_name('b');
        assert!(!b.is_appropriate_end_tag());
    }
}
