//! A small `html5lib-tests`-shaped fixture harness.
//!
//! Fixtures live under `tests/fixtures/*.test` using the same JSON shape as the upstream
//! `html5lib-tests` tokenizer suite, with two deliberate differences: `output` lists one
//! `Character` entry per Unicode scalar value rather than coalescing runs into a single string,
//! matching this tokenizer's per-scalar-value `Character` token (see `src/token.rs`); and a start
//! tag's attributes are written as an ordered `[[name, value], ...]` list rather than a JSON
//! object, since source order is part of what `Attributes` compares equal on and a bare JSON
//! object has no guaranteed order without extra tooling.

use std::{fs::File, io::BufReader, path::Path};

use glob::glob;
use pretty_assertions::assert_eq;
use serde::Deserialize;

use tagbreak::{Doctype, EndTag, StartTag, State, Token, Tokenizer};

#[cfg(not(feature = "integration-tests"))]
compile_error!(
    "integration tests need the integration-tests feature enabled. Run cargo test --all-features"
);

macro_rules! literal_tag {
    ($name:ident, $value:literal) => {
        #[derive(Deserialize)]
        enum $name {
            #[serde(rename = $value)]
            $name,
        }
    };
}

literal_tag!(DoctypeTag, "DOCTYPE");
literal_tag!(StartTagTag, "StartTag");
literal_tag!(EndTagTag, "EndTag");
literal_tag!(CommentTag, "Comment");
literal_tag!(CharacterTag, "Character");

#[derive(Deserialize)]
#[serde(untagged)]
enum OutputToken {
    Doctype(
        (
            DoctypeTag,
            Option<String>,
            Option<String>,
            Option<String>,
            bool,
        ),
    ),
    StartTagSelfClosing((StartTagTag, String, Vec<(String, String)>, bool)),
    StartTag((StartTagTag, String, Vec<(String, String)>)),
    EndTag((EndTagTag, String)),
    Comment((CommentTag, String)),
    Character((CharacterTag, String)),
}

impl From<OutputToken> for Token {
    fn from(output: OutputToken) -> Token {
        match output {
            OutputToken::Doctype((_, name, public_id, system_id, correct)) => {
                Token::Doctype(Doctype {
                    name,
                    public_id,
                    system_id,
                    force_quirks: !correct,
                })
            }
            OutputToken::StartTag((_, name, attributes)) => Token::StartTag(StartTag {
                name,
                self_closing: false,
                attributes: attributes.into(),
            }),
            OutputToken::StartTagSelfClosing((_, name, attributes, self_closing)) => {
                Token::StartTag(StartTag {
                    name,
                    self_closing,
                    attributes: attributes.into(),
                })
            }
            OutputToken::EndTag((_, name)) => Token::EndTag(EndTag { name }),
            OutputToken::Comment((_, data)) => Token::Comment(data),
            OutputToken::Character((_, data)) => {
                Token::Character(data.chars().next().expect("empty Character fixture entry"))
            }
        }
    }
}

fn initial_state_from_str(s: &str) -> State {
    match s {
        "Data state" => State::Data,
        "PLAINTEXT state" => State::PlainText,
        "RCDATA state" => State::RcData,
        "RAWTEXT state" => State::RawText,
        "Script data state" => State::ScriptData,
        "CDATA section state" => State::CdataSection,
        other => panic!("unknown initial state {other:?}"),
    }
}

#[derive(Deserialize)]
struct TestFileEntry {
    description: String,
    input: String,
    output: Vec<OutputToken>,
    #[serde(default, rename = "initialStates")]
    initial_states: Vec<String>,
    #[serde(default, rename = "lastStartTag")]
    last_start_tag: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Deserialize)]
struct TestFile {
    tests: Vec<TestFileEntry>,
}

fn run_fixture_file(path: &Path) {
    let f = File::open(path).unwrap_or_else(|e| panic!("{}: {e}", path.display()));
    let file: TestFile = serde_json::from_reader(BufReader::new(f))
        .unwrap_or_else(|e| panic!("{}: {e}", path.display()));

    for entry in file.tests {
        let states = if entry.initial_states.is_empty() {
            vec!["Data state".to_owned()]
        } else {
            entry.initial_states.clone()
        };
        let expected_tokens: Vec<Token> =
            entry.output.into_iter().map(Token::from).collect();

        for state_name in &states {
            let mut tokenizer = Tokenizer::new(entry.input.as_str());
            tokenizer.set_state(initial_state_from_str(state_name));
            tokenizer.set_last_start_tag(entry.last_start_tag.as_deref());

            let mut actual_tokens = Vec::new();
            let mut actual_errors = Vec::new();
            loop {
                let token = tokenizer.next_token().unwrap();
                while let Some(err) = tokenizer.take_error() {
                    actual_errors.push(err.kind.as_str().to_owned());
                }
                if token == Token::EndOfFile {
                    break;
                }
                actual_tokens.push(token);
            }

            assert_eq!(
                actual_tokens, expected_tokens,
                "{}: {} ({state_name})",
                path.display(),
                entry.description
            );
            assert_eq!(
                actual_errors, entry.errors,
                "{}: {} ({state_name})",
                path.display(),
                entry.description
            );
        }
    }
}

#[test]
fn fixtures() {
    let mut any = false;
    for entry in glob("tests/fixtures/*.test").unwrap() {
        any = true;
        run_fixture_file(&entry.unwrap());
    }
    assert!(any, "no fixtures found under tests/fixtures/*.test");
}
