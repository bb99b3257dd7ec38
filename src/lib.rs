//! A streaming tokenizer for HTML as defined by the WHATWG HTML Living Standard's
//! "Tokenization" section.
//!
//! ```
//! use tagbreak::{Token, Tokenizer};
//!
//! let mut tokens = Vec::new();
//! for token in Tokenizer::new("<p>hi</p>").infallible() {
//!     tokens.push(token);
//! }
//! assert!(matches!(tokens.first(), Some(Token::StartTag(_))));
//! ```
//!
//! Tree construction, DOM building, and source-encoding sniffing are out of scope: this crate
//! hands a tree constructor an ordered stream of tokens and a parallel stream of named parse
//! errors, and nothing more.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

mod cursor;
mod entities;
mod error;
mod machine;
mod never;
mod reader;
mod state;
mod token;
mod tokenizer;
mod trace;

pub use error::{ErrorKind, ParseError};
pub use never::Never;
pub use reader::{Readable, Reader, StringReader};
pub use state::naive_next_state;
#[cfg(feature = "integration-tests")]
pub use state::State;
#[cfg(not(feature = "integration-tests"))]
use state::State;
pub use token::{Attributes, Doctype, EndTag, StartTag, Token};
pub use tokenizer::{InfallibleTokenizer, Tokenizer};
