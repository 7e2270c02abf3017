//! Shared types for arc-standard dependency parsing.
//!
//! - [`token`] -- `Token` and `Sentence` records with gold heads
//! - [`enums`] -- the `Operator` enumeration and its stable integer encoding
//! - [`vocab`] -- value-to-id vocabularies with `<pad>`/`<unk>`/`<ROOT>` sentinels
//! - [`config`] -- immutable parser configuration
//! - [`conllu`] -- CoNLL-U corpus reading and writing

pub mod config;
pub mod conllu;
pub mod enums;
pub mod token;
pub mod vocab;

pub use config::{ConfigError, ParserConfig};
pub use conllu::CorpusError;
pub use enums::Operator;
pub use token::{Sentence, Token};
pub use vocab::{FeatureVocabularies, Vocabulary};
