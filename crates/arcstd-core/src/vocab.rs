// Feature vocabularies: attribute value -> dense integer id.

use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::token::Sentence;

pub const PAD: &str = "<pad>";
pub const UNK: &str = "<unk>";
pub const ROOT: &str = "<ROOT>";

pub const PAD_ID: u32 = 0;
pub const UNK_ID: u32 = 1;
pub const ROOT_ID: u32 = 2;

/// Bidirectional mapping between attribute values and dense ids.
///
/// Ids `0..3` are always the sentinels `<pad>`, `<unk>` and `<ROOT>`;
/// observed values follow in first-seen order. A vocabulary built on one
/// split is applied unchanged to the others, so values never seen at build
/// time map to `<unk>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    index: HashMap<String, u32>,
    values: Vec<String>,
}

// Never empty: the sentinels are always present.
#[allow(clippy::len_without_is_empty)]
impl Vocabulary {
    /// A vocabulary holding only the sentinels.
    pub fn new() -> Self {
        let mut vocab = Self {
            index: HashMap::new(),
            values: Vec::new(),
        };
        for sentinel in [PAD, UNK, ROOT] {
            vocab.insert(sentinel);
        }
        vocab
    }

    /// Build from observed values. Duplicates are ignored.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = Self::new();
        for value in values {
            vocab.insert(value.as_ref());
        }
        vocab
    }

    /// Add a value if absent and return its id.
    pub fn insert(&mut self, value: &str) -> u32 {
        if let Some(&id) = self.index.get(value) {
            return id;
        }
        let id = self.values.len() as u32;
        self.values.push(value.to_string());
        self.index.insert(value.to_string(), id);
        id
    }

    /// Id for a value, falling back to `<unk>`.
    #[inline]
    pub fn id(&self, value: &str) -> u32 {
        self.lookup(value).unwrap_or(UNK_ID)
    }

    /// Id for a value, or `None` if it was never inserted.
    pub fn lookup(&self, value: &str) -> Option<u32> {
        self.index.get(value).copied()
    }

    /// Value for an id.
    pub fn value(&self, id: u32) -> Option<&str> {
        self.values.get(id as usize).map(String::as_str)
    }

    /// Number of entries, sentinels included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vocabulary holds nothing beyond the sentinels.
    pub fn has_only_sentinels(&self) -> bool {
        self.values.len() <= ROOT_ID as usize + 1
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

/// One [`Vocabulary`] per feature attribute.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeatureVocabularies {
    by_attribute: BTreeMap<String, Vocabulary>,
}

impl FeatureVocabularies {
    /// Build vocabularies for `attributes` from every token of `corpus`.
    /// Empty values are not recorded; they map to `<pad>` at lookup time.
    pub fn build<'a, I, S>(attributes: &[S], corpus: I) -> Self
    where
        I: IntoIterator<Item = &'a Sentence>,
        S: AsRef<str>,
    {
        let mut by_attribute: BTreeMap<String, Vocabulary> = attributes
            .iter()
            .map(|a| (a.as_ref().to_string(), Vocabulary::new()))
            .collect();

        for sentence in corpus {
            for token in sentence.tokens() {
                for (name, vocab) in by_attribute.iter_mut() {
                    if let Some(value) = token.attribute(name).filter(|v| !v.is_empty()) {
                        vocab.insert(value);
                    }
                }
            }
        }

        Self { by_attribute }
    }

    pub fn get(&self, attribute: &str) -> Option<&Vocabulary> {
        self.by_attribute.get(attribute)
    }

    pub fn insert(&mut self, attribute: impl Into<String>, vocab: Vocabulary) {
        self.by_attribute.insert(attribute.into(), vocab);
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.by_attribute.keys().map(String::as_str)
    }
}
