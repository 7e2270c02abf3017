// Token and Sentence records: one syntactic word with its gold head.

use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Attribute names
// ---------------------------------------------------------------------------

pub const ATTR_FORM: &str = "form";
pub const ATTR_LEMMA: &str = "lemma";
pub const ATTR_UPOS: &str = "upos";
pub const ATTR_XPOS: &str = "xpos";
pub const ATTR_DEPREL: &str = "deprel";
pub const ATTR_FEATS: &str = "feats";
pub const ATTR_DEPS: &str = "deps";
pub const ATTR_MISC: &str = "misc";

/// Attributes stored as named fields on [`Token`].
pub const TYPED_ATTRIBUTES: [&str; 5] = [ATTR_FORM, ATTR_LEMMA, ATTR_UPOS, ATTR_XPOS, ATTR_DEPREL];

/// Id reserved for the synthetic ROOT token.
pub const ROOT_ID: usize = 0;

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// One token of an annotated sentence.
///
/// Tokens are read-only once built: the builder methods consume `self` and
/// there is no way to change `id` or `head` afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Token {
    id: usize,
    head: Option<usize>,
    form: String,
    lemma: String,
    upos: String,
    xpos: String,
    deprel: String,
    /// Remaining columns (`feats`, `deps`, `misc`, ...) in name order.
    extra: BTreeMap<String, String>,
}

impl Token {
    /// Create a token with the given 1-based id and gold head.
    ///
    /// A head of `Some(0)` attaches the token to ROOT; `None` means the
    /// annotation carries no head.
    pub fn new(id: usize, head: Option<usize>) -> Self {
        Self {
            id,
            head,
            ..Self::default()
        }
    }

    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.form = form.into();
        self
    }

    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = lemma.into();
        self
    }

    pub fn with_upos(mut self, upos: impl Into<String>) -> Self {
        self.upos = upos.into();
        self
    }

    pub fn with_xpos(mut self, xpos: impl Into<String>) -> Self {
        self.xpos = xpos.into();
        self
    }

    pub fn with_deprel(mut self, deprel: impl Into<String>) -> Self {
        self.deprel = deprel.into();
        self
    }

    /// Set an attribute by name. Typed attributes go to their field,
    /// anything else to the ordered extra map.
    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match name {
            ATTR_FORM => self.form = value,
            ATTR_LEMMA => self.lemma = value,
            ATTR_UPOS => self.upos = value,
            ATTR_XPOS => self.xpos = value,
            ATTR_DEPREL => self.deprel = value,
            _ => {
                self.extra.insert(name.to_string(), value);
            }
        }
        self
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    pub fn form(&self) -> &str {
        &self.form
    }

    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    pub fn upos(&self) -> &str {
        &self.upos
    }

    pub fn xpos(&self) -> &str {
        &self.xpos
    }

    pub fn deprel(&self) -> &str {
        &self.deprel
    }

    /// Look up an attribute by name.
    ///
    /// Used by the configurable feature list. Returns `None` for unknown
    /// names; typed attributes always resolve (possibly to `""`).
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            ATTR_FORM => Some(&self.form),
            ATTR_LEMMA => Some(&self.lemma),
            ATTR_UPOS => Some(&self.upos),
            ATTR_XPOS => Some(&self.xpos),
            ATTR_DEPREL => Some(&self.deprel),
            _ => self.extra.get(name).map(String::as_str),
        }
    }

    /// Non-typed attributes, in name order.
    pub fn extra_attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Sentence
// ---------------------------------------------------------------------------

/// An ordered list of tokens, normally with ids `1..=n`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sentence {
    tokens: Vec<Token>,
}

impl Sentence {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Build a bare sentence from gold heads (`heads[i]` is the head of
    /// token `i + 1`). Handy for tests and synthetic data.
    pub fn from_heads(heads: &[usize]) -> Self {
        let tokens = heads
            .iter()
            .enumerate()
            .map(|(i, &h)| Token::new(i + 1, Some(h)))
            .collect();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token with the given id, assuming ids are `1..=n` in order.
    /// Returns `None` for ROOT and for out-of-range ids.
    pub fn token(&self, id: usize) -> Option<&Token> {
        if id == ROOT_ID {
            return None;
        }
        self.tokens.get(id - 1).filter(|t| t.id == id)
    }

    /// Gold head of the token with the given id.
    pub fn gold_head(&self, id: usize) -> Option<usize> {
        self.token(id).and_then(Token::head)
    }

    /// Gold heads in token order.
    pub fn gold_heads(&self) -> Vec<Option<usize>> {
        self.tokens.iter().map(Token::head).collect()
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

impl From<Vec<Token>> for Sentence {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}
