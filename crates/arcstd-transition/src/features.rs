// Feature windows: the top two stack slots encoded through vocabularies.

use arcstd_core::vocab::{PAD_ID, ROOT_ID, UNK_ID};
use arcstd_core::{FeatureVocabularies, Operator, ParserConfig, Token};
use serde::{Deserialize, Serialize};

use crate::state::ParseState;

/// Vocabulary ids of one token, one per configured attribute.
pub type TokenFeatures = Vec<u32>;

/// One training example: the window seen before a step and the operator
/// taken at that step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// `[top, second-from-top]`.
    pub window: [TokenFeatures; 2],
    pub operator: Operator,
}

/// Encodes stack slots through per-attribute vocabularies.
///
/// Every window has exactly two slots. A slot with no real token behind it
/// (the sentinel, or nothing at all on a fresh stack) is encoded as
/// `<ROOT>` for every attribute.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    attributes: Vec<String>,
    vocabs: FeatureVocabularies,
}

impl FeatureExtractor {
    pub fn new(config: &ParserConfig, vocabs: FeatureVocabularies) -> Self {
        Self {
            attributes: config.features.clone(),
            vocabs,
        }
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn vocabularies(&self) -> &FeatureVocabularies {
        &self.vocabs
    }

    /// Encode one token; `None` stands for ROOT.
    ///
    /// Empty or absent attribute values encode as `<pad>`; values missing
    /// from the vocabulary (or attributes with no vocabulary) as `<unk>`.
    pub fn token_features(&self, token: Option<&Token>) -> TokenFeatures {
        let Some(token) = token else {
            return vec![ROOT_ID; self.attributes.len()];
        };
        self.attributes
            .iter()
            .map(|name| match token.attribute(name) {
                None | Some("") => PAD_ID,
                Some(value) => self.vocabs.get(name).map_or(UNK_ID, |v| v.id(value)),
            })
            .collect()
    }

    /// Window of the current state: `[top, second-from-top]`.
    pub fn window(&self, state: &ParseState<'_>) -> [TokenFeatures; 2] {
        let top = state.top().and_then(|p| state.token(p));
        let second = state.second().and_then(|p| state.token(p));
        [self.token_features(top), self.token_features(second)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcstd_core::token::{ATTR_FORM, ATTR_LEMMA};
    use arcstd_core::{Sentence, Vocabulary};

    fn extractor(features: &[&str]) -> FeatureExtractor {
        let config = ParserConfig {
            features: features.iter().map(|f| f.to_string()).collect(),
            ..ParserConfig::default()
        };
        let mut vocabs = FeatureVocabularies::default();
        vocabs.insert(ATTR_FORM, Vocabulary::from_values(["the", "dog"]));
        FeatureExtractor::new(&config, vocabs)
    }

    #[test]
    fn root_slot_uses_root_id_everywhere() {
        let ex = extractor(&[ATTR_FORM, ATTR_LEMMA]);
        assert_eq!(ex.token_features(None), vec![ROOT_ID, ROOT_ID]);
    }

    #[test]
    fn unknown_and_empty_values() {
        let ex = extractor(&[ATTR_FORM, ATTR_LEMMA, "misc"]);
        let tok = Token::new(1, Some(0)).with_form("cat").with_lemma("cat");
        // form: unseen value, lemma: no vocabulary, misc: absent attribute
        assert_eq!(ex.token_features(Some(&tok)), vec![UNK_ID, UNK_ID, PAD_ID]);

        let tok = Token::new(1, Some(0)).with_form("dog");
        assert_eq!(ex.token_features(Some(&tok)), vec![4, PAD_ID, PAD_ID]);
    }

    #[test]
    fn window_pads_with_root() {
        let ex = extractor(&[ATTR_FORM]);
        let s = Sentence::new(vec![
            Token::new(1, Some(2)).with_form("the"),
            Token::new(2, Some(0)).with_form("dog"),
        ]);
        let mut state = ParseState::new(&s);
        assert_eq!(ex.window(&state), [vec![ROOT_ID], vec![ROOT_ID]]);
        state.apply(Operator::Shift).unwrap();
        assert_eq!(ex.window(&state), [vec![3], vec![ROOT_ID]]);
        state.apply(Operator::Shift).unwrap();
        assert_eq!(ex.window(&state), [vec![4], vec![3]]);
    }

    #[test]
    fn sample_serializes_operator_by_name() {
        let sample = Sample {
            window: [vec![3], vec![ROOT_ID]],
            operator: Operator::LeftArc,
        };
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"{"window":[[3],[2]],"operator":"leftArc"}"#);
    }
}
