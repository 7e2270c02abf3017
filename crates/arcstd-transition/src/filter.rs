// Projectivity filter: keep only the sentences the oracle can reduce.

use arcstd_core::Sentence;

use crate::ParseFailure;
use crate::features::{FeatureExtractor, Sample};
use crate::oracle::TransitionOracle;

/// A sentence dropped by the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Position of the sentence in the input corpus.
    pub index: usize,
    pub failure: ParseFailure,
}

/// Result of filtering one corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filtered {
    /// Reducible sentences, in their original order.
    pub kept: Vec<Sentence>,
    pub rejected: Vec<Rejection>,
}

/// Train/validation/test triple.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Splits<T> {
    pub train: T,
    pub validation: T,
    pub test: T,
}

impl<T> Splits<T> {
    pub fn map<U>(self, mut f: impl FnMut(&'static str, T) -> U) -> Splits<U> {
        Splits {
            train: f("train", self.train),
            validation: f("validation", self.validation),
            test: f("test", self.test),
        }
    }
}

/// Drops sentences whose gold tree the oracle cannot fully reduce.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeProjectivityFilter {
    oracle: TransitionOracle,
}

impl TreeProjectivityFilter {
    pub fn new(oracle: TransitionOracle) -> Self {
        Self { oracle }
    }

    /// Split a corpus into reducible sentences and rejections.
    pub fn filter(&self, sentences: Vec<Sentence>) -> Filtered {
        let mut filtered = Filtered::default();
        for (index, sentence) in sentences.into_iter().enumerate() {
            match self.oracle.try_reduce(&sentence) {
                Ok(_) => filtered.kept.push(sentence),
                Err(failure) => {
                    tracing::debug!(index, %failure, "dropping sentence");
                    filtered.rejected.push(Rejection { index, failure });
                }
            }
        }
        filtered
    }

    /// Filter each split on its own content.
    pub fn filter_splits(&self, splits: Splits<Vec<Sentence>>) -> Splits<Filtered> {
        splits.map(|name, sentences| {
            let total = sentences.len();
            let filtered = self.filter(sentences);
            tracing::info!(
                split = name,
                total,
                kept = filtered.kept.len(),
                rejected = filtered.rejected.len(),
                "filtered split"
            );
            filtered
        })
    }
}

/// Training samples for the reducible sentences of a corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    /// Per kept sentence, its samples in step order.
    pub samples: Vec<Vec<Sample>>,
    /// Input indices of the kept sentences, parallel to `samples`.
    pub indices: Vec<usize>,
    pub rejected: Vec<Rejection>,
}

/// Run the oracle over a corpus and collect samples, dropping failures.
pub fn build_dataset(
    oracle: &TransitionOracle,
    extractor: &FeatureExtractor,
    sentences: &[Sentence],
) -> Dataset {
    let mut dataset = Dataset::default();
    for (index, sentence) in sentences.iter().enumerate() {
        match oracle.samples(sentence, extractor) {
            Ok(samples) => {
                dataset.samples.push(samples);
                dataset.indices.push(index);
            }
            Err(failure) => {
                tracing::debug!(index, %failure, "dropping sentence");
                dataset.rejected.push(Rejection { index, failure });
            }
        }
    }
    dataset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailureKind;
    use arcstd_core::{FeatureVocabularies, ParserConfig};

    fn corpus() -> Vec<Sentence> {
        vec![
            Sentence::from_heads(&[2, 0]),
            Sentence::from_heads(&[3, 4, 0, 3]),
            Sentence::from_heads(&[0, 1, 1]),
            Sentence::from_heads(&[2, 1]),
            Sentence::from_heads(&[0]),
        ]
    }

    #[test]
    fn keeps_reducible_sentences_in_order() {
        let filtered = TreeProjectivityFilter::default().filter(corpus());
        assert_eq!(
            filtered.kept,
            vec![
                Sentence::from_heads(&[2, 0]),
                Sentence::from_heads(&[0, 1, 1]),
                Sentence::from_heads(&[0]),
            ]
        );
        let rejected: Vec<_> = filtered
            .rejected
            .iter()
            .map(|r| (r.index, r.failure.kind()))
            .collect();
        assert_eq!(
            rejected,
            vec![(1, FailureKind::NonProjective), (3, FailureKind::Cyclic)]
        );
    }

    #[test]
    fn rejected_sentences_fail_the_oracle_directly() {
        let input = corpus();
        let filtered = TreeProjectivityFilter::default().filter(input.clone());
        let oracle = TransitionOracle::new();
        for rejection in &filtered.rejected {
            assert_eq!(
                oracle.try_reduce(&input[rejection.index]),
                Err(rejection.failure.clone())
            );
        }
    }

    #[test]
    fn splits_are_filtered_independently() {
        let splits = Splits {
            train: corpus(),
            validation: vec![Sentence::from_heads(&[2, 1])],
            test: vec![],
        };
        let filtered = TreeProjectivityFilter::default().filter_splits(splits);
        assert_eq!(filtered.train.kept.len(), 3);
        assert!(filtered.validation.kept.is_empty());
        assert_eq!(filtered.validation.rejected[0].index, 0);
        assert_eq!(filtered.test, Filtered::default());
    }

    #[test]
    fn dataset_skips_rejections() {
        let sentences = corpus();
        let config = ParserConfig::default();
        let extractor = FeatureExtractor::new(
            &config,
            FeatureVocabularies::build(&config.features, &sentences),
        );
        let dataset = build_dataset(&TransitionOracle::new(), &extractor, &sentences);
        assert_eq!(dataset.indices, vec![0, 2, 4]);
        let lengths: Vec<_> = dataset.samples.iter().map(Vec::len).collect();
        assert_eq!(lengths, vec![3, 5, 1]);
        assert_eq!(dataset.rejected.len(), 2);
    }
}
