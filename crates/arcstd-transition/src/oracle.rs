// Static arc-standard oracle: gold trees to operator sequences.

use arcstd_core::token::ROOT_ID;
use arcstd_core::{Operator, Sentence};
use serde::{Deserialize, Serialize};

use crate::ParseFailure;
use crate::features::{FeatureExtractor, Sample};
use crate::state::{Halt, OperatorSelector, ParseState};

/// The operator sequence that reduces a sentence to its root.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorSequence(Vec<Operator>);

impl OperatorSequence {
    pub fn as_slice(&self) -> &[Operator] {
        &self.0
    }

    /// Model-facing integer codes.
    pub fn codes(&self) -> Vec<u8> {
        self.0.iter().map(|op| op.code()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Operator> + '_ {
        self.0.iter().copied()
    }

    pub fn into_vec(self) -> Vec<Operator> {
        self.0
    }
}

impl From<Vec<Operator>> for OperatorSequence {
    fn from(operators: Vec<Operator>) -> Self {
        Self(operators)
    }
}

/// Picks operators by looking up gold heads.
///
/// Arcs are taken as soon as they are available, left before right. The
/// right-arc test only looks for dependents of the top still waiting in the
/// buffer; dependents already on the stack do not block it.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoldSelector;

impl OperatorSelector for GoldSelector {
    fn select(&mut self, state: &ParseState<'_>) -> Option<Operator> {
        if let (Some(top), Some(second)) = (state.top(), state.second()) {
            let top_id = state.id_at(top);
            if state.gold_head_at(second) == Some(top_id) {
                return Some(Operator::LeftArc);
            }
            if state.gold_head_at(top) == Some(state.id_at(second))
                && !state.buffer().iter().any(|t| t.head() == Some(top_id))
            {
                return Some(Operator::RightArc);
            }
        }
        if state.buffer_is_empty() {
            None
        } else {
            Some(Operator::Shift)
        }
    }
}

/// Derives gold operator sequences and training samples from annotated
/// sentences.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransitionOracle;

impl TransitionOracle {
    pub fn new() -> Self {
        Self
    }

    /// Reduce a sentence with the gold selector.
    ///
    /// On success the sequence has exactly `2n - 1` operators for `n`
    /// tokens. Malformed, cyclic and non-projective trees are reported as
    /// a [`ParseFailure`] instead of a partial sequence.
    pub fn try_reduce(&self, sentence: &Sentence) -> Result<OperatorSequence, ParseFailure> {
        validate(sentence)?;

        let mut state = ParseState::new(sentence);
        match state.run(&mut GoldSelector)? {
            Halt::Complete => {
                debug_assert_eq!(state.step(), 2 * sentence.len() - 1);
                Ok(OperatorSequence(state.into_operators()))
            }
            Halt::Stopped => Err(ParseFailure::NonProjective { step: state.step() }),
        }
    }

    /// Whether [`try_reduce`](Self::try_reduce) succeeds.
    pub fn is_parseable(&self, sentence: &Sentence) -> bool {
        self.try_reduce(sentence).is_ok()
    }

    /// One sample per step: the feature window seen before the step and the
    /// gold operator taken.
    pub fn samples(
        &self,
        sentence: &Sentence,
        extractor: &FeatureExtractor,
    ) -> Result<Vec<Sample>, ParseFailure> {
        let operators = self.try_reduce(sentence)?;

        let mut state = ParseState::new(sentence);
        let mut samples = Vec::with_capacity(operators.len());
        for operator in operators.iter() {
            samples.push(Sample {
                window: extractor.window(&state),
                operator,
            });
            state.apply(operator)?;
        }
        Ok(samples)
    }
}

/// Check that a sentence describes a single-rooted tree over ids `1..=n`.
pub fn validate(sentence: &Sentence) -> Result<(), ParseFailure> {
    let n = sentence.len();
    if n == 0 {
        return Err(ParseFailure::Empty);
    }

    let mut heads = Vec::with_capacity(n);
    for (i, token) in sentence.tokens().iter().enumerate() {
        if token.id() != i + 1 {
            return Err(ParseFailure::UnexpectedId {
                position: i + 1,
                id: token.id(),
            });
        }
        let head = token
            .head()
            .ok_or(ParseFailure::MissingHead { id: token.id() })?;
        if head > n {
            return Err(ParseFailure::HeadOutOfRange {
                id: token.id(),
                head,
            });
        }
        heads.push(head);
    }

    // A chain longer than n steps must revisit a token.
    for start in 1..=n {
        let mut current = start;
        let mut steps = 0;
        while current != ROOT_ID {
            if steps == n {
                return Err(ParseFailure::Cycle { id: start });
            }
            current = heads[current - 1];
            steps += 1;
        }
    }

    let roots = heads.iter().filter(|&&h| h == ROOT_ID).count();
    if roots != 1 {
        return Err(ParseFailure::RootCount { count: roots });
    }
    Ok(())
}
