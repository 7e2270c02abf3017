// Operator decoder: replay predicted operator scores into head attachments.
//
// Each step consumes one score vector. Legality guards override the
// prediction when it cannot apply:
//
// - fewer than two tokens on the stack: shift, whatever the scores say
// - empty buffer: the better of leftArc and rightArc
// - otherwise: arg-max over all three operators
//
// Decoding stops at the terminal state or when the scores run out, so it
// never runs more steps than it was given vectors. Tokens still on the
// stack or in the buffer at that point stay unattached.

use arcstd_core::enums::OPERATOR_COUNT;
use arcstd_core::{Operator, Sentence};
use serde::{Deserialize, Serialize};

use crate::TransitionError;
use crate::state::{Attachment, Halt, OperatorSelector, ParseState, Replay};

/// Scores for one step, indexed by [`Operator::index`].
pub type OperatorScores = [f32; OPERATOR_COUNT];

/// Selector choosing the best-scoring legal operator per step.
#[derive(Debug, Clone)]
pub struct PredictionSelector<'s> {
    scores: &'s [OperatorScores],
    step: usize,
}

impl<'s> PredictionSelector<'s> {
    pub fn new(scores: &'s [OperatorScores]) -> Self {
        Self { scores, step: 0 }
    }
}

impl OperatorSelector for PredictionSelector<'_> {
    fn select(&mut self, state: &ParseState<'_>) -> Option<Operator> {
        let row = self.scores.get(self.step)?;
        self.step += 1;

        if state.height() < 2 {
            return (!state.buffer_is_empty()).then_some(Operator::Shift);
        }
        if state.buffer_is_empty() {
            return Some(best_of(row, &[Operator::RightArc, Operator::LeftArc]));
        }
        Some(best_of(row, &Operator::ALL))
    }
}

/// Highest-scoring candidate. Ties go to the earlier candidate; NaN never
/// beats a number.
fn best_of(row: &OperatorScores, candidates: &[Operator]) -> Operator {
    let mut best = candidates[0];
    for &op in &candidates[1..] {
        let (score, best_score) = (row[op.index()], row[best.index()]);
        if score > best_score || (best_score.is_nan() && !score.is_nan()) {
            best = op;
        }
    }
    best
}

/// Outcome of decoding one sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoded {
    /// One entry per completed arc, in construction order: whether the arc
    /// matches the annotated head.
    pub correctness: Vec<bool>,
    /// Arcs built, in construction order.
    pub attachments: Vec<Attachment>,
    /// Predicted head id per token position; `Some(0)` for the root,
    /// `None` for tokens left unattached.
    pub heads: Vec<Option<usize>>,
    pub operators: Vec<Operator>,
    /// Whether the parse reached its terminal state.
    pub complete: bool,
}

impl Decoded {
    fn from_state(state: &ParseState<'_>, halt: Halt) -> Self {
        let attachments = state.attachments().to_vec();
        Self {
            correctness: attachments.iter().map(Attachment::is_correct).collect(),
            heads: state.predicted_heads(),
            operators: state.operators().to_vec(),
            complete: halt == Halt::Complete,
            attachments,
        }
    }
}

/// Turns per-step operator scores into head attachments for a sentence.
#[derive(Debug, Default, Clone, Copy)]
pub struct OperatorDecoder;

impl OperatorDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode with legality guards. Never fails: illegal predictions are
    /// overridden and running out of scores ends the parse early.
    pub fn decode(&self, sentence: &Sentence, scores: &[OperatorScores]) -> Decoded {
        let mut state = ParseState::new(sentence);
        let mut selector = PredictionSelector::new(scores);
        let halt = match state.run(&mut selector) {
            Ok(halt) => halt,
            Err(err) => {
                // The guards only ever propose legal operators.
                tracing::error!(%err, "guarded selection produced an illegal operator");
                return Decoded::from_state(&state, Halt::Stopped);
            }
        };

        if halt == Halt::Stopped {
            tracing::debug!(
                steps = state.step(),
                tokens = sentence.len(),
                attached = state.attachments().len(),
                "scores exhausted before the parse completed"
            );
        }
        Decoded::from_state(&state, halt)
    }

    /// Replay an explicit operator script without guards.
    ///
    /// Fails on the first operator that is illegal in its state,
    /// including any operator left over once the parse is terminal.
    pub fn replay(
        &self,
        sentence: &Sentence,
        operators: &[Operator],
    ) -> Result<Decoded, TransitionError> {
        let mut state = ParseState::new(sentence);
        let mut script = Replay::new(operators);
        let halt = state.run(&mut script)?;
        if let Some(&extra) = script.remaining().first() {
            // Nothing is legal in a terminal state.
            state.apply(extra)?;
        }
        Ok(Decoded::from_state(&state, halt))
    }
}

/// One-hot score rows for an operator script, e.g. to feed gold sequences
/// through [`OperatorDecoder::decode`].
pub fn one_hot(operators: &[Operator]) -> Vec<OperatorScores> {
    operators
        .iter()
        .map(|op| {
            let mut row = [0.0; OPERATOR_COUNT];
            row[op.index()] = 1.0;
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::TransitionOracle;

    use arcstd_core::Operator::{LeftArc, RightArc, Shift};

    const SHIFT: OperatorScores = [1.0, 0.0, 0.0];
    const RIGHT: OperatorScores = [0.0, 1.0, 0.0];
    const LEFT: OperatorScores = [0.0, 0.0, 1.0];

    #[test]
    fn gold_scores_reconstruct_the_tree() {
        let s = Sentence::from_heads(&[2, 0, 2]);
        let decoded = OperatorDecoder::new().decode(&s, &[SHIFT, SHIFT, LEFT, SHIFT, RIGHT]);
        assert!(decoded.complete);
        assert_eq!(decoded.correctness, vec![true, true]);
        assert_eq!(decoded.heads, vec![Some(2), Some(0), Some(2)]);
        assert_eq!(decoded.operators, vec![Shift, Shift, LeftArc, Shift, RightArc]);
    }

    #[test]
    fn arcs_forced_into_shift_while_stack_is_shallow() {
        let s = Sentence::from_heads(&[2, 0]);
        let decoded = OperatorDecoder::new().decode(&s, &[LEFT, RIGHT, LEFT]);
        assert_eq!(decoded.operators, vec![Shift, Shift, LeftArc]);
        assert_eq!(decoded.correctness, vec![true]);
    }

    #[test]
    fn shift_overridden_when_buffer_is_empty() {
        let s = Sentence::from_heads(&[2, 0]);
        // Prefers shift, then rightArc over leftArc among the arcs.
        let decoded = OperatorDecoder::new().decode(&s, &[SHIFT, SHIFT, [9.0, 2.0, 1.0]]);
        assert_eq!(decoded.operators, vec![Shift, Shift, RightArc]);
        assert_eq!(decoded.correctness, vec![false]);
        assert_eq!(decoded.heads, vec![Some(0), Some(1)]);
        assert!(decoded.complete);
    }

    #[test]
    fn wrong_left_arc_is_scored_false() {
        let s = Sentence::from_heads(&[0, 1]);
        let decoded = OperatorDecoder::new().decode(&s, &[SHIFT, SHIFT, LEFT]);
        assert_eq!(decoded.correctness, vec![false]);
        assert_eq!(decoded.attachments[0].head, 2);
        assert_eq!(decoded.attachments[0].dependent, 1);
        assert_eq!(decoded.heads, vec![Some(2), Some(0)]);
    }

    #[test]
    fn exhausted_scores_leave_tokens_unattached() {
        let s = Sentence::from_heads(&[2, 0, 2]);
        let decoded = OperatorDecoder::new().decode(&s, &[SHIFT, SHIFT, LEFT]);
        assert!(!decoded.complete);
        assert_eq!(decoded.correctness, vec![true]);
        assert_eq!(decoded.heads, vec![Some(2), None, None]);
    }

    #[test]
    fn extra_scores_are_ignored_after_completion() {
        let s = Sentence::from_heads(&[0]);
        let decoded = OperatorDecoder::new().decode(&s, &[LEFT, LEFT, LEFT, LEFT]);
        assert_eq!(decoded.operators, vec![Shift]);
        assert!(decoded.complete);
        assert!(decoded.correctness.is_empty());
    }

    #[test]
    fn no_scores_no_steps() {
        let s = Sentence::from_heads(&[2, 0]);
        let decoded = OperatorDecoder::new().decode(&s, &[]);
        assert!(decoded.operators.is_empty());
        assert!(!decoded.complete);
        assert_eq!(decoded.heads, vec![None, None]);
    }

    #[test]
    fn guarded_selection_runs_without_transition_errors() {
        let s = Sentence::from_heads(&[2, 0, 2]);
        let rows = [[f32::NAN, 1.0, 2.0]; 8];
        let mut state = ParseState::new(&s);
        assert_eq!(state.run(&mut PredictionSelector::new(&rows)), Ok(Halt::Complete));
        assert_eq!(state.operators(), &[Shift, Shift, LeftArc, Shift, LeftArc]);
    }

    #[test]
    fn ties_and_nan() {
        assert_eq!(best_of(&[1.0, 1.0, 1.0], &Operator::ALL), Shift);
        assert_eq!(best_of(&[f32::NAN, 0.5, 0.5], &Operator::ALL), RightArc);
        assert_eq!(best_of(&[f32::NAN, f32::NAN, -1.0], &Operator::ALL), LeftArc);
        assert_eq!(best_of(&[f32::NAN; 3], &Operator::ALL), Shift);
        assert_eq!(
            best_of(&[0.0, f32::NEG_INFINITY, f32::INFINITY], &[RightArc, LeftArc]),
            LeftArc
        );
    }

    #[test]
    fn replay_matches_gold_decode() {
        let s = Sentence::from_heads(&[2, 4, 4, 0, 4, 5]);
        let ops = TransitionOracle::new().try_reduce(&s).unwrap();
        let decoder = OperatorDecoder::new();
        let replayed = decoder.replay(&s, ops.as_slice()).unwrap();
        let decoded = decoder.decode(&s, &one_hot(ops.as_slice()));
        assert_eq!(replayed, decoded);
        assert_eq!(replayed.heads, s.gold_heads());
        assert!(replayed.correctness.iter().all(|&c| c));
    }

    #[test]
    fn replay_rejects_operators_after_completion() {
        let s = Sentence::from_heads(&[2, 0]);
        let decoder = OperatorDecoder::new();
        assert_eq!(
            decoder.replay(&s, &[Shift, Shift, LeftArc, RightArc, Shift]),
            Err(TransitionError::StackTooShallow {
                step: 3,
                operator: RightArc,
                height: 1
            })
        );
        assert_eq!(
            decoder.replay(&s, &[Shift, Shift, LeftArc, Shift]),
            Err(TransitionError::EmptyBuffer { step: 3 })
        );
    }

    #[test]
    fn replay_stops_short_on_truncated_scripts() {
        let s = Sentence::from_heads(&[2, 0]);
        let decoded = OperatorDecoder::new().replay(&s, &[Shift, Shift]).unwrap();
        assert!(!decoded.complete);
        assert!(decoded.correctness.is_empty());
    }

    #[test]
    fn replay_rejects_illegal_scripts() {
        let s = Sentence::from_heads(&[0]);
        assert_eq!(
            OperatorDecoder::new().replay(&s, &[RightArc]),
            Err(TransitionError::StackTooShallow {
                step: 0,
                operator: RightArc,
                height: 0
            })
        );
    }
}
