//! Arc-standard transition engine.
//!
//! This crate turns gold dependency trees into operator sequences and
//! replays predicted operators back into trees. Both directions run on the
//! same [`state::ParseState`]; they differ only in the
//! [`state::OperatorSelector`] that picks each step's operator.
//!
//! # Architecture
//!
//! - [`state`] -- stack/buffer state machine and the selector seam
//! - [`oracle`] -- gold operator sequences and tree validation
//! - [`filter`] -- dropping trees the oracle cannot reduce, dataset assembly
//! - [`features`] -- fixed two-slot feature windows and training samples
//! - [`decoder`] -- guarded replay of predicted operator scores
//! - [`scoring`] -- attachment scores from per-arc correctness

pub mod decoder;
pub mod features;
pub mod filter;
pub mod oracle;
pub mod scoring;
pub mod state;

pub use decoder::{Decoded, OperatorDecoder, OperatorScores};
pub use features::{FeatureExtractor, Sample};
pub use filter::{Filtered, Rejection, Splits, TreeProjectivityFilter};
pub use oracle::{OperatorSequence, TransitionOracle};
pub use scoring::{AttachmentScore, ScoreError, SentenceScore};
pub use state::{Attachment, OperatorSelector, ParseState};

use arcstd_core::Operator;

/// Coarse classification of a [`ParseFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Ids or head pointers do not describe a single-rooted tree.
    Malformed,
    /// Some head chain never reaches ROOT.
    Cyclic,
    /// A well-formed tree the greedy oracle cannot reduce.
    NonProjective,
}

/// Why a sentence's gold tree cannot be turned into an operator sequence.
///
/// Sentences failing this way are excluded from derived datasets; they are
/// never retried and never partially kept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error("sentence has no tokens")]
    Empty,
    #[error("token at position {position} has id {id}")]
    UnexpectedId { position: usize, id: usize },
    #[error("token {id} has no head")]
    MissingHead { id: usize },
    #[error("token {id} has head {head}, outside the sentence")]
    HeadOutOfRange { id: usize, head: usize },
    #[error("head chain starting at token {id} never reaches ROOT")]
    Cycle { id: usize },
    #[error("expected exactly one token attached to ROOT, found {count}")]
    RootCount { count: usize },
    #[error("no transition applies at step {step}; the tree is not projective")]
    NonProjective { step: usize },
    #[error("illegal transition: {0}")]
    IllegalTransition(#[from] TransitionError),
}

impl ParseFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            ParseFailure::Cycle { .. } => FailureKind::Cyclic,
            ParseFailure::NonProjective { .. } => FailureKind::NonProjective,
            _ => FailureKind::Malformed,
        }
    }
}

/// An operator applied in a state where it is not legal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("step {step}: cannot shift, the buffer is empty")]
    EmptyBuffer { step: usize },
    #[error("step {step}: {operator} needs two tokens on the stack, found {height}")]
    StackTooShallow {
        step: usize,
        operator: Operator,
        height: usize,
    },
}
