// Attachment scores from per-arc correctness lists.

use serde::{Deserialize, Serialize};

/// Error type for scoring.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    /// The head and label correctness lists come from differently filtered
    /// datasets.
    #[error("sentence {sentence}: {heads} head decisions but {labels} label decisions")]
    LengthMismatch {
        sentence: usize,
        heads: usize,
        labels: usize,
    },
}

/// Counts for one sentence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceScore {
    /// Arcs with the correct head.
    pub heads_correct: usize,
    /// Arcs with both the correct head and the correct label.
    pub labelled_correct: usize,
    pub total: usize,
}

impl SentenceScore {
    /// Combine the decoder's head correctness with label correctness from
    /// the relation classifier, position by position.
    pub fn from_correctness(heads: &[bool], labels: &[bool]) -> Result<Self, ScoreError> {
        Self::for_sentence(0, heads, labels)
    }

    /// Like [`from_correctness`](Self::from_correctness), with the sentence
    /// index reported on mismatch.
    pub fn for_sentence(
        sentence: usize,
        heads: &[bool],
        labels: &[bool],
    ) -> Result<Self, ScoreError> {
        if heads.len() != labels.len() {
            return Err(ScoreError::LengthMismatch {
                sentence,
                heads: heads.len(),
                labels: labels.len(),
            });
        }
        Ok(Self {
            heads_correct: heads.iter().filter(|&&h| h).count(),
            labelled_correct: heads.iter().zip(labels).filter(|&(&h, &l)| h && l).count(),
            total: heads.len(),
        })
    }

    /// Head-only score; `None` when the sentence has no arcs.
    pub fn uas(&self) -> Option<f64> {
        ratio(self.heads_correct, self.total)
    }

    /// Labelled score; `None` when the sentence has no arcs.
    pub fn las(&self) -> Option<f64> {
        ratio(self.labelled_correct, self.total)
    }
}

/// Corpus-level totals, micro-averaged over arcs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentScore {
    pub totals: SentenceScore,
    pub sentences: usize,
}

impl AttachmentScore {
    pub fn accumulate(&mut self, score: SentenceScore) {
        self.totals.heads_correct += score.heads_correct;
        self.totals.labelled_correct += score.labelled_correct;
        self.totals.total += score.total;
        self.sentences += 1;
    }

    pub fn uas(&self) -> Option<f64> {
        self.totals.uas()
    }

    pub fn las(&self) -> Option<f64> {
        self.totals.las()
    }
}

impl FromIterator<SentenceScore> for AttachmentScore {
    fn from_iter<I: IntoIterator<Item = SentenceScore>>(iter: I) -> Self {
        let mut score = Self::default();
        for s in iter {
            score.accumulate(s);
        }
        score
    }
}

fn ratio(n: usize, d: usize) -> Option<f64> {
    (d > 0).then(|| n as f64 / d as f64)
}
