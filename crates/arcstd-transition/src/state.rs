// Shared stack/buffer state machine for one sentence.
//
// The stack holds 1-based token positions with the ROOT sentinel (position
// 0) at the bottom; the buffer is the suffix of the sentence starting at
// `next`. Arcs are only ever built between two real tokens, so the sentinel
// is never popped. The token left alone on the sentinel at the end of a
// parse is the sentence root and attaches to ROOT implicitly.

use arcstd_core::token::ROOT_ID;
use arcstd_core::{Operator, Sentence, Token};
use serde::{Deserialize, Serialize};

use crate::TransitionError;

/// Picks the operator for each step of a parse.
///
/// Implementations see the state *before* the step is applied. Returning
/// `None` stops the parse where it is.
pub trait OperatorSelector {
    fn select(&mut self, state: &ParseState<'_>) -> Option<Operator>;
}

/// One arc built by a `leftArc` or `rightArc` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub operator: Operator,
    /// Id of the governing token.
    pub head: usize,
    /// Id of the attached token.
    pub dependent: usize,
    /// Annotated head of the dependent, if any.
    pub gold_head: Option<usize>,
}

impl Attachment {
    /// Whether the arc agrees with the annotation.
    #[inline]
    pub fn is_correct(&self) -> bool {
        self.gold_head == Some(self.head)
    }
}

/// How [`ParseState::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// Buffer empty and at most one token left on the sentinel.
    Complete,
    /// The selector returned `None` before completion.
    Stopped,
}

/// Parse state of one sentence: stack, buffer, and what has been built.
#[derive(Debug, Clone)]
pub struct ParseState<'a> {
    sentence: &'a Sentence,
    stack: Vec<usize>,
    next: usize,
    operators: Vec<Operator>,
    attachments: Vec<Attachment>,
    /// Predicted head id per token position.
    heads: Vec<Option<usize>>,
}

impl<'a> ParseState<'a> {
    /// Fresh state: only the ROOT sentinel on the stack, every token in the
    /// buffer.
    pub fn new(sentence: &'a Sentence) -> Self {
        let mut stack = Vec::with_capacity(sentence.len() + 1);
        stack.push(ROOT_ID);
        Self {
            sentence,
            stack,
            next: 0,
            operators: Vec::with_capacity(2 * sentence.len()),
            attachments: Vec::with_capacity(sentence.len()),
            heads: vec![None; sentence.len()],
        }
    }

    pub fn sentence(&self) -> &'a Sentence {
        self.sentence
    }

    /// Number of steps applied so far.
    #[inline]
    pub fn step(&self) -> usize {
        self.operators.len()
    }

    /// Number of real tokens on the stack (the sentinel is not counted).
    #[inline]
    pub fn height(&self) -> usize {
        self.stack.len() - 1
    }

    /// Tokens not yet shifted, front first.
    pub fn buffer(&self) -> &'a [Token] {
        &self.sentence.tokens()[self.next..]
    }

    #[inline]
    pub fn buffer_is_empty(&self) -> bool {
        self.next >= self.sentence.len()
    }

    /// Position of the top real token.
    pub fn top(&self) -> Option<usize> {
        self.peek(0)
    }

    /// Position of the real token right below the top.
    pub fn second(&self) -> Option<usize> {
        self.peek(1)
    }

    fn peek(&self, depth: usize) -> Option<usize> {
        self.stack
            .len()
            .checked_sub(depth + 1)
            .map(|i| self.stack[i])
            .filter(|&pos| pos != ROOT_ID)
    }

    /// Token at a 1-based position; `None` for the sentinel.
    pub fn token(&self, position: usize) -> Option<&'a Token> {
        position
            .checked_sub(1)
            .and_then(|i| self.sentence.tokens().get(i))
    }

    /// Id of the token at a position (0 for the sentinel).
    pub fn id_at(&self, position: usize) -> usize {
        self.token(position).map_or(ROOT_ID, Token::id)
    }

    /// Annotated head of the token at a position.
    pub fn gold_head_at(&self, position: usize) -> Option<usize> {
        self.token(position).and_then(Token::head)
    }

    /// Buffer empty and at most one token left on the sentinel.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.buffer_is_empty() && self.height() <= 1
    }

    /// Whether `operator` is legal in this state.
    pub fn allows(&self, operator: Operator) -> bool {
        match operator {
            Operator::Shift => !self.buffer_is_empty(),
            Operator::LeftArc | Operator::RightArc => self.height() >= 2,
        }
    }

    /// Apply one operator, returning the arc it built, if any.
    pub fn apply(&mut self, operator: Operator) -> Result<Option<Attachment>, TransitionError> {
        let step = self.step();
        if !self.allows(operator) {
            return Err(match operator {
                Operator::Shift => TransitionError::EmptyBuffer { step },
                _ => TransitionError::StackTooShallow {
                    step,
                    operator,
                    height: self.height(),
                },
            });
        }

        let attachment = match operator {
            Operator::Shift => {
                self.next += 1;
                self.stack.push(self.next);
                None
            }
            // Height >= 2 here, so both indices are real tokens.
            Operator::LeftArc => {
                let len = self.stack.len();
                let dependent = self.stack.remove(len - 2);
                let head = self.stack[len - 2];
                Some(self.attach(operator, head, dependent))
            }
            Operator::RightArc => {
                let len = self.stack.len();
                let dependent = self.stack[len - 1];
                self.stack.truncate(len - 1);
                let head = self.stack[len - 2];
                Some(self.attach(operator, head, dependent))
            }
        };

        self.operators.push(operator);
        tracing::trace!(
            step,
            %operator,
            height = self.height(),
            buffer = self.sentence.len() - self.next,
            "transition"
        );
        Ok(attachment)
    }

    fn attach(&mut self, operator: Operator, head: usize, dependent: usize) -> Attachment {
        let attachment = Attachment {
            operator,
            head: self.id_at(head),
            dependent: self.id_at(dependent),
            gold_head: self.gold_head_at(dependent),
        };
        self.heads[dependent - 1] = Some(attachment.head);
        self.attachments.push(attachment);
        attachment
    }

    /// Drive the parse with `selector` until it completes or the selector
    /// stops.
    pub fn run<S: OperatorSelector + ?Sized>(
        &mut self,
        selector: &mut S,
    ) -> Result<Halt, TransitionError> {
        loop {
            if self.is_terminal() {
                return Ok(Halt::Complete);
            }
            match selector.select(self) {
                Some(operator) => {
                    self.apply(operator)?;
                }
                None => return Ok(Halt::Stopped),
            }
        }
    }

    /// Operators applied so far.
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Arcs built so far, in construction order.
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Predicted head id per token position.
    ///
    /// In a terminal state the token left on the sentinel gets head 0;
    /// tokens that never got attached are `None`.
    pub fn predicted_heads(&self) -> Vec<Option<usize>> {
        let mut heads = self.heads.clone();
        if self.is_terminal() {
            if let Some(root) = self.top() {
                heads[root - 1] = Some(ROOT_ID);
            }
        }
        heads
    }

    /// Every token is on the stack, in the buffer, or attached, exactly once.
    pub fn accounts_for_all_tokens(&self) -> bool {
        let mut seen = vec![false; self.sentence.len()];
        let on_stack = self.stack.iter().skip(1).copied();
        let in_buffer = self.next + 1..=self.sentence.len();
        let attached = self
            .heads
            .iter()
            .enumerate()
            .filter(|(_, h)| h.is_some())
            .map(|(i, _)| i + 1);
        for pos in on_stack.chain(in_buffer).chain(attached) {
            if pos == ROOT_ID || pos > seen.len() || seen[pos - 1] {
                return false;
            }
            seen[pos - 1] = true;
        }
        seen.into_iter().all(|s| s)
    }

    pub fn into_operators(self) -> Vec<Operator> {
        self.operators
    }
}

/// Selector replaying a fixed operator script.
#[derive(Debug, Clone)]
pub struct Replay<'o> {
    operators: &'o [Operator],
    position: usize,
}

impl<'o> Replay<'o> {
    pub fn new(operators: &'o [Operator]) -> Self {
        Self {
            operators,
            position: 0,
        }
    }

    /// Operators not handed out yet.
    pub fn remaining(&self) -> &'o [Operator] {
        self.operators.get(self.position..).unwrap_or_default()
    }
}

impl OperatorSelector for Replay<'_> {
    fn select(&mut self, _state: &ParseState<'_>) -> Option<Operator> {
        let operator = self.operators.get(self.position).copied();
        self.position += 1;
        operator
    }
}
