// Transition operators and their model-facing integer encoding.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of distinct operators, i.e. the width of a score vector.
pub const OPERATOR_COUNT: usize = 3;

/// One arc-standard transition.
///
/// The integer encoding (`shift = 0`, `rightArc = 1`, `leftArc = 2`) is the
/// contract with the sequence model: score vectors are indexed by
/// [`Operator::code`] and every consumer must use the same mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    /// Move the front of the buffer onto the stack.
    Shift,
    /// Attach the top of the stack to the token below it, then pop the top.
    RightArc,
    /// Attach the token below the top to the top, then pop it.
    LeftArc,
}

impl Operator {
    /// All operators, in encoding order.
    pub const ALL: [Operator; OPERATOR_COUNT] =
        [Operator::Shift, Operator::RightArc, Operator::LeftArc];

    /// Stable integer code of this operator.
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Operator::Shift => 0,
            Operator::RightArc => 1,
            Operator::LeftArc => 2,
        }
    }

    /// Operator for an integer code, or `None` if out of range.
    pub fn from_code(code: u8) -> Option<Operator> {
        Operator::ALL.get(code as usize).copied()
    }

    /// Index into a score vector.
    #[inline]
    pub fn index(self) -> usize {
        self.code() as usize
    }

    /// Canonical name (`shift`, `rightArc`, `leftArc`).
    pub fn name(self) -> &'static str {
        match self {
            Operator::Shift => "shift",
            Operator::RightArc => "rightArc",
            Operator::LeftArc => "leftArc",
        }
    }

    /// Parse a canonical operator name.
    pub fn from_name(name: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Whether this operator builds an arc.
    #[inline]
    pub fn is_arc(self) -> bool {
        !matches!(self, Operator::Shift)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_is_stable() {
        assert_eq!(Operator::Shift.code(), 0);
        assert_eq!(Operator::RightArc.code(), 1);
        assert_eq!(Operator::LeftArc.code(), 2);
    }

    #[test]
    fn from_code_rejects_out_of_range() {
        assert_eq!(Operator::from_code(2), Some(Operator::LeftArc));
        assert_eq!(Operator::from_code(3), None);
    }

    #[test]
    fn names_match_serde() {
        for op in Operator::ALL {
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.name()));
            assert_eq!(Operator::from_name(op.name()), Some(op));
        }
    }

    #[test]
    fn only_shift_is_not_an_arc() {
        assert!(!Operator::Shift.is_arc());
        assert!(Operator::RightArc.is_arc());
        assert!(Operator::LeftArc.is_arc());
    }
}
