use std::fmt;

use serde::{Deserialize, Serialize};

/// Terminal quality bucket of a resolved hit object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Judgment {
    Miss,
    Fifty,
    Hundred,
    ThreeHundred,
}

impl Judgment {
    /// All judgments, best first.
    pub const ALL: [Judgment; 4] = [
        Judgment::ThreeHundred,
        Judgment::Hundred,
        Judgment::Fifty,
        Judgment::Miss,
    ];

    /// Score value of this judgment (0, 50, 100 or 300).
    pub fn value(self) -> i32 {
        match self {
            Self::Miss => 0,
            Self::Fifty => 50,
            Self::Hundred => 100,
            Self::ThreeHundred => 300,
        }
    }

    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Miss),
            50 => Some(Self::Fifty),
            100 => Some(Self::Hundred),
            300 => Some(Self::ThreeHundred),
            _ => None,
        }
    }

    /// Whether this judgment keeps the combo going.
    pub fn continues_combo(self) -> bool {
        self != Self::Miss
    }
}

impl fmt::Display for Judgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Miss => f.write_str("miss"),
            other => write!(f, "{}", other.value()),
        }
    }
}

/// Raw encoding of an unjudged object.
pub const RAW_UNJUDGED: i32 = -1;
/// Raw encoding of a hold whose start was hit and is being held.
pub const RAW_HOLDING: i32 = 1;

/// Mutable judgment field of a hit object.
///
/// Notes go `Unjudged -> Judged`. Holds go `Unjudged -> Holding -> Judged`,
/// or straight to `Judged(Miss)` when the start is never pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JudgmentState {
    #[default]
    Unjudged,
    Holding,
    Judged(Judgment),
}

impl JudgmentState {
    /// Integer encoding: -1 unjudged, 1 holding, otherwise the judgment value.
    pub fn raw(self) -> i32 {
        match self {
            Self::Unjudged => RAW_UNJUDGED,
            Self::Holding => RAW_HOLDING,
            Self::Judged(j) => j.value(),
        }
    }

    pub fn is_unjudged(self) -> bool {
        self == Self::Unjudged
    }

    pub fn is_holding(self) -> bool {
        self == Self::Holding
    }

    /// Terminal judgment, if the object has been resolved.
    pub fn judgment(self) -> Option<Judgment> {
        match self {
            Self::Judged(j) => Some(j),
            _ => None,
        }
    }

    /// True once the object has been touched by the judge (holding or resolved).
    pub fn is_touched(self) -> bool {
        self != Self::Unjudged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_round_trips_through_from_value() {
        for j in Judgment::ALL {
            assert_eq!(Judgment::from_value(j.value()), Some(j));
        }
        assert_eq!(Judgment::from_value(-1), None);
        assert_eq!(Judgment::from_value(1), None);
        assert_eq!(Judgment::from_value(200), None);
    }

    #[test]
    fn raw_encoding() {
        assert_eq!(JudgmentState::Unjudged.raw(), -1);
        assert_eq!(JudgmentState::Holding.raw(), 1);
        assert_eq!(JudgmentState::Judged(Judgment::Miss).raw(), 0);
        assert_eq!(JudgmentState::Judged(Judgment::ThreeHundred).raw(), 300);
    }

    #[test]
    fn default_is_unjudged() {
        let state = JudgmentState::default();
        assert!(state.is_unjudged());
        assert!(!state.is_touched());
        assert_eq!(state.judgment(), None);
    }

    #[test]
    fn display() {
        assert_eq!(Judgment::Miss.to_string(), "miss");
        assert_eq!(Judgment::Hundred.to_string(), "100");
    }

    #[test]
    fn only_miss_breaks_combo() {
        assert!(!Judgment::Miss.continues_combo());
        assert!(Judgment::Fifty.continues_combo());
    }
}
