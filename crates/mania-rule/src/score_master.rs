//! Score, combo and accuracy accounting for one play session.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use mania_model::{Judgment, RAW_UNJUDGED};

/// Accuracy at or above which the S/A band starts.
pub const S_RANK_ACCURACY: f64 = 93.333;
pub const B_RANK_ACCURACY: f64 = 85.0;
pub const C_RANK_ACCURACY: f64 = 75.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("invalid judgment value: {0} (expected one of -1, 0, 50, 100, 300)")]
    InvalidValue(i32),
}

/// Tally of terminal judgments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitCounts {
    pub three_hundred: u32,
    pub hundred: u32,
    pub fifty: u32,
    pub miss: u32,
}

impl HitCounts {
    pub fn total(&self) -> u32 {
        self.three_hundred + self.hundred + self.fifty + self.miss
    }

    /// `(300, 100, 50, miss)`
    pub fn as_tuple(&self) -> (u32, u32, u32, u32) {
        (self.three_hundred, self.hundred, self.fifty, self.miss)
    }

    fn add(&mut self, judgment: Judgment) {
        match judgment {
            Judgment::ThreeHundred => self.three_hundred += 1,
            Judgment::Hundred => self.hundred += 1,
            Judgment::Fifty => self.fifty += 1,
            Judgment::Miss => self.miss += 1,
        }
    }
}

/// Letter grade derived from accuracy and misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    SS,
    S,
    A,
    B,
    C,
    D,
}

impl Rank {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SS => "SS",
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    pub fn from_accuracy(accuracy: f64, has_misses: bool) -> Self {
        if accuracy == 100.0 {
            Self::SS
        } else if accuracy >= S_RANK_ACCURACY {
            if has_misses { Self::A } else { Self::S }
        } else if accuracy >= B_RANK_ACCURACY {
            Self::B
        } else if accuracy >= C_RANK_ACCURACY {
            Self::C
        } else {
            Self::D
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view for a HUD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub accuracy: f64,
}

/// Accumulates judgment values in the order they were produced.
///
/// `score` grows by `value * combo` on every hit of 50 or better, so late
/// combo hits are worth more. A miss (or the raw unjudged marker) breaks the
/// combo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreMaster {
    score: u64,
    combo: u32,
    max_combo: u32,
    history: Vec<i32>,
}

impl ScoreMaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw judgment value (`-1`, `0`, `50`, `100` or `300`).
    pub fn append(&mut self, value: i32) -> Result<(), ScoreError> {
        if value != RAW_UNJUDGED && Judgment::from_value(value).is_none() {
            return Err(ScoreError::InvalidValue(value));
        }
        if value >= 50 {
            self.combo += 1;
            self.score += value as u64 * self.combo as u64;
        } else {
            self.combo = 0;
        }
        self.max_combo = self.max_combo.max(self.combo);
        self.history.push(value);
        Ok(())
    }

    /// Typed path used by the track judge; every `Judgment` is a valid value.
    pub fn record(&mut self, judgment: Judgment) {
        if judgment.continues_combo() {
            self.combo += 1;
            self.score += judgment.value() as u64 * self.combo as u64;
        } else {
            self.combo = 0;
        }
        self.max_combo = self.max_combo.max(self.combo);
        self.history.push(judgment.value());
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn history(&self) -> &[i32] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Percentage in `[0, 100]`; 100 when nothing has been judged yet.
    pub fn accuracy(&self) -> f64 {
        if self.history.is_empty() {
            return 100.0;
        }
        let sum: i64 = self.history.iter().map(|&v| v as i64).sum();
        100.0 * (sum as f64 / (300.0 * self.history.len() as f64))
    }

    pub fn hit_counts(&self) -> Result<HitCounts, ScoreError> {
        let mut counts = HitCounts::default();
        for &value in &self.history {
            let judgment = Judgment::from_value(value).ok_or(ScoreError::InvalidValue(value))?;
            counts.add(judgment);
        }
        Ok(counts)
    }

    pub fn rank(&self) -> Result<Rank, ScoreError> {
        let has_misses = self.hit_counts()?.miss > 0;
        Ok(Rank::from_accuracy(self.accuracy(), has_misses))
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            score: self.score,
            combo: self.combo,
            max_combo: self.max_combo,
            accuracy: self.accuracy(),
        }
    }
}
