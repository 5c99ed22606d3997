use anyhow::Result;
use chrono::{DateTime, Utc};
use mania_rule::{HitCounts, Rank, ScoreMaster};
use serde::{Deserialize, Serialize};

/// Outcome of a finished (or abandoned) session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayResult {
    /// "Artist - Title [Version]"
    pub title: String,
    pub rank: Rank,
    pub hit_counts: HitCounts,
    pub score: u64,
    pub max_combo: u32,
    pub accuracy: f64,
    /// The player left before the session finished on its own
    pub finished_early: bool,
    /// Holds still being held when the session ended; never scored
    pub open_holds: usize,
    /// Objects never judged (only non-zero after an early exit)
    pub unjudged: usize,
    /// Unix timestamp (seconds) of the session end
    pub date: i64,
}

impl PlayResult {
    pub fn new(
        title: String,
        score: &ScoreMaster,
        finished_early: bool,
        open_holds: usize,
        unjudged: usize,
    ) -> Result<Self> {
        Ok(Self {
            title,
            rank: score.rank()?,
            hit_counts: score.hit_counts()?,
            score: score.score(),
            max_combo: score.max_combo(),
            accuracy: score.accuracy(),
            finished_early,
            open_holds,
            unjudged,
            date: Utc::now().timestamp(),
        })
    }

    /// `(300, 100, 50, miss)`
    pub fn hit_count_tuple(&self) -> (u32, u32, u32, u32) {
        self.hit_counts.as_tuple()
    }

    /// Session-end summary, one line per field.
    pub fn summary(&self) -> String {
        let played_at = DateTime::<Utc>::from_timestamp(self.date, 0)
            .map(|d| d.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_default();
        let (n300, n100, n50, nmiss) = self.hit_count_tuple();
        let mut out = format!(
            "{}\nRank: {}\nScore: {}\nAccuracy: {:.2}%\nMax combo: {}x\n300: {}  100: {}  50: {}  miss: {}\n",
            self.title, self.rank, self.score, self.accuracy, self.max_combo, n300, n100, n50, nmiss
        );
        if self.open_holds > 0 {
            out.push_str(&format!("Open holds: {}\n", self.open_holds));
        }
        if self.finished_early {
            out.push_str(&format!("Ended early ({} objects unplayed)\n", self.unjudged));
        }
        out.push_str(&format!("Played: {played_at}"));
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
