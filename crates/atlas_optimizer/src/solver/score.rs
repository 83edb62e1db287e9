use std::{
    cmp::Ordering,
    iter,
    ops::{Add, AddAssign, Sub},
};

use fxhash::FxHashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::score_level::ScoreLevel;

/// Two-level score, compared on the hard level first. Lower is better.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Score {
    pub hard_score: f64,
    pub soft_score: f64,
}

impl Score {
    pub const ZERO: Score = Score {
        hard_score: 0.0,
        soft_score: 0.0,
    };

    pub fn new(hard_score: f64, soft_score: f64) -> Self {
        Score {
            hard_score,
            soft_score,
        }
    }

    pub fn of(level: ScoreLevel, score: f64) -> Self {
        match level {
            ScoreLevel::Hard => Score::hard(score),
            ScoreLevel::Soft => Score::soft(score),
        }
    }

    pub fn hard(hard_score: f64) -> Self {
        Score {
            hard_score,
            soft_score: 0.0,
        }
    }

    pub fn soft(soft_score: f64) -> Self {
        Score {
            hard_score: 0.0,
            soft_score,
        }
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn is_failure(&self) -> bool {
        self.hard_score > 0.0
    }
}

impl Eq for Score {}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hard_score
            .total_cmp(&other.hard_score)
            .then_with(|| self.soft_score.total_cmp(&other.soft_score))
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl iter::Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, score| acc + score)
    }
}

impl Add<Score> for Score {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Score {
            hard_score: self.hard_score + other.hard_score,
            soft_score: self.soft_score + other.soft_score,
        }
    }
}

impl AddAssign<Score> for Score {
    fn add_assign(&mut self, other: Score) {
        self.hard_score += other.hard_score;
        self.soft_score += other.soft_score;
    }
}

impl Sub<Score> for Score {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Score {
            hard_score: self.hard_score - other.hard_score,
            soft_score: self.soft_score - other.soft_score,
        }
    }
}

/// Score contribution of every constraint, keyed by constraint name.
#[derive(Default, Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ScoreAnalysis {
    pub scores: FxHashMap<String, Score>,
}

impl ScoreAnalysis {
    pub fn total_score(&self) -> Score {
        self.scores.values().copied().sum()
    }

    pub fn score_of(&self, constraint_name: &str) -> Score {
        self.scores
            .get(constraint_name)
            .copied()
            .unwrap_or(Score::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_sum() {
        let scores = vec![Score::hard(10.0), Score::soft(5.0), Score::hard(-3.0)];
        let total: Score = scores.into_iter().sum();
        assert_eq!(total, Score::new(7.0, 5.0));
    }

    #[test]
    fn test_hard_score_dominates() {
        assert!(Score::hard(1.0) > Score::soft(1_000_000.0));
        assert!(Score::new(0.0, 10.0) < Score::new(0.0, 11.0));
        assert_eq!(
            Score::new(20.0, 10.0).cmp(&Score::new(25.0, 1.0)),
            Ordering::Less
        );
    }

    #[test]
    fn test_is_failure() {
        assert!(Score::hard(0.5).is_failure());
        assert!(!Score::soft(100.0).is_failure());
    }

    #[test]
    fn test_score_analysis_total() {
        let mut analysis = ScoreAnalysis::default();
        analysis.scores.insert(String::from("a"), Score::soft(2.0));
        analysis.scores.insert(String::from("b"), Score::hard(1.0));

        assert_eq!(analysis.total_score(), Score::new(1.0, 2.0));
        assert_eq!(analysis.score_of("missing"), Score::ZERO);
    }
}
