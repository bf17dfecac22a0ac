//! Streak scoring.
//!
//! Every reveal or chord that opens at least one safe cell is a correct action and extends
//! the streak. The award depends on the streak length; hitting a mine costs a flat penalty
//! and breaks the streak.

use serde::{Deserialize, Serialize};

pub type Score = i32;

/// Points lost on a mine hit. The score is allowed to go negative.
pub const MINE_PENALTY: Score = 20;

/// Award for streak lengths 1 to 5. Longer streaks stay on the last tier.
pub const STREAK_REWARDS: [Score; 5] = [10, 20, 20, 20, 30];

/// Points for the `streak`-th consecutive correct action, 0 for no streak.
pub const fn streak_reward(streak: u32) -> Score {
    if streak == 0 {
        return 0;
    }
    let tier = streak as usize;
    if tier > STREAK_REWARDS.len() {
        STREAK_REWARDS[STREAK_REWARDS.len() - 1]
    } else {
        STREAK_REWARDS[tier - 1]
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTracker {
    score: Score,
    correct_streak: u32,
}

impl ScoreTracker {
    pub const fn score(&self) -> Score {
        self.score
    }

    pub const fn correct_streak(&self) -> u32 {
        self.correct_streak
    }

    /// Extends the streak and returns the points awarded.
    pub fn record_correct(&mut self) -> Score {
        self.correct_streak = self.correct_streak.saturating_add(1);
        let award = streak_reward(self.correct_streak);
        self.score = self.score.saturating_add(award);
        log::trace!(
            "Correct action, streak {}, +{} points",
            self.correct_streak,
            award
        );
        award
    }

    pub fn record_mine_hit(&mut self) {
        self.score = self.score.saturating_sub(MINE_PENALTY);
        self.correct_streak = 0;
    }
}
