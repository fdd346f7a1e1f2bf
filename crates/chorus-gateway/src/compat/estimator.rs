use rand::Rng;

use crate::realtime::User;

pub const MAX_SCORE: u8 = 100;

/// Scores how well two users' music taste matches, 0..=100.
pub trait CompatibilityEstimator: Send + Sync {
    fn score(&self, a: &User, b: &User) -> u8;
}

/// Placeholder: uniform in [50, 100], ignores both users.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomEstimator;

impl RandomEstimator {
    pub const LOW: u8 = 50;
}

impl CompatibilityEstimator for RandomEstimator {
    fn score(&self, _a: &User, _b: &User) -> u8 {
        rand::thread_rng().gen_range(Self::LOW..=MAX_SCORE)
    }
}

/// Pin an estimator's output to the wire range.
pub fn clamp_score(score: u8) -> u8 {
    score.min(MAX_SCORE)
}
