//! Compatibility scoring between two users' music state.
//!
//! The dispatcher only sees the [`CompatibilityEstimator`] trait, so a real
//! overlap metric over `music_profile` / `currently_playing` can replace the
//! placeholder without touching event handling.

mod estimator;

pub use estimator::{clamp_score, CompatibilityEstimator, RandomEstimator, MAX_SCORE};
