use super::types::{ResultValue, StreakKind};

/// Counter values recorded each time a result extends the streak.
///
/// A result of zero neither extends nor breaks a streak: the counter keeps
/// its value and nothing is recorded.
pub fn streak_samples(results: &[ResultValue], kind: StreakKind) -> Vec<i64> {
    let mut samples = Vec::new();
    let mut counter = 0;

    for &result in results {
        if kind.extends(result) {
            counter += 1;
            samples.push(counter);
        } else if kind.breaks(result) {
            counter = 0;
        }
    }

    samples
}

pub fn max_or_zero(samples: &[i64]) -> i64 {
    samples.iter().copied().max().unwrap_or(0)
}

pub fn longest_streak(results: &[ResultValue], kind: StreakKind) -> i64 {
    max_or_zero(&streak_samples(results, kind))
}
