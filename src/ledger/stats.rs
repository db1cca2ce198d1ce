use super::streaks::longest_streak;
use super::types::{LedgerStats, ResultValue, StreakKind};

/// Derive balance, game count and the longest win/loss runs from results in
/// their stored order. `None` when the balance does not fit in an `i64`.
pub fn derive_stats(results: &[ResultValue]) -> Option<LedgerStats> {
    let balance = results
        .iter()
        .try_fold(0i64, |total, result| total.checked_add(*result))?;

    Some(LedgerStats {
        balance,
        game_count: results.len() as i64,
        max_series_of_win: longest_streak(results, StreakKind::Win),
        max_series_of_loose: longest_streak(results, StreakKind::Loss),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_series() {
        let stats = derive_stats(&[100, 50, -20, 30, 30, -10, -10, -10]).unwrap();

        assert_eq!(stats.balance, 160);
        assert_eq!(stats.game_count, 8);
        assert_eq!(stats.max_series_of_win, 2);
        assert_eq!(stats.max_series_of_loose, 3);
    }

    #[test]
    fn test_zero_result_between_wins() {
        let stats = derive_stats(&[10, 0, 10]).unwrap();

        assert_eq!(stats.balance, 20);
        assert_eq!(stats.game_count, 3);
        assert_eq!(stats.max_series_of_win, 2);
        assert_eq!(stats.max_series_of_loose, 0);
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(derive_stats(&[]), Some(LedgerStats::default()));
    }

    #[test]
    fn test_order_matters() {
        let interleaved = derive_stats(&[10, -10, 10, -10]).unwrap();
        let grouped = derive_stats(&[10, 10, -10, -10]).unwrap();

        assert_eq!(interleaved.balance, grouped.balance);
        assert_eq!(interleaved.max_series_of_win, 1);
        assert_eq!(grouped.max_series_of_win, 2);
        assert_eq!(grouped.max_series_of_loose, 2);
    }

    #[test]
    fn test_negative_balance() {
        let stats = derive_stats(&[-500, 200, -100]).unwrap();
        assert_eq!(stats.balance, -400);
        assert_eq!(stats.max_series_of_loose, 1);
    }

    #[test]
    fn test_balance_overflow() {
        assert_eq!(derive_stats(&[i64::MAX, 1]), None);
        assert_eq!(derive_stats(&[i64::MIN, -1]), None);
        assert_eq!(derive_stats(&[i64::MAX, 1, -1]), None);
        assert_eq!(derive_stats(&[i64::MAX, -1, 1]).unwrap().balance, i64::MAX);
    }
}
