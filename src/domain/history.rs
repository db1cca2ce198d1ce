
use crate::database::PlayerResult;

/// One point of a player's running balance.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    pub value: i64,
    pub date: String,
    pub name: String,
}

/// Sort entries by game date, newest first.
pub fn sort_newest_first(results: &mut [PlayerResult]) {
    results.sort_by(|a, b| b.game_date.cmp(&a.game_date));
}

/// Cumulative balance after each game, oldest game first.
pub fn running_balance(player_name: &str, results: &[PlayerResult]) -> Vec<HistoryPoint> {
    let mut ordered: Vec<&PlayerResult> = results.iter().collect();
    ordered.sort_by_key(|r| r.game_date);

    ordered
        .into_iter()
        .scan(0i64, |total, entry| {
            *total += entry.result;
            Some(HistoryPoint {
                value: *total,
                date: entry.game_date.format("%a %b %d %Y").to_string(),
                name: player_name.to_string(),
            })
        })
        .collect()
}
