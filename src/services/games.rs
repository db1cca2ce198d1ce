use std::collections::HashSet;

use anyhow::Context;
use chrono::Local;
use log::info;
use rusqlite::TransactionBehavior;

use crate::config::LedgerSettings;
use crate::database::{self, DbPool, Game, GameFields};
use crate::domain::{canonical_name, resolve_name};
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::{GameId, PlayerId, ResultValue};
use crate::pagination::{has_more, page_links, PageLink, PaginationConfig};
use crate::services::results::{record_result, withdraw_result, PlayerUpdates};

/// Input of `create_game`.
#[derive(Debug, Clone, Default)]
pub struct NewGame {
    pub name: Option<String>,
    pub date: Option<String>,
    pub buy_in: Option<i64>,
    pub is_big_game: Option<bool>,
    pub players: Vec<PlayerId>,
}

/// Input of `apply_result`: the full outcome of one game.
#[derive(Debug, Clone, Default)]
pub struct GameOutcome {
    pub game_id: Option<GameId>,
    pub name: Option<String>,
    pub date: Option<String>,
    pub players: Vec<PlayerId>,
    pub results: Vec<ResultValue>,
    pub buy_in: Option<i64>,
    pub is_big_game: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct GamePage {
    pub page_count: usize,
    pub item_count: usize,
    pub data: Vec<Game>,
    pub has_more: bool,
    pub pages: Vec<PageLink>,
}

pub struct GameService {
    pool: DbPool,
    settings: LedgerSettings,
}

impl GameService {
    pub fn new(pool: DbPool, settings: LedgerSettings) -> Self {
        Self { pool, settings }
    }

    pub fn create_game(&self, input: NewGame) -> LedgerResult<Game> {
        ensure_distinct(&input.players)?;
        let resolved = resolve_name(
            input.name.as_deref(),
            input.date.as_deref(),
            Local::now().naive_local(),
        )?;

        let conn = database::get_connection(&self.pool)?;
        for player_id in &input.players {
            if database::players::find_by_id(&conn, *player_id)?.is_none() {
                return Err(LedgerError::not_found("player", player_id));
            }
        }
        if database::games::find_by_name(&conn, &resolved.name)?.is_some() {
            return Err(LedgerError::conflict(format!(
                "a game named {} already exists",
                resolved.name
            )));
        }

        let fields = GameFields {
            name: &resolved.name,
            date: resolved.date,
            buy_in: input.buy_in.unwrap_or(self.settings.default_buy_in),
            is_big_game: input.is_big_game.unwrap_or(false),
        };
        let game = database::games::insert_game(&conn, &fields, &input.players)?;

        info!("Created game {} ({}) with {} players", game.name, game.id, game.players.len());
        Ok(game)
    }

    /// Store the outcome of a game and bring every affected player's ledger
    /// up to date. All writes share one transaction; if any player fails the
    /// whole operation is rolled back and every failure is reported.
    pub fn apply_result(&self, outcome: GameOutcome) -> LedgerResult<Game> {
        let game_id = outcome
            .game_id
            .ok_or_else(|| LedgerError::validation("game id is required"))?;
        if outcome.results.len() != outcome.players.len() {
            return Err(LedgerError::validation(format!(
                "{} results given for {} players",
                outcome.results.len(),
                outcome.players.len()
            )));
        }
        if let Some(result) = outcome.results.iter().find(|r| i32::try_from(**r).is_err()) {
            return Err(LedgerError::validation(format!("result {result} is out of range")));
        }
        ensure_distinct(&outcome.players)?;

        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to open transaction")?;

        let existing = database::games::find_by_id(&tx, game_id)?
            .ok_or_else(|| LedgerError::not_found("game", game_id))?;

        let (name, date) = if outcome.name.is_some() || outcome.date.is_some() {
            let resolved = resolve_name(
                outcome.name.as_deref(),
                outcome.date.as_deref(),
                Local::now().naive_local(),
            )?;
            (resolved.name, resolved.date)
        } else {
            (existing.name.clone(), existing.date)
        };
        if let Some(other) = database::games::find_by_name(&tx, &name)? {
            if other.id != game_id {
                return Err(LedgerError::conflict(format!(
                    "a game named {name} already exists"
                )));
            }
        }

        let fields = GameFields {
            name: &name,
            date,
            buy_in: outcome.buy_in.unwrap_or(existing.buy_in),
            is_big_game: outcome.is_big_game.unwrap_or(existing.is_big_game),
        };
        database::games::update_fields(&tx, game_id, &fields)?;
        database::games::replace_roster(&tx, game_id, &outcome.players, &outcome.results)?;

        let mut updates = PlayerUpdates::new();
        for (player_id, result) in outcome.players.iter().zip(&outcome.results) {
            updates.track(*player_id, record_result(&tx, *player_id, game_id, *result));
        }

        let dropped: Vec<PlayerId> = database::results::players_for_game(&tx, game_id)?
            .into_iter()
            .filter(|id| !outcome.players.contains(id))
            .collect();
        for player_id in dropped {
            updates.track(player_id, withdraw_result(&tx, player_id, game_id));
        }

        updates.finish()?;
        tx.commit().context("Failed to commit game results")?;

        info!("Saved results of game {name} ({game_id}) for {} players", outcome.players.len());
        database::games::find_by_id(&conn, game_id)?
            .ok_or_else(|| LedgerError::not_found("game", game_id))
    }

    /// Delete a game and remove its entries from every affected player.
    pub fn remove_game(&self, game_id: Option<GameId>) -> LedgerResult<Game> {
        let game_id = game_id.ok_or_else(|| LedgerError::validation("game id is required"))?;

        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to open transaction")?;

        let game = database::games::find_by_id(&tx, game_id)?
            .ok_or_else(|| LedgerError::not_found("game", game_id))?;

        let mut affected = game.players.clone();
        for player_id in database::results::players_for_game(&tx, game_id)? {
            if !affected.contains(&player_id) {
                affected.push(player_id);
            }
        }

        let mut updates = PlayerUpdates::new();
        for player_id in affected {
            updates.track(player_id, withdraw_result(&tx, player_id, game_id));
        }
        updates.finish()?;

        database::games::delete_game(&tx, game_id)?;
        tx.commit().context("Failed to commit game removal")?;

        info!("Deleted game {} ({})", game.name, game.id);
        Ok(game)
    }

    pub fn find_by_id(&self, game_id: GameId) -> LedgerResult<Game> {
        let conn = database::get_connection(&self.pool)?;
        database::games::find_by_id(&conn, game_id)?
            .ok_or_else(|| LedgerError::not_found("game", game_id))
    }

    pub fn find_by_name(&self, name: &str) -> LedgerResult<Game> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::validation("game name is required"));
        }

        let canonical = canonical_name(name);
        let lookup = canonical.as_deref().unwrap_or(name);

        let conn = database::get_connection(&self.pool)?;
        database::games::find_by_name(&conn, lookup)?
            .ok_or_else(|| LedgerError::not_found("game", name))
    }

    pub fn count(&self) -> LedgerResult<i64> {
        let conn = database::get_connection(&self.pool)?;
        Ok(database::games::count(&conn)?)
    }

    pub fn list_page(&self, limit: Option<i64>, page: Option<i64>) -> LedgerResult<GamePage> {
        let config = PaginationConfig::new(&self.settings)
            .with_limit(limit, self.settings.max_page_size)
            .with_page(page);

        let offset = config
            .offset()
            .ok_or_else(|| LedgerError::validation(format!("page {} is out of range", config.page)))?;

        let conn = database::get_connection(&self.pool)?;
        let item_count = database::games::count(&conn)? as usize;
        let page_count = config.page_count(item_count);
        let data = database::games::list_page(&conn, config.limit, offset)?;

        Ok(GamePage {
            page_count,
            item_count,
            data,
            has_more: has_more(&config, page_count),
            pages: page_links(&config, page_count),
        })
    }
}

fn ensure_distinct(players: &[PlayerId]) -> LedgerResult<()> {
    let mut seen = HashSet::with_capacity(players.len());
    for player_id in players {
        if !seen.insert(*player_id) {
            return Err(LedgerError::validation(format!(
                "player {player_id} is listed more than once"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::{Arc, Barrier};
    use std::thread;

    use super::*;
    use crate::database::models::NewPlayer;
    use crate::database::Player;

    fn scratch_db(label: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "poker_ledger_{label}_{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    /// Run every job at the same moment, each on its own thread.
    fn run_together<T, F>(fx: &Arc<Fixture>, jobs: Vec<F>) -> Vec<T>
    where
        T: Send + 'static,
        F: FnOnce(&Fixture) -> T + Send + 'static,
    {
        let barrier = Arc::new(Barrier::new(jobs.len()));
        let workers: Vec<_> = jobs
            .into_iter()
            .map(|job| {
                let fx = Arc::clone(fx);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    job(&fx)
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    }

    struct Fixture {
        pool: DbPool,
        games: GameService,
    }

    impl Fixture {
        fn new() -> Self {
            Self::over(database::create_memory_pool().unwrap())
        }

        fn over(pool: DbPool) -> Self {
            let conn = database::get_connection(&pool).unwrap();
            database::setup::ensure_schema(&conn).unwrap();
            drop(conn);
            let games = GameService::new(pool.clone(), LedgerSettings::default());
            Self { pool, games }
        }

        fn player(&self, handle: &str) -> PlayerId {
            let conn = database::get_connection(&self.pool).unwrap();
            database::players::insert_player(
                &conn,
                &NewPlayer {
                    name: handle,
                    handle,
                    is_regular: false,
                    is_show_in_rating: true,
                },
            )
            .unwrap()
            .id
        }

        fn load(&self, id: PlayerId) -> Player {
            let conn = database::get_connection(&self.pool).unwrap();
            database::players::find_by_id(&conn, id).unwrap().unwrap()
        }

        fn results_of(&self, id: PlayerId) -> Vec<(GameId, ResultValue)> {
            let conn = database::get_connection(&self.pool).unwrap();
            database::results::list_for_player(&conn, id)
                .unwrap()
                .into_iter()
                .map(|r| (r.game_id, r.result))
                .collect()
        }

        fn game(&self, name: &str, players: &[PlayerId]) -> Game {
            self.games
                .create_game(NewGame {
                    name: Some(name.to_string()),
                    players: players.to_vec(),
                    ..Default::default()
                })
                .unwrap()
        }

        fn save(&self, game: &Game, players: &[PlayerId], results: &[ResultValue]) -> LedgerResult<Game> {
            self.games.apply_result(GameOutcome {
                game_id: Some(game.id),
                name: Some(game.name.clone()),
                players: players.to_vec(),
                results: results.to_vec(),
                ..Default::default()
            })
        }
    }

    fn assert_ledger_consistent(fixture: &Fixture, id: PlayerId) {
        let player = fixture.load(id);
        let results = fixture.results_of(id);
        assert_eq!(player.balance, results.iter().map(|(_, r)| r).sum::<i64>());
        assert_eq!(player.game_count, results.len() as i64);
    }

    #[test]
    fn test_create_game_defaults() {
        let fx = Fixture::new();
        let p1 = fx.player("p1");
        let game = fx.game("01.03.2024", &[p1]);

        assert_eq!(game.name, "01-03-2024");
        assert_eq!(game.buy_in, 500);
        assert!(!game.is_big_game);
        assert_eq!(game.players, vec![p1]);
        assert!(game.results.is_empty());
    }

    #[test]
    fn test_create_game_without_name_uses_today() {
        let fx = Fixture::new();
        let game = fx.games.create_game(NewGame::default()).unwrap();

        assert_eq!(game.name, Local::now().format("%d-%m-%Y").to_string());
    }

    #[test]
    fn test_duplicate_game_name_conflicts() {
        let fx = Fixture::new();
        fx.game("01.03.2024", &[]);

        for name in ["01.03.2024", "  01.03.2024 ", "01-03-2024", "1/3/2024"] {
            let err = fx
                .games
                .create_game(NewGame {
                    name: Some(name.to_string()),
                    ..Default::default()
                })
                .unwrap_err();
            assert!(matches!(err, LedgerError::Conflict(_)), "{name}");
        }
    }

    #[test]
    fn test_concurrent_duplicate_games_conflict() {
        let path = scratch_db("duplicate_games");
        let fx = Arc::new(Fixture::over(
            database::create_pool(path.to_str().unwrap()).unwrap(),
        ));

        let jobs = (0..4)
            .map(|_| {
                |fx: &Fixture| {
                    fx.games.create_game(NewGame {
                        name: Some("01.03.2024".to_string()),
                        ..Default::default()
                    })
                }
            })
            .collect();
        let outcomes = run_together(&fx, jobs);
        let stored = fx.games.count().unwrap();
        drop(fx);
        let _ = std::fs::remove_file(&path);

        assert_eq!(stored, 1);
        assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1);
        for outcome in outcomes.into_iter().filter(Result::is_err) {
            assert!(matches!(outcome, Err(LedgerError::Conflict(_))), "{outcome:?}");
        }
    }

    #[test]
    fn test_create_game_rejects_unknown_players() {
        let fx = Fixture::new();
        let err = fx
            .games
            .create_game(NewGame {
                name: Some("02.03.2024".to_string()),
                players: vec![42],
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
    }

    #[test]
    fn test_saved_result_reaches_players() {
        let fx = Fixture::new();
        let (p1, p2) = (fx.player("p1"), fx.player("p2"));
        let game = fx.game("01.03.2024", &[p1, p2]);

        let saved = fx.save(&game, &[p1, p2], &[100, -100]).unwrap();
        assert_eq!(saved.results, vec![100, -100]);

        let player = fx.load(p1);
        assert_eq!(player.balance, 100);
        assert_eq!(player.game_count, 1);
        assert_eq!(fx.results_of(p1), vec![(game.id, 100)]);
        assert_eq!(fx.load(p2).balance, -100);
        assert_eq!(fx.load(p2).max_series_of_loose, 1);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let fx = Fixture::new();
        let (p1, p2) = (fx.player("p1"), fx.player("p2"));
        let game = fx.game("01.03.2024", &[p1, p2]);

        fx.save(&game, &[p1, p2], &[250, -250]).unwrap();
        let first = fx.load(p1);
        fx.save(&game, &[p1, p2], &[250, -250]).unwrap();

        assert_eq!(fx.load(p1), first);
        assert_eq!(fx.results_of(p1).len(), 1);
    }

    #[test]
    fn test_resave_overwrites_in_place() {
        let fx = Fixture::new();
        let p1 = fx.player("p1");
        let first = fx.game("01.03.2024", &[p1]);
        let second = fx.game("08.03.2024", &[p1]);

        fx.save(&first, &[p1], &[100]).unwrap();
        fx.save(&second, &[p1], &[-50]).unwrap();
        fx.save(&first, &[p1], &[-10]).unwrap();

        // the first game keeps its place in the stored order
        assert_eq!(fx.results_of(p1), vec![(first.id, -10), (second.id, -50)]);
        let player = fx.load(p1);
        assert_eq!(player.balance, -60);
        assert_eq!(player.max_series_of_loose, 2);
        assert_eq!(player.max_series_of_win, 0);
    }

    #[test]
    fn test_dropped_player_is_cleaned() {
        let fx = Fixture::new();
        let (p1, p2, p3) = (fx.player("p1"), fx.player("p2"), fx.player("p3"));
        let game = fx.game("01.03.2024", &[p1, p2]);

        fx.save(&game, &[p1, p2], &[100, -100]).unwrap();
        fx.save(&game, &[p1, p3], &[40, -40]).unwrap();

        assert_eq!(fx.load(p2).balance, 0);
        assert!(fx.results_of(p2).is_empty());
        assert_eq!(fx.load(p3).balance, -40);
        for id in [p1, p2, p3] {
            assert_ledger_consistent(&fx, id);
        }
    }

    #[test]
    fn test_unknown_player_rolls_back_everything() {
        let fx = Fixture::new();
        let p1 = fx.player("p1");
        let game = fx.game("01.03.2024", &[p1]);

        let err = fx.save(&game, &[p1, 404, 405], &[10, 20, -30]).unwrap_err();
        match err {
            LedgerError::PlayerUpdatesFailed(failures) => {
                let ids: Vec<_> = failures.iter().map(|f| f.player_id).collect();
                assert_eq!(ids, vec![404, 405]);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(fx.load(p1).balance, 0);
        assert!(fx.results_of(p1).is_empty());
        let stored = fx.games.find_by_id(game.id).unwrap();
        assert_eq!(stored.players, vec![p1]);
        assert!(stored.results.is_empty());
    }

    #[test]
    fn test_concurrent_saves_keep_ledgers_consistent() {
        let path = scratch_db("concurrent_saves");
        let fx = Arc::new(Fixture::over(
            database::create_pool(path.to_str().unwrap()).unwrap(),
        ));
        let (p1, p2) = (fx.player("p1"), fx.player("p2"));
        let games: Vec<Game> = (1..=4)
            .map(|day| fx.game(&format!("0{day}.03.2024"), &[p1, p2]))
            .collect();

        let jobs = games
            .into_iter()
            .map(|game| move |fx: &Fixture| fx.save(&game, &[p1, p2], &[10, -10]))
            .collect();
        let outcomes = run_together(&fx, jobs);
        for outcome in &outcomes {
            assert!(outcome.is_ok(), "{outcome:?}");
        }

        assert_eq!(fx.load(p1).balance, 40);
        assert_eq!(fx.load(p1).max_series_of_win, 4);
        assert_eq!(fx.load(p2).game_count, 4);
        for id in [p1, p2] {
            assert_ledger_consistent(&fx, id);
        }
        drop(fx);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_apply_validation() {
        let fx = Fixture::new();
        let p1 = fx.player("p1");
        let game = fx.game("01.03.2024", &[p1]);

        let missing_id = fx.games.apply_result(GameOutcome::default()).unwrap_err();
        assert!(matches!(missing_id, LedgerError::Validation(_)));

        let mismatch = fx.save(&game, &[p1], &[10, 20]).unwrap_err();
        assert!(matches!(mismatch, LedgerError::Validation(_)));

        let twice = fx.save(&game, &[p1, p1], &[10, 20]).unwrap_err();
        assert!(matches!(twice, LedgerError::Validation(_)));

        let huge = fx.save(&game, &[p1], &[i64::MAX]).unwrap_err();
        assert!(matches!(huge, LedgerError::Validation(_)));
        assert!(fx.results_of(p1).is_empty());

        let unknown = fx
            .games
            .apply_result(GameOutcome {
                game_id: Some(999),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(unknown, LedgerError::NotFound { .. }));
    }

    #[test]
    fn test_rename_onto_other_game_conflicts() {
        let fx = Fixture::new();
        fx.game("01.03.2024", &[]);
        let second = fx.game("08.03.2024", &[]);

        let err = fx
            .games
            .apply_result(GameOutcome {
                game_id: Some(second.id),
                name: Some("01.03.2024".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, LedgerError::Conflict(_)));
    }

    #[test]
    fn test_apply_keeps_name_when_omitted() {
        let fx = Fixture::new();
        let p1 = fx.player("p1");
        let game = fx.game("01.03.2024", &[p1]);

        let saved = fx
            .games
            .apply_result(GameOutcome {
                game_id: Some(game.id),
                players: vec![p1],
                results: vec![5],
                buy_in: Some(1000),
                is_big_game: Some(true),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(saved.name, "01-03-2024");
        assert_eq!(saved.date, game.date);
        assert_eq!(saved.buy_in, 1000);
        assert!(saved.is_big_game);
    }

    #[test]
    fn test_remove_game_only_touches_its_entries() {
        let fx = Fixture::new();
        let (p1, p2, p3) = (fx.player("p1"), fx.player("p2"), fx.player("p3"));
        let first = fx.game("01.03.2024", &[p1, p2]);
        let second = fx.game("08.03.2024", &[p1, p3]);

        fx.save(&first, &[p1, p2], &[100, -100]).unwrap();
        fx.save(&second, &[p1, p3], &[-30, 30]).unwrap();

        let removed = fx.games.remove_game(Some(first.id)).unwrap();
        assert_eq!(removed.id, first.id);

        assert_eq!(fx.results_of(p1), vec![(second.id, -30)]);
        assert!(fx.results_of(p2).is_empty());
        assert_eq!(fx.results_of(p3), vec![(second.id, 30)]);

        let p1_after = fx.load(p1);
        assert_eq!(p1_after.balance, -30);
        assert_eq!(p1_after.max_series_of_win, 0);
        assert_eq!(p1_after.max_series_of_loose, 1);
        for id in [p1, p2, p3] {
            assert_ledger_consistent(&fx, id);
        }

        assert!(matches!(
            fx.games.find_by_id(first.id),
            Err(LedgerError::NotFound { .. })
        ));
        assert!(matches!(
            fx.games.remove_game(Some(first.id)),
            Err(LedgerError::NotFound { .. })
        ));
        assert!(matches!(
            fx.games.remove_game(None),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_list_page() {
        let fx = Fixture::new();
        for day in 1..=9 {
            fx.game(&format!("0{day}.03.2024"), &[]);
        }

        let page = fx.games.list_page(Some(4), Some(1)).unwrap();
        assert_eq!(page.item_count, 9);
        assert_eq!(page.page_count, 3);
        assert!(page.has_more);
        assert_eq!(page.data[0].name, "09-03-2024");
        let numbers: Vec<_> = page.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        let last = fx.games.list_page(Some(4), Some(3)).unwrap();
        assert_eq!(last.data.len(), 1);
        assert!(!last.has_more);
        assert_eq!(fx.games.count().unwrap(), 9);

        let beyond = fx.games.list_page(Some(4), Some(50)).unwrap();
        assert!(beyond.data.is_empty());
        assert!(matches!(
            fx.games.list_page(Some(10), Some(i64::MAX)),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_find_by_name() {
        let fx = Fixture::new();
        let game = fx.game("01.03.2024", &[]);

        for name in ["01-03-2024", "01.03.2024", " 1/3/2024 "] {
            assert_eq!(fx.games.find_by_name(name).unwrap().id, game.id, "{name}");
        }
        assert!(matches!(
            fx.games.find_by_name("02-03-2024"),
            Err(LedgerError::NotFound { .. })
        ));
        assert!(matches!(
            fx.games.find_by_name("  "),
            Err(LedgerError::Validation(_))
        ));
    }
}
