use async_graphql::{InputObject, ID};

use super::errors::parse_id;
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::{PlayerId, ResultValue};
use crate::services::{GameOutcome, NewGame, PasswordChange, PlayerDraft};

#[derive(InputObject)]
pub struct UserInput {
    pub email: String,
    pub password: String,
}

#[derive(InputObject)]
pub struct UpdateUserInput {
    pub id: String,
    pub password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

impl UpdateUserInput {
    pub fn into_change(self) -> LedgerResult<PasswordChange> {
        Ok(PasswordChange {
            id: parse_id(&self.id, "user")?,
            password: self.password,
            new_password: self.new_password,
            confirm_new_password: self.confirm_new_password,
        })
    }
}

#[derive(InputObject)]
pub struct PlayerInput {
    pub id: Option<ID>,
    pub name: String,
    pub handle: String,
    pub is_regular: Option<bool>,
    pub is_show_in_rating: Option<bool>,
}

impl PlayerInput {
    pub fn into_draft(self) -> LedgerResult<PlayerDraft> {
        let id = match self.id.as_ref().map(|id| id.trim()).filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_id(raw, "player")?),
            None => None,
        };
        Ok(PlayerDraft {
            id,
            name: self.name,
            handle: self.handle,
            is_regular: self.is_regular,
            is_show_in_rating: self.is_show_in_rating,
        })
    }
}

#[derive(InputObject)]
pub struct GameInput {
    pub name: Option<String>,
    pub date: Option<String>,
    pub is_big_game: Option<bool>,
    pub players: Option<Vec<ID>>,
    pub buy_in: Option<i64>,
}

impl GameInput {
    pub fn into_new_game(self) -> LedgerResult<NewGame> {
        Ok(NewGame {
            name: self.name,
            date: self.date,
            buy_in: self.buy_in,
            is_big_game: self.is_big_game,
            players: parse_roster(self.players)?,
        })
    }
}

#[derive(InputObject)]
pub struct ResultInput {
    pub id: String,
    pub name: Option<String>,
    pub date: Option<String>,
    pub players: Option<Vec<ID>>,
    pub results: Option<Vec<Option<i32>>>,
    pub is_big_game: Option<bool>,
    pub buy_in: Option<i64>,
}

impl ResultInput {
    pub fn into_outcome(self) -> LedgerResult<GameOutcome> {
        let game_id = match self.id.trim() {
            "" => None,
            raw => Some(parse_id(raw, "game")?),
        };
        let results = self
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|r| {
                r.map(ResultValue::from)
                    .ok_or_else(|| LedgerError::validation("results must not contain null"))
            })
            .collect::<LedgerResult<Vec<ResultValue>>>()?;

        Ok(GameOutcome {
            game_id,
            name: self.name,
            date: self.date,
            players: parse_roster(self.players)?,
            results,
            buy_in: self.buy_in,
            is_big_game: self.is_big_game,
        })
    }
}

fn parse_roster(players: Option<Vec<ID>>) -> LedgerResult<Vec<PlayerId>> {
    players
        .unwrap_or_default()
        .iter()
        .map(|id| parse_id(id, "player"))
        .collect()
}
