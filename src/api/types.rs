use async_graphql::{ComplexObject, Context, Enum, Result, SimpleObject, ID};

use super::state::{run_blocking, AppState};
use crate::auth::Claims;
use crate::database::{Game, Player, PlayerResult, User};
use crate::domain::{HistoryPoint, PlayerSort};
use crate::ledger::{GameId, PlayerId};
use crate::pagination::PageLink;
use crate::services::{AuthData, GamePage};

pub const GAME_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(SimpleObject, Clone)]
#[graphql(name = "Player", complex)]
pub struct PlayerNode {
    pub id: ID,
    pub name: String,
    pub handle: String,
    pub balance: i64,
    pub game_count: i64,
    pub max_series_of_win: i64,
    pub max_series_of_loose: i64,
    pub is_regular: bool,
    pub is_show_in_rating: bool,
    #[graphql(skip)]
    pub player_id: PlayerId,
    /// Entries already loaded in the order they should be shown.
    #[graphql(skip)]
    pub loaded_results: Option<Vec<PlayerResult>>,
}

impl PlayerNode {
    pub fn with_results(player: Player, results: Vec<PlayerResult>) -> Self {
        Self {
            loaded_results: Some(results),
            ..Self::from(player)
        }
    }
}

impl From<Player> for PlayerNode {
    fn from(player: Player) -> Self {
        Self {
            id: ID::from(player.id.to_string()),
            name: player.name,
            handle: player.handle,
            balance: player.balance,
            game_count: player.game_count,
            max_series_of_win: player.max_series_of_win,
            max_series_of_loose: player.max_series_of_loose,
            is_regular: player.is_regular,
            is_show_in_rating: player.is_show_in_rating,
            player_id: player.id,
            loaded_results: None,
        }
    }
}

#[ComplexObject]
impl PlayerNode {
    async fn results(&self, ctx: &Context<'_>) -> Result<Vec<PlayerResultNode>> {
        let entries = match &self.loaded_results {
            Some(entries) => entries.clone(),
            None => {
                let players = ctx.data::<AppState>()?.players();
                let id = self.player_id;
                run_blocking(move || players.results_for(id)).await?
            }
        };
        Ok(entries.into_iter().map(PlayerResultNode::from).collect())
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(name = "PlayerResult", complex)]
pub struct PlayerResultNode {
    pub id: ID,
    pub result: i64,
    #[graphql(skip)]
    pub game_id: GameId,
}

impl From<PlayerResult> for PlayerResultNode {
    fn from(entry: PlayerResult) -> Self {
        Self {
            id: ID::from(entry.id.to_string()),
            result: entry.result,
            game_id: entry.game_id,
        }
    }
}

#[ComplexObject]
impl PlayerResultNode {
    async fn game(&self, ctx: &Context<'_>) -> Result<GameNode> {
        let games = ctx.data::<AppState>()?.games();
        let id = self.game_id;
        let game = run_blocking(move || games.find_by_id(id)).await?;
        Ok(GameNode::from(game))
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(name = "Game", complex)]
pub struct GameNode {
    pub id: ID,
    pub name: String,
    pub is_big_game: bool,
    pub buy_in: i64,
    pub results: Vec<i64>,
    pub date: String,
    #[graphql(skip)]
    pub player_ids: Vec<PlayerId>,
}

impl From<Game> for GameNode {
    fn from(game: Game) -> Self {
        Self {
            id: ID::from(game.id.to_string()),
            name: game.name,
            is_big_game: game.is_big_game,
            buy_in: game.buy_in,
            results: game.results,
            date: game.date.format(GAME_DATE_FORMAT).to_string(),
            player_ids: game.players,
        }
    }
}

#[ComplexObject]
impl GameNode {
    async fn players(&self, ctx: &Context<'_>) -> Result<Vec<PlayerNode>> {
        let players = ctx.data::<AppState>()?.players();
        let ids = self.player_ids.clone();
        let found = run_blocking(move || players.find_many(&ids)).await?;
        Ok(found.into_iter().map(PlayerNode::from).collect())
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(name = "User")]
pub struct UserNode {
    pub id: ID,
    pub email: String,
    /// Never exposed.
    pub password: Option<String>,
    pub is_admin: bool,
}

impl From<User> for UserNode {
    fn from(user: User) -> Self {
        Self {
            id: ID::from(user.id.to_string()),
            email: user.email,
            password: None,
            is_admin: user.is_admin,
        }
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(name = "AuthData")]
pub struct AuthDataNode {
    pub user_id: ID,
    pub token: String,
    pub token_expiration: i64,
    pub is_admin: bool,
    pub email: String,
}

impl From<AuthData> for AuthDataNode {
    fn from(data: AuthData) -> Self {
        Self {
            user_id: ID::from(data.user_id.to_string()),
            token: data.token,
            token_expiration: data.token_expiration,
            is_admin: data.is_admin,
            email: data.email,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct UserData {
    pub id: ID,
    pub email: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

impl From<&Claims> for UserData {
    fn from(claims: &Claims) -> Self {
        Self {
            id: ID::from(claims.user_id.to_string()),
            email: claims.email.clone(),
            is_admin: claims.is_admin,
            iat: claims.iat,
            exp: claims.exp,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct PlayerHistory {
    pub value: i64,
    pub date: String,
    pub name: String,
}

impl From<HistoryPoint> for PlayerHistory {
    fn from(point: HistoryPoint) -> Self {
        Self {
            value: point.value,
            date: point.date,
            name: point.name,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct PageItem {
    pub number: i64,
    pub url: String,
}

impl From<PageLink> for PageItem {
    fn from(link: PageLink) -> Self {
        Self {
            number: link.number as i64,
            url: link.url,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct PagedGames {
    pub page_count: i64,
    pub item_count: i64,
    pub data: Vec<GameNode>,
    #[graphql(name = "has_more")]
    pub has_more: bool,
    pub pages: Vec<PageItem>,
}

impl From<GamePage> for PagedGames {
    fn from(page: GamePage) -> Self {
        Self {
            page_count: page.page_count as i64,
            item_count: page.item_count as i64,
            data: page.data.into_iter().map(GameNode::from).collect(),
            has_more: page.has_more,
            pages: page.pages.into_iter().map(PageItem::from).collect(),
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
#[graphql(rename_items = "camelCase")]
pub enum PlayersSortEnum {
    Balance,
    GameCount,
    MaxSeriesOfWin,
    MaxSeriesOfLoose,
}

impl From<PlayersSortEnum> for PlayerSort {
    fn from(sort: PlayersSortEnum) -> Self {
        match sort {
            PlayersSortEnum::Balance => PlayerSort::Balance,
            PlayersSortEnum::GameCount => PlayerSort::GameCount,
            PlayersSortEnum::MaxSeriesOfWin => PlayerSort::MaxSeriesOfWin,
            PlayersSortEnum::MaxSeriesOfLoose => PlayerSort::MaxSeriesOfLoose,
        }
    }
}
