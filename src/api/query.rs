use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use super::errors::parse_id;
use super::state::{run_blocking, AppState};
use super::types::{
    AuthDataNode, GameNode, PagedGames, PlayerHistory, PlayerNode, PlayersSortEnum,
    UserData,
};
use crate::auth::Viewer;

pub struct QueryRoot;

pub(super) fn viewer(ctx: &Context<'_>) -> Viewer {
    ctx.data_opt::<Viewer>().cloned().unwrap_or_default()
}

#[Object]
impl QueryRoot {
    /// Every player, ordered by `sortBy` (descending), then regulars first,
    /// then by name.
    async fn get_all_players(
        &self,
        ctx: &Context<'_>,
        sort_by: Option<PlayersSortEnum>,
    ) -> Result<Vec<PlayerNode>> {
        let players = ctx.data::<AppState>()?.players();
        let sort = sort_by.map(Into::into);
        let found = run_blocking(move || players.list_sorted(sort)).await?;
        Ok(found.into_iter().map(PlayerNode::from).collect())
    }

    async fn get_player(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "_id")] id: ID,
    ) -> Result<PlayerNode> {
        let players = ctx.data::<AppState>()?.players();
        let id = parse_id(&id, "player").map_err(|e| e.extend())?;
        let player = run_blocking(move || players.find_by_id(id)).await?;
        Ok(PlayerNode::from(player))
    }

    /// Player with results ordered by game date, newest first. An omitted
    /// handle matches nobody.
    async fn get_player_by_handle(
        &self,
        ctx: &Context<'_>,
        handle: Option<String>,
    ) -> Result<PlayerNode> {
        let players = ctx.data::<AppState>()?.players();
        let handle = handle.unwrap_or_default();
        let (player, results) = run_blocking(move || players.find_by_handle(&handle)).await?;
        Ok(PlayerNode::with_results(player, results))
    }

    async fn get_player_history(
        &self,
        ctx: &Context<'_>,
        handle: String,
    ) -> Result<Vec<PlayerHistory>> {
        let players = ctx.data::<AppState>()?.players();
        let points = run_blocking(move || players.history(&handle)).await?;
        Ok(points.into_iter().map(PlayerHistory::from).collect())
    }

    async fn get_players_history(
        &self,
        ctx: &Context<'_>,
        handles: Option<Vec<Option<String>>>,
    ) -> Result<Vec<PlayerHistory>> {
        let players = ctx.data::<AppState>()?.players();
        let handles: Vec<String> = handles.unwrap_or_default().into_iter().flatten().collect();
        let points = run_blocking(move || players.histories(&handles)).await?;
        Ok(points.into_iter().map(PlayerHistory::from).collect())
    }

    /// Games newest first, one page at a time.
    async fn get_all_games(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        page: Option<i32>,
    ) -> Result<PagedGames> {
        let games = ctx.data::<AppState>()?.games();
        let (limit, page) = (limit.map(i64::from), page.map(i64::from));
        let page = run_blocking(move || games.list_page(limit, page)).await?;
        Ok(PagedGames::from(page))
    }

    async fn get_game(&self, ctx: &Context<'_>, name: String) -> Result<GameNode> {
        let games = ctx.data::<AppState>()?.games();
        let game = run_blocking(move || games.find_by_name(&name)).await?;
        Ok(GameNode::from(game))
    }

    async fn get_game_count(&self, ctx: &Context<'_>) -> Result<i64> {
        let games = ctx.data::<AppState>()?.games();
        run_blocking(move || games.count()).await
    }

    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<AuthDataNode> {
        let auth = ctx.data::<AppState>()?.auth();
        let data = run_blocking(move || auth.login(&email, &password)).await?;
        Ok(AuthDataNode::from(data))
    }

    /// Claims of the caller's token.
    async fn user(&self, ctx: &Context<'_>) -> Result<UserData> {
        let viewer = viewer(ctx);
        let claims = viewer.require_auth().map_err(|e| e.extend())?;
        Ok(UserData::from(claims))
    }
}
