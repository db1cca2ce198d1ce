use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use super::errors::{parse_id, required};
use super::inputs::{GameInput, PlayerInput, ResultInput, UpdateUserInput, UserInput};
use super::query::viewer;
use super::state::{run_blocking, AppState};
use super::types::{GameNode, PlayerNode, UserNode};

pub struct MutationRoot;

/// Reject non-admin callers before any data is touched.
fn require_admin(ctx: &Context<'_>) -> Result<()> {
    viewer(ctx).require_admin().map(|_| ()).map_err(|e| e.extend())
}

#[Object]
impl MutationRoot {
    async fn create_user(&self, ctx: &Context<'_>, user_input: Option<UserInput>) -> Result<UserNode> {
        let auth = ctx.data::<AppState>()?.auth();
        let input = required(user_input, "userInput").map_err(|e| e.extend())?;
        let user = run_blocking(move || auth.create_user(&input.email, &input.password)).await?;
        Ok(UserNode::from(user))
    }

    async fn update_user(
        &self,
        ctx: &Context<'_>,
        update_user_input: Option<UpdateUserInput>,
    ) -> Result<UserNode> {
        let auth = ctx.data::<AppState>()?.auth();
        let viewer = viewer(ctx);
        let change = required(update_user_input, "updateUserInput")
            .and_then(UpdateUserInput::into_change)
            .map_err(|e| e.extend())?;
        let user = run_blocking(move || auth.update_user(&viewer, change)).await?;
        Ok(UserNode::from(user))
    }

    /// Create a player, or update one when `id` is given.
    async fn create_player(
        &self,
        ctx: &Context<'_>,
        player_input: Option<PlayerInput>,
    ) -> Result<PlayerNode> {
        require_admin(ctx)?;
        let players = ctx.data::<AppState>()?.players();
        let draft = required(player_input, "playerInput")
            .and_then(PlayerInput::into_draft)
            .map_err(|e| e.extend())?;
        let player = run_blocking(move || players.save_player(draft)).await?;
        Ok(PlayerNode::from(player))
    }

    async fn create_game(&self, ctx: &Context<'_>, game_input: Option<GameInput>) -> Result<GameNode> {
        require_admin(ctx)?;
        let games = ctx.data::<AppState>()?.games();
        let new_game = match game_input {
            Some(input) => input.into_new_game().map_err(|e| e.extend())?,
            None => Default::default(),
        };
        let game = run_blocking(move || games.create_game(new_game)).await?;
        Ok(GameNode::from(game))
    }

    async fn save_game_result(
        &self,
        ctx: &Context<'_>,
        result_input: Option<ResultInput>,
    ) -> Result<GameNode> {
        require_admin(ctx)?;
        let games = ctx.data::<AppState>()?.games();
        let outcome = required(result_input, "resultInput")
            .and_then(ResultInput::into_outcome)
            .map_err(|e| e.extend())?;
        let game = run_blocking(move || games.apply_result(outcome)).await?;
        Ok(GameNode::from(game))
    }

    async fn delete_game(&self, ctx: &Context<'_>, id: Option<ID>) -> Result<GameNode> {
        require_admin(ctx)?;
        let games = ctx.data::<AppState>()?.games();
        let id = id
            .map(|id| parse_id(&id, "game"))
            .transpose()
            .map_err(|e| e.extend())?;
        let game = run_blocking(move || games.remove_game(id)).await?;
        Ok(GameNode::from(game))
    }
}
