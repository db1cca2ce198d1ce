use std::sync::Arc;

use axum::{routing::get, Router};

use super::handlers::{graphiql, graphql_handler, GraphQlState};
use super::schema::build_schema;
use super::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let tokens = Arc::clone(&state.tokens);
    let schema = build_schema(state);

    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .with_state(GraphQlState { schema, tokens })
}
