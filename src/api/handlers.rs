use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    response::{Html, IntoResponse},
};

use super::schema::LedgerSchema;
use crate::auth::{TokenIssuer, Viewer};

#[derive(Clone)]
pub struct GraphQlState {
    pub schema: LedgerSchema,
    pub tokens: Arc<TokenIssuer>,
}

pub async fn graphql_handler(
    State(state): State<GraphQlState>,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let viewer = Viewer::from_header(&state.tokens, header);

    state
        .schema
        .execute(request.into_inner().data(viewer))
        .await
        .into()
}

pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
