use async_graphql::{ErrorExtensions, Value};
use log::error;

use crate::errors::{LedgerError, LedgerResult};

impl ErrorExtensions for LedgerError {
    fn extend(&self) -> async_graphql::Error {
        if let LedgerError::Storage(e) = self {
            error!("Storage failure: {e:#}");
        }

        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| {
            ext.set("code", self.code().to_string());

            if let LedgerError::PlayerUpdatesFailed(failures) = self {
                let players = failures
                    .iter()
                    .map(|f| serde_json::json!({ "playerId": f.player_id, "reason": f.reason }))
                    .collect::<Vec<_>>();
                if let Ok(players) = Value::from_json(serde_json::Value::Array(players)) {
                    ext.set("players", players);
                }
            }
        })
    }
}

/// Parse a GraphQL `ID` holding a numeric row id.
pub fn parse_id(raw: &str, entity: &'static str) -> LedgerResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| LedgerError::validation(format!("invalid {entity} id '{raw}'")))
}

/// Missing required argument, reported like any other validation failure.
pub fn required<T>(value: Option<T>, what: &str) -> LedgerResult<T> {
    value.ok_or_else(|| LedgerError::validation(format!("{what} is required")))
}
