pub mod errors;
pub mod handlers;
pub mod inputs;
pub mod mutation;
pub mod query;
pub mod routes;
pub mod schema;
pub mod state;
pub mod types;

pub use routes::create_router;
pub use schema::{build_schema, export_schema_sdl, LedgerSchema};
pub use state::AppState;
