pub mod connection;
pub mod games;
pub mod models;
pub mod players;
pub mod results;
pub mod setup;
pub mod users;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use models::*;
