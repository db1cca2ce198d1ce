pub mod auth;
pub mod games;
pub mod maintenance;
pub mod players;
pub mod results;
pub mod server;

pub use auth::{AuthData, AuthService, PasswordChange};
pub use games::{GameOutcome, GamePage, GameService, NewGame};
pub use players::{PlayerDirectory, PlayerDraft, StalePlayer};
