pub mod stats;
pub mod streaks;
pub mod types;

pub use stats::derive_stats;
pub use streaks::max_or_zero;
pub use types::{GameId, LedgerStats, PlayerId, ResultValue, StreakKind};
