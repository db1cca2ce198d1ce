pub mod history;
pub mod naming;
pub mod sorting;

pub use history::{running_balance, sort_newest_first, HistoryPoint};
pub use naming::{canonical_name, parse_day, resolve_name, ResolvedName};
pub use sorting::{sort_players, PlayerSort};
