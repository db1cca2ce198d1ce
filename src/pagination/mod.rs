pub mod config;
pub mod pages;

pub use config::PaginationConfig;
pub use pages::{has_more, page_links, PageLink};
