//! Headless CMS collaborators: the content API client and the search
//! backend wrapper. Everything here is a thin I/O boundary — domain logic
//! lives in `listing` and `search`.

mod client;
mod search;
mod types;

pub use client::CmsClient;
pub use search::filter_articles;
pub use types::{ArticleSummary, CmsError, Topic};
