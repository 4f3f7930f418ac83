//! banca — terminal reader for a headless-CMS marketing blog.
//!
//! The crate splits into three layers:
//!
//! - **Domain** (`listing`, `search`): pure filtering/sorting/aggregation
//!   over the article store, and the debounced search session with
//!   stale-response suppression. No I/O.
//! - **Collaborators** (`cms`, `config`, `sitemap`): thin boundaries — the
//!   CMS HTTP client, the TOML configuration (which carries the topic
//!   taxonomy), and sitemap generation.
//! - **Shell** (`app`, `ui`): event-driven TUI wiring the domain to
//!   keystrokes, a tick timer and background tasks.

pub mod app;
pub mod cms;
pub mod config;
pub mod listing;
pub mod search;
pub mod sitemap;
pub mod ui;
pub mod util;
