//! Terminal user interface.
//!
//! - `loop_runner` - main event loop, terminal management, background spawns
//! - `input` - keyboard dispatch for the listing, menu and search surfaces
//! - `events` - background task event processing
//! - `render` - listing view rendering
//! - `menu` - navigation menu overlay
//! - `search` - search overlay

mod events;
mod input;
mod loop_runner;
mod menu;
mod render;
mod search;

pub use loop_runner::{run, Action};
