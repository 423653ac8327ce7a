//! # CLI Module
//!
//! Command implementations behind the `tunegrab` binary:
//!
//! - [`serve`] - Runs the web interface (login, playlists, `POST /download`)
//! - [`download`] - Runs one batch of tracks from the terminal and prints a
//!   summary table, without going through the web server
//!
//! Both commands read their settings from the environment (see
//! [`crate::config`]) and stop the process with a message when a required
//! value is missing.

mod download;
mod serve;

pub use download::download;
pub use serve::serve;
