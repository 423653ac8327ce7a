//! # API Module
//!
//! HTTP handlers of the web interface, built on [Axum](https://docs.rs/axum).
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`index`] - Landing page with a login link
//! - [`login`] - Starts the Spotify OAuth authorization code flow
//! - [`callback`] - Completes the flow and stores the token in the session
//! - [`logout`] - Drops the session
//!
//! ### Browsing
//!
//! - [`playlists`] - The user's playlists
//! - [`playlist`] - Tracks of one playlist, with download forms
//!
//! ### Downloads
//!
//! - [`download`] - Accepts a batch of `{name, artist}` tracks and starts the
//!   download pipeline in the background
//! - [`job_status`] - Per-track results of an accepted batch
//!
//! ### Monitoring
//!
//! - [`health`] - Status and version
//!
//! Sessions are identified by the `sid` cookie; the data behind it lives in
//! the [`crate::management::SessionStore`] held by the server state.

mod auth;
mod download;
mod health;
mod playlists;
pub mod session;
pub mod views;

pub use auth::callback;
pub use auth::index;
pub use auth::login;
pub use auth::logout;
pub use download::ACKNOWLEDGMENT;
pub use download::JOB_ID_HEADER;
pub use download::download;
pub use download::job_status;
pub use health::health;
pub use playlists::playlist;
pub use playlists::playlists;
