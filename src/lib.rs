//! tunegrab library
//!
//! A small web application that logs a user into Spotify, lists their
//! playlists, and downloads the tracks of a playlist as MP3 files. Each track
//! is searched on YouTube, converted to a direct MP3 link by an external
//! conversion service, and streamed into a local downloads directory.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the web interface
//! - `cli` - Command-line command implementations
//! - `config` - Configuration management and environment variables
//! - `download` - The search, convert and save pipeline for track batches
//! - `management` - Session and job state kept by the server
//! - `server` - Router construction and the HTTP server loop
//! - `spotify` - Spotify Web API client (OAuth and playlists)
//! - `types` - Data structures shared across modules
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use tunegrab::{config, download::Downloader};
//!
//! #[tokio::main]
//! async fn main() -> tunegrab::Res<()> {
//!     config::load_env().await?;
//!     let downloader = Downloader::new(config::download_settings()?)?;
//!     // Run batches...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Uses a boxed dynamic error trait object with Send + Sync bounds so errors
/// can cross task boundaries in async contexts.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Searching YouTube for: {}", query);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Successfully downloaded: {}", name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for fatal errors, such as missing configuration at startup.
/// Code after this macro does not execute.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems, for example a track that is skipped
/// because no video or download link was found.
///
/// # Example
///
/// ```
/// warning!("No results found for {}", query);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
