mod auth;
mod jobs;
mod session;

pub use auth::TokenManager;
pub use jobs::JobRegistry;
pub use jobs::JobState;
pub use jobs::JobStatus;
pub use session::MemorySessionStore;
pub use session::SessionStore;
