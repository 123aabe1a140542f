pub use comment::{Comment, CommentEnvelope, Comments, Reaction};
pub use session::Viewer;

/// Data structures for comments as the API serves them.
pub mod comment;

/// The viewer's session, read from request cookies.
pub mod session;

/// Format a timestamp the way comment cards show it, e.g. `Fri Oct 16 2026`.
pub fn date(timestamp: &chrono::DateTime<chrono::Utc>) -> String {
    timestamp.format("%a %b %d %Y").to_string()
}
