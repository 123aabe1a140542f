/// An authenticated viewer.
///
/// Anonymous viewers are represented by `Option<Viewer>::None` and passed around explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    /// The viewer's username, compared against comment authors.
    pub username: String,

    /// Opaque session token sent as `Authorization: Token <token>`.
    pub token: String,
}

impl Viewer {
    /// Build a viewer from session values. Empty values mean there is no session.
    pub fn new(username: &str, token: &str) -> Option<Self> {
        let username = username.trim();
        let token = token.trim();
        if username.is_empty() || token.is_empty() {
            return None;
        }
        Some(Viewer {
            username: username.to_owned(),
            token: token.to_owned(),
        })
    }

    /// Whether this viewer wrote `comment`.
    pub fn owns(&self, comment: &super::Comment) -> bool {
        comment.is_authored_by(&self.username)
    }
}

/// The token of an optional viewer.
pub fn token(viewer: Option<&Viewer>) -> Option<&str> {
    viewer.map(|v| v.token.as_str())
}
