use super::*;

/// Get the signed-in viewer from the request's session cookies.
///
/// Returns `None` for anonymous requests. Tokens are issued by the API's own login flow; this
/// front end only forwards them.
pub(super) fn get_viewer(headers: &HeaderMap) -> Option<Viewer> {
    let username = get_cookie(headers, "conduit_user")?;
    let token = get_cookie(headers, "conduit_token")?;
    Viewer::new(username, token)
}
