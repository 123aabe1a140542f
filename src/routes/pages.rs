use tracing::warn;

use super::*;
use crate::cache;

/// The comment section of an article as a full page.
pub async fn comments(
    headers: HeaderMap,
    State(state): State<AppState>,
    ReqPath(slug): ReqPath<String>,
) -> Markup {
    let viewer = auth::get_viewer(&headers);
    let comments = load(&state, &slug, viewer.as_ref()).await;
    html::comments_page(&headers, &slug, viewer.as_ref(), comments.as_ref())
}

/// The comment section of an article without the surrounding page.
pub async fn comment_list(
    headers: HeaderMap,
    State(state): State<AppState>,
    ReqPath(slug): ReqPath<String>,
) -> Markup {
    let viewer = auth::get_viewer(&headers);
    let comments = load(&state, &slug, viewer.as_ref()).await;
    html::comments::section(&slug, viewer.as_ref(), comments.as_ref())
}

/// The comments of `slug` as `viewer` sees them, fetched fresh from the API.
///
/// Falls back to the last list cached for the viewer when the API cannot be reached, and
/// returns `None` when there is none.
async fn load(state: &AppState, slug: &str, viewer: Option<&Viewer>) -> Option<Comments> {
    let err = match cache::refresh(&state.api, &state.caches, viewer, slug).await {
        Ok(comments) => return Some(comments),
        Err(err) => err,
    };

    let key = cache_key(state.api.base_url(), slug);
    let cached = state.caches.lock().await.get(viewer, &key).cloned();
    match cached {
        Some(_) => warn!(slug, "Cannot load comments, serving cached ones: {err}"),
        None => warn!(slug, "Cannot load comments: {err}"),
    }
    cached
}
