use tracing::info;

use super::*;

/// Delete one of the viewer's comments.
pub async fn comment(
    headers: HeaderMap,
    State(state): State<AppState>,
    ReqPath((slug, id)): ReqPath<(String, String)>,
) -> StatusCode {
    match remove(&headers, &state, &slug, &id).await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(status) => status,
    }
}

/// Delete one of the viewer's comments from a form, then return to the comment section.
pub async fn comment_form(
    headers: HeaderMap,
    State(state): State<AppState>,
    ReqPath((slug, id)): ReqPath<(String, String)>,
) -> Response {
    match remove(&headers, &state, &slug, &id).await {
        Ok(()) => Redirect::to(&comments_page(&slug)).into_response(),
        Err(status) => status.into_response(),
    }
}

async fn remove(headers: &HeaderMap, state: &AppState, slug: &str, id: &str) -> Result<(), StatusCode> {
    let viewer = auth::get_viewer(headers).ok_or(StatusCode::UNAUTHORIZED)?;
    let key = cache_key(state.api.base_url(), slug);

    // Refuse early when the cached list shows the comment belongs to someone else.
    let owned = state
        .caches
        .lock()
        .await
        .get(Some(&viewer), &key)
        .and_then(|comments| comments.find(id))
        .map(|comment| viewer.owns(comment));
    if owned == Some(false) {
        return Err(StatusCode::FORBIDDEN);
    }

    let response = state
        .api
        .delete(slug, id, Some(&viewer.token))
        .await
        .ok_or(StatusCode::BAD_GATEWAY)?;
    if !response.is_success() {
        return Err(response.status);
    }

    info!(slug, id, user = %viewer.username, "Comment deleted");
    state.caches.lock().await.invalidate_everywhere(&key);
    Ok(())
}
