//! Like/dislike toggling.
//!
//! A click is turned into exactly one API call. Whatever comment the server returns replaces the
//! cached one; counts are never adjusted locally.

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::api::{ApiResponse, CommentApi};
use crate::cache::{self, cache_key, CacheStore};
use crate::data::{Comment, CommentEnvelope, Reaction, Viewer};

/// The reaction button a viewer clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Like,
    Dislike,
}

/// The API call a click resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Like,
    Dislike,
    RemoveReaction,
}

/// Why a viewer may not react to a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denied {
    Anonymous,
    OwnComment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The server accepted the reaction; this is the comment it returned.
    Applied(Comment),

    /// The call failed or returned no comment. Holds the unchanged cached comment.
    Failed(Comment),

    Denied(Denied),

    /// The comment is not in the viewer's list of the article, or the list could not be loaded.
    NotFound,
}

/// Decide which call to make when `clicked` is pressed while the viewer's reaction is `current`.
///
/// Clicking the active button clears the reaction. Clicking the other one switches directly.
pub fn decide(current: Option<Reaction>, clicked: Button) -> Action {
    match (current, clicked) {
        (Some(Reaction::Like), Button::Like) | (Some(Reaction::Dislike), Button::Dislike) => {
            Action::RemoveReaction
        }
        (_, Button::Like) => Action::Like,
        (_, Button::Dislike) => Action::Dislike,
    }
}

/// Only signed-in viewers may react, and never to their own comments.
pub fn authorize<'v>(viewer: Option<&'v Viewer>, comment: &Comment) -> Result<&'v Viewer, Denied> {
    let viewer = viewer.ok_or(Denied::Anonymous)?;
    if viewer.owns(comment) {
        return Err(Denied::OwnComment);
    }
    Ok(viewer)
}

pub fn can_react(viewer: Option<&Viewer>, comment: &Comment) -> bool {
    authorize(viewer, comment).is_ok()
}

impl Action {
    pub async fn perform(
        self,
        api: &CommentApi,
        comment_id: &str,
        token: Option<&str>,
    ) -> Option<ApiResponse<CommentEnvelope>> {
        match self {
            Action::Like => api.like(comment_id, token).await,
            Action::Dislike => api.dislike(comment_id, token).await,
            Action::RemoveReaction => api.remove_reaction(comment_id, token).await,
        }
    }
}

/// Handle a click on a reaction button of comment `comment_id` of the article `slug`.
///
/// The current reaction is read from the viewer's cached list, which is fetched first if it is
/// not cached. The cache lock is not held while an API call is in flight.
pub async fn react(
    api: &CommentApi,
    caches: &Mutex<CacheStore>,
    viewer: Option<&Viewer>,
    slug: &str,
    comment_id: &str,
    clicked: Button,
) -> Outcome {
    let Some(viewer) = viewer else {
        return Outcome::Denied(Denied::Anonymous);
    };

    let key = cache_key(api.base_url(), slug);
    let cached = caches
        .lock()
        .await
        .get(Some(viewer), &key)
        .and_then(|comments| comments.find(comment_id))
        .cloned();
    let current = match cached {
        Some(comment) => Some(comment),
        None => match cache::refresh(api, caches, Some(viewer), slug).await {
            Ok(comments) => comments.find(comment_id).cloned(),
            Err(err) => {
                warn!(slug, comment_id, "Cannot load comments to react: {err}");
                None
            }
        },
    };
    let Some(current) = current else {
        debug!(slug, comment_id, "Reaction to a comment that is not listed");
        return Outcome::NotFound;
    };

    if let Err(denied) = authorize(Some(viewer), &current) {
        return Outcome::Denied(denied);
    }

    let action = decide(current.user_reaction, clicked);
    debug!(comment_id, ?action, user = %viewer.username, "Reacting");

    let response = action.perform(api, &current.id, Some(&viewer.token)).await;
    let Some(updated) = response.and_then(ApiResponse::comment) else {
        warn!(comment_id, ?action, "Reaction not applied");
        return Outcome::Failed(current);
    };

    caches
        .lock()
        .await
        .scope_mut(Some(viewer))
        .replace_comment(&key, updated.clone());
    Outcome::Applied(updated)
}
