use serde::Deserialize;
use tracing::info;

use super::*;
use crate::reaction::{self, Button, Denied, Outcome};

#[derive(Deserialize)]
pub struct NewComment {
    body: String,
}

/// Post a comment on an article, then return to its comment section.
pub async fn comment(
    headers: HeaderMap,
    State(state): State<AppState>,
    ReqPath(slug): ReqPath<String>,
    Form(form): Form<NewComment>,
) -> Response {
    let Some(viewer) = auth::get_viewer(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let body = form.body.trim();
    if body.is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let Some(response) = state.api.create(&slug, body, Some(&viewer.token)).await else {
        return StatusCode::BAD_GATEWAY.into_response();
    };
    if !response.is_success() {
        return response.status.into_response();
    }

    info!(slug = %slug, user = %viewer.username, "Comment posted");
    state
        .caches
        .lock()
        .await
        .invalidate_everywhere(&cache_key(state.api.base_url(), &slug));

    Redirect::to(&comments_page(&slug)).into_response()
}

pub async fn like(
    headers: HeaderMap,
    State(state): State<AppState>,
    ReqPath((slug, id)): ReqPath<(String, String)>,
) -> Response {
    react(&headers, &state, &slug, &id, Button::Like).await
}

pub async fn dislike(
    headers: HeaderMap,
    State(state): State<AppState>,
    ReqPath((slug, id)): ReqPath<(String, String)>,
) -> Response {
    react(&headers, &state, &slug, &id, Button::Dislike).await
}

/// Apply a reaction click and return to the comment, which renders from the patched cache.
///
/// A failed call returns to the comment as well; it simply shows the prior state.
async fn react(headers: &HeaderMap, state: &AppState, slug: &str, id: &str, button: Button) -> Response {
    let viewer = auth::get_viewer(headers);
    match reaction::react(&state.api, &state.caches, viewer.as_ref(), slug, id, button).await {
        Outcome::Applied(_) | Outcome::Failed(_) => {
            Redirect::to(&comment_anchor(slug, id)).into_response()
        }
        Outcome::Denied(Denied::Anonymous) => StatusCode::UNAUTHORIZED.into_response(),
        Outcome::Denied(Denied::OwnComment) => StatusCode::FORBIDDEN.into_response(),
        Outcome::NotFound => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{any, body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::routes::testing::{location, signed_in, state};
    use super::*;
    use crate::data::comment::tests::comment;

    fn ids(slug: &str, id: &str) -> ReqPath<(String, String)> {
        ReqPath((slug.to_owned(), id.to_owned()))
    }

    async fn seed(state: &AppState, viewer: Option<&Viewer>, comments: Vec<Comment>) {
        state
            .caches
            .lock()
            .await
            .scope_mut(viewer)
            .insert(cache_key(state.api.base_url(), "my-article"), Comments { comments });
    }

    async fn cached(state: &AppState, viewer: Option<&Viewer>) -> Option<Comments> {
        state
            .caches
            .lock()
            .await
            .get(viewer, &cache_key(state.api.base_url(), "my-article"))
            .cloned()
    }

    #[tokio::test]
    async fn posting_invalidates_every_viewer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/articles/my-article/comments"))
            .and(header("Authorization", "Token abc"))
            .and(body_json(json!({ "comment": { "body": "Great read" } })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "comment": comment("c3", "jake", 0, None)
            })))
            .expect(1)
            .mount(&server)
            .await;

        let state = state(&server);
        let jake = Viewer::new("jake", "abc");
        seed(&state, jake.as_ref(), vec![comment("c1", "anna", 0, None)]).await;
        seed(&state, None, vec![comment("c1", "anna", 0, None)]).await;

        let response = super::comment(
            signed_in("jake", "abc"),
            State(state.clone()),
            ReqPath("my-article".to_owned()),
            Form(NewComment {
                body: "  Great read ".to_owned(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/article/my-article/comments"));
        assert!(cached(&state, jake.as_ref()).await.is_none());
        assert!(cached(&state, None).await.is_none());
    }

    #[tokio::test]
    async fn posting_needs_a_session_and_a_body() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;
        let state = state(&server);

        let anonymous = super::comment(
            HeaderMap::new(),
            State(state.clone()),
            ReqPath("my-article".to_owned()),
            Form(NewComment {
                body: "Hello".to_owned(),
            }),
        )
        .await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let blank = super::comment(
            signed_in("jake", "abc"),
            State(state),
            ReqPath("my-article".to_owned()),
            Form(NewComment {
                body: "   ".to_owned(),
            }),
        )
        .await;
        assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn refused_post_keeps_cache() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/articles/my-article/comments"))
            .respond_with(ResponseTemplate::new(422))
            .expect(1)
            .mount(&server)
            .await;

        let state = state(&server);
        let jake = Viewer::new("jake", "abc");
        seed(&state, jake.as_ref(), vec![comment("c1", "anna", 0, None)]).await;

        let response = super::comment(
            signed_in("jake", "abc"),
            State(state.clone()),
            ReqPath("my-article".to_owned()),
            Form(NewComment {
                body: "Hello".to_owned(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(cached(&state, jake.as_ref()).await.is_some());
    }

    #[tokio::test]
    async fn like_redirects_to_patched_comment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/comments/c1/like"))
            .and(header("Authorization", "Token abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "comment": comment("c1", "anna", 3, Some(Reaction::Like))
            })))
            .expect(1)
            .mount(&server)
            .await;

        let state = state(&server);
        let jake = Viewer::new("jake", "abc");
        seed(
            &state,
            jake.as_ref(),
            vec![comment("c1", "anna", 2, None), comment("c2", "jake", 0, None)],
        )
        .await;

        let response = like(
            signed_in("jake", "abc"),
            State(state.clone()),
            ids("my-article", "c1"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/article/my-article/comments#comment-c1"));

        let comments = cached(&state, jake.as_ref()).await.unwrap();
        assert_eq!(comments.comments[0].like_count, 3);
        assert_eq!(comments.comments[1], comment("c2", "jake", 0, None));
    }

    #[tokio::test]
    async fn denied_reactions_map_to_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles/my-article/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "comments": [comment("c2", "jake", 0, None)]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let state = state(&server);
        let jake = Viewer::new("jake", "abc");
        seed(&state, jake.as_ref(), vec![comment("c2", "jake", 0, None)]).await;

        let anonymous = dislike(HeaderMap::new(), State(state.clone()), ids("my-article", "c2")).await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let own = dislike(
            signed_in("jake", "abc"),
            State(state.clone()),
            ids("my-article", "c2"),
        )
        .await;
        assert_eq!(own.status(), StatusCode::FORBIDDEN);

        let unknown = like(signed_in("jake", "abc"), State(state), ids("my-article", "c9")).await;
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reacting_after_another_viewer_posts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/articles/my-article/comments"))
            .and(header("Authorization", "Token abc"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "comment": comment("c3", "jake", 0, None)
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/articles/my-article/comments"))
            .and(header("Authorization", "Token def"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "comments": [comment("c1", "jake", 0, None), comment("c3", "jake", 0, None)]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/comments/c3/like"))
            .and(header("Authorization", "Token def"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "comment": comment("c3", "jake", 1, Some(Reaction::Like))
            })))
            .expect(1)
            .mount(&server)
            .await;

        let state = state(&server);
        let anna = Viewer::new("anna", "def");
        seed(&state, anna.as_ref(), vec![comment("c1", "jake", 0, None)]).await;

        let posted = super::comment(
            signed_in("jake", "abc"),
            State(state.clone()),
            ReqPath("my-article".to_owned()),
            Form(NewComment {
                body: "Hello".to_owned(),
            }),
        )
        .await;
        assert_eq!(posted.status(), StatusCode::SEE_OTHER);

        let liked = like(signed_in("anna", "def"), State(state.clone()), ids("my-article", "c3")).await;
        assert_eq!(liked.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&liked), Some("/article/my-article/comments#comment-c3"));

        let comments = cached(&state, anna.as_ref()).await.unwrap();
        assert_eq!(comments.find("c3").map(|c| c.like_count), Some(1));
    }

    #[tokio::test]
    async fn redirects_are_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/articles/caf%C3%A9%20au%20lait/comments"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let response = super::comment(
            signed_in("jake", "abc"),
            State(state(&server)),
            ReqPath("café au lait".to_owned()),
            Form(NewComment {
                body: "Hello".to_owned(),
            }),
        )
        .await;

        assert_eq!(
            location(&response),
            Some("/article/caf%C3%A9%20au%20lait/comments")
        );
    }
}
