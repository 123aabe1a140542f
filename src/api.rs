//! Client for the comment endpoints of the Conduit REST API.
//!
//! The mutating calls never fail: whatever the server (or the network) does, they hand back an
//! [`ApiResponse`], or `None` when nothing came back at all, and log the problem. Listing an
//! article's comments is different and propagates failures so the page can show an error state.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::data::{Comment, CommentEnvelope, Comments};
use crate::error::{Error, Result};

const AGENT: &str = concat!("conduit-comments/", env!("CARGO_PKG_VERSION"));

/// The response to a non-failing API call.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: StatusCode,

    /// The decoded body, if the server sent one of the expected shape.
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl ApiResponse<CommentEnvelope> {
    /// The returned comment, only when the call answered 200 with a comment payload.
    pub fn comment(self) -> Option<Comment> {
        if self.status != StatusCode::OK {
            return None;
        }
        self.data?.comment
    }
}

#[derive(Serialize)]
struct NewComment<'a> {
    comment: NewCommentBody<'a>,
}

#[derive(Serialize)]
struct NewCommentBody<'a> {
    body: &'a str,
}

#[derive(Clone)]
pub struct CommentApi {
    client: Client,
    base: Url,
}

impl CommentApi {
    /// Create a client for the API rooted at `base_url`, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = parse_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(AGENT)
            .build()
            .map_err(Error::Client)?;
        Ok(CommentApi { client, base })
    }

    /// The base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Post a new comment on the article `slug`.
    pub async fn create(
        &self,
        slug: &str,
        body: &str,
        token: Option<&str>,
    ) -> Option<ApiResponse<CommentEnvelope>> {
        let url = self.url(&["articles", slug, "comments"]);
        let payload = NewComment {
            comment: NewCommentBody { body },
        };
        self.send(self.request(Method::POST, url, token).json(&payload))
            .await
    }

    /// Delete the comment `comment_id` of the article `slug`.
    pub async fn delete(
        &self,
        slug: &str,
        comment_id: &str,
        token: Option<&str>,
    ) -> Option<ApiResponse<()>> {
        let url = self.url(&["articles", slug, "comments", comment_id]);
        let response = self
            .send::<serde_json::Value>(self.request(Method::DELETE, url, token))
            .await?;
        Some(ApiResponse {
            status: response.status,
            data: None,
        })
    }

    /// List the comments of the article `slug`.
    ///
    /// With a token the server annotates each comment with the viewer's reaction.
    pub async fn for_article(&self, slug: &str, token: Option<&str>) -> Result<Comments> {
        let url = self.url(&["articles", slug, "comments"]);
        debug!(%url, authenticated = token.is_some(), "Listing comments");

        let response = self
            .request(Method::GET, url.clone(), token)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status,
                url: url.to_string(),
            });
        }

        response.json().await.map_err(Error::Decode)
    }

    pub async fn like(
        &self,
        comment_id: &str,
        token: Option<&str>,
    ) -> Option<ApiResponse<CommentEnvelope>> {
        let url = self.url(&["comments", comment_id, "like"]);
        self.send(self.request(Method::POST, url, token)).await
    }

    pub async fn dislike(
        &self,
        comment_id: &str,
        token: Option<&str>,
    ) -> Option<ApiResponse<CommentEnvelope>> {
        let url = self.url(&["comments", comment_id, "dislike"]);
        self.send(self.request(Method::POST, url, token)).await
    }

    pub async fn remove_reaction(
        &self,
        comment_id: &str,
        token: Option<&str>,
    ) -> Option<ApiResponse<CommentEnvelope>> {
        let url = self.url(&["comments", comment_id, "reaction"]);
        self.send(self.request(Method::DELETE, url, token)).await
    }

    /// Append percent-encoded path segments to the base URL.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // The base was checked to be hierarchical when the client was built.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, url);
        match token {
            Some(token) => request.header(AUTHORIZATION, format!("Token {token}")),
            None => request,
        }
    }

    /// Send a request, folding every failure into the returned value.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Option<ApiResponse<T>> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!("API request failed without a response: {err}");
                return None;
            }
        };

        let status = response.status();
        let url = response.url().clone();
        if status.is_success() {
            debug!(%url, %status, "API request succeeded");
        } else {
            warn!(%url, %status, "API request was refused");
        }

        let data = match response.json::<T>().await {
            Ok(data) => Some(data),
            Err(err) => {
                debug!(%url, "Response body not decoded: {err}");
                None
            }
        };

        Some(ApiResponse { status, data })
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let invalid = |reason: &str| Error::BaseUrl {
        url: base_url.to_owned(),
        reason: reason.to_owned(),
    };

    let url = Url::parse(base_url.trim()).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("expected an http or https URL"));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("the URL cannot carry a path"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("the URL must not carry a query or fragment"));
    }
    Ok(url)
}
