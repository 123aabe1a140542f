use axum::extract::{Form, Path as ReqPath, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};

use maud::Markup;
use url::Url;

use crate::cache::cache_key;
use crate::data::*;
use crate::html;
use crate::AppState;

pub mod auth;
pub mod delete;
pub mod pages;
pub mod post;

/// The value of cookie `key`, if the request carries it.
pub fn get_cookie<'a>(headers: &'a HeaderMap, key: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, _)| *name == key)
        .map(|(_, value)| value)
}

/// An absolute path made of percent-encoded `segments`.
fn path(segments: &[&str]) -> String {
    match Url::parse("http://localhost/") {
        Ok(mut url) => {
            if let Ok(mut path) = url.path_segments_mut() {
                path.clear().extend(segments);
            }
            url.path().to_owned()
        }
        Err(_) => format!("/{}", segments.join("/")),
    }
}

/// Where the comment section of `slug` is served.
pub fn comments_page(slug: &str) -> String {
    path(&["article", slug, "comments"])
}

pub fn profile_page(username: &str) -> String {
    path(&["profile", username])
}

/// Where a form acting on one comment posts to, e.g. `like` or `delete`.
pub fn comment_action(slug: &str, id: &str, action: &str) -> String {
    path(&["article", slug, "comments", id, action])
}

/// The comment section of `slug`, scrolled to comment `id`.
pub fn comment_anchor(slug: &str, id: &str) -> String {
    format!("{}#comment-{}", comments_page(slug), &path(&[id])[1..])
}
