use axum::http::HeaderMap;
use maud::{html, Markup};

use crate::data::{Comments, Viewer};
use crate::routes::get_cookie;

pub mod comments;
mod wrappers;

/// The comment section of an article as a full page.
///
/// `comments` is `None` when the list could not be loaded.
pub fn comments_page(
    headers: &HeaderMap,
    slug: &str,
    viewer: Option<&Viewer>,
    comments: Option<&Comments>,
) -> Markup {
    let body = html! {
        .row {
            .col-xs-12.col-md-8.offset-md-2 {
                (comments::section(slug, viewer, comments))
            }
        }
    };
    wrappers::universal(body, headers, "Comments")
}
