use maud::{html, Markup};

use crate::data::{self, Comment, Comments, Reaction, Viewer};
use crate::reaction::can_react;
use crate::routes::{comment_action, comments_page, profile_page};

const DEFAULT_AVATAR: &str = "https://static.productionready.io/images/smiley-cyrus.jpg";

/// The comment input followed by the list, or an error message if the list failed to load.
pub fn section(slug: &str, viewer: Option<&Viewer>, comments: Option<&Comments>) -> Markup {
    let Some(comments) = comments else {
        return load_error();
    };

    html! {
        #comments {
            @if viewer.is_some() {
                (input(slug))
            }
            @for comment in &comments.comments {
                (self::comment(slug, viewer, comment))
            }
        }
    }
}

pub fn load_error() -> Markup {
    html! {
        ul.error-messages {
            li { "Cannot load comments related to this article..." }
        }
    }
}

/// Form for posting a new comment.
pub fn input(slug: &str) -> Markup {
    html! {
        form.card.comment-form method="post" action=(comments_page(slug)) {
            .card-block {
                textarea.form-control name="body" rows="3" placeholder="Write a comment..." {}
            }
            .card-footer {
                button.btn.btn-sm.btn-primary type="submit" { "Post Comment" }
            }
        }
    }
}

/// A single comment card.
pub fn comment(slug: &str, viewer: Option<&Viewer>, comment: &Comment) -> Markup {
    let owned = viewer.is_some_and(|v| v.owns(comment));

    html! {
        .card id={ "comment-" (comment.id) } {
            .card-block {
                p.card-text { (comment.body) }
            }
            .card-footer {
                (author(comment))
                span.date-posted { (data::date(&comment.created_at)) }
                @if can_react(viewer, comment) {
                    (reactions(slug, comment))
                }
                @if owned {
                    (delete_button(slug, comment))
                }
            }
        }
    }
}

fn author(comment: &Comment) -> Markup {
    let profile = profile_page(&comment.author.username);
    let image = comment.author.image.as_deref().unwrap_or(DEFAULT_AVATAR);

    html! {
        a.comment-author href=(profile) {
            img.comment-author-img src=(image) alt="Comment author's profile image";
        }
        " "
        a.comment-author href=(profile) { (comment.author.username) }
    }
}

/// Like and dislike buttons. The active one is highlighted and clears the reaction when clicked.
fn reactions(slug: &str, comment: &Comment) -> Markup {
    let active = |reaction: Reaction| comment.user_reaction == Some(reaction);
    let style = |reaction: Reaction| {
        if active(reaction) {
            "btn-primary"
        } else {
            "btn-outline-primary"
        }
    };
    let like_title = if active(Reaction::Like) { "Remove like" } else { "Like comment" };
    let dislike_title = if active(Reaction::Dislike) {
        "Remove dislike"
    } else {
        "Dislike comment"
    };

    html! {
        span.comment-reactions {
            form.reaction method="post" action=(comment_action(slug, &comment.id, "like")) {
                button type="submit" class={ "btn btn-sm " (style(Reaction::Like)) } title=(like_title) {
                    i.ion-thumbsup {}
                    span.counter { " " (comment.like_count) }
                }
            }
            form.reaction method="post" action=(comment_action(slug, &comment.id, "dislike")) {
                button type="submit" class={ "btn btn-sm " (style(Reaction::Dislike)) } title=(dislike_title) {
                    i.ion-thumbsdown {}
                    span.counter { " " (comment.dislike_count) }
                }
            }
        }
    }
}

fn delete_button(slug: &str, comment: &Comment) -> Markup {
    html! {
        span.mod-options {
            form method="post" action=(comment_action(slug, &comment.id, "delete")) {
                button.btn.btn-sm.btn-link type="submit" title="Delete comment" {
                    i.ion-trash-a {}
                }
            }
        }
    }
}
