use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A viewer's reaction to a comment.
///
/// A comment carries `Option<Reaction>`, so a viewer can never have liked and disliked the same
/// comment at once.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Reaction {
    Like,
    Dislike,
}

/// The author of a comment, as seen by the viewer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub username: String,

    #[serde(default)]
    pub bio: Option<String>,

    /// Avatar URL.
    #[serde(default)]
    pub image: Option<String>,

    /// Whether the viewer follows the author. Always `false` for anonymous viewers.
    #[serde(default)]
    pub following: bool,
}

/// A comment on an article.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Opaque identifier assigned by the server.
    pub id: String,

    pub body: String,

    /// The slug of the article the comment belongs to. Not every endpoint includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    pub author: Author,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Maintained by the server. Never adjusted locally.
    #[serde(default)]
    pub like_count: u32,

    /// Maintained by the server. Never adjusted locally.
    #[serde(default)]
    pub dislike_count: u32,

    /// The viewer's reaction, or `None` when they have not reacted (or are anonymous).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_reaction: Option<Reaction>,
}

impl Comment {
    /// Whether `username` wrote this comment.
    pub fn is_authored_by(&self, username: &str) -> bool {
        self.author.username == username
    }
}

/// The comments of one article, in the order the server lists them.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments {
    pub comments: Vec<Comment>,
}

impl Comments {
    pub fn find(&self, id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }
}

/// Body of the single-comment responses (creation and reactions).
///
/// `comment` is optional so a success response without a payload still decodes.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentEnvelope {
    #[serde(default)]
    pub comment: Option<Comment>,
}
