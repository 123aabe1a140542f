use std::num::NonZeroUsize;

use lru::LruCache;
use tokio::sync::Mutex;
use tracing::debug;

use crate::api::CommentApi;
use crate::data::{session, Comment, Comments, Viewer};
use crate::error::Result;

/// The cache key of an article's comments: the URL they are listed from.
pub fn cache_key(base_url: &str, slug: &str) -> String {
    format!("{}/articles/{slug}/comments", base_url.trim_end_matches('/'))
}

/// The most recently used comment lists, keyed by [`cache_key`].
pub struct CommentCache {
    entries: LruCache<String, Comments>,
}

impl CommentCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        CommentCache {
            entries: LruCache::new(capacity),
        }
    }

    pub fn get(&mut self, key: &str) -> Option<&Comments> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, comments: Comments) {
        self.entries.put(key, comments);
    }

    /// Drop a list so nothing stale is served if the next fetch fails.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.pop(key).is_some()
    }

    /// Replace the cached comment with the same id as `comment`.
    ///
    /// The rest of the list and its order are left alone. Returns `false`, changing nothing,
    /// when no list is cached under `key` or the list has no such comment.
    pub fn replace_comment(&mut self, key: &str, comment: Comment) -> bool {
        let Some(comments) = self.entries.get_mut(key) else {
            debug!(key, "No cached comments to patch");
            return false;
        };
        let Some(slot) = comments.comments.iter_mut().find(|c| c.id == comment.id) else {
            debug!(key, id = %comment.id, "Comment not in cached list");
            return false;
        };
        *slot = comment;
        true
    }
}

/// One [`CommentCache`] per session, least recently used sessions evicted first.
///
/// Reactions and follow flags are relative to the viewer, so lists fetched for one session are
/// never shown to another. A scope is tied to the session token as well as the username, and
/// anonymous viewers share a single scope.
pub struct CacheStore {
    scopes: LruCache<Option<(String, String)>, CommentCache>,
    lists: NonZeroUsize,

    /// Bumped on every invalidation, so fetches that raced one are not cached.
    generation: u64,
}

impl CacheStore {
    /// Keep lists for up to `viewers` sessions, and up to `lists` articles per session.
    pub fn new(viewers: NonZeroUsize, lists: NonZeroUsize) -> Self {
        CacheStore {
            scopes: LruCache::new(viewers),
            lists,
            generation: 0,
        }
    }

    pub fn scope_mut(&mut self, viewer: Option<&Viewer>) -> &mut CommentCache {
        let lists = self.lists;
        self.scopes
            .get_or_insert_mut(scope_of(viewer), || CommentCache::new(lists))
    }

    /// Cached comments for `key` as `viewer` sees them.
    pub fn get(&mut self, viewer: Option<&Viewer>, key: &str) -> Option<&Comments> {
        self.scopes.get_mut(&scope_of(viewer))?.get(key)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cache a list fetched when the store was at `generation`.
    ///
    /// Nothing is stored if an invalidation happened since, because the list may predate it.
    pub fn insert_if_current(
        &mut self,
        viewer: Option<&Viewer>,
        key: String,
        comments: Comments,
        generation: u64,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.scope_mut(viewer).insert(key, comments);
        true
    }

    /// Invalidate `key` for every viewer, after the list itself changed.
    pub fn invalidate_everywhere(&mut self, key: &str) {
        self.generation += 1;
        for (_, cache) in self.scopes.iter_mut() {
            cache.invalidate(key);
        }
    }
}

fn scope_of(viewer: Option<&Viewer>) -> Option<(String, String)> {
    viewer.map(|v| (v.username.clone(), v.token.clone()))
}

/// Fetch the comments of `slug` as `viewer` sees them, and cache them.
pub async fn refresh(
    api: &CommentApi,
    caches: &Mutex<CacheStore>,
    viewer: Option<&Viewer>,
    slug: &str,
) -> Result<Comments> {
    let key = cache_key(api.base_url(), slug);
    let generation = caches.lock().await.generation();

    let comments = api.for_article(slug, session::token(viewer)).await?;

    let cached = caches
        .lock()
        .await
        .insert_if_current(viewer, key, comments.clone(), generation);
    if !cached {
        debug!(slug, "Comments changed while loading, not caching them");
    }
    Ok(comments)
}
