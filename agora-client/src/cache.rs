use std::{collections::HashMap, sync::Arc};

use crate::api::{Comment, Community, CommunityId, Error, Post, PostId, Time, Vote};

/// Everything a view can ask the store for, one slot per key.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum QueryKey {
    Communities,
    Posts,
    CommunityPosts(CommunityId),
    Post(PostId),
    Comments(PostId),
    Votes(PostId),
}

/// A successful fetch and when it happened.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry<T> {
    pub data: Arc<T>,
    pub fetched_at: Time,
}

impl<T> Entry<T> {
    pub fn age(&self, now: Time) -> chrono::Duration {
        now - self.fetched_at
    }
}

/// Tagged fetch state, instead of implicit loading/error flags.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum QueryState<T> {
    /// Never fetched, or invalidated and waiting for a refetch
    Loading,
    Ready(Entry<T>),
    /// The failure message is kept for display; the next read retries
    Failed(String),
}

impl<T> Default for QueryState<T> {
    fn default() -> QueryState<T> {
        QueryState::Loading
    }
}

impl<T> QueryState<T> {
    pub fn ready(&self) -> Option<&Entry<T>> {
        match self {
            QueryState::Ready(e) => Some(e),
            _ => None,
        }
    }

    /// Ready and fetched no longer than `max_age` ago.
    pub fn fresh(&self, now: Time, max_age: chrono::Duration) -> Option<&Entry<T>> {
        self.ready().filter(|e| e.age(now) <= max_age)
    }

    /// Records a fetch outcome and hands the data (or the error) back.
    pub fn fill(&mut self, fetched: Result<T, Error>, now: Time) -> Result<Arc<T>, Error> {
        match fetched {
            Ok(data) => {
                let data = Arc::new(data);
                *self = QueryState::Ready(Entry {
                    data: data.clone(),
                    fetched_at: now,
                });
                Ok(data)
            }
            Err(err) => {
                *self = QueryState::Failed(err.to_string());
                Err(err)
            }
        }
    }
}

/// Per-view cache of fetched collections, keyed by [`QueryKey`].
///
/// Each post view owns one of these; concurrent views over different posts
/// do not share state.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QueryCache {
    communities: QueryState<Vec<Community>>,
    posts: QueryState<Vec<Post>>,
    community_posts: HashMap<CommunityId, QueryState<Vec<Post>>>,
    post: HashMap<PostId, QueryState<Post>>,
    comments: HashMap<PostId, QueryState<Vec<Comment>>>,
    votes: HashMap<PostId, QueryState<Vec<Vote>>>,
}

impl QueryCache {
    pub fn new() -> QueryCache {
        QueryCache::default()
    }

    pub fn communities(&mut self) -> &mut QueryState<Vec<Community>> {
        &mut self.communities
    }

    pub fn posts(&mut self) -> &mut QueryState<Vec<Post>> {
        &mut self.posts
    }

    pub fn community_posts(&mut self, c: CommunityId) -> &mut QueryState<Vec<Post>> {
        self.community_posts.entry(c).or_default()
    }

    pub fn post(&mut self, p: PostId) -> &mut QueryState<Post> {
        self.post.entry(p).or_default()
    }

    pub fn comments(&mut self, p: PostId) -> &mut QueryState<Vec<Comment>> {
        self.comments.entry(p).or_default()
    }

    pub fn votes(&mut self, p: PostId) -> &mut QueryState<Vec<Vote>> {
        self.votes.entry(p).or_default()
    }

    /// Puts the slot back to `Loading`; the next read goes to the store.
    pub fn invalidate(&mut self, key: QueryKey) {
        match key {
            QueryKey::Communities => self.communities = QueryState::Loading,
            QueryKey::Posts => self.posts = QueryState::Loading,
            QueryKey::CommunityPosts(c) => {
                self.community_posts.remove(&c);
            }
            QueryKey::Post(p) => {
                self.post.remove(&p);
            }
            QueryKey::Comments(p) => {
                self.comments.remove(&p);
            }
            QueryKey::Votes(p) => {
                self.votes.remove(&p);
            }
        }
    }

    pub fn invalidate_all(&mut self) {
        *self = QueryCache::default();
    }
}
