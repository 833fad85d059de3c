use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::{
    api::{
        Comment, CommentId, Community, CommunityId, Error, NewComment, NewCommunity, NewPost,
        NewSession, Post, PostId, VoteValue,
    },
    CommentTree, ImageUpload, QueryCache, QueryKey, Session, Store, VoteOutcome, VoteTally,
};

/// Votes and communities are refetched when older than this, matching the
/// refresh cadence of the views that display them.
const REFRESH_INTERVAL_SECS: i64 = 5;

/// One user's view of the board: a store, an optional session, and the
/// query cache in between.
///
/// Every submission invalidates the collections it touched, so the next
/// read refetches and sees the server-assigned id and timestamp.
pub struct App<S> {
    store: S,
    session: Option<Session>,
    cache: QueryCache,
}

impl<S: Store> App<S> {
    pub fn new(store: S) -> App<S> {
        App {
            store,
            session: None,
            cache: QueryCache::new(),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub async fn sign_in(&mut self, session: NewSession) -> Result<Session, Error> {
        let session = self.store.auth(session).await?;
        self.session = Some(session.clone());
        Ok(session)
    }

    pub async fn sign_out(&mut self) -> Result<(), Error> {
        if let Some(session) = self.session.take() {
            if let Err(err) = self.store.unauth(session.token).await {
                // the local session is gone either way
                tracing::error!(%err, "failed to close the session server-side");
            }
        }
        Ok(())
    }

    fn current_session(&self) -> Result<&Session, Error> {
        self.session.as_ref().ok_or(Error::NotLoggedIn)
    }

    pub async fn communities(&mut self) -> Result<Arc<Vec<Community>>, Error> {
        let now = Utc::now();
        if let Some(e) = self
            .cache
            .communities()
            .fresh(now, Duration::seconds(REFRESH_INTERVAL_SECS))
        {
            return Ok(e.data.clone());
        }
        let fetched = self.store.fetch_communities().await;
        self.cache.communities().fill(fetched, now)
    }

    pub async fn create_community(&mut self, community: NewCommunity) -> Result<Community, Error> {
        let token = self.current_session()?.token;
        community.validate()?;
        let created = self.store.create_community(token, community).await?;
        self.cache.invalidate(QueryKey::Communities);
        Ok(created)
    }

    pub async fn posts(&mut self) -> Result<Arc<Vec<Post>>, Error> {
        if let Some(e) = self.cache.posts().ready() {
            return Ok(e.data.clone());
        }
        let fetched = self.store.fetch_posts().await;
        self.cache.posts().fill(fetched, Utc::now())
    }

    pub async fn community_posts(&mut self, c: CommunityId) -> Result<Arc<Vec<Post>>, Error> {
        if let Some(e) = self.cache.community_posts(c).ready() {
            return Ok(e.data.clone());
        }
        let fetched = self.store.fetch_community_posts(c).await;
        self.cache.community_posts(c).fill(fetched, Utc::now())
    }

    pub async fn post(&mut self, p: PostId) -> Result<Arc<Post>, Error> {
        if let Some(e) = self.cache.post(p).ready() {
            return Ok(e.data.clone());
        }
        let fetched = self.store.fetch_post(p).await;
        self.cache.post(p).fill(fetched, Utc::now())
    }

    pub async fn create_post(
        &mut self,
        post: NewPost,
        image: Option<ImageUpload>,
    ) -> Result<Post, Error> {
        let token = self.current_session()?.token;
        post.validate()?;
        let created = self.store.create_post(token, post, image).await?;
        self.cache.invalidate(QueryKey::Posts);
        if let Some(c) = created.community_id {
            self.cache.invalidate(QueryKey::CommunityPosts(c));
        }
        Ok(created)
    }

    /// The flat, chronological comment list for one post.
    pub async fn comments(&mut self, post: PostId) -> Result<Arc<Vec<Comment>>, Error> {
        if let Some(e) = self.cache.comments(post).ready() {
            return Ok(e.data.clone());
        }
        let fetched = self.store.fetch_comments(post).await;
        self.cache.comments(post).fill(fetched, Utc::now())
    }

    /// The threaded form of the same list, rebuilt from the cached flat
    /// collection (the tree itself is never cached).
    pub async fn comment_tree(&mut self, post: PostId) -> Result<CommentTree, Error> {
        let flat = self.comments(post).await?;
        Ok(CommentTree::build(&flat))
    }

    /// Submits a comment (a reply when `parent_id` is set), then invalidates
    /// the post's comment collection so the next read includes it in
    /// chronological position.
    pub async fn submit_comment(
        &mut self,
        post: PostId,
        content: &str,
        parent_id: Option<CommentId>,
    ) -> Result<Comment, Error> {
        let session = self.current_session()?;
        let comment = NewComment {
            content: content.trim().to_string(),
            parent_id,
            author_id: session.user_id(),
            author_name: session.display_name().to_string(),
        };
        comment.validate()?;
        let token = session.token;
        let created = self.store.create_comment(token, post, comment).await?;
        self.cache.invalidate(QueryKey::Comments(post));
        Ok(created)
    }

    pub async fn vote_tally(&mut self, post: PostId) -> Result<VoteTally, Error> {
        let viewer = self.session.as_ref().map(|s| s.user_id());
        let now = Utc::now();
        if let Some(e) = self
            .cache
            .votes(post)
            .fresh(now, Duration::seconds(REFRESH_INTERVAL_SECS))
        {
            return Ok(VoteTally::of(&e.data, viewer));
        }
        let fetched = self.store.fetch_votes(post).await;
        let data = self.cache.votes(post).fill(fetched, now)?;
        Ok(VoteTally::of(&data, viewer))
    }

    pub async fn vote(&mut self, post: PostId, value: VoteValue) -> Result<VoteOutcome, Error> {
        let token = self.current_session()?.token;
        let outcome = self.store.cast_vote(token, post, value).await?;
        self.cache.invalidate(QueryKey::Votes(post));
        Ok(outcome)
    }

    /// Counts for post-list items; cheap head queries, not cached.
    pub async fn comment_count(&mut self, post: PostId) -> Result<usize, Error> {
        self.store.comment_count(post).await
    }

    pub async fn vote_count(&mut self, post: PostId) -> Result<usize, Error> {
        self.store.vote_count(post).await
    }
}
