use async_trait::async_trait;

use crate::{
    api::{
        AuthToken, Comment, Community, CommunityId, Error, NewComment, NewCommunity, NewPost,
        NewSession, Post, PostId, Vote, VoteValue,
    },
    ImageUpload, Session,
};

/// What casting a vote did to the existing row.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum VoteOutcome {
    Inserted,
    Updated,
    /// Voting the same way twice takes the vote back
    Removed,
}

/// The backend contract: sessions, the comment store, and the rest of the
/// pass-through CRUD surface.
///
/// Fetches return fully ordered collections; inserts assign ids and
/// timestamps server-side. Implemented by [`crate::RestStore`] for real use
/// and by `agora-mock-server` for tests.
#[async_trait]
pub trait Store {
    async fn auth(&mut self, session: NewSession) -> Result<Session, Error>;
    async fn unauth(&mut self, token: AuthToken) -> Result<(), Error>;

    /// All communities, ascending `created_at`.
    async fn fetch_communities(&mut self) -> Result<Vec<Community>, Error>;
    async fn create_community(
        &mut self,
        token: AuthToken,
        community: NewCommunity,
    ) -> Result<Community, Error>;

    /// All posts, newest first.
    async fn fetch_posts(&mut self) -> Result<Vec<Post>, Error>;
    /// One community's posts, newest first.
    async fn fetch_community_posts(&mut self, community: CommunityId)
        -> Result<Vec<Post>, Error>;
    async fn fetch_post(&mut self, post: PostId) -> Result<Post, Error>;
    async fn create_post(
        &mut self,
        token: AuthToken,
        post: NewPost,
        image: Option<ImageUpload>,
    ) -> Result<Post, Error>;

    /// One post's comments, flat, ascending `created_at`.
    async fn fetch_comments(&mut self, post: PostId) -> Result<Vec<Comment>, Error>;
    async fn create_comment(
        &mut self,
        token: AuthToken,
        post: PostId,
        comment: NewComment,
    ) -> Result<Comment, Error>;
    async fn comment_count(&mut self, post: PostId) -> Result<usize, Error>;

    async fn fetch_votes(&mut self, post: PostId) -> Result<Vec<Vote>, Error>;
    /// Toggle: no prior vote inserts, an equal vote removes, an opposite
    /// vote flips.
    async fn cast_vote(
        &mut self,
        token: AuthToken,
        post: PostId,
        value: VoteValue,
    ) -> Result<VoteOutcome, Error>;
    async fn vote_count(&mut self, post: PostId) -> Result<usize, Error>;
}
