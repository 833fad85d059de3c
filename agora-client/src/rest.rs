use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::{
    api::{
        AuthToken, Comment, Community, CommunityId, Error, NewComment, NewCommunity, NewPost,
        NewSession, Post, PostId, Vote, VoteValue,
    },
    media, ImageUpload, Session, Store, VoteOutcome,
};

/// HTTP implementation of [`Store`], speaking JSON to the hosted backend.
///
/// No retries here: a failed call surfaces its error and the view decides
/// whether to try again.
pub struct RestStore {
    host: String,
    client: reqwest::Client,
}

impl RestStore {
    pub fn new(host: impl Into<String>) -> RestStore {
        RestStore {
            host: host.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn decode<R>(resp: reqwest::Response) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        if !resp.status().is_success() {
            return Err(Self::error_of(resp).await);
        }
        resp.json()
            .await
            .map_err(|e| Error::Unknown(format!("parsing response: {e}")))
    }

    async fn error_of(resp: reqwest::Response) -> Error {
        let status = resp.status();
        match resp.bytes().await {
            Ok(body) => Error::parse(&body).unwrap_or_else(|err| {
                tracing::error!(%status, %err, "server error response did not parse");
                Error::Unknown(format!("server returned {status}"))
            }),
            Err(e) => Error::Unknown(format!("reading error response: {e}")),
        }
    }

    async fn get<R>(&self, path: &str) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let resp = self
            .client
            .get(format!("{}/api/{}", self.host, path))
            .send()
            .await
            .map_err(|e| Error::Unknown(format!("sending request: {e}")))?;
        Self::decode(resp).await
    }

    async fn post<B, R>(&self, token: AuthToken, path: &str, body: &B) -> Result<R, Error>
    where
        B: serde::Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self
            .client
            .post(format!("{}/api/{}", self.host, path))
            .bearer_auth(token.0)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Unknown(format!("sending request: {e}")))?;
        Self::decode(resp).await
    }
}

#[async_trait]
impl Store for RestStore {
    async fn auth(&mut self, session: NewSession) -> Result<Session, Error> {
        session.validate()?;
        let resp = self
            .client
            .post(format!("{}/api/auth", self.host))
            .json(&session)
            .send()
            .await
            .map_err(|e| Error::Unknown(format!("sending request: {e}")))?;
        Self::decode(resp).await
    }

    async fn unauth(&mut self, token: AuthToken) -> Result<(), Error> {
        let resp = self
            .client
            .post(format!("{}/api/unauth", self.host))
            .bearer_auth(token.0)
            .send()
            .await
            .map_err(|e| Error::Unknown(format!("sending request: {e}")))?;
        if !resp.status().is_success() {
            return Err(Self::error_of(resp).await);
        }
        Ok(())
    }

    async fn fetch_communities(&mut self) -> Result<Vec<Community>, Error> {
        self.get("communities").await
    }

    async fn create_community(
        &mut self,
        token: AuthToken,
        community: NewCommunity,
    ) -> Result<Community, Error> {
        community.validate()?;
        self.post(token, "communities", &community).await
    }

    async fn fetch_posts(&mut self) -> Result<Vec<Post>, Error> {
        self.get("posts").await
    }

    async fn fetch_community_posts(
        &mut self,
        community: CommunityId,
    ) -> Result<Vec<Post>, Error> {
        self.get(&format!("community/{}/posts", community.0)).await
    }

    async fn fetch_post(&mut self, post: PostId) -> Result<Post, Error> {
        self.get(&format!("post/{}", post.0)).await
    }

    async fn create_post(
        &mut self,
        token: AuthToken,
        post: NewPost,
        image: Option<ImageUpload>,
    ) -> Result<Post, Error> {
        post.validate()?;
        let image_url = match image {
            None => None,
            Some(image) => {
                let path = media::object_path(&post.title, &image.file_name, Utc::now());
                let resp = self
                    .client
                    .post(format!("{}/api/upload/{}", self.host, path))
                    .bearer_auth(token.0)
                    .body(image.bytes)
                    .send()
                    .await
                    .map_err(|e| Error::Unknown(format!("uploading image: {e}")))?;
                Some(Self::decode::<String>(resp).await?)
            }
        };
        self.post(
            token,
            "posts",
            &serde_json::json!({ "post": post, "image_url": image_url }),
        )
        .await
    }

    async fn fetch_comments(&mut self, post: PostId) -> Result<Vec<Comment>, Error> {
        self.get(&format!("post/{}/comments", post.0)).await
    }

    async fn create_comment(
        &mut self,
        token: AuthToken,
        post: PostId,
        comment: NewComment,
    ) -> Result<Comment, Error> {
        comment.validate()?;
        self.post(token, &format!("post/{}/comments", post.0), &comment)
            .await
    }

    async fn comment_count(&mut self, post: PostId) -> Result<usize, Error> {
        self.get(&format!("post/{}/comment-count", post.0)).await
    }

    async fn fetch_votes(&mut self, post: PostId) -> Result<Vec<Vote>, Error> {
        self.get(&format!("post/{}/votes", post.0)).await
    }

    async fn cast_vote(
        &mut self,
        token: AuthToken,
        post: PostId,
        value: VoteValue,
    ) -> Result<VoteOutcome, Error> {
        self.post(token, &format!("post/{}/votes", post.0), &value)
            .await
    }

    async fn vote_count(&mut self, post: PostId) -> Result<usize, Error> {
        self.get(&format!("post/{}/vote-count", post.0)).await
    }
}
