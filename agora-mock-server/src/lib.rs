use std::collections::{BTreeMap, HashMap};

use agora_client::{
    api::{
        self, AuthToken, Comment, CommentId, Community, CommunityId, Error, NewComment,
        NewCommunity, NewPost, NewSession, Post, PostId, Time, User, UserId, Uuid, Vote, VoteId,
        VoteValue,
    },
    object_path, ImageUpload, Session, Store, VoteOutcome,
};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

/// In-memory stand-in for the hosted backend, with the same observable
/// behavior: server-assigned ids and timestamps, ordered fetches, and the
/// vote toggle.
pub struct MockServer {
    users: BTreeMap<UserId, MockUser>,
    sessions: HashMap<AuthToken, UserId>,
    communities: BTreeMap<CommunityId, Community>,
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    votes: BTreeMap<VoteId, Vote>,
    objects: BTreeMap<String, Vec<u8>>,
    next_id: i64,
    clock: Time,
}

#[derive(Debug)]
struct MockUser {
    name: String,
    pass: String,
    avatar_url: Option<String>,
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            users: BTreeMap::new(),
            sessions: HashMap::new(),
            communities: BTreeMap::new(),
            posts: BTreeMap::new(),
            comments: BTreeMap::new(),
            votes: BTreeMap::new(),
            objects: BTreeMap::new(),
            next_id: 1,
            clock: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    /// Each insert lands one second after the previous one, so chronological
    /// order is deterministic in tests.
    fn tick(&mut self) -> Time {
        self.clock += Duration::seconds(1);
        self.clock
    }

    fn fresh_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn admin_create_user(
        &mut self,
        name: &str,
        pass: &str,
        avatar_url: Option<&str>,
    ) -> Result<UserId, Error> {
        api::validate_name(name)?;
        if self.users.values().any(|u| u.name == name) {
            return Err(Error::NameAlreadyUsed(name.to_string()));
        }
        let id = UserId(Uuid::new_v4());
        self.users.insert(
            id,
            MockUser {
                name: name.to_string(),
                pass: pass.to_string(),
                avatar_url: avatar_url.map(String::from),
            },
        );
        Ok(id)
    }

    fn resolve(&self, tok: AuthToken) -> Result<UserId, Error> {
        self.sessions
            .get(&tok)
            .copied()
            .ok_or(Error::PermissionDenied)
    }

    fn check_post(&self, post: PostId) -> Result<(), Error> {
        match self.posts.contains_key(&post) {
            true => Ok(()),
            false => Err(Error::UnknownPost(post)),
        }
    }

    /// Bytes uploaded under `path`, if any.
    pub fn stored_object(&self, path: &str) -> Option<&[u8]> {
        self.objects.get(path).map(|b| &b[..])
    }
}

#[async_trait]
impl Store for MockServer {
    async fn auth(&mut self, session: NewSession) -> Result<Session, Error> {
        session.validate()?;
        for (id, u) in self.users.iter() {
            if u.name == session.user {
                if u.pass != session.password {
                    return Err(Error::PermissionDenied);
                }
                let tok = AuthToken(Uuid::new_v4());
                self.sessions.insert(tok, *id);
                return Ok(Session {
                    token: tok,
                    user: User {
                        id: *id,
                        name: u.name.clone(),
                        avatar_url: u.avatar_url.clone(),
                    },
                });
            }
        }
        Err(Error::PermissionDenied)
    }

    async fn unauth(&mut self, token: AuthToken) -> Result<(), Error> {
        match self.sessions.remove(&token) {
            Some(_) => Ok(()),
            None => Err(Error::PermissionDenied),
        }
    }

    async fn fetch_communities(&mut self) -> Result<Vec<Community>, Error> {
        let mut res: Vec<Community> = self.communities.values().cloned().collect();
        res.sort_by_key(|c| c.created_at);
        Ok(res)
    }

    async fn create_community(
        &mut self,
        token: AuthToken,
        community: NewCommunity,
    ) -> Result<Community, Error> {
        self.resolve(token)?;
        community.validate()?;
        if self.communities.values().any(|c| c.name == community.name) {
            return Err(Error::NameAlreadyUsed(community.name));
        }
        let created = Community {
            id: CommunityId(self.fresh_id()),
            name: community.name,
            description: community.description,
            created_at: self.tick(),
        };
        self.communities.insert(created.id, created.clone());
        Ok(created)
    }

    async fn fetch_posts(&mut self) -> Result<Vec<Post>, Error> {
        let mut res: Vec<Post> = self.posts.values().cloned().collect();
        res.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(res)
    }

    async fn fetch_community_posts(
        &mut self,
        community: CommunityId,
    ) -> Result<Vec<Post>, Error> {
        if !self.communities.contains_key(&community) {
            return Err(Error::UnknownCommunity(community));
        }
        let mut res: Vec<Post> = self
            .posts
            .values()
            .filter(|p| p.community_id == Some(community))
            .cloned()
            .collect();
        res.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(res)
    }

    async fn fetch_post(&mut self, post: PostId) -> Result<Post, Error> {
        self.posts
            .get(&post)
            .cloned()
            .ok_or(Error::UnknownPost(post))
    }

    async fn create_post(
        &mut self,
        token: AuthToken,
        post: NewPost,
        image: Option<ImageUpload>,
    ) -> Result<Post, Error> {
        self.resolve(token)?;
        post.validate()?;
        if let Some(c) = post.community_id {
            if !self.communities.contains_key(&c) {
                return Err(Error::UnknownCommunity(c));
            }
        }
        let created_at = self.tick();
        let image_url = image.map(|image| {
            let path = object_path(&post.title, &image.file_name, created_at);
            self.objects.insert(path.clone(), image.bytes);
            format!("mock://post-images/{path}")
        });
        let created = Post {
            id: PostId(self.fresh_id()),
            title: post.title,
            content: post.content,
            community_id: post.community_id,
            image_url,
            avatar_url: post.avatar_url,
            created_at,
        };
        self.posts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn fetch_comments(&mut self, post: PostId) -> Result<Vec<Comment>, Error> {
        self.check_post(post)?;
        let mut res: Vec<Comment> = self
            .comments
            .values()
            .filter(|c| c.post_id == post)
            .cloned()
            .collect();
        res.sort_by_key(|c| c.created_at);
        Ok(res)
    }

    async fn create_comment(
        &mut self,
        token: AuthToken,
        post: PostId,
        comment: NewComment,
    ) -> Result<Comment, Error> {
        let user = self.resolve(token)?;
        self.check_post(post)?;
        comment.validate()?;
        if comment.author_id != user {
            return Err(Error::PermissionDenied);
        }
        // note: the parent is allowed to be missing, clients degrade the
        // comment to top-level
        let created = Comment {
            id: CommentId(self.fresh_id()),
            post_id: post,
            parent_id: comment.parent_id,
            content: comment.content,
            author_id: comment.author_id,
            author_name: comment.author_name,
            created_at: self.tick(),
        };
        self.comments.insert(created.id, created.clone());
        Ok(created)
    }

    async fn comment_count(&mut self, post: PostId) -> Result<usize, Error> {
        self.check_post(post)?;
        Ok(self.comments.values().filter(|c| c.post_id == post).count())
    }

    async fn fetch_votes(&mut self, post: PostId) -> Result<Vec<Vote>, Error> {
        self.check_post(post)?;
        Ok(self
            .votes
            .values()
            .filter(|v| v.post_id == post)
            .cloned()
            .collect())
    }

    async fn cast_vote(
        &mut self,
        token: AuthToken,
        post: PostId,
        value: VoteValue,
    ) -> Result<VoteOutcome, Error> {
        let user = self.resolve(token)?;
        self.check_post(post)?;
        let existing = self
            .votes
            .values()
            .find(|v| v.post_id == post && v.user_id == user)
            .map(|v| (v.id, v.value));
        match existing {
            Some((id, prev)) if prev == value => {
                self.votes.remove(&id);
                Ok(VoteOutcome::Removed)
            }
            Some((id, _)) => {
                if let Some(v) = self.votes.get_mut(&id) {
                    v.value = value;
                }
                Ok(VoteOutcome::Updated)
            }
            None => {
                let vote = Vote {
                    id: VoteId(self.fresh_id()),
                    post_id: post,
                    user_id: user,
                    value,
                };
                self.votes.insert(vote.id, vote);
                Ok(VoteOutcome::Inserted)
            }
        }
    }

    async fn vote_count(&mut self, post: PostId) -> Result<usize, Error> {
        self.check_post(post)?;
        Ok(self.votes.values().filter(|v| v.post_id == post).count())
    }
}
