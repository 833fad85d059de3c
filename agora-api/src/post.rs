use crate::{CommunityId, Error, Time};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct PostId(pub i64);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub community_id: Option<CommunityId>,

    /// Public URL of the attached image, if one was uploaded
    pub image_url: Option<String>,

    /// Avatar of the author, snapshotted from the session at creation time
    pub avatar_url: Option<String>,

    pub created_at: Time,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub community_id: Option<CommunityId>,
    pub avatar_url: Option<String>,
}

impl NewPost {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_text(&self.title)?;
        crate::validate_text(&self.content)?;
        if let Some(url) = &self.avatar_url {
            crate::validate_string(url)?;
        }
        Ok(())
    }
}
