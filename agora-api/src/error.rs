use anyhow::{anyhow, Context};
use serde_json::json;

use crate::{CommunityId, PostId};

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("You must be logged in to do this")]
    NotLoggedIn,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Text cannot be empty")]
    EmptyText,

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),

    #[error("Invalid character in name {0:?}")]
    InvalidName(String),

    #[error("Name already used {0}")]
    NameAlreadyUsed(String),

    #[error("Post {0:?} does not exist")]
    UnknownPost(PostId),

    #[error("Community {0:?} does not exist")]
    UnknownCommunity(CommunityId),
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::NotLoggedIn => StatusCode::UNAUTHORIZED,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::EmptyText => StatusCode::BAD_REQUEST,
            Error::NullByteInString(_) => StatusCode::BAD_REQUEST,
            Error::InvalidName(_) => StatusCode::BAD_REQUEST,
            Error::NameAlreadyUsed(_) => StatusCode::CONFLICT,
            Error::UnknownPost(_) => StatusCode::NOT_FOUND,
            Error::UnknownCommunity(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::NotLoggedIn => json!({
                "message": "not logged in",
                "type": "not-logged-in",
            }),
            Error::PermissionDenied => json!({
                "message": "permission denied",
                "type": "permission-denied",
            }),
            Error::EmptyText => json!({
                "message": "text cannot be empty",
                "type": "empty-text",
            }),
            Error::NullByteInString(s) => json!({
                "message": "there was a null byte in argument string",
                "type": "null-byte",
                "string": s,
            }),
            Error::InvalidName(n) => json!({
                "message": "there was an invalid character in a name",
                "type": "invalid-name",
                "name": n,
            }),
            Error::NameAlreadyUsed(n) => json!({
                "message": "name already used",
                "type": "conflict-name",
                "name": n,
            }),
            Error::UnknownPost(p) => json!({
                "message": "post does not exist",
                "type": "unknown-post",
                "id": p.0,
            }),
            Error::UnknownCommunity(c) => json!({
                "message": "community does not exist",
                "type": "unknown-community",
                "id": c.0,
            }),
        })
        .expect("serializing error contents")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        Ok(
            match data
                .get("type")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow!("error type is not a string"))?
            {
                "unknown" => Error::Unknown(String::from(
                    data.get("message")
                        .and_then(|msg| msg.as_str())
                        .unwrap_or(""),
                )),
                "not-logged-in" => Error::NotLoggedIn,
                "permission-denied" => Error::PermissionDenied,
                "empty-text" => Error::EmptyText,
                "null-byte" => Error::NullByteInString(String::from(
                    data.get("string").and_then(|s| s.as_str()).ok_or_else(|| {
                        anyhow!("error is a null-byte-in-string without a string")
                    })?,
                )),
                "invalid-name" => Error::InvalidName(String::from(
                    data.get("name").and_then(|s| s.as_str()).ok_or_else(|| {
                        anyhow!("error is about an invalid name but no name was provided")
                    })?,
                )),
                "conflict-name" => Error::NameAlreadyUsed(String::from(
                    data.get("name")
                        .and_then(|n| n.as_str())
                        .ok_or_else(|| anyhow!("error is a name conflict without a name"))?,
                )),
                "unknown-post" => Error::UnknownPost(PostId(
                    data.get("id")
                        .and_then(|id| id.as_i64())
                        .ok_or_else(|| anyhow!("error is about an unknown post without its id"))?,
                )),
                "unknown-community" => Error::UnknownCommunity(CommunityId(
                    data.get("id").and_then(|id| id.as_i64()).ok_or_else(|| {
                        anyhow!("error is about an unknown community without its id")
                    })?,
                )),
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}
