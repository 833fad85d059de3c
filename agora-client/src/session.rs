use crate::api::{AuthToken, User, UserId};

/// The signed-in user, carried explicitly by whoever needs identity.
///
/// There is deliberately no global auth state: views receive a `Session`
/// (or its absence) from their parent.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Session {
    pub token: AuthToken,
    pub user: User,
}

impl Session {
    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    pub fn display_name(&self) -> &str {
        &self.user.name
    }
}
